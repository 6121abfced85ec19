//! Extracts structured comment records from reviewer output.
//!
//! Agents are asked to emit issues in a fixed four-part convention: an issue
//! description paragraph, a fenced ```suggestion block, a `**File:**`
//! annotation and a `**Line:**` annotation, in that order. Extraction is
//! tolerant: a block missing its annotations is dropped silently, and a text
//! with zero well-formed blocks becomes an explicit rollup plan so the
//! feedback is still posted as one general comment.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref FILE_RE: Regex = Regex::new(r"^\s*\*\*File:\*\*\s*`?([^`]+?)`?\s*$").unwrap();
    static ref LINE_RE: Regex = Regex::new(r"^\s*\*\*Line:\*\*\s*(\d+)\s*$").unwrap();
}

/// Intent to attach `body` to `line` (new-file numbering) of `path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRecord {
    pub path: String,
    pub line: u32,
    pub body: String,
}

/// What to do with one reviewer text: inline records, or the whole text as a
/// single general comment. The rollup variant is the deliberate
/// partial-failure policy, not an accident of empty-list handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentPlan {
    Inline(Vec<CommentRecord>),
    Rollup(String),
}

/// Plans the posting of one reviewer text.
pub fn plan_comments(text: &str) -> CommentPlan {
    let records = extract_comment_records(text);
    if records.is_empty() {
        CommentPlan::Rollup(text.trim().to_string())
    } else {
        CommentPlan::Inline(records)
    }
}

/// Walks the text and extracts every well-formed comment block, preserving
/// source order. Malformed blocks are skipped without affecting the rest.
pub fn extract_comment_records(text: &str) -> Vec<CommentRecord> {
    let lines: Vec<&str> = text.lines().collect();
    let mut records = Vec::new();
    let mut i = 0;
    // The paragraph currently being read, and the last completed one; the
    // description may be separated from its fence by a blank line.
    let mut para: Vec<&str> = Vec::new();
    let mut last_para: Vec<&str> = Vec::new();

    while i < lines.len() {
        let line = lines[i];
        if line.trim_start().starts_with("```suggestion") {
            i += 1;
            let mut code: Vec<&str> = Vec::new();
            let mut closed = false;
            while i < lines.len() {
                if lines[i].trim() == "```" {
                    closed = true;
                    i += 1;
                    break;
                }
                code.push(lines[i]);
                i += 1;
            }
            let description = if para.is_empty() { &last_para } else { &para }
                .join("\n")
                .trim()
                .to_string();
            para.clear();
            last_para.clear();
            if !closed {
                break;
            }
            if let Some((path, line_no, next)) = read_annotations(&lines, i) {
                records.push(CommentRecord {
                    path,
                    line: line_no,
                    body: compose_body(&description, &code),
                });
                i = next;
            }
            // Missing annotations: drop this block, keep scanning from here.
            continue;
        }

        if line.trim().is_empty() {
            if !para.is_empty() {
                last_para = std::mem::take(&mut para);
            }
        } else {
            para.push(line);
        }
        i += 1;
    }

    records
}

/// Reads the `**File:**` and `**Line:**` annotations following a fence,
/// skipping blank lines. Returns the path, line and the index just past the
/// line annotation, or `None` when the convention is not met.
fn read_annotations(lines: &[&str], mut i: usize) -> Option<(String, u32, usize)> {
    while i < lines.len() && lines[i].trim().is_empty() {
        i += 1;
    }
    let path = FILE_RE
        .captures(lines.get(i)?)
        .map(|c| c[1].trim().to_string())?;
    i += 1;
    while i < lines.len() && lines[i].trim().is_empty() {
        i += 1;
    }
    let line_no: u32 = LINE_RE
        .captures(lines.get(i)?)
        .and_then(|c| c[1].parse().ok())?;
    Some((path, line_no, i + 1))
}

fn compose_body(description: &str, code: &[&str]) -> String {
    let mut body = String::new();
    if !description.is_empty() {
        body.push_str(description);
        body.push_str("\n\n");
    }
    body.push_str("```suggestion\n");
    for line in code {
        body.push_str(line);
        body.push('\n');
    }
    body.push_str("```");
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE_COMMENTS: &str = "\
- **Use a context manager for the file handle**

```suggestion
with open(path) as fh:
    data = fh.read()
```

**File:** `app/io.py`

**Line:** 14

- **Avoid the bare except**

```suggestion
except ValueError as err:
```

**File:** `app/io.py`

**Line:** 30

- **Typo in the heading**

```suggestion
## Configuration
```

**File:** `README.md`

**Line:** 3
";

    #[test]
    fn extracts_all_blocks_in_source_order() {
        let records = extract_comment_records(THREE_COMMENTS);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].path, "app/io.py");
        assert_eq!(records[0].line, 14);
        assert_eq!(records[1].line, 30);
        assert_eq!(records[2].path, "README.md");
        assert!(records[0].body.contains("context manager"));
        assert!(records[0].body.contains("```suggestion"));
    }

    #[test]
    fn malformed_block_is_dropped_without_affecting_others() {
        let text = format!(
            "{THREE_COMMENTS}\n- **Missing its line annotation**\n\n```suggestion\nnoop\n```\n\n**File:** `app/io.py`\n"
        );
        let records = extract_comment_records(&text);
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn zero_blocks_fall_back_to_rollup() {
        let text = "Overall the change looks reasonable; consider more tests.";
        match plan_comments(text) {
            CommentPlan::Rollup(body) => assert_eq!(body, text),
            other => panic!("expected rollup, got {other:?}"),
        }
    }

    #[test]
    fn well_formed_text_plans_inline() {
        match plan_comments(THREE_COMMENTS) {
            CommentPlan::Inline(records) => assert_eq!(records.len(), 3),
            other => panic!("expected inline, got {other:?}"),
        }
    }

    #[test]
    fn path_backticks_are_optional() {
        let text = "\
Broken null check

```suggestion
if value is None:
```

**File:** app/core.py

**Line:** 7
";
        let records = extract_comment_records(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, "app/core.py");
    }

    #[test]
    fn description_survives_blank_line_before_fence() {
        let records = extract_comment_records(THREE_COMMENTS);
        assert!(records[2].body.starts_with("- **Typo in the heading**"));
    }
}
