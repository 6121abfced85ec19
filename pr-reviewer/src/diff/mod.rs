//! Unified-diff document parsing.
//!
//! Splits a raw multi-file diff (the `.diff` media type) into per-file
//! records with structural line accounting:
//! - File sections are delimited by `diff --git` header lines.
//! - Per-file counters never leak across sections; the last section is
//!   flushed like any other.
//! - A malformed `@@` header poisons only its own file; the remaining files
//!   still parse and the failure is reported with its path.
//! - Duplicate paths are logged and the later section wins.
//!
//! The raw text of every section is kept verbatim so it can be re-parsed by
//! the position mapper and rendered into prompts.

pub mod filter;
pub mod line;
pub mod position;

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::errors::ParseError;
use line::{LineKind, classify};

/// One file's change section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    /// Post-change path (`b/` side; falls back to `a/` for deletions).
    pub path: String,
    /// Verbatim section text, file header through the end of its hunks.
    pub raw: String,
    /// New-file line numbers of added lines, in file order.
    pub added_lines: Vec<u32>,
    /// Old-file line numbers of removed lines, in file order.
    pub removed_lines: Vec<u32>,
    /// New-file line numbers of replace-like additions (best-effort metadata).
    pub modified_lines: Vec<u32>,
}

impl FileDiff {
    pub fn added_count(&self) -> usize {
        self.added_lines.len()
    }

    pub fn removed_count(&self) -> usize {
        self.removed_lines.len()
    }

    pub fn modified_count(&self) -> usize {
        self.modified_lines.len()
    }

    /// True when this section carries a binary patch instead of text hunks.
    pub fn is_binary(&self) -> bool {
        looks_like_binary_patch(&self.raw)
    }
}

/// Simple heuristic to detect binary patches or messages in a file section.
pub fn looks_like_binary_patch(s: &str) -> bool {
    s.contains("GIT binary patch") || s.contains("\nBinary files ")
}

/// A file section that failed to parse; the rest of the document is intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: String,
    pub error: ParseError,
}

/// Parsed multi-file diff: a mapping from file path to [`FileDiff`].
///
/// Constructed once per [`DiffDocument::parse`] call and immutable after
/// construction. Iteration order is path order, which keeps every consumer
/// deterministic regardless of source layout.
#[derive(Debug, Clone, Default)]
pub struct DiffDocument {
    pub(crate) files: BTreeMap<String, FileDiff>,
    pub(crate) failures: Vec<FileFailure>,
}

impl DiffDocument {
    /// Parses a raw unified diff into per-file records.
    ///
    /// Never fails at the document level: sections with malformed hunk
    /// headers are excluded from the mapping and reported via
    /// [`DiffDocument::failures`].
    pub fn parse(diff_text: &str) -> Self {
        let mut doc = DiffDocument::default();
        let mut current: Option<FileDiffBuilder> = None;

        for line in diff_text.split('\n') {
            if line.starts_with("diff --git") {
                if let Some(builder) = current.take() {
                    doc.store(builder);
                }
                current = Some(FileDiffBuilder::open(line));
                continue;
            }
            if let Some(builder) = current.as_mut() {
                builder.push(line);
            }
            // Lines before the first file header are prelude; nothing owns them.
        }
        if let Some(builder) = current.take() {
            doc.store(builder);
        }

        debug!(
            files = doc.files.len(),
            failures = doc.failures.len(),
            "diff document parsed"
        );
        doc
    }

    fn store(&mut self, builder: FileDiffBuilder) {
        match builder.finish() {
            Ok(file) => {
                if self.files.contains_key(&file.path) {
                    warn!(path = %file.path, "duplicate file section in diff, later one wins");
                }
                self.files.insert(file.path.clone(), file);
            }
            Err(failure) => {
                warn!(path = %failure.path, error = %failure.error, "file section failed to parse");
                self.failures.push(failure);
            }
        }
    }

    pub fn get(&self, path: &str) -> Option<&FileDiff> {
        self.files.get(path)
    }

    pub fn files(&self) -> impl Iterator<Item = &FileDiff> {
        self.files.values()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Sections that failed to parse, with the offending header preserved.
    pub fn failures(&self) -> &[FileFailure] {
        &self.failures
    }

    /// Renders every file for inclusion in a reviewer prompt: path, fenced
    /// raw content, and the three change counts. Pure function of the
    /// document.
    pub fn render_for_prompt(&self) -> String {
        let mut out = String::new();
        for file in self.files.values() {
            out.push_str(&format!("File: {}\n", file.path));
            if file.is_binary() {
                out.push_str("(binary change, content omitted)\n\n");
                continue;
            }
            out.push_str("```\n");
            out.push_str(&file.raw);
            if !file.raw.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
            out.push_str(&format!("Added lines: {}\n", file.added_count()));
            out.push_str(&format!("Removed lines: {}\n", file.removed_count()));
            out.push_str(&format!("Modified lines: {}\n\n", file.modified_count()));
        }
        out
    }
}

/// Accumulator for one file section. Counters follow the structural
/// convention: Added advances the new cursor, Removed the old cursor,
/// Context both; lines outside a hunk touch no counter.
struct FileDiffBuilder {
    path: String,
    raw: Vec<String>,
    added: Vec<u32>,
    removed: Vec<u32>,
    modified: Vec<u32>,
    old_line: u32,
    new_line: u32,
    in_hunk: bool,
    run_removed: usize,
    run_added: Vec<u32>,
    failed: Option<ParseError>,
}

impl FileDiffBuilder {
    fn open(header: &str) -> Self {
        Self {
            path: path_from_header(header),
            raw: vec![header.to_string()],
            added: Vec::new(),
            removed: Vec::new(),
            modified: Vec::new(),
            old_line: 0,
            new_line: 0,
            in_hunk: false,
            run_removed: 0,
            run_added: Vec::new(),
            failed: None,
        }
    }

    fn push(&mut self, raw_line: &str) {
        // Raw text stays verbatim even after a parse failure.
        self.raw.push(raw_line.to_string());
        if self.failed.is_some() {
            return;
        }
        match classify(raw_line) {
            Err(e) => self.failed = Some(e),
            Ok(LineKind::HunkHeader(h)) => {
                self.flush_run();
                self.old_line = h.old_start;
                self.new_line = h.new_start;
                self.in_hunk = true;
            }
            Ok(LineKind::Added) if self.in_hunk => {
                self.added.push(self.new_line);
                self.run_added.push(self.new_line);
                self.new_line += 1;
            }
            Ok(LineKind::Removed) if self.in_hunk => {
                self.removed.push(self.old_line);
                self.run_removed += 1;
                self.old_line += 1;
            }
            Ok(LineKind::Context) if self.in_hunk => {
                self.flush_run();
                self.old_line += 1;
                self.new_line += 1;
            }
            // Markers and pre-hunk metadata are not content.
            Ok(_) => {}
        }
    }

    /// Closes a change run at a non-added/removed boundary. A run counts as
    /// replace-like when it removed exactly as many lines as it added (the
    /// old/new cursors re-align); its added line numbers are then recorded
    /// as modified.
    fn flush_run(&mut self) {
        if self.run_removed > 0 && self.run_removed == self.run_added.len() {
            self.modified.append(&mut self.run_added);
        }
        self.run_removed = 0;
        self.run_added.clear();
    }

    fn finish(mut self) -> Result<FileDiff, FileFailure> {
        if let Some(error) = self.failed {
            return Err(FileFailure {
                path: self.path,
                error,
            });
        }
        self.flush_run();
        Ok(FileDiff {
            path: self.path,
            raw: self.raw.join("\n"),
            added_lines: self.added,
            removed_lines: self.removed,
            modified_lines: self.modified,
        })
    }
}

/// Extracts the post-change path from a `diff --git` header. Prefers the
/// `b/` side; deletions where only `a/` exists fall back to it.
fn path_from_header(header: &str) -> String {
    let mut a_path = None;
    let mut b_path = None;
    for token in header.split_whitespace() {
        if let Some(p) = token.strip_prefix("b/") {
            b_path = Some(p);
        } else if let Some(p) = token.strip_prefix("a/") {
            a_path = Some(p);
        }
    }
    b_path
        .or(a_path)
        .map(str::to_string)
        .unwrap_or_else(|| header.split_whitespace().last().unwrap_or("").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_FILES: &str = "\
diff --git a/app.py b/app.py
--- a/app.py
+++ b/app.py
@@ -1,2 +1,3 @@
 import os
+import sys
 import json
diff --git a/docs/usage.md b/docs/usage.md
--- a/docs/usage.md
+++ b/docs/usage.md
@@ -10,2 +11,2 @@
-old heading
+new heading
 body";

    #[test]
    fn additions_are_counted_with_new_line_numbers() {
        let doc = DiffDocument::parse(TWO_FILES);
        let file = doc.get("app.py").unwrap();
        assert_eq!(file.added_lines, vec![2]);
        assert_eq!(file.removed_lines, Vec::<u32>::new());
        assert_eq!(file.added_count(), 1);
    }

    #[test]
    fn counters_reset_between_files() {
        let doc = DiffDocument::parse(TWO_FILES);
        let docs = doc.get("docs/usage.md").unwrap();
        // Second file counts from its own hunk header, not app.py leftovers.
        assert_eq!(docs.added_lines, vec![11]);
        assert_eq!(docs.removed_lines, vec![10]);
    }

    #[test]
    fn last_file_section_is_flushed() {
        let doc = DiffDocument::parse(TWO_FILES);
        assert_eq!(doc.len(), 2);
        assert!(doc.get("docs/usage.md").is_some());
    }

    #[test]
    fn raw_content_round_trips() {
        let doc = DiffDocument::parse(TWO_FILES);
        // Paths sort in source order here, so joining restores the input.
        let joined = doc
            .files()
            .map(|f| f.raw.clone())
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(joined, TWO_FILES);
    }

    #[test]
    fn replace_like_run_is_recorded_as_modified() {
        let doc = DiffDocument::parse(TWO_FILES);
        let docs = doc.get("docs/usage.md").unwrap();
        // One removal aligned with one addition: a replacement of line 11.
        assert_eq!(docs.modified_lines, vec![11]);

        // An unbalanced run is not a replacement.
        let app = doc.get("app.py").unwrap();
        assert_eq!(app.modified_lines, Vec::<u32>::new());
    }

    #[test]
    fn hunk_header_without_count_suffix() {
        let diff = "\
diff --git a/one.txt b/one.txt
@@ -5 +5 @@
-five
+cinq";
        let doc = DiffDocument::parse(diff);
        let file = doc.get("one.txt").unwrap();
        assert_eq!(file.removed_lines, vec![5]);
        assert_eq!(file.added_lines, vec![5]);
        assert_eq!(file.modified_lines, vec![5]);
    }

    #[test]
    fn no_newline_marker_is_not_content() {
        let diff = "\
diff --git a/a.txt b/a.txt
@@ -1,1 +1,2 @@
 first
+second
\\ No newline at end of file";
        let doc = DiffDocument::parse(diff);
        let file = doc.get("a.txt").unwrap();
        assert_eq!(file.added_count(), 1);
        assert_eq!(file.removed_count(), 0);
    }

    #[test]
    fn malformed_hunk_header_poisons_only_its_file() {
        let diff = "\
diff --git a/bad.py b/bad.py
@@ broken header @@
+oops
diff --git a/good.py b/good.py
@@ -1,1 +1,2 @@
 keep
+add";
        let doc = DiffDocument::parse(diff);
        assert!(doc.get("bad.py").is_none());
        assert_eq!(doc.get("good.py").unwrap().added_lines, vec![2]);
        assert_eq!(doc.failures().len(), 1);
        assert_eq!(doc.failures()[0].path, "bad.py");
    }

    #[test]
    fn duplicate_path_later_section_wins() {
        let diff = "\
diff --git a/x.txt b/x.txt
@@ -1,1 +1,2 @@
 a
+b
diff --git a/x.txt b/x.txt
@@ -1,1 +1,3 @@
 a
+b
+c";
        let doc = DiffDocument::parse(diff);
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.get("x.txt").unwrap().added_count(), 2);
    }

    #[test]
    fn deletion_section_counts_removed_lines() {
        let diff = "\
diff --git a/gone.txt b/gone.txt
deleted file mode 100644
--- a/gone.txt
+++ /dev/null
@@ -1,2 +0,0 @@
-one
-two";
        let doc = DiffDocument::parse(diff);
        let file = doc.get("gone.txt").unwrap();
        assert_eq!(file.removed_lines, vec![1, 2]);
        assert_eq!(file.added_count(), 0);
    }

    #[test]
    fn binary_section_is_detected_and_not_rendered() {
        let diff = "\
diff --git a/logo.png b/logo.png
Binary files a/logo.png and b/logo.png differ";
        let doc = DiffDocument::parse(diff);
        let file = doc.get("logo.png").unwrap();
        assert!(file.is_binary());
        assert_eq!(file.added_count(), 0);
        let rendered = doc.render_for_prompt();
        assert!(rendered.contains("(binary change, content omitted)"));
        assert!(!rendered.contains("```"));
    }

    #[test]
    fn prompt_rendering_includes_counts_and_fenced_content() {
        let doc = DiffDocument::parse(TWO_FILES);
        let rendered = doc.render_for_prompt();
        assert!(rendered.contains("File: app.py"));
        assert!(rendered.contains("```\ndiff --git a/app.py b/app.py"));
        assert!(rendered.contains("Added lines: 1"));
        assert!(rendered.contains("Removed lines: 1"));
        assert!(rendered.contains("Modified lines: 1"));
    }
}
