//! Line-level tokenizer for unified diff text.
//!
//! Every diff line gets exactly one [`LineKind`] tag; the builder and the
//! position mapper switch on the tag instead of re-checking string prefixes.
//! Only `@@` headers can fail to tokenize; everything else has a total
//! classification.

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::ParseError;

lazy_static! {
    /// Hunk header grammar: `@@ -<old>[,<n>] +<new>[,<m>] @@`, optional
    /// trailing section text after the closing `@@`.
    static ref HUNK_HEADER_RE: Regex =
        Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").unwrap();
}

/// Parsed `@@` header. A missing count suffix implies a count of 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkHeader {
    pub old_start: u32,
    pub old_count: u32,
    pub new_start: u32,
    pub new_count: u32,
}

/// Classification of one diff line.
///
/// The `---`/`+++` file markers and other section metadata (`index`, mode
/// lines) classify as `Context`; consumers only apply line counters inside a
/// hunk, so metadata never reaches a counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `diff --git a/<path> b/<path>` boundary line.
    FileHeader,
    /// `@@ -old[,n] +new[,m] @@` with parsed start positions.
    HunkHeader(HunkHeader),
    /// `+` content line (not the `+++` marker).
    Added,
    /// `-` content line (not the `---` marker).
    Removed,
    /// Unchanged line, or section metadata outside a hunk.
    Context,
    /// `\ No newline at end of file`. Never counted as content.
    NoNewlineMarker,
}

/// Classifies a single diff line.
///
/// The only failure mode is a line that starts with `@@` but does not match
/// the header grammar; that is fatal for the enclosing file section rather
/// than a silent skip.
pub fn classify(line: &str) -> Result<LineKind, ParseError> {
    if line.starts_with("diff --git") {
        return Ok(LineKind::FileHeader);
    }
    if line.starts_with("@@") {
        let caps = HUNK_HEADER_RE
            .captures(line)
            .ok_or_else(|| ParseError::InvalidHunkHeader(line.to_string()))?;
        return Ok(LineKind::HunkHeader(HunkHeader {
            old_start: capture_num(&caps, 1, line)?,
            old_count: capture_num_or_one(&caps, 2, line)?,
            new_start: capture_num(&caps, 3, line)?,
            new_count: capture_num_or_one(&caps, 4, line)?,
        }));
    }
    if line.starts_with("\\ ") {
        return Ok(LineKind::NoNewlineMarker);
    }
    if line.starts_with('+') && !line.starts_with("+++ ") {
        return Ok(LineKind::Added);
    }
    if line.starts_with('-') && !line.starts_with("--- ") {
        return Ok(LineKind::Removed);
    }
    Ok(LineKind::Context)
}

fn capture_num(caps: &regex::Captures<'_>, idx: usize, line: &str) -> Result<u32, ParseError> {
    caps.get(idx)
        .ok_or_else(|| ParseError::InvalidHunkHeader(line.to_string()))?
        .as_str()
        .parse()
        .map_err(|_| ParseError::InvalidHunkHeader(line.to_string()))
}

fn capture_num_or_one(
    caps: &regex::Captures<'_>,
    idx: usize,
    line: &str,
) -> Result<u32, ParseError> {
    match caps.get(idx) {
        Some(m) => m
            .as_str()
            .parse()
            .map_err(|_| ParseError::InvalidHunkHeader(line.to_string())),
        None => Ok(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_basic_kinds() {
        assert_eq!(
            classify("diff --git a/x.py b/x.py").unwrap(),
            LineKind::FileHeader
        );
        assert_eq!(classify("+new line").unwrap(), LineKind::Added);
        assert_eq!(classify("-old line").unwrap(), LineKind::Removed);
        assert_eq!(classify(" unchanged").unwrap(), LineKind::Context);
        assert_eq!(
            classify("\\ No newline at end of file").unwrap(),
            LineKind::NoNewlineMarker
        );
    }

    #[test]
    fn file_markers_are_not_content() {
        assert_eq!(classify("--- a/x.py").unwrap(), LineKind::Context);
        assert_eq!(classify("+++ b/x.py").unwrap(), LineKind::Context);
        assert_eq!(classify("--- /dev/null").unwrap(), LineKind::Context);
    }

    #[test]
    fn hunk_header_with_counts() {
        let kind = classify("@@ -12,7 +12,9 @@ fn main()").unwrap();
        assert_eq!(
            kind,
            LineKind::HunkHeader(HunkHeader {
                old_start: 12,
                old_count: 7,
                new_start: 12,
                new_count: 9,
            })
        );
    }

    #[test]
    fn hunk_header_without_counts_implies_one() {
        // `@@ -5 +5 @@` must parse identically to `@@ -5,1 +5,1 @@`.
        let short = classify("@@ -5 +5 @@").unwrap();
        let long = classify("@@ -5,1 +5,1 @@").unwrap();
        assert_eq!(short, long);
        match short {
            LineKind::HunkHeader(h) => {
                assert_eq!(h.old_count, 1);
                assert_eq!(h.new_count, 1);
            }
            other => panic!("expected hunk header, got {other:?}"),
        }
    }

    #[test]
    fn malformed_hunk_header_is_an_error() {
        assert!(classify("@@ not a header @@").is_err());
        assert!(classify("@@ -a,b +c,d @@").is_err());
    }
}
