//! Maps new-file line numbers to review-API diff positions.
//!
//! A "position" is the 1-based count of lines below the first `@@` header of
//! one file's patch: the line just under that header is position 1. Every
//! later line counts, including subsequent hunk headers and removed lines;
//! removed lines have no new-file line number, so they can never be the
//! match target. Recomputed on every call; nothing is cached.

use tracing::trace;

use crate::diff::line::{LineKind, classify};
use crate::errors::ParseError;

/// Resolves the diff position of `target` (a new-file line number) within
/// one file's patch text. Any prelude before the first hunk header is
/// skipped without counting.
///
/// Returns `Ok(None)` when the target line never appears as an added or
/// context line in this patch; callers skip that one comment and keep the
/// rest of their batch.
pub fn position_for_line(patch: &str, target: u32) -> Result<Option<u32>, ParseError> {
    let mut position: u32 = 0;
    let mut new_line: u32 = 0;
    let mut in_hunk = false;

    for line in patch.lines() {
        match classify(line)? {
            LineKind::HunkHeader(h) => {
                // The first header is the origin; later ones occupy a slot.
                if in_hunk {
                    position += 1;
                }
                new_line = h.new_start.saturating_sub(1);
                in_hunk = true;
            }
            LineKind::Added | LineKind::Context if in_hunk => {
                new_line += 1;
                position += 1;
                if new_line == target {
                    trace!(target, position, "position resolved");
                    return Ok(Some(position));
                }
            }
            LineKind::Removed if in_hunk => {
                position += 1;
            }
            LineKind::NoNewlineMarker => {}
            // File header or metadata before the first hunk: not counted.
            _ => {}
        }
    }

    trace!(target, "target line not present in patch");
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn added_line_resolves_below_the_header() {
        // The context line is position 1, the added line position 2.
        let patch = "@@ -1,2 +1,3 @@\n context\n+added\n context2";
        assert_eq!(position_for_line(patch, 2).unwrap(), Some(2));
        assert_eq!(position_for_line(patch, 1).unwrap(), Some(1));
    }

    #[test]
    fn second_hunk_counts_from_start_of_patch() {
        let patch = "\
@@ -1,2 +1,2 @@
 one
-two
+deux
@@ -10,2 +10,3 @@
 ten
+ten point five
 eleven";
        // one(1) -two(2) +deux(3) header(4) ten(5) added(6): the cursor was
        // reset at the second header, the position counter was not.
        assert_eq!(position_for_line(patch, 11).unwrap(), Some(6));
    }

    #[test]
    fn removed_lines_shift_position_but_never_match() {
        let patch = "\
@@ -1,3 +1,2 @@
 keep
-gone
 last";
        // Old line 2 was removed; new line 2 is "last" at position 3.
        assert_eq!(position_for_line(patch, 2).unwrap(), Some(3));
    }

    #[test]
    fn removed_only_target_is_not_found() {
        let patch = "\
@@ -5,3 +5,2 @@
 a
-b
 c";
        // New file has lines 5 and 6 here; line 7 only existed pre-change.
        assert_eq!(position_for_line(patch, 7).unwrap(), None);
    }

    #[test]
    fn no_newline_marker_does_not_shift_positions() {
        let with_marker = "@@ -1,1 +1,2 @@\n first\n+second\n\\ No newline at end of file";
        let without = "@@ -1,1 +1,2 @@\n first\n+second";
        assert_eq!(
            position_for_line(with_marker, 2).unwrap(),
            position_for_line(without, 2).unwrap()
        );
        assert_eq!(position_for_line(with_marker, 2).unwrap(), Some(2));
    }

    #[test]
    fn prelude_lines_are_not_counted() {
        let with_prelude = "\
--- a/x.txt
+++ b/x.txt
@@ -1,1 +1,2 @@
 first
+second";
        assert_eq!(position_for_line(with_prelude, 2).unwrap(), Some(2));
    }

    #[test]
    fn header_without_count_suffix() {
        let patch = "@@ -5 +5 @@\n-five\n+cinq";
        assert_eq!(position_for_line(patch, 5).unwrap(), Some(2));
    }

    #[test]
    fn mapping_is_deterministic() {
        let patch = "@@ -1,2 +1,3 @@\n context\n+added\n context2";
        let first = position_for_line(patch, 3).unwrap();
        let second = position_for_line(patch, 3).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, Some(3));
    }

    #[test]
    fn malformed_header_is_an_error() {
        assert!(position_for_line("@@ bogus\n+x", 1).is_err());
    }
}
