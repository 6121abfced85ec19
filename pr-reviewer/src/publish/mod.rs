//! Publisher: resolve comment records to diff positions and post them.
//!
//! Inline comments ride a single PR review; records whose path or line
//! cannot be resolved are skipped one by one, never failing the batch.
//! Reviews that yield no placeable inline comment fall back to one general
//! rollup comment so no feedback is lost.

use tracing::{debug, info, warn};

use crate::diff::DiffDocument;
use crate::diff::position::position_for_line;
use crate::errors::PrResult;
use crate::git_providers::types::{PositionedComment, PullRequestId};
use crate::git_providers::GitHubClient;
use crate::review::AgentReview;
use crate::review::extract::{CommentPlan, CommentRecord, plan_comments};

/// Publishing knobs.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Render and resolve everything, post nothing.
    pub dry_run: bool,
}

impl PublishConfig {
    pub fn from_env() -> Self {
        let dry_run =
            std::env::var("PR_REVIEWER_DRY_RUN").unwrap_or_else(|_| "false".into()) == "true";
        Self { dry_run }
    }
}

/// What actually happened during publishing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Inline comments successfully resolved (and posted unless dry-run).
    pub inline: usize,
    /// Records dropped because their path or line could not be resolved.
    pub skipped: usize,
    /// Rollup sections posted as one general comment.
    pub rollups: usize,
}

/// Resolves records against the parsed document. Unknown paths and
/// unresolvable lines are soft failures: the record is dropped with a
/// warning and the rest of the batch continues.
pub fn resolve_records(
    doc: &DiffDocument,
    records: &[CommentRecord],
) -> (Vec<PositionedComment>, usize) {
    let mut resolved = Vec::new();
    let mut skipped = 0usize;

    for record in records {
        let Some(file) = doc.get(&record.path) else {
            warn!(path = %record.path, "comment path not in diff, record skipped");
            skipped += 1;
            continue;
        };
        match position_for_line(&file.raw, record.line) {
            Ok(Some(position)) => resolved.push(PositionedComment {
                path: record.path.clone(),
                position,
                body: record.body.clone(),
            }),
            Ok(None) => {
                warn!(
                    path = %record.path,
                    line = record.line,
                    "line not present in patch, record skipped"
                );
                skipped += 1;
            }
            Err(e) => {
                warn!(path = %record.path, error = %e, "patch unparsable for record, skipped");
                skipped += 1;
            }
        }
    }

    (resolved, skipped)
}

/// Publishes every agent review: inline where positions resolve, otherwise
/// a rollup section in one general comment.
pub async fn publish_review(
    client: &GitHubClient,
    id: &PullRequestId,
    doc: &DiffDocument,
    reviews: &[AgentReview],
    cfg: &PublishConfig,
) -> PrResult<PublishReport> {
    let mut report = PublishReport::default();
    let mut inline: Vec<PositionedComment> = Vec::new();
    let mut rollups: Vec<(&str, String)> = Vec::new();

    for review in reviews {
        let name = review.kind.display_name();
        match plan_comments(&review.text) {
            CommentPlan::Inline(records) => {
                let (resolved, skipped) = resolve_records(doc, &records);
                report.skipped += skipped;
                if resolved.is_empty() {
                    // Every position fell through: keep the feedback anyway.
                    debug!(agent = name, "no placeable inline comment, using rollup");
                    rollups.push((name, review.text.clone()));
                } else {
                    inline.extend(resolved);
                }
            }
            CommentPlan::Rollup(text) => rollups.push((name, text)),
        }
    }

    report.inline = inline.len();
    report.rollups = rollups.len();

    if cfg.dry_run {
        info!(
            inline = report.inline,
            skipped = report.skipped,
            rollups = report.rollups,
            "dry-run: nothing posted"
        );
        return Ok(report);
    }

    if !inline.is_empty() {
        let body = format!(
            "AI code review: {} inline comment(s) below.",
            inline.len()
        );
        client.create_review(id, &body, &inline).await?;
    }

    if !rollups.is_empty() {
        let mut body = String::from("# AI Code Review Results\n");
        for (name, text) in &rollups {
            body.push_str(&format!("\n## {name} Review\n\n{text}\n"));
        }
        client.create_issue_comment(id, &body).await?;
    }

    info!(
        inline = report.inline,
        skipped = report.skipped,
        rollups = report.rollups,
        "publish finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffDocument;

    fn doc() -> DiffDocument {
        DiffDocument::parse(
            "\
diff --git a/app.py b/app.py
--- a/app.py
+++ b/app.py
@@ -1,2 +1,3 @@
 import os
+import sys
 import json",
        )
    }

    #[test]
    fn resolves_record_to_platform_position() {
        let records = vec![CommentRecord {
            path: "app.py".into(),
            line: 2,
            body: "use lazy import".into(),
        }];
        let (resolved, skipped) = resolve_records(&doc(), &records);
        assert_eq!(skipped, 0);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].position, 2);
    }

    #[test]
    fn unknown_path_is_skipped_not_fatal() {
        let records = vec![
            CommentRecord {
                path: "missing.py".into(),
                line: 1,
                body: "x".into(),
            },
            CommentRecord {
                path: "app.py".into(),
                line: 2,
                body: "y".into(),
            },
        ];
        let (resolved, skipped) = resolve_records(&doc(), &records);
        assert_eq!(skipped, 1);
        assert_eq!(resolved.len(), 1);
    }

    #[test]
    fn unresolvable_line_is_skipped_not_fatal() {
        let records = vec![CommentRecord {
            path: "app.py".into(),
            line: 99,
            body: "x".into(),
        }];
        let (resolved, skipped) = resolve_records(&doc(), &records);
        assert_eq!(skipped, 1);
        assert!(resolved.is_empty());
    }
}
