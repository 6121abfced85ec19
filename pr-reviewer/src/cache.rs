//! File-based cache for large fetched diffs (raw text on disk).
//!
//! Why cache?
//! - Large PRs consume provider API limits and take time to transfer.
//! - Re-running the pipeline on the same `head_sha` should be O(1).
//!
//! Key (stable across re-runs): SHA256("{repo}:{number}:{head_sha}")
//! Layout: $PR_REVIEWER_CACHE_DIR/github/<repo_sanitized>/<number>-<hash12>.diff
//! Default cache dir: "code_data/pr_cache".
//!
//! Only the raw `.diff` text is stored; parsed documents are rebuilt from it
//! on every run and never persisted.

use crate::errors::PrResult;
use crate::git_providers::types::PullRequestId;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Diffs below this size are cheap to refetch and are not stored.
const LARGE_DIFF_BYTES: usize = 512 * 1024;

/// Returns the root directory for the cache (env-overridable).
fn cache_root() -> PathBuf {
    std::env::var("PR_REVIEWER_CACHE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("code_data/pr_cache"))
}

/// Filesystem-safe replacement for "owner/repo" (slashes to underscores).
fn sanitize(s: &str) -> String {
    s.replace('/', "_")
}

/// Computes the deterministic cache path for one PR at one head SHA.
fn key_path(id: &PullRequestId, head_sha: &str) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}:{}:{}", id.repo, id.number, head_sha));
    let digest = format!("{:x}", hasher.finalize());
    cache_root()
        .join("github")
        .join(sanitize(&id.repo))
        .join(format!("{}-{}.diff", id.number, &digest[..12]))
}

/// Loads a cached diff if present.
pub async fn load_diff(id: &PullRequestId, head_sha: &str) -> PrResult<Option<String>> {
    let path = key_path(id, head_sha);
    if !Path::new(&path).exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(&path).await?;
    Ok(Some(text))
}

/// Stores the diff if considered large; small diffs are skipped.
pub async fn maybe_store_diff(id: &PullRequestId, head_sha: &str, diff: &str) -> PrResult<()> {
    if diff.len() <= LARGE_DIFF_BYTES {
        return Ok(());
    }
    let path = key_path(id, head_sha);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).await?;
    }
    fs::write(path, diff).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_stable_and_sha_scoped() {
        let id = PullRequestId {
            repo: "octo/widgets".into(),
            number: 42,
        };
        let a = key_path(&id, "abc123");
        let b = key_path(&id, "abc123");
        let c = key_path(&id, "def456");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.to_string_lossy().contains("octo_widgets"));
        assert!(a.to_string_lossy().ends_with(".diff"));
    }
}
