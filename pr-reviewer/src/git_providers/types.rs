//! Wire-level data model for pull requests.
//!
//! These types are the normalized output of the provider layer and are
//! consumed by the review pipeline and the publisher.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A unique reference to a pull request.
///
/// * `repo`   – "owner/name", exactly as it appears in the API path.
/// * `number` – the PR number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestId {
    pub repo: String,
    pub number: u64,
}

/// High-level metadata for a pull request (title, state, SHAs, URLs).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestMeta {
    pub id: PullRequestId,
    pub title: String,
    pub description: Option<String>,
    /// Login of the human who opened the PR; never the bot.
    pub author: Option<String>,
    pub state: String,
    pub web_url: String,
    pub head_sha: String,
    pub base_sha: String,
    pub source_branch: Option<String>,
    pub target_branch: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One inline comment resolved to a diff position, ready for the review API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionedComment {
    pub path: String,
    pub position: u32,
    pub body: String,
}
