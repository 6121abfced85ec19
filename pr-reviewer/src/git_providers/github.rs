//! GitHub provider (REST v3) for PR metadata, diffs and review comments.
//!
//! Endpoints used:
//! - GET  /repos/{owner}/{repo}/pulls/{number}
//! - GET  /repos/{owner}/{repo}/pulls/{number}            (Accept: .diff media type)
//! - GET  /repos/{owner}/{repo}/issues/{number}/comments
//! - POST /repos/{owner}/{repo}/pulls/{number}/reviews    (inline batch)
//! - POST /repos/{owner}/{repo}/issues/{number}/comments  (general rollup)

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::errors::{Error, PrResult};
use crate::git_providers::types::*;

/// Media type that makes the pulls endpoint return a raw unified diff.
const DIFF_MEDIA_TYPE: &str = "application/vnd.github.v3.diff";
const JSON_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base_api: String, // "https://api.github.com"
    token: String,
}

impl GitHubClient {
    /// Constructs a GitHub client with a shared reqwest instance and PAT.
    pub fn new(http: Client, base_api: String, token: String) -> Self {
        Self {
            http,
            base_api: base_api.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn auth(&self) -> String {
        format!("token {}", self.token)
    }

    /// Fetches PR metadata, including head/base SHAs for cache scoping.
    pub async fn get_meta(&self, id: &PullRequestId) -> PrResult<PullRequestMeta> {
        let url = format!("{}/repos/{}/pulls/{}", self.base_api, id.repo, id.number);
        let resp: GitHubPull = self
            .http
            .get(url)
            .header("Authorization", self.auth())
            .header("Accept", JSON_MEDIA_TYPE)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(PullRequestMeta {
            id: id.clone(),
            title: resp.title,
            description: resp.body,
            author: resp.user.map(|u| u.login),
            state: resp.state,
            web_url: resp.html_url,
            head_sha: resp.head.sha,
            base_sha: resp.base.sha,
            source_branch: Some(resp.head.r#ref),
            target_branch: Some(resp.base.r#ref),
            created_at: resp.created_at,
            updated_at: resp.updated_at,
        })
    }

    /// Fetches the PR's raw unified diff (the `.diff` media type).
    pub async fn get_diff(&self, id: &PullRequestId) -> PrResult<String> {
        let url = format!("{}/repos/{}/pulls/{}", self.base_api, id.repo, id.number);
        debug!(repo = %id.repo, number = id.number, "fetching pull request diff");
        let text = self
            .http
            .get(url)
            .header("Authorization", self.auth())
            .header("Accept", DIFF_MEDIA_TYPE)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(text)
    }

    /// Fetches the bodies of previous issue comments on the PR. Used as
    /// conversational context for the reviewer prompts.
    pub async fn list_issue_comments(&self, id: &PullRequestId) -> PrResult<Vec<String>> {
        let url = format!(
            "{}/repos/{}/issues/{}/comments?per_page=100",
            self.base_api, id.repo, id.number
        );
        let comments: Vec<IssueComment> = self
            .http
            .get(url)
            .header("Authorization", self.auth())
            .header("Accept", JSON_MEDIA_TYPE)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(comments.into_iter().filter_map(|c| c.body).collect())
    }

    /// Posts one review carrying the whole inline comment batch.
    pub async fn create_review(
        &self,
        id: &PullRequestId,
        body: &str,
        comments: &[PositionedComment],
    ) -> PrResult<()> {
        let url = format!(
            "{}/repos/{}/pulls/{}/reviews",
            self.base_api, id.repo, id.number
        );

        #[derive(serde::Serialize)]
        struct Req<'a> {
            body: &'a str,
            event: &'a str,
            comments: &'a [PositionedComment],
        }

        debug!(
            repo = %id.repo,
            number = id.number,
            comments = comments.len(),
            "posting inline review"
        );
        let resp = self
            .http
            .post(&url)
            .header("Authorization", self.auth())
            .header("Accept", JSON_MEDIA_TYPE)
            .json(&Req {
                body,
                event: "COMMENT",
                comments,
            })
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Error::Validation(format!(
                "github review post failed: status={} body={:?}",
                resp.status(),
                resp.text().await.ok()
            )));
        }
        Ok(())
    }

    /// Posts one general comment on the PR conversation (rollup fallback).
    pub async fn create_issue_comment(&self, id: &PullRequestId, body: &str) -> PrResult<()> {
        let url = format!(
            "{}/repos/{}/issues/{}/comments",
            self.base_api, id.repo, id.number
        );

        #[derive(serde::Serialize)]
        struct Req<'a> {
            body: &'a str,
        }

        debug!(repo = %id.repo, number = id.number, "posting general comment");
        let resp = self
            .http
            .post(&url)
            .header("Authorization", self.auth())
            .header("Accept", JSON_MEDIA_TYPE)
            .json(&Req { body })
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Error::Validation(format!(
                "github comment post failed: status={} body={:?}",
                resp.status(),
                resp.text().await.ok()
            )));
        }
        Ok(())
    }
}

// ===== Raw GitHub payload shapes =====

#[derive(Deserialize)]
struct GitHubPull {
    title: String,
    body: Option<String>,
    state: String,
    html_url: String,
    user: Option<GitHubUser>,
    head: GitHubRef,
    base: GitHubRef,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct GitHubUser {
    login: String,
}

#[derive(Deserialize)]
struct GitHubRef {
    sha: String,
    r#ref: String,
}

#[derive(Deserialize)]
struct IssueComment {
    body: Option<String>,
}
