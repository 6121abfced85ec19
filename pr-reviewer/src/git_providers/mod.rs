//! Provider layer: configuration plus the concrete GitHub client.
//!
//! Only GitHub is supported; the original deployment is GitHub-only, so
//! there is no multi-provider dispatch to carry.

pub mod types;
pub use types::*;

pub mod github;
pub use github::GitHubClient;

use std::time::Duration;

use crate::errors::{ConfigError, PrResult};

/// Runtime configuration for the provider client.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// API base, e.g. "https://api.github.com".
    pub base_api: String,
    /// Personal access token (or app token) for the API.
    pub token: String,
}

impl ProviderConfig {
    /// Loads provider settings from the environment.
    ///
    /// `GITHUB_TOKEN` is required; `GITHUB_API_BASE` defaults to the public
    /// endpoint.
    pub fn from_env() -> PrResult<Self> {
        let token = std::env::var("GITHUB_TOKEN").map_err(|_| ConfigError::MissingToken)?;
        let base_api = std::env::var("GITHUB_API_BASE")
            .unwrap_or_else(|_| "https://api.github.com".to_string());
        if !(base_api.starts_with("http://") || base_api.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(base_api).into());
        }
        Ok(Self { base_api, token })
    }
}

/// Builds the GitHub client with sane transport timeouts.
pub fn build_client(cfg: &ProviderConfig) -> PrResult<GitHubClient> {
    let http = reqwest::Client::builder()
        .user_agent("pr-reviewer/0.1")
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .build()?;
    Ok(GitHubClient::new(
        http,
        cfg.base_api.clone(),
        cfg.token.clone(),
    ))
}
