//! Lightweight Ollama service for text generation.
//!
//! This module implements a thin client for the local Ollama API:
//! - `POST {endpoint}/api/generate` — synchronous text generation (`stream=false`)
//! - `GET  {endpoint}/api/tags`     — connectivity probe
//!
//! The probe exists because the pipeline refuses to start a review against a
//! dead inference server; better one early error than one per agent.

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::LlmConfig;

/// Errors produced by [`OllamaService`].
#[derive(Debug, Error)]
pub enum OllamaError {
    /// Invalid endpoint (empty or missing http/https).
    #[error("invalid Ollama endpoint: {0}")]
    InvalidEndpoint(String),

    /// Transport/HTTP client error.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-successful HTTP status from upstream.
    #[error("unexpected HTTP status {status} from {url}: {snippet}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        /// Short snippet of the response body, for operator logs.
        snippet: String,
    },

    /// Unexpected/invalid JSON response.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The model produced an empty completion.
    #[error("model returned an empty response")]
    Empty,
}

/// Result alias for Ollama operations.
pub type Result<T> = std::result::Result<T, OllamaError>;

/// Thin client for Ollama. Reuses one HTTP client with a configurable
/// timeout; the service itself is stateless between calls.
#[derive(Debug, Clone)]
pub struct OllamaService {
    client: reqwest::Client,
    cfg: LlmConfig,
    url_generate: String,
    url_tags: String,
}

impl OllamaService {
    /// Creates a new [`OllamaService`] from the given config.
    ///
    /// # Errors
    /// - [`OllamaError::InvalidEndpoint`] if `cfg.endpoint` is not http(s)
    /// - [`OllamaError::Transport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmConfig) -> Result<Self> {
        let endpoint = cfg.endpoint.trim().trim_end_matches('/');
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(OllamaError::InvalidEndpoint(cfg.endpoint.clone()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;

        Ok(Self {
            url_generate: format!("{endpoint}/api/generate"),
            url_tags: format!("{endpoint}/api/tags"),
            client,
            cfg,
        })
    }

    /// Generates a completion for `prompt` and returns the trimmed text.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        #[derive(Serialize)]
        struct Options {
            temperature: f32,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            prompt: &'a str,
            stream: bool,
            options: Options,
        }
        #[derive(Deserialize)]
        struct Resp {
            response: String,
        }

        debug!(model = %self.cfg.model, url = %self.url_generate, "llm.generate");
        let resp = self
            .client
            .post(&self.url_generate)
            .json(&Req {
                model: &self.cfg.model,
                prompt,
                stream: false,
                options: Options {
                    temperature: self.cfg.temperature,
                },
            })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let snippet = snippet_of(resp.text().await.unwrap_or_default());
            return Err(OllamaError::HttpStatus {
                status,
                url: self.url_generate.clone(),
                snippet,
            });
        }

        let body: Resp = resp
            .json()
            .await
            .map_err(|e| OllamaError::Decode(e.to_string()))?;
        let text = body.response.trim().to_string();
        if text.is_empty() {
            return Err(OllamaError::Empty);
        }
        Ok(text)
    }

    /// Probes the endpoint; `true` when Ollama answers `/api/tags`.
    pub async fn check_connection(&self) -> bool {
        match self.client.get(&self.url_tags).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!(error = %e, "ollama connectivity probe failed");
                false
            }
        }
    }
}

fn snippet_of(body: String) -> String {
    const MAX: usize = 200;
    if body.chars().count() <= MAX {
        body
    } else {
        body.chars().take(MAX).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_http_endpoint() {
        let cfg = LlmConfig {
            model: "llama3:latest".into(),
            endpoint: "localhost:11434".into(),
            temperature: 0.0,
            timeout_secs: 5,
        };
        assert!(matches!(
            OllamaService::new(cfg),
            Err(OllamaError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn accepts_http_endpoint_with_trailing_slash() {
        let cfg = LlmConfig {
            model: "llama3:latest".into(),
            endpoint: "http://localhost:11434/".into(),
            temperature: 0.0,
            timeout_secs: 5,
        };
        let svc = OllamaService::new(cfg).unwrap();
        assert_eq!(svc.url_generate, "http://localhost:11434/api/generate");
    }
}
