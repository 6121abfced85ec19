//! Model configuration for the Ollama endpoint.

/// Universal per-model configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Model name as installed in Ollama, e.g. "llama3:latest".
    pub model: String,
    /// Endpoint base, e.g. "http://localhost:11434".
    pub endpoint: String,
    /// Sampling temperature; reviews want deterministic output, so 0.0.
    pub temperature: f32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl LlmConfig {
    /// Loads model settings from the environment with local defaults.
    ///
    /// Prefers an explicit `OLLAMA_URL`; otherwise builds one from
    /// `OLLAMA_PORT` on localhost.
    pub fn from_env() -> Self {
        let endpoint = std::env::var("OLLAMA_URL").unwrap_or_else(|_| {
            let port = std::env::var("OLLAMA_PORT").unwrap_or_else(|_| "11434".into());
            format!("http://localhost:{port}")
        });
        let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3:latest".into());
        let temperature = std::env::var("OLLAMA_TEMPERATURE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.0);
        let timeout_secs = std::env::var("OLLAMA_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(120);

        Self {
            model,
            endpoint,
            temperature,
            timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_ollama() {
        let cfg = LlmConfig {
            model: "llama3:latest".into(),
            endpoint: "http://localhost:11434".into(),
            temperature: 0.0,
            timeout_secs: 120,
        };
        assert!(cfg.endpoint.starts_with("http://localhost"));
        assert_eq!(cfg.temperature, 0.0);
    }
}
