use llm_service::LlmConfig;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// API base for GitHub, e.g. "https://api.github.com".
    pub github_api_base: String,
    /// Token for the GitHub API (PAT or app token).
    pub github_token: String,
    /// Shared secret to protect the trigger endpoint from random callers.
    pub trigger_secret: String,
    /// Configuration for the LLM (Ollama).
    pub llm: LlmConfig,
}

impl AppState {
    /// Load shared state from environment variables.
    pub fn from_env() -> Self {
        Self {
            github_api_base: std::env::var("GITHUB_API_BASE")
                .unwrap_or_else(|_| "https://api.github.com".into()),
            github_token: std::env::var("GITHUB_TOKEN").expect("GITHUB_TOKEN is required"),
            trigger_secret: std::env::var("TRIGGER_SECRET").unwrap_or_default(),

            llm: LlmConfig::from_env(),
        }
    }
}
