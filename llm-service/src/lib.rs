//! Shared LLM service: a thin Ollama client with unified errors.
//!
//! The review pipeline treats the model as an opaque prompt-in/text-out
//! collaborator; this crate owns the transport details.

pub mod config;
pub mod ollama;

pub use config::LlmConfig;
pub use ollama::{OllamaError, OllamaService};
