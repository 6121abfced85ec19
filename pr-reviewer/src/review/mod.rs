//! Agent orchestration: filter, format, prompt, generate.
//!
//! Flow per agent:
//!   1) Select the agent's file subset via its glob table;
//!   2) Render the subset plus previous PR comments into a prompt;
//!   3) Generate the review text via Ollama.
//!
//! One agent's failure (LLM down, empty output) is logged and never aborts
//! the rest of the roster.

pub mod agents;
pub mod extract;
pub mod prompt;

use std::time::Instant;

use llm_service::OllamaService;
use tracing::{debug, info, warn};

use crate::diff::DiffDocument;
use crate::errors::PrResult;
use agents::{AgentKind, AgentProfile};
use prompt::build_agent_prompt;

/// One agent's raw review text, ready for comment extraction.
#[derive(Debug, Clone)]
pub struct AgentReview {
    pub kind: AgentKind,
    pub text: String,
}

/// Runs the full roster over the parsed diff. Returns only the reviews that
/// produced usable text.
pub async fn run_agents(
    doc: &DiffDocument,
    previous_comments: &str,
    llm: &OllamaService,
) -> PrResult<Vec<AgentReview>> {
    let roster = AgentProfile::roster()?;
    let mut reviews = Vec::new();

    for profile in &roster {
        let t0 = Instant::now();
        let name = profile.kind.display_name();

        let selected = doc.select(&profile.patterns);
        if selected.is_empty() {
            debug!(agent = name, "no matching files, agent skipped");
            continue;
        }

        let rendered = selected.render_for_prompt();
        let prompt = build_agent_prompt(profile, &rendered, previous_comments);
        debug!(
            agent = name,
            files = selected.len(),
            prompt_chars = prompt.len(),
            "agent prompt built"
        );

        match llm.generate(&prompt).await {
            Ok(text) => {
                debug!(
                    agent = name,
                    chars = text.len(),
                    took_ms = t0.elapsed().as_millis(),
                    "agent review generated"
                );
                reviews.push(AgentReview {
                    kind: profile.kind,
                    text,
                });
            }
            Err(e) => {
                warn!(agent = name, error = %e, "agent review failed, continuing with the rest");
            }
        }
    }

    info!(
        agents = roster.len(),
        reviews = reviews.len(),
        "agent roster finished"
    );
    Ok(reviews)
}
