//! Public entry for the pr-reviewer pipeline.
//!
//! Single high-level function to run the whole review for a pull request.
//!
//! 1) **Step 1 — Provider I/O + caching**
//!    - Fetch PR metadata to get `head_sha`
//!    - Try the large-diff file cache (return fast on hit)
//!    - Otherwise fetch the raw `.diff` and store it when large
//!
//! 2) **Step 2 — Diff parsing**
//!    - Split the diff into per-file records with line accounting
//!    - Report per-file parse failures without aborting the document
//!
//! 3) **Step 3 — Agent roster**
//!    - Fetch previous PR comments for conversational context
//!    - Run each agent over its glob-filtered diff subset via Ollama
//!
//! 4) **Step 4 — Publish**
//!    - Extract comment records from each review text
//!    - Resolve new-file lines to diff positions
//!    - Post one inline review plus a rollup comment for the rest
//!
//! The pipeline uses `tracing` for debug logging and avoids `async-trait`
//! and heap trait objects. Parsing is pure and synchronous; only the
//! provider and LLM calls are async.

pub mod cache;
pub mod diff;
pub mod errors;
pub mod git_providers;
pub mod publish;
pub mod review;

use std::time::Instant;

use llm_service::{LlmConfig, OllamaService};
use tracing::{debug, info, warn};

use errors::{Error, PrResult};
use git_providers::{ProviderConfig, PullRequestId, build_client};
use publish::{PublishConfig, PublishReport};

/// Final summary of one review run.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    /// Files successfully parsed out of the diff.
    pub files: usize,
    /// File sections that failed to parse (reported, not fatal).
    pub parse_failures: usize,
    /// Agents that produced a usable review text.
    pub reviews: usize,
    /// What was posted (or would have been, under dry-run).
    pub report: PublishReport,
}

/// Run the whole pipeline for a single pull request.
///
/// This is the single public entry to call from an HTTP handler when you
/// want a review fetched, generated and posted in one go.
pub async fn run_review(
    provider_cfg: ProviderConfig,
    id: PullRequestId,
    llm_cfg: LlmConfig,
    publish_cfg: PublishConfig,
) -> PrResult<ReviewOutcome> {
    // ---------------------------
    // Step 1: provider I/O + cache
    // ---------------------------
    let t0 = Instant::now();
    debug!("step1: init provider client");
    let client = build_client(&provider_cfg)?;

    debug!("step1: fetch meta to obtain head_sha");
    let meta = client.get_meta(&id).await?;
    let head_sha = meta.head_sha.clone();
    debug!(title = %meta.title, %head_sha, "step1: meta ok");

    let diff = if let Some(cached) = cache::load_diff(&id, &head_sha).await? {
        debug!(
            bytes = cached.len(),
            took_ms = t0.elapsed().as_millis(),
            "step1: diff cache hit"
        );
        cached
    } else {
        debug!("step1: cache miss, fetch diff");
        let fetched = client.get_diff(&id).await?;
        cache::maybe_store_diff(&id, &head_sha, &fetched).await?;
        debug!(
            bytes = fetched.len(),
            took_ms = t0.elapsed().as_millis(),
            "step1: diff fetched"
        );
        fetched
    };

    if diff.trim().is_empty() {
        return Err(Error::Validation(format!(
            "pull request {}#{} has no diff content",
            id.repo, id.number
        )));
    }

    // ---------------------------
    // Step 2: parse the document
    // ---------------------------
    let t2 = Instant::now();
    let doc = diff::DiffDocument::parse(&diff);
    for failure in doc.failures() {
        warn!(path = %failure.path, error = %failure.error, "step2: file section unparsable");
    }
    debug!(
        files = doc.len(),
        failures = doc.failures().len(),
        took_ms = t2.elapsed().as_millis(),
        "step2: document parsed"
    );

    // ---------------------------
    // Step 3: agent roster
    // ---------------------------
    let t3 = Instant::now();
    debug!("step3: fetch previous comments");
    let previous = client.list_issue_comments(&id).await?.join("\n\n");

    let llm = OllamaService::new(llm_cfg)?;
    let reviews = review::run_agents(&doc, &previous, &llm).await?;
    debug!(
        reviews = reviews.len(),
        took_ms = t3.elapsed().as_millis(),
        "step3: agent roster done"
    );

    // ---------------------------
    // Step 4: publish
    // ---------------------------
    let t4 = Instant::now();
    let report = publish::publish_review(&client, &id, &doc, &reviews, &publish_cfg).await?;
    debug!(took_ms = t4.elapsed().as_millis(), "step4: publish done");

    let outcome = ReviewOutcome {
        files: doc.len(),
        parse_failures: doc.failures().len(),
        reviews: reviews.len(),
        report,
    };
    info!(
        files = outcome.files,
        parse_failures = outcome.parse_failures,
        reviews = outcome.reviews,
        inline = outcome.report.inline,
        skipped = outcome.report.skipped,
        rollups = outcome.report.rollups,
        total_ms = t0.elapsed().as_millis(),
        "review finished"
    );
    Ok(outcome)
}

// -----------------------------------------------------------------------------
// Convenience re-exports for downstream users
// -----------------------------------------------------------------------------

pub use diff::{DiffDocument, FileDiff, filter::PatternSet, position::position_for_line};
pub use git_providers::{ProviderConfig as ReviewerProviderConfig, PullRequestId as ReviewerPrId};
pub use publish::PublishConfig as ReviewerPublishConfig;
pub use review::extract::{CommentPlan, CommentRecord};
