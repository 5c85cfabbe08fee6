//! Keyword extraction — one LLM call per request turns the job description
//! into the keyword list shared by every file in the batch.

use tracing::warn;

use crate::evaluation::prompts::{KEYWORD_PROMPT_TEMPLATE, KEYWORD_SYSTEM};
use crate::llm_client::TextGenerator;

/// Extracts job keywords from a job description.
///
/// A failed model call yields an empty list; match evaluation then reports
/// the no-keywords warning per file instead of surfacing a transport error
/// for the whole batch.
pub async fn extract_keywords(generator: &dyn TextGenerator, job_description: &str) -> Vec<String> {
    let prompt = KEYWORD_PROMPT_TEMPLATE.replace("{job_description}", job_description);

    let response = match generator.generate(&prompt, KEYWORD_SYSTEM).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Keyword extraction failed: {e}");
            return Vec::new();
        }
    };

    split_keywords(&response)
}

/// Splits a comma-separated model reply into trimmed, non-empty keywords.
pub fn split_keywords(response: &str) -> Vec<String> {
    response
        .split(',')
        .map(str::trim)
        .filter(|kw| !kw.is_empty())
        .map(str::to_string)
        .collect()
}
