//! Per-file evaluation pipeline: prompt construction, model dispatch,
//! response parsing.
//!
//! Model failures never abort a batch or surface as HTTP errors: the file's
//! result carries a fixed failure string as its feedback instead.

use tracing::warn;

use crate::evaluation::models::{EvaluationResult, Mode};
use crate::evaluation::parser::parse_response;
use crate::evaluation::prompts::{
    IMPROVE_PROMPT_TEMPLATE, IMPROVE_SYSTEM, MATCH_PROMPT_TEMPLATE, MATCH_SYSTEM,
    TECH_AUDIT_PROMPT_TEMPLATE, TECH_AUDIT_SYSTEM,
};
use crate::llm_client::TextGenerator;

/// Feedback emitted when the hosted-model call fails.
pub const LLM_FAILURE_FEEDBACK: &str = "LLM evaluation failed. Please try again later.";
/// Feedback for match mode when no keywords could be derived.
pub const NO_KEYWORDS_WARNING: &str = "No job description provided for ATS Match Check.";
/// Feedback for a mode outside the supported set.
pub const UNKNOWN_MODE_FEEDBACK: &str = "Unknown evaluation mode.";

/// What the prompt builder decided for one file.
#[derive(Debug, PartialEq, Eq)]
pub enum PromptOutcome {
    /// Send this prompt to the model.
    Prompt {
        system: &'static str,
        prompt: String,
    },
    /// Emit this feedback directly; the model is not consulted.
    Fixed(&'static str),
}

/// Builds the mode-specific prompt for one extracted resume.
pub fn build_prompt(mode: Mode, resume_text: &str, keywords: &[String]) -> PromptOutcome {
    match mode {
        Mode::Match => {
            if keywords.is_empty() {
                return PromptOutcome::Fixed(NO_KEYWORDS_WARNING);
            }
            PromptOutcome::Prompt {
                system: MATCH_SYSTEM,
                prompt: MATCH_PROMPT_TEMPLATE
                    .replace("{keywords}", &keywords.join(", "))
                    .replace("{resume_text}", resume_text),
            }
        }
        Mode::TechAudit => PromptOutcome::Prompt {
            system: TECH_AUDIT_SYSTEM,
            prompt: TECH_AUDIT_PROMPT_TEMPLATE.replace("{resume_text}", resume_text),
        },
        Mode::Improve => PromptOutcome::Prompt {
            system: IMPROVE_SYSTEM,
            prompt: IMPROVE_PROMPT_TEMPLATE.replace("{resume_text}", resume_text),
        },
        Mode::Unknown => PromptOutcome::Fixed(UNKNOWN_MODE_FEEDBACK),
    }
}

/// Evaluates one extracted resume: prompt → model → parse.
pub async fn evaluate_resume(
    generator: &dyn TextGenerator,
    mode: Mode,
    filename: &str,
    resume_text: &str,
    keywords: &[String],
) -> EvaluationResult {
    let (system, prompt) = match build_prompt(mode, resume_text, keywords) {
        PromptOutcome::Prompt { system, prompt } => (system, prompt),
        PromptOutcome::Fixed(feedback) => {
            return EvaluationResult::feedback_only(filename, feedback)
        }
    };

    let raw = match generator.generate(&prompt, system).await {
        Ok(text) => text,
        Err(e) => {
            warn!("LLM call failed for {filename}: {e}");
            return EvaluationResult::feedback_only(filename, LLM_FAILURE_FEEDBACK);
        }
    };

    parse_response(mode, filename, &raw)
}
