//! Response Parser — pulls structured fields out of free-text model replies.
//!
//! The model is instructed to answer in a fixed textual layout, but nothing
//! enforces it, so every extraction degrades to a fixed placeholder or 0
//! instead of erroring. Scores are taken verbatim; an out-of-range value is
//! passed through rather than flagged.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::evaluation::models::{EvaluationResult, Mode};

/// Placeholder when a bracketed keyword list is absent from the reply.
const KEYWORDS_NOT_FOUND: &str = "Not Found";
/// Placeholder when the final-thoughts sentence is absent.
const NO_FINAL_THOUGHTS: &str = "Could not extract final thoughts.";

static SCORE_OVER_100: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,3})\s*/\s*100\b").unwrap());
static SCORE_LABELED: Lazy<Regex> = Lazy::new(|| Regex::new(r"Score:\s*(\d{1,3})").unwrap());
static MATCHED_KEYWORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)Matched Keywords:\s*\[(.*?)\]").unwrap());
static MISSING_KEYWORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)Missing Keywords:\s*\[(.*?)\]").unwrap());
// Line-scoped on purpose: final thoughts are requested as a single sentence.
static FINAL_THOUGHTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"Final Thoughts:\s*(.*)").unwrap());
static AUDIT_FEEDBACK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)Feedback:\s*(.*?)(?:Career Path:|$)").unwrap());
static CAREER_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"Career Path:\s*(.*)").unwrap());

/// Extracts a 0-padded score from model output.
///
/// First match of `N/100` wins, then a labeled `Score: N`, then 0.
pub fn extract_score(text: &str) -> u32 {
    if let Some(caps) = SCORE_OVER_100.captures(text) {
        return caps[1].parse().unwrap_or(0);
    }
    if let Some(caps) = SCORE_LABELED.captures(text) {
        return caps[1].parse().unwrap_or(0);
    }
    0
}

/// Converts a raw model reply into the per-file result for the given mode.
pub fn parse_response(mode: Mode, filename: &str, raw: &str) -> EvaluationResult {
    match mode {
        Mode::Match => parse_match(filename, raw),
        Mode::TechAudit => parse_tech_audit(filename, raw),
        // Improve passes the reply through unchanged. Unknown never reaches
        // the model, but the passthrough keeps the match exhaustive.
        Mode::Improve | Mode::Unknown => EvaluationResult::feedback_only(filename, raw),
    }
}

fn parse_match(filename: &str, raw: &str) -> EvaluationResult {
    let matched =
        capture(&MATCHED_KEYWORDS, raw).unwrap_or_else(|| KEYWORDS_NOT_FOUND.to_string());
    let missing =
        capture(&MISSING_KEYWORDS, raw).unwrap_or_else(|| KEYWORDS_NOT_FOUND.to_string());
    let feedback = capture(&FINAL_THOUGHTS, raw).unwrap_or_else(|| NO_FINAL_THOUGHTS.to_string());

    EvaluationResult {
        filename: filename.to_string(),
        score: Some(extract_score(raw)),
        matched: Some(matched),
        missing: Some(missing),
        feedback,
        career_path: None,
        modern_score: None,
    }
}

fn parse_tech_audit(filename: &str, raw: &str) -> EvaluationResult {
    // Feedback runs up to the career-path header or end of reply; a reply
    // without the header is used whole.
    let feedback = capture(&AUDIT_FEEDBACK, raw).unwrap_or_else(|| raw.to_string());
    let career_path = capture(&CAREER_PATH, raw).unwrap_or_default();

    EvaluationResult {
        filename: filename.to_string(),
        score: None,
        matched: None,
        missing: None,
        feedback,
        career_path: Some(career_path),
        modern_score: Some(extract_score(raw)),
    }
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text).map(|caps| caps[1].trim().to_string())
}
