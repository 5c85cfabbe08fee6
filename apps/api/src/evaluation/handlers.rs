//! Axum route handlers for the Evaluation API.
//!
//! Flow: multipart collection → validation → (match mode) one keyword
//! extraction call → per file: OCR → prompt → model → parse → aggregate.
//! Files are processed strictly sequentially; a failing file is recorded
//! and the batch continues.

use axum::extract::{Multipart, State};
use axum::Json;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::evaluation::keywords::extract_keywords;
use crate::evaluation::models::{
    sort_by_score_desc, EvaluationForm, EvaluationResult, Mode, Role, UploadedResume,
};
use crate::evaluation::pipeline::evaluate_resume;
use crate::extract::TextExtractor;
use crate::llm_client::TextGenerator;
use crate::state::AppState;

/// Feedback for a file whose text could not be extracted.
pub const EXTRACTION_FAILURE_FEEDBACK: &str = "Failed to extract text from resume.";

/// POST /evaluate-resumes
///
/// Multipart form: `role` (default candidate), `mode` (default match),
/// `job_description`, repeated file field `resumes`.
///
/// Returns a JSON array of per-file results; match mode sorts by score
/// descending. Validation failures return 400 with `{"error": message}`.
/// A batch with some failed files still returns 200 with mixed entries.
pub async fn handle_evaluate_resumes(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Vec<EvaluationResult>>, AppError> {
    let form = collect_form(multipart).await?;
    validate_form(&form)?;

    let results = process_batch(state.extractor.as_ref(), state.llm.as_ref(), &form).await;

    info!(
        "Evaluated {} resume(s) in {:?} mode",
        results.len(),
        form.mode
    );

    Ok(Json(results))
}

/// Drains the multipart stream into an `EvaluationForm`.
/// Field order is caller-controlled, so everything is collected before any
/// validation runs.
async fn collect_form(mut multipart: Multipart) -> Result<EvaluationForm, AppError> {
    let mut role_value: Option<String> = None;
    let mut mode_value: Option<String> = None;
    let mut job_description: Option<String> = None;
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "role" => role_value = Some(field.text().await?),
            "mode" => mode_value = Some(field.text().await?),
            "job_description" => job_description = Some(field.text().await?),
            "resumes" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                files.push(UploadedResume { filename, data });
            }
            // Unrecognized fields are ignored, not rejected.
            _ => {}
        }
    }

    Ok(EvaluationForm {
        role: Role::from_form_value(role_value.as_deref()),
        mode: Mode::from_form_value(mode_value.as_deref()),
        job_description,
        files,
    })
}

/// Validation state machine. Checks run in a fixed order; the first failing
/// check terminates the request with 400.
fn validate_form(form: &EvaluationForm) -> Result<(), AppError> {
    if form.files.is_empty() {
        return Err(AppError::Validation(
            "Please upload at least one resume file.".to_string(),
        ));
    }

    if form.files.iter().all(|f| f.filename.is_empty()) {
        return Err(AppError::Validation("Resume files are empty.".to_string()));
    }

    if form.role == Role::Candidate && form.files.len() != 1 {
        return Err(AppError::Validation(
            "Candidate mode only supports one resume.".to_string(),
        ));
    }

    if form.role == Role::Recruiter {
        if form.mode != Mode::Match {
            return Err(AppError::Validation(
                "Recruiter mode only supports ATS Match Check.".to_string(),
            ));
        }
        if form.job_description.is_none() {
            return Err(AppError::Validation(
                "Job description is required for recruiter mode.".to_string(),
            ));
        }
    }

    if form.mode == Mode::Match && trimmed_job_description(form).is_empty() {
        return Err(AppError::Validation(
            "Job description is required for ATS Match Check.".to_string(),
        ));
    }

    Ok(())
}

fn trimmed_job_description(form: &EvaluationForm) -> &str {
    form.job_description.as_deref().map(str::trim).unwrap_or("")
}

/// Runs the evaluation pipeline over a validated form.
///
/// Match mode extracts keywords once and reuses them for every file, then
/// sorts the aggregated results by score (stable, descending).
async fn process_batch(
    extractor: &dyn TextExtractor,
    generator: &dyn TextGenerator,
    form: &EvaluationForm,
) -> Vec<EvaluationResult> {
    let keywords = if form.mode == Mode::Match {
        extract_keywords(generator, trimmed_job_description(form)).await
    } else {
        Vec::new()
    };

    let mut results = Vec::with_capacity(form.files.len());
    for file in &form.files {
        let resume_text = match extractor.extract_text(file.data.clone()).await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => {
                warn!("No text recognized in {}", file.filename);
                results.push(EvaluationResult::feedback_only(
                    &file.filename,
                    EXTRACTION_FAILURE_FEEDBACK,
                ));
                continue;
            }
            Err(e) => {
                warn!("Text extraction failed for {}: {e:#}", file.filename);
                results.push(EvaluationResult::feedback_only(
                    &file.filename,
                    EXTRACTION_FAILURE_FEEDBACK,
                ));
                continue;
            }
        };

        let result = evaluate_resume(
            generator,
            form.mode,
            &file.filename,
            &resume_text,
            &keywords,
        )
        .await;
        results.push(result);
    }

    if form.mode == Mode::Match {
        sort_by_score_desc(&mut results);
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::{LlmError, TextGenerator};
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    fn file(filename: &str, data: &str) -> UploadedResume {
        UploadedResume {
            filename: filename.to_string(),
            data: Bytes::copy_from_slice(data.as_bytes()),
        }
    }

    fn form(role: Role, mode: Mode, jd: Option<&str>, files: Vec<UploadedResume>) -> EvaluationForm {
        EvaluationForm {
            role,
            mode,
            job_description: jd.map(str::to_string),
            files,
        }
    }

    fn validation_message(result: Result<(), AppError>) -> String {
        match result {
            Err(AppError::Validation(msg)) => msg,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    /// Extractor that echoes the upload bytes as text, failing on the
    /// sentinel payload "unreadable" and returning no text for "blank".
    struct EchoExtractor;

    #[async_trait]
    impl TextExtractor for EchoExtractor {
        async fn extract_text(&self, pdf_bytes: Bytes) -> Result<String> {
            let text = String::from_utf8_lossy(&pdf_bytes).to_string();
            match text.as_str() {
                "unreadable" => Err(anyhow!("rasterization failed")),
                "blank" => Ok(String::new()),
                _ => Ok(text),
            }
        }
    }

    /// Generator that replays scripted replies in call order.
    struct ScriptedGenerator(Mutex<VecDeque<&'static str>>);

    impl ScriptedGenerator {
        fn new(replies: &[&'static str]) -> Self {
            Self(Mutex::new(replies.iter().copied().collect()))
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            let reply = self
                .0
                .lock()
                .expect("script lock poisoned")
                .pop_front()
                .expect("generator called more times than scripted");
            Ok(reply.to_string())
        }
    }

    #[test]
    fn test_missing_resumes_field_rejected() {
        let result = validate_form(&form(Role::Candidate, Mode::Match, Some("JD"), vec![]));
        assert_eq!(
            validation_message(result),
            "Please upload at least one resume file."
        );
    }

    #[test]
    fn test_all_empty_filenames_rejected() {
        let files = vec![file("", "data"), file("", "data")];
        let result = validate_form(&form(Role::Other, Mode::Match, Some("JD"), files));
        assert_eq!(validation_message(result), "Resume files are empty.");
    }

    #[test]
    fn test_candidate_with_two_files_rejected() {
        let files = vec![file("a.pdf", "x"), file("b.pdf", "y")];
        let result = validate_form(&form(Role::Candidate, Mode::Match, Some("JD"), files));
        assert_eq!(
            validation_message(result),
            "Candidate mode only supports one resume."
        );
    }

    #[test]
    fn test_recruiter_restricted_to_match() {
        let files = vec![file("a.pdf", "x")];
        let result = validate_form(&form(Role::Recruiter, Mode::TechAudit, Some("JD"), files));
        assert_eq!(
            validation_message(result),
            "Recruiter mode only supports ATS Match Check."
        );
    }

    #[test]
    fn test_recruiter_requires_job_description_field() {
        let files = vec![file("a.pdf", "x")];
        let result = validate_form(&form(Role::Recruiter, Mode::Match, None, files));
        assert_eq!(
            validation_message(result),
            "Job description is required for recruiter mode."
        );
    }

    #[test]
    fn test_match_requires_nonblank_job_description() {
        let files = vec![file("a.pdf", "x")];
        let result = validate_form(&form(Role::Candidate, Mode::Match, Some("   \n"), files));
        assert_eq!(
            validation_message(result),
            "Job description is required for ATS Match Check."
        );
    }

    #[test]
    fn test_improve_mode_needs_no_job_description() {
        let files = vec![file("a.pdf", "x")];
        assert!(validate_form(&form(Role::Candidate, Mode::Improve, None, files)).is_ok());
    }

    #[test]
    fn test_unknown_mode_passes_candidate_validation() {
        let files = vec![file("a.pdf", "x")];
        assert!(validate_form(&form(Role::Candidate, Mode::Unknown, None, files)).is_ok());
    }

    #[test]
    fn test_recruiter_batch_accepted() {
        let files = vec![file("a.pdf", "x"), file("b.pdf", "y"), file("c.pdf", "z")];
        assert!(validate_form(&form(Role::Recruiter, Mode::Match, Some("JD"), files)).is_ok());
    }

    #[tokio::test]
    async fn test_batch_sorted_by_score_descending() {
        // First scripted reply is keyword extraction, then one per file.
        let generator = ScriptedGenerator::new(&[
            "Rust, Tokio",
            "Score: 10/100\nFinal Thoughts: Weak.",
            "Score: 90/100\nFinal Thoughts: Strong.",
            "Score: 50/100\nFinal Thoughts: Middling.",
        ]);
        let files = vec![
            file("low.pdf", "resume one"),
            file("high.pdf", "resume two"),
            file("mid.pdf", "resume three"),
        ];
        let form = form(Role::Recruiter, Mode::Match, Some("Rust backend role"), files);

        let results = process_batch(&EchoExtractor, &generator, &form).await;

        let order: Vec<&str> = results.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(order, vec!["high.pdf", "mid.pdf", "low.pdf"]);
        assert_eq!(results[0].score, Some(90));
    }

    #[tokio::test]
    async fn test_extraction_failure_is_localized_to_one_file() {
        let generator = ScriptedGenerator::new(&[
            "Rust",
            "Score: 70/100\nFinal Thoughts: Fine.",
            "Score: 60/100\nFinal Thoughts: Fine.",
        ]);
        let files = vec![
            file("good1.pdf", "resume one"),
            file("scan.pdf", "unreadable"),
            file("good2.pdf", "resume two"),
        ];
        let form = form(Role::Recruiter, Mode::Match, Some("Rust role"), files);

        let results = process_batch(&EchoExtractor, &generator, &form).await;

        assert_eq!(results.len(), 3);
        let failed = results
            .iter()
            .find(|r| r.filename == "scan.pdf")
            .expect("failed file present in results");
        assert_eq!(failed.feedback, EXTRACTION_FAILURE_FEEDBACK);
        assert!(failed.score.is_none());
        // The other two still parsed normally and sorted ahead of the failure.
        assert_eq!(results[0].score, Some(70));
        assert_eq!(results[1].score, Some(60));
    }

    #[tokio::test]
    async fn test_empty_extracted_text_counts_as_failure() {
        let generator = ScriptedGenerator::new(&[]);
        let files = vec![file("blank.pdf", "blank")];
        let form = form(Role::Candidate, Mode::Improve, None, files);

        let results = process_batch(&EchoExtractor, &generator, &form).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].feedback, EXTRACTION_FAILURE_FEEDBACK);
    }

    #[tokio::test]
    async fn test_improve_mode_skips_keyword_extraction() {
        // Only one scripted reply: the per-file improve call. A keyword
        // extraction call would exhaust the script and panic.
        let generator = ScriptedGenerator::new(&["Tighten the summary section."]);
        let files = vec![file("a.pdf", "resume text")];
        let form = form(Role::Candidate, Mode::Improve, None, files);

        let results = process_batch(&EchoExtractor, &generator, &form).await;

        assert_eq!(results[0].feedback, "Tighten the summary section.");
    }
}
