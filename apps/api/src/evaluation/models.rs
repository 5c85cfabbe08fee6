//! Request and response data models for resume evaluation.

use bytes::Bytes;
use serde::Serialize;

/// Caller perspective: a candidate self-checks a single resume, a recruiter
/// screens a batch against one job description.
///
/// Parsed leniently from the form string: a value outside the known set
/// carries no role restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Candidate,
    Recruiter,
    Other,
}

impl Role {
    /// Maps the `role` form field to a role. Absent field defaults to candidate.
    pub fn from_form_value(value: Option<&str>) -> Self {
        match value {
            None | Some("candidate") => Role::Candidate,
            Some("recruiter") => Role::Recruiter,
            Some(_) => Role::Other,
        }
    }
}

/// Evaluation strategy: which prompt template and response parser apply.
///
/// `Unknown` survives validation (unless the role is recruiter) and yields a
/// fixed per-file feedback string without ever consulting the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Match,
    TechAudit,
    Improve,
    Unknown,
}

impl Mode {
    /// Maps the `mode` form field to a mode. Absent field defaults to match.
    pub fn from_form_value(value: Option<&str>) -> Self {
        match value {
            None | Some("match") => Mode::Match,
            Some("tech_audit") => Mode::TechAudit,
            Some("improve") => Mode::Improve,
            Some(_) => Mode::Unknown,
        }
    }
}

/// One uploaded resume file, as received from the multipart stream.
#[derive(Debug, Clone)]
pub struct UploadedResume {
    pub filename: String,
    pub data: Bytes,
}

/// The collected multipart form, prior to validation.
#[derive(Debug, Clone)]
pub struct EvaluationForm {
    pub role: Role,
    pub mode: Mode,
    /// Raw field value; presence (even empty) matters for recruiter validation.
    pub job_description: Option<String>,
    pub files: Vec<UploadedResume>,
}

/// Per-file evaluation outcome, serialized into the response array.
///
/// Field population is mode-dependent: match fills `score`/`matched`/
/// `missing`, tech_audit fills `career_path`/`modern_score`, improve and
/// error entries carry `feedback` alone. Absent fields are omitted from
/// the JSON rather than serialized as null.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationResult {
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<String>,
    pub feedback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub career_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modern_score: Option<u32>,
}

impl EvaluationResult {
    /// Result carrying only feedback text: extraction errors, improve mode,
    /// and prompt-builder short-circuits.
    pub fn feedback_only(filename: &str, feedback: impl Into<String>) -> Self {
        Self {
            filename: filename.to_string(),
            score: None,
            matched: None,
            missing: None,
            feedback: feedback.into(),
            career_path: None,
            modern_score: None,
        }
    }
}

/// Sorts match-mode results by score, highest first.
///
/// The sort is stable: equal scores keep their upload order. A result
/// without a score (extraction failure entry) counts as 0.
pub fn sort_by_score_desc(results: &mut [EvaluationResult]) {
    results.sort_by(|a, b| b.score.unwrap_or(0).cmp(&a.score.unwrap_or(0)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(filename: &str, score: u32) -> EvaluationResult {
        EvaluationResult {
            score: Some(score),
            ..EvaluationResult::feedback_only(filename, "ok")
        }
    }

    #[test]
    fn test_role_defaults_to_candidate() {
        assert_eq!(Role::from_form_value(None), Role::Candidate);
    }

    #[test]
    fn test_role_parses_recruiter() {
        assert_eq!(Role::from_form_value(Some("recruiter")), Role::Recruiter);
    }

    #[test]
    fn test_role_unrecognized_is_unrestricted() {
        assert_eq!(Role::from_form_value(Some("hiring_manager")), Role::Other);
    }

    #[test]
    fn test_mode_defaults_to_match() {
        assert_eq!(Mode::from_form_value(None), Mode::Match);
    }

    #[test]
    fn test_mode_parses_known_values() {
        assert_eq!(Mode::from_form_value(Some("match")), Mode::Match);
        assert_eq!(Mode::from_form_value(Some("tech_audit")), Mode::TechAudit);
        assert_eq!(Mode::from_form_value(Some("improve")), Mode::Improve);
    }

    #[test]
    fn test_mode_unrecognized_is_unknown() {
        assert_eq!(Mode::from_form_value(Some("roast")), Mode::Unknown);
    }

    #[test]
    fn test_sort_descending_by_score() {
        let mut results = vec![scored("a.pdf", 10), scored("b.pdf", 90), scored("c.pdf", 50)];
        sort_by_score_desc(&mut results);
        let order: Vec<u32> = results.iter().map(|r| r.score.unwrap()).collect();
        assert_eq!(order, vec![90, 50, 10]);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let mut results = vec![
            scored("first.pdf", 50),
            scored("second.pdf", 50),
            scored("third.pdf", 80),
        ];
        sort_by_score_desc(&mut results);
        assert_eq!(results[0].filename, "third.pdf");
        assert_eq!(results[1].filename, "first.pdf");
        assert_eq!(results[2].filename, "second.pdf");
    }

    #[test]
    fn test_sort_treats_missing_score_as_zero() {
        let mut results = vec![
            EvaluationResult::feedback_only("broken.pdf", "Failed to extract text from resume."),
            scored("ok.pdf", 1),
        ];
        sort_by_score_desc(&mut results);
        assert_eq!(results[0].filename, "ok.pdf");
    }

    #[test]
    fn test_match_result_serializes_expected_fields() {
        let result = EvaluationResult {
            filename: "resume.pdf".to_string(),
            score: Some(77),
            matched: Some("Rust, Tokio".to_string()),
            missing: Some("Kubernetes".to_string()),
            feedback: "Strong match.".to_string(),
            career_path: None,
            modern_score: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["score"], 77);
        assert_eq!(json["matched"], "Rust, Tokio");
        assert!(json.get("career_path").is_none());
        assert!(json.get("modern_score").is_none());
    }

    #[test]
    fn test_feedback_only_omits_mode_fields() {
        let result = EvaluationResult::feedback_only("resume.pdf", "Failed to extract text from resume.");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["filename"], "resume.pdf");
        assert_eq!(json["feedback"], "Failed to extract text from resume.");
        assert!(json.get("score").is_none());
        assert!(json.get("matched").is_none());
        assert!(json.get("missing").is_none());
    }
}
