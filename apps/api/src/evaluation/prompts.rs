// All LLM prompt constants for the evaluation module.
// The textual layouts demanded here are load-bearing: the response parser
// pattern-matches against exactly these labels.

/// System prompt for ATS match scoring.
pub const MATCH_SYSTEM: &str = "You are a strict ATS evaluator.";

/// ATS match prompt template. Replace `{keywords}` and `{resume_text}` before sending.
pub const MATCH_PROMPT_TEMPLATE: &str = r#"Evaluate the resume below against these job-related keywords:
{keywords}

Respond in this exact format:
Score: XX/100
Matched Keywords: [...]
Missing Keywords: [...]
Final Thoughts: (1 sentence only)

Resume content:
{resume_text}"#;

/// System prompt for the modern-tech audit.
pub const TECH_AUDIT_SYSTEM: &str = "You are a technical recruiter reviewing a resume.";

/// Tech audit prompt template. Replace `{resume_text}` before sending.
pub const TECH_AUDIT_PROMPT_TEMPLATE: &str = r#"1. Identify outdated or legacy tools/technologies.
2. Identify missing but in-demand modern technologies.
3. Give a Modern Tech Score (0-100) based on tool relevance.
4. Suggest one or two suitable career paths based on the resume content.

Respond in the following format:

Feedback:
- ...
- ...

Career Path: <text>

Modern Tech Score: XX/100

Resume content:
{resume_text}"#;

/// System prompt for free-form improvement advice.
pub const IMPROVE_SYSTEM: &str = "You are a resume writing expert.";

/// Improvement advice prompt template. Replace `{resume_text}` before sending.
pub const IMPROVE_PROMPT_TEMPLATE: &str = r#"Read the following resume and provide advice to improve it, including:
- Content quality and clarity
- Use of quantifiable achievements
- Formatting or structure

Return your suggestions in 2-3 concise paragraphs.

Resume content:
{resume_text}"#;

/// System prompt for keyword extraction from a job description.
pub const KEYWORD_SYSTEM: &str = "You are a precise job description analyst. \
    Respond with a comma-separated list only. \
    Do NOT include any other text, headers, or explanations.";

/// Keyword extraction prompt template. Replace `{job_description}` before sending.
pub const KEYWORD_PROMPT_TEMPLATE: &str = r#"Extract the 10-15 most important job keywords, qualifications, and experience from the job description below.
Respond with a comma-separated list only.

Job Description:
{job_description}"#;
