// Resume evaluation: multipart intake, OCR-backed text extraction, prompt
// construction, hosted-model dispatch, regex response parsing.
// All LLM calls go through llm_client — no direct API calls here.

pub mod handlers;
pub mod keywords;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod prompts;
