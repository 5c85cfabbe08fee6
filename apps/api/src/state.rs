use std::sync::Arc;

use crate::extract::TextExtractor;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Both collaborators sit behind traits so handler logic can be exercised
/// with deterministic mocks.
#[derive(Clone)]
pub struct AppState {
    /// Hosted-model client. Production: `LlmClient` (Anthropic Messages API).
    pub llm: Arc<dyn TextGenerator>,
    /// Resume text extractor. Production: `OcrTextExtractor` (pdfium + tesseract).
    pub extractor: Arc<dyn TextExtractor>,
}
