//! Resume text extraction — rasterizes the leading pages of an uploaded PDF
//! and runs OCR on each page.
//!
//! Extraction failures are per-file: the caller records an error entry for
//! the file and continues with the rest of the batch.

mod ocr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

/// Pages rendered per resume. Anything past page two is ignored.
const MAX_PAGES: usize = 2;

/// Target raster width in pixels, wide enough for tesseract to resolve
/// 10pt body text on a US-letter page.
const RENDER_WIDTH: i32 = 1600;

/// Extraction seam between the request handler and the OCR pipeline.
/// Production uses `OcrTextExtractor`; tests substitute scripted mocks.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Returns the trimmed recognized text of the PDF's leading pages.
    async fn extract_text(&self, pdf_bytes: Bytes) -> Result<String>;
}

/// OCR-backed extractor: pdfium page rasterization + tesseract recognition.
pub struct OcrTextExtractor;

#[async_trait]
impl TextExtractor for OcrTextExtractor {
    async fn extract_text(&self, pdf_bytes: Bytes) -> Result<String> {
        // The pdfium binding is not Send; rendering runs to completion on
        // the blocking pool and only the encoded pages cross back.
        let pages = tokio::task::spawn_blocking(move || render_pages(&pdf_bytes))
            .await
            .context("PDF render task panicked")??;

        debug!("Rendered {} page(s) for OCR", pages.len());

        let mut text = String::new();
        for (idx, png) in pages.iter().enumerate() {
            let page_text = ocr::recognize_png(png)
                .await
                .with_context(|| format!("OCR failed on page {}", idx + 1))?;
            text.push_str(&page_text);
        }

        Ok(text.trim().to_string())
    }
}

/// Renders the first [`MAX_PAGES`] pages of a PDF to PNG bytes.
fn render_pages(pdf_bytes: &[u8]) -> Result<Vec<Vec<u8>>> {
    use pdfium_render::prelude::*;

    let bindings = Pdfium::bind_to_system_library().context("pdfium library not available")?;
    let pdfium = Pdfium::new(bindings);

    let document = pdfium
        .load_pdf_from_byte_slice(pdf_bytes, None)
        .context("failed to open PDF")?;

    let render_config = PdfRenderConfig::new().set_target_width(RENDER_WIDTH);

    let mut pages = Vec::new();
    for page in document.pages().iter().take(MAX_PAGES) {
        let bitmap = page
            .render_with_config(&render_config)
            .context("failed to rasterize page")?;
        let page_image = bitmap.as_image();

        let mut png = Vec::new();
        page_image
            .write_to(
                &mut std::io::Cursor::new(&mut png),
                image::ImageFormat::Png,
            )
            .context("failed to encode page as PNG")?;
        pages.push(png);
    }

    Ok(pages)
}
