//! OCR engine wrapping the `tesseract` CLI tool.

use std::path::Path;

use anyhow::{bail, Context, Result};
use tokio::process::Command;

/// Runs tesseract over one rendered page and returns the recognized text.
pub(crate) async fn recognize_png(png: &[u8]) -> Result<String> {
    let tmpdir = tempfile::TempDir::with_prefix("resume-ocr")
        .context("cannot create OCR scratch directory")?;
    let input_path = tmpdir.path().join("page.png");
    // tesseract appends .txt to the output base itself
    let output_base = tmpdir.path().join("page");

    tokio::fs::write(&input_path, png)
        .await
        .context("cannot write OCR input file")?;

    run_tesseract(&input_path, &output_base).await?;

    let text = tokio::fs::read_to_string(output_base.with_extension("txt"))
        .await
        .context("cannot read tesseract output file")?;

    Ok(text)
}

async fn run_tesseract(input: &Path, output_base: &Path) -> Result<()> {
    let output = Command::new("tesseract")
        .arg(input)
        .arg(output_base)
        .arg("-l")
        .arg("eng")
        .output()
        .await
        .context("cannot run tesseract")?;

    if !output.status.success() {
        bail!(
            "tesseract exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(())
}
