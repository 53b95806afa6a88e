// Export Pipeline: captures a mounted preview and writes it as a single-page A4 PDF.
// Capture and serialization are CPU-bound; async callers go through `export_in_background`.

pub mod capture;
pub mod font_metrics;
pub mod page;
pub mod pdf;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::render::RenderedView;
use pdf::{PageMeta, PdfError};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export: the resume preview has not been rendered")]
    MissingRenderTarget,

    #[error("PDF generation failed: {0}")]
    Pdf(#[from] PdfError),

    #[error("Failed to save exported file: {0}")]
    Save(#[source] std::io::Error),

    #[error("Export task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Flate-compress the page content stream.
    pub compress: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            compress: true,
            created_at: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportedDocument {
    pub const CONTENT_TYPE: &'static str = "application/pdf";

    /// Writes a copy into `dir`, creating it if needed. Path separators in the name are
    /// replaced so the copy always lands directly in `dir`.
    pub async fn save_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(ExportError::Save)?;
        let path = dir.join(self.file_name.replace(['/', '\\'], "_"));
        tokio::fs::write(&path, &self.bytes)
            .await
            .map_err(ExportError::Save)?;
        Ok(path)
    }
}

/// `<full name with each whitespace run replaced by "_">_Resume.pdf`
pub fn export_file_name(full_name: &str) -> String {
    let mut name = String::with_capacity(full_name.len() + 11);
    let mut in_space = false;
    for c in full_name.chars() {
        if c.is_whitespace() {
            if !in_space {
                name.push('_');
            }
            in_space = true;
        } else {
            name.push(c);
            in_space = false;
        }
    }
    name.push_str("_Resume.pdf");
    name
}

/// Captures `view` and produces the PDF. A missing view is an error, never a silent no-op.
pub fn export_to_document(
    view: Option<&RenderedView>,
    options: &ExportOptions,
) -> Result<ExportedDocument, ExportError> {
    let view = view.ok_or(ExportError::MissingRenderTarget)?;

    let captured = capture::capture(&view.document);
    let placement = page::fit_to_page(captured.width, captured.height);
    let meta = PageMeta {
        title: format!("{} Resume", view.record.full_name),
        created_at: options.created_at,
    };
    let bytes = pdf::write_page(&captured, &placement, &meta, options.compress)?;

    tracing::debug!(
        template = view.document.template.as_str(),
        capture_width = captured.width,
        capture_height = captured.height,
        bytes = bytes.len(),
        "Exported resume"
    );

    Ok(ExportedDocument {
        file_name: export_file_name(&view.record.full_name),
        bytes,
    })
}

/// Runs `export_to_document` on the blocking pool. Concurrent calls are independent.
pub async fn export_in_background(
    view: Option<RenderedView>,
    options: ExportOptions,
) -> Result<ExportedDocument, ExportError> {
    tokio::task::spawn_blocking(move || export_to_document(view.as_ref(), &options))
        .await
        .map_err(|e| ExportError::Task(e.to_string()))?
}
