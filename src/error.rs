//! Error types for the vergabedoc library.
//!
//! One error enum covers the whole export pipeline. An export is a single
//! all-or-nothing artifact: unlike per-page OCR there is no partial-success
//! mode worth modelling, so every failure is fatal to its driver call and
//! surfaces either as `Err(ExportError)` from the `try_export_*` functions or
//! as a `success: false` outcome from the infallible `export_*` wrappers.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the vergabedoc library.
#[derive(Debug, Error)]
pub enum ExportError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Form-data file was not found at the given path.
    #[error("Form data file not found: '{path}'\nCheck the path exists and is readable.")]
    FormNotFound { path: PathBuf },

    /// The form data could not be parsed as JSON.
    #[error("Form data is not valid JSON: {detail}")]
    InvalidForm { detail: String },

    // ── Rendering-engine errors ───────────────────────────────────────────
    /// No usable HTML rasteriser: none configured, or the configured one
    /// reports itself unavailable (missing binary, library not loaded).
    #[error("Rendering engine '{engine}' is not available.\n{hint}")]
    EngineUnavailable { engine: String, hint: String },

    /// The rasteriser ran but failed to produce an image.
    #[error("Rasterisation failed: {detail}")]
    RasterisationFailed { detail: String },

    /// The rasteriser produced a zero-sized image; slicing it would yield an
    /// empty PDF.
    #[error("Rendering produced an empty image ({width}x{height} px)")]
    EmptyRender { width: u32, height: u32 },

    // ── Packaging errors ──────────────────────────────────────────────────
    /// JPEG encoding of a page band failed.
    #[error("Image encoding failed: {0}")]
    ImageEncoding(#[from] image::ImageError),

    /// lopdf could not serialise the assembled document.
    #[error("PDF assembly failed: {detail}")]
    PdfAssembly { detail: String },

    /// The docx zip container could not be written.
    #[error("Word packaging failed: {detail}")]
    WordPackaging { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_unavailable_display_includes_hint() {
        let e = ExportError::EngineUnavailable {
            engine: "wkhtmltoimage".into(),
            hint: "Install wkhtmltoimage or inject a rasteriser.".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("wkhtmltoimage"), "got: {msg}");
        assert!(msg.contains("inject a rasteriser"), "got: {msg}");
    }

    #[test]
    fn empty_render_display() {
        let e = ExportError::EmptyRender {
            width: 0,
            height: 512,
        };
        assert!(e.to_string().contains("0x512"));
    }

    #[test]
    fn output_write_failed_preserves_source() {
        use std::error::Error as _;
        let e = ExportError::OutputWriteFailed {
            path: PathBuf::from("/tmp/out.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.to_string().contains("/tmp/out.pdf"));
        assert!(e.source().is_some());
    }

    #[test]
    fn invalid_form_display() {
        let e = ExportError::InvalidForm {
            detail: "expected value at line 1 column 2".into(),
        };
        assert!(e.to_string().starts_with("Form data is not valid JSON"));
    }
}
