//! Export entry points for PDF and Word artifacts.
//!
//! ## Why two driver flavours?
//!
//! The `try_export_*` functions are the library API: they return the written
//! [`ExportArtifact`] or a typed [`ExportError`] for the caller to match on.
//! The `export_*` functions are the front-end API: they never return `Err`
//! and never panic, folding every failure into an [`ExportOutcome`] whose
//! German message is shown to the user verbatim. Form UIs only ever see the
//! outcome envelope.
//!
//! The PDF pipeline is normalise, compose, render HTML, rasterise, slice
//! into A4 bands, write. The Word pipeline is normalise, compose, build the
//! docx tree, pack, write. Both share the composition step, which is what
//! keeps the two artifacts saying the same thing.

use crate::config::ExportConfig;
use crate::document::DocumentModel;
use crate::error::ExportError;
use crate::labels;
use crate::model::{Specification, SpecificationForm};
use crate::output::{ExportArtifact, ExportKind, ExportOutcome};
use crate::pipeline::paginate::{paginate, PdfMeta};
use crate::pipeline::{compose, html, word};
use crate::raster::{PageRasterizer, RasterOptions, WkhtmlRasterizer};
use chrono::{Local, NaiveDate};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Generate the PDF artifact and write it to disk.
///
/// # Errors
/// Fails when the form JSON was invalid, no HTML rendering engine is
/// available, rasterisation or PDF assembly fails, or the output file
/// cannot be written. No partial file is left behind in any of these cases.
pub async fn try_export_pdf(
    form: &SpecificationForm,
    config: &ExportConfig,
) -> Result<ExportArtifact, ExportError> {
    let start = Instant::now();
    info!("Starting PDF export");

    // ── Step 1: Compose the document ─────────────────────────────────────
    let doc = compose_for(form, config);
    debug!("Composed {} sections", doc.sections.len());

    // ── Step 2: Render HTML and resolve the engine ───────────────────────
    let page = html::render_html(&doc);
    let engine = resolve_rasterizer(config)?;

    // ── Step 3: Rasterise ────────────────────────────────────────────────
    let opts = RasterOptions {
        viewport_width_px: config.viewport_width_px,
        scale: config.raster_scale,
    };
    let image = engine.rasterize(&page, &opts).await?;
    debug!("Captured {}x{} px", image.width(), image.height());

    // ── Step 4: Slice into pages (CPU-bound, off the async runtime) ──────
    let margins = config.margins_mm;
    let quality = config.jpeg_quality;
    let title = doc.title.clone();
    let producer = config.generator_label.clone();
    let assembly = tokio::task::spawn_blocking(move || {
        paginate(
            &image,
            margins,
            quality,
            &PdfMeta {
                title: &title,
                producer: &producer,
            },
        )
    })
    .await
    .map_err(|e| ExportError::Internal(format!("Pagination task failed: {e}")))??;

    // ── Step 5: Atomic write ─────────────────────────────────────────────
    let filename = config
        .pdf_filename
        .as_deref()
        .unwrap_or(labels::DEFAULT_PDF_FILENAME);
    let path = config.output_dir.join(filename);
    write_atomic(&path, &assembly.bytes).await?;

    let duration_ms = start.elapsed().as_millis() as u64;
    info!(
        "PDF export complete: {} pages, {} bytes, {}ms",
        assembly.pages,
        assembly.bytes.len(),
        duration_ms
    );

    Ok(ExportArtifact {
        kind: ExportKind::Pdf,
        path,
        bytes: assembly.bytes,
        pages: Some(assembly.pages),
        duration_ms,
    })
}

/// Generate the Word artifact and write it to disk.
///
/// Needs no rendering engine; the docx tree is built directly from the
/// composed document.
///
/// # Errors
/// Fails when the form JSON was invalid, the zip container cannot be
/// packed, or the output file cannot be written.
pub async fn try_export_docx(
    form: &SpecificationForm,
    config: &ExportConfig,
) -> Result<ExportArtifact, ExportError> {
    let start = Instant::now();
    info!("Starting Word export");

    let doc = compose_for(form, config);
    debug!("Composed {} sections", doc.sections.len());

    let bytes = word::pack_docx(&doc)?;

    let filename = config
        .docx_filename
        .as_deref()
        .unwrap_or(labels::DEFAULT_DOCX_FILENAME);
    let path = config.output_dir.join(filename);
    write_atomic(&path, &bytes).await?;

    let duration_ms = start.elapsed().as_millis() as u64;
    info!(
        "Word export complete: {} bytes, {}ms",
        bytes.len(),
        duration_ms
    );

    Ok(ExportArtifact {
        kind: ExportKind::Docx,
        path,
        bytes,
        pages: None,
        duration_ms,
    })
}

/// PDF export that reports through [`ExportOutcome`] instead of `Err`.
pub async fn export_pdf(form: &SpecificationForm, config: &ExportConfig) -> ExportOutcome {
    match try_export_pdf(form, config).await {
        Ok(_) => ExportOutcome::success(labels::PDF_SUCCESS),
        Err(e) => {
            warn!("PDF export failed: {e}");
            ExportOutcome::failure(format!("{}{e}", labels::PDF_FAILURE_PREFIX))
        }
    }
}

/// Word export that reports through [`ExportOutcome`] instead of `Err`.
///
/// # Example
/// ```rust,no_run
/// use vergabedoc::{export_docx, ExportConfig, SpecificationForm};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let raw = std::fs::read_to_string("form.json")?;
/// let form = SpecificationForm::from_json_str(&raw)?;
/// let outcome = export_docx(&form, &ExportConfig::default()).await;
/// println!("{}", outcome.message);
/// # Ok(())
/// # }
/// ```
pub async fn export_docx(form: &SpecificationForm, config: &ExportConfig) -> ExportOutcome {
    match try_export_docx(form, config).await {
        Ok(_) => ExportOutcome::success(labels::DOCX_SUCCESS),
        Err(e) => {
            warn!("Word export failed: {e}");
            ExportOutcome::failure(format!("{}{e}", labels::DOCX_FAILURE_PREFIX))
        }
    }
}

/// Synchronous wrapper around [`export_pdf`].
///
/// Creates a temporary tokio runtime internally.
pub fn export_pdf_sync(form: &SpecificationForm, config: &ExportConfig) -> ExportOutcome {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt.block_on(export_pdf(form, config)),
        Err(e) => ExportOutcome::failure(format!(
            "{}Laufzeitumgebung konnte nicht gestartet werden: {e}",
            labels::PDF_FAILURE_PREFIX
        )),
    }
}

/// Synchronous wrapper around [`export_docx`].
///
/// Creates a temporary tokio runtime internally.
pub fn export_docx_sync(form: &SpecificationForm, config: &ExportConfig) -> ExportOutcome {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt.block_on(export_docx(form, config)),
        Err(e) => ExportOutcome::failure(format!(
            "{}Laufzeitumgebung konnte nicht gestartet werden: {e}",
            labels::DOCX_FAILURE_PREFIX
        )),
    }
}

/// Normalise the form and compose the shared document model.
///
/// This is the common front half of both export pipelines and the source
/// for machine-readable previews.
pub fn compose_for(form: &SpecificationForm, config: &ExportConfig) -> DocumentModel {
    let spec = Specification::from_form(form);
    compose::compose_document(&spec, effective_today(config), &config.generator_label)
}

/// Render the standalone HTML preview page for a form.
///
/// The same markup feeds the PDF pipeline, so the preview is faithful to
/// the printed artifact.
pub fn render_html_for(form: &SpecificationForm, config: &ExportConfig) -> String {
    html::render_html(&compose_for(form, config))
}

/// Read and parse a form-data JSON file.
pub fn load_form(path: impl AsRef<Path>) -> Result<SpecificationForm, ExportError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|_| ExportError::FormNotFound {
        path: path.to_path_buf(),
    })?;
    SpecificationForm::from_json_str(&raw)
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Resolve the HTML rasteriser, from most-specific to least-specific.
///
/// 1. **Injected engine** (`config.rasterizer`): the caller constructed the
///    engine, typically a test stub or a headless-browser wrapper.
/// 2. **System `wkhtmltoimage`**: probed on `PATH`. Covers the plain
///    `vergabedoc form.json` case with no configuration at all.
///
/// Whatever is resolved must also report itself available; a configured but
/// unusable engine becomes `EngineUnavailable` here rather than a process
/// error mid-pipeline.
fn resolve_rasterizer(config: &ExportConfig) -> Result<Arc<dyn PageRasterizer>, ExportError> {
    let engine: Arc<dyn PageRasterizer> = match config.rasterizer {
        Some(ref engine) => Arc::clone(engine),
        None => Arc::new(WkhtmlRasterizer::new()),
    };
    if !engine.is_available() {
        return Err(ExportError::EngineUnavailable {
            engine: engine.name().to_string(),
            hint: "Install wkhtmltopdf (which provides wkhtmltoimage) or inject a rasterizer \
                   via ExportConfig::builder().rasterizer(..)."
                .to_string(),
        });
    }
    Ok(engine)
}

fn effective_today(config: &ExportConfig) -> NaiveDate {
    config.today.unwrap_or_else(|| Local::now().date_naive())
}

/// Atomic write: write to a sibling temp file, then rename.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let write_err = |source: std::io::Error| ExportError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }
    }

    let tmp_ext = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{ext}.tmp"),
        None => "tmp".to_string(),
    };
    let tmp_path = path.with_extension(tmp_ext);
    tokio::fs::write(&tmp_path, bytes).await.map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use image::{DynamicImage, Rgb, RgbImage};

    struct StubEngine {
        available: bool,
        height: u32,
    }

    #[async_trait]
    impl PageRasterizer for StubEngine {
        fn name(&self) -> &str {
            "stub"
        }

        fn is_available(&self) -> bool {
            self.available
        }

        async fn rasterize(
            &self,
            _html: &str,
            opts: &RasterOptions,
        ) -> Result<DynamicImage, ExportError> {
            Ok(DynamicImage::ImageRgb8(RgbImage::from_pixel(
                opts.device_width_px(),
                self.height,
                Rgb([255, 255, 255]),
            )))
        }
    }

    fn minimal_form() -> SpecificationForm {
        SpecificationForm::from_json_str(r#"{"projectTitle": "Testprojekt"}"#).unwrap()
    }

    #[test]
    fn injected_engine_wins_resolution() {
        let config = ExportConfig::builder()
            .rasterizer(Arc::new(StubEngine {
                available: true,
                height: 600,
            }))
            .build()
            .unwrap();
        let engine = resolve_rasterizer(&config).unwrap();
        assert_eq!(engine.name(), "stub");
    }

    #[test]
    fn unavailable_engine_is_a_typed_error() {
        let config = ExportConfig::builder()
            .rasterizer(Arc::new(StubEngine {
                available: false,
                height: 600,
            }))
            .build()
            .unwrap();
        // `.err()` first: the Ok side is a trait object without Debug.
        let err = resolve_rasterizer(&config)
            .err()
            .expect("expected resolution to fail");
        assert!(matches!(err, ExportError::EngineUnavailable { .. }));
    }

    #[tokio::test]
    async fn pdf_failure_becomes_an_outcome_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExportConfig::builder()
            .output_dir(dir.path())
            .rasterizer(Arc::new(StubEngine {
                available: false,
                height: 600,
            }))
            .build()
            .unwrap();
        let outcome = export_pdf(&minimal_form(), &config).await;
        assert!(!outcome.success);
        assert!(
            outcome.message.starts_with("Fehler beim PDF-Export: "),
            "got: {}",
            outcome.message
        );
        assert!(!dir.path().join("Leistungsbeschreibung.pdf").exists());
    }

    #[tokio::test]
    async fn atomic_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        write_atomic(&path, b"%PDF-stub").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-stub");
        assert!(!dir.path().join("out.pdf.tmp").exists());
    }

    #[test]
    fn missing_form_file_reports_the_path() {
        let err = load_form("/nonexistent/form.json").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("/nonexistent/form.json"), "got: {msg}");
    }
}
