//! HTML-to-image rendering engines.
//!
//! The PDF path works by photographing the laid-out HTML page: the browser
//! engine owns text shaping, table layout and line breaking, and this crate
//! only slices the resulting image into pages. [`PageRasterizer`] is the seam
//! for that engine so exports can run against `wkhtmltoimage`, a headless
//! browser wrapper, or an in-process stub in tests.
//!
//! ## Why shell out?
//!
//! Embedding a browser engine would dwarf this crate. `wkhtmltoimage` is a
//! single static binary, packaged by every major distribution, and its
//! QtWebKit core handles the small CSS subset the stylesheet uses. The
//! trade-off is a process spawn per export, which is noise next to the
//! JPEG encode.

use crate::error::ExportError;
use async_trait::async_trait;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tracing::{debug, warn};

/// Options handed to the engine for one rasterisation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    /// Layout width in CSS pixels.
    pub viewport_width_px: u32,
    /// Device-pixel multiplier applied on top of the layout width.
    pub scale: f32,
}

impl Default for RasterOptions {
    fn default() -> Self {
        RasterOptions {
            viewport_width_px: 794,
            scale: 2.0,
        }
    }
}

impl RasterOptions {
    /// Output image width in device pixels.
    pub fn device_width_px(&self) -> u32 {
        (self.viewport_width_px as f32 * self.scale).round().max(1.0) as u32
    }
}

/// A rendering engine that turns an HTML document into one tall image.
///
/// The returned image must be laid out at `opts.viewport_width_px` CSS pixels
/// and captured at `opts.device_width_px()` device pixels; the height is
/// whatever the content needs. Implementations are shared behind `Arc`.
#[async_trait]
pub trait PageRasterizer: Send + Sync {
    /// Engine name for logs and error messages, e.g. `"wkhtmltoimage"`.
    fn name(&self) -> &str;

    /// Cheap availability probe, used to pick an engine before exporting.
    fn is_available(&self) -> bool;

    /// Render the document into a single image spanning the full content height.
    async fn rasterize(
        &self,
        html: &str,
        opts: &RasterOptions,
    ) -> Result<DynamicImage, ExportError>;
}

// ── wkhtmltoimage ────────────────────────────────────────────────────────

const WKHTML_HINT: &str =
    "Install wkhtmltopdf (which provides wkhtmltoimage) or point the config at the binary.";

/// [`PageRasterizer`] backed by the `wkhtmltoimage` command-line tool.
#[derive(Debug, Clone)]
pub struct WkhtmlRasterizer {
    binary: PathBuf,
}

impl WkhtmlRasterizer {
    /// Use `wkhtmltoimage` from `PATH`.
    pub fn new() -> Self {
        Self::with_binary("wkhtmltoimage")
    }

    /// Use a specific binary, e.g. a pinned build outside `PATH`.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        WkhtmlRasterizer {
            binary: binary.into(),
        }
    }

    fn engine_unavailable(&self) -> ExportError {
        ExportError::EngineUnavailable {
            engine: self.binary.display().to_string(),
            hint: WKHTML_HINT.to_string(),
        }
    }
}

impl Default for WkhtmlRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageRasterizer for WkhtmlRasterizer {
    fn name(&self) -> &str {
        "wkhtmltoimage"
    }

    fn is_available(&self) -> bool {
        std::process::Command::new(&self.binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    async fn rasterize(
        &self,
        html: &str,
        opts: &RasterOptions,
    ) -> Result<DynamicImage, ExportError> {
        let workdir = tempfile::tempdir().map_err(|e| ExportError::RasterisationFailed {
            detail: format!("could not create scratch directory: {e}"),
        })?;
        let html_path = workdir.path().join("page.html");
        let png_path = workdir.path().join("page.png");
        tokio::fs::write(&html_path, html)
            .await
            .map_err(|e| ExportError::RasterisationFailed {
                detail: format!("could not stage HTML: {e}"),
            })?;

        // wkhtmltoimage lays out at width/zoom CSS pixels, so the device
        // width goes on --width and the supersampling factor on --zoom.
        let output = tokio::process::Command::new(&self.binary)
            .arg("--quiet")
            .arg("--format")
            .arg("png")
            .arg("--width")
            .arg(opts.device_width_px().to_string())
            .arg("--zoom")
            .arg(format!("{}", opts.scale))
            .arg("--encoding")
            .arg("utf-8")
            .arg(&html_path)
            .arg(&png_path)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    self.engine_unavailable()
                } else {
                    ExportError::RasterisationFailed {
                        detail: format!("could not spawn {}: {e}", self.binary.display()),
                    }
                }
            })?;

        if !output.status.success() {
            return Err(ExportError::RasterisationFailed {
                detail: format!(
                    "{} exited with {}: {}",
                    self.name(),
                    output.status,
                    stderr_tail(&output.stderr)
                ),
            });
        }

        let png = tokio::fs::read(&png_path)
            .await
            .map_err(|e| ExportError::RasterisationFailed {
                detail: format!("{} produced no image: {e}", self.name()),
            })?;
        debug!(bytes = png.len(), "wkhtmltoimage capture complete");

        let img = image::load_from_memory(&png)?;
        if img.width() == 0 || img.height() == 0 {
            warn!(width = img.width(), height = img.height(), "empty capture");
            return Err(ExportError::EmptyRender {
                width: img.width(),
                height: img.height(),
            });
        }
        Ok(img)
    }
}

/// Last part of a stderr dump, enough to diagnose without flooding the error.
fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let trimmed = text.trim();
    match trimmed.char_indices().nth_back(399) {
        Some((idx, _)) => format!("…{}", &trimmed[idx..]),
        None => trimmed.to_string(),
    }
}

/// Probe a binary path without constructing the full engine.
pub fn wkhtmltoimage_available(binary: &Path) -> bool {
    WkhtmlRasterizer::with_binary(binary).is_available()
}
