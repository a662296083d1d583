//! # vergabedoc
//!
//! Generate German procurement documents ("Leistungsbeschreibung") as PDF
//! and Word artifacts from structured form data.
//!
//! ## Why one composition step?
//!
//! Procurement offices hand the same document to bidders as a PDF and to
//! internal reviewers as an editable Word file. Rendering each format
//! straight from the form invites drift: a section renamed in one exporter
//! and not the other, numbering that disagrees after a field is cleared.
//! This crate normalises the form once, composes one section model, and
//! lets two thin renderers serialise it. What differs between the
//! artifacts is typography, never content.
//!
//! ## Pipeline Overview
//!
//! ```text
//! form JSON
//!  │
//!  ├─ 1. Normalise  parse the camelCase form, trim, group, read quantities
//!  ├─ 2. Compose    numbered sections, labels, footer (shared model)
//!  ├─ 3a. PDF       HTML + stylesheet → wkhtmltoimage capture → A4 bands
//!  └─ 3b. Word      docx tree → zip container
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vergabedoc::{export_docx, export_pdf, load_form, ExportConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let form = load_form("form.json")?;
//!     let config = ExportConfig::builder().output_dir("out").build()?;
//!     println!("{}", export_pdf(&form, &config).await.message);
//!     println!("{}", export_docx(&form, &config).await.message);
//!     Ok(())
//! }
//! ```
//!
//! ## Rendering Engines
//!
//! | Artifact | Engine |
//! |----------|--------|
//! | PDF      | `wkhtmltoimage` on `PATH`, or any [`PageRasterizer`] injected via the config |
//! | Word     | none, the docx tree is built directly |
//! | HTML     | none, [`render_html_for`] returns the page as a string |
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `vergabedoc` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! vergabedoc = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod format;
pub mod labels;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod raster;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExportConfig, ExportConfigBuilder};
pub use document::DocumentModel;
pub use error::ExportError;
pub use export::{
    compose_for, export_docx, export_docx_sync, export_pdf, export_pdf_sync, load_form,
    render_html_for, try_export_docx, try_export_pdf,
};
pub use model::{Specification, SpecificationForm};
pub use output::{ExportArtifact, ExportKind, ExportOutcome};
pub use raster::{PageRasterizer, RasterOptions, WkhtmlRasterizer};
