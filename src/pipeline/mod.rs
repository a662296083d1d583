//! Pipeline stages for document generation.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and pins the
//! PDF/Word parity down to a single place: both renderers consume the same
//! composed tree, so a section can only differ between the two outputs if a
//! renderer itself diverges.
//!
//! ## Data Flow
//!
//! ```text
//!                      ┌──▶ html ──▶ (rasterize) ──▶ paginate ──▶ PDF
//! record ──▶ compose ──┤    (CSS)     (engine)       (lopdf)
//!                      └──▶ word ─────────────────────────────▶ DOCX
//!                           (docx-rs)
//! ```
//!
//! 1. [`compose`]  — apply section gating and numbering to a normalised
//!    record, producing the renderer-neutral [`crate::document`] tree
//! 2. [`html`]     — print the tree as a self-contained HTML page with the
//!    embedded stylesheet; feeds the preview and the rasteriser
//! 3. [`paginate`] — slice the captured page image into A4 bands and emit
//!    the PDF; runs in `spawn_blocking` because encoding is CPU-bound
//! 4. [`word`]     — print the tree as a native Word document
//!
//! The rasterise step between [`html`] and [`paginate`] lives in
//! [`crate::raster`]; it is an external engine, not a pipeline stage.

pub mod compose;
pub mod html;
pub mod paginate;
pub mod word;
