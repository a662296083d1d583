//! Export result types.
//!
//! ## Why an outcome envelope?
//!
//! The export surface has two callers with different needs. Host
//! applications embedding the library want typed errors to match on, so the
//! `try_export_*` drivers return [`ExportArtifact`] or
//! [`crate::error::ExportError`]. Form front-ends want a ready-to-display
//! status string and a boolean, nothing more; [`ExportOutcome`] carries
//! exactly that pair, with the German messages users of the historical
//! generator already know. The infallible `export_*` drivers never leak an
//! `Err` past this envelope.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Display-ready result of an infallible export call.
///
/// `message` is one of the fixed success strings or a failure prefix
/// followed by the error's rendering. Serialisable so front-ends can pass
/// it through as JSON unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOutcome {
    pub success: bool,
    pub message: String,
}

impl ExportOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// The artifact family an export produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Pdf,
    Docx,
}

impl ExportKind {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportKind::Pdf => "pdf",
            ExportKind::Docx => "docx",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportKind::Pdf => write!(f, "PDF"),
            ExportKind::Docx => write!(f, "Word"),
        }
    }
}

/// A finished export: where it was written and what it contains.
///
/// `bytes` holds the complete artifact so tests and in-memory callers can
/// inspect it without re-reading the file. `pages` is populated for PDF
/// exports only; a docx file has no fixed page count before layout.
#[derive(Clone)]
pub struct ExportArtifact {
    pub kind: ExportKind,
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub pages: Option<usize>,
    pub duration_ms: u64,
}

// Manual Debug keeps artifact dumps readable; the byte buffer is megabytes
// of JPEG or zip data.
impl fmt::Debug for ExportArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportArtifact")
            .field("kind", &self.kind)
            .field("path", &self.path)
            .field("bytes", &format_args!("{} bytes", self.bytes.len()))
            .field("pages", &self.pages)
            .field("duration_ms", &self.duration_ms)
            .finish()
    }
}
