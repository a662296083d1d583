//! Renderer-neutral document tree.
//!
//! ## Why an intermediate form?
//!
//! The same specification must come out of the PDF path and the Word path
//! with the same sections, the same numbering and the same cell text. The
//! composer builds this tree exactly once; the HTML and Word renderers then
//! only translate blocks into their own medium. Divergence between the two
//! outputs can only happen in a renderer, never in section logic, which
//! keeps the parity testable: assert on the tree, not on two documents.
//!
//! Everything in here is plain data. Text is already formatted (dates,
//! currency, badges) when it lands in a block; renderers must not apply
//! locale rules of their own.

use serde::Serialize;

/// A complete composed document, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentModel {
    /// Main heading, also used for PDF metadata and default filenames.
    pub title: String,
    /// Subtitle line under the heading, e.g. `"Vergabenummer: 2024-001"`.
    pub reference: Option<String>,
    pub sections: Vec<Section>,
    /// Footer line, e.g. `"Erstellt am 15.3.2024 | Leistungsbeschreibungs-Generator"`.
    pub footer: String,
}

/// One titled section of the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    /// Position among the numbered sections, if this section is numbered.
    pub ordinal: Option<u32>,
    pub title: String,
    pub style: SectionStyle,
    pub blocks: Vec<Block>,
}

impl Section {
    /// The heading text including the number prefix, `"3. Kostenstruktur"`.
    pub fn heading(&self) -> String {
        match self.ordinal {
            Some(n) => format!("{}. {}", n, self.title),
            None => self.title.clone(),
        }
    }
}

/// Visual treatment of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStyle {
    /// Heading plus content blocks.
    Plain,
    /// Tinted panel with a label/value grid, used for the master data up top.
    Callout,
}

/// A label/value pair inside a [`Block::Grid`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledValue {
    pub label: String,
    pub value: String,
}

impl LabeledValue {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        LabeledValue {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// One bullet in a [`Block::Bullets`] list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulletItem {
    pub text: String,
    /// Bold lead text, used for criterion group headings.
    pub strong: bool,
    /// Trailing italic annotation, e.g. `"Ausschlusskriterium"`.
    pub badge: Option<String>,
}

impl BulletItem {
    pub fn plain(text: impl Into<String>) -> Self {
        BulletItem {
            text: text.into(),
            strong: false,
            badge: None,
        }
    }
}

/// Column header of a [`TableBlock`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub header: String,
    /// Right-aligned in both renderers.
    pub numeric: bool,
    /// Share of the content width, all columns of a table summing to 100.
    pub width_pct: u8,
}

/// Closing row spanning all but the last column, e.g. the cost grand total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalRow {
    pub label: String,
    pub value: String,
}

/// A data table with headers and an optional emphasised total row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableBlock {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
    pub total: Option<TotalRow>,
}

/// One content block inside a section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Block {
    /// Free-running body text, line breaks preserved.
    Paragraph(String),
    /// Bold lead-in line within a section.
    SubHeading(String),
    /// A single `Label: value` line.
    Labeled { label: String, value: String },
    /// Two-column label/value grid.
    Grid(Vec<LabeledValue>),
    /// Bullet list.
    Bullets(Vec<BulletItem>),
    /// Data table.
    Table(TableBlock),
    /// Named side panel: bold label, body text, optional muted note.
    Panel {
        label: String,
        text: String,
        note: Option<String>,
    },
}
