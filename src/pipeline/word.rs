//! Word renderer: document tree to a native `.docx`.
//!
//! Unlike the PDF path, which photographs laid-out HTML, the Word artifact
//! is a real editable document. The trees must still read identically, so
//! this renderer maps each block to the `docx-rs` construct that carries
//! the same visual intent: accent headings, the shaded configuration grid,
//! the bordered cost table with its highlighted total row, bullet runs with
//! the accent glyph.
//!
//! `docx-rs` escapes text at build time; this module passes model text
//! through untouched.

use crate::document::{Block, BulletItem, DocumentModel, Section, TableBlock};
use crate::error::ExportError;
use docx_rs::{
    AlignmentType, BreakType, Docx, LineSpacing, PageMargin, Paragraph, Run, RunFonts, Shading,
    ShdType, SpecialIndentType, Table, TableBorders, TableCell, TableRow, WidthType,
};
use std::io::Cursor;

// Palette and sizes shared with the stylesheet. Sizes are half-points.
const ACCENT: &str = "0066CC";
const BODY: &str = "333333";
const MUTED: &str = "666666";
const BLACK: &str = "000000";
const SHADE: &str = "F8F9FA";
const WHITE: &str = "FFFFFF";
const SIZE_TITLE: usize = 32;
const SIZE_HEADING: usize = 24;
const SIZE_BODY: usize = 20;
const SIZE_TABLE: usize = 18;
const SIZE_FINE: usize = 16;

// A4 geometry in twips; 25 mm margins on every side.
const PAGE_W: u32 = 11906;
const PAGE_H: u32 = 16838;
const MARGIN: i32 = 1417;
/// Content width between the margins, used for table grids.
const CONTENT_W: usize = 9071;

/// Render the composed document as a `docx_rs::Docx` tree.
pub fn render_docx(doc: &DocumentModel) -> Docx {
    let mut docx = Docx::new().page_size(PAGE_W, PAGE_H).page_margin(
        PageMargin::new()
            .top(MARGIN)
            .bottom(MARGIN)
            .left(MARGIN)
            .right(MARGIN),
    );

    docx = docx.add_paragraph(
        Paragraph::new()
            .add_run(arial(&doc.title).bold().size(SIZE_TITLE).color(BLACK))
            .align(AlignmentType::Center)
            .line_spacing(LineSpacing::new().after(200)),
    );
    if let Some(reference) = &doc.reference {
        docx = docx.add_paragraph(
            Paragraph::new()
                .add_run(arial(reference).italic().size(22).color(MUTED))
                .align(AlignmentType::Center)
                .line_spacing(LineSpacing::new().after(500)),
        );
    }

    for section in &doc.sections {
        docx = add_section(docx, section);
    }

    docx.add_paragraph(
        Paragraph::new()
            .add_run(arial(&doc.footer).size(SIZE_FINE).color(MUTED))
            .align(AlignmentType::Center)
            .line_spacing(LineSpacing::new().before(480)),
    )
}

/// Render and pack the document into the final `.docx` zip container.
pub fn pack_docx(doc: &DocumentModel) -> Result<Vec<u8>, ExportError> {
    let mut cursor = Cursor::new(Vec::new());
    render_docx(doc)
        .build()
        .pack(&mut cursor)
        .map_err(|e| ExportError::WordPackaging {
            detail: e.to_string(),
        })?;
    Ok(cursor.into_inner())
}

/// Arial run; every run goes through here so the font is never forgotten.
fn arial(text: &str) -> Run {
    Run::new()
        .add_text(text)
        .fonts(RunFonts::new().ascii("Arial"))
}

/// Body run with explicit line breaks for embedded newlines.
fn body_run(text: &str) -> Run {
    let mut run = Run::new().fonts(RunFonts::new().ascii("Arial"));
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        run = run.add_text(line);
    }
    run.size(SIZE_BODY).color(BODY)
}

fn add_section(mut docx: Docx, section: &Section) -> Docx {
    docx = docx.add_paragraph(
        Paragraph::new()
            .add_run(
                arial(&section.heading())
                    .bold()
                    .size(SIZE_HEADING)
                    .color(ACCENT),
            )
            .line_spacing(LineSpacing::new().before(320).after(160)),
    );
    for block in &section.blocks {
        docx = add_block(docx, block);
    }
    docx
}

fn add_block(docx: Docx, block: &Block) -> Docx {
    match block {
        Block::Paragraph(text) => docx.add_paragraph(
            Paragraph::new()
                .add_run(body_run(text))
                .align(AlignmentType::Both)
                .line_spacing(LineSpacing::new().after(320)),
        ),
        Block::SubHeading(text) => docx.add_paragraph(
            Paragraph::new()
                .add_run(arial(text).bold().size(SIZE_BODY).color(BLACK))
                .line_spacing(LineSpacing::new().before(160).after(120)),
        ),
        Block::Labeled { label, value } => docx.add_paragraph(
            Paragraph::new()
                .add_run(
                    arial(&format!("{}: ", label))
                        .bold()
                        .size(SIZE_BODY)
                        .color(BLACK),
                )
                .add_run(arial(value).size(SIZE_BODY).color(BODY))
                .line_spacing(LineSpacing::new().after(160)),
        ),
        Block::Grid(pairs) => {
            let rows = pairs
                .iter()
                .map(|pair| {
                    TableRow::new(vec![
                        shaded_cell(
                            arial(&format!("{}: ", pair.label))
                                .bold()
                                .size(SIZE_BODY)
                                .color(BLACK),
                            CONTENT_W / 2,
                        ),
                        shaded_cell(arial(&pair.value).size(SIZE_BODY).color(BODY), CONTENT_W / 2),
                    ])
                })
                .collect();
            docx.add_table(
                Table::new(rows)
                    .set_grid(vec![CONTENT_W / 2, CONTENT_W / 2])
                    .width(CONTENT_W, WidthType::Dxa)
                    .set_borders(TableBorders::new().clear_all()),
            )
        }
        Block::Bullets(items) => {
            let mut out = docx;
            for item in items {
                out = out.add_paragraph(bullet_paragraph(item));
            }
            out
        }
        Block::Table(table) => docx.add_table(cost_table(table)),
        Block::Panel { label, text, note } => {
            let mut out = docx.add_paragraph(
                Paragraph::new()
                    .add_run(
                        arial(&format!("{} ", label))
                            .bold()
                            .size(SIZE_BODY)
                            .color(BLACK),
                    )
                    .add_run(arial(text).size(SIZE_BODY).color(BODY))
                    .indent(Some(200), None, None, None)
                    .line_spacing(LineSpacing::new().after(80)),
            );
            if let Some(note) = note {
                out = out.add_paragraph(
                    Paragraph::new()
                        .add_run(arial(note).italic().size(SIZE_TABLE).color(MUTED))
                        .indent(Some(400), None, None, None)
                        .line_spacing(LineSpacing::new().after(160)),
                );
            }
            out
        }
    }
}

fn bullet_paragraph(item: &BulletItem) -> Paragraph {
    let mut text_run = arial(&item.text).size(SIZE_BODY);
    if item.strong {
        text_run = text_run.bold();
    } else {
        text_run = text_run.color(BODY);
    }
    let mut p = Paragraph::new()
        .add_run(arial("• ").bold().size(SIZE_BODY).color(ACCENT))
        .add_run(text_run);
    if let Some(badge) = &item.badge {
        p = p.add_run(
            arial(&format!(" ({})", badge))
                .italic()
                .size(SIZE_FINE)
                .color(MUTED),
        );
    }
    p.indent(Some(300), Some(SpecialIndentType::Hanging(200)), None, None)
        .line_spacing(LineSpacing::new().after(120))
}

fn cost_table(table: &TableBlock) -> Table {
    let grid: Vec<usize> = table
        .columns
        .iter()
        .map(|c| CONTENT_W * c.width_pct as usize / 100)
        .collect();

    let header = TableRow::new(
        table
            .columns
            .iter()
            .zip(&grid)
            .map(|(column, width)| {
                TableCell::new()
                    .add_paragraph(Paragraph::new().add_run(
                        arial(&column.header).bold().size(SIZE_TABLE).color(WHITE),
                    ))
                    .width(*width, WidthType::Dxa)
                    .shading(Shading::new().shd_type(ShdType::Clear).fill(ACCENT))
            })
            .collect(),
    );

    let mut rows = vec![header];
    for row in &table.rows {
        rows.push(TableRow::new(
            row.iter()
                .zip(&table.columns)
                .map(|(cell, column)| {
                    let mut p = Paragraph::new().add_run(arial(cell).size(SIZE_TABLE).color(BODY));
                    if column.numeric {
                        p = p.align(AlignmentType::Right);
                    }
                    TableCell::new().add_paragraph(p)
                })
                .collect(),
        ));
    }

    if let Some(total) = &table.total {
        let mut cells = Vec::new();
        if table.columns.len() > 2 {
            cells.push(
                TableCell::new()
                    .add_paragraph(Paragraph::new())
                    .grid_span(table.columns.len() - 2)
                    .shading(Shading::new().shd_type(ShdType::Clear).fill(SHADE)),
            );
        }
        cells.push(
            TableCell::new()
                .add_paragraph(
                    Paragraph::new()
                        .add_run(arial(&total.label).bold().size(SIZE_BODY).color(BLACK)),
                )
                .shading(Shading::new().shd_type(ShdType::Clear).fill(SHADE)),
        );
        cells.push(
            TableCell::new()
                .add_paragraph(
                    Paragraph::new()
                        .add_run(arial(&total.value).bold().size(SIZE_BODY).color(BLACK))
                        .align(AlignmentType::Right),
                )
                .shading(Shading::new().shd_type(ShdType::Clear).fill(SHADE)),
        );
        rows.push(TableRow::new(cells));
    }

    Table::new(rows)
        .set_grid(grid)
        .width(CONTENT_W, WidthType::Dxa)
}

fn shaded_cell(run: Run, width: usize) -> TableCell {
    TableCell::new()
        .add_paragraph(Paragraph::new().add_run(run))
        .width(width, WidthType::Dxa)
        .shading(Shading::new().shd_type(ShdType::Clear).fill(SHADE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Column, LabeledValue, SectionStyle, TotalRow};

    fn document_xml(doc: &DocumentModel) -> String {
        String::from_utf8(render_docx(doc).build().document).expect("utf-8 document part")
    }

    fn base_doc(sections: Vec<Section>) -> DocumentModel {
        DocumentModel {
            title: "Fassadeninstandsetzung".into(),
            reference: Some("Vergabenummer: 2024-001".into()),
            sections,
            footer: "Erstellt am 15.3.2024 | Leistungsbeschreibungs-Generator".into(),
        }
    }

    #[test]
    fn title_reference_and_footer_appear() {
        let xml = document_xml(&base_doc(vec![]));
        assert!(xml.contains("Fassadeninstandsetzung"));
        assert!(xml.contains("Vergabenummer: 2024-001"));
        assert!(xml.contains("Erstellt am 15.3.2024 | Leistungsbeschreibungs-Generator"));
        assert!(xml.contains("Arial"));
    }

    #[test]
    fn headings_carry_the_ordinal() {
        let xml = document_xml(&base_doc(vec![Section {
            ordinal: Some(3),
            title: "Leistungszeitraum".into(),
            style: SectionStyle::Plain,
            blocks: vec![Block::Labeled {
                label: "Startdatum".into(),
                value: "1.4.2024".into(),
            }],
        }]));
        assert!(xml.contains("3. Leistungszeitraum"));
        assert!(xml.contains("Startdatum: "));
        assert!(xml.contains("1.4.2024"));
    }

    #[test]
    fn cost_table_has_span_and_alignment() {
        let xml = document_xml(&base_doc(vec![Section {
            ordinal: Some(6),
            title: "Kostenstruktur".into(),
            style: SectionStyle::Plain,
            blocks: vec![Block::Table(TableBlock {
                columns: vec![
                    Column {
                        header: "Pos.".into(),
                        numeric: true,
                        width_pct: 10,
                    },
                    Column {
                        header: "Beschreibung".into(),
                        numeric: false,
                        width_pct: 60,
                    },
                    Column {
                        header: "Gesamtpreis (€)".into(),
                        numeric: true,
                        width_pct: 30,
                    },
                ],
                rows: vec![vec!["1".into(), "Planung".into(), "3.400,00".into()]],
                total: Some(TotalRow {
                    label: "Gesamtsumme".into(),
                    value: "3.400,00".into(),
                }),
            })],
        }]));
        assert!(xml.contains("Gesamtsumme"));
        assert!(xml.contains("gridSpan"));
        assert!(xml.contains("0066CC"));
        assert!(xml.contains("right"));
    }

    #[test]
    fn grid_cells_are_shaded_pairs() {
        let xml = document_xml(&base_doc(vec![Section {
            ordinal: None,
            title: "Grundkonfiguration".into(),
            style: SectionStyle::Callout,
            blocks: vec![Block::Grid(vec![LabeledValue::new(
                "Leistungsart",
                "Bauleistung (VOB)",
            )])],
        }]));
        assert!(xml.contains("Leistungsart: "));
        assert!(xml.contains("Bauleistung (VOB)"));
        assert!(xml.contains("F8F9FA"));
    }

    #[test]
    fn markup_in_user_text_is_escaped() {
        let xml = document_xml(&base_doc(vec![Section {
            ordinal: Some(1),
            title: "Ist-Zustand".into(),
            style: SectionStyle::Plain,
            blocks: vec![Block::Paragraph("Trockenbau & Ausbau <innen>".into())],
        }]));
        assert!(xml.contains("&amp;"));
        assert!(xml.contains("&lt;innen&gt;"));
    }

    #[test]
    fn badge_renders_in_parentheses() {
        let xml = document_xml(&base_doc(vec![Section {
            ordinal: Some(5),
            title: "Leistungsanforderungen".into(),
            style: SectionStyle::Plain,
            blocks: vec![Block::Bullets(vec![BulletItem {
                text: "Regionale Präsenz".into(),
                strong: true,
                badge: Some("Bewertungskriterium, 30%".into()),
            }])],
        }]));
        assert!(xml.contains("(Bewertungskriterium, 30%)"));
        assert!(xml.contains("• "));
    }

    #[test]
    fn packed_container_is_a_zip() {
        let bytes = pack_docx(&base_doc(vec![])).expect("packing must succeed");
        assert!(bytes.len() > 1000);
        assert_eq!(&bytes[0..2], b"PK");
    }
}
