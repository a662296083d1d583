//! HTML renderer: document tree to a self-contained page.
//!
//! Output is a complete standalone document (doctype, embedded stylesheet,
//! no external assets), so it can be written to disk as a preview or handed
//! to the rasterising engine as-is. Rendering is purely mechanical: every
//! gating and numbering decision was already made during composition, and
//! the same model always yields byte-identical HTML.
//!
//! All model text is escaped here. The model stores raw user input; any
//! markup a user typed into the form must come out as literal text.

use crate::document::{Block, DocumentModel, Section, SectionStyle};

/// Embedded stylesheet. The values mirror the historical print preview:
/// Arial at 10pt, the `#0066cc` accent, grey `#f8f9fa` callouts, and a
/// 210 mm container the rasteriser lays out at 794 px.
const STYLESHEET: &str = "\
body {
  font-family: Arial, sans-serif;
  font-size: 10pt;
  line-height: 1.4;
  margin: 0;
  padding: 0;
  color: #333;
  background-color: #ffffff;
}
.document-container {
  width: 100%;
  max-width: 210mm;
  margin: 0 auto;
  padding: 0;
}
.document-title {
  font-size: 16pt;
  margin-bottom: 20pt;
  text-align: center;
  font-weight: bold;
  color: #000;
  border-bottom: 2px solid #0066cc;
  padding-bottom: 10pt;
}
.vergabe-nummer {
  text-align: center;
  margin-bottom: 20pt;
  font-size: 11pt;
  color: #666;
  font-style: italic;
}
.callout {
  margin-bottom: 25pt;
  padding: 15pt;
  background-color: #f8f9fa;
  border-left: 4px solid #0066cc;
}
.callout h2 {
  font-size: 12pt;
  margin: 0 0 8pt 0;
  font-weight: bold;
  color: #0066cc;
}
.config-grid {
  display: table;
  width: 100%;
  margin-top: 8pt;
}
.config-row {
  display: table-row;
}
.config-cell {
  display: table-cell;
  padding: 3pt 10pt 3pt 0;
  font-size: 10pt;
  vertical-align: top;
  width: 50%;
}
.section {
  margin-bottom: 20pt;
  page-break-inside: avoid;
}
.section h2 {
  font-size: 12pt;
  margin: 16pt 0 8pt 0;
  font-weight: bold;
  color: #0066cc;
  border-bottom: 1px solid #ddd;
  padding-bottom: 4pt;
}
.section h3 {
  font-size: 10pt;
  font-weight: bold;
  color: #333;
  margin: 12pt 0 6pt 0;
}
.section p {
  line-height: 1.6;
  text-align: justify;
  margin-bottom: 8pt;
  font-size: 10pt;
  color: #333;
}
.labeled {
  margin-bottom: 6pt;
  font-size: 10pt;
}
.labeled strong {
  color: #000;
}
.requirements-list {
  margin: 10pt 0;
  padding-left: 0;
  list-style: none;
}
.requirements-list li {
  margin-bottom: 8pt;
  padding-left: 15pt;
  position: relative;
}
.requirements-list li:before {
  content: \"\\2022 \";
  color: #0066cc;
  font-weight: bold;
  position: absolute;
  left: 0;
}
.criteria-badge {
  font-size: 8pt;
  color: #666;
  font-style: italic;
}
.cost-table {
  width: 100%;
  border-collapse: collapse;
  margin: 10pt 0;
  font-size: 9pt;
}
.cost-table th,
.cost-table td {
  border: 1px solid #ddd;
  padding: 6pt;
  text-align: left;
}
.cost-table th {
  background-color: #0066cc;
  color: white;
  font-weight: bold;
}
.cost-table .number {
  text-align: right;
}
.attachment-item {
  padding: 6pt;
  margin: 4pt 0;
  background-color: #f8f9fa;
  border: 1px solid #e9ecef;
  border-radius: 3pt;
  font-size: 9pt;
}
.attachment-note {
  color: #666;
}
.footer {
  margin-top: 30pt;
  padding-top: 15pt;
  border-top: 1px solid #ddd;
  font-size: 8pt;
  color: #666;
  text-align: center;
}
";

/// Render the composed document as a standalone HTML page.
pub fn render_html(doc: &DocumentModel) -> String {
    let mut out = String::with_capacity(8 * 1024);
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape_html(&doc.title)));
    out.push_str("<style>\n");
    out.push_str(STYLESHEET);
    out.push_str("</style>\n</head>\n<body>\n<div class=\"document-container\">\n");

    out.push_str(&format!(
        "<h1 class=\"document-title\">{}</h1>\n",
        escape_html(&doc.title)
    ));
    if let Some(reference) = &doc.reference {
        out.push_str(&format!(
            "<div class=\"vergabe-nummer\">{}</div>\n",
            escape_html(reference)
        ));
    }

    for section in &doc.sections {
        render_section(&mut out, section);
    }

    out.push_str(&format!(
        "<div class=\"footer\">{}</div>\n",
        escape_html(&doc.footer)
    ));
    out.push_str("</div>\n</body>\n</html>\n");
    out
}

fn render_section(out: &mut String, section: &Section) {
    let class = match section.style {
        SectionStyle::Plain => "section",
        SectionStyle::Callout => "callout",
    };
    out.push_str(&format!(
        "<section class=\"{}\">\n<h2>{}</h2>\n",
        class,
        escape_html(&section.heading())
    ));
    for block in &section.blocks {
        render_block(out, block);
    }
    out.push_str("</section>\n");
}

fn render_block(out: &mut String, block: &Block) {
    match block {
        Block::Paragraph(text) => {
            out.push_str(&format!("<p>{}</p>\n", multiline(text)));
        }
        Block::SubHeading(text) => {
            out.push_str(&format!("<h3>{}</h3>\n", escape_html(text)));
        }
        Block::Labeled { label, value } => {
            out.push_str(&format!(
                "<div class=\"labeled\"><strong>{}:</strong> {}</div>\n",
                escape_html(label),
                escape_html(value)
            ));
        }
        Block::Grid(pairs) => {
            out.push_str("<div class=\"config-grid\">\n");
            for pair in pairs {
                out.push_str(&format!(
                    "<div class=\"config-row\"><div class=\"config-cell\"><strong>{}:</strong></div><div class=\"config-cell\">{}</div></div>\n",
                    escape_html(&pair.label),
                    escape_html(&pair.value)
                ));
            }
            out.push_str("</div>\n");
        }
        Block::Bullets(items) => {
            out.push_str("<ul class=\"requirements-list\">\n");
            for item in items {
                out.push_str("<li>");
                if item.strong {
                    out.push_str(&format!("<strong>{}</strong>", escape_html(&item.text)));
                } else {
                    out.push_str(&escape_html(&item.text));
                }
                if let Some(badge) = &item.badge {
                    out.push_str(&format!(
                        " <span class=\"criteria-badge\">({})</span>",
                        escape_html(badge)
                    ));
                }
                out.push_str("</li>\n");
            }
            out.push_str("</ul>\n");
        }
        Block::Table(table) => {
            out.push_str("<table class=\"cost-table\">\n<thead>\n<tr>");
            for column in &table.columns {
                out.push_str(&format!(
                    "<th style=\"width: {}%\">{}</th>",
                    column.width_pct,
                    escape_html(&column.header)
                ));
            }
            out.push_str("</tr>\n</thead>\n<tbody>\n");
            for row in &table.rows {
                out.push_str("<tr>");
                for (cell, column) in row.iter().zip(&table.columns) {
                    if column.numeric {
                        out.push_str(&format!("<td class=\"number\">{}</td>", escape_html(cell)));
                    } else {
                        out.push_str(&format!("<td>{}</td>", escape_html(cell)));
                    }
                }
                out.push_str("</tr>\n");
            }
            if let Some(total) = &table.total {
                out.push_str(&format!(
                    "<tr><th colspan=\"{}\">{}</th><th class=\"number\">{}</th></tr>\n",
                    table.columns.len().saturating_sub(1),
                    escape_html(&total.label),
                    escape_html(&total.value)
                ));
            }
            out.push_str("</tbody>\n</table>\n");
        }
        Block::Panel { label, text, note } => {
            out.push_str(&format!(
                "<div class=\"attachment-item\"><strong>{}</strong> {}",
                escape_html(label),
                escape_html(text)
            ));
            if let Some(note) = note {
                out.push_str(&format!(
                    "<br><span class=\"attachment-note\">{}</span>",
                    escape_html(note)
                ));
            }
            out.push_str("</div>\n");
        }
    }
}

/// Escape text for HTML element and attribute positions.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escaped paragraph text with line breaks kept visible.
fn multiline(text: &str) -> String {
    escape_html(text).replace('\n', "<br>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{BulletItem, Column, LabeledValue, TableBlock, TotalRow};

    fn doc_with(sections: Vec<Section>) -> DocumentModel {
        DocumentModel {
            title: "Leistungsbeschreibung".into(),
            reference: Some("Vergabenummer: 2024-001".into()),
            sections,
            footer: "Erstellt am 15.3.2024 | Leistungsbeschreibungs-Generator".into(),
        }
    }

    #[test]
    fn page_is_standalone_and_ordered() {
        let html = render_html(&doc_with(vec![
            Section {
                ordinal: None,
                title: "Grundkonfiguration".into(),
                style: SectionStyle::Callout,
                blocks: vec![Block::Grid(vec![LabeledValue::new("Ort", "Köln")])],
            },
            Section {
                ordinal: Some(1),
                title: "Ist-Zustand".into(),
                style: SectionStyle::Plain,
                blocks: vec![Block::Paragraph("Die Fassade weist Risse auf.".into())],
            },
        ]));

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<style>"));
        let callout = html.find("class=\"callout\"").unwrap();
        let section = html.find("1. Ist-Zustand").unwrap();
        assert!(callout < section);
        assert!(html.contains("<strong>Ort:</strong>"));
        assert!(html.contains("Köln"));
        assert!(html.contains("Erstellt am 15.3.2024"));
    }

    #[test]
    fn user_text_is_escaped() {
        let html = render_html(&doc_with(vec![Section {
            ordinal: Some(1),
            title: "Ist-Zustand".into(),
            style: SectionStyle::Plain,
            blocks: vec![Block::Paragraph("<script>alert(\"x\")</script> & Co".into())],
        }]));
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; Co"));
    }

    #[test]
    fn umlauts_pass_through_unencoded() {
        assert_eq!(escape_html("Gewährleistung & Prüfung"), "Gewährleistung &amp; Prüfung");
        assert_eq!(escape_html("5' Rohr"), "5&#39; Rohr");
    }

    #[test]
    fn paragraph_line_breaks_become_br() {
        assert_eq!(multiline("Zeile 1\nZeile 2"), "Zeile 1<br>Zeile 2");
    }

    #[test]
    fn badges_render_in_parentheses() {
        let html = render_html(&doc_with(vec![Section {
            ordinal: Some(1),
            title: "Leistungsanforderungen".into(),
            style: SectionStyle::Plain,
            blocks: vec![Block::Bullets(vec![BulletItem {
                text: "Regionale Präsenz".into(),
                strong: true,
                badge: Some("Bewertungskriterium, 30%".into()),
            }])],
        }]));
        assert!(html.contains("<strong>Regionale Präsenz</strong>"));
        assert!(html.contains("(Bewertungskriterium, 30%)"));
    }

    #[test]
    fn numeric_columns_are_right_aligned() {
        let html = render_html(&doc_with(vec![Section {
            ordinal: Some(1),
            title: "Kostenstruktur".into(),
            style: SectionStyle::Plain,
            blocks: vec![Block::Table(TableBlock {
                columns: vec![
                    Column {
                        header: "Beschreibung".into(),
                        numeric: false,
                        width_pct: 60,
                    },
                    Column {
                        header: "Gesamtpreis (€)".into(),
                        numeric: true,
                        width_pct: 40,
                    },
                ],
                rows: vec![vec!["Planung".into(), "3.400,00".into()]],
                total: Some(TotalRow {
                    label: "Gesamtsumme".into(),
                    value: "3.400,00".into(),
                }),
            })],
        }]));
        assert!(html.contains("<td>Planung</td>"));
        assert!(html.contains("<td class=\"number\">3.400,00</td>"));
        assert!(html.contains("<th colspan=\"1\">Gesamtsumme</th>"));
    }

    #[test]
    fn same_model_renders_byte_identical() {
        let doc = doc_with(vec![]);
        assert_eq!(render_html(&doc), render_html(&doc));
    }
}
