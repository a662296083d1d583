//! Section assembly: one record in, one document tree out.
//!
//! ## Why one assembler?
//!
//! Earlier revisions of this tool kept two copies of the section logic, one
//! per output format, and they drifted: the Word path grew an STLB row the
//! PDF path never had, and section numbers were hard-coded so a document
//! without an Ist-Zustand section still opened with "2.". Composing the
//! tree once puts every gating and numbering decision in this module, and
//! the renderers cannot disagree about content they never compute.
//!
//! Gating rule: a section appears exactly when its backing data is present
//! on the normalised record. Numbered sections take consecutive ordinals in
//! order of appearance, counting only sections that are actually present;
//! the two callout sections (Grundkonfiguration, Vertragsdetails) never
//! carry a number.

use crate::document::{
    Block, BulletItem, Column, DocumentModel, LabeledValue, Section, SectionStyle, TableBlock,
    TotalRow,
};
use crate::format::{format_currency, format_date, format_quantity};
use crate::labels;
use crate::model::Specification;
use chrono::NaiveDate;
use tracing::debug;

/// Compose the renderable document for a normalised record.
///
/// `today` stamps the footer; `generator_label` names the producing tool in
/// it. Both come from [`crate::ExportConfig`] so tests can pin them.
pub fn compose_document(
    spec: &Specification,
    today: NaiveDate,
    generator_label: &str,
) -> DocumentModel {
    let mut numberer = Numberer::default();
    let mut sections = Vec::new();

    sections.extend(basics_section(spec));
    sections.extend(situation_section(spec, &mut numberer));
    sections.extend(definition_section(spec, &mut numberer));
    sections.extend(period_section(spec, &mut numberer));
    sections.extend(bidder_section(spec, &mut numberer));
    sections.extend(requirements_section(spec, &mut numberer));
    sections.extend(costs_section(spec, &mut numberer));
    sections.extend(contract_section(spec));
    sections.extend(attachments_section(spec, &mut numberer));

    debug!(sections = sections.len(), "document composed");

    DocumentModel {
        title: spec.project_title.clone(),
        reference: spec
            .vergabe_nr
            .as_ref()
            .map(|nr| format!("{}: {}", labels::LABEL_REFERENCE, nr)),
        sections,
        footer: format!(
            "{} {} | {}",
            labels::FOOTER_CREATED,
            format_date(today),
            generator_label
        ),
    }
}

/// Hands out consecutive ordinals to the sections that are present.
#[derive(Default)]
struct Numberer {
    issued: u32,
}

impl Numberer {
    fn take(&mut self) -> Option<u32> {
        self.issued += 1;
        Some(self.issued)
    }
}

fn labeled(label: &str, value: impl Into<String>) -> Block {
    Block::Labeled {
        label: label.to_string(),
        value: value.into(),
    }
}

// ── Section builders, in document order ──────────────────────────────────

fn basics_section(spec: &Specification) -> Option<Section> {
    let mut pairs = Vec::new();
    if let Some(service_type) = &spec.service_type {
        pairs.push(LabeledValue::new(
            labels::LABEL_SERVICE_TYPE,
            service_type.label(),
        ));
    }
    if let Some(contract_form) = &spec.contract_form {
        pairs.push(LabeledValue::new(
            labels::LABEL_CONTRACT_FORM,
            contract_form.label(),
        ));
    }
    if let Some(location) = &spec.location {
        pairs.push(LabeledValue::new(labels::LABEL_LOCATION, location.as_str()));
    }
    if pairs.is_empty() {
        return None;
    }
    Some(Section {
        ordinal: None,
        title: labels::SECTION_BASICS.to_string(),
        style: SectionStyle::Callout,
        blocks: vec![Block::Grid(pairs)],
    })
}

fn situation_section(spec: &Specification, numberer: &mut Numberer) -> Option<Section> {
    let text = spec.current_situation.as_ref()?;
    Some(Section {
        ordinal: numberer.take(),
        title: labels::SECTION_CURRENT_SITUATION.to_string(),
        style: SectionStyle::Plain,
        blocks: vec![Block::Paragraph(text.clone())],
    })
}

fn definition_section(spec: &Specification, numberer: &mut Numberer) -> Option<Section> {
    if spec.stlb_number.is_none() && spec.service_definition.is_none() {
        return None;
    }
    let mut blocks = Vec::new();
    if let Some(stlb) = &spec.stlb_number {
        blocks.push(labeled(labels::LABEL_STLB, stlb.as_str()));
    }
    if let Some(text) = &spec.service_definition {
        blocks.push(Block::Paragraph(text.clone()));
    }
    Some(Section {
        ordinal: numberer.take(),
        title: labels::SECTION_SERVICE_DEFINITION.to_string(),
        style: SectionStyle::Plain,
        blocks,
    })
}

fn period_section(spec: &Specification, numberer: &mut Numberer) -> Option<Section> {
    if spec.start_date.is_none() && spec.end_date.is_none() {
        return None;
    }
    let mut blocks = Vec::new();
    if let Some(start) = spec.start_date {
        blocks.push(labeled(labels::LABEL_START_DATE, format_date(start)));
    }
    if let Some(end) = spec.end_date {
        blocks.push(labeled(labels::LABEL_END_DATE, format_date(end)));
    }
    Some(Section {
        ordinal: numberer.take(),
        title: labels::SECTION_SERVICE_PERIOD.to_string(),
        style: SectionStyle::Plain,
        blocks,
    })
}

fn bidder_section(spec: &Specification, numberer: &mut Numberer) -> Option<Section> {
    if spec.bidder_requirements.is_empty() {
        return None;
    }
    let mut blocks: Vec<Block> = Vec::new();
    for group in &spec.bidder_requirements {
        if let Some(criterion) = &group.criterion {
            blocks.push(Block::SubHeading(criterion.clone()));
        }
        if group.items.is_empty() {
            continue;
        }
        let items = group.items.iter().map(|t| BulletItem::plain(t.clone()));
        // Ungrouped entries run together into the open list.
        if let Some(Block::Bullets(list)) = blocks.last_mut() {
            list.extend(items);
        } else {
            blocks.push(Block::Bullets(items.collect()));
        }
    }
    Some(Section {
        ordinal: numberer.take(),
        title: labels::SECTION_BIDDER_REQUIREMENTS.to_string(),
        style: SectionStyle::Plain,
        blocks,
    })
}

fn requirements_section(spec: &Specification, numberer: &mut Numberer) -> Option<Section> {
    if spec.service_requirements.is_empty() {
        return None;
    }
    let bullets = spec
        .service_requirements
        .iter()
        .map(|req| BulletItem {
            text: req.text.clone(),
            strong: true,
            badge: req.criterion.as_ref().map(|c| c.badge()),
        })
        .collect();
    Some(Section {
        ordinal: numberer.take(),
        title: labels::SECTION_SERVICE_REQUIREMENTS.to_string(),
        style: SectionStyle::Plain,
        blocks: vec![Block::Bullets(bullets)],
    })
}

fn costs_section(spec: &Specification, numberer: &mut Numberer) -> Option<Section> {
    if spec.cost_rows.is_empty() {
        return None;
    }
    let columns = vec![
        Column {
            header: labels::COST_COL_POSITION.to_string(),
            numeric: true,
            width_pct: 10,
        },
        Column {
            header: labels::COST_COL_DESCRIPTION.to_string(),
            numeric: false,
            width_pct: 40,
        },
        Column {
            header: labels::COST_COL_QUANTITY.to_string(),
            numeric: true,
            width_pct: 20,
        },
        Column {
            header: labels::COST_COL_UNIT_PRICE.to_string(),
            numeric: true,
            width_pct: 15,
        },
        Column {
            header: labels::COST_COL_TOTAL.to_string(),
            numeric: true,
            width_pct: 15,
        },
    ];
    let rows = spec
        .cost_rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            vec![
                (i + 1).to_string(),
                row.description.clone(),
                row.quantity_display(),
                format_currency(row.unit_price),
                format_currency(row.total()),
            ]
        })
        .collect();
    Some(Section {
        ordinal: numberer.take(),
        title: labels::SECTION_COSTS.to_string(),
        style: SectionStyle::Plain,
        blocks: vec![Block::Table(TableBlock {
            columns,
            rows,
            total: Some(TotalRow {
                label: labels::COST_GRAND_TOTAL.to_string(),
                value: format_currency(spec.total_cost()),
            }),
        })],
    })
}

fn contract_section(spec: &Specification) -> Option<Section> {
    if !spec.user_role.is_procurement() || spec.contract.is_empty() {
        return None;
    }
    let contract = &spec.contract;
    let mut blocks = Vec::new();
    if let Some(volume) = contract.volume {
        blocks.push(labeled(labels::LABEL_VOLUME, format_currency(volume)));
    }
    if let Some(years) = contract.duration_years {
        blocks.push(labeled(
            labels::LABEL_DURATION,
            format!("{} {}", format_quantity(years), labels::DURATION_UNIT),
        ));
    }
    if let Some(terms) = &contract.payment_terms {
        blocks.push(labeled(labels::LABEL_PAYMENT, terms.as_str()));
    }
    if let Some(warranty) = &contract.warranty {
        blocks.push(labeled(labels::LABEL_WARRANTY, warranty.as_str()));
    }
    if let Some(person) = &contract.contact_person {
        blocks.push(labeled(labels::LABEL_CONTACT, person.as_str()));
    }
    if let Some(email) = &contract.contact_email {
        blocks.push(labeled(labels::LABEL_EMAIL, email.as_str()));
    }
    if let Some(phone) = &contract.contact_phone {
        blocks.push(labeled(labels::LABEL_PHONE, phone.as_str()));
    }
    let acks = contract.acknowledgements;
    if acks.guidelines_understood {
        blocks.push(labeled(labels::LABEL_ACK_GUIDELINES, labels::VALUE_YES));
    }
    if acks.equal_treatment {
        blocks.push(labeled(labels::LABEL_ACK_EQUAL_TREATMENT, labels::VALUE_YES));
    }
    if acks.transparency {
        blocks.push(labeled(labels::LABEL_ACK_TRANSPARENCY, labels::VALUE_YES));
    }
    Some(Section {
        ordinal: None,
        title: labels::SECTION_CONTRACT.to_string(),
        style: SectionStyle::Callout,
        blocks,
    })
}

fn attachments_section(spec: &Specification, numberer: &mut Numberer) -> Option<Section> {
    if spec.attachments.is_empty() {
        return None;
    }
    let blocks = spec
        .attachments
        .iter()
        .enumerate()
        .map(|(i, attachment)| Block::Panel {
            label: format!("{} {}:", labels::ATTACHMENT_PREFIX, i + 1),
            text: attachment.name.clone(),
            note: attachment.description.clone(),
        })
        .collect();
    Some(Section {
        ordinal: numberer.take(),
        title: labels::SECTION_ATTACHMENTS.to_string(),
        style: SectionStyle::Plain,
        blocks,
    })
}
