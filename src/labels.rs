//! German document strings: section titles, field labels, outcome messages.
//!
//! Every user-visible string lives here so both renderers draw from a single
//! source of truth. The HTML and Word outputs must contain identical wording;
//! scattering the strings across the renderers is how the two historically
//! drifted apart (the Word output gained the STLB row and mapped service-type
//! labels while the PDF output kept raw wire values).
//!
//! The generator targets German public procurement; the strings are German by
//! design and not routed through a localisation layer.

// ── Section titles ───────────────────────────────────────────────────────

pub const SECTION_BASICS: &str = "Grundkonfiguration";
pub const SECTION_CURRENT_SITUATION: &str = "Ist-Zustand";
pub const SECTION_SERVICE_DEFINITION: &str = "Leistungsbeschreibung";
pub const SECTION_SERVICE_PERIOD: &str = "Leistungszeitraum";
pub const SECTION_BIDDER_REQUIREMENTS: &str = "Anforderungen an den Bieter";
pub const SECTION_SERVICE_REQUIREMENTS: &str = "Leistungsanforderungen";
pub const SECTION_COSTS: &str = "Kostenstruktur";
pub const SECTION_CONTRACT: &str = "Vertragsdetails";
pub const SECTION_ATTACHMENTS: &str = "Anlagen";

// ── Field labels ─────────────────────────────────────────────────────────

pub const LABEL_REFERENCE: &str = "Vergabenummer";
pub const LABEL_SERVICE_TYPE: &str = "Leistungsart";
pub const LABEL_CONTRACT_FORM: &str = "Vertragsform";
pub const LABEL_LOCATION: &str = "Ort";
pub const LABEL_STLB: &str = "STLB-Nummer";
pub const LABEL_START_DATE: &str = "Startdatum";
pub const LABEL_END_DATE: &str = "Enddatum";
pub const LABEL_VOLUME: &str = "Vertragsvolumen";
pub const LABEL_DURATION: &str = "Vertragslaufzeit";
pub const LABEL_PAYMENT: &str = "Zahlungsbedingungen";
pub const LABEL_WARRANTY: &str = "Gewährleistung";
pub const LABEL_CONTACT: &str = "Ansprechperson";
pub const LABEL_EMAIL: &str = "E-Mail";
pub const LABEL_PHONE: &str = "Telefon";

// ── Compliance acknowledgements ──────────────────────────────────────────

pub const LABEL_ACK_GUIDELINES: &str = "Vergaberichtlinien zur Kenntnis genommen";
pub const LABEL_ACK_EQUAL_TREATMENT: &str = "Gleichbehandlungsgrundsatz beachtet";
pub const LABEL_ACK_TRANSPARENCY: &str = "Transparenzgebot beachtet";
pub const VALUE_YES: &str = "Ja";

// ── Enum display labels ──────────────────────────────────────────────────

pub const SERVICE_TYPE_VOB: &str = "Bauleistung (VOB)";
pub const SERVICE_TYPE_VOL: &str = "Liefer-/Dienstleistung (VOL)";
pub const CONTRACT_FORM_SINGLE: &str = "Einzelauftrag";
pub const CONTRACT_FORM_FRAMEWORK: &str = "Rahmenvereinbarung";
pub const CONTRACT_FORM_PURCHASE: &str = "Kauf";
pub const CRITERION_EXCLUSION: &str = "Ausschlusskriterium";
pub const CRITERION_SCORED: &str = "Bewertungskriterium";

// ── Cost table ───────────────────────────────────────────────────────────

pub const COST_COL_POSITION: &str = "Pos.";
pub const COST_COL_DESCRIPTION: &str = "Beschreibung";
pub const COST_COL_QUANTITY: &str = "Menge/Einheit";
pub const COST_COL_UNIT_PRICE: &str = "Einzelpreis (€)";
pub const COST_COL_TOTAL: &str = "Gesamtpreis (€)";
pub const COST_GRAND_TOTAL: &str = "Gesamtsumme";

// ── Attachments / misc ───────────────────────────────────────────────────

pub const ATTACHMENT_PREFIX: &str = "Anlage";
pub const DURATION_UNIT: &str = "Jahr(e)";
pub const WARRANTY_UNIT: &str = "Monate";
pub const DEFAULT_TITLE: &str = "Leistungsbeschreibung";
pub const FOOTER_CREATED: &str = "Erstellt am";
pub const DEFAULT_GENERATOR_LABEL: &str = "Leistungsbeschreibungs-Generator";

// ── Export outcome messages ──────────────────────────────────────────────
//
// These exact strings are the public contract of the outcome-returning
// drivers; downstream tooling matches on them.

pub const PDF_SUCCESS: &str = "PDF erfolgreich exportiert!";
pub const PDF_FAILURE_PREFIX: &str = "Fehler beim PDF-Export: ";
pub const DOCX_SUCCESS: &str = "Word-Dokument erfolgreich exportiert!";
pub const DOCX_FAILURE_PREFIX: &str = "Fehler beim Word-Export: ";

// ── Default output filenames ─────────────────────────────────────────────

pub const DEFAULT_PDF_FILENAME: &str = "Leistungsbeschreibung.pdf";
pub const DEFAULT_DOCX_FILENAME: &str = "Leistungsbeschreibung.docx";
