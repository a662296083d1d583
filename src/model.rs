//! The canonical specification record and its permissive wire form.
//!
//! Input arrives as JSON captured from the historical web form. That format
//! is loose: camelCase keys, empty strings standing in for absent values,
//! two generations of array-entry shapes, and a legacy field name for cost
//! descriptions. [`SpecificationForm`] accepts all of it without complaint.
//!
//! [`Specification`] is the cleaned-up record the rest of the pipeline works
//! with. Normalisation happens exactly once, in [`Specification::from_form`]:
//! strings are trimmed, empties become `None`, dates are parsed, wire enums
//! become typed enums, and both historical requirement shapes collapse into
//! one. Renderers never look at the wire form.

use crate::format::{format_quantity, parse_iso_date};
use crate::labels;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// ── Wire form ────────────────────────────────────────────────────────────

/// Raw form state as captured by the web UI.
///
/// Every field is optional on the wire; unknown keys are ignored. Use
/// [`Specification::from_form`] to obtain the normalised record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpecificationForm {
    pub user_role: String,
    pub project_title: String,
    pub vergabe_nr: String,
    pub service_type: String,
    pub contract_form: String,
    pub location: String,
    pub current_situation: String,
    pub stlb_number: String,
    pub service_definition: String,
    pub start_date: String,
    pub end_date: String,
    pub bidder_requirements: Vec<BidderRequirementForm>,
    pub service_requirements: Vec<ServiceRequirementForm>,
    pub cost_rows: Vec<CostRowForm>,
    pub contract_volume: Option<f64>,
    pub contract_duration: Option<f64>,
    pub payment_terms: String,
    pub custom_payment_terms: String,
    pub warranty_period: String,
    pub custom_warranty: Option<f64>,
    pub contact_person: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub guidelines_understood: bool,
    pub equal_treatment: bool,
    pub transparency: bool,
    pub attachments: Vec<AttachmentForm>,
}

impl SpecificationForm {
    /// Parse a form from its JSON wire representation.
    pub fn from_json_str(s: &str) -> Result<Self, crate::error::ExportError> {
        serde_json::from_str(s).map_err(|e| crate::error::ExportError::InvalidForm {
            detail: e.to_string(),
        })
    }
}

/// One bidder-requirement entry, covering both historical shapes.
///
/// The grouped shape carries `criterion` + `requirements`; the older flat
/// shape carries only `description`. All keys are optional here so a single
/// struct can absorb either; [`Specification::from_form`] decides the shape
/// from whichever keys are non-empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BidderRequirementForm {
    pub criterion: String,
    pub requirements: Vec<SubRequirementForm>,
    pub description: String,
}

/// A single item under a grouped bidder requirement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubRequirementForm {
    pub text: String,
    pub description: String,
}

/// One service-requirement entry. `text` is current, `description` legacy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceRequirementForm {
    pub text: String,
    pub description: String,
    /// `"A"` = exclusion criterion, `"B"` = scored criterion.
    pub criteria_type: String,
    pub weight: Option<f64>,
}

/// One cost-table row. `service` is the legacy key for `description`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CostRowForm {
    pub description: String,
    pub service: String,
    /// Number or free text ("ca. 40 Stunden"); both occur in stored forms.
    pub quantity: Option<QuantityForm>,
    pub unit: String,
    pub unit_price: Option<f64>,
}

/// Wire quantity: the form stored numbers early on and free text later.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuantityForm {
    Number(f64),
    Text(String),
}

/// One attachment entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttachmentForm {
    pub name: String,
    pub description: String,
}

// ── Normalised record ────────────────────────────────────────────────────

/// Who is exporting the document. Contract details are procurement-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Procurement,
    Department,
}

impl UserRole {
    fn from_wire(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("einkauf") {
            UserRole::Procurement
        } else {
            UserRole::Department
        }
    }

    pub fn is_procurement(&self) -> bool {
        matches!(self, UserRole::Procurement)
    }
}

/// Procurement regime of the service. Unknown wire values pass through so
/// they still display rather than silently vanishing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Construction,
    SupplyService,
    Other(String),
}

impl ServiceType {
    fn from_wire(s: &str) -> Option<Self> {
        let t = s.trim();
        if t.is_empty() {
            return None;
        }
        Some(match t.to_ascii_lowercase().as_str() {
            "vob" => ServiceType::Construction,
            "vol" => ServiceType::SupplyService,
            _ => ServiceType::Other(t.to_string()),
        })
    }

    pub fn label(&self) -> &str {
        match self {
            ServiceType::Construction => labels::SERVICE_TYPE_VOB,
            ServiceType::SupplyService => labels::SERVICE_TYPE_VOL,
            ServiceType::Other(raw) => raw,
        }
    }
}

/// Contract form, same passthrough rule as [`ServiceType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractForm {
    SingleOrder,
    Framework,
    Purchase,
    Other(String),
}

impl ContractForm {
    fn from_wire(s: &str) -> Option<Self> {
        let t = s.trim();
        if t.is_empty() {
            return None;
        }
        Some(match t.to_ascii_lowercase().as_str() {
            "einzelauftrag" => ContractForm::SingleOrder,
            "rahmenvereinbarung" => ContractForm::Framework,
            "kauf" => ContractForm::Purchase,
            _ => ContractForm::Other(t.to_string()),
        })
    }

    pub fn label(&self) -> &str {
        match self {
            ContractForm::SingleOrder => labels::CONTRACT_FORM_SINGLE,
            ContractForm::Framework => labels::CONTRACT_FORM_FRAMEWORK,
            ContractForm::Purchase => labels::CONTRACT_FORM_PURCHASE,
            ContractForm::Other(raw) => raw,
        }
    }
}

/// Award criterion attached to a service requirement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AwardCriterion {
    Exclusion,
    Scored { weight: Option<f64> },
}

impl AwardCriterion {
    fn from_wire(kind: &str, weight: Option<f64>) -> Option<Self> {
        match kind.trim() {
            "A" | "a" => Some(AwardCriterion::Exclusion),
            "B" | "b" => Some(AwardCriterion::Scored { weight }),
            _ => None,
        }
    }

    /// The italic annotation shown after the requirement text, e.g.
    /// `"Bewertungskriterium, 30%"`.
    pub fn badge(&self) -> String {
        match self {
            AwardCriterion::Exclusion => labels::CRITERION_EXCLUSION.to_string(),
            AwardCriterion::Scored { weight: Some(w) } => {
                format!("{}, {}%", labels::CRITERION_SCORED, format_quantity(*w))
            }
            AwardCriterion::Scored { weight: None } => labels::CRITERION_SCORED.to_string(),
        }
    }
}

/// A quantity keeps both the text the user typed (for display) and the
/// leading numeric value (for the cost total).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quantity {
    pub raw: String,
    pub value: f64,
}

static RE_LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+(?:[.,]\d+)?)").expect("leading-number regex"));

impl Quantity {
    fn from_wire(form: Option<&QuantityForm>) -> Self {
        match form {
            Some(QuantityForm::Number(n)) if n.is_finite() => Quantity {
                raw: format_quantity(*n),
                value: *n,
            },
            Some(QuantityForm::Number(_)) => Quantity {
                raw: String::new(),
                value: 0.0,
            },
            Some(QuantityForm::Text(s)) => Quantity::parse_text(s),
            None => Quantity {
                raw: String::new(),
                value: 0.0,
            },
        }
    }

    /// Extract the leading number from free text: `"ca. 40 Stunden"` has no
    /// leading digit and parses to 0, `"40 Stunden"` parses to 40,
    /// `"2,5"` parses to 2.5 (decimal comma accepted).
    pub fn parse_text(s: &str) -> Self {
        let raw = s.trim().to_string();
        let value = RE_LEADING_NUMBER
            .captures(&raw)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().replace(',', ".").parse::<f64>().ok())
            .unwrap_or(0.0);
        Quantity { raw, value }
    }
}

/// One bidder requirement: an optional criterion heading plus its items.
/// Flat legacy entries become a single item without a heading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BidderRequirement {
    pub criterion: Option<String>,
    pub items: Vec<String>,
}

/// One service requirement with an optional award-criterion annotation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceRequirement {
    pub text: String,
    pub criterion: Option<AwardCriterion>,
}

/// One cost-table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostRow {
    pub description: String,
    pub quantity: Quantity,
    pub unit: Option<String>,
    pub unit_price: f64,
}

impl CostRow {
    /// Row total: parsed quantity times unit price.
    pub fn total(&self) -> f64 {
        self.quantity.value * self.unit_price
    }

    /// The Menge/Einheit cell: quantity text plus unit when present.
    pub fn quantity_display(&self) -> String {
        match &self.unit {
            Some(unit) if !self.quantity.raw.is_empty() => {
                format!("{} {}", self.quantity.raw, unit)
            }
            Some(unit) => unit.clone(),
            None => self.quantity.raw.clone(),
        }
    }
}

/// One attachment with an optional description line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attachment {
    pub name: String,
    pub description: Option<String>,
}

/// Compliance checkboxes; each true flag renders as a `Ja` row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Acknowledgements {
    pub guidelines_understood: bool,
    pub equal_treatment: bool,
    pub transparency: bool,
}

impl Acknowledgements {
    pub fn any(&self) -> bool {
        self.guidelines_understood || self.equal_treatment || self.transparency
    }
}

/// Contract details, rendered only for procurement users.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContractDetails {
    pub volume: Option<f64>,
    pub duration_years: Option<f64>,
    /// Resolved payment terms; `"custom"` on the wire selects the free text.
    pub payment_terms: Option<String>,
    /// Resolved warranty; `"custom"` on the wire becomes `"{n} Monate"`.
    pub warranty: Option<String>,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub acknowledgements: Acknowledgements,
}

impl ContractDetails {
    pub fn is_empty(&self) -> bool {
        self.volume.is_none()
            && self.duration_years.is_none()
            && self.payment_terms.is_none()
            && self.warranty.is_none()
            && self.contact_person.is_none()
            && self.contact_email.is_none()
            && self.contact_phone.is_none()
            && !self.acknowledgements.any()
    }
}

/// The normalised specification record built once per export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Specification {
    pub user_role: UserRole,
    /// Defaults to `"Leistungsbeschreibung"` when the form left it blank.
    pub project_title: String,
    pub vergabe_nr: Option<String>,
    pub service_type: Option<ServiceType>,
    pub contract_form: Option<ContractForm>,
    pub location: Option<String>,
    pub current_situation: Option<String>,
    pub stlb_number: Option<String>,
    pub service_definition: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub bidder_requirements: Vec<BidderRequirement>,
    pub service_requirements: Vec<ServiceRequirement>,
    pub cost_rows: Vec<CostRow>,
    pub contract: ContractDetails,
    pub attachments: Vec<Attachment>,
}

impl Specification {
    /// Normalise a wire form into the canonical record.
    ///
    /// Entries with no content at all are dropped here; section gating later
    /// looks only at the normalised record, so a list of empty objects does
    /// not conjure an empty section.
    pub fn from_form(form: &SpecificationForm) -> Self {
        Specification {
            user_role: UserRole::from_wire(&form.user_role),
            project_title: opt(&form.project_title)
                .unwrap_or_else(|| labels::DEFAULT_TITLE.to_string()),
            vergabe_nr: opt(&form.vergabe_nr),
            service_type: ServiceType::from_wire(&form.service_type),
            contract_form: ContractForm::from_wire(&form.contract_form),
            location: opt(&form.location),
            current_situation: opt(&form.current_situation),
            stlb_number: opt(&form.stlb_number),
            service_definition: opt(&form.service_definition),
            start_date: parse_iso_date(&form.start_date),
            end_date: parse_iso_date(&form.end_date),
            bidder_requirements: form
                .bidder_requirements
                .iter()
                .filter_map(normalize_bidder_requirement)
                .collect(),
            service_requirements: form
                .service_requirements
                .iter()
                .filter_map(normalize_service_requirement)
                .collect(),
            cost_rows: form.cost_rows.iter().filter_map(normalize_cost_row).collect(),
            contract: normalize_contract(form),
            attachments: form.attachments.iter().filter_map(normalize_attachment).collect(),
        }
    }

    /// Grand total of the cost table: Σ quantity × unit price.
    pub fn total_cost(&self) -> f64 {
        self.cost_rows.iter().map(CostRow::total).sum()
    }
}

// ── Normalisation helpers ────────────────────────────────────────────────

/// Trimmed non-empty string, or `None`.
fn opt(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

fn normalize_bidder_requirement(entry: &BidderRequirementForm) -> Option<BidderRequirement> {
    let criterion = opt(&entry.criterion);
    let items: Vec<String> = entry
        .requirements
        .iter()
        .filter_map(|r| opt(&r.text).or_else(|| opt(&r.description)))
        .collect();

    if criterion.is_some() || !items.is_empty() {
        return Some(BidderRequirement { criterion, items });
    }
    // Flat legacy shape: a bare description becomes one ungrouped item.
    opt(&entry.description).map(|text| BidderRequirement {
        criterion: None,
        items: vec![text],
    })
}

fn normalize_service_requirement(entry: &ServiceRequirementForm) -> Option<ServiceRequirement> {
    let text = opt(&entry.text).or_else(|| opt(&entry.description))?;
    Some(ServiceRequirement {
        text,
        criterion: AwardCriterion::from_wire(&entry.criteria_type, entry.weight),
    })
}

fn normalize_cost_row(entry: &CostRowForm) -> Option<CostRow> {
    let description = opt(&entry.description).or_else(|| opt(&entry.service));
    let quantity = Quantity::from_wire(entry.quantity.as_ref());
    let unit = opt(&entry.unit);
    let unit_price = entry.unit_price.filter(|p| p.is_finite());

    if description.is_none() && quantity.raw.is_empty() && unit.is_none() && unit_price.is_none() {
        return None;
    }
    Some(CostRow {
        description: description.unwrap_or_default(),
        quantity,
        unit,
        unit_price: unit_price.unwrap_or(0.0),
    })
}

fn normalize_contract(form: &SpecificationForm) -> ContractDetails {
    ContractDetails {
        volume: form.contract_volume.filter(|v| v.is_finite()),
        duration_years: form.contract_duration.filter(|v| v.is_finite()),
        payment_terms: resolve_payment_terms(form),
        warranty: resolve_warranty(form),
        contact_person: opt(&form.contact_person),
        contact_email: opt(&form.contact_email),
        contact_phone: opt(&form.contact_phone),
        acknowledgements: Acknowledgements {
            guidelines_understood: form.guidelines_understood,
            equal_treatment: form.equal_treatment,
            transparency: form.transparency,
        },
    }
}

fn resolve_payment_terms(form: &SpecificationForm) -> Option<String> {
    let terms = form.payment_terms.trim();
    if terms.is_empty() {
        return None;
    }
    if terms == "custom" {
        opt(&form.custom_payment_terms)
    } else {
        Some(terms.to_string())
    }
}

fn resolve_warranty(form: &SpecificationForm) -> Option<String> {
    let period = form.warranty_period.trim();
    if period.is_empty() {
        return None;
    }
    if period == "custom" {
        form.custom_warranty
            .filter(|v| v.is_finite())
            .map(|v| format!("{} {}", format_quantity(v), labels::WARRANTY_UNIT))
    } else {
        Some(period.to_string())
    }
}

fn normalize_attachment(entry: &AttachmentForm) -> Option<Attachment> {
    let name = opt(&entry.name);
    let description = opt(&entry.description);
    if name.is_none() && description.is_none() {
        return None;
    }
    Some(Attachment {
        name: name.unwrap_or_default(),
        description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form_from(value: serde_json::Value) -> SpecificationForm {
        serde_json::from_value(value).expect("wire form must deserialise")
    }

    #[test]
    fn role_einkauf_is_procurement() {
        assert_eq!(UserRole::from_wire("einkauf"), UserRole::Procurement);
        assert_eq!(UserRole::from_wire("EINKAUF "), UserRole::Procurement);
        assert_eq!(UserRole::from_wire("bedarfsstelle"), UserRole::Department);
        assert_eq!(UserRole::from_wire(""), UserRole::Department);
        assert_eq!(UserRole::from_wire("admin"), UserRole::Department);
    }

    #[test]
    fn service_type_labels() {
        assert_eq!(
            ServiceType::from_wire("vob").unwrap().label(),
            "Bauleistung (VOB)"
        );
        assert_eq!(
            ServiceType::from_wire("VOL").unwrap().label(),
            "Liefer-/Dienstleistung (VOL)"
        );
        // Unknown values display as-is instead of vanishing.
        assert_eq!(
            ServiceType::from_wire("freiberuflich").unwrap().label(),
            "freiberuflich"
        );
        assert_eq!(ServiceType::from_wire("  "), None);
    }

    #[test]
    fn contract_form_labels() {
        assert_eq!(
            ContractForm::from_wire("einzelauftrag").unwrap().label(),
            "Einzelauftrag"
        );
        assert_eq!(
            ContractForm::from_wire("rahmenvereinbarung").unwrap().label(),
            "Rahmenvereinbarung"
        );
        assert_eq!(ContractForm::from_wire("kauf").unwrap().label(), "Kauf");
    }

    #[test]
    fn both_bidder_shapes_normalise() {
        let form = form_from(json!({
            "bidderRequirements": [
                {
                    "criterion": "Fachkunde",
                    "requirements": [
                        { "text": "Referenzen der letzten 3 Jahre" },
                        { "text": "" },
                        { "description": "Qualifikationsnachweis" }
                    ]
                },
                { "description": "Eintragung in das Handelsregister" },
                {}
            ]
        }));
        let spec = Specification::from_form(&form);

        assert_eq!(spec.bidder_requirements.len(), 2);
        let grouped = &spec.bidder_requirements[0];
        assert_eq!(grouped.criterion.as_deref(), Some("Fachkunde"));
        assert_eq!(
            grouped.items,
            vec!["Referenzen der letzten 3 Jahre", "Qualifikationsnachweis"]
        );
        let flat = &spec.bidder_requirements[1];
        assert_eq!(flat.criterion, None);
        assert_eq!(flat.items, vec!["Eintragung in das Handelsregister"]);
    }

    #[test]
    fn service_requirement_criteria() {
        let form = form_from(json!({
            "serviceRequirements": [
                { "text": "Wartung innerhalb von 24h", "criteriaType": "A" },
                { "text": "Regionale Präsenz", "criteriaType": "B", "weight": 30 },
                { "text": "Zertifiziertes Personal", "criteriaType": "B" },
                { "description": "Altbestand dokumentieren", "criteriaType": "X" }
            ]
        }));
        let spec = Specification::from_form(&form);

        assert_eq!(spec.service_requirements.len(), 4);
        assert_eq!(
            spec.service_requirements[0].criterion,
            Some(AwardCriterion::Exclusion)
        );
        assert_eq!(
            spec.service_requirements[1]
                .criterion
                .as_ref()
                .unwrap()
                .badge(),
            "Bewertungskriterium, 30%"
        );
        assert_eq!(
            spec.service_requirements[2]
                .criterion
                .as_ref()
                .unwrap()
                .badge(),
            "Bewertungskriterium"
        );
        // Unknown criteria type: text kept, no badge.
        assert_eq!(spec.service_requirements[3].criterion, None);
        assert_eq!(
            spec.service_requirements[3].text,
            "Altbestand dokumentieren"
        );
    }

    #[test]
    fn cost_rows_accept_legacy_service_key() {
        let form = form_from(json!({
            "costRows": [
                { "service": "Gerüststellung", "quantity": 500, "unit": "m²", "unitPrice": 12.5 },
                { "description": "Anfahrt", "quantity": "2", "unitPrice": 80 }
            ]
        }));
        let spec = Specification::from_form(&form);

        assert_eq!(spec.cost_rows[0].description, "Gerüststellung");
        assert_eq!(spec.cost_rows[0].quantity.raw, "500");
        assert_eq!(spec.cost_rows[0].quantity_display(), "500 m²");
        assert_eq!(spec.cost_rows[1].description, "Anfahrt");
        assert_eq!(spec.cost_rows[1].quantity_display(), "2");
    }

    #[test]
    fn quantity_text_parsing() {
        assert_eq!(Quantity::parse_text("40 Stunden").value, 40.0);
        assert_eq!(Quantity::parse_text("2,5").value, 2.5);
        assert_eq!(Quantity::parse_text("2.5 t").value, 2.5);
        assert_eq!(Quantity::parse_text("ca. 40 Stunden").value, 0.0);
        assert_eq!(Quantity::parse_text("pauschal").value, 0.0);
        assert_eq!(Quantity::parse_text("pauschal").raw, "pauschal");
    }

    #[test]
    fn empty_cost_row_is_dropped_but_partial_kept() {
        let form = form_from(json!({
            "costRows": [
                {},
                { "description": "", "quantity": "", "unit": "", "unitPrice": null },
                { "unitPrice": 0 }
            ]
        }));
        let spec = Specification::from_form(&form);
        assert_eq!(spec.cost_rows.len(), 1);
        assert_eq!(spec.cost_rows[0].unit_price, 0.0);
    }

    #[test]
    fn total_cost_sums_rows() {
        let form = form_from(json!({
            "costRows": [
                { "description": "Planung", "quantity": 40, "unit": "Stunden", "unitPrice": 85 },
                { "description": "Abnahme", "quantity": 20, "unit": "Stunden", "unitPrice": 90 }
            ]
        }));
        let spec = Specification::from_form(&form);
        assert_eq!(spec.total_cost(), 5200.0);
    }

    #[test]
    fn custom_payment_and_warranty_resolve() {
        let form = form_from(json!({
            "paymentTerms": "custom",
            "customPaymentTerms": "14 Tage netto, 2% Skonto",
            "warrantyPeriod": "custom",
            "customWarranty": 24
        }));
        let spec = Specification::from_form(&form);
        assert_eq!(
            spec.contract.payment_terms.as_deref(),
            Some("14 Tage netto, 2% Skonto")
        );
        assert_eq!(spec.contract.warranty.as_deref(), Some("24 Monate"));
    }

    #[test]
    fn custom_selected_but_empty_stays_absent() {
        let form = form_from(json!({
            "paymentTerms": "custom",
            "warrantyPeriod": "custom"
        }));
        let spec = Specification::from_form(&form);
        assert_eq!(spec.contract.payment_terms, None);
        assert_eq!(spec.contract.warranty, None);
    }

    #[test]
    fn non_custom_terms_pass_through() {
        let form = form_from(json!({
            "paymentTerms": "30 Tage netto",
            "warrantyPeriod": "24 Monate"
        }));
        let spec = Specification::from_form(&form);
        assert_eq!(spec.contract.payment_terms.as_deref(), Some("30 Tage netto"));
        assert_eq!(spec.contract.warranty.as_deref(), Some("24 Monate"));
    }

    #[test]
    fn title_defaults_when_blank() {
        let spec = Specification::from_form(&SpecificationForm::default());
        assert_eq!(spec.project_title, "Leistungsbeschreibung");
        assert_eq!(spec.user_role, UserRole::Department);
        assert!(spec.contract.is_empty());
    }

    #[test]
    fn acknowledgements_make_contract_non_empty() {
        let form = form_from(json!({ "transparency": true }));
        let spec = Specification::from_form(&form);
        assert!(!spec.contract.is_empty());
        assert!(spec.contract.acknowledgements.transparency);
        assert!(!spec.contract.acknowledgements.equal_treatment);
    }

    #[test]
    fn dates_parse_or_fail_closed() {
        let form = form_from(json!({
            "startDate": "2024-04-01",
            "endDate": "irgendwann"
        }));
        let spec = Specification::from_form(&form);
        assert_eq!(spec.start_date, NaiveDate::from_ymd_opt(2024, 4, 1));
        assert_eq!(spec.end_date, None);
    }

    #[test]
    fn unknown_wire_keys_are_ignored() {
        // Historical forms carried fields no exporter ever rendered.
        let form = form_from(json!({
            "projectTitle": "Test",
            "contractTerms": "nicht gerendert",
            "id": 17
        }));
        assert_eq!(form.project_title, "Test");
    }

    mod properties {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            /// Arbitrary quantity text never panics and never yields a
            /// non-finite value.
            #[test]
            fn quantity_parse_total_function(s in ".{0,64}") {
                let q = Quantity::parse_text(&s);
                prop_assert!(q.value.is_finite());
                prop_assert!(q.value >= 0.0);
            }
        }
    }
}
