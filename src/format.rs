//! German-locale formatting helpers shared by both renderers.
//!
//! Formatting lives in one module so the HTML and Word outputs can never
//! disagree on how a date or an amount is spelled. The rules are fixed, not
//! locale-negotiated: German procurement documents use `1.4.2024` dates
//! (no zero padding) and `5.200,00` amounts (thousands dot, decimal comma,
//! always two decimals).

use chrono::{Datelike, NaiveDate};

/// Parse a strict ISO `YYYY-MM-DD` date.
///
/// Anything else (empty strings, `01.04.2024`, partial dates) yields `None`.
/// Callers treat `None` as "field absent", so a malformed date gates its row
/// off instead of printing garbage.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Format a date the German short way: `2024-04-01` → `1.4.2024`.
pub fn format_date(date: NaiveDate) -> String {
    format!("{}.{}.{}", date.day(), date.month(), date.year())
}

/// Format an amount in German locale with exactly two decimals.
///
/// `5200.0` → `"5.200,00"`, `0.0` → `"0,00"`. Non-finite input (NaN, ±inf)
/// renders as `"0,00"`; this is the single null-amount policy for every
/// currency cell in both outputs. Rounding is half away from zero at the
/// second decimal.
///
/// ```
/// # use vergabedoc::format::format_currency;
/// assert_eq!(format_currency(5200.0), "5.200,00");
/// assert_eq!(format_currency(1234567.891), "1.234.567,89");
/// ```
pub fn format_currency(value: f64) -> String {
    let v = if value.is_finite() { value } else { 0.0 };
    let cents = (v.abs() * 100.0).round() as u128;
    let whole = group_thousands(cents / 100);
    let frac = cents % 100;
    if v < 0.0 && cents > 0 {
        format!("-{whole},{frac:02}")
    } else {
        format!("{whole},{frac:02}")
    }
}

/// Format a numeric quantity for display: integral values without decimals
/// (`500` → `"500"`), fractional ones with a decimal comma (`2.5` → `"2,5"`).
pub fn format_quantity(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value).replace('.', ",")
    }
}

/// Insert `.` thousands separators: `5200` → `"5.200"`.
fn group_thousands(n: u128) -> String {
    let digits = n.to_string();
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(*b as char);
    }
    out
}

/// Reduce a project title to a safe filename stem.
///
/// Keeps alphanumerics (including umlauts), `-` and `_`; every other run of
/// characters collapses to a single `_`. An empty result falls back to
/// `"Leistungsbeschreibung"`.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_sep = true;
    for ch in name.trim().chars() {
        if ch.is_alphanumeric() || ch == '-' || ch == '_' {
            out.push(ch);
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    let out = out.trim_end_matches('_');
    if out.is_empty() {
        crate::labels::DEFAULT_TITLE.to_string()
    } else {
        out.to_string()
    }
}

/// `"Sanierung Rathaus"` + 2024-04-01 + `"pdf"` → `"Sanierung_Rathaus_2024-04-01.pdf"`.
pub fn dated_filename(title: &str, date: NaiveDate, ext: &str) -> String {
    format!(
        "{}_{}.{}",
        sanitize_filename(title),
        date.format("%Y-%m-%d"),
        ext.trim_start_matches('.')
    )
}
