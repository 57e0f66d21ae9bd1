//! Header alias resolution and cell parsing

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};

use crate::config::ReportConfig;
use crate::core::error::{JournalError, Result};
use crate::core::types::{CellValue, ColumnKind};

static NON_ALNUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("static header pattern"));

static NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<sign>[-+]?)\s*[$€£]?\s*(?P<body>\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?|\.\d+)$",
    )
    .expect("static number pattern")
});

const NULL_TOKENS: [&str; 5] = ["na", "n/a", "null", "none", "nan"];
const TRUE_TOKENS: [&str; 3] = ["true", "yes", "t"];
const FALSE_TOKENS: [&str; 3] = ["false", "no", "f"];

/// Comparison key for headers: lowercase, letters and digits only
pub fn header_key(name: &str) -> String {
    NON_ALNUM.replace_all(name, "").to_lowercase()
}

/// Map raw header names to the names used in the record table.
///
/// Headers that already carry a canonical name win; an alias is only applied
/// when its canonical target is still free.
pub fn resolve_headers<'a, I>(raw: I, config: &ReportConfig) -> Result<Vec<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let names: Vec<String> = raw.into_iter().map(|h| h.trim().to_string()).collect();
    if let Some(position) = names.iter().position(|h| h.is_empty()) {
        return Err(JournalError::Parse(format!(
            "header column {} has no name",
            position + 1
        )));
    }

    let mut lookup: BTreeMap<String, String> = BTreeMap::new();
    for canonical in config.columns.all() {
        lookup.insert(header_key(canonical), canonical.to_string());
    }
    for (from, to) in &config.aliases {
        lookup.entry(header_key(from)).or_insert_with(|| to.clone());
    }

    let mut taken: HashSet<String> = names
        .iter()
        .filter(|h| config.columns.all().contains(&h.as_str()))
        .cloned()
        .collect();

    let mut resolved = Vec::with_capacity(names.len());
    for name in names {
        let target = lookup.get(&header_key(&name));
        let final_name = match target {
            Some(canonical) if *canonical == name => name,
            Some(canonical) if !taken.contains(canonical) => {
                log::debug!("Header '{name}' resolved to '{canonical}'");
                taken.insert(canonical.clone());
                canonical.clone()
            }
            _ => name,
        };
        resolved.push(final_name);
    }

    let mut seen = HashSet::new();
    if let Some(dup) = resolved.iter().find(|name| !seen.insert(name.as_str())) {
        return Err(JournalError::Parse(format!("duplicate header '{dup}'")));
    }

    Ok(resolved)
}

/// Trim a raw field; null tokens and blanks become `None`
pub fn clean_cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || NULL_TOKENS.contains(&trimmed.to_lowercase().as_str()) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse plain, signed, currency-prefixed and thousands-separated numbers
pub fn parse_number(raw: &str) -> Option<f64> {
    let value = match NUMBER.captures(raw) {
        Some(caps) => {
            let value: f64 = caps["body"].replace(',', "").parse().ok()?;
            if &caps["sign"] == "-" { -value } else { value }
        }
        None => raw.parse::<f64>().ok()?,
    };
    value.is_finite().then_some(value)
}

/// Parse a boolean token. `1`/`0` count only when `allow_digits` is set.
pub fn parse_bool(raw: &str, allow_digits: bool) -> Option<bool> {
    let lower = raw.to_lowercase();
    if TRUE_TOKENS.contains(&lower.as_str()) || (allow_digits && lower == "1") {
        Some(true)
    } else if FALSE_TOKENS.contains(&lower.as_str()) || (allow_digits && lower == "0") {
        Some(false)
    } else {
        None
    }
}

/// Infer a column kind from its cleaned cells
pub fn infer_kind(cells: &[Option<String>], allow_digit_bools: bool) -> ColumnKind {
    let present: Vec<&str> = cells.iter().flatten().map(String::as_str).collect();
    if present.is_empty() {
        ColumnKind::Empty
    } else if present
        .iter()
        .all(|c| parse_bool(c, allow_digit_bools).is_some())
    {
        ColumnKind::Boolean
    } else if present.iter().all(|c| parse_number(c).is_some()) {
        ColumnKind::Numeric
    } else {
        ColumnKind::Categorical
    }
}

/// Infer the kind of a column the analysis may expect a kind for.
///
/// `1`/`0` are booleans only where a boolean is expected, and columns
/// expected to be categorical stay categorical whatever their cells look like.
pub fn infer_column_kind(cells: &[Option<String>], expected: Option<ColumnKind>) -> ColumnKind {
    let kind = infer_kind(cells, expected == Some(ColumnKind::Boolean));
    match (expected, kind) {
        (Some(ColumnKind::Categorical), ColumnKind::Boolean | ColumnKind::Numeric) => {
            ColumnKind::Categorical
        }
        _ => kind,
    }
}

/// Convert cleaned cells into typed values for a column of `kind`
pub fn convert_cells(
    cells: Vec<Option<String>>,
    kind: ColumnKind,
    allow_digit_bools: bool,
) -> Vec<CellValue> {
    cells
        .into_iter()
        .map(|cell| match cell {
            None => CellValue::Empty,
            Some(raw) => match kind {
                ColumnKind::Numeric => parse_number(&raw)
                    .map(CellValue::Number)
                    .unwrap_or(CellValue::Text(raw)),
                ColumnKind::Boolean => parse_bool(&raw, allow_digit_bools)
                    .map(CellValue::Bool)
                    .unwrap_or(CellValue::Text(raw)),
                ColumnKind::Categorical | ColumnKind::Empty => CellValue::Text(raw),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(cells: &[Option<&str>]) -> Vec<Option<String>> {
        cells.iter().map(|c| c.map(str::to_string)).collect()
    }

    #[test]
    fn test_header_key() {
        assert_eq!(header_key("Monthly Spend ($)"), "monthlyspend");
        assert_eq!(header_key("MONTHLY-SPEND"), "monthlyspend");
        assert_eq!(header_key("Tenure (Months)"), "tenuremonths");
    }

    #[test]
    fn test_resolve_headers_applies_aliases() {
        let config = ReportConfig::default();
        let resolved = resolve_headers(
            ["Plan", "Monthly Spend ($)", "Tenure (Months)", "Churned", "signup_source"],
            &config,
        )
        .unwrap();
        assert_eq!(
            resolved,
            vec!["Plan", "MonthlySpend", "Tenure", "Churn", "SignupSource"]
        );
    }

    #[test]
    fn test_resolve_headers_prefers_explicit_canonical() {
        let config = ReportConfig::default();
        let resolved = resolve_headers(["Spend", "MonthlySpend"], &config).unwrap();
        assert_eq!(resolved, vec!["Spend", "MonthlySpend"]);
    }

    #[test]
    fn test_resolve_headers_rejects_blank_and_duplicates() {
        let config = ReportConfig::default();
        let err = resolve_headers(["Plan", " "], &config).unwrap_err();
        assert!(format!("{err}").contains("header column 2"));

        let err = resolve_headers(["Region", "Region"], &config).unwrap_err();
        assert!(format!("{err}").contains("duplicate header 'Region'"));
    }

    #[test]
    fn test_clean_cell() {
        assert_eq!(clean_cell("  Pro "), Some("Pro".to_string()));
        assert_eq!(clean_cell(""), None);
        assert_eq!(clean_cell("N/A"), None);
        assert_eq!(clean_cell("null"), None);
        assert_eq!(clean_cell("NaN"), None);
    }

    #[test]
    fn test_parse_number_formats() {
        assert_eq!(parse_number("10"), Some(10.0));
        assert_eq!(parse_number("-2.5"), Some(-2.5));
        assert_eq!(parse_number("$1,250.50"), Some(1250.5));
        assert_eq!(parse_number("€ 99"), Some(99.0));
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("n/a"), None);
        assert_eq!(parse_number("12 months"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_parse_number_rejects_overflowing_digits() {
        let huge = "9".repeat(400);
        assert_eq!(parse_number(&huge), None);
        assert_eq!(parse_number(&format!("-${huge}")), None);
        assert_eq!(parse_number("1e400"), None);
        assert_eq!(parse_number("1.5e308"), Some(1.5e308));
    }

    #[test]
    fn test_parse_bool_tokens() {
        assert_eq!(parse_bool("TRUE", false), Some(true));
        assert_eq!(parse_bool("no", false), Some(false));
        assert_eq!(parse_bool("1", false), None);
        assert_eq!(parse_bool("1", true), Some(true));
        assert_eq!(parse_bool("0", true), Some(false));
        assert_eq!(parse_bool("maybe", true), None);
        assert_eq!(parse_bool("Y", false), None);
        assert_eq!(parse_bool("n", true), None);
    }

    #[test]
    fn test_infer_column_kind_respects_expectations() {
        let norway = owned(&[Some("NO"), Some("NO")]);
        assert_eq!(infer_kind(&norway, false), ColumnKind::Boolean);
        assert_eq!(
            infer_column_kind(&norway, Some(ColumnKind::Categorical)),
            ColumnKind::Categorical
        );
        assert_eq!(
            infer_column_kind(&owned(&[Some("1"), Some("2")]), Some(ColumnKind::Categorical)),
            ColumnKind::Categorical
        );
        assert_eq!(
            infer_column_kind(&owned(&[Some("1"), Some("0")]), Some(ColumnKind::Boolean)),
            ColumnKind::Boolean
        );
        assert_eq!(
            infer_column_kind(&owned(&[Some("1"), Some("0")]), None),
            ColumnKind::Numeric
        );
        assert_eq!(
            infer_column_kind(&owned(&[Some("Y"), Some("N")]), None),
            ColumnKind::Categorical
        );
        assert_eq!(
            infer_column_kind(&owned(&[None]), Some(ColumnKind::Categorical)),
            ColumnKind::Empty
        );
    }

    #[test]
    fn test_infer_kind() {
        assert_eq!(
            infer_kind(&owned(&[Some("10"), None, Some("$5")]), false),
            ColumnKind::Numeric
        );
        assert_eq!(
            infer_kind(&owned(&[Some("true"), Some("False")]), false),
            ColumnKind::Boolean
        );
        assert_eq!(
            infer_kind(&owned(&[Some("1"), Some("0")]), false),
            ColumnKind::Numeric
        );
        assert_eq!(
            infer_kind(&owned(&[Some("1"), Some("0")]), true),
            ColumnKind::Boolean
        );
        assert_eq!(
            infer_kind(&owned(&[Some("10"), Some("unknown")]), false),
            ColumnKind::Categorical
        );
        assert_eq!(infer_kind(&owned(&[None, None]), false), ColumnKind::Empty);
    }

    #[test]
    fn test_convert_cells() {
        let values = convert_cells(
            owned(&[Some("$10"), None, Some("2,000")]),
            ColumnKind::Numeric,
            false,
        );
        assert_eq!(
            values,
            vec![
                CellValue::Number(10.0),
                CellValue::Empty,
                CellValue::Number(2000.0)
            ]
        );
    }
}
