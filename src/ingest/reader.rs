use csv::{ReaderBuilder, Trim};
use log::debug;

use super::normalize;
use crate::config::ReportConfig;
use crate::core::error::{JournalError, Result};
use crate::core::types::{Column, ColumnKind, RecordTable};

const UTF8_BOM: char = '\u{feff}';

/// Parse uploaded CSV bytes into a typed record table.
///
/// Fails with a parse error on non-UTF-8 input, malformed rows, a missing or
/// broken header, or when no data rows remain.
pub fn parse_csv(bytes: &[u8], config: &ReportConfig) -> Result<RecordTable> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| JournalError::Parse(format!("input is not valid UTF-8: {e}")))?;
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);

    if text.trim().is_empty() {
        return Err(JournalError::Parse("input is empty".to_string()));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let names = normalize::resolve_headers(headers.iter(), config)?;

    let mut raw_columns: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
    for (index, record) in reader.records().enumerate() {
        let record = record
            .map_err(|e| JournalError::Parse(format!("data row {}: {e}", index + 1)))?;
        for (cells, field) in raw_columns.iter_mut().zip(record.iter()) {
            cells.push(normalize::clean_cell(field));
        }
    }

    let row_count = raw_columns.first().map(Vec::len).unwrap_or(0);
    if row_count == 0 {
        return Err(JournalError::Parse(
            "CSV has a header but no data rows".to_string(),
        ));
    }

    let columns: Vec<Column> = names
        .into_iter()
        .zip(raw_columns)
        .map(|(name, cells)| {
            let expected = config.columns.expected_kind(&name);
            let kind = normalize::infer_column_kind(&cells, expected);
            debug!("Column '{name}' inferred as {kind}");
            let digit_bools = expected == Some(ColumnKind::Boolean);
            let values = normalize::convert_cells(cells, kind, digit_bools);
            Column::new(name, kind, values)
        })
        .collect();

    RecordTable::new(columns).map_err(JournalError::Parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CellValue;

    fn parse(input: &str) -> Result<RecordTable> {
        parse_csv(input.as_bytes(), &ReportConfig::default())
    }

    #[test]
    fn test_parse_basic_table() {
        let table = parse("Plan,MonthlySpend,Churn\nBasic,10,false\nPro,50,true\n").unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_names(), vec!["Plan", "MonthlySpend", "Churn"]);
        assert_eq!(table.column("Plan").unwrap().kind, ColumnKind::Categorical);
        assert_eq!(
            table.column("MonthlySpend").unwrap().kind,
            ColumnKind::Numeric
        );
        assert_eq!(table.column("Churn").unwrap().kind, ColumnKind::Boolean);
        assert_eq!(
            table.row(1).unwrap().get("MonthlySpend"),
            Some(&CellValue::Number(50.0))
        );
    }

    #[test]
    fn test_header_only_is_parse_error() {
        let err = parse("Plan,MonthlySpend\n").unwrap_err();
        assert!(err.is_parse());
        assert!(format!("{err}").contains("no data rows"));
    }

    #[test]
    fn test_empty_input_is_parse_error() {
        assert!(parse("").unwrap_err().is_parse());
        assert!(parse("   \n\n").unwrap_err().is_parse());
    }

    #[test]
    fn test_ragged_row_is_parse_error() {
        let err = parse("a,b\n1,2\n3\n").unwrap_err();
        assert!(err.is_parse());
        assert!(format!("{err}").contains("data row 2"));
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let err = parse_csv(&[0x50, 0x6c, 0xff, 0x0a], &ReportConfig::default()).unwrap_err();
        assert!(err.is_parse());
        assert!(format!("{err}").contains("UTF-8"));
    }

    #[test]
    fn test_bom_is_stripped() {
        let table = parse("\u{feff}Plan\nPro\n").unwrap();
        assert_eq!(table.column_names(), vec!["Plan"]);
    }

    #[test]
    fn test_aliased_headers_are_canonical() {
        let table =
            parse("Monthly Spend ($),Tenure (Months),Churned\n\"$1,200\",12,1\n300,4,0\n").unwrap();
        assert_eq!(table.column_names(), vec!["MonthlySpend", "Tenure", "Churn"]);
        assert_eq!(table.column("MonthlySpend").unwrap().numbers(), vec![1200.0, 300.0]);
        assert_eq!(table.column("Churn").unwrap().booleans(), vec![true, false]);
    }

    #[test]
    fn test_non_numeric_spend_is_not_numeric() {
        let table = parse("Plan,MonthlySpend\nBasic,n/a\nPro,n/a\n").unwrap();
        assert_eq!(table.column("MonthlySpend").unwrap().kind, ColumnKind::Empty);

        let table = parse("Plan,MonthlySpend\nBasic,unknown\nPro,20\n").unwrap();
        assert_eq!(
            table.column("MonthlySpend").unwrap().kind,
            ColumnKind::Categorical
        );
    }

    #[test]
    fn test_categorical_columns_never_become_boolean() {
        let table = parse("Plan,Country,Size,Churn\nBasic,NO,Y,1\nPro,NO,N,0\n").unwrap();
        assert_eq!(table.column("Country").unwrap().kind, ColumnKind::Categorical);
        assert_eq!(
            table.row(0).unwrap().get("Country"),
            Some(&CellValue::Text("NO".to_string()))
        );
        assert_eq!(table.column("Size").unwrap().kind, ColumnKind::Categorical);
        assert_eq!(table.column("Churn").unwrap().kind, ColumnKind::Boolean);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let table = parse("Plan\nBasic\n\nPro\n").unwrap();
        assert_eq!(table.row_count(), 2);
    }
}
