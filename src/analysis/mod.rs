//! Descriptive analysis of a parsed record table
//!
//! [`analyze`] is a pure function: it profiles every column in header order
//! and extracts the business findings and data quality summary. Columns that
//! are missing or not usable simply produce no entry.

pub mod findings;
pub mod stats;

use serde::Serialize;

use crate::config::ReportConfig;
use crate::core::types::RecordTable;

pub use findings::{DataQuality, Findings, GroupMean, GroupRate, Point, Share, UntypedColumn};
pub use stats::{
    BooleanSummary, ColumnProfile, ColumnStats, FrequencyEntry, FrequencyTable, HistogramBin,
    NumericSummary,
};

/// Derived, read-only statistics consumed by report assembly
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub row_count: usize,
    /// Column profiles in header order
    pub columns: Vec<ColumnProfile>,
    pub findings: Findings,
    pub quality: DataQuality,
}

impl AggregateResult {
    pub fn profile(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|p| p.name == name)
    }

    pub fn numeric(&self, name: &str) -> Option<&NumericSummary> {
        self.profile(name)?.numeric()
    }

    pub fn frequencies(&self, name: &str) -> Option<&FrequencyTable> {
        self.profile(name)?.frequencies()
    }

    pub fn boolean(&self, name: &str) -> Option<&BooleanSummary> {
        self.profile(name)?.boolean()
    }
}

pub fn analyze(table: &RecordTable, config: &ReportConfig) -> AggregateResult {
    let columns: Vec<ColumnProfile> = table
        .columns()
        .iter()
        .map(|column| stats::profile_column(column, config.histogram_bins))
        .collect();

    let findings = findings::extract_findings(table, &columns, config);
    let quality = findings::assess_quality(table, &columns, config);

    AggregateResult {
        row_count: table.row_count(),
        columns,
        findings,
        quality,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::parse_csv;

    fn analyze_str(csv: &str) -> AggregateResult {
        let config = ReportConfig::default();
        let table = parse_csv(csv.as_bytes(), &config).unwrap();
        analyze(&table, &config)
    }

    #[test]
    fn test_analyze_small_dataset() {
        let result = analyze_str("Plan,MonthlySpend,Churn\nBasic,10,false\nPro,50,true\n");
        assert_eq!(result.row_count, 2);
        assert_eq!(result.numeric("MonthlySpend").unwrap().mean, 30.0);
        assert_eq!(result.boolean("Churn").unwrap().rate, 0.5);
        assert_eq!(result.frequencies("Plan").unwrap().entries.len(), 2);
        assert_eq!(result.findings.average_spend, Some(30.0));
        assert_eq!(result.findings.churn_rate, Some(0.5));
    }

    #[test]
    fn test_absent_column_has_no_entry() {
        let result = analyze_str("Plan\nBasic\nPro\n");
        assert!(result.profile("MonthlySpend").is_none());
        assert!(result.findings.average_spend.is_none());
        assert!(result.findings.churn_rate.is_none());
        assert!(result.findings.spend_by_plan.is_none());
    }

    #[test]
    fn test_unparseable_spend_has_no_numeric_aggregates() {
        let result = analyze_str("Plan,MonthlySpend\nBasic,n/a\nPro,n/a\n");
        assert!(result.numeric("MonthlySpend").is_none());
        assert_eq!(result.profile("MonthlySpend").unwrap().missing, 2);
        assert!(result.findings.average_spend.is_none());
        assert_eq!(result.quality.untyped_columns.len(), 1);
    }

    #[test]
    fn test_profiles_follow_header_order() {
        let result = analyze_str("Zeta,Alpha,Plan\n1,x,Pro\n2,y,Basic\n");
        let names: Vec<_> = result.columns.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Plan"]);
    }

    #[test]
    fn test_analyze_is_deterministic() {
        let csv = "Plan,Industry,MonthlySpend\nPro,Tech,10\nBasic,Retail,20\nPro,Tech,30\n";
        assert_eq!(analyze_str(csv), analyze_str(csv));
    }
}
