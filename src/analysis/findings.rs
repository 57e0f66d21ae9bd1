//! Business findings and data quality checks built on the column profiles

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use super::stats::{self, ColumnProfile};
use crate::config::ReportConfig;
use crate::core::types::{CellValue, ColumnKind, RecordTable};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub label: String,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean {
    pub label: String,
    pub count: usize,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRate {
    pub label: String,
    pub count: usize,
    pub rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Headline metrics of the customer base. Every entry is optional and only
/// present when the columns it depends on were found with a usable kind.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Findings {
    pub total_customers: usize,
    pub plan_distribution: Option<Vec<Share>>,
    pub average_spend: Option<f64>,
    pub churn_rate: Option<f64>,
    pub average_tenure: Option<f64>,
    pub top_countries: Option<Vec<String>>,
    pub top_industries: Option<Vec<String>>,
    pub signup_sources: Option<Vec<String>>,
    pub spend_vs_tenure: Option<Vec<Point>>,
    pub spend_by_plan: Option<Vec<GroupMean>>,
    pub churn_by_plan: Option<Vec<GroupRate>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UntypedColumn {
    pub name: String,
    pub expected: ColumnKind,
    pub found: ColumnKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct DataQuality {
    pub total_rows: usize,
    pub duplicate_rows: usize,
    /// Columns with at least one missing cell, in header order
    pub missing_by_column: Vec<(String, usize)>,
    /// Known columns whose values could not be typed as expected
    pub untyped_columns: Vec<UntypedColumn>,
}

impl DataQuality {
    pub fn has_issues(&self) -> bool {
        self.duplicate_rows > 0
            || !self.missing_by_column.is_empty()
            || !self.untyped_columns.is_empty()
    }

    pub fn total_missing(&self) -> usize {
        self.missing_by_column.iter().map(|(_, n)| n).sum()
    }
}

fn profile<'a>(profiles: &'a [ColumnProfile], name: &str) -> Option<&'a ColumnProfile> {
    profiles.iter().find(|p| p.name == name)
}

fn top_labels(profiles: &[ColumnProfile], name: &str, n: usize) -> Option<Vec<String>> {
    profile(profiles, name)?.frequencies().map(|table| {
        table
            .top(n)
            .iter()
            .map(|entry| entry.label.clone())
            .collect()
    })
}

pub fn extract_findings(
    table: &RecordTable,
    profiles: &[ColumnProfile],
    config: &ReportConfig,
) -> Findings {
    let cols = &config.columns;

    let plan_distribution = profile(profiles, &cols.plan)
        .and_then(ColumnProfile::frequencies)
        .map(|freq| {
            freq.entries
                .iter()
                .map(|entry| Share {
                    label: entry.label.clone(),
                    count: entry.count,
                    percent: freq.percent(entry.count),
                })
                .collect()
        });

    let average_spend = profile(profiles, &cols.monthly_spend)
        .and_then(ColumnProfile::numeric)
        .map(|s| s.mean);
    let average_tenure = profile(profiles, &cols.tenure)
        .and_then(ColumnProfile::numeric)
        .map(|s| s.mean);
    let churn_rate = profile(profiles, &cols.churn)
        .and_then(ColumnProfile::boolean)
        .map(|s| s.rate);

    Findings {
        total_customers: table.row_count(),
        plan_distribution,
        average_spend,
        churn_rate,
        average_tenure,
        top_countries: top_labels(profiles, &cols.country, config.top_n),
        top_industries: top_labels(profiles, &cols.industry, config.top_n),
        signup_sources: top_labels(profiles, &cols.signup_source, config.top_signup_sources),
        spend_vs_tenure: spend_vs_tenure(table, config),
        spend_by_plan: spend_by_plan(table, config),
        churn_by_plan: churn_by_plan(table, config),
    }
}

fn spend_vs_tenure(table: &RecordTable, config: &ReportConfig) -> Option<Vec<Point>> {
    let spend = table.column_of_kind(&config.columns.monthly_spend, ColumnKind::Numeric)?;
    let tenure = table.column_of_kind(&config.columns.tenure, ColumnKind::Numeric)?;
    Some(
        spend
            .values
            .iter()
            .zip(&tenure.values)
            .filter_map(|(x, y)| {
                Some(Point {
                    x: x.as_f64()?,
                    y: y.as_f64()?,
                })
            })
            .collect(),
    )
}

fn plan_labels(table: &RecordTable, config: &ReportConfig) -> Option<Vec<Option<String>>> {
    let plan = table.column_of_kind(&config.columns.plan, ColumnKind::Categorical)?;
    Some(
        plan.values
            .iter()
            .map(|v| v.as_text().map(str::to_string))
            .collect(),
    )
}

fn spend_by_plan(table: &RecordTable, config: &ReportConfig) -> Option<Vec<GroupMean>> {
    let plans = plan_labels(table, config)?;
    let spend = table.column_of_kind(&config.columns.monthly_spend, ColumnKind::Numeric)?;

    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (plan, value) in plans.into_iter().zip(&spend.values) {
        if let (Some(plan), Some(value)) = (plan, value.as_f64()) {
            groups.entry(plan).or_default().push(value);
        }
    }

    Some(
        groups
            .into_iter()
            .filter_map(|(label, values)| {
                Some(GroupMean {
                    count: values.len(),
                    mean: stats::mean(&values)?,
                    label,
                })
            })
            .collect(),
    )
}

fn churn_by_plan(table: &RecordTable, config: &ReportConfig) -> Option<Vec<GroupRate>> {
    let plans = plan_labels(table, config)?;
    let churn = table.column_of_kind(&config.columns.churn, ColumnKind::Boolean)?;

    let mut groups: BTreeMap<String, Vec<bool>> = BTreeMap::new();
    for (plan, value) in plans.into_iter().zip(&churn.values) {
        if let (Some(plan), Some(value)) = (plan, value.as_bool()) {
            groups.entry(plan).or_default().push(value);
        }
    }

    Some(
        groups
            .into_iter()
            .filter_map(|(label, values)| {
                let summary = stats::boolean_summary(&values)?;
                Some(GroupRate {
                    label,
                    count: values.len(),
                    rate: summary.rate,
                })
            })
            .collect(),
    )
}

pub fn assess_quality(
    table: &RecordTable,
    profiles: &[ColumnProfile],
    config: &ReportConfig,
) -> DataQuality {
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let duplicate_rows = table
        .rows()
        .filter(|row| {
            let key: Vec<String> = row.cells().map(|(_, v)| cell_key(v)).collect();
            !seen.insert(key)
        })
        .count();

    let missing_by_column = profiles
        .iter()
        .filter(|p| p.missing > 0)
        .map(|p| (p.name.clone(), p.missing))
        .collect();

    // ingest already keeps categorical columns categorical
    let untyped_columns = config
        .columns
        .all()
        .into_iter()
        .filter_map(|name| {
            let expected = config.columns.expected_kind(name)?;
            let column = table.column(name)?;
            (expected != ColumnKind::Categorical && column.kind != expected).then(|| {
                UntypedColumn {
                    name: column.name.clone(),
                    expected,
                    found: column.kind,
                }
            })
        })
        .collect();

    DataQuality {
        total_rows: table.row_count(),
        duplicate_rows,
        missing_by_column,
        untyped_columns,
    }
}

fn cell_key(value: &CellValue) -> String {
    match value {
        CellValue::Empty => String::new(),
        other => format!("{other:?}"),
    }
}
