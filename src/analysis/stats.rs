//! Descriptive statistics over single columns

use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::types::{Column, ColumnKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub std_dev: f64,
    pub histogram: Vec<HistogramBin>,
}

impl NumericSummary {
    pub fn spread(&self) -> f64 {
        self.max - self.min
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyEntry {
    pub label: String,
    pub count: usize,
}

/// Label counts sorted by count descending, then label ascending
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyTable {
    pub total: usize,
    pub entries: Vec<FrequencyEntry>,
}

impl FrequencyTable {
    pub fn top(&self, n: usize) -> &[FrequencyEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn leading(&self) -> Option<&FrequencyEntry> {
        self.entries.first()
    }

    /// Share of `count` in percent of all counted cells
    pub fn percent(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 / self.total as f64 * 100.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BooleanSummary {
    pub true_count: usize,
    pub false_count: usize,
    /// Fraction of `true` among non-empty cells, 0.0..=1.0
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColumnStats {
    Numeric(NumericSummary),
    Categorical(FrequencyTable),
    Boolean(BooleanSummary),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    pub missing: usize,
    pub stats: ColumnStats,
}

impl ColumnProfile {
    pub fn numeric(&self) -> Option<&NumericSummary> {
        match &self.stats {
            ColumnStats::Numeric(summary) => Some(summary),
            _ => None,
        }
    }

    pub fn frequencies(&self) -> Option<&FrequencyTable> {
        match &self.stats {
            ColumnStats::Categorical(table) => Some(table),
            _ => None,
        }
    }

    pub fn boolean(&self) -> Option<&BooleanSummary> {
        match &self.stats {
            ColumnStats::Boolean(summary) => Some(summary),
            _ => None,
        }
    }
}

/// Profile one column according to its inferred kind
pub fn profile_column(column: &Column, bins: usize) -> ColumnProfile {
    let stats = match column.kind {
        ColumnKind::Numeric => numeric_summary(&column.numbers(), bins).map(ColumnStats::Numeric),
        ColumnKind::Categorical => frequency_table(column.labels()).map(ColumnStats::Categorical),
        ColumnKind::Boolean => boolean_summary(&column.booleans()).map(ColumnStats::Boolean),
        ColumnKind::Empty => None,
    }
    .unwrap_or(ColumnStats::Empty);

    ColumnProfile {
        name: column.name.clone(),
        kind: column.kind,
        missing: column.missing_count(),
        stats,
    }
}

/// Running mean, so large finite inputs cannot overflow a plain sum
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let avg = values
        .iter()
        .enumerate()
        .fold(0.0, |acc, (i, v)| acc + (v - acc) / (i + 1) as f64);
    avg.is_finite().then_some(avg)
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    })
}

/// Sample standard deviation; 0.0 below two values.
/// Values are scaled by their largest magnitude before squaring.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    mean(values)?;
    let scale = values.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    if values.len() < 2 || scale == 0.0 {
        return Some(0.0);
    }
    let scaled: Vec<f64> = values.iter().map(|v| v / scale).collect();
    let avg = mean(&scaled)?;
    let variance =
        scaled.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    let sd = variance.sqrt() * scale;
    sd.is_finite().then_some(sd)
}

/// Equal-width bins between min and max. Zero spread yields a single bin.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let (Some(min), Some(max)) = (
        values.iter().copied().reduce(f64::min),
        values.iter().copied().reduce(f64::max),
    ) else {
        return Vec::new();
    };

    if max == min || bins < 2 {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: values.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut result: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + i as f64 * width,
            upper: if i + 1 == bins {
                max
            } else {
                min + (i + 1) as f64 * width
            },
            count: 0,
        })
        .collect();

    for value in values {
        let index = (((value - min) / width) as usize).min(bins - 1);
        result[index].count += 1;
    }
    result
}

pub fn numeric_summary(values: &[f64], bins: usize) -> Option<NumericSummary> {
    Some(NumericSummary {
        count: values.len(),
        mean: mean(values)?,
        min: values.iter().copied().reduce(f64::min)?,
        max: values.iter().copied().reduce(f64::max)?,
        median: median(values)?,
        std_dev: std_dev(values)?,
        histogram: histogram(values, bins),
    })
}

pub fn frequency_table<I>(labels: I) -> Option<FrequencyTable>
where
    I: IntoIterator<Item = String>,
{
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    if counts.is_empty() {
        return None;
    }

    let total = counts.values().sum();
    let mut entries: Vec<FrequencyEntry> = counts
        .into_iter()
        .map(|(label, count)| FrequencyEntry { label, count })
        .collect();
    // BTreeMap already yields labels ascending; a stable sort keeps that for ties
    entries.sort_by(|a, b| b.count.cmp(&a.count));

    Some(FrequencyTable { total, entries })
}

pub fn boolean_summary(values: &[bool]) -> Option<BooleanSummary> {
    if values.is_empty() {
        return None;
    }
    let true_count = values.iter().filter(|v| **v).count();
    let false_count = values.len() - true_count;
    Some(BooleanSummary {
        true_count,
        false_count,
        rate: true_count as f64 / values.len() as f64,
    })
}
