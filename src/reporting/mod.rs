//! Report assembly
//!
//! This module renders the charts, composes the analyst narrative and
//! interpolates everything into one self-contained HTML journal.

pub mod charts;
pub mod journal;
pub mod narrative;

use std::fs;
use std::path::Path;

use crate::analysis::AggregateResult;
use crate::config::{DegeneratePolicy, ReportConfig};
use crate::core::constants::charts as titles;
use crate::core::error::{JournalError, Result};
use crate::logging;

use charts::Chart;

// Re-export commonly used items
pub use journal::{Figure, HtmlJournal, JournalData, Section};
pub use narrative::Narrative;

/// Escape text for HTML element content and attribute values
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// The finished journal
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    html: String,
    charts: Vec<String>,
    omitted: Vec<String>,
}

impl ReportDocument {
    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.html.as_bytes()
    }

    pub fn into_string(self) -> String {
        self.html
    }

    pub fn len(&self) -> usize {
        self.html.len()
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }

    /// Titles of the charts embedded in the document
    pub fn charts(&self) -> &[String] {
        &self.charts
    }

    /// Titles of charts left out under the omit policy
    pub fn omitted_charts(&self) -> &[String] {
        &self.omitted
    }

    /// Write the HTML to `path`
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path.as_ref(), self.as_bytes())?;
        Ok(())
    }
}

/// Assemble the journal from the aggregates.
///
/// Any render failure aborts the whole assembly; under
/// [`DegeneratePolicy::Omit`] degenerate charts are skipped instead.
pub fn assemble(result: &AggregateResult, config: &ReportConfig) -> Result<ReportDocument> {
    let mut omitted = Vec::new();
    let figures = render_figures(result, config, &mut omitted)?;
    let narrative = narrative::compose(result, config);

    let html = HtmlJournal::render(&JournalData {
        result,
        narrative: &narrative,
        figures: &figures,
        config,
    });

    Ok(ReportDocument {
        html,
        charts: figures.iter().map(|f| f.chart.title.clone()).collect(),
        omitted,
    })
}

fn render_figures(
    result: &AggregateResult,
    config: &ReportConfig,
    omitted: &mut Vec<String>,
) -> Result<Vec<Figure>> {
    let cols = &config.columns;
    let style = &config.style;
    let mut figures = Vec::new();

    let mut place = |section: Section,
                     title: &str,
                     caption: &str,
                     outcome: Option<Result<Chart>>|
     -> Result<()> {
        match outcome {
            None => {}
            Some(Ok(chart)) => {
                logging::log_chart_rendered(title, chart.svg.len());
                figures.push(Figure {
                    section,
                    chart,
                    caption: caption.to_string(),
                });
            }
            Some(Err(JournalError::Render(reason))) if config.degenerate == DegeneratePolicy::Omit => {
                logging::log_chart_skipped(title, &reason);
                omitted.push(title.to_string());
            }
            Some(Err(e)) => return Err(e),
        }
        Ok(())
    };

    place(
        Section::Distribution,
        titles::PLAN_DISTRIBUTION,
        "Distribution of customers across subscription plans",
        result.frequencies(&cols.plan).map(|freq| {
            let data = counts(freq.entries.iter().map(|e| (&e.label, e.count)));
            charts::bar_chart(titles::PLAN_DISTRIBUTION, &data, "Customers", style)
        }),
    )?;

    place(
        Section::Distribution,
        titles::TOP_INDUSTRIES,
        "Top industries represented in the customer base",
        result.frequencies(&cols.industry).map(|freq| {
            let data = counts(
                freq.top(config.top_industries_chart)
                    .iter()
                    .map(|e| (&e.label, e.count)),
            );
            charts::bar_chart(titles::TOP_INDUSTRIES, &data, "Customers", style)
        }),
    )?;

    place(
        Section::Behavior,
        titles::CHURN_RATE,
        "Share of customers who churned",
        result.boolean(&cols.churn).map(|summary| {
            let data = vec![
                ("Churned".to_string(), summary.true_count as f64),
                ("Retained".to_string(), summary.false_count as f64),
            ];
            charts::pie_chart(titles::CHURN_RATE, &data, style)
        }),
    )?;

    place(
        Section::Behavior,
        titles::SPEND_VS_TENURE,
        "Relationship between monthly spend and customer tenure",
        result.findings.spend_vs_tenure.as_deref().map(|points| {
            charts::scatter_chart(
                titles::SPEND_VS_TENURE,
                points,
                "Monthly Spend",
                "Tenure (months)",
                style,
            )
        }),
    )?;

    place(
        Section::Financial,
        titles::SPEND_DISTRIBUTION,
        "Distribution of monthly spending across customers",
        result.numeric(&cols.monthly_spend).map(|summary| {
            charts::histogram_chart(
                titles::SPEND_DISTRIBUTION,
                &summary.histogram,
                "Monthly Spend",
                style,
            )
        }),
    )?;

    place(
        Section::Financial,
        titles::TENURE_DISTRIBUTION,
        "Distribution of customer tenure in months",
        result.numeric(&cols.tenure).map(|summary| {
            charts::histogram_chart(
                titles::TENURE_DISTRIBUTION,
                &summary.histogram,
                "Tenure (months)",
                style,
            )
        }),
    )?;

    Ok(figures)
}

fn counts<'a>(entries: impl Iterator<Item = (&'a String, usize)>) -> Vec<(String, f64)> {
    entries
        .map(|(label, count)| (label.clone(), count as f64))
        .collect()
}
