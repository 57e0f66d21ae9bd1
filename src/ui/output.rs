//! Summary output for icp-journal runs

use serde::Serialize;
use std::path::Path;

use crate::analysis::AggregateResult;
use crate::config::ReportConfig;
use crate::core::constants::{display, output_formats};
use crate::core::error::Result;
use crate::pipeline::Report;
use crate::reporting::journal::{format_currency, format_months, format_rate};
use crate::ui::color::{Colors, churn_color, colorize};

#[derive(Serialize)]
struct JsonSummary<'a> {
    output: String,
    charts: &'a [String],
    omitted_charts: &'a [String],
    aggregates: &'a AggregateResult,
}

/// Print the run summary in the requested format
pub fn display_summary(
    report: &Report,
    output_path: &Path,
    output_format: &str,
    config: &ReportConfig,
) -> Result<()> {
    println!("{}", render_summary(report, output_path, output_format, config)?);
    Ok(())
}

/// Build the summary text without printing it
pub fn render_summary(
    report: &Report,
    output_path: &Path,
    output_format: &str,
    config: &ReportConfig,
) -> Result<String> {
    match output_format {
        output_formats::JSON => render_json(report, output_path),
        output_formats::MINIMAL => Ok(render_minimal(report, output_path)),
        _ => Ok(render_text(report, output_path, config)),
    }
}

fn render_json(report: &Report, output_path: &Path) -> Result<String> {
    let summary = JsonSummary {
        output: output_path.display().to_string(),
        charts: report.document.charts(),
        omitted_charts: report.document.omitted_charts(),
        aggregates: &report.aggregates,
    };
    Ok(serde_json::to_string_pretty(&summary)?)
}

/// One plain line, no colors or emojis
fn render_minimal(report: &Report, output_path: &Path) -> String {
    let findings = &report.aggregates.findings;
    format!(
        "customers={} avg_spend={} avg_tenure={} churn={} charts={} output={}",
        findings.total_customers,
        format_currency(findings.average_spend),
        format_months(findings.average_tenure).replace(' ', "_"),
        format_rate(findings.churn_rate),
        report.document.charts().len(),
        output_path.display()
    )
}

fn label(text: &str) -> String {
    colorize(text, &format!("{}{}", Colors::BOLD, Colors::CYAN))
}

fn render_text(report: &Report, output_path: &Path, config: &ReportConfig) -> String {
    let findings = &report.aggregates.findings;
    let quality = &report.aggregates.quality;
    let mut lines = Vec::new();

    lines.push(format!(
        "{} {}",
        display::SUCCESS_EMOJI,
        colorize(&config.title, &format!("{}{}", Colors::BOLD, Colors::GREEN))
    ));
    lines.push(format!(
        "{}: {}",
        label("Total Customers"),
        findings.total_customers
    ));
    lines.push(format!(
        "{}: {}",
        label("Average Monthly Spend"),
        format_currency(findings.average_spend)
    ));
    lines.push(format!(
        "{}: {}",
        label("Average Tenure"),
        format_months(findings.average_tenure)
    ));
    let churn = format_rate(findings.churn_rate);
    let churn = match findings.churn_rate {
        Some(rate) => colorize(&churn, churn_color(rate, config.churn_alert_percent)),
        None => churn,
    };
    lines.push(format!("{}: {}", label("Churn Rate"), churn));

    if quality.has_issues() {
        lines.push(format!(
            "{} {}",
            display::WARNING_EMOJI,
            colorize(
                &format!(
                    "Data quality: {} duplicate rows, {} missing cells, {} untyped columns",
                    quality.duplicate_rows,
                    quality.total_missing(),
                    quality.untyped_columns.len()
                ),
                Colors::YELLOW
            )
        ));
    }

    lines.push(format!(
        "{} {} chart(s): {}",
        display::CHART_EMOJI,
        report.document.charts().len(),
        report.document.charts().join(", ")
    ));
    for title in report.document.omitted_charts() {
        lines.push(format!(
            "{} {}",
            display::WARNING_EMOJI,
            colorize(&format!("Omitted chart: {title}"), Colors::DIM)
        ));
    }

    lines.push(format!(
        "{}: {}",
        label("Journal written to"),
        colorize(&output_path.display().to_string(), Colors::BLUE)
    ));
    lines.join("\n")
}
