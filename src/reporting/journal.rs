use crate::analysis::{AggregateResult, ColumnProfile, ColumnStats};
use crate::config::ReportConfig;
use crate::core::constants::display;

use super::charts::Chart;
use super::html_escape;
use super::narrative::Narrative;

/// Constants for journal styling and layout
mod journal_constants {
    pub const SUBTITLE: &str = "Comprehensive analysis with data visualizations";

    /// Churn rates at or below this stay green on the metric card
    pub const HEALTHY_CHURN_PERCENT: f64 = 10.0;

    pub const NO_CHARTS: &str = "No charts could be drawn for this section.";
}

/// Journal section a chart belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Distribution,
    Behavior,
    Financial,
}

/// A rendered chart with its caption, placed in a section
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub section: Section,
    pub chart: Chart,
    pub caption: String,
}

/// Everything the journal template reads
#[derive(Debug, Clone, Copy)]
pub struct JournalData<'a> {
    pub result: &'a AggregateResult,
    pub narrative: &'a Narrative,
    /// Figures in document order; numbering follows this order
    pub figures: &'a [Figure],
    pub config: &'a ReportConfig,
}

pub fn format_currency(value: Option<f64>) -> String {
    value.map_or_else(|| display::NOT_AVAILABLE.to_string(), |v| format!("${v:.2}"))
}

pub fn format_months(value: Option<f64>) -> String {
    value.map_or_else(
        || display::NOT_AVAILABLE.to_string(),
        |v| format!("{v:.1} months"),
    )
}

/// Format a 0..=1 rate as a percentage
pub fn format_rate(value: Option<f64>) -> String {
    value.map_or_else(
        || display::NOT_AVAILABLE.to_string(),
        |v| format!("{:.1}%", v * 100.0),
    )
}

/// HTML journal generator for customer analysis results
pub struct HtmlJournal;

impl HtmlJournal {
    /// Generate the complete HTML document
    pub fn render(data: &JournalData) -> String {
        let css_styles = Self::generate_css();
        let body_content = Self::generate_body_content(data);

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{}</title>
    <style>{}</style>
</head>
<body>
    {}
</body>
</html>
"#,
            html_escape(&data.config.title),
            css_styles,
            body_content
        )
    }

    fn generate_css() -> &'static str {
        r#"
        :root {
            --primary-color: #2980b9;
            --good-color: #059669;
            --warning-color: #d97706;
            --bad-color: #dc2626;
            --bg-color: #f8fafc;
            --card-bg: #ffffff;
            --border-color: #e2e8f0;
            --text-primary: #1e293b;
            --text-secondary: #64748b;
        }

        * { margin: 0; padding: 0; box-sizing: border-box; }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background-color: var(--bg-color);
            color: var(--text-primary);
            line-height: 1.6;
        }

        .container {
            max-width: 1100px;
            margin: 0 auto;
            padding: 2rem;
        }

        .report-header {
            text-align: center;
            margin-bottom: 2.5rem;
            padding: 2rem;
            background: linear-gradient(135deg, var(--primary-color), #3b82f6);
            color: white;
            border-radius: 12px;
        }

        .report-header h1 { font-size: 2.3rem; margin-bottom: 0.5rem; }
        .report-header p { opacity: 0.9; }

        .section {
            background: var(--card-bg);
            border: 1px solid var(--border-color);
            border-radius: 12px;
            padding: 2rem;
            margin-bottom: 2rem;
        }

        .section-title {
            font-size: 1.4rem;
            color: var(--primary-color);
            border-bottom: 2px solid var(--border-color);
            padding-bottom: 0.5rem;
            margin-bottom: 1.5rem;
        }

        .section h3 { margin: 1.5rem 0 0.75rem; }

        .key-metrics {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
            gap: 1.25rem;
        }

        .metric-card {
            padding: 1.25rem;
            border-radius: 10px;
            border: 1px solid var(--border-color);
            text-align: center;
        }

        .metric-value { font-size: 1.8rem; font-weight: 700; color: var(--primary-color); }
        .metric-label { color: var(--text-secondary); font-size: 0.9rem; text-transform: uppercase; }

        .good .metric-value { color: var(--good-color); }
        .warning .metric-value { color: var(--warning-color); }
        .bad .metric-value { color: var(--bad-color); }

        .graph-container { text-align: center; margin-bottom: 2rem; }
        .graph-container img { max-width: 100%; border-radius: 8px; }
        .graph-caption { color: var(--text-secondary); font-style: italic; margin-top: 0.5rem; }
        .empty-note { color: var(--text-secondary); }

        ul.findings { padding-left: 1.5rem; }
        ul.findings li { margin-bottom: 0.4rem; }

        .recommendations {
            background: linear-gradient(135deg, #fef3c7, #fed7aa);
            border: 1px solid #f59e0b;
            border-radius: 12px;
            padding: 1rem 1.5rem;
        }

        .recommendations li { color: #78350f; }

        table { width: 100%; border-collapse: collapse; font-size: 0.95rem; }
        th, td { text-align: left; padding: 0.5rem 0.75rem; border-bottom: 1px solid var(--border-color); }
        th { background: var(--bg-color); }
        td.numeric { text-align: right; }

        @media (max-width: 768px) {
            .container { padding: 1rem; }
            .key-metrics { grid-template-columns: 1fr; }
        }
        "#
    }

    /// Generate the main body content of the journal
    fn generate_body_content(data: &JournalData) -> String {
        format!(
            r#"
    <div class="container">
        {}
        {}
        {}
        {}
        {}
        {}
        {}
    </div>
"#,
            Self::generate_header_section(data.config),
            Self::generate_metrics_section(data.result),
            Self::generate_figure_section(data, Section::Distribution, "Distribution Analysis"),
            Self::generate_figure_section(data, Section::Behavior, "Customer Behavior Analysis"),
            Self::generate_figure_section(data, Section::Financial, "Financial Insights"),
            Self::generate_findings_section(data.narrative),
            Self::generate_profile_section(data.result),
        )
    }

    fn generate_header_section(config: &ReportConfig) -> String {
        let generated = config
            .generated_at
            .as_deref()
            .map(|ts| format!(r#"<p class="generated">Generated on {}</p>"#, html_escape(ts)))
            .unwrap_or_default();

        format!(
            r#"
        <div class="report-header">
            <h1>{}</h1>
            <p>{}</p>
            {}
        </div>
"#,
            html_escape(&config.title),
            journal_constants::SUBTITLE,
            generated
        )
    }

    fn generate_metrics_section(result: &AggregateResult) -> String {
        let findings = &result.findings;
        let churn_class = Self::get_churn_style(findings.churn_rate);

        format!(
            r#"
        <div class="section">
            <h2 class="section-title">Key Metrics Overview</h2>
            <div class="key-metrics">
                {}
                {}
                {}
                {}
            </div>
        </div>
"#,
            Self::generate_metric_card(
                &findings.total_customers.to_string(),
                "Total Customers",
                ""
            ),
            Self::generate_metric_card(
                &format_currency(findings.average_spend),
                "Average Monthly Spend",
                ""
            ),
            Self::generate_metric_card(
                &format_months(findings.average_tenure),
                "Average Tenure",
                ""
            ),
            Self::generate_metric_card(&format_rate(findings.churn_rate), "Churn Rate", churn_class),
        )
    }

    /// CSS class for the churn card
    fn get_churn_style(rate: Option<f64>) -> &'static str {
        match rate.map(|r| r * 100.0) {
            None => "",
            Some(p) if p <= journal_constants::HEALTHY_CHURN_PERCENT => "good",
            Some(p) if p <= 2.0 * journal_constants::HEALTHY_CHURN_PERCENT => "warning",
            Some(_) => "bad",
        }
    }

    fn generate_metric_card(value: &str, label: &str, style_class: &str) -> String {
        format!(
            r#"
                <div class="metric-card {}">
                    <div class="metric-value">{}</div>
                    <div class="metric-label">{}</div>
                </div>
"#,
            style_class, value, label
        )
    }

    fn generate_figure_section(data: &JournalData, section: Section, heading: &str) -> String {
        let figures = data
            .figures
            .iter()
            .enumerate()
            .filter(|(_, figure)| figure.section == section)
            .map(|(index, figure)| Self::generate_figure(index + 1, figure))
            .collect::<Vec<_>>();

        let content = if figures.is_empty() {
            format!(
                r#"<p class="empty-note">{}</p>"#,
                journal_constants::NO_CHARTS
            )
        } else {
            figures.join("")
        };

        format!(
            r#"
        <div class="section">
            <h2 class="section-title">{}</h2>
            {}
        </div>
"#,
            heading, content
        )
    }

    fn generate_figure(number: usize, figure: &Figure) -> String {
        format!(
            r#"
            <div class="graph-container">
                <img src="{}" alt="{}">
                <p class="graph-caption">Figure {}: {}</p>
            </div>
"#,
            figure.chart.data_uri(),
            html_escape(&figure.chart.title),
            number,
            html_escape(&figure.caption)
        )
    }

    fn generate_list(items: &[String], class: &str) -> String {
        let list = items
            .iter()
            .map(|item| format!("<li>{}</li>", html_escape(item)))
            .collect::<Vec<_>>()
            .join("");
        format!(r#"<ul class="{class}">{list}</ul>"#)
    }

    fn generate_findings_section(narrative: &Narrative) -> String {
        let icp_rows = narrative
            .icp
            .entries()
            .into_iter()
            .map(|(label, value)| {
                format!(
                    "<tr><th>{}</th><td>{}</td></tr>",
                    label,
                    value
                        .as_deref()
                        .map(html_escape)
                        .unwrap_or_else(|| display::NOT_AVAILABLE.to_string())
                )
            })
            .collect::<Vec<_>>()
            .join("");

        format!(
            r#"
        <div class="section">
            <h2 class="section-title">Analyst Findings</h2>
            <h3>Key Insights</h3>
            {}
            <h3>Data Quality Assessment</h3>
            {}
            <h3>Strategic Recommendations</h3>
            <div class="recommendations">{}</div>
            <h3>ICP Summary</h3>
            <table class="icp-summary">{}</table>
        </div>
"#,
            Self::generate_list(&narrative.key_insights, "findings"),
            Self::generate_list(&narrative.data_quality, "findings"),
            Self::generate_list(&narrative.recommendations, "findings"),
            icp_rows
        )
    }

    fn generate_profile_section(result: &AggregateResult) -> String {
        let rows = result
            .columns
            .iter()
            .map(|profile| {
                format!(
                    r#"<tr><td>{}</td><td>{}</td><td class="numeric">{}</td><td>{}</td></tr>"#,
                    html_escape(&profile.name),
                    profile.kind,
                    profile.missing,
                    html_escape(&Self::describe_profile(profile))
                )
            })
            .collect::<Vec<_>>()
            .join("\n                ");

        format!(
            r#"
        <div class="section">
            <h2 class="section-title">Column Profiles</h2>
            <table class="profiles">
                <tr><th>Column</th><th>Type</th><th>Missing</th><th>Summary</th></tr>
                {}
            </table>
        </div>
"#,
            rows
        )
    }

    /// One-line summary of a column profile
    fn describe_profile(profile: &ColumnProfile) -> String {
        match &profile.stats {
            ColumnStats::Numeric(s) => format!(
                "mean {:.2}, median {:.2}, min {:.2}, max {:.2}, std dev {:.2}",
                s.mean, s.median, s.min, s.max, s.std_dev
            ),
            ColumnStats::Categorical(table) => match table.leading() {
                Some(top) => format!(
                    "{} distinct, most frequent: {} ({})",
                    table.entries.len(),
                    top.label,
                    top.count
                ),
                None => "no values".to_string(),
            },
            ColumnStats::Boolean(s) => format!(
                "{} true / {} false ({:.1}% true)",
                s.true_count,
                s.false_count,
                s.rate * 100.0
            ),
            ColumnStats::Empty => "no values".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::ingest::parse_csv;
    use crate::reporting::narrative;

    fn sample(csv: &str) -> (AggregateResult, Narrative, ReportConfig) {
        let config = ReportConfig::default();
        let table = parse_csv(csv.as_bytes(), &config).unwrap();
        let result = analyze(&table, &config);
        let narrative = narrative::compose(&result, &config);
        (result, narrative, config)
    }

    fn figure(section: Section, title: &str) -> Figure {
        Figure {
            section,
            chart: Chart {
                title: title.to_string(),
                svg: "<svg/>".to_string(),
            },
            caption: format!("About {title}"),
        }
    }

    #[test]
    fn test_value_formatting() {
        assert_eq!(format_currency(Some(30.0)), "$30.00");
        assert_eq!(format_months(Some(12.5)), "12.5 months");
        assert_eq!(format_rate(Some(0.5)), "50.0%");
        assert_eq!(format_currency(None), "N/A");
        assert_eq!(format_rate(None), "N/A");
    }

    #[test]
    fn test_get_churn_style() {
        assert_eq!(HtmlJournal::get_churn_style(None), "");
        assert_eq!(HtmlJournal::get_churn_style(Some(0.05)), "good");
        assert_eq!(HtmlJournal::get_churn_style(Some(0.15)), "warning");
        assert_eq!(HtmlJournal::get_churn_style(Some(0.5)), "bad");
    }

    #[test]
    fn test_generate_metric_card() {
        let card = HtmlJournal::generate_metric_card("$30.00", "Average Monthly Spend", "");
        assert!(card.contains(r#"<div class="metric-value">$30.00</div>"#));
        assert!(card.contains("Average Monthly Spend"));
    }

    #[test]
    fn test_metrics_show_not_available() {
        let (result, _, _) = sample("Plan\nBasic\nPro\n");
        let section = HtmlJournal::generate_metrics_section(&result);
        assert!(section.contains(">2<"));
        assert_eq!(section.matches(">N/A<").count(), 3);
    }

    #[test]
    fn test_render_sections_in_order() {
        let (result, narrative, config) =
            sample("Plan,MonthlySpend,Churn\nBasic,10,false\nPro,50,true\n");
        let html = HtmlJournal::render(&JournalData {
            result: &result,
            narrative: &narrative,
            figures: &[],
            config: &config,
        });

        let order = [
            "Key Metrics Overview",
            "Distribution Analysis",
            "Customer Behavior Analysis",
            "Financial Insights",
            "Analyst Findings",
            "Key Insights",
            "Data Quality Assessment",
            "Strategic Recommendations",
            "ICP Summary",
            "Column Profiles",
        ];
        let positions: Vec<usize> = order.iter().map(|h| html.find(h).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(html.contains("$30.00"));
        assert!(html.contains("50.0%"));
        assert!(!html.contains("Generated on"));
        assert!(!html.contains("<script"));
    }

    #[test]
    fn test_figures_are_numbered_in_document_order() {
        let (result, narrative, config) = sample("Plan\nBasic\nPro\n");
        let figures = vec![
            figure(Section::Distribution, "Plan Distribution"),
            figure(Section::Behavior, "Churn Rate"),
            figure(Section::Financial, "Tenure Distribution"),
        ];
        let html = HtmlJournal::render(&JournalData {
            result: &result,
            narrative: &narrative,
            figures: &figures,
            config: &config,
        });
        assert!(html.contains("Figure 1: About Plan Distribution"));
        assert!(html.contains("Figure 2: About Churn Rate"));
        assert!(html.contains("Figure 3: About Tenure Distribution"));
        assert!(html.contains("src=\"data:image/svg+xml;base64,"));
        assert!(!html.contains(journal_constants::NO_CHARTS));
    }

    #[test]
    fn test_empty_section_has_note() {
        let (result, narrative, config) = sample("Plan\nBasic\nPro\n");
        let figures = vec![figure(Section::Distribution, "Plan Distribution")];
        let data = JournalData {
            result: &result,
            narrative: &narrative,
            figures: &figures,
            config: &config,
        };
        let section =
            HtmlJournal::generate_figure_section(&data, Section::Financial, "Financial Insights");
        assert!(section.contains(journal_constants::NO_CHARTS));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let config = ReportConfig {
            title: "Q3 <Review> & \"Plan\"".to_string(),
            ..ReportConfig::default()
        }
        .with_generated_at("2025-01-01 <now>");
        let table = parse_csv(b"<b>Plan</b>\n<i>x</i>\ny&z\n", &config).unwrap();
        let result = analyze(&table, &config);
        let narrative = narrative::compose(&result, &config);
        let html = HtmlJournal::render(&JournalData {
            result: &result,
            narrative: &narrative,
            figures: &[],
            config: &config,
        });

        assert!(html.contains("<title>Q3 &lt;Review&gt; &amp; &quot;Plan&quot;</title>"));
        assert!(html.contains("&lt;b&gt;Plan&lt;/b&gt;"));
        assert!(!html.contains("<b>Plan</b>"));
        assert!(!html.contains("<i>x</i>"));
        assert!(html.contains("Generated on 2025-01-01 &lt;now&gt;"));
    }

    #[test]
    fn test_describe_profile() {
        let (result, _, _) = sample("Plan,MonthlySpend,Churn,Notes\nBasic,10,yes,\nPro,50,no,\n");
        let describe = |name: &str| HtmlJournal::describe_profile(result.profile(name).unwrap());
        assert_eq!(
            describe("MonthlySpend"),
            "mean 30.00, median 30.00, min 10.00, max 50.00, std dev 28.28"
        );
        assert_eq!(describe("Plan"), "2 distinct, most frequent: Basic (1)");
        assert_eq!(describe("Churn"), "1 true / 1 false (50.0% true)");
        assert_eq!(describe("Notes"), "no values");
    }
}
