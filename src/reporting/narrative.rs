//! Rule-based analyst narrative
//!
//! Every sentence here is derived from the aggregates alone, so the same
//! input always reads the same way. Text is plain; escaping happens when the
//! journal renders it.

use serde::Serialize;
use std::fmt;

use crate::analysis::{AggregateResult, GroupMean, GroupRate};
use crate::config::ReportConfig;
use crate::core::constants::spend_bands;

pub const NO_QUALITY_ISSUES: &str = "No data quality issues detected.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpendBand {
    Low,
    Mid,
    High,
}

impl SpendBand {
    pub fn from_average(average: f64) -> Self {
        if average < spend_bands::LOW_BELOW {
            SpendBand::Low
        } else if average < spend_bands::MID_BELOW {
            SpendBand::Mid
        } else {
            SpendBand::High
        }
    }
}

impl fmt::Display for SpendBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpendBand::Low => write!(f, "low"),
            SpendBand::Mid => write!(f, "mid-range"),
            SpendBand::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct IcpSummary {
    pub country: Option<String>,
    pub plan: Option<String>,
    pub industry: Option<String>,
    pub spending: Option<SpendBand>,
    pub average_spend: Option<f64>,
}

impl IcpSummary {
    /// `(label, value)` pairs for the summary table; `None` when unknown
    pub fn entries(&self) -> Vec<(&'static str, Option<String>)> {
        let spending = match (self.spending, self.average_spend) {
            (Some(band), Some(avg)) => Some(format!("{band} spenders, ${avg:.2} per month on average")),
            _ => None,
        };
        vec![
            ("Ideal Country", self.country.clone()),
            ("Ideal Plan", self.plan.clone()),
            ("Ideal Industry", self.industry.clone()),
            ("Spending Behaviour", spending),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Narrative {
    pub key_insights: Vec<String>,
    pub data_quality: Vec<String>,
    pub recommendations: Vec<String>,
    pub icp: IcpSummary,
}

pub fn compose(result: &AggregateResult, config: &ReportConfig) -> Narrative {
    Narrative {
        key_insights: key_insights(result, config),
        data_quality: data_quality(result),
        recommendations: recommendations(result, config),
        icp: icp_summary(result, config),
    }
}

fn leading_label(result: &AggregateResult, column: &str) -> Option<String> {
    result
        .frequencies(column)?
        .leading()
        .map(|entry| entry.label.clone())
}

/// First group with the strictly largest value, so ties keep label order
fn highest<T>(groups: &[T], value: impl Fn(&T) -> f64) -> Option<&T> {
    groups.iter().fold(None, |best, group| match best {
        Some(current) if value(current) >= value(group) => Some(current),
        _ => Some(group),
    })
}

fn key_insights(result: &AggregateResult, config: &ReportConfig) -> Vec<String> {
    let findings = &result.findings;
    let mut lines = vec![format!(
        "The dataset describes {} customers across {} columns.",
        findings.total_customers,
        result.columns.len()
    )];

    if let Some(lead) = findings.plan_distribution.as_ref().and_then(|p| p.first()) {
        lines.push(format!(
            "{} is the most common plan, held by {:.1}% of customers.",
            lead.label, lead.percent
        ));
    }
    if let Some(avg) = findings.average_spend {
        lines.push(format!("Average monthly spend is ${avg:.2}."));
    }
    if let Some(avg) = findings.average_tenure {
        lines.push(format!("Customers stay {avg:.1} months on average."));
    }
    if let Some(rate) = findings.churn_rate {
        lines.push(format!("The overall churn rate is {:.1}%.", rate * 100.0));
    }
    if let Some(industry) = leading_label(result, &config.columns.industry) {
        lines.push(format!("{industry} is the best represented industry."));
    }
    if let Some(country) = leading_label(result, &config.columns.country) {
        lines.push(format!("Most customers are based in {country}."));
    }
    if let Some(sources) = findings.signup_sources.as_ref().filter(|s| !s.is_empty()) {
        lines.push(format!("Top signup sources: {}.", sources.join(", ")));
    }
    if let Some(top) = findings
        .spend_by_plan
        .as_deref()
        .and_then(|groups| highest(groups, |g: &GroupMean| g.mean))
    {
        lines.push(format!(
            "{} customers spend the most, ${:.2} per month on average.",
            top.label, top.mean
        ));
    }

    lines
}

fn data_quality(result: &AggregateResult) -> Vec<String> {
    let quality = &result.quality;
    let mut lines = Vec::new();

    if quality.duplicate_rows > 0 {
        lines.push(format!(
            "{} of {} rows are exact duplicates.",
            quality.duplicate_rows, quality.total_rows
        ));
    }
    for (column, missing) in &quality.missing_by_column {
        let percent = *missing as f64 / quality.total_rows.max(1) as f64 * 100.0;
        lines.push(format!(
            "Column '{column}' is missing {missing} of {} values ({percent:.1}%).",
            quality.total_rows
        ));
    }
    for untyped in &quality.untyped_columns {
        lines.push(format!(
            "Column '{}' was expected to be {} but its values are {}.",
            untyped.name, untyped.expected, untyped.found
        ));
    }

    if lines.is_empty() {
        lines.push(NO_QUALITY_ISSUES.to_string());
    }
    lines
}

fn recommendations(result: &AggregateResult, config: &ReportConfig) -> Vec<String> {
    let findings = &result.findings;
    let mut lines = Vec::new();

    if let Some(rate) = findings.churn_rate
        && rate * 100.0 > config.churn_alert_percent
    {
        lines.push(format!(
            "Churn is {:.1}%, above the {:.1}% alert threshold. Launch a retention programme aimed at at-risk accounts.",
            rate * 100.0,
            config.churn_alert_percent
        ));
    }

    if let Some(worst) = findings
        .churn_by_plan
        .as_deref()
        .and_then(|groups| highest(groups, |g: &GroupRate| g.rate))
        .filter(|g| g.rate > 0.0)
    {
        lines.push(format!(
            "The {} plan has the highest churn at {:.1}%. Review its onboarding and pricing first.",
            worst.label,
            worst.rate * 100.0
        ));
    }

    if let Some(lead) = findings.plan_distribution.as_ref().and_then(|p| p.first())
        && lead.percent > config.dominant_plan_percent
    {
        lines.push(format!(
            "{} accounts for {:.1}% of customers. Diversify the plan mix to reduce dependence on a single offering.",
            lead.label, lead.percent
        ));
    }

    if !result.quality.missing_by_column.is_empty() {
        let columns: Vec<&str> = result
            .quality
            .missing_by_column
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        lines.push(format!(
            "Improve data collection for {} to close gaps in the customer records.",
            columns.join(", ")
        ));
    }

    if lines.is_empty() {
        lines.push(
            "No urgent issues stand out. Keep tracking churn and spend as the customer base grows."
                .to_string(),
        );
    }
    lines
}

fn icp_summary(result: &AggregateResult, config: &ReportConfig) -> IcpSummary {
    let average_spend = result.findings.average_spend;
    IcpSummary {
        country: leading_label(result, &config.columns.country),
        plan: leading_label(result, &config.columns.plan),
        industry: leading_label(result, &config.columns.industry),
        spending: average_spend.map(SpendBand::from_average),
        average_spend,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::ingest::parse_csv;

    fn narrate(csv: &str) -> Narrative {
        let config = ReportConfig::default();
        let table = parse_csv(csv.as_bytes(), &config).unwrap();
        compose(&analyze(&table, &config), &config)
    }

    #[test]
    fn test_spend_bands() {
        assert_eq!(SpendBand::from_average(10.0), SpendBand::Low);
        assert_eq!(SpendBand::from_average(50.0), SpendBand::Mid);
        assert_eq!(SpendBand::from_average(199.99), SpendBand::Mid);
        assert_eq!(SpendBand::from_average(200.0), SpendBand::High);
        assert_eq!(SpendBand::Mid.to_string(), "mid-range");
    }

    #[test]
    fn test_key_insights() {
        let narrative = narrate("Plan,MonthlySpend,Churn\nBasic,10,false\nPro,50,true\n");
        assert!(narrative.key_insights[0].contains("2 customers"));
        assert!(
            narrative
                .key_insights
                .contains(&"Average monthly spend is $30.00.".to_string())
        );
        assert!(
            narrative
                .key_insights
                .contains(&"The overall churn rate is 50.0%.".to_string())
        );
        assert!(
            narrative
                .key_insights
                .iter()
                .any(|l| l.starts_with("Pro customers spend the most"))
        );
    }

    #[test]
    fn test_clean_data_reports_no_quality_issues() {
        let narrative = narrate("Plan,MonthlySpend\nBasic,10\nPro,50\n");
        assert_eq!(narrative.data_quality, vec![NO_QUALITY_ISSUES.to_string()]);
    }

    #[test]
    fn test_quality_lines() {
        let narrative = narrate("Plan,MonthlySpend\nBasic,\nBasic,\nPro,5\n");
        assert!(narrative.data_quality[0].contains("1 of 3 rows"));
        assert!(
            narrative.data_quality[1].contains("Column 'MonthlySpend' is missing 2 of 3 values")
        );
    }

    #[test]
    fn test_churn_recommendations() {
        let narrative = narrate(
            "Plan,Churn\nBasic,yes\nBasic,yes\nPro,no\nPro,yes\nEnterprise,no\n",
        );
        assert!(narrative.recommendations[0].starts_with("Churn is 60.0%"));
        assert!(
            narrative.recommendations[1].starts_with("The Basic plan has the highest churn at 100.0%")
        );
    }

    #[test]
    fn test_dominant_plan_recommendation() {
        let narrative = narrate("Plan\nPro\nPro\nPro\nPro\nBasic\n");
        assert_eq!(narrative.recommendations.len(), 1);
        assert!(narrative.recommendations[0].starts_with("Pro accounts for 80.0%"));
    }

    #[test]
    fn test_missing_data_recommendation() {
        let narrative = narrate("Plan,Country\nPro,US\nBasic,\n");
        assert!(
            narrative
                .recommendations
                .iter()
                .any(|r| r.contains("Improve data collection for Country"))
        );
    }

    #[test]
    fn test_always_at_least_one_recommendation() {
        let narrative = narrate("Plan,MonthlySpend\nBasic,10\nPro,50\n");
        assert_eq!(narrative.recommendations.len(), 1);
        assert!(narrative.recommendations[0].starts_with("No urgent issues"));
    }

    #[test]
    fn test_icp_summary() {
        let narrative = narrate(
            "Plan,Country,Industry,MonthlySpend\nPro,DE,Retail,120\nPro,DE,Tech,80\nBasic,US,Tech,100\n",
        );
        let icp = &narrative.icp;
        assert_eq!(icp.country.as_deref(), Some("DE"));
        assert_eq!(icp.plan.as_deref(), Some("Pro"));
        assert_eq!(icp.industry.as_deref(), Some("Tech"));
        assert_eq!(icp.spending, Some(SpendBand::Mid));

        let entries = icp.entries();
        assert_eq!(
            entries[3].1.as_deref(),
            Some("mid-range spenders, $100.00 per month on average")
        );
    }

    #[test]
    fn test_highest_keeps_first_on_ties() {
        let groups = vec![("a", 1.0), ("b", 1.0), ("c", 0.5)];
        let top = highest(&groups, |g| g.1).unwrap();
        assert_eq!(top.0, "a");
    }
}
