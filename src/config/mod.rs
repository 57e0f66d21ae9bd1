//! Configuration management
//!
//! This module handles loading configuration from TOML files, merging CLI
//! arguments on top, and freezing the result into the immutable
//! [`ReportConfig`] that every pipeline stage receives explicitly.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::core::constants::{charts, columns, defaults, degenerate, output_formats, validation};
use crate::core::error::{JournalError, Result};
use crate::core::types::ColumnKind;

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("static hex color pattern"));

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Report title
    pub title: Option<String>,

    /// Entries listed in "top" findings (countries, industries)
    pub top_n: Option<usize>,

    /// Bins used for numeric distribution histograms
    pub histogram_bins: Option<usize>,

    /// Churn percentage that triggers a retention recommendation
    pub churn_alert_percent: Option<f64>,

    /// What to do with degenerate chart data (error, omit)
    pub degenerate_charts: Option<String>,

    /// Summary output format (text, json, minimal)
    pub output_format: Option<String>,

    /// Enable verbose logging
    pub verbose: Option<bool>,

    /// Stamp the report with the generation time
    pub include_timestamp: Option<bool>,

    /// Chart canvas width in pixels
    pub chart_width: Option<u32>,

    /// Chart canvas height in pixels
    pub chart_height: Option<u32>,

    /// Chart colors, cycled for bars and slices
    pub palette: Option<Vec<String>>,

    /// Extra header aliases: source header -> canonical column
    pub aliases: Option<BTreeMap<String, String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: Some(defaults::TITLE.to_string()),
            top_n: Some(defaults::TOP_N),
            histogram_bins: Some(defaults::HISTOGRAM_BINS),
            churn_alert_percent: Some(defaults::CHURN_ALERT_PERCENT),
            degenerate_charts: Some(degenerate::DEFAULT.to_string()),
            output_format: Some(output_formats::DEFAULT.to_string()),
            verbose: Some(false),
            include_timestamp: Some(false),
            chart_width: Some(defaults::CHART_WIDTH),
            chart_height: Some(defaults::CHART_HEIGHT),
            palette: None,
            aliases: None,
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            JournalError::Config(format!(
                "Could not read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| JournalError::TomlParsing {
                path: path.display().to_string(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Try to find and load a config file in standard locations
    pub fn load_from_standard_locations() -> Self {
        if let Ok(config) = Self::load_from_file(defaults::CONFIG_FILE_NAME) {
            return config;
        }

        for i in 1..=defaults::CONFIG_SEARCH_DEPTH {
            let path = format!("{}{}", "../".repeat(i), defaults::CONFIG_FILE_NAME);
            if let Ok(config) = Self::load_from_file(&path) {
                return config;
            }
        }

        Self::default()
    }

    /// Merge this config with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli_config: &CliConfig) {
        if let Some(ref title) = cli_config.title {
            self.title = Some(title.clone());
        }
        if let Some(top_n) = cli_config.top_n {
            self.top_n = Some(top_n);
        }
        if let Some(bins) = cli_config.histogram_bins {
            self.histogram_bins = Some(bins);
        }
        if let Some(ref policy) = cli_config.degenerate_charts {
            self.degenerate_charts = Some(policy.clone());
        }
        if cli_config.include_timestamp {
            self.include_timestamp = Some(true);
        }

        if cli_config.verbose {
            self.verbose = Some(true);
        }
        if let Some(ref output_format) = cli_config.output_format {
            self.output_format = Some(output_format.clone());
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if let Some(ref title) = self.title
            && title.trim().is_empty()
        {
            return Err(JournalError::Config(
                "Title cannot be empty.".to_string(),
            ));
        }

        if let Some(top_n) = self.top_n
            && !(validation::MIN_TOP_N..=validation::MAX_TOP_N).contains(&top_n)
        {
            return Err(JournalError::Config(format!(
                "top_n of {top_n} is out of range. Expected a value between {}-{}.",
                validation::MIN_TOP_N,
                validation::MAX_TOP_N
            )));
        }

        if let Some(bins) = self.histogram_bins
            && !(validation::MIN_BINS..=validation::MAX_BINS).contains(&bins)
        {
            return Err(JournalError::Config(format!(
                "histogram_bins of {bins} is out of range. Expected a value between {}-{}.",
                validation::MIN_BINS,
                validation::MAX_BINS
            )));
        }

        if let Some(threshold) = self.churn_alert_percent {
            const EPSILON: f64 = 1e-10;
            if !(validation::MIN_PERCENTAGE - EPSILON..=validation::MAX_PERCENTAGE + EPSILON)
                .contains(&threshold)
            {
                return Err(JournalError::Config(format!(
                    "Churn alert threshold {threshold}% is invalid. Expected a value between 0-100."
                )));
            }
        }

        if let Some(ref policy) = self.degenerate_charts
            && !degenerate::ALL.contains(&policy.as_str())
        {
            return Err(JournalError::Config(format!(
                "Invalid degenerate chart policy '{policy}'. Expected one of: {}.",
                degenerate::ALL.join(", ")
            )));
        }

        if let Some(ref format) = self.output_format
            && !output_formats::ALL.contains(&format.as_str())
        {
            return Err(JournalError::Config(format!(
                "Invalid output format '{format}'. Expected one of: {}.",
                output_formats::ALL.join(", ")
            )));
        }

        for (name, size) in [("chart_width", self.chart_width), ("chart_height", self.chart_height)] {
            if let Some(px) = size
                && !(200..=2000).contains(&px)
            {
                return Err(JournalError::Config(format!(
                    "{name} of {px}px is out of range. Expected a value between 200-2000."
                )));
            }
        }

        if let Some(ref palette) = self.palette {
            if palette.is_empty() {
                return Err(JournalError::Config(
                    "Palette cannot be empty.".to_string(),
                ));
            }
            if let Some(bad) = palette.iter().find(|c| !HEX_COLOR.is_match(c)) {
                return Err(JournalError::Config(format!(
                    "Palette color '{bad}' is not a #rrggbb hex color."
                )));
            }
        }

        if let Some(ref aliases) = self.aliases
            && let Some((from, _)) = aliases
                .iter()
                .find(|(from, to)| from.trim().is_empty() || to.trim().is_empty())
        {
            return Err(JournalError::Config(format!(
                "Alias '{from}' must map a non-empty header to a non-empty column."
            )));
        }

        Ok(())
    }

    /// Freeze this config into the value passed through the pipeline
    pub fn to_report_config(&self) -> Result<ReportConfig> {
        self.validate()?;
        Ok(self.build_report_config())
    }

    fn build_report_config(&self) -> ReportConfig {
        let mut aliases: Vec<(String, String)> = columns::DEFAULT_ALIASES
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect();
        if let Some(ref extra) = self.aliases {
            aliases.extend(extra.iter().map(|(from, to)| (from.clone(), to.clone())));
        }

        let degenerate = match self.degenerate_charts.as_deref() {
            Some(degenerate::OMIT) => DegeneratePolicy::Omit,
            _ => DegeneratePolicy::Error,
        };

        ReportConfig {
            title: self
                .title
                .clone()
                .unwrap_or_else(|| defaults::TITLE.to_string()),
            columns: ColumnNames::default(),
            aliases,
            top_n: self.top_n.unwrap_or(defaults::TOP_N),
            top_industries_chart: defaults::TOP_INDUSTRIES_CHART,
            top_signup_sources: defaults::TOP_SIGNUP_SOURCES,
            histogram_bins: self.histogram_bins.unwrap_or(defaults::HISTOGRAM_BINS),
            churn_alert_percent: self
                .churn_alert_percent
                .unwrap_or(defaults::CHURN_ALERT_PERCENT),
            dominant_plan_percent: defaults::DOMINANT_PLAN_PERCENT,
            degenerate,
            style: ChartStyle {
                width: self.chart_width.unwrap_or(defaults::CHART_WIDTH),
                height: self.chart_height.unwrap_or(defaults::CHART_HEIGHT),
                palette: self.palette.clone().unwrap_or_else(|| {
                    charts::PALETTE.iter().map(|c| c.to_string()).collect()
                }),
            },
            generated_at: None,
        }
    }
}

/// Configuration options that can come from CLI
#[derive(Debug, Default)]
pub struct CliConfig {
    // Report content
    pub title: Option<String>,             // --title
    pub top_n: Option<usize>,              // --top-n
    pub histogram_bins: Option<usize>,     // --bins
    pub degenerate_charts: Option<String>, // --degenerate
    pub include_timestamp: bool,           // --timestamp
    pub output_path: Option<String>,       // --output

    // Output & format
    pub quiet: bool,                   // --quiet
    pub verbose: bool,                 // --verbose
    pub output_format: Option<String>, // --format
    pub no_progress: bool,             // --no-progress

    // Configuration
    pub config_file: Option<String>, // --config
    pub no_config: bool,             // --no-config
}

/// Canonical names of the columns the analysis knows about
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnNames {
    pub plan: String,
    pub monthly_spend: String,
    pub tenure: String,
    pub churn: String,
    pub industry: String,
    pub country: String,
    pub signup_source: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            plan: columns::PLAN.to_string(),
            monthly_spend: columns::MONTHLY_SPEND.to_string(),
            tenure: columns::TENURE.to_string(),
            churn: columns::CHURN.to_string(),
            industry: columns::INDUSTRY.to_string(),
            country: columns::COUNTRY.to_string(),
            signup_source: columns::SIGNUP_SOURCE.to_string(),
        }
    }
}

impl ColumnNames {
    /// Kind the analysis expects for a canonical column, `None` for others
    pub fn expected_kind(&self, name: &str) -> Option<ColumnKind> {
        if name == self.monthly_spend || name == self.tenure {
            Some(ColumnKind::Numeric)
        } else if name == self.churn {
            Some(ColumnKind::Boolean)
        } else if [&self.plan, &self.industry, &self.country, &self.signup_source]
            .iter()
            .any(|column| name == column.as_str())
        {
            Some(ColumnKind::Categorical)
        } else {
            None
        }
    }

    pub fn all(&self) -> [&str; 7] {
        [
            &self.plan,
            &self.monthly_spend,
            &self.tenure,
            &self.churn,
            &self.industry,
            &self.country,
            &self.signup_source,
        ]
    }
}

/// What report assembly does with chart data it cannot draw meaningfully
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DegeneratePolicy {
    Error,
    Omit,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub palette: Vec<String>,
}

impl ChartStyle {
    /// Palette color for `index`, cycling; the first default color when empty
    pub fn color(&self, index: usize) -> &str {
        if self.palette.is_empty() {
            return charts::PALETTE[0];
        }
        &self.palette[index % self.palette.len()]
    }
}

/// Immutable settings built once at startup and passed into each stage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportConfig {
    pub title: String,
    pub columns: ColumnNames,
    pub aliases: Vec<(String, String)>,
    pub top_n: usize,
    pub top_industries_chart: usize,
    pub top_signup_sources: usize,
    pub histogram_bins: usize,
    pub churn_alert_percent: f64,
    pub dominant_plan_percent: f64,
    pub degenerate: DegeneratePolicy,
    pub style: ChartStyle,
    /// Generation time shown in the header; absent keeps output reproducible
    pub generated_at: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Config::default().build_report_config()
    }
}

impl ReportConfig {
    pub fn with_generated_at(mut self, generated_at: impl Into<String>) -> Self {
        self.generated_at = Some(generated_at.into());
        self
    }

    pub fn with_degenerate(mut self, policy: DegeneratePolicy) -> Self {
        self.degenerate = policy;
        self
    }
}
