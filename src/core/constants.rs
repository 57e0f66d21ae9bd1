/// Application-wide constants to avoid magic values throughout the codebase.
///
/// This module centralizes the canonical column names, chart titles, output
/// formats and default tuning values used by ingestion, analysis and report
/// assembly.
/// Output format constants
pub mod output_formats {
    /// Text output format - colored summary with metric cards
    pub const TEXT: &str = "text";
    /// JSON output format - aggregate result for automation
    pub const JSON: &str = "json";
    /// Minimal output format - a single plain line
    pub const MINIMAL: &str = "minimal";

    /// Default output format
    pub const DEFAULT: &str = TEXT;

    /// All valid output formats
    pub const ALL: [&str; 3] = [TEXT, JSON, MINIMAL];
}

/// Canonical column names recognised by the analysis
pub mod columns {
    pub const PLAN: &str = "Plan";
    pub const MONTHLY_SPEND: &str = "MonthlySpend";
    pub const TENURE: &str = "Tenure";
    pub const CHURN: &str = "Churn";
    pub const INDUSTRY: &str = "Industry";
    pub const COUNTRY: &str = "Country";
    pub const SIGNUP_SOURCE: &str = "SignupSource";

    /// Header spellings seen in exported customer sheets, mapped to the
    /// canonical name. Matching ignores case and non-alphanumerics.
    pub const DEFAULT_ALIASES: [(&str, &str); 6] = [
        ("Monthly Spend ($)", MONTHLY_SPEND),
        ("Spend", MONTHLY_SPEND),
        ("Tenure (Months)", TENURE),
        ("Churned", CHURN),
        ("Signup Source", SIGNUP_SOURCE),
        ("Subscription Plan", PLAN),
    ];
}

/// Chart titles, also used as keys when wiring charts into sections
pub mod charts {
    pub const PLAN_DISTRIBUTION: &str = "Plan Distribution";
    pub const CHURN_RATE: &str = "Churn Rate";
    pub const SPEND_VS_TENURE: &str = "Spend vs Tenure";
    pub const TOP_INDUSTRIES: &str = "Top 10 Industries";
    pub const SPEND_DISTRIBUTION: &str = "Monthly Spend Distribution";
    pub const TENURE_DISTRIBUTION: &str = "Tenure Distribution";

    /// Chart palette, cycled for bars and pie slices
    pub const PALETTE: [&str; 6] = [
        "#2980b9", "#27ae60", "#e67e22", "#8e44ad", "#c0392b", "#16a085",
    ];
}

/// Degenerate chart policies
pub mod degenerate {
    /// Fail the whole report with a render error
    pub const ERROR: &str = "error";
    /// Skip the chart and keep going
    pub const OMIT: &str = "omit";

    pub const DEFAULT: &str = ERROR;

    pub const ALL: [&str; 2] = [ERROR, OMIT];
}

/// Default configuration values
pub mod defaults {
    /// Report title shown in the header and the document title
    pub const TITLE: &str = "Business Analyst ICP Journal";
    /// Rows listed in "top" findings (countries, industries)
    pub const TOP_N: usize = 5;
    /// Bars in the industry chart
    pub const TOP_INDUSTRIES_CHART: usize = 10;
    /// Signup sources listed in findings
    pub const TOP_SIGNUP_SOURCES: usize = 3;
    /// Histogram bins for numeric distributions
    pub const HISTOGRAM_BINS: usize = 8;
    /// Churn rate (percent) above which a retention recommendation is made
    pub const CHURN_ALERT_PERCENT: f64 = 20.0;
    /// Plan share (percent) above which the mix counts as concentrated
    pub const DOMINANT_PLAN_PERCENT: f64 = 60.0;
    /// Chart canvas size in pixels
    pub const CHART_WIDTH: u32 = 640;
    pub const CHART_HEIGHT: u32 = 360;
    /// Config file searched in the working directory and its parents
    pub const CONFIG_FILE_NAME: &str = ".icp-journal.toml";
    /// Parent directories searched for the config file
    pub const CONFIG_SEARCH_DEPTH: usize = 3;
    /// Suffix appended to the input stem for the default output file
    pub const OUTPUT_SUFFIX: &str = "_journal.html";
}

/// Validation bounds for configuration values
pub mod validation {
    pub const MIN_TOP_N: usize = 1;
    pub const MAX_TOP_N: usize = 50;
    pub const MIN_BINS: usize = 2;
    pub const MAX_BINS: usize = 100;
    pub const MAX_PERCENTAGE: f64 = 100.0;
    pub const MIN_PERCENTAGE: f64 = 0.0;
}

/// Spending bands used in the ICP summary (average monthly spend)
pub mod spend_bands {
    pub const LOW_BELOW: f64 = 50.0;
    pub const MID_BELOW: f64 = 200.0;
}

/// Display and formatting constants
pub mod display {
    pub const SUCCESS_EMOJI: &str = "✅";
    pub const WARNING_EMOJI: &str = "⚠️";
    pub const CHART_EMOJI: &str = "📊";
    /// Placeholder for metrics whose column is absent
    pub const NOT_AVAILABLE: &str = "N/A";
}
