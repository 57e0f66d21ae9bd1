use crate::analysis::AggregateResult;
use crate::config::ReportConfig;
use crate::core::types::RecordTable;
use log::{debug, error, info, warn};
use std::path::Path;

/// Initialize the logger with appropriate level based on verbosity.
/// Later calls in the same process are ignored.
pub fn init_logger(verbose: bool, quiet: bool) {
    let level = if quiet {
        log::LevelFilter::Off
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .try_init()
        .ok();

    debug!("Logger initialized with level: {level:?}");
}

/// Log the settings the pipeline will run with
pub fn log_config_info(config: &ReportConfig) {
    info!(
        "Configuration: title=\"{}\", top_n={}, bins={}, degenerate={:?}",
        config.title, config.top_n, config.histogram_bins, config.degenerate
    );
    info!(
        "Charts: {}x{}px, {} palette colors",
        config.style.width,
        config.style.height,
        config.style.palette.len()
    );
    debug!("Header aliases: {}", config.aliases.len());
}

/// Log the input file being read
pub fn log_input_file<P: AsRef<Path>>(path: P, bytes: usize) {
    info!("Reading {} ({bytes} bytes)", path.as_ref().display());
}

/// Log what ingestion produced
pub fn log_ingest_summary(table: &RecordTable) {
    info!(
        "Parsed {} rows across {} columns",
        table.row_count(),
        table.column_count()
    );
    for column in table.columns() {
        debug!(
            "  {} ({}, {} missing)",
            column.name,
            column.kind,
            column.missing_count()
        );
    }
}

/// Log the headline numbers of the analysis
pub fn log_analysis_summary(result: &AggregateResult) {
    info!("Profiled {} columns", result.columns.len());
    if result.quality.has_issues() {
        warn!(
            "Data quality: {} duplicate rows, {} missing cells, {} untyped columns",
            result.quality.duplicate_rows,
            result.quality.total_missing(),
            result.quality.untyped_columns.len()
        );
    } else {
        debug!("Data quality: no issues detected");
    }
}

pub fn log_chart_rendered(title: &str, svg_bytes: usize) {
    debug!("📊 Rendered '{title}' ({svg_bytes} bytes)");
}

/// Log a chart left out of the journal
pub fn log_chart_skipped(title: &str, reason: &str) {
    warn!("Skipping chart '{title}': {reason}");
}

/// Log the finished report
pub fn log_report_written<P: AsRef<Path>>(path: P, bytes: usize, charts: usize) {
    info!(
        "✅ Journal written to {} ({bytes} bytes, {charts} charts)",
        path.as_ref().display()
    );
}

/// Log error information
pub fn log_error(message: &str, source: Option<&dyn std::error::Error>) {
    match source {
        Some(err) => error!("{message}: {err}"),
        None => error!("{message}"),
    }
}

/// Log warning information
pub fn log_warning(message: &str) {
    warn!("{message}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::ingest::parse_csv;
    use std::io;

    fn sample() -> (RecordTable, AggregateResult) {
        let config = ReportConfig::default();
        let table = parse_csv(b"Plan,MonthlySpend\nBasic,10\nBasic,10\nPro,\n", &config).unwrap();
        let result = analyze(&table, &config);
        (table, result)
    }

    #[test]
    fn test_logger_initialization_is_repeatable() {
        init_logger(true, false);
        init_logger(false, true);
        // quiet wins over verbose
        init_logger(true, true);
        init_logger(false, false);
    }

    #[test]
    fn test_log_config_info() {
        log_config_info(&ReportConfig::default());
    }

    #[test]
    fn test_log_stage_summaries() {
        let (table, result) = sample();
        log_input_file("customers.csv", 42);
        log_ingest_summary(&table);
        log_analysis_summary(&result);
        assert!(result.quality.has_issues());
    }

    #[test]
    fn test_log_chart_events() {
        log_chart_rendered("Plan Distribution", 2048);
        log_chart_skipped("Tenure Distribution", "values have no spread");
        log_chart_skipped("", "");
    }

    #[test]
    fn test_log_report_written() {
        log_report_written("out/customers_journal.html", 10_000, 6);
        log_report_written(std::path::PathBuf::from("report.html"), 0, 0);
    }

    #[test]
    fn test_log_error_with_source() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        log_error("Failed to read input", Some(&io_error));
    }

    #[test]
    fn test_log_error_without_source() {
        log_error("Simple error message", None);
    }

    #[test]
    fn test_log_warning_special_characters() {
        log_warning("Column 'Monthly Spend ($)' <unicode: 🚀>");
        log_warning("");
    }
}
