//! The one-shot ingest, analyze and assemble pipeline

use std::fs;
use std::path::Path;

use crate::analysis::{self, AggregateResult};
use crate::config::ReportConfig;
use crate::core::error::Result;
use crate::ingest;
use crate::logging;
use crate::reporting::{self, ReportDocument};

/// Output of a pipeline run
#[derive(Debug, Clone)]
pub struct Report {
    pub aggregates: AggregateResult,
    pub document: ReportDocument,
}

/// Turn CSV bytes into the finished journal
pub fn generate_report(bytes: &[u8], config: &ReportConfig) -> Result<Report> {
    let table = ingest::parse_csv(bytes, config)?;
    logging::log_ingest_summary(&table);

    let aggregates = analysis::analyze(&table, config);
    logging::log_analysis_summary(&aggregates);

    let document = reporting::assemble(&aggregates, config)?;
    Ok(Report {
        aggregates,
        document,
    })
}

/// Read a CSV file and run [`generate_report`] on its contents
pub fn generate_report_from_path<P: AsRef<Path>>(path: P, config: &ReportConfig) -> Result<Report> {
    let bytes = fs::read(path.as_ref())?;
    logging::log_input_file(path.as_ref(), bytes.len());
    generate_report(&bytes, config)
}
