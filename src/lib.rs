//! icp-journal turns a CSV of customer records into a self-contained
//! "Business Analyst ICP Journal": descriptive statistics, SVG charts
//! embedded as data URIs, and a rule-based narrative in one HTML file.
//!
//! The pipeline is synchronous and stateless:
//!
//! ```text
//! bytes -> ingest::parse_csv -> analysis::analyze -> reporting::assemble -> HTML
//! ```
//!
//! Every stage receives the same immutable [`ReportConfig`].

pub mod analysis;
pub mod config;
pub mod core;
pub mod ingest;
pub mod logging;
pub mod pipeline;
pub mod reporting;
pub mod ui;

// Re-export commonly used items
pub use analysis::{AggregateResult, analyze};
pub use config::{Config, DegeneratePolicy, ReportConfig};
pub use core::error::{ErrorKind, JournalError, Result};
pub use core::types::{CellValue, ColumnKind, RecordTable};
pub use ingest::parse_csv;
pub use pipeline::{Report, generate_report, generate_report_from_path};
pub use reporting::{ReportDocument, assemble};
