//! Core types and foundational components
//!
//! This module contains the record table types, error handling,
//! and constants used throughout the application.

pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items for convenience
pub use error::{ErrorKind, JournalError, Result};
pub use types::{CellValue, Column, ColumnKind, RecordTable, Row};
