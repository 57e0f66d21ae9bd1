//! CSV ingestion
//!
//! This module turns uploaded CSV bytes into a typed record table,
//! resolving known header aliases along the way.

pub mod normalize;
pub mod reader;

// Re-export commonly used items
pub use reader::parse_csv;
