use std::fmt;

/// Comprehensive error types for icp-journal operations
#[derive(Debug)]
pub enum JournalError {
    /// Malformed, non-UTF-8 or empty CSV input
    Parse(String),

    /// Low-level CSV reader error
    Csv(csv::Error),

    /// Chart or report assembly failure on degenerate data
    Render(String),

    /// IO error (file operations, etc.)
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// Config file that is not valid TOML
    TomlParsing {
        path: String,
        source: toml::de::Error,
    },

    /// JSON serialization error
    Serialization(serde_json::Error),
}

/// Coarse classification surfaced to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Render,
    Io,
    Config,
    Internal,
}

impl JournalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            JournalError::Parse(_) | JournalError::Csv(_) => ErrorKind::Parse,
            JournalError::Render(_) => ErrorKind::Render,
            JournalError::Io(_) => ErrorKind::Io,
            JournalError::Config(_) | JournalError::TomlParsing { .. } => ErrorKind::Config,
            JournalError::Serialization(_) => ErrorKind::Internal,
        }
    }

    pub fn is_parse(&self) -> bool {
        self.kind() == ErrorKind::Parse
    }

    pub fn is_render(&self) -> bool {
        self.kind() == ErrorKind::Render
    }
}

impl fmt::Display for JournalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JournalError::Parse(msg) => write!(f, "Parse error: {msg}"),
            JournalError::Csv(err) => write!(f, "Parse error: {err}"),
            JournalError::Render(msg) => write!(f, "Render error: {msg}"),
            JournalError::Io(err) => write!(f, "IO error: {err}"),
            JournalError::Config(msg) => write!(f, "Configuration error: {msg}"),
            JournalError::TomlParsing { path, source } => {
                write!(f, "Invalid TOML in config file '{path}': {source}")
            }
            JournalError::Serialization(err) => write!(f, "Serialization error: {err}"),
        }
    }
}

impl std::error::Error for JournalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            JournalError::Csv(err) => Some(err),
            JournalError::Io(err) => Some(err),
            JournalError::TomlParsing { source, .. } => Some(source),
            JournalError::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for JournalError {
    fn from(err: std::io::Error) -> Self {
        JournalError::Io(err)
    }
}

impl From<csv::Error> for JournalError {
    fn from(err: csv::Error) -> Self {
        JournalError::Csv(err)
    }
}

impl From<serde_json::Error> for JournalError {
    fn from(err: serde_json::Error) -> Self {
        JournalError::Serialization(err)
    }
}

/// Type alias for Results using JournalError
pub type Result<T> = std::result::Result<T, JournalError>;
