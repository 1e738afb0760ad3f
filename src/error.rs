//! Error types for the consumer-insights core.
//!
//! Library functions return [`Result<T>`] with an [`InsightsError`]. The
//! variants keep the failure classes a caller has to tell apart separate:
//!
//! - a query against a table that was never registered ([`InsightsError::TableNotFound`])
//!   versus a query the engine rejected ([`InsightsError::Query`]);
//! - a cleaning step that hit bad data ([`InsightsError::Cleaning`]) versus a
//!   CSV that could not be read at all ([`InsightsError::DataProcessing`]).
//!
//! ```
//! use consumer_insights::error::InsightsError;
//!
//! fn describe(err: &InsightsError) -> &'static str {
//!     match err {
//!         InsightsError::TableNotFound(_) => "load a dataset first",
//!         InsightsError::Query { .. } => "the query is malformed",
//!         _ => "something else went wrong",
//!     }
//! }
//! ```
//!
//! The [`ResultExt`] trait adds `.context()` to any `Result` whose error
//! converts into [`InsightsError`]:
//!
//! ```no_run
//! use consumer_insights::error::ResultExt as _;
//!
//! fn read(path: &str) -> consumer_insights::error::Result<Vec<u8>> {
//!     std::fs::read(path).context("Failed to read upload")
//! }
//! ```

use std::fmt;

/// Main error type for consumer-insights operations.
#[derive(Debug)]
pub enum InsightsError {
    /// I/O errors (reading uploads, writing cleaned output)
    Io(std::io::Error),

    /// Data processing errors (CSV parsing, Polars failures)
    DataProcessing(String),

    /// A cleaning step rejected a value it could not normalise
    Cleaning {
        step: &'static str,
        column: String,
        message: String,
    },

    /// No table is registered under this name
    TableNotFound(String),

    /// The SQL engine rejected or failed to run a query
    Query { sql: String, message: String },

    /// A filter could not be constructed or does not fit the loaded dataset
    InvalidFilter(String),

    /// Configuration errors
    Config(String),

    /// File not found or not an accepted upload
    InvalidPath(String),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for InsightsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Cleaning {
                step,
                column,
                message,
            } => write!(f, "Cleaning step '{step}' failed on column '{column}': {message}"),
            Self::TableNotFound(name) => {
                write!(f, "Table '{name}' is not loaded; upload a dataset first")
            }
            Self::Query { sql, message } => write!(f, "Query failed: {message}\n  in: {sql}"),
            Self::InvalidFilter(msg) => write!(f, "Invalid filter: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::InvalidPath(msg) => write!(f, "Invalid path: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for InsightsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for InsightsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<anyhow::Error> for InsightsError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<serde_json::Error> for InsightsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<polars::error::PolarsError> for InsightsError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

/// Result type alias for consumer-insights operations.
pub type Result<T> = std::result::Result<T, InsightsError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<InsightsError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: InsightsError = e.into();
            InsightsError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: InsightsError = e.into();
            InsightsError::Other(format!("{}: {}", f(), err))
        })
    }
}
