//! Error types for the berthwatch engine
//!
//! This module defines the domain errors raised by the schedule client and
//! the order ingestors.

use thiserror::Error;

/// Errors that can occur while fetching a schedule page
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error (connection refused, DNS, TLS, ...)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status code
    #[error("Server error: {0}")]
    ServerError(u16),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Response body was not valid JSON
    #[error("Decoding error: {0}")]
    Decode(String),

    /// Invalid endpoint URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Classify a reqwest error, separating timeouts from other transport failures
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Http(err)
        }
    }
}

/// Errors that can occur while ingesting orders
#[derive(Error, Debug)]
pub enum IngestError {
    /// A free-text line did not split into the expected number of fields
    #[error("Line {line}: expected {expected} fields, found {found}")]
    MalformedLine {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// An uploaded table lacks one of the canonical columns
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// The uploaded file's extension does not map to a known format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// The configured free-text delimiter is not a single visible ASCII character
    #[error("Invalid text delimiter: {0:?}")]
    InvalidDelimiter(char),

    /// Upload mode was selected but no file was provided
    #[error("No order file provided")]
    NoFileProvided,

    /// Delimited-text parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet decoding error
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// The uploaded table has no header row
    #[error("Uploaded table is empty")]
    EmptySheet,
}
