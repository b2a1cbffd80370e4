//! Unified error handling for the berthwatch crate
//!
//! The schedule client and the order ingestors raise their own error types;
//! [`Error`] wraps both for the workflow, and [`BerthwatchErrorTrait`] lets
//! the front end word a failure by category and recoverability.
//!
//! # Architecture
//!
//! - [`BerthwatchErrorTrait`] - Common interface implemented by all error types
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping all domain-specific errors

use thiserror::Error;

pub use crate::utils::error::{FetchError, IngestError};

/// Common trait for all berthwatch error types
pub trait BerthwatchErrorTrait: std::error::Error {
    /// Check if this error is recoverable (the operation may succeed if repeated)
    fn is_recoverable(&self) -> bool;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (HTTP, timeout, server status)
    Network,
    /// Operator input errors (malformed orders, missing columns or files)
    Input,
    /// Parsing and decoding errors
    Parsing,
    /// Configuration and validation errors
    Config,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Input => "input",
            Self::Parsing => "parsing",
            Self::Config => "config",
        }
    }
}

impl BerthwatchErrorTrait for FetchError {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout => true,
            Self::ServerError(status) => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Decode(_) | Self::InvalidUrl(_) => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Decode(_) => ErrorCategory::Parsing,
            Self::InvalidUrl(_) => ErrorCategory::Config,
            _ => ErrorCategory::Network,
        }
    }
}

impl BerthwatchErrorTrait for IngestError {
    fn is_recoverable(&self) -> bool {
        false
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Csv(_) | Self::Spreadsheet(_) => ErrorCategory::Parsing,
            Self::InvalidDelimiter(_) => ErrorCategory::Config,
            _ => ErrorCategory::Input,
        }
    }
}

/// Unified error type for the berthwatch crate
#[derive(Error, Debug)]
pub enum Error {
    /// Schedule client errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Order ingestion errors
    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),
}

impl BerthwatchErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Fetch(e) => e.is_recoverable(),
            Self::Ingest(e) => e.is_recoverable(),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Fetch(e) => e.category(),
            Self::Ingest(e) => e.category(),
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
