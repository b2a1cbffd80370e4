//! Order ingestion
//!
//! Orders reach the engine from one of three sources, selected explicitly by
//! the caller through [`OrderSource`]:
//!
//! - [`sample::SampleOrders`] - built-in demo orders
//! - [`text::TextOrders`] - pasted free text, one order per line
//! - [`upload::UploadedOrders`] - an uploaded CSV/TSV or spreadsheet file
//!
//! Every source funnels through [`ingest`], which applies the same key
//! standardization as the schedule normalizer so join keys line up.

pub mod sample;
pub mod text;
pub mod upload;

use crate::config::OrdersConfig;
use crate::models::OrderRecord;
use crate::utils::error::IngestError;

pub use sample::SampleOrders;
pub use text::TextOrders;
pub use upload::{TableFormat, UploadedFile, UploadedOrders};

/// A concrete order source
pub trait OrderIngestor {
    /// Produce raw (not yet standardized) orders
    fn ingest(&self) -> Result<Vec<OrderRecord>, IngestError>;
}

/// Ingestion mode selected at the call site
#[derive(Debug, Clone)]
pub enum OrderSource {
    /// Built-in sample orders
    Sample,
    /// Free text pasted by the operator
    Text(String),
    /// Uploaded file; `None` until the operator provides one
    Upload(Option<UploadedFile>),
}

impl OrderSource {
    /// Whether the source has everything it needs to ingest
    pub fn is_ready(&self) -> bool {
        !matches!(self, Self::Upload(None))
    }

    pub fn mode(&self) -> &'static str {
        match self {
            Self::Sample => "sample",
            Self::Text(_) => "text",
            Self::Upload(_) => "upload",
        }
    }
}

/// Options shared by the ingestors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    /// Field delimiter for free-text orders
    pub text_delimiter: u8,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            text_delimiter: b',',
        }
    }
}

impl TryFrom<&OrdersConfig> for IngestOptions {
    type Error = IngestError;

    fn try_from(config: &OrdersConfig) -> Result<Self, Self::Error> {
        let delimiter = config.text_delimiter;
        if !delimiter.is_ascii_graphic() {
            return Err(IngestError::InvalidDelimiter(delimiter));
        }
        Ok(Self {
            text_delimiter: u8::try_from(delimiter)
                .map_err(|_| IngestError::InvalidDelimiter(delimiter))?,
        })
    }
}

/// Ingest orders from `source` and standardize their join keys
///
/// # Errors
///
/// Returns `IngestError::NoFileProvided` for an upload without a file, or the
/// source's own error; a failing batch yields no orders at all.
pub fn ingest(
    source: &OrderSource,
    options: &IngestOptions,
) -> Result<Vec<OrderRecord>, IngestError> {
    let raw = match source {
        OrderSource::Sample => SampleOrders.ingest()?,
        OrderSource::Text(text) => TextOrders::new(text, options.text_delimiter).ingest()?,
        OrderSource::Upload(Some(file)) => UploadedOrders::new(file).ingest()?,
        OrderSource::Upload(None) => return Err(IngestError::NoFileProvided),
    };

    let orders: Vec<OrderRecord> = raw.into_iter().map(OrderRecord::standardized).collect();

    tracing::info!(mode = source.mode(), orders = orders.len(), "Ingested orders");

    Ok(orders)
}
