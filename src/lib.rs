//! berthwatch - vessel schedule and order reconciliation
//!
//! Fetches the terminal's vessel arrival schedule, reduces it to the latest
//! forecast per vessel voyage, and joins purchase/shipment orders against it
//! to show which order arrives on which vessel, and when.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`schedule`] - Paginated schedule client, normalizer and fetch cache
//! - [`orders`] - Order ingestion from sample data, free text or uploads
//! - [`reconcile`] - Left join of orders to the schedule, plus post-filters
//! - [`workflow`] - Request-scoped session running one reconciliation pass
//! - [`models`] - Core data structures and key schemas
//! - [`render`] - Display formatting for the presentation layer
//! - [`utils`] - Key standardization and lenient field parsing
//!
//! # Example
//!
//! ```no_run
//! use berthwatch::config::Config;
//! use berthwatch::orders::OrderSource;
//! use berthwatch::workflow::{Session, WorkflowOutcome};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let mut session = Session::new(&config)?;
//!
//!     if let WorkflowOutcome::Completed(report) = session.run(&OrderSource::Sample, None).await? {
//!         println!("{} orders reconciled", report.reconciliation.matched.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod orders;
pub mod reconcile;
pub mod render;
pub mod schedule;
pub mod utils;
pub mod workflow;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{BerthwatchErrorTrait, Error, ErrorCategory, Result};
    pub use crate::models::{KeySchema, MatchedRecord, OrderRecord, ScheduleRecord};
    pub use crate::orders::{OrderSource, UploadedFile};
    pub use crate::reconcile::{reconcile, FilterColumn, MatchFilter, Reconciliation};
    pub use crate::schedule::{ScheduleClient, ScheduleNormalizer};
    pub use crate::workflow::{Session, WorkflowOutcome};
}

// Direct re-exports for convenience
pub use models::{KeySchema, MatchedRecord, OrderRecord, ScheduleRecord};
