//! Terminal schedule retrieval and normalization
//!
//! - [`client`] - paginated fetch of the raw schedule
//! - [`normalizer`] - projection, key standardization and dedup
//! - [`cache`] - time-boxed reuse of fetch results

pub mod cache;
pub mod client;
pub mod normalizer;

pub use cache::{FetchKey, ScheduleCache};
pub use client::{FetchOutcome, PageFailure, ScheduleClient};
pub use normalizer::ScheduleNormalizer;
