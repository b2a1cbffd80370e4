//! Request-scoped reconciliation workflow
//!
//! A [`Session`] owns everything one operator interaction needs: the schedule
//! client, the normalizer for the active key schema, the ingestion options and
//! the fetch cache. [`Session::run`] performs one fetch-then-reconcile pass and
//! reports a [`WorkflowOutcome`]; only unrecoverable conditions (malformed
//! order batches) surface as errors.

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::error::Result;
use crate::models::{KeySchema, ScheduleRecord};
use crate::orders::{self, IngestOptions, OrderSource};
use crate::reconcile::{self, Reconciliation};
use crate::schedule::{FetchKey, PageFailure, ScheduleCache, ScheduleClient, ScheduleNormalizer};

/// Normalized schedule from one fetch (or cache hit)
#[derive(Debug, Default)]
pub struct ScheduleSnapshot {
    /// Deduplicated schedule table
    pub records: Vec<ScheduleRecord>,

    /// Raw entries before normalization
    pub raw_entries: usize,

    /// Page failure that cut the fetch short, if any
    pub failure: Option<PageFailure>,

    /// Page ceiling reached before the end of data
    pub truncated: bool,

    /// Served from the session cache
    pub from_cache: bool,
}

impl ScheduleSnapshot {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Everything produced by a completed pass
#[derive(Debug)]
pub struct Report {
    pub schedule: ScheduleSnapshot,
    pub reconciliation: Reconciliation,
}

/// How a pass ended
#[derive(Debug)]
pub enum WorkflowOutcome {
    /// The order source needs operator input (e.g. no file uploaded yet)
    AwaitingInput { mode: &'static str },

    /// The schedule came back empty; nothing to reconcile
    NoData { failure: Option<PageFailure> },

    /// Orders were reconciled against the schedule
    Completed(Box<Report>),
}

/// Request-scoped workflow state
pub struct Session {
    client: ScheduleClient,
    normalizer: ScheduleNormalizer,
    options: IngestOptions,
    cache: Option<ScheduleCache>,
}

impl Session {
    /// Build a session from configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::Fetch` if the HTTP client cannot be created, or
    /// `Error::Ingest` for an unusable text delimiter
    pub fn new(config: &Config) -> Result<Self> {
        let client = ScheduleClient::new(&config.api)?;
        Self::with_client(client, config)
    }

    /// Build a session around an existing client
    ///
    /// # Errors
    ///
    /// Returns `Error::Ingest` if the configured text delimiter is unusable
    pub fn with_client(client: ScheduleClient, config: &Config) -> Result<Self> {
        Ok(Self {
            client,
            normalizer: ScheduleNormalizer::new(
                config.schedule.key_schema,
                config.schedule.fields.clone(),
            ),
            options: IngestOptions::try_from(&config.orders)?,
            cache: config
                .cache
                .enabled
                .then(|| ScheduleCache::new(config.cache_ttl())),
        })
    }

    pub fn key_schema(&self) -> KeySchema {
        self.normalizer.schema()
    }

    pub fn cache(&self) -> Option<&ScheduleCache> {
        self.cache.as_ref()
    }

    /// Fetch (or reuse) and normalize the schedule
    pub async fn load_schedule(&mut self, since: Option<DateTime<Utc>>) -> ScheduleSnapshot {
        let key = FetchKey::from(since);

        if let Some(entries) = self.cache.as_mut().and_then(|cache| cache.get(&key)) {
            tracing::info!(entries = entries.len(), "Using cached schedule");
            return ScheduleSnapshot {
                records: self.normalizer.normalize(entries),
                raw_entries: entries.len(),
                failure: None,
                truncated: false,
                from_cache: true,
            };
        }

        let outcome = self.client.fetch_schedule(since).await;
        let records = self.normalizer.normalize(&outcome.entries);
        let raw_entries = outcome.entries.len();

        // Partial or truncated fetches are refetched so their warnings resurface
        if outcome.is_complete() && !outcome.is_empty() {
            if let Some(cache) = self.cache.as_mut() {
                cache.insert(key, outcome.entries);
            }
        }

        ScheduleSnapshot {
            records,
            raw_entries,
            failure: outcome.failure,
            truncated: outcome.truncated,
            from_cache: false,
        }
    }

    /// Run one fetch-then-reconcile pass
    ///
    /// # Errors
    ///
    /// Returns `Error::Ingest` when the order batch is malformed; no partial
    /// ingestion takes place and no schedule is fetched.
    pub async fn run(
        &mut self,
        source: &OrderSource,
        since: Option<DateTime<Utc>>,
    ) -> Result<WorkflowOutcome> {
        if !source.is_ready() {
            tracing::info!(mode = source.mode(), "Waiting for order input");
            return Ok(WorkflowOutcome::AwaitingInput {
                mode: source.mode(),
            });
        }

        let orders = orders::ingest(source, &self.options)?;

        let schedule = self.load_schedule(since).await;
        if schedule.is_empty() {
            tracing::info!(
                failed = schedule.failure.is_some(),
                "No schedule data returned, nothing to reconcile"
            );
            return Ok(WorkflowOutcome::NoData {
                failure: schedule.failure,
            });
        }

        let reconciliation = reconcile::reconcile(&orders, &schedule.records, self.key_schema());

        Ok(WorkflowOutcome::Completed(Box::new(Report {
            schedule,
            reconciliation,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::utils::error::IngestError;

    // Nothing listens here; these tests must return before any request
    fn offline_session() -> Session {
        let config = Config::default();
        let client = ScheduleClient::with_endpoint("http://127.0.0.1:9/schedule", &config.api)
            .expect("client");
        Session::with_client(client, &config).expect("session")
    }

    #[test]
    fn test_missing_upload_awaits_input() {
        let mut session = offline_session();
        let outcome = tokio_test::block_on(session.run(&OrderSource::Upload(None), None)).unwrap();

        assert!(matches!(
            outcome,
            WorkflowOutcome::AwaitingInput { mode: "upload" }
        ));
    }

    #[test]
    fn test_malformed_text_fails_before_fetch() {
        let mut session = offline_session();
        let source = OrderSource::Text("201,Algodão,300,MSC BRUNA,123E\n202,Soja".to_string());

        let err = tokio_test::block_on(session.run(&source, None)).unwrap_err();

        assert!(matches!(
            err,
            Error::Ingest(IngestError::MalformedLine { line: 2, .. })
        ));
        assert!(session.cache().is_some_and(|cache| cache.is_empty()));
    }

    #[test]
    fn test_unusable_delimiter_rejected() {
        let mut config = Config::default();
        config.orders.text_delimiter = 'ç';
        let client = ScheduleClient::new(&config.api).expect("client");

        let err = Session::with_client(client, &config).err().expect("error");
        assert!(matches!(err, Error::Ingest(IngestError::InvalidDelimiter('ç'))));
    }

    #[test]
    fn test_session_follows_config() {
        let mut config = Config::default();
        config.schedule.key_schema = KeySchema::VesselOnly;
        config.cache.enabled = false;
        let client = ScheduleClient::new(&config.api).expect("client");

        let session = Session::with_client(client, &config).unwrap();

        assert_eq!(session.key_schema(), KeySchema::VesselOnly);
        assert!(session.cache().is_none());
    }
}
