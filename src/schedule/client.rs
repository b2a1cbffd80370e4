//! Paginated client for the terminal vessel schedule
//!
//! This module fetches the berthing schedule page by page with features
//! including:
//! - Bounded per-request timeout
//! - Hard page ceiling against runaway pagination
//! - Partial results on mid-pagination failure
//! - Acceptance of both wrapped (`{"Objeto": [...]}`) and bare-list responses

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT},
    Client,
};
use serde_json::Value;
use url::Url;

use crate::config::{ApiConfig, MAX_WINDOW_DAYS};
use crate::utils::error::FetchError;

/// Field holding the entry list in wrapped responses
const WRAPPER_FIELD: &str = "Objeto";

/// Sort field requested from the terminal
const SORT_FIELD: &str = "PrevisaoAtracacao";

/// A page that failed and stopped pagination
#[derive(Debug)]
pub struct PageFailure {
    /// 1-based page number of the failed request
    pub page: u32,

    /// What went wrong
    pub error: FetchError,
}

/// Result of one paginated fetch
#[derive(Debug, Default)]
pub struct FetchOutcome {
    /// Raw entries in page order
    pub entries: Vec<Value>,

    /// Number of pages that returned entries
    pub pages_fetched: u32,

    /// Set when a page failed; `entries` still holds the earlier pages
    pub failure: Option<PageFailure>,

    /// Set when the page ceiling was reached before an empty page
    pub truncated: bool,
}

impl FetchOutcome {
    /// Whether nothing was retrieved (total failure or genuinely empty schedule)
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether every page up to the end of data was retrieved
    pub fn is_complete(&self) -> bool {
        self.failure.is_none() && !self.truncated
    }
}

/// Terminal schedule client
pub struct ScheduleClient {
    /// HTTP client with configured timeout
    client: Client,

    /// Search endpoint
    endpoint: String,

    /// Entries requested per page
    page_size: u32,

    /// Page ceiling
    max_pages: u32,

    /// Default window length
    window: ChronoDuration,

    /// Lifecycle statuses requested
    statuses: Vec<String>,

    /// Whether obsolete entries are requested
    include_obsolete: bool,
}

impl ScheduleClient {
    /// Create a new client from the API configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` if the endpoint is not an absolute
    /// URL, or `FetchError::Http` if the HTTP client cannot be created
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .default_headers(Self::build_headers(&config.user_agent))
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            endpoint: parse_endpoint(&config.url)?,
            page_size: config.page_size,
            max_pages: config.max_pages,
            window: ChronoDuration::days(config.window_days.clamp(0, MAX_WINDOW_DAYS)),
            statuses: config.statuses.clone(),
            include_obsolete: config.include_obsolete,
        })
    }

    /// Create a client pointed at another endpoint, e.g. a mock server
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` for a malformed endpoint, or
    /// `FetchError::Http` if the HTTP client cannot be created
    pub fn with_endpoint(endpoint: &str, config: &ApiConfig) -> Result<Self, FetchError> {
        let mut client = Self::new(config)?;
        client.endpoint = parse_endpoint(endpoint)?;
        Ok(client)
    }

    /// Default window start: now minus the configured window
    pub fn default_since(&self) -> DateTime<Utc> {
        Utc::now() - self.window
    }

    /// Fetch the schedule from `since` (default: now minus the window)
    ///
    /// Pages are requested sequentially starting at 1 until a page comes back
    /// empty or the page ceiling is reached. A failing page stops pagination;
    /// everything accumulated before it is kept and the failure is reported in
    /// the outcome rather than returned as an error.
    pub async fn fetch_schedule(&self, since: Option<DateTime<Utc>>) -> FetchOutcome {
        let since = since.unwrap_or_else(|| self.default_since());
        let mut outcome = FetchOutcome::default();
        let mut reached_end = false;

        for page in 1..=self.max_pages {
            tracing::debug!(page, since = %since.to_rfc3339(), "Fetching schedule page");

            let entries = match self.fetch_page(page, since).await {
                Ok(entries) => entries,
                Err(error) => {
                    tracing::warn!(
                        page,
                        error = %error,
                        kept = outcome.entries.len(),
                        "Schedule page failed, keeping earlier pages"
                    );
                    outcome.failure = Some(PageFailure { page, error });
                    return outcome;
                }
            };

            if entries.is_empty() {
                tracing::debug!(page, "Empty page, end of schedule");
                reached_end = true;
                break;
            }

            tracing::debug!(page, entries = entries.len(), "Processed schedule page");
            outcome.entries.extend(entries);
            outcome.pages_fetched = page;
        }

        if !reached_end {
            tracing::warn!(
                max_pages = self.max_pages,
                entries = outcome.entries.len(),
                "Page ceiling reached, schedule may be incomplete"
            );
            outcome.truncated = true;
        }

        tracing::info!(
            pages = outcome.pages_fetched,
            entries = outcome.entries.len(),
            "Completed schedule fetch"
        );

        outcome
    }

    /// Fetch a single page and extract its entries
    async fn fetch_page(&self, page: u32, since: DateTime<Utc>) -> Result<Vec<Value>, FetchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&self.build_query(page, since))
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::ServerError(status.as_u16()));
        }

        let body = response.bytes().await.map_err(FetchError::from_transport)?;
        let payload: Value =
            serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))?;

        Ok(Self::extract_entries(payload))
    }

    /// Build query parameters for a page
    ///
    /// `Situacao` is repeated once per status.
    pub fn build_query(&self, page: u32, since: DateTime<Utc>) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("IncluirObsoletos", self.include_obsolete.to_string()),
            ("TamanhoPagina", self.page_size.to_string()),
            ("SentidoOrdenacao", "1".to_string()),
            ("PaginaAtual", page.to_string()),
            ("Ordenacao", SORT_FIELD.to_string()),
        ];
        query.extend(self.statuses.iter().map(|s| ("Situacao", s.clone())));
        query.push(("Excel", "false".to_string()));
        query.push(("DataInicial", since.to_rfc3339()));
        query
    }

    /// Extract the entry list from either response shape
    ///
    /// An object without a list under `Objeto`, or any other JSON value, is
    /// treated as an empty page.
    pub fn extract_entries(payload: Value) -> Vec<Value> {
        match payload {
            Value::Array(entries) => entries,
            Value::Object(mut wrapper) => match wrapper.remove(WRAPPER_FIELD) {
                Some(Value::Array(entries)) => entries,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    /// Build default headers for terminal requests
    fn build_headers(user_agent: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Ok(value) = HeaderValue::from_str(user_agent) {
            headers.insert(USER_AGENT, value);
        }
        headers
    }
}

/// Check that `endpoint` is an absolute http(s) URL
fn parse_endpoint(endpoint: &str) -> Result<String, FetchError> {
    let url =
        Url::parse(endpoint).map_err(|e| FetchError::InvalidUrl(format!("{endpoint}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(FetchError::InvalidUrl(format!(
            "{endpoint}: unsupported scheme {}",
            url.scheme()
        )));
    }
    Ok(url.into())
}
