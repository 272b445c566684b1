//! HTTP client for the paginated history API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use trowel_types::RawItem;

/// Configuration for the API client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retry attempts per page.
    pub max_retries: u32,
    /// Base delay for exponential backoff (in milliseconds).
    pub base_delay_ms: u64,
    /// Maximum delay between retries (in milliseconds).
    pub max_delay_ms: u64,
    /// User agent string.
    pub user_agent: String,
    /// Value of the `lang` query parameter.
    pub lang: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(20),
            max_retries: 3,
            base_delay_ms: 500,
            max_delay_ms: 10_000,
            user_agent: format!("trowel/{}", env!("CARGO_PKG_VERSION")),
            lang: "fa".to_string(),
        }
    }
}

/// Errors that can occur while fetching pages.
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Request timed out after {0} attempts")]
    Timeout(u32),

    /// Server returned an error status.
    #[error("Server error: {status}")]
    ServerError {
        /// HTTP status code.
        status: u16,
    },

    /// Response body is not a valid page.
    #[error("Invalid page payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The endpoint kept reporting more data than the page guard allows.
    #[error("Page limit of {max_pages} reached for {url}")]
    PageLimit {
        /// Configured page guard.
        max_pages: usize,
        /// Endpoint that hit the guard.
        url: String,
    },
}

impl FetchError {
    /// Returns true for failures that may succeed on a later run.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::ServerError { status } => *status >= 500 || *status == 429,
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Decode(_) | Self::PageLimit { .. } => false,
        }
    }
}

/// One page of history as returned by the API.
///
/// Missing fields default to an empty page with a zero count.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Page {
    /// Records on this page.
    #[serde(default)]
    pub results: Vec<RawItem>,
    /// Total number of records the endpoint reports.
    #[serde(default)]
    pub count: usize,
}

/// Offset/limit window requested for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    /// Page size.
    pub limit: usize,
    /// Index of the first record.
    pub offset: usize,
}

/// A paginated record source.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches one page from `url`.
    async fn fetch_page(&self, url: &str, query: PageQuery) -> Result<Page, FetchError>;
}

/// HTTP client with connection pooling and retry logic.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
}

impl ApiClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self { client, config })
    }

    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        Self::new(ClientConfig::default())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn get_page(&self, url: &str, query: PageQuery) -> Result<Page, FetchError> {
        let mut attempts = 0;

        loop {
            let request = self.client.get(url).query(&[
                ("lang", self.config.lang.clone()),
                ("limit", query.limit.to_string()),
                ("offset", query.offset.to_string()),
            ]);

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS
                    {
                        if attempts < self.config.max_retries {
                            attempts += 1;
                            warn!(url, status = status.as_u16(), attempts, "retrying page");
                            tokio::time::sleep(self.calculate_backoff_delay(attempts)).await;
                            continue;
                        }
                        return Err(FetchError::ServerError {
                            status: status.as_u16(),
                        });
                    }

                    response.error_for_status_ref()?;
                    match response.text().await {
                        Ok(body) => return Ok(serde_json::from_str(&body)?),
                        Err(e)
                            if Self::is_retryable_body_error(&e)
                                && attempts < self.config.max_retries =>
                        {
                            attempts += 1;
                            warn!(url, error = %e, attempts, "retrying page body");
                            tokio::time::sleep(self.calculate_backoff_delay(attempts)).await;
                        }
                        Err(e) if e.is_timeout() => return Err(FetchError::Timeout(attempts + 1)),
                        Err(e) => return Err(e.into()),
                    }
                }
                Err(e) if Self::is_retryable_error(&e) && attempts < self.config.max_retries => {
                    attempts += 1;
                    debug!(url, error = %e, attempts, "retrying page");
                    tokio::time::sleep(self.calculate_backoff_delay(attempts)).await;
                }
                Err(e) if e.is_timeout() => return Err(FetchError::Timeout(attempts + 1)),
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Exponential backoff capped at `max_delay_ms`, with deterministic
    /// jitter of up to 25% either way.
    fn calculate_backoff_delay(&self, attempt: u32) -> Duration {
        let exp_delay = self
            .config
            .base_delay_ms
            .saturating_mul(1u64 << attempt.min(10));
        let capped = exp_delay.min(self.config.max_delay_ms);

        let jitter_range = capped / 4;
        let jitter: i64 = if jitter_range > 0 {
            let offset = (u64::from(attempt) * 17) % (jitter_range * 2);
            offset as i64 - jitter_range as i64
        } else {
            0
        };

        Duration::from_millis((capped as i64 + jitter).max(100) as u64)
    }

    fn is_retryable_error(error: &reqwest::Error) -> bool {
        if error.is_builder() {
            return false;
        }
        error.is_timeout() || error.is_connect() || error.is_request()
    }

    /// A body cut short or stalled mid-read; the next attempt may succeed.
    fn is_retryable_body_error(error: &reqwest::Error) -> bool {
        error.is_timeout() || error.is_body() || error.is_decode()
    }
}

#[async_trait]
impl PageSource for ApiClient {
    async fn fetch_page(&self, url: &str, query: PageQuery) -> Result<Page, FetchError> {
        self.get_page(url, query).await
    }
}
