//! Fetch transport
//!
//! Sources never talk to the network directly: they receive a [`Fetcher`]
//! returning the raw bytes of a URL. [`HttpFetcher`] is the production
//! transport; [`StaticFetcher`] serves canned responses (offline fixtures, tests).

use crate::error::SourceError;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use tracing::debug;

/// Default User-Agent header
pub const USER_AGENT: &str = "controlled-vocabulary/0.1";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Raw byte transport
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// Body of `url`, or an error for transport failures and non-success statuses
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, SourceError>;
}

/// reqwest-backed transport
pub struct HttpFetcher {
    http_client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, SourceError> {
        let http_client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Network(e.to_string()))?;

        Ok(Self { http_client })
    }
}

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        debug!(url = %url, "HTTP GET");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api(status.as_u16(), body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::Network(format!("reading body of {} failed: {}", url, e)))?;

        debug!(url = %url, size = bytes.len(), "HTTP GET complete");

        Ok(bytes.to_vec())
    }
}

/// In-memory transport: url -> body
///
/// Unknown URLs fail with a network error. Counts every request.
#[derive(Default)]
pub struct StaticFetcher {
    responses: RwLock<HashMap<String, Vec<u8>>>,
    requests: AtomicUsize,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`StaticFetcher::insert`]
    pub fn with(self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.insert(url, body);
        self
    }

    /// Add or replace the response for `url`
    ///
    /// A poisoned lock is recovered; the map holds plain data only.
    pub fn insert(&self, url: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.responses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.into(), body.into());
    }

    /// Number of fetches served or refused so far
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        let responses = self.responses.read().unwrap_or_else(PoisonError::into_inner);

        responses
            .get(url)
            .cloned()
            .ok_or_else(|| SourceError::Network(format!("no response for {}", url)))
    }
}
