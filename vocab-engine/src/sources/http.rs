//! Remote search API source
//!
//! One request per search: the pattern is percent-encoded into the url
//! template at `{pattern}`, the JSON response is mapped to terms by a
//! per-source parser. Patterns shorter than the minimum length return
//! nothing without a request.

use crate::error::SourceError;
use crate::fetch::Fetcher;
use crate::types::{SourceContext, SourceKind, SourceMetadata, SourceTerm, TermSource};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Maps a decoded JSON response to terms
pub type ResponseParser = fn(Value) -> Result<Vec<SourceTerm>, SourceError>;

/// Placeholder replaced by the search pattern
pub const PATTERN_PLACEHOLDER: &str = "{pattern}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSourceConfig {
    /// Url with a `{pattern}` placeholder
    pub url: String,
    /// Minimum pattern length, in characters
    pub minimum_length: usize,
}

impl HttpSourceConfig {
    pub fn new(url: impl Into<String>, minimum_length: usize) -> Self {
        Self {
            url: url.into(),
            minimum_length,
        }
    }

    pub fn search_url(&self, pattern: &str) -> String {
        self.url
            .replace(PATTERN_PLACEHOLDER, &urlencoding::encode(pattern))
    }
}

pub struct HttpSource {
    metadata: SourceMetadata,
    config: HttpSourceConfig,
    fetcher: Arc<dyn Fetcher>,
    parse: ResponseParser,
}

impl HttpSource {
    pub fn new(
        metadata: SourceMetadata,
        config: HttpSourceConfig,
        context: &SourceContext,
        parse: ResponseParser,
    ) -> Self {
        Self {
            metadata,
            config,
            fetcher: Arc::clone(&context.fetcher),
            parse,
        }
    }

    pub fn config(&self) -> &HttpSourceConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl TermSource for HttpSource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Http
    }

    async fn search(&self, pattern: &str) -> Result<Vec<SourceTerm>, SourceError> {
        if pattern.chars().count() < self.config.minimum_length {
            return Ok(Vec::new());
        }

        let url = self.config.search_url(pattern);
        let content = self.fetcher.fetch(&url).await?;
        let text = String::from_utf8(content)
            .map_err(|e| SourceError::Parse(format!("response is not UTF-8: {}", e)))?;
        let response: Value = serde_json::from_str(&text)?;

        let terms = (self.parse)(response)?;
        debug!(prefix = %self.metadata.prefix, pattern = %pattern, matches = terms.len(), "Remote search");

        Ok(terms)
    }
}
