//! Core types and the term source contract
//!
//! Every vocabulary plugin implements [`TermSource`]: static identity
//! metadata plus a `search(pattern)` returning candidate terms. The three
//! variants (list, file, HTTP) live in [`crate::sources`].

use crate::error::SourceError;
use crate::fetch::Fetcher;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use vocab_common::db::NewVocabulary;

/// A candidate term returned by a source search
///
/// Transient: only the resolver turns candidates into stored terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceTerm {
    /// Source-local identifier
    pub termid: String,
    /// Display label
    pub label: String,
    pub description: Option<String>,
    /// Relevance score, set by ranked list searches only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

impl SourceTerm {
    pub fn new(termid: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            termid: termid.into(),
            label: label.into(),
            description: None,
            score: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Description, empty when absent
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Term tuple: `[termid, label]` or `[termid, label, description]`
    pub fn wire(&self) -> Vec<&str> {
        let mut tuple = vec![self.termid.as_str(), self.label.as_str()];
        if let Some(description) = &self.description {
            tuple.push(description);
        }
        tuple
    }
}

/// Static identity of a term source, seed data for its vocabulary record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMetadata {
    /// Standard prefix for this vocabulary, see http://prefix.cc
    pub prefix: &'static str,
    pub label: &'static str,
    /// Base URL of every term URI in this vocabulary
    pub base_url: &'static str,
    pub description: &'static str,
    /// Concept code characterising the terms, e.g. `wikidata:Q34770:language`
    pub concept: &'static str,
}

impl SourceMetadata {
    /// Vocabulary record fields
    pub fn to_record(&self) -> NewVocabulary {
        NewVocabulary {
            prefix: self.prefix.to_string(),
            label: self.label.to_string(),
            base_url: self.base_url.to_string(),
            description: self.description.to_string(),
            concept: self.concept.to_string(),
        }
    }
}

/// How a source obtains its terms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Built-in list
    List,
    /// Downloaded delimited file
    File,
    /// Remote search API
    Http,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::List => "list",
            SourceKind::File => "file",
            SourceKind::Http => "http",
        };
        f.write_str(name)
    }
}

/// Outcome of a file source download
///
/// `size == 0` means the download failed; the caller decides whether that is fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    pub url: String,
    /// Final (processed) file path
    pub path: PathBuf,
    pub size: u64,
    /// True when bytes were fetched by this call
    pub downloaded: bool,
}

/// Shared resources handed to source constructors
#[derive(Clone)]
pub struct SourceContext {
    /// Directory for downloaded vocabulary files
    pub data_root: PathBuf,
    pub fetcher: Arc<dyn Fetcher>,
}

/// Vocabulary plugin contract
///
/// Searches distinguish "no matches" (empty list) from "source
/// unavailable" (error).
#[async_trait::async_trait]
pub trait TermSource: Send + Sync {
    fn metadata(&self) -> &SourceMetadata;

    fn kind(&self) -> SourceKind;

    fn prefix(&self) -> &'static str {
        self.metadata().prefix
    }

    /// Candidate terms for `pattern`, most relevant first
    async fn search(&self, pattern: &str) -> Result<Vec<SourceTerm>, SourceError>;

    /// Fetch the source's data file; `None` for sources without one
    async fn download(&self, _overwrite: bool) -> Result<Option<DownloadReport>, SourceError> {
        Ok(None)
    }

    /// Drop cached terms so the next search reloads them
    async fn clear_cache(&self) {}
}
