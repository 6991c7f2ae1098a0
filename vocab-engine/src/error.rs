//! Error types for the vocabulary engine
//!
//! Absence of a match is never an error: searches return empty lists and
//! resolution returns `None`. Only infrastructure failures (network, disk,
//! bad configuration or data) and unknown vocabularies surface here.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a term source to answer a search or download
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Download failed: {url}")]
    DownloadFailed { url: String },

    #[error("No file in archive matches '{0}'")]
    ArchiveNoMatch(String),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Vocabulary file not found: {0}")]
    MissingCatalog(PathBuf),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl SourceError {
    /// Remote source unreachable or refusing; worth retrying later
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            SourceError::Network(_) | SourceError::Api(..) | SourceError::DownloadFailed { .. }
        )
    }

    /// Source data or configuration is unusable
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            SourceError::ArchiveNoMatch(_)
                | SourceError::Archive(_)
                | SourceError::MissingCatalog(_)
                | SourceError::Parse(_)
                | SourceError::Csv(_)
        )
    }
}

impl From<zip::result::ZipError> for SourceError {
    fn from(err: zip::result::ZipError) -> Self {
        SourceError::Archive(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(err.to_string())
    }
}

impl From<tokio::task::JoinError> for SourceError {
    fn from(err: tokio::task::JoinError) -> Self {
        SourceError::Task(err.to_string())
    }
}

/// Failure of term resolution
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No vocabulary record with this prefix
    #[error("Vocabulary not found: {0}")]
    VocabularyNotFound(String),

    /// Vocabulary record exists but no term source serves it
    #[error("No term source registered for vocabulary: {0}")]
    SourceNotRegistered(String),

    #[error("Source error for '{prefix}': {source}")]
    Source {
        prefix: String,
        #[source]
        source: SourceError,
    },

    #[error(transparent)]
    Store(#[from] vocab_common::Error),
}

impl ResolveError {
    /// The prefix does not name a usable vocabulary
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ResolveError::VocabularyNotFound(_) | ResolveError::SourceNotRegistered(_)
        )
    }
}

pub type ResolveResult<T> = Result<T, ResolveError>;
