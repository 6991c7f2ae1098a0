//! Lazily loaded term catalog and relevance ranking
//!
//! A catalog is `Unloaded` until the first search, then holds the full term
//! list, sorted by label, for the life of the source (or until cleared).
//!
//! # Ranking
//! Comparisons are case-insensitive. A term matches when its label contains
//! the pattern (+1) or its termid equals the pattern (+4). Matching terms
//! get +1 when the label starts with the pattern and +1 more when the label
//! equals it. Results are ordered by score (highest first), then label,
//! then description.

use crate::error::SourceError;
use crate::types::SourceTerm;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

const SCORE_LABEL_CONTAINS: u32 = 1;
const SCORE_TERMID_EQUALS: u32 = 4;
const SCORE_LABEL_STARTS_WITH: u32 = 1;
const SCORE_LABEL_EQUALS: u32 = 1;

/// A cached term with its lower-cased match keys
#[derive(Debug)]
struct Entry {
    term: SourceTerm,
    label_lower: String,
    termid_lower: String,
}

#[derive(Debug, Default)]
enum CatalogState {
    #[default]
    Unloaded,
    Loaded(Arc<Vec<Entry>>),
}

/// Per-source term cache with ranked search
#[derive(Debug, Default)]
pub struct Catalog {
    state: RwLock<CatalogState>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_loaded(&self) -> bool {
        matches!(*self.state.read().await, CatalogState::Loaded(_))
    }

    /// Back to `Unloaded`; the next search calls the loader again
    pub async fn clear(&self) {
        *self.state.write().await = CatalogState::Unloaded;
    }

    /// Ranked search, loading the catalog with `load` on first use
    ///
    /// An empty pattern returns the whole catalog in label order, unscored.
    pub async fn search<F, Fut>(&self, pattern: &str, load: F) -> Result<Vec<SourceTerm>, SourceError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<SourceTerm>, SourceError>>,
    {
        let entries = self.entries(load).await?;
        Ok(rank_entries(&entries, pattern))
    }

    async fn entries<F, Fut>(&self, load: F) -> Result<Arc<Vec<Entry>>, SourceError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<SourceTerm>, SourceError>>,
    {
        if let CatalogState::Loaded(entries) = &*self.state.read().await {
            return Ok(Arc::clone(entries));
        }

        let mut state = self.state.write().await;
        // another caller may have loaded while we waited for the write lock
        if let CatalogState::Loaded(entries) = &*state {
            return Ok(Arc::clone(entries));
        }

        let mut terms = load().await?;
        terms.sort_by(|a, b| a.label.cmp(&b.label));

        let entries: Vec<Entry> = terms
            .into_iter()
            .map(|term| Entry {
                label_lower: term.label.to_lowercase(),
                termid_lower: term.termid.to_lowercase(),
                term,
            })
            .collect();
        debug!(terms = entries.len(), "Catalog loaded");

        let entries = Arc::new(entries);
        *state = CatalogState::Loaded(Arc::clone(&entries));

        Ok(entries)
    }
}

/// Rank an arbitrary term list against `pattern`
///
/// Same rules as [`Catalog::search`], without caching or pre-sorting.
pub fn rank(terms: &[SourceTerm], pattern: &str) -> Vec<SourceTerm> {
    let entries: Vec<Entry> = terms
        .iter()
        .map(|term| Entry {
            term: term.clone(),
            label_lower: term.label.to_lowercase(),
            termid_lower: term.termid.to_lowercase(),
        })
        .collect();

    rank_entries(&entries, pattern)
}

fn rank_entries(entries: &[Entry], pattern: &str) -> Vec<SourceTerm> {
    let pattern = pattern.to_lowercase();

    if pattern.is_empty() {
        return entries.iter().map(|entry| entry.term.clone()).collect();
    }

    let mut ranked: Vec<SourceTerm> = entries
        .iter()
        .filter_map(|entry| {
            let score = score(entry, &pattern);
            (score > 0).then(|| SourceTerm {
                score: Some(score),
                ..entry.term.clone()
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.label.cmp(&b.label))
            .then_with(|| a.description().cmp(b.description()))
    });

    ranked
}

fn score(entry: &Entry, pattern: &str) -> u32 {
    let mut score = 0;

    if entry.label_lower.contains(pattern) {
        score += SCORE_LABEL_CONTAINS;
    }
    if entry.termid_lower == pattern {
        score += SCORE_TERMID_EQUALS;
    }

    if score > 0 {
        if entry.label_lower.starts_with(pattern) {
            score += SCORE_LABEL_STARTS_WITH;
        }
        if entry.label_lower == pattern {
            score += SCORE_LABEL_EQUALS;
        }
    }

    score
}
