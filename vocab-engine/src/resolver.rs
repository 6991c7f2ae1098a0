//! Term resolution: local store first, then the vocabulary's source
//!
//! # Resolution
//! 1. A stored term of the vocabulary whose termid or label equals the
//!    pattern (ignoring case) is returned without contacting the source.
//! 2. Otherwise the vocabulary record and its registered source are looked
//!    up; either missing is a not-found error.
//! 3. The source is searched with the lower-cased pattern and one candidate
//!    is selected:
//!    - exact: first candidate whose label or termid equals the pattern
//!    - otherwise: first candidate whose label or termid starts with the
//!      pattern, else the first candidate
//! 4. The selection is stored with get-or-create; an existing record keeps
//!    its label and description.

use crate::error::{ResolveError, ResolveResult};
use crate::registry::Registry;
use crate::types::{SourceTerm, TermSource};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{debug, info};
use vocab_common::db::{
    find_term_by_termid_or_label, get_or_create_term, get_vocabulary_by_prefix, search_local_terms,
    Term, Vocabulary,
};

/// Maximum local terms returned by [`Resolver::suggest`] for vocabularies without a source
pub const LOCAL_SUGGESTION_LIMIT: i64 = 50;

#[derive(Clone)]
pub struct Resolver {
    pool: SqlitePool,
    registry: Arc<Registry>,
}

impl Resolver {
    pub fn new(pool: SqlitePool, registry: Arc<Registry>) -> Self {
        Self { pool, registry }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Resolve `pattern` to a stored term of the `prefix` vocabulary
    ///
    /// `Ok(None)` when nothing matches. Unknown or source-less vocabularies
    /// are errors; see [`Resolver::search_term_or_none`] for the lenient form.
    pub async fn search_term(&self, prefix: &str, pattern: &str, exact: bool) -> ResolveResult<Option<Term>> {
        if let Some(term) = find_term_by_termid_or_label(&self.pool, prefix, pattern).await? {
            debug!(prefix = %prefix, pattern = %pattern, termid = %term.termid, "Term found in store");
            return Ok(Some(term));
        }

        let (vocabulary, source) = self.vocabulary_source(prefix).await?;
        let source = source.ok_or_else(|| ResolveError::SourceNotRegistered(prefix.to_string()))?;

        let pattern = pattern.to_lowercase();
        let candidates = source
            .search(&pattern)
            .await
            .map_err(|source| ResolveError::Source {
                prefix: prefix.to_string(),
                source,
            })?;

        let Some(selected) = select_candidate(&candidates, &pattern, exact) else {
            debug!(prefix = %prefix, pattern = %pattern, exact, candidates = candidates.len(), "No matching term");
            return Ok(None);
        };

        let (term, created) = get_or_create_term(
            &self.pool,
            &vocabulary,
            selected.termid.trim(),
            &selected.label,
            selected.description(),
        )
        .await?;

        if created {
            info!(prefix = %prefix, termid = %term.termid, label = %term.label, "Cached new term");
        }

        Ok(Some(term))
    }

    /// [`Resolver::search_term`] treating unknown vocabularies as no match
    ///
    /// A missing or empty prefix or pattern is no match. Source and store
    /// failures still propagate.
    pub async fn search_term_or_none(
        &self,
        prefix: Option<&str>,
        pattern: Option<&str>,
        exact: bool,
    ) -> ResolveResult<Option<Term>> {
        let (Some(prefix), Some(pattern)) = (prefix, pattern) else {
            return Ok(None);
        };
        if prefix.is_empty() || pattern.is_empty() {
            return Ok(None);
        }

        match self.search_term(prefix, pattern, exact).await {
            Err(err) if err.is_not_found() => {
                debug!(prefix = %prefix, error = %err, "Vocabulary unavailable for resolution");
                Ok(None)
            }
            other => other,
        }
    }

    /// Ranked candidates for autocompletion; nothing is stored
    ///
    /// Vocabularies without a registered source fall back to stored terms
    /// whose label contains the pattern.
    pub async fn suggest(&self, prefix: &str, pattern: &str) -> ResolveResult<Vec<SourceTerm>> {
        let (_, source) = self.vocabulary_source(prefix).await?;

        match source {
            Some(source) => source.search(pattern).await.map_err(|source| ResolveError::Source {
                prefix: prefix.to_string(),
                source,
            }),
            None => {
                let terms = search_local_terms(&self.pool, prefix, pattern, LOCAL_SUGGESTION_LIMIT).await?;
                Ok(terms.into_iter().map(to_candidate).collect())
            }
        }
    }

    async fn vocabulary_source(
        &self,
        prefix: &str,
    ) -> ResolveResult<(Vocabulary, Option<Arc<dyn TermSource>>)> {
        let vocabulary = get_vocabulary_by_prefix(&self.pool, prefix)
            .await?
            .ok_or_else(|| ResolveError::VocabularyNotFound(prefix.to_string()))?;

        Ok((vocabulary, self.registry.get(prefix)))
    }
}

/// Pick the candidate to store for `pattern`, in source order
pub fn select_candidate<'a>(candidates: &'a [SourceTerm], pattern: &str, exact: bool) -> Option<&'a SourceTerm> {
    let pattern = pattern.to_lowercase();

    if exact {
        return candidates
            .iter()
            .find(|c| c.label.to_lowercase() == pattern || c.termid.to_lowercase() == pattern);
    }

    candidates
        .iter()
        .find(|c| c.label.to_lowercase().starts_with(&pattern) || c.termid.to_lowercase().starts_with(&pattern))
        .or_else(|| candidates.first())
}

fn to_candidate(term: Term) -> SourceTerm {
    let candidate = SourceTerm::new(term.termid, term.label);
    if term.description.is_empty() {
        candidate
    } else {
        candidate.with_description(term.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<SourceTerm> {
        vec![
            SourceTerm::new("Q1", "Greater London"),
            SourceTerm::new("Q84", "London"),
            SourceTerm::new("Q92561", "London, Ontario"),
        ]
    }

    #[test]
    fn test_prefers_prefix_match_over_first() {
        let candidates = candidates();
        assert_eq!(select_candidate(&candidates, "lond", false).unwrap().termid, "Q84");
        assert_eq!(select_candidate(&candidates, "q9", false).unwrap().termid, "Q92561");
    }

    #[test]
    fn test_falls_back_to_first_candidate() {
        let candidates = candidates();
        assert_eq!(select_candidate(&candidates, "ontario", false).unwrap().termid, "Q1");
        assert!(select_candidate(&[], "ontario", false).is_none());
    }

    #[test]
    fn test_exact_requires_equality() {
        let candidates = candidates();
        assert_eq!(select_candidate(&candidates, "LONDON", true).unwrap().termid, "Q84");
        assert_eq!(select_candidate(&candidates, "q1", true).unwrap().termid, "Q1");
        assert!(select_candidate(&candidates, "lond", true).is_none());
    }
}
