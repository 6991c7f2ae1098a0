//! In-memory list source

use super::catalog::Catalog;
use crate::error::SourceError;
use crate::types::{SourceKind, SourceMetadata, SourceTerm, TermSource};
use tracing::debug;

/// Supplies the full term list on first search
pub type TermsLoader = Box<dyn Fn() -> Vec<SourceTerm> + Send + Sync>;

/// Source searching a fixed, built-in term list
pub struct ListSource {
    metadata: SourceMetadata,
    terms: TermsLoader,
    catalog: Catalog,
}

impl ListSource {
    pub fn new<F>(metadata: SourceMetadata, terms: F) -> Self
    where
        F: Fn() -> Vec<SourceTerm> + Send + Sync + 'static,
    {
        Self {
            metadata,
            terms: Box::new(terms),
            catalog: Catalog::new(),
        }
    }

    /// Source over an owned term list
    pub fn from_terms(metadata: SourceMetadata, terms: Vec<SourceTerm>) -> Self {
        Self::new(metadata, move || terms.clone())
    }
}

#[async_trait::async_trait]
impl TermSource for ListSource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    fn kind(&self) -> SourceKind {
        SourceKind::List
    }

    async fn search(&self, pattern: &str) -> Result<Vec<SourceTerm>, SourceError> {
        let terms = self
            .catalog
            .search(pattern, || async {
                debug!(prefix = %self.metadata.prefix, "Loading built-in term list");
                Ok((self.terms)())
            })
            .await?;

        debug!(prefix = %self.metadata.prefix, pattern = %pattern, matches = terms.len(), "List search");

        Ok(terms)
    }

    async fn clear_cache(&self) {
        self.catalog.clear().await;
    }
}
