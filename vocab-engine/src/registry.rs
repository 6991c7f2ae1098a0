//! Vocabulary registry: prefix -> term source
//!
//! Built once at startup from an ordered list of source identifiers (the
//! vocabulary prefixes), then frozen behind an `Arc` and only read.
//! Custom sources can be added with [`RegistryBuilder::register`].

use crate::types::{SourceContext, TermSource};
use crate::vocabularies::{dcmitype, fast, iso15924, iso639_2, mime, schema, viaf, wikidata};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};
use vocab_common::db::{get_or_create_term_from_code, update_or_create_vocabulary, Vocabulary};
use vocab_common::{Error, Result};

/// Builds a source from the shared context
pub type SourceConstructor = fn(&SourceContext) -> Arc<dyn TermSource>;

/// Every built-in source, by identifier
pub const BUILTIN_SOURCES: &[(&str, SourceConstructor)] = &[
    ("iso639-2", iso639_2::source),
    ("dcmitype", dcmitype::source),
    ("schema", schema::source),
    ("mime", mime::source),
    ("fast-topic", fast::topic_source),
    ("fast-forms", fast::forms_source),
    ("wikidata", wikidata::source),
    ("viaf", viaf::source),
    ("iso15924", iso15924::source),
];

/// Sources registered when the configuration does not list any
pub const DEFAULT_VOCABULARIES: &[&str] = &[
    "iso639-2",
    "dcmitype",
    "schema",
    "mime",
    "fast-topic",
    "fast-forms",
    "wikidata",
    "viaf",
    "iso15924",
];

/// Constructor of a built-in source
pub fn builtin_constructor(identifier: &str) -> Option<SourceConstructor> {
    BUILTIN_SOURCES
        .iter()
        .find(|(id, _)| *id == identifier)
        .map(|(_, constructor)| *constructor)
}

/// Collects sources before the registry is frozen
#[derive(Default)]
pub struct RegistryBuilder {
    sources: Vec<Arc<dyn TermSource>>,
}

impl RegistryBuilder {
    /// Add a source; a later source with the same prefix replaces the earlier one in place
    pub fn register(mut self, source: Arc<dyn TermSource>) -> Self {
        match self.sources.iter().position(|s| s.prefix() == source.prefix()) {
            Some(index) => self.sources[index] = source,
            None => self.sources.push(source),
        }
        self
    }

    /// Add the built-in sources named by `identifiers`, in order
    pub fn register_builtins<S: AsRef<str>>(
        mut self,
        identifiers: &[S],
        context: &SourceContext,
    ) -> Result<Self> {
        for identifier in identifiers {
            let identifier = identifier.as_ref();
            let constructor = builtin_constructor(identifier)
                .ok_or_else(|| Error::Config(format!("Unknown vocabulary source: {}", identifier)))?;
            self = self.register(constructor(context));
        }
        Ok(self)
    }

    pub fn build(self) -> Arc<Registry> {
        let index = self
            .sources
            .iter()
            .enumerate()
            .map(|(i, source)| (source.prefix().to_string(), i))
            .collect();

        Arc::new(Registry {
            sources: self.sources,
            index,
        })
    }
}

/// Frozen prefix -> source mapping, in registration order
pub struct Registry {
    sources: Vec<Arc<dyn TermSource>>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registry of the built-in sources named by `identifiers`
    ///
    /// An unknown identifier is a configuration error.
    pub fn from_identifiers<S: AsRef<str>>(identifiers: &[S], context: &SourceContext) -> Result<Arc<Self>> {
        let registry = Self::builder().register_builtins(identifiers, context)?.build();
        info!(sources = registry.len(), "Vocabulary registry built");
        Ok(registry)
    }

    pub fn get(&self, prefix: &str) -> Option<Arc<dyn TermSource>> {
        self.index.get(prefix).map(|&i| Arc::clone(&self.sources[i]))
    }

    pub fn contains(&self, prefix: &str) -> bool {
        self.index.contains_key(prefix)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn TermSource>> {
        self.sources.iter()
    }

    pub fn prefixes(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.prefix()).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Sources whose prefix is in `prefixes`, in registration order; all sources when empty
    pub fn select<S: AsRef<str>>(&self, prefixes: &[S]) -> Vec<Arc<dyn TermSource>> {
        self.sources
            .iter()
            .filter(|source| prefixes.is_empty() || prefixes.iter().any(|p| p.as_ref() == source.prefix()))
            .cloned()
            .collect()
    }

    /// Write one vocabulary record per registered source
    ///
    /// Metadata of existing records is overwritten. Each source's concept
    /// code is then materialised as a term, e.g. `wikidata:Q34770:language`.
    pub async fn sync_vocabulary_records(&self, pool: &SqlitePool) -> Result<Vec<Vocabulary>> {
        let mut vocabularies = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            let metadata = source.metadata();
            let vocabulary = update_or_create_vocabulary(pool, &metadata.to_record()).await?;

            if get_or_create_term_from_code(pool, metadata.concept).await?.is_some() {
                debug!(prefix = %metadata.prefix, concept = %metadata.concept, "Concept term ready");
            }

            vocabularies.push(vocabulary);
        }

        info!(count = vocabularies.len(), "Vocabulary records synchronised");

        Ok(vocabularies)
    }
}
