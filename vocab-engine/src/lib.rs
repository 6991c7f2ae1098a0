//! # Controlled Vocabulary Engine
//!
//! Looks up terms of controlled vocabularies (language codes, DCMI types,
//! FAST topics, Wikidata entities, ...) through one [`TermSource`] contract,
//! and caches resolved terms in the local store.
//!
//! - [`sources`]: list, file and HTTP source variants
//! - [`vocabularies`]: the built-in sources
//! - [`registry`]: prefix -> source mapping built at startup
//! - [`resolver`]: store-first resolution with get-or-create caching

pub mod config;
pub mod error;
pub mod fetch;
pub mod registry;
pub mod resolver;
pub mod sources;
pub mod types;
pub mod vocabularies;

pub use config::Settings;
pub use error::{ResolveError, ResolveResult, SourceError};
pub use fetch::{Fetcher, HttpFetcher, StaticFetcher};
pub use registry::{Registry, RegistryBuilder};
pub use resolver::Resolver;
pub use types::{DownloadReport, SourceContext, SourceKind, SourceMetadata, SourceTerm, TermSource};

use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::info;
use vocab_common::db::init_database;

/// Database pool, frozen registry and settings shared by every command
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub registry: Arc<Registry>,
    pub settings: Settings,
}

impl AppState {
    pub fn new(db: SqlitePool, registry: Arc<Registry>, settings: Settings) -> Self {
        Self { db, registry, settings }
    }

    /// Open the database and build the registry with the HTTP transport
    pub async fn bootstrap(settings: Settings) -> anyhow::Result<Self> {
        let fetcher = HttpFetcher::new(&settings.user_agent, settings.http_timeout)?;
        Self::bootstrap_with(settings, Arc::new(fetcher)).await
    }

    /// Open the database and build the registry with the given transport
    ///
    /// Vocabulary records are synchronised with the registry on every start.
    pub async fn bootstrap_with(settings: Settings, fetcher: Arc<dyn Fetcher>) -> anyhow::Result<Self> {
        info!("Database path: {}", settings.database_path.display());
        let db = init_database(&settings.database_path).await?;

        let context = SourceContext {
            data_root: settings.data_root.clone(),
            fetcher,
        };
        let registry = Registry::from_identifiers(settings.vocabularies.as_slice(), &context)?;
        registry.sync_vocabulary_records(&db).await?;

        Ok(Self::new(db, registry, settings))
    }

    pub fn resolver(&self) -> Resolver {
        Resolver::new(self.db.clone(), Arc::clone(&self.registry))
    }
}
