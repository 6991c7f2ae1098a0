//! Test Helper Utilities
//!
//! Offline fixtures: canned source responses served by a `StaticFetcher`
//! and application state on a temporary data root.

#![allow(dead_code)]

use std::sync::Arc;
use tempfile::TempDir;
use vocab_engine::vocabularies::{iso639_2, wikidata};
use vocab_engine::{AppState, Settings, StaticFetcher};

/// Excerpt of the ISO 639-2 code list
pub const LANGUAGES: &str = "\
eng||en|English|anglais
fre|fra|fr|French|français
ger|deu|de|German|allemand
gem|||Germanic languages|germaniques, langues
gmh|||German, Middle High (ca.1050-1500)|allemand, moyen haut (ca. 1050-1500)
gsw|||Swiss German; Alemannic; Alsatian|suisse alémanique; alémanique; alsacien
";

/// Wikidata search url for an already lower-cased pattern
pub fn wikidata_url(pattern: &str) -> String {
    wikidata::URL.replace("{pattern}", &urlencoding::encode(pattern))
}

/// Fetcher serving the language list and no remote searches
pub fn languages_fetcher() -> Arc<StaticFetcher> {
    Arc::new(StaticFetcher::new().with(iso639_2::URL, LANGUAGES))
}

/// State on a temporary data root with iso639-2, dcmitype and wikidata registered
///
/// TempDir must be kept alive for the duration of the test.
pub async fn create_test_state(fetcher: Arc<StaticFetcher>) -> (TempDir, AppState) {
    let temp_dir = TempDir::new().unwrap();

    let mut settings = Settings::for_data_root(temp_dir.path());
    settings.vocabularies = vec![
        "iso639-2".to_string(),
        "dcmitype".to_string(),
        "wikidata".to_string(),
    ];

    let state = AppState::bootstrap_with(settings, fetcher).await.unwrap();

    (temp_dir, state)
}
