//! Integration tests for term resolution against a file-backed database

mod helpers;

use helpers::{create_test_state, languages_fetcher, wikidata_url, LANGUAGES};
use std::sync::Arc;
use tokio::task::JoinSet;
use vocab_common::db::{count_terms, get_vocabulary_by_prefix, update_or_create_vocabulary, NewVocabulary};
use vocab_engine::vocabularies::iso639_2;
use vocab_engine::{ResolveError, SourceError, StaticFetcher};

#[tokio::test]
async fn test_resolution_ignores_case() {
    let (_dir, state) = create_test_state(languages_fetcher()).await;
    let resolver = state.resolver();

    let upper = resolver.search_term("iso639-2", "GERMAN", false).await.unwrap().unwrap();
    let lower = resolver.search_term("iso639-2", "german", false).await.unwrap().unwrap();

    assert_eq!(upper.guid, lower.guid);
    assert_eq!(upper.termid, "ger");
    assert_eq!(upper.label, "German");
    assert_eq!(upper.description, "B");
    assert_eq!(count_terms(&state.db, "iso639-2").await.unwrap(), 1);
}

#[tokio::test]
async fn test_termid_lookup() {
    let (_dir, state) = create_test_state(languages_fetcher()).await;

    let term = state
        .resolver()
        .search_term("iso639-2", "deu", false)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(term.termid, "deu");
    assert_eq!(term.absolute_id(), "iso639-2:deu");
}

#[tokio::test]
async fn test_partial_pattern_prefers_label_prefix() {
    let (_dir, state) = create_test_state(languages_fetcher()).await;

    // "Swiss German" contains the pattern, "German" starts with it
    let term = state
        .resolver()
        .search_term("iso639-2", "germ", false)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(term.termid, "ger");
}

#[tokio::test]
async fn test_exact_mode_requires_equality() {
    let (_dir, state) = create_test_state(languages_fetcher()).await;
    let resolver = state.resolver();

    assert!(resolver.search_term("iso639-2", "germ", true).await.unwrap().is_none());
    assert_eq!(count_terms(&state.db, "iso639-2").await.unwrap(), 0);

    let exact = resolver.search_term("iso639-2", "Swiss German; Alemannic; Alsatian", true).await.unwrap();
    assert_eq!(exact.unwrap().termid, "gsw");
}

#[tokio::test]
async fn test_unregistered_prefix() {
    let (_dir, state) = create_test_state(languages_fetcher()).await;
    let resolver = state.resolver();

    let lenient = resolver
        .search_term_or_none(Some("does-not-exist"), Some("x"), false)
        .await
        .unwrap();
    assert!(lenient.is_none());

    let strict = resolver.search_term("does-not-exist", "x", false).await.unwrap_err();
    assert!(matches!(strict, ResolveError::VocabularyNotFound(ref prefix) if prefix == "does-not-exist"));
    assert!(strict.is_not_found());
}

#[tokio::test]
async fn test_vocabulary_without_source() {
    let (_dir, state) = create_test_state(languages_fetcher()).await;
    update_or_create_vocabulary(
        &state.db,
        &NewVocabulary {
            prefix: "orphan".to_string(),
            label: "Orphan".to_string(),
            base_url: String::new(),
            description: String::new(),
            concept: String::new(),
        },
    )
    .await
    .unwrap();
    let resolver = state.resolver();

    let err = resolver.search_term("orphan", "x", false).await.unwrap_err();
    assert!(matches!(err, ResolveError::SourceNotRegistered(_)));

    assert!(resolver
        .search_term_or_none(Some("orphan"), Some("x"), false)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_empty_arguments_short_circuit() {
    let fetcher = languages_fetcher();
    let (_dir, state) = create_test_state(Arc::clone(&fetcher)).await;
    let resolver = state.resolver();

    assert!(resolver.search_term_or_none(None, Some("german"), false).await.unwrap().is_none());
    assert!(resolver.search_term_or_none(Some("iso639-2"), None, false).await.unwrap().is_none());
    assert!(resolver.search_term_or_none(Some(""), Some("german"), false).await.unwrap().is_none());
    assert!(resolver.search_term_or_none(Some("iso639-2"), Some(""), false).await.unwrap().is_none());
    assert_eq!(fetcher.requests(), 0);
}

#[tokio::test]
async fn test_stored_term_is_not_overwritten() {
    let fetcher = Arc::new(
        StaticFetcher::new()
            .with(
                wikidata_url("douglas adams"),
                r#"{"search": [{"id": "Q42", "label": "Douglas Adams", "description": "English writer"}]}"#,
            )
            .with(
                wikidata_url("adams"),
                r#"{"search": [{"id": "Q42", "label": "Adams, Douglas", "description": "changed"}]}"#,
            ),
    );
    let (_dir, state) = create_test_state(Arc::clone(&fetcher)).await;
    let resolver = state.resolver();

    let first = resolver.search_term("wikidata", "Douglas Adams", false).await.unwrap().unwrap();
    let second = resolver.search_term("wikidata", "adams", false).await.unwrap().unwrap();

    assert_eq!(first.guid, second.guid);
    assert_eq!(second.label, "Douglas Adams");
    assert_eq!(second.description, "English writer");
    assert_eq!(fetcher.requests(), 2);
}

#[tokio::test]
async fn test_stored_term_needs_no_remote_call() {
    let fetcher = Arc::new(StaticFetcher::new().with(
        wikidata_url("q42"),
        r#"{"search": [{"id": "Q42", "label": "Douglas Adams", "description": "English writer"}]}"#,
    ));
    let (_dir, state) = create_test_state(Arc::clone(&fetcher)).await;
    let resolver = state.resolver();

    resolver.search_term("wikidata", "Q42", false).await.unwrap().unwrap();
    assert_eq!(fetcher.requests(), 1);

    let by_label = resolver.search_term("wikidata", "DOUGLAS ADAMS", false).await.unwrap().unwrap();
    let by_id = resolver.search_term("wikidata", "q42", true).await.unwrap().unwrap();

    assert_eq!(by_label.guid, by_id.guid);
    assert_eq!(fetcher.requests(), 1);
}

#[tokio::test]
async fn test_stored_non_ascii_label_needs_no_remote_call() {
    let fetcher = Arc::new(StaticFetcher::new().with(
        wikidata_url("österreich"),
        r#"{"search": [{"id": "Q40", "label": "Österreich", "description": "country in Central Europe"}]}"#,
    ));
    let (_dir, state) = create_test_state(Arc::clone(&fetcher)).await;
    let resolver = state.resolver();

    let first = resolver.search_term("wikidata", "österreich", false).await.unwrap().unwrap();
    assert_eq!(first.label, "Österreich");
    assert_eq!(fetcher.requests(), 1);

    let lower = resolver.search_term("wikidata", "österreich", false).await.unwrap().unwrap();
    let upper = resolver.search_term("wikidata", "ÖSTERREICH", true).await.unwrap().unwrap();

    assert_eq!(lower.guid, first.guid);
    assert_eq!(upper.guid, first.guid);
    assert_eq!(fetcher.requests(), 1);
}

#[tokio::test]
async fn test_absolute_url_uses_vocabulary_base() {
    let (_dir, state) = create_test_state(languages_fetcher()).await;

    let term = state
        .resolver()
        .search_term("iso639-2", "english", false)
        .await
        .unwrap()
        .unwrap();
    let vocabulary = get_vocabulary_by_prefix(&state.db, "iso639-2").await.unwrap().unwrap();

    assert_eq!(
        term.absolute_url(&vocabulary, &state.settings.local_base_url),
        "http://id.loc.gov/vocabulary/iso639-2/eng"
    );
}

#[tokio::test]
async fn test_source_failure_is_not_a_miss() {
    // no canned response: the remote search fails
    let (_dir, state) = create_test_state(languages_fetcher()).await;
    let resolver = state.resolver();

    let strict = resolver.search_term("wikidata", "nobody", false).await.unwrap_err();
    assert!(matches!(strict, ResolveError::Source { ref source, .. } if source.is_unavailable()));

    let lenient = resolver.search_term_or_none(Some("wikidata"), Some("nobody"), false).await;
    assert!(lenient.is_err());
}

#[tokio::test]
async fn test_empty_download_fails_search() {
    let fetcher = Arc::new(StaticFetcher::new().with(iso639_2::URL, Vec::<u8>::new()));
    let (_dir, state) = create_test_state(fetcher).await;

    let err = state
        .resolver()
        .search_term("iso639-2", "german", false)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ResolveError::Source {
            source: SourceError::DownloadFailed { .. },
            ..
        }
    ));
}

#[tokio::test]
async fn test_concurrent_resolution_creates_one_term() {
    let fetcher = Arc::new(StaticFetcher::new().with(iso639_2::URL, LANGUAGES));
    let (_dir, state) = create_test_state(fetcher).await;
    let resolver = state.resolver();

    let mut join_set = JoinSet::new();
    for _ in 0..10 {
        let resolver = resolver.clone();
        join_set.spawn(async move { resolver.search_term("iso639-2", "french", false).await });
    }

    let mut guids = Vec::new();
    while let Some(result) = join_set.join_next().await {
        let term = result.unwrap().unwrap().unwrap();
        assert_eq!(term.termid, "fre");
        guids.push(term.guid);
    }

    assert_eq!(guids.len(), 10);
    assert!(guids.iter().all(|guid| *guid == guids[0]));
    assert_eq!(count_terms(&state.db, "iso639-2").await.unwrap(), 1);
}

#[tokio::test]
async fn test_suggest() {
    let (_dir, state) = create_test_state(languages_fetcher()).await;
    let resolver = state.resolver();

    let ranked = resolver.suggest("iso639-2", "german").await.unwrap();
    let ids: Vec<&str> = ranked.iter().map(|t| t.termid.as_str()).collect();
    assert_eq!(ids, vec!["ger", "deu", "gmh", "gem", "gsw"]);

    // nothing stored by suggestions
    assert_eq!(count_terms(&state.db, "iso639-2").await.unwrap(), 0);

    let err = resolver.suggest("does-not-exist", "x").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_suggest_falls_back_to_stored_terms() {
    let (_dir, state) = create_test_state(languages_fetcher()).await;
    let resolver = state.resolver();

    update_or_create_vocabulary(
        &state.db,
        &NewVocabulary {
            prefix: "local".to_string(),
            label: "Local".to_string(),
            base_url: String::new(),
            description: String::new(),
            concept: String::new(),
        },
    )
    .await
    .unwrap();
    vocab_common::db::get_or_create_term_from_code(&state.db, "local:t1:Local Term")
        .await
        .unwrap();
    vocab_common::db::get_or_create_term_from_code(&state.db, "local:t2:Other")
        .await
        .unwrap();

    let found = resolver.suggest("local", "TERM").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].wire(), vec!["t1", "Local Term"]);
}
