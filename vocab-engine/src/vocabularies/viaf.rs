//! VIAF identities, via the AutoSuggest API
//!
//! AutoSuggest does not always return what you want, e.g.
//! `AutoSuggest?query=london` favours people over the city.

use crate::error::SourceError;
use crate::sources::{HttpSource, HttpSourceConfig};
use crate::types::{SourceContext, SourceMetadata, SourceTerm, TermSource};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

pub const METADATA: SourceMetadata = SourceMetadata {
    prefix: "viaf",
    label: "VIAF",
    base_url: "http://viaf.org/viaf/",
    description: "VIAF (Virtual International Authority File) is an OCLC service, built in cooperation with national libraries and other partners, that virtually combines multiple LAM (Library Archives Museum) name authority files into a single name authority service.",
    concept: "wikidata:Q35120:entity",
};

pub const URL: &str = "http://www.viaf.org/viaf/AutoSuggest?query={pattern}";

#[derive(Debug, Deserialize)]
struct SuggestResponse {
    /// null when nothing matches
    #[serde(default)]
    result: Option<Vec<Suggestion>>,
}

#[derive(Debug, Deserialize)]
struct Suggestion {
    viafid: String,
    term: String,
}

pub fn source(context: &SourceContext) -> Arc<dyn TermSource> {
    Arc::new(HttpSource::new(METADATA, HttpSourceConfig::new(URL, 1), context, parse))
}

fn parse(response: Value) -> Result<Vec<SourceTerm>, SourceError> {
    let response: SuggestResponse = serde_json::from_value(response)?;
    Ok(response
        .result
        .unwrap_or_default()
        .into_iter()
        .map(|s| SourceTerm::new(s.viafid, s.term))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::StaticFetcher;
    use std::path::PathBuf;

    fn context(fetcher: StaticFetcher) -> SourceContext {
        SourceContext {
            data_root: PathBuf::from("."),
            fetcher: Arc::new(fetcher),
        }
    }

    #[tokio::test]
    async fn test_suggestions() {
        let fetcher = StaticFetcher::new().with(
            URL.replace("{pattern}", "tolkien"),
            r#"{"query": "tolkien", "result": [
                {"term": "Tolkien, J. R. R. (John Ronald Reuel), 1892-1973", "displayForm": "x", "nametype": "personal", "viafid": "95218067"}
            ]}"#,
        );

        let found = source(&context(fetcher)).search("tolkien").await.unwrap();
        assert_eq!(
            found,
            vec![SourceTerm::new("95218067", "Tolkien, J. R. R. (John Ronald Reuel), 1892-1973")]
        );
    }

    #[tokio::test]
    async fn test_null_result_is_no_match() {
        let fetcher = StaticFetcher::new().with(
            URL.replace("{pattern}", "zzzzqx"),
            r#"{"query": "zzzzqx", "result": null}"#,
        );

        let found = source(&context(fetcher)).search("zzzzqx").await.unwrap();
        assert!(found.is_empty());
    }
}
