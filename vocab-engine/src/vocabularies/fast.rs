//! FAST (Faceted Application of Subject Terminology) suggest API
//!
//! Topics and Genre/Forms share the endpoint and differ in the suggest
//! index queried. Document ids look like `fst00809209`; the termid is the
//! number without leading zeros.
//! See https://www.oclc.org/developer/develop/web-services/fast-api/linked-data.en.html

use crate::error::SourceError;
use crate::sources::{HttpSource, HttpSourceConfig};
use crate::types::{SourceContext, SourceMetadata, SourceTerm, TermSource};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

pub const TOPIC_METADATA: SourceMetadata = SourceMetadata {
    prefix: "fast-topic",
    label: "FAST Topic",
    base_url: "http://id.worldcat.org/fast/",
    description: "Topic list from the Faceted Application of Subject Terminology",
    concept: "wikidata:P921:topic",
};

pub const FORMS_METADATA: SourceMetadata = SourceMetadata {
    prefix: "fast-forms",
    label: "FAST Forms",
    base_url: "http://id.worldcat.org/fast/",
    description: "Genre and Forms list from the Faceted Application of Subject Terminology",
    concept: "wikidata:Q483394:genre",
};

pub const TOPIC_URL: &str = "https://fast.oclc.org/searchfast/fastsuggest?&query={pattern}&queryIndex=suggest50&queryReturn=suggest50,id&sort=usage desc&suggest=fastSuggest";

pub const FORMS_URL: &str = "https://fast.oclc.org/searchfast/fastsuggest?&query={pattern}&queryIndex=suggest55&queryReturn=suggest55,id&sort=usage desc&suggest=fastSuggest";

static FAST_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new("[1-9][0-9]+").expect("valid FAST id regex"));

#[derive(Debug, Deserialize)]
struct SuggestResponse<D> {
    response: SuggestDocs<D>,
}

#[derive(Debug, Deserialize)]
struct SuggestDocs<D> {
    #[serde(default = "Vec::new")]
    docs: Vec<D>,
}

#[derive(Debug, Deserialize)]
struct TopicDoc {
    id: String,
    suggest50: String,
}

#[derive(Debug, Deserialize)]
struct FormsDoc {
    id: String,
    suggest55: String,
}

pub fn topic_source(context: &SourceContext) -> Arc<dyn TermSource> {
    Arc::new(HttpSource::new(
        TOPIC_METADATA,
        HttpSourceConfig::new(TOPIC_URL, 2),
        context,
        parse_topics,
    ))
}

pub fn forms_source(context: &SourceContext) -> Arc<dyn TermSource> {
    Arc::new(HttpSource::new(
        FORMS_METADATA,
        HttpSourceConfig::new(FORMS_URL, 1),
        context,
        parse_forms,
    ))
}

/// `fst00809209_4.1` -> `809209`; ids without a number are kept as is
pub fn clean_id(fast_id: &str) -> String {
    FAST_NUMBER
        .find(fast_id)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| fast_id.to_string())
}

fn docs<D: DeserializeOwned>(response: Value) -> Result<Vec<D>, SourceError> {
    let response: SuggestResponse<D> = serde_json::from_value(response)?;
    Ok(response.response.docs)
}

fn parse_topics(response: Value) -> Result<Vec<SourceTerm>, SourceError> {
    Ok(docs::<TopicDoc>(response)?
        .into_iter()
        .map(|doc| SourceTerm::new(clean_id(&doc.id), doc.suggest50))
        .collect())
}

fn parse_forms(response: Value) -> Result<Vec<SourceTerm>, SourceError> {
    Ok(docs::<FormsDoc>(response)?
        .into_iter()
        .map(|doc| SourceTerm::new(clean_id(&doc.id), doc.suggest55))
        .collect())
}
