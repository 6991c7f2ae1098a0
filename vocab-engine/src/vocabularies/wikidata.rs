//! Wikidata entities, via `wbsearchentities`

use crate::error::SourceError;
use crate::sources::{HttpSource, HttpSourceConfig};
use crate::types::{SourceContext, SourceMetadata, SourceTerm, TermSource};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

pub const METADATA: SourceMetadata = SourceMetadata {
    prefix: "wikidata",
    label: "Wikidata",
    base_url: "http://www.wikidata.org/entity/",
    description: "Collaboratively edited multilingual knowledge graph",
    concept: "wikidata:Q35120:entity",
};

pub const URL: &str =
    "https://www.wikidata.org/w/api.php?action=wbsearchentities&language=en&format=json&search={pattern}";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    search: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    id: String,
    label: String,
    #[serde(default)]
    description: String,
}

pub fn source(context: &SourceContext) -> Arc<dyn TermSource> {
    Arc::new(HttpSource::new(METADATA, HttpSourceConfig::new(URL, 1), context, parse))
}

fn parse(response: Value) -> Result<Vec<SourceTerm>, SourceError> {
    let response: SearchResponse = serde_json::from_value(response)?;
    Ok(response
        .search
        .into_iter()
        .map(|hit| SourceTerm::new(hit.id, hit.label).with_description(hit.description))
        .collect())
}
