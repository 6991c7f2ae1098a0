//! Schema.org types
//!
//! See https://schema.org/docs/developers.html#defs

use crate::sources::{FileSource, FileSourceConfig};
use crate::types::{SourceContext, SourceMetadata, SourceTerm, TermSource};
use csv::StringRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

pub const METADATA: SourceMetadata = SourceMetadata {
    prefix: "schema",
    label: "Schema.org",
    base_url: "http://schema.org/",
    description: "web page topics indexable by web search engines",
    concept: "wikidata:Q35120:entity",
};

/// `id,label,comment,subTypeOf,...`
pub const URL: &str = "https://schema.org/version/latest/schema-types.csv";

static CAPITAL: Lazy<Regex> = Lazy::new(|| Regex::new("([A-Z])").expect("valid capital letter regex"));

pub fn source(context: &SourceContext) -> Arc<dyn TermSource> {
    Arc::new(FileSource::new(
        METADATA,
        FileSourceConfig::new(URL),
        context,
        terms_from_line,
    ))
}

/// `CreativeWork` -> `Creative Work`
pub fn decamel(keyword: &str) -> String {
    CAPITAL.replace_all(keyword, " $1").trim().to_string()
}

fn terms_from_line(line: &StringRecord) -> Vec<SourceTerm> {
    line.get(1)
        .map(|name| vec![SourceTerm::new(name, decamel(name))])
        .unwrap_or_default()
}
