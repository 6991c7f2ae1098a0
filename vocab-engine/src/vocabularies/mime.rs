//! IANA media types

use crate::sources::{FileSource, FileSourceConfig};
use crate::types::{SourceContext, SourceMetadata, SourceTerm, TermSource};
use csv::StringRecord;
use std::sync::Arc;

pub const METADATA: SourceMetadata = SourceMetadata {
    prefix: "mime",
    label: "Media Types",
    base_url: "https://www.iana.org/assignments/media-types/",
    description: "web page topics indexable by web search engines",
    concept: "wikidata:Q235557:file format",
};

pub const URL: &str = "https://pkgstore.datahub.io/core/media-types/media-types_csv/data/923aafab3de13cee5844f9329222c5c5/media-types_csv.csv";

pub fn source(context: &SourceContext) -> Arc<dyn TermSource> {
    Arc::new(FileSource::new(
        METADATA,
        FileSourceConfig::new(URL),
        context,
        terms_from_line,
    ))
}

fn terms_from_line(line: &StringRecord) -> Vec<SourceTerm> {
    line.get(0)
        .map(|name| vec![SourceTerm::new(name, name)])
        .unwrap_or_default()
}
