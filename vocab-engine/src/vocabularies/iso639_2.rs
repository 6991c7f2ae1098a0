//! ISO 639-2 language codes
//!
//! Three-letter codes, some languages have two: bibliographic (B) and
//! terminological (T), e.g. German is `ger` (B) and `deu` (T).
//! See https://www.loc.gov/standards/iso639-2/faq.html

use crate::sources::{FileSource, FileSourceConfig};
use crate::types::{SourceContext, SourceMetadata, SourceTerm, TermSource};
use csv::StringRecord;
use std::sync::Arc;

pub const METADATA: SourceMetadata = SourceMetadata {
    prefix: "iso639-2",
    label: "ISO 639-2",
    base_url: "http://id.loc.gov/vocabulary/iso639-2/",
    description: "Codes for the Representation of Names of Languages - Part 2: Alpha-3 Code for the Names of Languages",
    concept: "wikidata:Q34770:language",
};

/// `B|T|alpha-2|English name|French name`, no header
pub const URL: &str = "https://www.loc.gov/standards/iso639-2/ISO-639-2_utf-8.txt";

pub fn source(context: &SourceContext) -> Arc<dyn TermSource> {
    let config = FileSourceConfig::new(URL).delimiter(b'|').without_header();
    Arc::new(FileSource::new(METADATA, config, context, terms_from_line))
}

fn terms_from_line(line: &StringRecord) -> Vec<SourceTerm> {
    let (Some(bibliographic), Some(label)) = (line.get(0), line.get(3)) else {
        return Vec::new();
    };

    match line.get(1).map(str::trim).filter(|code| !code.is_empty()) {
        Some(terminological) => vec![
            SourceTerm::new(bibliographic, label).with_description("B"),
            SourceTerm::new(terminological, label).with_description("T"),
        ],
        None => vec![SourceTerm::new(bibliographic, label)],
    }
}
