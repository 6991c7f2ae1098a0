//! ISO 15924 script codes
//!
//! See https://www.unicode.org/iso15924/codelists.html

use crate::sources::{FileSource, FileSourceConfig};
use crate::types::{SourceContext, SourceMetadata, SourceTerm, TermSource};
use csv::StringRecord;
use std::sync::Arc;

pub const METADATA: SourceMetadata = SourceMetadata {
    prefix: "iso15924",
    label: "ISO 15924",
    // not dereferenceable
    base_url: "https://www.unicode.org/iso15924/",
    description: "Codes for the Representation of names of scripts",
    concept: "wikidata:Q8192:writing system",
};

/// `Code;N°;English Name;Nom français;PVA;Unicode Version;Date`, `#` comments
pub const URL: &str = "https://www.unicode.org/iso15924/iso15924.txt";

pub const PROCESSED: &str = "iso15924-utf8.txt";

pub fn source(context: &SourceContext) -> Arc<dyn TermSource> {
    let config = FileSourceConfig::new(URL).delimiter(b';').processed(PROCESSED);
    Arc::new(FileSource::new(METADATA, config, context, terms_from_line))
}

fn terms_from_line(line: &StringRecord) -> Vec<SourceTerm> {
    match (line.get(0), line.get(2)) {
        (Some(code), Some(name)) if !code.starts_with('#') => vec![SourceTerm::new(code, name)],
        _ => Vec::new(),
    }
}
