//! DCMI Type vocabulary
//!
//! See https://www.dublincore.org/specifications/dublin-core/dcmi-terms/#section-7

use crate::sources::ListSource;
use crate::types::{SourceContext, SourceMetadata, SourceTerm, TermSource};
use std::sync::Arc;

pub const METADATA: SourceMetadata = SourceMetadata {
    prefix: "dcmitype",
    label: "DCMI Type",
    base_url: "http://purl.org/dc/dcmitype/",
    description: "a general, cross-domain list of approved terms that may be used as values for the Dublin Core Resource Type element to identify the genre of a resource",
    concept: "wikidata:Q5165081:content format",
};

pub fn source(_context: &SourceContext) -> Arc<dyn TermSource> {
    Arc::new(ListSource::new(METADATA, terms))
}

fn terms() -> Vec<SourceTerm> {
    vec![
        SourceTerm::new("Collection", "Collection").with_description("An aggregation of resources"),
        SourceTerm::new("Dataset", "Dataset")
            .with_description("Data encoded in a defined structure (e.g. list, table, database)."),
        SourceTerm::new("Event", "Event"),
        SourceTerm::new("Image", "Image"),
        SourceTerm::new("InteractiveResource", "Interactive Resource"),
        SourceTerm::new("MovingImage", "Moving Image"),
        SourceTerm::new("PhysicalObject", "Physical Object"),
        SourceTerm::new("Service", "Service").with_description(
            "A system that provides one or more functions (e.g. interlibrary loans, banking service, web server).",
        ),
        SourceTerm::new("Software", "Software"),
        SourceTerm::new("Sound", "Sound"),
        SourceTerm::new("StillImage", "Still Image"),
        SourceTerm::new("Text", "Text"),
    ]
}
