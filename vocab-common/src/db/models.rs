//! Database models

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

/// Base URL used for vocabularies that have none of their own
pub const DEFAULT_LOCAL_BASE_URL: &str = "http://localhost:8000/vocabularies";

/// A term source as persisted in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub guid: Uuid,
    /// Unique stable identifier, join key to every term
    pub prefix: String,
    pub label: String,
    pub base_url: Option<String>,
    pub description: Option<String>,
    /// Classification code, e.g. `wikidata:Q34770:language`
    pub concept: String,
}

impl Vocabulary {
    /// URI of the vocabulary: its own base URL, or a local one built from the prefix
    pub fn absolute_url(&self, local_base_url: &str) -> String {
        let base = self.base_url.as_deref().unwrap_or("").trim();
        if base.is_empty() {
            format!("{}/{}", local_base_url.trim_end_matches('/'), self.prefix)
        } else {
            base.to_string()
        }
    }

    pub(crate) fn from_row(row: &SqliteRow) -> Result<Self> {
        let guid: String = row.try_get("guid")?;
        Ok(Self {
            guid: parse_guid(&guid)?,
            prefix: row.try_get("prefix")?,
            label: row.try_get("label")?,
            base_url: row.try_get("base_url")?,
            description: row.try_get("description")?,
            concept: row.try_get("concept")?,
        })
    }
}

/// Vocabulary fields written by update-or-create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVocabulary {
    pub prefix: String,
    pub label: String,
    pub base_url: String,
    pub description: String,
    pub concept: String,
}

/// A resolved term cached in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub guid: Uuid,
    pub vocabulary_guid: Uuid,
    /// Prefix of the owning vocabulary
    pub prefix: String,
    /// Source-local identifier
    pub termid: String,
    pub label: String,
    pub description: String,
}

impl Term {
    /// `prefix:termid`
    pub fn absolute_id(&self) -> String {
        format!("{}:{}", self.prefix, self.termid)
    }

    /// Vocabulary URI followed by the termid
    pub fn absolute_url(&self, vocabulary: &Vocabulary, local_base_url: &str) -> String {
        let mut url = vocabulary.absolute_url(local_base_url);
        if !url.ends_with('/') {
            url.push('/');
        }
        url.push_str(&self.termid);
        url
    }

    pub(crate) fn from_row(row: &SqliteRow) -> Result<Self> {
        let guid: String = row.try_get("guid")?;
        let vocabulary_guid: String = row.try_get("vocabulary_guid")?;
        Ok(Self {
            guid: parse_guid(&guid)?,
            vocabulary_guid: parse_guid(&vocabulary_guid)?,
            prefix: row.try_get("prefix")?,
            termid: row.try_get("termid")?,
            label: row.try_get("label")?,
            description: row.try_get("description")?,
        })
    }
}

fn parse_guid(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| Error::Internal(format!("Invalid guid '{}': {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary(base_url: Option<&str>) -> Vocabulary {
        Vocabulary {
            guid: Uuid::new_v4(),
            prefix: "iso639-2".to_string(),
            label: "ISO 639-2".to_string(),
            base_url: base_url.map(str::to_string),
            description: None,
            concept: String::new(),
        }
    }

    #[test]
    fn test_vocabulary_url_uses_base_url() {
        let voc = vocabulary(Some(" http://id.loc.gov/vocabulary/iso639-2/ "));
        assert_eq!(
            voc.absolute_url(DEFAULT_LOCAL_BASE_URL),
            "http://id.loc.gov/vocabulary/iso639-2/"
        );
    }

    #[test]
    fn test_vocabulary_url_falls_back_to_local() {
        let voc = vocabulary(None);
        assert_eq!(
            voc.absolute_url("http://localhost:8000/vocabularies/"),
            "http://localhost:8000/vocabularies/iso639-2"
        );

        let voc = vocabulary(Some("   "));
        assert_eq!(
            voc.absolute_url(DEFAULT_LOCAL_BASE_URL),
            "http://localhost:8000/vocabularies/iso639-2"
        );
    }

    #[test]
    fn test_term_urls() {
        let voc = vocabulary(Some("http://id.loc.gov/vocabulary/iso639-2/"));
        let term = Term {
            guid: Uuid::new_v4(),
            vocabulary_guid: voc.guid,
            prefix: voc.prefix.clone(),
            termid: "glv".to_string(),
            label: "Manx".to_string(),
            description: String::new(),
        };

        assert_eq!(term.absolute_id(), "iso639-2:glv");
        assert_eq!(
            term.absolute_url(&voc, DEFAULT_LOCAL_BASE_URL),
            "http://id.loc.gov/vocabulary/iso639-2/glv"
        );

        let local = vocabulary(None);
        assert_eq!(
            term.absolute_url(&local, DEFAULT_LOCAL_BASE_URL),
            "http://localhost:8000/vocabularies/iso639-2/glv"
        );
    }
}
