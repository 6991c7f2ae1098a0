//! Vocabulary database operations

use super::models::{NewVocabulary, Vocabulary};
use crate::{Error, Result};
use sqlx::SqlitePool;
use uuid::Uuid;

const SELECT_VOCABULARY: &str =
    "SELECT guid, prefix, label, base_url, description, concept FROM vocabularies";

/// Load vocabulary by prefix
pub async fn get_vocabulary_by_prefix(pool: &SqlitePool, prefix: &str) -> Result<Option<Vocabulary>> {
    let row = sqlx::query(&format!("{} WHERE prefix = ?", SELECT_VOCABULARY))
        .bind(prefix)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(Vocabulary::from_row).transpose()
}

/// Load vocabulary by guid
pub async fn get_vocabulary_by_guid(pool: &SqlitePool, guid: Uuid) -> Result<Option<Vocabulary>> {
    let row = sqlx::query(&format!("{} WHERE guid = ?", SELECT_VOCABULARY))
        .bind(guid.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(Vocabulary::from_row).transpose()
}

/// Insert the vocabulary or overwrite its metadata, keyed by prefix
pub async fn update_or_create_vocabulary(
    pool: &SqlitePool,
    vocabulary: &NewVocabulary,
) -> Result<Vocabulary> {
    sqlx::query(
        r#"
        INSERT INTO vocabularies (guid, prefix, label, base_url, description, concept)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(prefix) DO UPDATE SET
            label = excluded.label,
            base_url = excluded.base_url,
            description = excluded.description,
            concept = excluded.concept,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&vocabulary.prefix)
    .bind(&vocabulary.label)
    .bind(&vocabulary.base_url)
    .bind(&vocabulary.description)
    .bind(&vocabulary.concept)
    .execute(pool)
    .await?;

    get_vocabulary_by_prefix(pool, &vocabulary.prefix)
        .await?
        .ok_or_else(|| Error::NotFound(format!("vocabulary '{}'", vocabulary.prefix)))
}

/// Load the vocabulary with this prefix, creating a bare record if absent
///
/// A new record uses the prefix as its label.
pub async fn get_or_create_vocabulary(pool: &SqlitePool, prefix: &str) -> Result<Vocabulary> {
    if let Some(vocabulary) = get_vocabulary_by_prefix(pool, prefix).await? {
        return Ok(vocabulary);
    }

    sqlx::query(
        r#"
        INSERT INTO vocabularies (guid, prefix, label, concept)
        VALUES (?, ?, ?, '')
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(prefix)
    .bind(prefix)
    .execute(pool)
    .await?;

    get_vocabulary_by_prefix(pool, prefix)
        .await?
        .ok_or_else(|| Error::NotFound(format!("vocabulary '{}'", prefix)))
}

/// All vocabularies ordered by prefix
pub async fn list_vocabularies(pool: &SqlitePool) -> Result<Vec<Vocabulary>> {
    let rows = sqlx::query(&format!("{} ORDER BY prefix", SELECT_VOCABULARY))
        .fetch_all(pool)
        .await?;

    rows.iter().map(Vocabulary::from_row).collect()
}

/// Vocabularies classified under the same concept code
pub async fn list_vocabularies_by_concept(
    pool: &SqlitePool,
    concept: &str,
) -> Result<Vec<Vocabulary>> {
    let rows = sqlx::query(&format!("{} WHERE concept = ? ORDER BY prefix", SELECT_VOCABULARY))
        .bind(concept)
        .fetch_all(pool)
        .await?;

    rows.iter().map(Vocabulary::from_row).collect()
}

/// Delete a vocabulary and, by cascade, its terms
///
/// Returns false when no vocabulary has this prefix.
pub async fn delete_vocabulary(pool: &SqlitePool, prefix: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM vocabularies WHERE prefix = ?")
        .bind(prefix)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::init_memory_database;

    fn new_vocabulary(prefix: &str, label: &str, concept: &str) -> NewVocabulary {
        NewVocabulary {
            prefix: prefix.to_string(),
            label: label.to_string(),
            base_url: format!("http://example.org/{}/", prefix),
            description: String::new(),
            concept: concept.to_string(),
        }
    }

    #[tokio::test]
    async fn test_update_or_create_keeps_guid() {
        let pool = init_memory_database().await.unwrap();

        let first = update_or_create_vocabulary(&pool, &new_vocabulary("mime", "Media", ""))
            .await
            .unwrap();
        let second = update_or_create_vocabulary(
            &pool,
            &new_vocabulary("mime", "Media Types", "wikidata:Q235557:file format"),
        )
        .await
        .unwrap();

        assert_eq!(first.guid, second.guid);
        assert_eq!(second.label, "Media Types");
        assert_eq!(second.concept, "wikidata:Q235557:file format");
        assert_eq!(list_vocabularies(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_or_create_uses_prefix_as_label() {
        let pool = init_memory_database().await.unwrap();

        let created = get_or_create_vocabulary(&pool, "avoc").await.unwrap();
        assert_eq!(created.label, "avoc");
        assert_eq!(created.concept, "");

        let again = get_or_create_vocabulary(&pool, "avoc").await.unwrap();
        assert_eq!(created.guid, again.guid);
    }

    #[tokio::test]
    async fn test_list_by_concept() {
        let pool = init_memory_database().await.unwrap();
        let entity = "wikidata:Q35120:entity";

        update_or_create_vocabulary(&pool, &new_vocabulary("viaf", "VIAF", entity))
            .await
            .unwrap();
        update_or_create_vocabulary(&pool, &new_vocabulary("schema", "Schema.org", entity))
            .await
            .unwrap();
        update_or_create_vocabulary(&pool, &new_vocabulary("mime", "Media Types", "other"))
            .await
            .unwrap();

        let related = list_vocabularies_by_concept(&pool, entity).await.unwrap();
        let prefixes: Vec<_> = related.iter().map(|v| v.prefix.as_str()).collect();
        assert_eq!(prefixes, vec!["schema", "viaf"]);
    }

    #[tokio::test]
    async fn test_delete_unknown_prefix() {
        let pool = init_memory_database().await.unwrap();
        assert!(!delete_vocabulary(&pool, "nothing").await.unwrap());
        assert!(get_vocabulary_by_prefix(&pool, "nothing").await.unwrap().is_none());
    }
}
