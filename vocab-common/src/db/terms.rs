//! Term database operations
//!
//! Terms are cached copies of source terms, unique per `(vocabulary, termid)`.
//! Creation goes through [`get_or_create_term`], the single mutation point,
//! which converges concurrent creators onto one record.

use super::models::{Term, Vocabulary};
use super::retry::{retry_on_lock, MAX_LOCK_WAIT_MS};
use super::vocabularies::{get_or_create_vocabulary, get_vocabulary_by_guid};
use crate::{Error, Result};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

const SELECT_TERM: &str = r#"
    SELECT t.guid, t.vocabulary_guid, v.prefix, t.termid, t.label, t.description
    FROM terms t
    JOIN vocabularies v ON v.guid = t.vocabulary_guid
"#;

/// First term of the vocabulary whose termid or label equals `pattern`, ignoring case
///
/// Compared on the stored lower-cased columns, so non-ASCII letters fold
/// too. Ties are broken by termid.
pub async fn find_term_by_termid_or_label(
    pool: &SqlitePool,
    prefix: &str,
    pattern: &str,
) -> Result<Option<Term>> {
    let folded = pattern.to_lowercase();
    let row = sqlx::query(&format!(
        r#"{}
        WHERE v.prefix = ?
          AND (t.termid_lower = ? OR t.label_lower = ?)
        ORDER BY t.termid
        LIMIT 1
        "#,
        SELECT_TERM
    ))
    .bind(prefix)
    .bind(&folded)
    .bind(&folded)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(Term::from_row).transpose()
}

/// Load a term by its identity
pub async fn get_term(
    pool: &SqlitePool,
    vocabulary: &Vocabulary,
    termid: &str,
) -> Result<Option<Term>> {
    let row = sqlx::query(&format!(
        "{} WHERE t.vocabulary_guid = ? AND t.termid = ?",
        SELECT_TERM
    ))
    .bind(vocabulary.guid.to_string())
    .bind(termid)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(Term::from_row).transpose()
}

/// Return the term with this identity, creating it from `label`/`description` if absent
///
/// The boolean is true when this call created the record. Label and
/// description of an existing record are never overwritten. A unique
/// constraint violation on insert means a concurrent caller won the race;
/// the existing record is fetched and returned instead.
pub async fn get_or_create_term(
    pool: &SqlitePool,
    vocabulary: &Vocabulary,
    termid: &str,
    label: &str,
    description: &str,
) -> Result<(Term, bool)> {
    retry_on_lock("term get-or-create", MAX_LOCK_WAIT_MS, move || async move {
        if let Some(term) = get_term(pool, vocabulary, termid).await? {
            return Ok((term, false));
        }

        let guid = Uuid::new_v4();
        let inserted = sqlx::query(
            r#"
            INSERT INTO terms (guid, vocabulary_guid, termid, label, description, termid_lower, label_lower)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(guid.to_string())
        .bind(vocabulary.guid.to_string())
        .bind(termid)
        .bind(label)
        .bind(description)
        .bind(termid.to_lowercase())
        .bind(label.to_lowercase())
        .execute(pool)
        .await
        .map_err(Error::from);

        match inserted {
            Ok(_) => {
                debug!(prefix = %vocabulary.prefix, termid, "Created term");
                Ok((
                    Term {
                        guid,
                        vocabulary_guid: vocabulary.guid,
                        prefix: vocabulary.prefix.clone(),
                        termid: termid.to_string(),
                        label: label.to_string(),
                        description: description.to_string(),
                    },
                    true,
                ))
            }
            Err(err) if err.is_unique_violation() => {
                debug!(prefix = %vocabulary.prefix, termid, "Term created concurrently, fetching it");
                let term = get_term(pool, vocabulary, termid).await?.ok_or_else(|| {
                    Error::Internal(format!(
                        "term {}:{} vanished after unique violation",
                        vocabulary.prefix, termid
                    ))
                })?;
                Ok((term, false))
            }
            Err(err) => Err(err),
        }
    })
    .await
}

/// Terms of the vocabulary whose label contains `pattern`, ignoring case
pub async fn search_local_terms(
    pool: &SqlitePool,
    prefix: &str,
    pattern: &str,
    limit: i64,
) -> Result<Vec<Term>> {
    let rows = sqlx::query(&format!(
        r#"{}
        WHERE v.prefix = ? AND instr(t.label_lower, ?) > 0
        ORDER BY t.label, t.termid
        LIMIT ?
        "#,
        SELECT_TERM
    ))
    .bind(prefix)
    .bind(pattern.to_lowercase())
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.iter().map(Term::from_row).collect()
}

/// Number of cached terms in a vocabulary
pub async fn count_terms(pool: &SqlitePool, prefix: &str) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM terms t
        JOIN vocabularies v ON v.guid = t.vocabulary_guid
        WHERE v.prefix = ?
        "#,
    )
    .bind(prefix)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Get or create a term (and its vocabulary) from a `prefix:termid:label` code
///
/// e.g. `wikidata:Q34770:language`. Returns `None` for an empty or
/// malformed code. The label may itself contain colons.
pub async fn get_or_create_term_from_code(pool: &SqlitePool, code: &str) -> Result<Option<Term>> {
    let mut parts = code.trim().splitn(3, ':');
    let (Some(prefix), Some(termid), Some(label)) = (parts.next(), parts.next(), parts.next())
    else {
        return Ok(None);
    };

    let (prefix, termid, label) = (prefix.trim(), termid.trim(), label.trim());
    if prefix.is_empty() || termid.is_empty() {
        return Ok(None);
    }

    let vocabulary = get_or_create_vocabulary(pool, prefix).await?;
    let (term, _) = get_or_create_term(pool, &vocabulary, termid, label, "").await?;

    Ok(Some(term))
}

/// Get or create a term from a `vocabulary_guid::termid::label[::description]` selection
///
/// This is the value an autocomplete widget submits for a term that is not
/// yet cached. The description is form-encoded (`+` for spaces). Returns
/// `None` when the value is empty or malformed; an unknown vocabulary is an error.
pub async fn create_term_from_selection(pool: &SqlitePool, value: &str) -> Result<Option<Term>> {
    let parts: Vec<&str> = value.split("::").collect();
    if parts.len() < 3 {
        return Ok(None);
    }

    let Ok(vocabulary_guid) = Uuid::parse_str(parts[0].trim()) else {
        return Ok(None);
    };
    let termid = parts[1].trim();
    if termid.is_empty() {
        return Ok(None);
    }

    let description = match parts.get(3) {
        Some(encoded) => decode_form_value(encoded)?,
        None => String::new(),
    };

    let vocabulary = get_vocabulary_by_guid(pool, vocabulary_guid)
        .await?
        .ok_or_else(|| Error::NotFound(format!("vocabulary {}", vocabulary_guid)))?;

    let (term, _) = get_or_create_term(pool, &vocabulary, termid, parts[2], &description).await?;

    Ok(Some(term))
}

fn decode_form_value(encoded: &str) -> Result<String> {
    let spaced = encoded.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| Error::InvalidInput(format!("Invalid encoded description: {}", e)))
}
