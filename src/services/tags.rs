//! Tag association reconciliation for posts.
//!
//! Replaces a post's full tag association set with a supplied list of names.
//! Runs inside one transaction so a failure between the delete and the
//! inserts rolls back to the previous association set.

use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Tag;

/// Replace all tag associations for a post with the supplied names.
///
/// Names are normalized (trimmed, lowercased) and deduplicated; empty names
/// are dropped. Missing tag entities are created on the fly. An empty list
/// leaves the post with no tags. Full replace, idempotent per call.
pub async fn sync_post_tags(
    pool: &PgPool,
    post_id: Uuid,
    tag_names: &[String],
) -> Result<(), DatabaseError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

    let normalized = normalize_tag_names(tag_names);
    if normalized.is_empty() {
        tx.commit().await?;
        return Ok(());
    }

    let mut tag_ids = Vec::with_capacity(normalized.len());
    for name in &normalized {
        // Upsert keeps this safe against a concurrent writer creating the
        // same tag name inside another transaction
        let tag = sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (id, name) VALUES ($1, $2)
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
             RETURNING id, name",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;

        tag_ids.push(tag.id);
    }

    for tag_id in tag_ids {
        sqlx::query("INSERT INTO post_tags (post_id, tag_id) VALUES ($1, $2)")
            .bind(post_id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Trim, lowercase and deduplicate tag names, preserving first-seen order
fn normalize_tag_names(tag_names: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut normalized = Vec::new();

    for name in tag_names {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            continue;
        }
        if seen.insert(name.clone()) {
            normalized.push(name);
        }
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_names_collapse_after_normalization() {
        let input = vec!["JS".to_string(), "js".to_string(), " JS ".to_string()];
        assert_eq!(normalize_tag_names(&input), vec!["js".to_string()]);
    }

    #[test]
    fn preserves_first_seen_order() {
        let input = vec!["Rust".to_string(), "Axum".to_string(), "rust".to_string()];
        assert_eq!(normalize_tag_names(&input), vec!["rust".to_string(), "axum".to_string()]);
    }

    #[test]
    fn drops_empty_and_whitespace_names() {
        let input = vec!["".to_string(), "   ".to_string(), "ok".to_string()];
        assert_eq!(normalize_tag_names(&input), vec!["ok".to_string()]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(normalize_tag_names(&[]).is_empty());
    }
}
