//! Slug derivation for posts.
//!
//! A slug is the URL-safe identifier derived from a post title. Generation is
//! a pure function; uniqueness is enforced against the posts table with a
//! random suffix, re-verified until no collision remains.

use rand::Rng;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;

const SUFFIX_LEN: usize = 6;
const SUFFIX_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// How many suffixed candidates to try before giving up. With 36^6
/// combinations per attempt this only trips on a broken store.
const MAX_SUFFIX_ATTEMPTS: usize = 8;

/// Derive a URL-safe slug from a title.
///
/// Lowercases the input, collapses every run of characters outside
/// `[a-z0-9]` into a single hyphen and strips hyphens from both ends.
/// Total over any input; an entirely non-alphanumeric title yields an
/// empty string, which the caller must substitute.
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Ensure a slug is unique across all posts.
///
/// Returns `base` unchanged when no persisted slug equals or is prefixed by
/// it. On collision, appends a fresh 6-character lowercase-alphanumeric
/// suffix and re-checks the candidate until one is verified unused. The
/// unique index on posts.slug remains the final arbiter under concurrent
/// writers.
pub async fn ensure_unique_slug(pool: &PgPool, base: &str) -> Result<String, DatabaseError> {
    let existing: Option<String> =
        sqlx::query_scalar("SELECT slug FROM posts WHERE slug LIKE $1 || '%' LIMIT 1")
            .bind(base)
            .fetch_optional(pool)
            .await?;

    if existing.is_none() {
        return Ok(base.to_string());
    }

    for _ in 0..MAX_SUFFIX_ATTEMPTS {
        let candidate = format!("{}-{}", base, random_suffix());
        let taken: Option<String> = sqlx::query_scalar("SELECT slug FROM posts WHERE slug = $1")
            .bind(&candidate)
            .fetch_optional(pool)
            .await?;

        if taken.is_none() {
            return Ok(candidate);
        }
    }

    Err(DatabaseError::QueryError(format!(
        "could not find a unique slug for '{}' after {} attempts",
        base, MAX_SUFFIX_ATTEMPTS
    )))
}

fn random_suffix() -> String {
    let mut rng = rand::thread_rng();
    (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_title() {
        assert_eq!(generate_slug("My First Post!"), "my-first-post");
    }

    #[test]
    fn collapses_runs_of_separators() {
        assert_eq!(generate_slug("Hello --  World"), "hello-world");
        assert_eq!(generate_slug("a&b@c"), "a-b-c");
    }

    #[test]
    fn strips_leading_and_trailing_hyphens() {
        assert_eq!(generate_slug("  ---  "), "");
        assert_eq!(generate_slug("!wow!"), "wow");
    }

    #[test]
    fn preserves_digits() {
        assert_eq!(generate_slug("Top 10 Tips for 2026"), "top-10-tips-for-2026");
    }

    #[test]
    fn empty_input_yields_empty_slug() {
        assert_eq!(generate_slug(""), "");
    }

    #[test]
    fn non_ascii_characters_become_separators() {
        assert_eq!(generate_slug("caffè überfall"), "caff-berfall");
    }

    #[test]
    fn random_suffix_shape() {
        let s = random_suffix();
        assert_eq!(s.len(), SUFFIX_LEN);
        assert!(s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }
}
