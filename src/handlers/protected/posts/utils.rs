use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::config;
use crate::database::manager::DatabaseError;
use crate::middleware::response::{total_pages, PaginationMeta};

/// Author block embedded in every post body
#[derive(Debug, Serialize)]
pub struct AuthorBody {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
}

/// Post shape returned by every post-returning endpoint
#[derive(Debug, Serialize)]
pub struct PostBody {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    pub is_published: bool,
    pub favorites_count: i64,
    pub favorited: bool,
    pub tags: Vec<String>,
    pub author: AuthorBody,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Joined row backing PostBody; `favorited` is resolved against the viewer
#[derive(Debug, FromRow)]
pub struct PostDetailRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_name: Option<String>,
    pub author_email: String,
    pub author_image: Option<String>,
    pub tags: Vec<String>,
    pub favorites_count: i64,
    pub favorited: bool,
}

impl From<PostDetailRow> for PostBody {
    fn from(row: PostDetailRow) -> Self {
        Self {
            slug: row.slug,
            title: row.title,
            description: row.description,
            content: row.content,
            is_published: row.is_published,
            favorites_count: row.favorites_count,
            favorited: row.favorited,
            tags: row.tags,
            author: AuthorBody {
                id: row.author_id,
                name: row.author_name,
                email: row.author_email,
                image: row.author_image,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Query parameters accepted by the post list endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ListPostsQuery {
    pub tag: Option<String>,
    pub author: Option<String>,
    pub favorited: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub offset: Option<i64>,
}

// $1 is always the viewing user's id (for the favorited flag)
const POST_SELECT: &str = r#"
    SELECT p.id, p.user_id, p.slug, p.title, p.description, p.content, p.is_published,
           p.created_at, p.updated_at,
           u.id AS author_id, u.name AS author_name, u.email AS author_email, u.image AS author_image,
           ARRAY(SELECT tg.name FROM post_tags pt JOIN tags tg ON tg.id = pt.tag_id
                 WHERE pt.post_id = p.id ORDER BY tg.name) AS tags,
           (SELECT COUNT(*) FROM post_favorites pf WHERE pf.post_id = p.id) AS favorites_count,
           EXISTS(SELECT 1 FROM post_favorites pf WHERE pf.post_id = p.id AND pf.user_id = $1) AS favorited
    FROM posts p
    JOIN users u ON u.id = p.user_id
"#;

/// Fetch the bare post row by slug (ownership checks, mutations)
pub async fn fetch_post_record(
    pool: &PgPool,
    slug: &str,
) -> Result<Option<crate::database::models::Post>, DatabaseError> {
    let post = sqlx::query_as::<_, crate::database::models::Post>(
        "SELECT id, user_id, slug, title, description, content, is_published, created_at, updated_at
         FROM posts WHERE slug = $1",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;
    Ok(post)
}

/// Fetch one post by slug, resolved against the viewing user
pub async fn fetch_post_by_slug(
    pool: &PgPool,
    viewer_id: Uuid,
    slug: &str,
) -> Result<Option<PostDetailRow>, DatabaseError> {
    let sql = format!("{} WHERE p.slug = $2", POST_SELECT);
    let row = sqlx::query_as::<_, PostDetailRow>(&sql)
        .bind(viewer_id)
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Build the WHERE clause for the list filters with bind placeholders
/// starting at `first_placeholder`. Returns the clause and the bind values
/// in placeholder order.
fn filter_clause(query: &ListPostsQuery, first_placeholder: usize) -> (String, Vec<String>) {
    let mut conditions: Vec<String> = Vec::new();
    let mut binds: Vec<String> = Vec::new();
    let mut next = first_placeholder;

    if let Some(tag) = query.tag.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        conditions.push(format!(
            "EXISTS (SELECT 1 FROM post_tags pt JOIN tags tg ON tg.id = pt.tag_id \
             WHERE pt.post_id = p.id AND tg.name = ${})",
            next
        ));
        binds.push(tag.to_lowercase());
        next += 1;
    }

    if let Some(author) = query.author.as_deref().filter(|a| !a.is_empty()) {
        conditions.push(format!("u.email = ${}", next));
        binds.push(author.to_string());
        next += 1;
    }

    if let Some(favorited) = query.favorited.as_deref().filter(|f| !f.is_empty()) {
        conditions.push(format!(
            "EXISTS (SELECT 1 FROM post_favorites pf JOIN users fu ON fu.id = pf.user_id \
             WHERE pf.post_id = p.id AND fu.email = ${})",
            next
        ));
        binds.push(favorited.to_string());
        next += 1;
    }

    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        conditions.push(format!("(p.title ILIKE ${} OR p.content ILIKE ${})", next, next));
        binds.push(format!("%{}%", search));
        next += 1;
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    (clause, binds)
}

/// Resolved pagination: limit clamped to the configured maximum, offset
/// derived from page unless given explicitly
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub offset: i64,
}

pub fn resolve_pagination(query: &ListPostsQuery) -> Pagination {
    let api = &config::config().api;
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(api.default_page_size).clamp(1, api.max_page_size);
    let offset = query
        .offset
        .filter(|o| *o >= 0)
        .unwrap_or((page as i64 - 1) * limit as i64);
    Pagination { page, limit, offset }
}

/// Run the filtered, paginated post list query.
///
/// Returns the page of posts (newest first) plus the pagination metadata
/// computed from the matching total.
pub async fn list_posts(
    pool: &PgPool,
    viewer_id: Uuid,
    query: &ListPostsQuery,
) -> Result<(Vec<PostBody>, PaginationMeta), DatabaseError> {
    let pagination = resolve_pagination(query);

    // Viewer id occupies $1 in the select, so filters start at $2
    let (clause, binds) = filter_clause(query, 2);
    let select_sql = format!(
        "{}{} ORDER BY p.created_at DESC LIMIT ${} OFFSET ${}",
        POST_SELECT,
        clause,
        binds.len() + 2,
        binds.len() + 3,
    );

    let mut select = sqlx::query_as::<_, PostDetailRow>(&select_sql).bind(viewer_id);
    for bind in &binds {
        select = select.bind(bind);
    }
    let rows = select
        .bind(pagination.limit as i64)
        .bind(pagination.offset)
        .fetch_all(pool)
        .await?;

    // Count query carries no viewer bind; same filters renumbered from $1
    let (count_clause, count_binds) = filter_clause(query, 1);
    let count_sql = format!(
        "SELECT COUNT(*) FROM posts p JOIN users u ON u.id = p.user_id{}",
        count_clause
    );
    let mut count = sqlx::query_scalar::<_, i64>(&count_sql);
    for bind in &count_binds {
        count = count.bind(bind);
    }
    let total = count.fetch_one(pool).await?;

    let meta = PaginationMeta {
        page: pagination.page,
        limit: pagination.limit,
        total,
        total_pages: total_pages(total, pagination.limit),
    };

    Ok((rows.into_iter().map(PostBody::from).collect(), meta))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_clause_empty_without_filters() {
        let query = ListPostsQuery::default();
        let (clause, binds) = filter_clause(&query, 2);
        assert!(clause.is_empty());
        assert!(binds.is_empty());
    }

    #[test]
    fn filter_clause_numbers_placeholders_in_order() {
        let query = ListPostsQuery {
            tag: Some("Rust".to_string()),
            search: Some("async".to_string()),
            ..Default::default()
        };
        let (clause, binds) = filter_clause(&query, 2);
        assert!(clause.contains("tg.name = $2"));
        assert!(clause.contains("p.title ILIKE $3"));
        assert_eq!(binds, vec!["rust".to_string(), "%async%".to_string()]);
    }

    #[test]
    fn filter_clause_ignores_blank_values() {
        let query = ListPostsQuery {
            tag: Some("  ".to_string()),
            search: Some("".to_string()),
            ..Default::default()
        };
        let (clause, binds) = filter_clause(&query, 1);
        assert!(clause.is_empty());
        assert!(binds.is_empty());
    }
}
