use axum::Extension;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::manager::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Serialize, FromRow)]
pub struct DashboardStats {
    pub total_posts: i64,
    pub published_posts: i64,
    pub draft_posts: i64,
    pub favorites_received: i64,
    pub tags_used: i64,
}

async fn load_stats(pool: &PgPool, user_id: Uuid) -> Result<DashboardStats, DatabaseError> {
    let stats = sqlx::query_as::<_, DashboardStats>(
        "SELECT
             COUNT(*) AS total_posts,
             COUNT(*) FILTER (WHERE p.is_published) AS published_posts,
             COUNT(*) FILTER (WHERE NOT p.is_published) AS draft_posts,
             (SELECT COUNT(*) FROM post_favorites pf
              JOIN posts fp ON fp.id = pf.post_id
              WHERE fp.user_id = $1) AS favorites_received,
             (SELECT COUNT(DISTINCT pt.tag_id) FROM post_tags pt
              JOIN posts tp ON tp.id = pt.post_id
              WHERE tp.user_id = $1) AS tags_used
         FROM posts p
         WHERE p.user_id = $1",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(stats)
}

/// GET /api/dashboard/stats - post/favorite/tag totals for the current user
pub async fn stats_get(Extension(auth): Extension<AuthUser>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;
    let stats = load_stats(&pool, auth.user_id).await?;

    Ok(ApiResponse::success(json!({
        "user_id": auth.user_id,
        "stats": stats,
        "generated_at": Utc::now(),
    })))
}

#[derive(Debug, FromRow)]
struct ActivityRow {
    title: String,
    slug: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// GET /api/dashboard/activity - recent post creations and edits
pub async fn activity_get(Extension(auth): Extension<AuthUser>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;

    let rows = sqlx::query_as::<_, ActivityRow>(
        "SELECT title, slug, created_at, updated_at
         FROM posts WHERE user_id = $1
         ORDER BY updated_at DESC
         LIMIT 20",
    )
    .bind(auth.user_id)
    .fetch_all(&pool)
    .await?;

    let activities: Vec<Value> = rows
        .iter()
        .map(|row| {
            let edited = row.updated_at > row.created_at;
            json!({
                "type": if edited { "post_updated" } else { "post_created" },
                "timestamp": row.updated_at,
                "details": format!(
                    "{} \"{}\"",
                    if edited { "Updated" } else { "Created" },
                    row.title
                ),
                "slug": row.slug,
            })
        })
        .collect();

    Ok(ApiResponse::success(json!({
        "user_id": auth.user_id,
        "activities": activities,
    })))
}

/// GET /api/dashboard/overview - welcome line plus quick stats
pub async fn overview_get(Extension(auth): Extension<AuthUser>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;
    let stats = load_stats(&pool, auth.user_id).await?;

    let who = auth.name.clone().unwrap_or_else(|| auth.email.clone());

    Ok(ApiResponse::success(json!({
        "welcome": format!("Welcome back, {}!", who),
        "quick_stats": {
            "drafts": stats.draft_posts,
            "published": stats.published_posts,
            "favorites_received": stats.favorites_received,
        },
    })))
}
