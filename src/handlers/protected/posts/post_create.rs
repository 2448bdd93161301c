use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{slug, tags};
use crate::validation;

use super::utils::{fetch_post_by_slug, PostBody};

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// POST /api/posts - create a post with slug derivation and tag sync
pub async fn post_create(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreatePostRequest>,
) -> ApiResult<PostBody> {
    let mut errors = validation::FieldErrors::new();
    validation::check_title(&mut errors, &payload.title);
    validation::check_content(&mut errors, &payload.content);
    if let Some(description) = &payload.description {
        validation::check_description(&mut errors, description);
    }
    validation::check_tags(&mut errors, &payload.tags);
    errors.into_result()?;

    let pool = DatabaseManager::pool().await?;

    // An entirely non-alphanumeric title produces an empty base slug;
    // substitute a stable fallback before uniqueness resolution
    let mut base = slug::generate_slug(&payload.title);
    if base.is_empty() {
        base = "post".to_string();
    }
    let unique_slug = slug::ensure_unique_slug(&pool, &base).await?;

    let post_id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO posts (id, user_id, slug, title, description, content, is_published)
         VALUES ($1, $2, $3, $4, $5, $6, false)",
    )
    .bind(post_id)
    .bind(user.user_id)
    .bind(&unique_slug)
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(&payload.content)
    .execute(&pool)
    .await?;

    tags::sync_post_tags(&pool, post_id, &payload.tags).await?;

    let post = fetch_post_by_slug(&pool, user.user_id, &unique_slug)
        .await?
        .ok_or_else(|| ApiError::internal_server_error("Failed to load created post"))?;

    tracing::info!(slug = %unique_slug, user = %user.user_id, "post created");

    Ok(ApiResponse::created(post.into()))
}
