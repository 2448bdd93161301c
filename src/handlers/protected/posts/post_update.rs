use axum::extract::Path;
use axum::{Extension, Json};
use serde::Deserialize;

use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{slug, tags};
use crate::validation;

use super::utils::{fetch_post_by_slug, fetch_post_record, PostBody};

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub is_published: Option<bool>,
    pub tags: Option<Vec<String>>,
}

/// PATCH /api/posts/:slug - partial update; the slug is recomputed only
/// when the title changes, tags are re-synced only when a list is supplied
pub async fn post_update(
    Extension(user): Extension<AuthUser>,
    Path(slug_param): Path<String>,
    Json(payload): Json<UpdatePostRequest>,
) -> ApiResult<PostBody> {
    let mut errors = validation::FieldErrors::new();
    if let Some(title) = &payload.title {
        validation::check_title(&mut errors, title);
    }
    if let Some(description) = &payload.description {
        validation::check_description(&mut errors, description);
    }
    if let Some(content) = &payload.content {
        validation::check_content(&mut errors, content);
    }
    if let Some(tag_list) = &payload.tags {
        validation::check_tags(&mut errors, tag_list);
    }
    errors.into_result()?;

    let pool = DatabaseManager::pool().await?;

    let existing = fetch_post_record(&pool, &slug_param)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    // Ownership gates mutation; respond 404 rather than revealing existence
    if existing.user_id != user.user_id {
        return Err(ApiError::not_found("Post not found"));
    }

    // Recompute the slug only on an actual title change
    let mut new_slug = existing.slug.clone();
    if let Some(title) = &payload.title {
        if *title != existing.title {
            let mut base = slug::generate_slug(title);
            if base.is_empty() {
                base = "post".to_string();
            }
            new_slug = slug::ensure_unique_slug(&pool, &base).await?;
        }
    }

    sqlx::query(
        "UPDATE posts
         SET slug = $1,
             title = COALESCE($2, title),
             description = COALESCE($3, description),
             content = COALESCE($4, content),
             is_published = COALESCE($5, is_published),
             updated_at = NOW()
         WHERE id = $6",
    )
    .bind(&new_slug)
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(&payload.content)
    .bind(payload.is_published)
    .bind(existing.id)
    .execute(&pool)
    .await?;

    if let Some(tag_list) = &payload.tags {
        tags::sync_post_tags(&pool, existing.id, tag_list).await?;
    }

    let post = fetch_post_by_slug(&pool, user.user_id, &new_slug)
        .await?
        .ok_or_else(|| ApiError::internal_server_error("Failed to load updated post"))?;

    Ok(ApiResponse::success(post.into()))
}
