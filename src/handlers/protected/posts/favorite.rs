use axum::extract::Path;
use axum::Extension;

use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

use super::utils::{fetch_post_by_slug, fetch_post_record, PostBody};

/// POST /api/posts/:slug/favorite - idempotent favorite
pub async fn favorite_post(
    Extension(user): Extension<AuthUser>,
    Path(slug): Path<String>,
) -> ApiResult<PostBody> {
    let pool = DatabaseManager::pool().await?;

    let existing = fetch_post_record(&pool, &slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    sqlx::query(
        "INSERT INTO post_favorites (user_id, post_id) VALUES ($1, $2)
         ON CONFLICT (user_id, post_id) DO NOTHING",
    )
    .bind(user.user_id)
    .bind(existing.id)
    .execute(&pool)
    .await?;

    let post = fetch_post_by_slug(&pool, user.user_id, &slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    Ok(ApiResponse::success(post.into()))
}

/// DELETE /api/posts/:slug/favorite - idempotent unfavorite
pub async fn unfavorite_post(
    Extension(user): Extension<AuthUser>,
    Path(slug): Path<String>,
) -> ApiResult<PostBody> {
    let pool = DatabaseManager::pool().await?;

    let existing = fetch_post_record(&pool, &slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    sqlx::query("DELETE FROM post_favorites WHERE user_id = $1 AND post_id = $2")
        .bind(user.user_id)
        .bind(existing.id)
        .execute(&pool)
        .await?;

    let post = fetch_post_by_slug(&pool, user.user_id, &slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    Ok(ApiResponse::success(post.into()))
}
