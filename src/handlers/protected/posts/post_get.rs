use axum::extract::Path;
use axum::Extension;

use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

use super::utils::{fetch_post_by_slug, PostBody};

/// GET /api/posts/:slug - show a single post
pub async fn post_get(
    Extension(user): Extension<AuthUser>,
    Path(slug): Path<String>,
) -> ApiResult<PostBody> {
    let pool = DatabaseManager::pool().await?;

    let post = fetch_post_by_slug(&pool, user.user_id, &slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    Ok(ApiResponse::success(post.into()))
}
