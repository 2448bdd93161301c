use axum::extract::Path;
use axum::Extension;
use serde_json::{json, Value};

use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

use super::utils::fetch_post_record;

/// DELETE /api/posts/:slug - delete an owned post; associations cascade
pub async fn post_delete(
    Extension(user): Extension<AuthUser>,
    Path(slug): Path<String>,
) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;

    let existing = fetch_post_record(&pool, &slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    if existing.user_id != user.user_id {
        return Err(ApiError::not_found("Post not found"));
    }

    sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(existing.id)
        .execute(&pool)
        .await?;

    tracing::info!(slug = %slug, user = %user.user_id, "post deleted");

    Ok(ApiResponse::success(json!({
        "message": "Post deleted successfully"
    })))
}
