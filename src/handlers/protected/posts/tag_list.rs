use crate::database::manager::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/posts/tags/all - distinct tag names currently in use, sorted
pub async fn tag_list() -> ApiResult<Vec<String>> {
    let pool = DatabaseManager::pool().await?;

    let tags: Vec<String> = sqlx::query_scalar(
        "SELECT DISTINCT t.name FROM tags t
         JOIN post_tags pt ON pt.tag_id = t.id
         ORDER BY t.name",
    )
    .fetch_all(&pool)
    .await?;

    Ok(ApiResponse::success(tags))
}
