use axum::extract::Query;
use axum::Extension;

use crate::database::manager::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

use super::utils::{list_posts, ListPostsQuery, PostBody};

/// GET /api/posts - paginated post list with filtering and search
pub async fn post_list(
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListPostsQuery>,
) -> ApiResult<Vec<PostBody>> {
    let pool = DatabaseManager::pool().await?;
    let (posts, pagination) = list_posts(&pool, user.user_id, &query).await?;

    Ok(ApiResponse::paginated(posts, pagination))
}
