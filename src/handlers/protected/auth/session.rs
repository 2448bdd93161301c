use axum::Extension;
use serde_json::{json, Value};

use crate::database::manager::DatabaseManager;
use crate::database::models::User;
use crate::error::ApiError;
use crate::handlers::public::auth::utils::UserBody;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /api/auth/me - current user details from a fresh database read
pub async fn me_get(Extension(auth): Extension<AuthUser>) -> ApiResult<UserBody> {
    let pool = DatabaseManager::pool().await?;

    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password_hash, image, created_at, updated_at
         FROM users WHERE id = $1",
    )
    .bind(auth.user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::unauthorized("Account no longer exists"))?;

    Ok(ApiResponse::success(UserBody::from(&user)))
}

/// POST /api/auth/logout - acknowledge logout.
///
/// Tokens are stateless; the client discards its copy. The endpoint exists
/// so clients have a uniform sign-out call to target.
pub async fn logout_post(Extension(auth): Extension<AuthUser>) -> ApiResult<Value> {
    tracing::info!(user = %auth.user_id, "logout");

    Ok(ApiResponse::success(json!({
        "message": "Logged out successfully"
    })))
}
