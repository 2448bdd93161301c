use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::manager::DatabaseManager;
use crate::database::models::User;
use crate::error::ApiError;
use crate::handlers::public::auth::utils::UserBody;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::validation;

/// GET /api/user/profile - current user's profile
pub async fn profile_get(Extension(auth): Extension<AuthUser>) -> ApiResult<UserBody> {
    let pool = DatabaseManager::pool().await?;

    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password_hash, image, created_at, updated_at
         FROM users WHERE id = $1",
    )
    .bind(auth.user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::success(UserBody::from(&user)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub image: Option<String>,
}

/// PATCH /api/user/profile - update name and/or image
pub async fn profile_patch(
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<UserBody> {
    let mut errors = validation::FieldErrors::new();
    if let Some(name) = &payload.name {
        validation::check_name(&mut errors, name);
    }
    errors.into_result()?;

    let pool = DatabaseManager::pool().await?;

    let user = sqlx::query_as::<_, User>(
        "UPDATE users
         SET name = COALESCE($1, name),
             image = COALESCE($2, image),
             updated_at = NOW()
         WHERE id = $3
         RETURNING id, name, email, password_hash, image, created_at, updated_at",
    )
    .bind(&payload.name)
    .bind(&payload.image)
    .bind(auth.user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::success(UserBody::from(&user)))
}

/// DELETE /api/user/account - delete the account; posts and favorites cascade
pub async fn account_delete(Extension(auth): Extension<AuthUser>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(auth.user_id)
        .execute(&pool)
        .await?;

    tracing::info!(user = %auth.user_id, "account deleted");

    Ok(ApiResponse::success(json!({
        "message": format!("Account {} deleted", auth.email)
    })))
}
