use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::hash_password;
use crate::database::manager::DatabaseManager;
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::validation;

use super::utils::{session_body, SessionBody};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub image: Option<String>,
}

/// POST /auth/register - create an account and issue a session token
pub async fn register_post(Json(payload): Json<RegisterRequest>) -> ApiResult<SessionBody> {
    let mut errors = validation::FieldErrors::new();
    validation::check_email(&mut errors, &payload.email);
    validation::check_password(&mut errors, &payload.password);
    if let Some(name) = &payload.name {
        validation::check_name(&mut errors, name);
    }
    errors.into_result()?;

    let pool = DatabaseManager::pool().await?;
    let email = payload.email.trim().to_lowercase();

    let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&pool)
        .await?;
    if existing.is_some() {
        return Err(ApiError::conflict("An account with this email already exists"));
    }

    let password_hash = hash_password(&payload.password);

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (id, name, email, password_hash, image)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, name, email, password_hash, image, created_at, updated_at",
    )
    .bind(Uuid::new_v4())
    .bind(&payload.name)
    .bind(&email)
    .bind(&password_hash)
    .bind(&payload.image)
    .fetch_one(&pool)
    .await?;

    tracing::info!(user = %user.id, "user registered");

    Ok(ApiResponse::created(session_body(&user)?))
}
