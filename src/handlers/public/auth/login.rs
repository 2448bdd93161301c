use std::sync::Arc;

use axum::{http::HeaderMap, Extension, Json};
use serde::Deserialize;

use crate::auth::verify_password;
use crate::database::manager::DatabaseManager;
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, LoginAttemptTracker};
use crate::validation;

use super::utils::{session_body, SessionBody};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Identifier used for attempt tracking: the submitted email, falling back
/// to the forwarded client address, falling back to a fixed sentinel. The
/// tracker treats it as an opaque key.
fn attempt_identifier(email: &str, headers: &HeaderMap) -> String {
    let email = email.trim();
    if !email.is_empty() {
        return email.to_lowercase();
    }
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// POST /auth/login - verify credentials and issue a session token.
///
/// The attempt tracker gates verification: a locked identifier answers 429
/// with the remaining lockout seconds, a failed verification records one
/// more failure, a successful one clears the record.
pub async fn login_post(
    Extension(tracker): Extension<Arc<LoginAttemptTracker>>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<SessionBody> {
    let identifier = attempt_identifier(&payload.email, &headers);

    let status = tracker.check_locked(&identifier);
    if status.locked {
        return Err(ApiError::account_locked(status.remaining_seconds));
    }

    let mut errors = validation::FieldErrors::new();
    validation::check_email(&mut errors, &payload.email);
    if payload.password.is_empty() {
        errors.add("password", "Password is required");
    }
    errors.into_result()?;

    let pool = DatabaseManager::pool().await?;
    let email = payload.email.trim().to_lowercase();

    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password_hash, image, created_at, updated_at
         FROM users WHERE email = $1",
    )
    .bind(&email)
    .fetch_optional(&pool)
    .await?;

    // Same failure path whether the email exists or not
    let Some(user) = user.filter(|u| verify_password(&payload.password, &u.password_hash)) else {
        tracker.record_failure(&identifier);
        return Err(ApiError::unauthorized("Invalid email or password"));
    };

    tracker.clear(&identifier);
    tracing::info!(user = %user.id, "login succeeded");

    Ok(ApiResponse::success(session_body(&user)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn identifier_prefers_email() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.9"));
        assert_eq!(attempt_identifier("User@Example.com", &headers), "user@example.com");
    }

    #[test]
    fn identifier_falls_back_to_forwarded_address() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.9"));
        assert_eq!(attempt_identifier("", &headers), "203.0.113.9");
    }

    #[test]
    fn identifier_falls_back_to_sentinel() {
        let headers = HeaderMap::new();
        assert_eq!(attempt_identifier("  ", &headers), "unknown");
    }
}
