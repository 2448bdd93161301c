use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::{generate_jwt, Claims};
use crate::database::models::User;
use crate::error::ApiError;

/// Client-facing user shape (never includes the password hash)
#[derive(Debug, Serialize)]
pub struct UserBody {
    pub id: uuid::Uuid,
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserBody {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            image: user.image.clone(),
            created_at: user.created_at,
        }
    }
}

/// Session payload returned by register and login
#[derive(Debug, Serialize)]
pub struct SessionBody {
    pub token: String,
    pub user: UserBody,
}

pub fn session_body(user: &User) -> Result<SessionBody, ApiError> {
    let token = generate_jwt(Claims::from(user)).map_err(|e| {
        tracing::error!("Failed to issue session token: {}", e);
        ApiError::internal_server_error("Failed to issue session token")
    })?;

    Ok(SessionBody {
        token,
        user: UserBody::from(user),
    })
}
