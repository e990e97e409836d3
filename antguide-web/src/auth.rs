//! Requester identity extraction
//!
//! Thin identity layer: the `x-user` header carries the username of the
//! authenticated requester, resolved against the users table. Registration
//! and login live outside this service; handlers only need "who is calling"
//! and the moderator capability bit.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use antguide_common::Error;

use crate::api::ApiError;
use crate::AppState;

/// Header naming the authenticated requester
pub const USER_HEADER: &str = "x-user";

/// The authenticated caller of a request
#[derive(Debug, Clone)]
pub struct Requester {
    pub id: i64,
    pub username: String,
    /// Elevated privilege: may list and review species suggestions
    pub is_moderator: bool,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Requester {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let username = parts
            .headers
            .get(USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::Authorization("login required".to_string()))?;

        let row: Option<(i64, String, bool)> =
            sqlx::query_as("SELECT id, username, is_moderator FROM users WHERE username = ?")
                .bind(username)
                .fetch_optional(&state.db)
                .await
                .map_err(Error::Database)?;

        let (id, username, is_moderator) =
            row.ok_or_else(|| Error::Authorization(format!("unknown user: {}", username)))?;

        Ok(Requester {
            id,
            username,
            is_moderator,
        })
    }
}
