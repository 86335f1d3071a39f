//! Request extractors

use axum::{extract::FromRequestParts, http::request::Parts, http::StatusCode};

use crate::domain::value_objects::UserId;

/// Header carrying the authenticated user's id
pub const USER_ID_HEADER: &str = "x-user-id";

/// The user a request is made on behalf of
#[derive(Debug, Clone, Copy)]
pub struct ActingUser(pub UserId);

impl<S> FromRequestParts<S> for ActingUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| (StatusCode::UNAUTHORIZED, "Not signed in".to_string()))?;

        raw.parse::<UserId>()
            .map(ActingUser)
            .map_err(|_| (StatusCode::UNAUTHORIZED, "Invalid user identity".to_string()))
    }
}
