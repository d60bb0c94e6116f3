//! Caller identity extraction.

use super::server::AppState;
use crate::error::TodoError;
use crate::types::UserId;
use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};

/// The verified caller, resolved from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub token: String,
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = TodoError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(TodoError::unauthenticated)?;
        let user_id = state
            .db
            .resolve_session(token)?
            .ok_or_else(TodoError::unauthenticated)?;

        Ok(CurrentUser {
            user_id,
            token: token.to_string(),
        })
    }
}
