// ============================
// crates/backend-lib/src/handlers/mod.rs
// ============================
//! HTTP request handlers.
use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::BearerToken;
use crate::error::AppError;
use crate::storage::Storage;
use crate::AppState;

pub mod auth;
pub mod platforms;
pub mod users;

/// A bearer token that names a user in the live user store.
///
/// Rejects with 401 when the header is missing or the token is unknown.
#[derive(Debug, Clone)]
pub struct Authenticated(pub String);

impl<S> FromRequestParts<Arc<AppState<S>>> for Authenticated
where
    S: Storage + Clone + 'static,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState<S>>,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;
        state.auth.validate_token(&token).await?;
        Ok(Authenticated(token))
    }
}
