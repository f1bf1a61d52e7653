// ============================
// livechat-backend-lib/src/auth/bearer.rs
// ============================
//! `Authorization: Bearer <token>` extraction.
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use crate::error::AppError;

/// The raw bearer token presented by the caller.
///
/// Extraction only checks the header shape; whether the token names a known
/// user is decided by [`AuthService::validate_token`](super::AuthService::validate_token).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

impl BearerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the bearer token out of request headers.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
        let (scheme, token) = value.split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return None;
        }
        Some(BearerToken(token.trim().to_string()))
    }
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))
    }
}
