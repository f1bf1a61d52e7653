//! `POST /login`
use std::sync::Arc;

use axum::{extract::State, Form, Json};
use livechat_common::{LoginForm, LoginResponse};

use crate::error::AppError;
use crate::storage::Storage;
use crate::AppState;

/// Exchange form-encoded credentials for a bearer token.
pub async fn login<S: Storage + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Form(form): Form<LoginForm>,
) -> Result<Json<LoginResponse>, AppError> {
    let token = state.auth.login(&form.username, &form.password).await?;
    Ok(Json(LoginResponse::bearer(token)))
}
