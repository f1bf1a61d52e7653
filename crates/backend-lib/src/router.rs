// ============================
// livechat-backend-lib/src/router.rs
// ============================
//! HTTP router.
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Settings;
use crate::handlers::{auth, platforms, users};
use crate::storage::Storage;
use crate::AppState;

/// Create the API router
pub fn create_router<S: Storage + Clone + 'static>(
    state: Arc<AppState<S>>,
) -> anyhow::Result<Router> {
    let cors = cors_layer(&state.settings)?;

    Ok(Router::new()
        .route("/login", post(auth::login::<S>))
        .route("/data", get(platforms::get_data::<S>))
        .route("/add_user", post(users::add_user::<S>))
        .route("/change-password", post(users::change_password::<S>))
        .route("/update-platforms", post(platforms::update_platforms::<S>))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}

/// CORS for the single allowed origin, with credentials.
///
/// Requests from any other origin get no `Access-Control-Allow-Origin`.
///
/// Methods and headers are mirrored from the preflight request, which is how
/// "any" is expressed when credentials are allowed.
pub fn cors_layer(settings: &Settings) -> anyhow::Result<CorsLayer> {
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([settings.origin_header()?]))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}
