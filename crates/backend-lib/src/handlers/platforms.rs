//! Platform dashboard data: `GET /data` and `POST /update-platforms`.
use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use livechat_common::{DataResponse, PlatformRecord, SuccessResponse};
use metrics::counter;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use super::Authenticated;
use crate::error::AppError;
use crate::storage::Storage;
use crate::telemetry;
use crate::AppState;

/// Return the platform store as stored.
pub async fn get_data<S: Storage + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Authenticated(_): Authenticated,
) -> Result<Json<DataResponse>, AppError> {
    let data = state.storage.load_platforms().await;
    counter!(telemetry::PLATFORMS_SERVED).increment(1);
    Ok(Json(DataResponse { data }))
}

/// Replace the whole platform store with the request body. Admin only.
///
/// Any JSON document is accepted and stored verbatim; a payload that is not a
/// list of platform records is only reported in the log.
pub async fn update_platforms<S: Storage + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Authenticated(token): Authenticated,
    body: Bytes,
) -> Result<Json<SuccessResponse>, AppError> {
    state.auth.require_admin(&token)?;

    let payload: Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Request body is not valid JSON: {e}")))?;

    match Vec::<PlatformRecord>::deserialize(&payload) {
        Ok(rows) => info!(rows = rows.len(), "platform store replaced"),
        Err(e) => warn!(error = %e, "platform store replaced with a payload that is not a platform list"),
    }

    state.storage.save_platforms(&payload).await?;
    counter!(telemetry::PLATFORMS_REPLACED).increment(1);
    Ok(Json(SuccessResponse::ok()))
}
