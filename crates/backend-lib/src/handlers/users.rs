//! User management: `POST /add_user` and `POST /change-password`.
use std::sync::Arc;

use axum::{extract::State, Json};
use livechat_common::{
    AddUserRequest, ChangePasswordRequest, MessageResponse, SuccessResponse, UserRecord,
};
use metrics::counter;
use tracing::info;

use super::Authenticated;
use crate::auth::validate_new_password;
use crate::error::AppError;
use crate::storage::Storage;
use crate::telemetry;
use crate::AppState;

/// Append a new user. Admin only; usernames must be unique.
pub async fn add_user<S: Storage + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Authenticated(token): Authenticated,
    Json(req): Json<AddUserRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state.auth.require_admin(&token)?;

    let username = req.username.clone();
    state
        .storage
        .update_users(move |users| {
            if users.iter().any(|u| u.username == req.username) {
                return Err(AppError::BadRequest("User already exists".to_string()));
            }
            users.push(UserRecord::new(req.username, req.password));
            Ok(())
        })
        .await?;

    counter!(telemetry::USER_ADDED).increment(1);
    info!(%username, added_by = %token, "user added");
    Ok(Json(MessageResponse {
        msg: "User added successfully".to_string(),
    }))
}

/// Change the caller's own password.
pub async fn change_password<S: Storage + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Authenticated(username): Authenticated,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    validate_new_password(&req.new_password, state.settings.min_password_length)?;

    // The token was checked against an earlier snapshot; the user may have
    // vanished since, so look it up again in the snapshot being written.
    let target = username.clone();
    state
        .storage
        .update_users(move |users| {
            let user = users
                .iter_mut()
                .find(|u| u.username == target)
                .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
            user.password = req.new_password;
            Ok(())
        })
        .await?;

    counter!(telemetry::PASSWORD_CHANGED).increment(1);
    info!(%username, "password changed");
    Ok(Json(SuccessResponse::ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::router::create_router;
    use crate::storage::FlatFileStorage;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    /// Storage whose token check still sees `ghost`, although the file the
    /// locked update reads no longer contains it.
    #[derive(Clone)]
    struct StaleReadStorage {
        inner: FlatFileStorage,
    }

    #[async_trait]
    impl Storage for StaleReadStorage {
        async fn load_users(&self) -> Result<Vec<UserRecord>, AppError> {
            let mut users = self.inner.load_users().await?;
            users.push(UserRecord::new("ghost", "boo1"));
            Ok(users)
        }

        async fn save_users(&self, users: &[UserRecord]) -> Result<(), AppError> {
            self.inner.save_users(users).await
        }

        async fn update_users<F, T>(&self, f: F) -> Result<T, AppError>
        where
            F: FnOnce(&mut Vec<UserRecord>) -> Result<T, AppError> + Send,
            T: Send,
        {
            self.inner.update_users(f).await
        }

        async fn load_platforms(&self) -> Value {
            self.inner.load_platforms().await
        }

        async fn save_platforms(&self, data: &Value) -> Result<(), AppError> {
            self.inner.save_platforms(data).await
        }
    }

    #[tokio::test]
    async fn test_change_password_user_vanished_before_update() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings {
            data_dir: temp_dir.path().to_path_buf(),
            ..Settings::default()
        };
        let inner = FlatFileStorage::from_settings(&settings);
        let users = vec![
            UserRecord::new("admin", "secret"),
            UserRecord::new("bob", "pw12"),
        ];
        inner.save_users(&users).await.unwrap();
        let before = std::fs::read_to_string(inner.users_path()).unwrap();

        let storage = StaleReadStorage {
            inner: inner.clone(),
        };
        let app = create_router(Arc::new(AppState::new(storage, settings))).unwrap();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/change-password")
            .header(header::AUTHORIZATION, "Bearer ghost")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"new_password": "abcd"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "NF_001");

        assert_eq!(inner.load_users().await.unwrap(), users);
        assert_eq!(std::fs::read_to_string(inner.users_path()).unwrap(), before);
    }
}
