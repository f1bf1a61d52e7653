use async_trait::async_trait;
use metrics::counter;
use tracing::{info, warn};

use crate::error::AppError;
use crate::storage::Storage;
use crate::telemetry;

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials against the user store and issue a token.
    async fn login(&self, username: &str, password: &str) -> Result<String, AppError>;
    /// Check that `token` names a user currently in the store.
    async fn validate_token(&self, token: &str) -> Result<(), AppError>;
    /// Check that `token` is the privileged identity.
    fn require_admin(&self, token: &str) -> Result<(), AppError>;
}

pub struct DefaultAuth<S> {
    storage: S,
    admin_username: String,
}

impl<S> DefaultAuth<S> {
    pub fn new(storage: S, admin_username: impl Into<String>) -> Self {
        Self {
            storage,
            admin_username: admin_username.into(),
        }
    }
}

#[async_trait]
impl<S: Storage> AuthService for DefaultAuth<S> {
    async fn login(&self, username: &str, password: &str) -> Result<String, AppError> {
        let users = self.storage.load_users().await?;
        match users
            .iter()
            .find(|u| u.username == username && u.password == password)
        {
            Some(user) => {
                counter!(telemetry::LOGIN_SUCCESS).increment(1);
                info!(username = %user.username, "login succeeded");
                Ok(user.username.clone())
            },
            None => {
                counter!(telemetry::LOGIN_FAILURE).increment(1);
                warn!(username, "login rejected");
                Err(AppError::Unauthorized(
                    "Incorrect username or password".to_string(),
                ))
            },
        }
    }

    async fn validate_token(&self, token: &str) -> Result<(), AppError> {
        let users = self.storage.load_users().await?;
        if users.iter().any(|u| u.username == token) {
            return Ok(());
        }
        counter!(telemetry::TOKEN_REJECTED).increment(1);
        warn!("request with unknown token rejected");
        Err(AppError::Unauthorized("Invalid token".to_string()))
    }

    fn require_admin(&self, token: &str) -> Result<(), AppError> {
        if token == self.admin_username {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin privileges required".to_string()))
        }
    }
}
