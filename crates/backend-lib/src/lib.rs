// ============================
// livechat-backend-lib/src/lib.rs
// ============================
//! Core backend functionality for the live-chat dashboard API.
//!
//! The service authenticates users against a flat JSON user store and
//! serves a flat JSON list of platform chat counts. Tokens are usernames.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod storage;
pub mod telemetry;

use std::sync::Arc;

use crate::auth::{AuthService, DefaultAuth};
use crate::config::Settings;
use crate::storage::{FlatFileStorage, Storage};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState<S> {
    /// Authentication service
    pub auth: Arc<dyn AuthService>,
    /// Storage backend
    pub storage: S,
    /// Configuration settings
    pub settings: Arc<Settings>,
}

impl<S: Storage + Clone + 'static> AppState<S> {
    /// Create a new application state
    pub fn new(storage: S, settings: Settings) -> Self {
        let auth = Arc::new(DefaultAuth::new(
            storage.clone(),
            settings.admin_username.clone(),
        ));
        Self {
            auth,
            storage,
            settings: Arc::new(settings),
        }
    }
}

impl AppState<FlatFileStorage> {
    /// Create a new application state backed by the files named in `settings`
    pub fn from_settings(settings: Settings) -> Self {
        let storage = FlatFileStorage::from_settings(&settings);
        Self::new(storage, settings)
    }
}
