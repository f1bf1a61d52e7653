// ============================
// livechat-backend-lib/src/storage.rs
// ============================
//! Storage abstraction with flat-file implementation.
//!
//! Both stores are whole-file JSON documents. Every read reloads the file and
//! every write replaces it: the new content goes to a temporary file in the
//! same directory, which is then renamed over the old one. Writers of a store
//! are serialized by a per-store mutex; readers never wait.
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use livechat_common::UserRecord;
use serde::Serialize;
use serde_json::Value;
use tempfile::NamedTempFile;
use tokio::{fs as tokio_fs, sync::Mutex};
use tracing::{debug, warn};

use crate::config::Settings;
use crate::error::AppError;

/// Trait for storage backends
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the whole user store. Missing or malformed content is an error.
    async fn load_users(&self) -> Result<Vec<UserRecord>, AppError>;

    /// Replace the whole user store.
    async fn save_users(&self, users: &[UserRecord]) -> Result<(), AppError>;

    /// Reload, mutate and persist the user store as one critical section.
    ///
    /// The store is written back only when `f` returns `Ok`.
    async fn update_users<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Vec<UserRecord>) -> Result<T, AppError> + Send,
        T: Send;

    /// Read the platform store. Any read or parse failure yields `[]`.
    async fn load_platforms(&self) -> Value;

    /// Replace the platform store with `data`, verbatim.
    async fn save_platforms(&self, data: &Value) -> Result<(), AppError>;
}

/// Flat-file implementation of the Storage trait
#[derive(Clone)]
pub struct FlatFileStorage {
    users_path: PathBuf,
    platforms_path: PathBuf,
    users_lock: Arc<Mutex<()>>,
    platforms_lock: Arc<Mutex<()>>,
}

impl FlatFileStorage {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(users_path: P, platforms_path: Q) -> Self {
        Self {
            users_path: users_path.as_ref().to_path_buf(),
            platforms_path: platforms_path.as_ref().to_path_buf(),
            users_lock: Arc::new(Mutex::new(())),
            platforms_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Storage rooted at the paths named by `settings`
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.users_path(), settings.platforms_path())
    }

    pub fn users_path(&self) -> &Path {
        &self.users_path
    }

    pub fn platforms_path(&self) -> &Path {
        &self.platforms_path
    }

    /// Create the user store holding only `admin` if no store file exists yet.
    ///
    /// Returns `true` when a store was created.
    pub async fn seed_users(&self, admin: UserRecord) -> Result<bool, AppError> {
        let _guard = self.users_lock.lock().await;
        if tokio_fs::try_exists(&self.users_path).await? {
            return Ok(false);
        }
        write_json_atomic(&self.users_path, &vec![admin]).await?;
        Ok(true)
    }

    async fn read_users(&self) -> Result<Vec<UserRecord>, AppError> {
        let content = tokio_fs::read_to_string(&self.users_path).await?;
        let users = serde_json::from_str(&content)?;
        Ok(users)
    }
}

#[async_trait]
impl Storage for FlatFileStorage {
    async fn load_users(&self) -> Result<Vec<UserRecord>, AppError> {
        self.read_users().await
    }

    async fn save_users(&self, users: &[UserRecord]) -> Result<(), AppError> {
        let _guard = self.users_lock.lock().await;
        write_json_atomic(&self.users_path, &users).await
    }

    async fn update_users<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Vec<UserRecord>) -> Result<T, AppError> + Send,
        T: Send,
    {
        let _guard = self.users_lock.lock().await;
        let mut users = self.read_users().await?;
        let out = f(&mut users)?;
        write_json_atomic(&self.users_path, &users).await?;
        Ok(out)
    }

    async fn load_platforms(&self) -> Value {
        let content = match tokio_fs::read_to_string(&self.platforms_path).await {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %self.platforms_path.display(), error = %e, "platform store unreadable, serving empty list");
                return Value::Array(Vec::new());
            },
        };

        match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                warn!(path = %self.platforms_path.display(), error = %e, "platform store is not valid JSON, serving empty list");
                Value::Array(Vec::new())
            },
        }
    }

    async fn save_platforms(&self, data: &Value) -> Result<(), AppError> {
        let _guard = self.platforms_lock.lock().await;
        write_json_atomic(&self.platforms_path, data).await
    }
}

/// Pretty-print `value` and atomically replace `path` with it.
async fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), AppError> {
    let mut json = serde_json::to_vec_pretty(value)?;
    json.push(b'\n');

    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || -> Result<(), AppError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| AppError::Io(e.error))?;
        Ok(())
    })
    .await?
}
