// ============================
// livechat-backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use axum::http::HeaderValue;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::auth::MIN_PASSWORD_LENGTH;

/// Prefix of environment variables that override file settings
pub const ENV_PREFIX: &str = "LIVECHAT_";

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Directory holding both store files
    pub data_dir: PathBuf,
    /// User store file name, relative to `data_dir`
    pub users_file: String,
    /// Platform store file name, relative to `data_dir`
    pub platforms_file: String,
    /// The single web origin allowed to call the API cross-origin
    pub allowed_origin: String,
    /// Username whose token unlocks the admin-only endpoints
    pub admin_username: String,
    /// Minimum length accepted by change-password
    pub min_password_length: usize,
    /// Log filter directives used when `RUST_LOG` is unset
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            data_dir: PathBuf::from("."),
            users_file: "users.json".to_string(),
            platforms_file: "platforms.json".to_string(),
            allowed_origin: "https://livechat-frontend-self.vercel.app".to_string(),
            admin_username: "admin".to_string(),
            min_password_length: MIN_PASSWORD_LENGTH,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Settings {
    /// Load settings from `config.toml`/`config.json` in the working directory
    /// and `LIVECHAT_*` environment variables, on top of the defaults.
    pub fn load() -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("config.toml"))
            .merge(Json::file("config.json"));
        Self::extract(figment)
    }

    /// Load settings from an explicit TOML file plus the environment.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            bail!("config file {} does not exist", path.display());
        }
        let figment =
            Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file(path));
        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Self> {
        let settings: Settings = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.admin_username.is_empty() {
            bail!("admin_username must not be empty");
        }
        if self.min_password_length == 0 {
            bail!("min_password_length must be at least 1");
        }
        if let Err(e) = EnvFilter::try_new(&self.log_level) {
            bail!("invalid log_level {:?}: {e}", self.log_level);
        }
        if self.users_file.is_empty() || self.platforms_file.is_empty() {
            bail!("store file names must not be empty");
        }
        if self.users_file == self.platforms_file {
            bail!("users_file and platforms_file must differ");
        }
        self.origin_header()?;
        Ok(())
    }

    /// The allowed origin as a header value
    pub fn origin_header(&self) -> Result<HeaderValue> {
        match HeaderValue::from_str(self.allowed_origin.trim_end_matches('/')) {
            Ok(value) if !self.allowed_origin.is_empty() => Ok(value),
            _ => bail!("allowed_origin {:?} is not a valid origin", self.allowed_origin),
        }
    }

    /// Full path of the user store
    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(&self.users_file)
    }

    /// Full path of the platform store
    pub fn platforms_path(&self) -> PathBuf {
        self.data_dir.join(&self.platforms_file)
    }
}
