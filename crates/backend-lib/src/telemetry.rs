// ============================
// livechat-backend-lib/src/telemetry.rs
// ============================
//! Log subscriber setup and the metric keys emitted by the handlers.
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, Settings};

pub const LOGIN_SUCCESS: &str = "auth.login.success";
pub const LOGIN_FAILURE: &str = "auth.login.failure";
pub const TOKEN_REJECTED: &str = "auth.token.rejected";
pub const USER_ADDED: &str = "users.added";
pub const PASSWORD_CHANGED: &str = "users.password_changed";
pub const PLATFORMS_SERVED: &str = "platforms.served";
pub const PLATFORMS_REPLACED: &str = "platforms.replaced";

/// Install the global tracing subscriber. `RUST_LOG` wins over `log_level`.
pub fn init_tracing(settings: &Settings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))?;

    let registry = tracing_subscriber::registry().with(filter);
    match settings.log_format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init()?,
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?,
    }
    Ok(())
}
