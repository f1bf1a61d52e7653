use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use livechat_backend_lib::{
    config::Settings,
    router,
    storage::{FlatFileStorage, Storage},
    telemetry, AppState,
};
use livechat_common::UserRecord;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Live-chat dashboard API server
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// TOML config file; defaults to ./config.toml or ./config.json when present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Directory holding users.json and platforms.json
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Create the user store with the admin account if it does not exist
    #[arg(long, value_name = "PASSWORD")]
    seed_admin_password: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    if let Some(bind) = cli.bind {
        settings.bind_addr = bind;
    }
    if let Some(dir) = cli.data_dir {
        settings.data_dir = dir;
    }
    settings.validate()?;

    telemetry::init_tracing(&settings)?;

    let storage = FlatFileStorage::from_settings(&settings);

    if let Some(password) = cli.seed_admin_password {
        let admin = UserRecord::new(settings.admin_username.clone(), password);
        if storage.seed_users(admin).await? {
            info!(path = %storage.users_path().display(), "created user store with the admin account");
        } else {
            warn!("user store already exists, --seed-admin-password ignored");
        }
    }

    // A missing or corrupt user store is fatal at startup
    let users = storage.load_users().await.with_context(|| {
        format!(
            "cannot load user store {}",
            storage.users_path().display()
        )
    })?;
    info!(users = users.len(), "user store loaded");

    let state = Arc::new(AppState::new(storage, settings.clone()));
    let app = router::create_router(state)?;

    let listener = TcpListener::bind(settings.bind_addr).await?;
    info!(addr = %settings.bind_addr, origin = %settings.allowed_origin, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
