use std::net::SocketAddr;

use anyhow::Context;

mod app;
mod auth;
mod config;
mod db;
mod error;
mod lifecycle;
mod logs;
mod state;
mod store;

use crate::{
    auth::bootstrap::{ensure_demo_user, DemoAccount},
    config::AppConfig,
    db::Database,
    lifecycle::Drain,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "authgate=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;

    // The only fatal startup failure: no usable store.
    let db = Database::connect(&config.database_url).await?;

    match ensure_demo_user(&db, &config.demo.username, &config.demo.password).await {
        Ok(DemoAccount::Created | DemoAccount::AlreadyPresent) => {}
        Err(e) => tracing::warn!(error = %e, "demo user bootstrap failed; continuing"),
    }

    tokio::task::spawn_blocking(auth::password::prepare_decoy)
        .await
        .context("prepare decoy hash")?;

    let app = app::build_app(AppState::new(&db));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("parse listen address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    tracing::info!("listening on {}", addr);

    match lifecycle::serve_until(
        listener,
        app,
        lifecycle::shutdown_signal(),
        config.shutdown_grace,
    )
    .await?
    {
        Drain::Completed => {
            db.close().await;
            tracing::info!("shutdown complete");
            Ok(())
        }
        Drain::TimedOut => {
            tracing::error!(
                grace_secs = config.shutdown_grace.as_secs(),
                "forcing exit with requests still in flight"
            );
            std::process::exit(1);
        }
    }
}
