//! Bracket - tournament booking server

use anyhow::Context;
use bracket_core::AuthService;
use bracket_web::{router, AppState, Config};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.filter));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    tracing::info!("Starting Bracket");

    let addr = config.socket_addr();
    let state = AppState::from_config(config).context("Failed to open storage")?;

    // Sessions that expired while the server was down
    {
        let db = state.db()?;
        AuthService::new(&*db).purge_expired_sessions()?;
    }

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, router(state)).await?;
    Ok(())
}
