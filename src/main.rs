use anyhow::Context;
use skyfare_api::{app, config, database, is_development, state::AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SESSION_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::config();
    tracing::info!("Starting Skyfare API in {:?} mode", config.environment);

    if config.security.session_secret.is_empty() {
        anyhow::bail!("SESSION_SECRET must be set outside development");
    }
    if config.database.url.is_none() && !is_development!() {
        tracing::warn!("No DATABASE_URL outside development; data will not survive a restart");
    }

    let store = database::open_store(&config.database)
        .await
        .context("failed to open document store")?;

    let state = AppState::new(config.clone(), store);
    state.prepare().await.context("failed to seed default roles")?;

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Skyfare API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}
