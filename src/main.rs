//! leadsite server: form intake and the blog content API.
//!
//! Usage: `leadsite` (reads `~/.leadsite/config.json` or `$LEADSITE_CONFIG`).
//! `RUST_LOG` controls log output, default `info`.

use std::sync::Arc;

use leadsite::http::build_router;
use leadsite::state::{database_path, load_config, AppState};
use leadsite::store::SqliteStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load leadsite config: {e}"))?;

    let db_path = database_path(&config).map_err(|e| anyhow::anyhow!(e))?;
    let store = SqliteStore::open_at(&db_path)
        .map_err(|e| anyhow::anyhow!("Failed to open database at {}: {e}", db_path.display()))?;
    log::info!("Lead database at {}", db_path.display());

    if !config.content_dir.is_dir() {
        log::warn!(
            "Content directory {} does not exist; post listings will be empty",
            config.content_dir.display()
        );
    }

    let bind_addr = config.bind_addr.clone();
    let app = build_router(AppState::new(config, Arc::new(store)));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {bind_addr}: {e}"))?;
    log::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}
