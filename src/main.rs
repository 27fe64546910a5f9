//! Server: reads config, sets up logging, opens SQLite, ensures tables, serves the API.

use expert_admin::{app, connect, ensure_tables, init_tracing, AppConfig, AppState};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    let _log_guard = init_tracing(&config)?;
    tracing::info!(mode = ?config.run_mode, "starting expert-admin");

    let pool = connect(&config).await?;
    ensure_tables(&pool).await?;

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(pool, config);
    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
