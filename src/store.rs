//! SQLite pool bootstrap and table creation.

use crate::config::AppConfig;
use crate::error::AppError;
use crate::model::{EntityDef, ExpertClass, Menu, Record};
use crate::sql::create_table;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

/// Every table this service owns.
pub fn entities() -> [&'static EntityDef; 2] {
    [ExpertClass::entity(), Menu::entity()]
}

/// Open the pool, creating the database file (and its directory) when missing.
pub async fn connect(config: &AppConfig) -> Result<SqlitePool, AppError> {
    let opts = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(config.busy_timeout_secs));

    let file = opts.get_filename();
    if let Some(dir) = file.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| AppError::Internal(format!("create {}: {}", dir.display(), e)))?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(opts)
        .await?;
    tracing::info!(url = %config.database_url, max_connections = config.max_connections, "database connected");
    Ok(pool)
}

/// CREATE TABLE IF NOT EXISTS for every entity.
pub async fn ensure_tables(pool: &SqlitePool) -> Result<(), AppError> {
    for entity in entities() {
        let ddl = create_table(entity);
        tracing::debug!(sql = %ddl, "ensure table");
        sqlx::query(&ddl).execute(pool).await?;
    }
    Ok(())
}
