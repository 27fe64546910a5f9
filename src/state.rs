//! Application context built once at startup and handed to the routers.

use crate::auth::{Authenticator, StaticTokenAuthenticator};
use crate::config::AppConfig;
use crate::model::{ExpertClass, Menu, Record};
use crate::service::{Repository, SqlRepository};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<AppConfig>,
    pub authenticator: Arc<dyn Authenticator>,
    pub expert_classes: Arc<dyn Repository<Record = ExpertClass>>,
    pub menus: Arc<dyn Repository<Record = Menu>>,
}

impl AppState {
    /// SQLite repositories and a static-token authenticator from `config.api_tokens`.
    pub fn new(pool: SqlitePool, config: AppConfig) -> Self {
        let authenticator = StaticTokenAuthenticator::new(config.api_tokens.iter().cloned());
        if authenticator.is_empty() {
            tracing::warn!("API_TOKENS is empty; token-protected endpoints will reject every request");
        }
        Self::with_authenticator(pool, config, Arc::new(authenticator))
    }

    pub fn with_authenticator(
        pool: SqlitePool,
        config: AppConfig,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        AppState {
            expert_classes: Arc::new(SqlRepository::<ExpertClass>::new(pool.clone())),
            menus: Arc::new(SqlRepository::<Menu>::new(pool.clone())),
            pool,
            config: Arc::new(config),
            authenticator,
        }
    }
}

/// State of one entity's router: its repository plus the authenticator when the
/// entity is token-protected.
pub struct EntityState<R: Record> {
    pub repository: Arc<dyn Repository<Record = R>>,
    pub authenticator: Option<Arc<dyn Authenticator>>,
}

impl<R: Record> EntityState<R> {
    pub fn new(
        repository: Arc<dyn Repository<Record = R>>,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        EntityState {
            repository,
            authenticator: R::entity().requires_token.then_some(authenticator),
        }
    }
}

impl<R: Record> Clone for EntityState<R> {
    fn clone(&self) -> Self {
        EntityState {
            repository: Arc::clone(&self.repository),
            authenticator: self.authenticator.clone(),
        }
    }
}
