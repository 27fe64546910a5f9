//! Expert admin: CRUD REST backend for expert classes and menu banners on SQLite.

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod logging;
pub mod model;
pub mod query;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use auth::{Authenticator, Principal, StaticTokenAuthenticator};
pub use config::{AppConfig, LogFormat, RunMode};
pub use error::{AppError, ConfigError};
pub use logging::init_tracing;
pub use model::{ExpertClass, Menu, Record};
pub use query::{ListParams, ListQuery, QueryError};
pub use response::Envelope;
pub use routes::app;
pub use service::{CrudService, Repository, SqlRepository};
pub use state::AppState;
pub use store::{connect, ensure_tables};
