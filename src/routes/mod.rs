//! Router assembly.

mod common;
mod entity;

pub use common::common_routes;
pub use entity::entity_routes;

use crate::config::RunMode;
use crate::model::{ExpertClass, Menu, Record};
use crate::state::{AppState, EntityState};
use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Prefix for every entity router.
pub const API_PREFIX: &str = "/v1";

fn entity_path<R: Record>() -> String {
    format!("{}/{}", API_PREFIX, R::entity().path_segment)
}

/// Full application: operational routes, one router per entity, optional docs, tracing and body limit.
pub fn app(state: AppState) -> Router {
    let expert_classes = EntityState::<ExpertClass>::new(
        state.expert_classes.clone(),
        state.authenticator.clone(),
    );
    let menus = EntityState::<Menu>::new(state.menus.clone(), state.authenticator.clone());

    let mut router = Router::new()
        .merge(common_routes(state.pool.clone()))
        .nest(&entity_path::<ExpertClass>(), entity_routes(expert_classes))
        .nest(&entity_path::<Menu>(), entity_routes(menus));

    if state.config.run_mode == RunMode::Prod {
        if state.config.docs_dir.is_dir() {
            router = router.nest_service("/docs", ServeDir::new(&state.config.docs_dir));
        } else {
            tracing::warn!(dir = %state.config.docs_dir.display(), "docs directory not found; /docs disabled");
        }
    }

    router
        .layer(DefaultBodyLimit::max(state.config.body_limit_bytes))
        .layer(TraceLayer::new_for_http())
}
