//! Entity CRUD routes: `/` for list and create, `/:id` for update and delete.

use crate::handlers::entity::{create, delete as delete_handler, list, update};
use crate::model::Record;
use crate::state::EntityState;
use axum::{routing::get, routing::put, Router};

pub fn entity_routes<R: Record>(state: EntityState<R>) -> Router {
    Router::new()
        .route("/", get(list::<R>).post(create::<R>))
        .route("/:id", put(update::<R>).delete(delete_handler::<R>))
        .with_state(state)
}
