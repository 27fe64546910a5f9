//! Entity CRUD handlers: create, list, update, delete. Generic over the record type.

use crate::error::AppError;
use crate::extractors::Caller;
use crate::model::Record;
use crate::query::{ListParams, ListQuery};
use crate::response::Envelope;
use crate::service::{parse_id, Payload};
use crate::state::EntityState;
use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, QueryRejection},
        Path, Query, State,
    },
};
use serde_json::Value;

/// Oversized or unreadable bodies become validation errors.
fn read_body(body: Result<Bytes, BytesRejection>) -> Result<Bytes, AppError> {
    body.map_err(|e| AppError::Validation(e.body_text()))
}

pub async fn list<R: Record>(
    State(state): State<EntityState<R>>,
    _caller: Caller,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Envelope<Vec<Value>>, AppError> {
    let Query(params) = params.map_err(|e| AppError::Validation(e.body_text()))?;
    let query = ListQuery::parse(&params, R::entity())?;
    let rows = state.repository.list(&query).await?;
    Ok(Envelope::ok(rows))
}

pub async fn create<R: Record>(
    State(state): State<EntityState<R>>,
    _caller: Caller,
    body: Result<Bytes, BytesRejection>,
) -> Result<Envelope<R>, AppError> {
    let payload = Payload::for_create::<R>(&read_body(body)?)?;
    let record = state.repository.create(payload).await?;
    tracing::info!(entity = R::entity().table_name, "record created");
    Ok(Envelope::ok(record))
}

pub async fn update<R: Record>(
    State(state): State<EntityState<R>>,
    Path(id_str): Path<String>,
    _caller: Caller,
    body: Result<Bytes, BytesRejection>,
) -> Result<Envelope<()>, AppError> {
    let id = parse_id(&id_str)?;
    let payload = Payload::for_update::<R>(&read_body(body)?)?;
    state.repository.update_by_id(id, payload).await?;
    tracing::info!(entity = R::entity().table_name, id, "record updated");
    Ok(Envelope::empty())
}

pub async fn delete<R: Record>(
    State(state): State<EntityState<R>>,
    Path(id_str): Path<String>,
    _caller: Caller,
) -> Result<Envelope<()>, AppError> {
    let id = parse_id(&id_str)?;
    state.repository.delete_by_id(id).await?;
    tracing::info!(entity = R::entity().table_name, id, "record deleted");
    Ok(Envelope::empty())
}
