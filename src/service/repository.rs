//! Repository interface per entity kind and its SQLite implementation.

use crate::error::AppError;
use crate::model::Record;
use crate::query::ListQuery;
use crate::service::crud::CrudService;
use crate::service::validation::Payload;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::SqlitePool;
use std::marker::PhantomData;

#[async_trait]
pub trait Repository: Send + Sync {
    type Record: Record;

    /// Persist a new record and return it as stored.
    async fn create(&self, payload: Payload) -> Result<Self::Record, AppError>;

    /// One page of rows. Rows are JSON objects because `fields` may project a subset of columns.
    async fn list(&self, query: &ListQuery) -> Result<Vec<Value>, AppError>;

    /// Fails with [`AppError::NotFound`] when no record has `id`.
    async fn update_by_id(&self, id: i64, payload: Payload) -> Result<(), AppError>;

    /// Fails with [`AppError::NotFound`] when no record has `id`.
    async fn delete_by_id(&self, id: i64) -> Result<(), AppError>;
}

pub struct SqlRepository<R> {
    pool: SqlitePool,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> SqlRepository<R> {
    pub fn new(pool: SqlitePool) -> Self {
        SqlRepository {
            pool,
            _record: PhantomData,
        }
    }
}

fn not_found<R: Record>(id: i64) -> AppError {
    AppError::NotFound(format!("{} {}", R::entity().table_name, id))
}

#[async_trait]
impl<R: Record> Repository for SqlRepository<R> {
    type Record = R;

    async fn create(&self, payload: Payload) -> Result<R, AppError> {
        let row = CrudService::create(&self.pool, R::entity(), &payload).await?;
        serde_json::from_value(row).map_err(|e| AppError::Internal(format!("stored row: {}", e)))
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<Value>, AppError> {
        CrudService::list(&self.pool, R::entity(), query).await
    }

    async fn update_by_id(&self, id: i64, payload: Payload) -> Result<(), AppError> {
        if CrudService::update(&self.pool, R::entity(), id, &payload).await? {
            Ok(())
        } else {
            Err(not_found::<R>(id))
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), AppError> {
        if CrudService::delete(&self.pool, R::entity(), id).await? {
            Ok(())
        } else {
            Err(not_found::<R>(id))
        }
    }
}
