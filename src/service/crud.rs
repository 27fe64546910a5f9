//! Generic CRUD execution against SQLite.

use crate::error::AppError;
use crate::model::EntityDef;
use crate::query::ListQuery;
use crate::service::validation::Payload;
use crate::sql::{delete, insert, select_list, update, QueryBuf, SqliteBindValue};
use serde_json::Value;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Sqlite, SqlitePool};

pub struct CrudService;

impl CrudService {
    /// List rows matching the query; each row is a JSON object of the projected columns.
    pub async fn list(
        pool: &SqlitePool,
        entity: &EntityDef,
        query: &ListQuery,
    ) -> Result<Vec<Value>, AppError> {
        let q = select_list(entity, query);
        Self::query_many(pool, &q).await
    }

    /// Insert one row. Returns the stored row, including the assigned id.
    pub async fn create(
        pool: &SqlitePool,
        entity: &EntityDef,
        payload: &Payload,
    ) -> Result<Value, AppError> {
        let q = insert(entity, &payload.values);
        let row = Self::execute_returning_one(pool, &q)
            .await?
            .ok_or_else(|| AppError::Db(sqlx::Error::RowNotFound))?;
        Ok(row)
    }

    /// Update one row by id. Returns false when no row has that id.
    pub async fn update(
        pool: &SqlitePool,
        entity: &EntityDef,
        id: i64,
        payload: &Payload,
    ) -> Result<bool, AppError> {
        let q = update(entity, id, &payload.values);
        Ok(Self::execute(pool, &q).await? > 0)
    }

    /// Delete one row by id. Returns false when no row has that id.
    pub async fn delete(pool: &SqlitePool, entity: &EntityDef, id: i64) -> Result<bool, AppError> {
        let q = delete(entity, id);
        Ok(Self::execute(pool, &q).await? > 0)
    }

    fn bind_all<'q>(
        q: &'q QueryBuf,
    ) -> sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>> {
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(SqliteBindValue::from_json(p));
        }
        query
    }

    async fn query_many(pool: &SqlitePool, q: &QueryBuf) -> Result<Vec<Value>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows = Self::bind_all(q).fetch_all(pool).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn execute_returning_one(pool: &SqlitePool, q: &QueryBuf) -> Result<Option<Value>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = Self::bind_all(q).fetch_optional(pool).await?;
        Ok(row.map(|r| row_to_json(&r)))
    }

    async fn execute(pool: &SqlitePool, q: &QueryBuf) -> Result<u64, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "execute");
        let result = Self::bind_all(q).execute(pool).await?;
        Ok(result.rows_affected())
    }
}

fn row_to_json(row: &SqliteRow) -> Value {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = serde_json::Map::new();
    for col in row.columns() {
        let name = col.name();
        let v = cell_to_value(row, name);
        map.insert(name.to_string(), v);
    }
    Value::Object(map)
}

fn cell_to_value(row: &SqliteRow, name: &str) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    Value::Null
}
