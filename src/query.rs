//! List query descriptor: parses the string-encoded `query`, `fields`, `sortby`,
//! `order`, `limit` and `offset` parameters into a validated [`ListQuery`].
//!
//! Column names are resolved against the entity definition, so only known
//! identifiers ever reach the SQL builder. Filter values stay values and are
//! bound as statement parameters.

use crate::model::{ColumnDef, ColumnKind, EntityDef};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 1000;

/// Separator between a column and its lookup operator in a filter key (`name__icontains`).
const LOOKUP_SEPARATOR: &str = "__";
/// Separator between values of an `in` lookup (`type__in:1|2`).
const IN_SEPARATOR: char = '|';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("invalid query key/value pair: '{0}'")]
    MalformedPair(String),
    #[error("invalid query key: '{0}'")]
    MalformedKey(String),
    #[error("unknown column '{0}'")]
    UnknownColumn(String),
    #[error("unknown lookup operator '{0}'")]
    UnknownOperator(String),
    #[error("invalid value '{value}' for column '{column}'")]
    InvalidValue { column: String, value: String },
    #[error("invalid order '{0}', must be either asc or desc")]
    InvalidOrder(String),
    #[error("'sortby' and 'order' sizes mismatch ({sortby} vs {order}) and 'order' size is not 1")]
    OrderMismatch { sortby: usize, order: usize },
    #[error("unused 'order' fields: no 'sortby' given")]
    UnusedOrder,
}

/// Raw list parameters as they arrive on the query string.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ListParams {
    pub query: Option<String>,
    pub fields: Option<String>,
    pub sortby: Option<String>,
    pub order: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SortKey {
    pub column: &'static str,
    pub order: SortOrder,
}

/// Condition applied to one column. Values are already coerced to the column kind.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    Eq(Value),
    /// Case-insensitive equality.
    IEq(String),
    Contains(String),
    IContains(String),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    In(Vec<Value>),
    IsNull(bool),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    pub column: &'static str,
    pub predicate: Predicate,
}

/// Validated list request. All filters are ANDed.
#[derive(Clone, Debug, PartialEq)]
pub struct ListQuery {
    pub filters: Vec<Filter>,
    /// Projection; empty means every column.
    pub fields: Vec<&'static str>,
    pub sort: Vec<SortKey>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        ListQuery {
            filters: Vec::new(),
            fields: Vec::new(),
            sort: Vec::new(),
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl ListQuery {
    pub fn parse(params: &ListParams, entity: &EntityDef) -> Result<Self, QueryError> {
        let fields = match non_empty(&params.fields) {
            Some(v) => split_list(v)
                .map(|name| resolve_column(entity, name).map(|c| c.name))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        let sort = parse_sort(entity, non_empty(&params.sortby), non_empty(&params.order))?;
        let filters = match non_empty(&params.query) {
            Some(v) => parse_filters(entity, v)?,
            None => Vec::new(),
        };
        // Unparsable limit/offset fall back to the defaults rather than failing.
        // A zero limit also means the default page size.
        let limit = params
            .limit
            .as_deref()
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT);
        let offset = params
            .offset
            .as_deref()
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(0);
        Ok(ListQuery {
            filters,
            fields,
            sort,
            limit,
            offset,
        })
    }
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

fn split_list(v: &str) -> impl Iterator<Item = &str> {
    v.split(',').map(str::trim)
}

fn resolve_column(entity: &EntityDef, name: &str) -> Result<&'static ColumnDef, QueryError> {
    entity
        .column(name)
        .ok_or_else(|| QueryError::UnknownColumn(name.to_string()))
}

fn parse_sort(
    entity: &EntityDef,
    sortby: Option<&str>,
    order: Option<&str>,
) -> Result<Vec<SortKey>, QueryError> {
    let Some(sortby) = sortby else {
        return match order {
            Some(_) => Err(QueryError::UnusedOrder),
            None => Ok(Vec::new()),
        };
    };
    let columns = split_list(sortby)
        .map(|name| resolve_column(entity, name).map(|c| c.name))
        .collect::<Result<Vec<_>, _>>()?;
    let orders = split_list(order.unwrap_or(""))
        .filter(|s| !s.is_empty())
        .map(parse_order)
        .collect::<Result<Vec<_>, _>>()?;

    let orders = match orders.len() {
        1 => vec![orders[0]; columns.len()],
        n if n == columns.len() => orders,
        n => {
            return Err(QueryError::OrderMismatch {
                sortby: columns.len(),
                order: n,
            })
        }
    };
    Ok(columns
        .into_iter()
        .zip(orders)
        .map(|(column, order)| SortKey { column, order })
        .collect())
}

fn parse_order(s: &str) -> Result<SortOrder, QueryError> {
    match s {
        "asc" => Ok(SortOrder::Asc),
        "desc" => Ok(SortOrder::Desc),
        other => Err(QueryError::InvalidOrder(other.to_string())),
    }
}

fn key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid filter key pattern")
    })
}

/// Parse `k:v,k:v`. Stops at the first malformed pair.
fn parse_filters(entity: &EntityDef, raw: &str) -> Result<Vec<Filter>, QueryError> {
    let mut filters = Vec::new();
    for cond in raw.split(',') {
        let (key, value) = cond
            .split_once(':')
            .filter(|(k, _)| !k.is_empty())
            .ok_or_else(|| QueryError::MalformedPair(cond.to_string()))?;
        filters.push(parse_filter(entity, key, value)?);
    }
    Ok(filters)
}

fn parse_filter(entity: &EntityDef, key: &str, value: &str) -> Result<Filter, QueryError> {
    if !key_pattern().is_match(key) {
        return Err(QueryError::MalformedKey(key.to_string()));
    }
    let (name, op) = match key.split_once(LOOKUP_SEPARATOR) {
        Some((name, op)) => (name, op),
        None => (key, "exact"),
    };
    let column = resolve_column(entity, name)?;
    let predicate = match op {
        "exact" => Predicate::Eq(coerce(column, value)?),
        "iexact" => Predicate::IEq(value.to_string()),
        "contains" => Predicate::Contains(value.to_string()),
        "icontains" => Predicate::IContains(value.to_string()),
        "gt" => Predicate::Gt(coerce(column, value)?),
        "gte" => Predicate::Gte(coerce(column, value)?),
        "lt" => Predicate::Lt(coerce(column, value)?),
        "lte" => Predicate::Lte(coerce(column, value)?),
        "in" => Predicate::In(
            value
                .split(IN_SEPARATOR)
                .map(|v| coerce(column, v))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        "isnull" => match value {
            "true" | "1" => Predicate::IsNull(true),
            "false" | "0" => Predicate::IsNull(false),
            _ => return Err(invalid_value(column, value)),
        },
        other => return Err(QueryError::UnknownOperator(other.to_string())),
    };
    Ok(Filter {
        column: column.name,
        predicate,
    })
}

fn coerce(column: &ColumnDef, value: &str) -> Result<Value, QueryError> {
    match column.kind {
        ColumnKind::Integer => value
            .trim()
            .parse::<i64>()
            .map(|n| Value::Number(n.into()))
            .map_err(|_| invalid_value(column, value)),
        ColumnKind::Text | ColumnKind::Timestamp => Ok(Value::String(value.to_string())),
    }
}

fn invalid_value(column: &ColumnDef, value: &str) -> QueryError {
    QueryError::InvalidValue {
        column: column.name.to_string(),
        value: value.to_string(),
    }
}
