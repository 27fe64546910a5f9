//! Builds parameterized CREATE TABLE, SELECT, INSERT, UPDATE, DELETE from an entity definition.

use crate::model::{ColumnDef, ColumnKind, ColumnRole, EntityDef};
use crate::query::{ListQuery, Predicate};
use serde_json::Value;

/// Quote identifier for SQLite (safe: only from entity definitions).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// Returns the `$n` placeholder for the pushed value.
    fn push_param(&mut self, v: Value) -> String {
        self.params.push(v);
        format!("${}", self.params.len())
    }
}

fn column_list<'a>(columns: impl Iterator<Item = &'a str>) -> String {
    columns.map(quoted).collect::<Vec<_>>().join(", ")
}

fn all_columns(entity: &EntityDef) -> String {
    column_list(entity.columns.iter().map(|c| c.name))
}

/// Escape LIKE wildcards so the value matches literally (paired with `ESCAPE '\'`).
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// CREATE TABLE IF NOT EXISTS with an AUTOINCREMENT key so ids are never reused.
pub fn create_table(entity: &EntityDef) -> String {
    let defs: Vec<String> = entity
        .columns
        .iter()
        .map(|c| {
            let name = quoted(c.name);
            match (c.role, c.kind) {
                (ColumnRole::PrimaryKey, _) => format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", name),
                (ColumnRole::Data, ColumnKind::Integer) => {
                    format!("{} INTEGER NOT NULL DEFAULT 0", name)
                }
                (ColumnRole::Data, _) => format!("{} TEXT NOT NULL DEFAULT ''", name),
                (ColumnRole::CreatedAt | ColumnRole::UpdatedAt, kind) => {
                    format!("{} {}", name, kind.sql_type())
                }
            }
        })
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quoted(entity.table_name),
        defs.join(", ")
    )
}

/// SELECT list: projection, ANDed filters, ORDER BY (pk when no sort given), LIMIT/OFFSET.
/// Every filter value is bound as a parameter; only entity column names are interpolated.
pub fn select_list(entity: &EntityDef, query: &ListQuery) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = quoted(entity.table_name);
    let cols = if query.fields.is_empty() {
        all_columns(entity)
    } else {
        column_list(query.fields.iter().copied())
    };

    let mut where_parts = Vec::new();
    for f in &query.filters {
        let col = quoted(f.column);
        let part = match &f.predicate {
            Predicate::Eq(v) => format!("{} = {}", col, q.push_param(v.clone())),
            Predicate::IEq(s) => format!(
                "{} = {} COLLATE NOCASE",
                col,
                q.push_param(Value::String(s.clone()))
            ),
            Predicate::Contains(s) => format!(
                "instr({}, {}) > 0",
                col,
                q.push_param(Value::String(s.clone()))
            ),
            Predicate::IContains(s) => format!(
                "{} LIKE {} ESCAPE '\\'",
                col,
                q.push_param(Value::String(format!("%{}%", escape_like(s))))
            ),
            Predicate::Gt(v) => format!("{} > {}", col, q.push_param(v.clone())),
            Predicate::Gte(v) => format!("{} >= {}", col, q.push_param(v.clone())),
            Predicate::Lt(v) => format!("{} < {}", col, q.push_param(v.clone())),
            Predicate::Lte(v) => format!("{} <= {}", col, q.push_param(v.clone())),
            Predicate::In(values) => {
                let placeholders: Vec<String> =
                    values.iter().map(|v| q.push_param(v.clone())).collect();
                format!("{} IN ({})", col, placeholders.join(", "))
            }
            Predicate::IsNull(true) => format!("{} IS NULL", col),
            Predicate::IsNull(false) => format!("{} IS NOT NULL", col),
        };
        where_parts.push(part);
    }
    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };

    let order_clause = if query.sort.is_empty() {
        format!(" ORDER BY {} ASC", quoted(entity.primary_key().name))
    } else {
        let keys: Vec<String> = query
            .sort
            .iter()
            .map(|k| format!("{} {}", quoted(k.column), k.order.as_sql()))
            .collect();
        format!(" ORDER BY {}", keys.join(", "))
    };

    q.sql = format!(
        "SELECT {} FROM {}{}{} LIMIT {} OFFSET {}",
        cols, table, where_clause, order_clause, query.limit, query.offset
    );
    q
}

/// INSERT the given columns; returns every column of the new row.
pub fn insert(entity: &EntityDef, values: &[(&'static ColumnDef, Value)]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = quoted(entity.table_name);
    let returning = all_columns(entity);
    if values.is_empty() {
        q.sql = format!("INSERT INTO {} DEFAULT VALUES RETURNING {}", table, returning);
        return q;
    }
    let mut cols = Vec::with_capacity(values.len());
    let mut placeholders = Vec::with_capacity(values.len());
    for (c, v) in values {
        cols.push(quoted(c.name));
        placeholders.push(q.push_param(v.clone()));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        table,
        cols.join(", "),
        placeholders.join(", "),
        returning
    );
    q
}

/// UPDATE by id: SET only the given columns. Caller checks rows affected.
pub fn update(entity: &EntityDef, id: i64, values: &[(&'static ColumnDef, Value)]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = quoted(entity.table_name);
    let pk = entity.primary_key();
    let sets: Vec<String> = values
        .iter()
        .filter(|(c, _)| c.role != ColumnRole::PrimaryKey)
        .map(|(c, v)| format!("{} = {}", quoted(c.name), q.push_param(v.clone())))
        .collect();
    let id_ph = q.push_param(Value::Number(id.into()));
    if sets.is_empty() {
        // Nothing to change; still a single statement that reports whether the row exists.
        q.sql = format!(
            "UPDATE {} SET {} = {} WHERE {} = {}",
            table,
            quoted(pk.name),
            quoted(pk.name),
            quoted(pk.name),
            id_ph
        );
        return q;
    }
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = {}",
        table,
        sets.join(", "),
        quoted(pk.name),
        id_ph
    );
    q
}

/// DELETE by id.
pub fn delete(entity: &EntityDef, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = quoted(entity.table_name);
    let pk = quoted(entity.primary_key().name);
    let id_ph = q.push_param(Value::Number(id.into()));
    q.sql = format!("DELETE FROM {} WHERE {} = {}", table, pk, id_ph);
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExpertClass, Menu, Record};
    use crate::query::{Filter, SortKey, SortOrder};
    use serde_json::json;

    #[test]
    fn create_table_ddl() {
        let sql = create_table(Menu::entity());
        assert_eq!(
            sql,
            "CREATE TABLE IF NOT EXISTS \"menu\" (\"id\" INTEGER PRIMARY KEY AUTOINCREMENT, \
             \"image\" TEXT NOT NULL DEFAULT '', \"link\" TEXT NOT NULL DEFAULT '', \
             \"title\" TEXT NOT NULL DEFAULT '', \"type\" INTEGER NOT NULL DEFAULT 0, \
             \"created_at\" TEXT, \"updated_at\" TEXT)"
        );
    }

    #[test]
    fn default_list_orders_by_pk_with_default_page() {
        let q = select_list(ExpertClass::entity(), &ListQuery::default());
        assert_eq!(
            q.sql,
            "SELECT \"id\", \"name\", \"sort\", \"icon\", \"created_at\", \"updated_at\" \
             FROM \"expert_class\" ORDER BY \"id\" ASC LIMIT 10 OFFSET 0"
        );
        assert!(q.params.is_empty());
    }

    #[test]
    fn filters_become_parameters() {
        let query = ListQuery {
            filters: vec![
                Filter {
                    column: "title",
                    predicate: Predicate::Eq(json!("x' OR '1'='1")),
                },
                Filter {
                    column: "type",
                    predicate: Predicate::In(vec![json!(1), json!(2)]),
                },
                Filter {
                    column: "image",
                    predicate: Predicate::IsNull(false),
                },
            ],
            fields: vec!["id", "title"],
            sort: vec![
                SortKey { column: "type", order: SortOrder::Desc },
                SortKey { column: "id", order: SortOrder::Asc },
            ],
            limit: 5,
            offset: 15,
        };
        let q = select_list(Menu::entity(), &query);
        assert_eq!(
            q.sql,
            "SELECT \"id\", \"title\" FROM \"menu\" WHERE \"title\" = $1 AND \"type\" IN ($2, $3) \
             AND \"image\" IS NOT NULL ORDER BY \"type\" DESC, \"id\" ASC LIMIT 5 OFFSET 15"
        );
        assert_eq!(q.params, vec![json!("x' OR '1'='1"), json!(1), json!(2)]);
    }

    #[test]
    fn icontains_escapes_wildcards() {
        let query = ListQuery {
            filters: vec![Filter {
                column: "name",
                predicate: Predicate::IContains("50%_off".into()),
            }],
            ..ListQuery::default()
        };
        let q = select_list(ExpertClass::entity(), &query);
        assert!(q.sql.contains("WHERE \"name\" LIKE $1 ESCAPE '\\'"));
        assert_eq!(q.params, vec![json!("%50\\%\\_off%")]);
    }

    #[test]
    fn insert_returns_all_columns() {
        let entity = ExpertClass::entity();
        let name = entity.column("name").unwrap();
        let sort = entity.column("sort").unwrap();
        let q = insert(entity, &[(name, json!("Math")), (sort, json!(3))]);
        assert_eq!(
            q.sql,
            "INSERT INTO \"expert_class\" (\"name\", \"sort\") VALUES ($1, $2) RETURNING \
             \"id\", \"name\", \"sort\", \"icon\", \"created_at\", \"updated_at\""
        );
        assert_eq!(q.params, vec![json!("Math"), json!(3)]);
    }

    #[test]
    fn update_binds_id_last() {
        let entity = Menu::entity();
        let title = entity.column("title").unwrap();
        let q = update(entity, 7, &[(title, json!("New"))]);
        assert_eq!(q.sql, "UPDATE \"menu\" SET \"title\" = $1 WHERE \"id\" = $2");
        assert_eq!(q.params, vec![json!("New"), json!(7)]);
    }

    #[test]
    fn update_without_columns_still_targets_row() {
        let q = update(Menu::entity(), 4, &[]);
        assert_eq!(q.sql, "UPDATE \"menu\" SET \"id\" = \"id\" WHERE \"id\" = $1");
        assert_eq!(q.params, vec![json!(4)]);
    }

    #[test]
    fn delete_by_id() {
        let q = delete(Menu::entity(), 9);
        assert_eq!(q.sql, "DELETE FROM \"menu\" WHERE \"id\" = $1");
        assert_eq!(q.params, vec![json!(9)]);
    }
}
