//! Entity metadata: tables, columns and the typed records stored in them.

mod expert_class;
mod menu;

pub use expert_class::ExpertClass;
pub use menu::Menu;

use serde::{de::DeserializeOwned, Serialize};

/// Storage class of a column. Drives DDL, filter value coercion and bind types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Text,
    /// RFC 3339 UTC timestamp stored as TEXT.
    Timestamp,
}

impl ColumnKind {
    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnKind::Integer => "INTEGER",
            ColumnKind::Text | ColumnKind::Timestamp => "TEXT",
        }
    }
}

/// Who writes a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnRole {
    /// Server-assigned integer primary key.
    PrimaryKey,
    /// Written from the request payload.
    Data,
    /// Set by the server on insert.
    CreatedAt,
    /// Set by the server on insert and update.
    UpdatedAt,
}

#[derive(Clone, Copy, Debug)]
pub struct ColumnDef {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub role: ColumnRole,
}

impl ColumnDef {
    pub const fn primary_key(name: &'static str) -> Self {
        ColumnDef {
            name,
            kind: ColumnKind::Integer,
            role: ColumnRole::PrimaryKey,
        }
    }

    pub const fn data(name: &'static str, kind: ColumnKind) -> Self {
        ColumnDef {
            name,
            kind,
            role: ColumnRole::Data,
        }
    }

    pub const fn created_at() -> Self {
        ColumnDef {
            name: "created_at",
            kind: ColumnKind::Timestamp,
            role: ColumnRole::CreatedAt,
        }
    }

    pub const fn updated_at() -> Self {
        ColumnDef {
            name: "updated_at",
            kind: ColumnKind::Timestamp,
            role: ColumnRole::UpdatedAt,
        }
    }

    pub fn is_data(&self) -> bool {
        self.role == ColumnRole::Data
    }
}

/// One table exposed over HTTP.
#[derive(Debug)]
pub struct EntityDef {
    pub table_name: &'static str,
    /// URL segment under `/v1`.
    pub path_segment: &'static str,
    pub columns: &'static [ColumnDef],
    /// Whether callers must present a valid `token` query parameter.
    pub requires_token: bool,
}

impl EntityDef {
    pub fn column(&self, name: &str) -> Option<&'static ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn primary_key(&self) -> &'static ColumnDef {
        self.columns
            .iter()
            .find(|c| c.role == ColumnRole::PrimaryKey)
            .unwrap_or(&self.columns[0])
    }
}

/// A typed row of one entity table.
///
/// Deserializing a record from a request payload is what validates field types;
/// every data field carries a serde default so partial payloads still parse.
pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {
    fn entity() -> &'static EntityDef;
}
