//! Expert class categories.

use super::{ColumnDef, ColumnKind, EntityDef, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

static EXPERT_CLASS: EntityDef = EntityDef {
    table_name: "expert_class",
    path_segment: "expert_class",
    columns: &[
        ColumnDef::primary_key("id"),
        ColumnDef::data("name", ColumnKind::Text),
        ColumnDef::data("sort", ColumnKind::Integer),
        ColumnDef::data("icon", ColumnKind::Text),
        ColumnDef::created_at(),
        ColumnDef::updated_at(),
    ],
    requires_token: false,
};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpertClass {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    /// Display position; lower sorts first.
    #[serde(default)]
    pub sort: i64,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for ExpertClass {
    fn entity() -> &'static EntityDef {
        &EXPERT_CLASS
    }
}
