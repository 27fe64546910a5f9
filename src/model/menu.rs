//! Menu banner items: an image with a link target, a title and a numeric type.

use super::{ColumnDef, ColumnKind, EntityDef, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

static MENU: EntityDef = EntityDef {
    table_name: "menu",
    path_segment: "menu",
    columns: &[
        ColumnDef::primary_key("id"),
        ColumnDef::data("image", ColumnKind::Text),
        ColumnDef::data("link", ColumnKind::Text),
        ColumnDef::data("title", ColumnKind::Text),
        ColumnDef::data("type", ColumnKind::Integer),
        ColumnDef::created_at(),
        ColumnDef::updated_at(),
    ],
    requires_token: true,
};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    #[serde(default)]
    pub id: i64,
    /// Image URL.
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "type")]
    pub kind: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Menu {
    fn entity() -> &'static EntityDef {
        &MENU
    }
}
