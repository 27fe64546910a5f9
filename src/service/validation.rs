//! Request payload validation: raw JSON body -> typed record -> column values.

use crate::error::AppError;
use crate::model::{ColumnDef, ColumnRole, Record};
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

/// Column values ready to be written, in entity column order.
#[derive(Debug, Default)]
pub struct Payload {
    pub values: Vec<(&'static ColumnDef, Value)>,
}

impl Payload {
    /// Full record for insert. Missing fields take the record defaults; client ids and
    /// timestamps are ignored.
    pub fn for_create<R: Record>(body: &[u8]) -> Result<Self, AppError> {
        let (_, typed) = parse_record::<R>(body)?;
        let now = now_value();
        let values = R::entity()
            .columns
            .iter()
            .filter_map(|c| match c.role {
                ColumnRole::Data => Some((c, typed.get(c.name).cloned().unwrap_or(Value::Null))),
                ColumnRole::CreatedAt | ColumnRole::UpdatedAt => Some((c, now.clone())),
                ColumnRole::PrimaryKey => None,
            })
            .collect();
        Ok(Payload { values })
    }

    /// Only the data columns present in the body, plus a fresh `updated_at`.
    pub fn for_update<R: Record>(body: &[u8]) -> Result<Self, AppError> {
        let (raw, typed) = parse_record::<R>(body)?;
        let values = R::entity()
            .columns
            .iter()
            .filter_map(|c| match c.role {
                ColumnRole::Data if raw.contains_key(c.name) => {
                    Some((c, typed.get(c.name).cloned().unwrap_or(Value::Null)))
                }
                ColumnRole::UpdatedAt => Some((c, now_value())),
                _ => None,
            })
            .collect();
        Ok(Payload { values })
    }
}

/// Returns the raw body object and the same body after a round trip through `R`,
/// which rejects wrong field types and fills defaults.
fn parse_record<R: Record>(body: &[u8]) -> Result<(Map<String, Value>, Map<String, Value>), AppError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("invalid JSON body: {}", e)))?;
    let Value::Object(mut raw) = value else {
        return Err(AppError::Validation("body must be a JSON object".into()));
    };
    // Server-owned columns never come from the client.
    for c in R::entity().columns.iter().filter(|c| !c.is_data()) {
        raw.remove(c.name);
    }
    let record: R = serde_json::from_value(Value::Object(raw.clone()))
        .map_err(|e| AppError::Validation(e.to_string()))?;
    match serde_json::to_value(&record).map_err(|e| AppError::Internal(e.to_string()))? {
        Value::Object(typed) => Ok((raw, typed)),
        _ => Err(AppError::Internal("record did not serialize to an object".into())),
    }
}

fn now_value() -> Value {
    Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Parse a path id. Only positive integers can name a row.
pub fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::Validation(format!("invalid id '{}'", id_str)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExpertClass, Menu};
    use serde_json::json;

    fn names(p: &Payload) -> Vec<&'static str> {
        p.values.iter().map(|(c, _)| c.name).collect()
    }

    #[test]
    fn create_ignores_client_id_and_fills_defaults() {
        let p = Payload::for_create::<ExpertClass>(br#"{"id": 99, "name": "Math", "created_at": "x"}"#).unwrap();
        assert_eq!(names(&p), vec!["name", "sort", "icon", "created_at", "updated_at"]);
        assert_eq!(p.values[0].1, json!("Math"));
        assert_eq!(p.values[1].1, json!(0));
        assert_eq!(p.values[2].1, json!(""));
        assert!(p.values[3].1.as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn menu_type_field_maps_to_type_column() {
        let p = Payload::for_create::<Menu>(br#"{"title": "Sale", "type": 2}"#).unwrap();
        let ty = p.values.iter().find(|(c, _)| c.name == "type").unwrap();
        assert_eq!(ty.1, json!(2));
    }

    #[test]
    fn update_keeps_only_present_fields() {
        let p = Payload::for_update::<Menu>(br#"{"id": 5, "title": "New"}"#).unwrap();
        assert_eq!(names(&p), vec!["title", "updated_at"]);
        assert_eq!(p.values[0].1, json!("New"));
    }

    #[test]
    fn empty_update_only_touches_timestamp() {
        let p = Payload::for_update::<Menu>(b"{}").unwrap();
        assert_eq!(names(&p), vec!["updated_at"]);
    }

    #[test]
    fn rejects_bad_bodies() {
        for body in [&b"not json"[..], b"[1, 2]", br#"{"type": "two"}"#] {
            let err = Payload::for_create::<Menu>(body).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{:?}", err);
        }
    }

    #[test]
    fn path_ids() {
        assert_eq!(parse_id("12").unwrap(), 12);
        assert!(matches!(parse_id("abc"), Err(AppError::Validation(_))));
        assert!(matches!(parse_id("0"), Err(AppError::Validation(_))));
    }
}
