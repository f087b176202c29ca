//! Generic collection record.
//!
//! The store facade treats every domain entity opaquely: a record is its
//! backend-assigned identifier plus an uninterpreted mapping of field name
//! to JSON value. Typed layers (auth, AI flows) convert records into the
//! concrete models they need via [`Record::deserialize_into`].

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{VigilError, VigilResult};

/// A record as returned by any backend: `id` plus opaque fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Build a record from a JSON object that carries its id under the
    /// conventional `id` key. Rejects non-objects and objects without an id.
    pub fn from_object(value: Value) -> VigilResult<Self> {
        let mut fields = match value {
            Value::Object(map) => map,
            other => {
                return Err(VigilError::Validation {
                    message: format!("expected a JSON object, got {other}"),
                });
            }
        };
        let id = match fields.remove("id") {
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => {
                return Err(VigilError::Validation {
                    message: "record is missing the 'id' field".into(),
                });
            }
        };
        Ok(Self { id, fields })
    }

    /// Look up a single field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Convert the record (id included) into a typed model.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> VigilResult<T> {
        let mut obj = self.fields.clone();
        obj.insert("id".into(), Value::String(self.id.clone()));
        serde_json::from_value(Value::Object(obj)).map_err(|e| VigilError::Validation {
            message: format!("record does not match expected shape: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_object_extracts_id() {
        let rec = Record::from_object(json!({"id": "u-1", "username": "alice"})).unwrap();
        assert_eq!(rec.id, "u-1");
        assert_eq!(rec.get("username"), Some(&json!("alice")));
        assert!(rec.get("id").is_none());
    }

    #[test]
    fn from_object_rejects_missing_id() {
        assert!(Record::from_object(json!({"username": "alice"})).is_err());
    }

    #[test]
    fn from_object_rejects_non_objects() {
        assert!(Record::from_object(json!([1, 2, 3])).is_err());
    }

    #[test]
    fn serde_round_trip_keeps_fields_flat() {
        let rec = Record::from_object(json!({"id": "r-1", "name": "SAP", "critical": true})).unwrap();
        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value, json!({"id": "r-1", "name": "SAP", "critical": true}));
        let back: Record = serde_json::from_value(value).unwrap();
        assert_eq!(back, rec);
    }
}
