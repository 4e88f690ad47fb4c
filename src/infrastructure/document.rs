// Document model - loosely-typed key/value bags as the document store sees
// them, plus the exact-match predicates queries are built from

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::core::DocumentId;
use crate::error::{AppError, AppResult};

/// Field bag stored per document. The store never validates its shape.
pub type Fields = Map<String, Value>;

/// Field that carries the document key when a document is decoded into a
/// typed record. Never persisted inside the bag itself.
pub const ID_FIELD: &str = "id";

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: DocumentId, fields: Fields) -> Self {
        Self { id, fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Decode into a typed record, exposing the document key as `id`
    pub fn decode<T: DeserializeOwned>(&self) -> AppResult<T> {
        let mut fields = self.fields.clone();
        fields.insert(ID_FIELD.to_string(), Value::String(self.id.to_string()));
        serde_json::from_value(Value::Object(fields)).map_err(|e| {
            AppError::SerializationError(format!("Failed to decode document {}: {}", self.id, e))
        })
    }
}

/// Serialize a typed record into a field bag. The `id` field, if the record
/// has one, is dropped: the key lives beside the bag.
pub fn to_fields<T: Serialize>(record: &T) -> AppResult<Fields> {
    match serde_json::to_value(record)? {
        Value::Object(mut fields) => {
            fields.remove(ID_FIELD);
            Ok(fields)
        }
        other => Err(AppError::SerializationError(format!(
            "Expected an object, got {}",
            other
        ))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    /// Matches when the field is absent or holds a different value
    NotEq,
}

/// Exact-match predicate on one field. Queries AND their filters together.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Eq,
            value: value.into(),
        }
    }

    pub fn not_eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::NotEq,
            value: value.into(),
        }
    }

    pub fn matches(&self, fields: &Fields) -> bool {
        let actual = fields.get(&self.field);
        match self.op {
            FilterOp::Eq => actual == Some(&self.value),
            FilterOp::NotEq => actual != Some(&self.value),
        }
    }
}

pub fn matches_all(filters: &[Filter], fields: &Fields) -> bool {
    filters.iter().all(|filter| filter.matches(fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        #[serde(default)]
        id: String,
        name: String,
    }

    fn bag(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_to_fields_drops_id() {
        let fields = to_fields(&Sample {
            id: "ignored".to_string(),
            name: "Bob".to_string(),
        })
        .unwrap();
        assert!(!fields.contains_key(ID_FIELD));
        assert_eq!(fields.get("name"), Some(&json!("Bob")));
    }

    #[test]
    fn test_decode_exposes_document_key() {
        let doc = Document::new(DocumentId::new("doc1"), bag(json!({"name": "Bob"})));
        let sample: Sample = doc.decode().unwrap();
        assert_eq!(sample.id, "doc1");
        assert_eq!(sample.name, "Bob");
    }

    #[test]
    fn test_decode_shape_mismatch() {
        let doc = Document::new(DocumentId::new("doc1"), bag(json!({"title": 3})));
        let result: AppResult<Sample> = doc.decode();
        assert!(matches!(result, Err(AppError::SerializationError(_))));
    }

    #[test]
    fn test_not_eq_keeps_documents_without_the_field() {
        let filter = Filter::not_eq("skip", true);
        assert!(filter.matches(&bag(json!({"name": "Bob"}))));
        assert!(filter.matches(&bag(json!({"skip": false}))));
        assert!(!filter.matches(&bag(json!({"skip": true}))));
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let filters = vec![Filter::eq("owner_id", "u1"), Filter::not_eq("skip", true)];
        assert!(matches_all(&filters, &bag(json!({"owner_id": "u1"}))));
        assert!(!matches_all(&filters, &bag(json!({"owner_id": "u2"}))));
        assert!(!matches_all(&filters, &bag(json!({"owner_id": "u1", "skip": true}))));
    }
}
