//! JSON record item parsed from one line of a JSON Lines collection.

use super::item::ListItem;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Field used as the unique key when none is configured.
pub const DEFAULT_KEY_FIELD: &str = "id";

/// Errors produced while turning a line into a [`Record`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The line is not valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// The line is valid JSON but not an object.
    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// A JSON object with its derived key and content hash.
///
/// The hash is the hex SHA-256 of the object serialized with sorted keys, so
/// two records with the same fields hash identically regardless of the field
/// order in the source line.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    key: Option<String>,
    hash: String,
    fields: Map<String, Value>,
}

impl Record {
    /// Parse one line.
    ///
    /// # Errors
    ///
    /// Returns `RecordError` when the line is not a JSON object.
    pub fn parse(line: &str, key_field: &str) -> Result<Self, RecordError> {
        let value: Value =
            serde_json::from_str(line).map_err(|e| RecordError::InvalidJson(e.to_string()))?;
        Self::from_value(value, key_field)
    }

    /// Build a record from an already-parsed value.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::NotAnObject` for arrays, scalars and null.
    pub fn from_value(value: Value, key_field: &str) -> Result<Self, RecordError> {
        let fields = match value {
            Value::Object(map) => map,
            Value::Array(_) => return Err(RecordError::NotAnObject("array")),
            Value::String(_) => return Err(RecordError::NotAnObject("string")),
            Value::Number(_) => return Err(RecordError::NotAnObject("number")),
            Value::Bool(_) => return Err(RecordError::NotAnObject("bool")),
            Value::Null => return Err(RecordError::NotAnObject("null")),
        };

        let key = fields.get(key_field).and_then(key_text);
        let hash = content_hash(&fields);

        Ok(Self { key, hash, fields })
    }

    /// All top-level fields, sorted by name.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Look up one field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Hex SHA-256 of the canonical object.
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

impl ListItem for Record {
    fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    fn content_hash(&self) -> Option<&str> {
        Some(&self.hash)
    }
}

fn key_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn content_hash(fields: &Map<String, Value>) -> String {
    // serde_json's default map is ordered by key, which makes this canonical.
    let canonical = Value::Object(fields.clone()).to_string();
    hex::encode(Sha256::digest(canonical.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_extracts_string_key() {
        let record = Record::parse(r#"{"id":"evt-1","msg":"login"}"#, "id").unwrap();
        assert_eq!(record.key(), Some("evt-1"));
    }

    #[test]
    fn parse_accepts_numeric_key() {
        let record = Record::parse(r#"{"id":42,"msg":"login"}"#, "id").unwrap();
        assert_eq!(record.key(), Some("42"));
    }

    #[test]
    fn missing_key_field_yields_no_key() {
        let record = Record::parse(r#"{"msg":"login"}"#, "id").unwrap();
        assert_eq!(record.key(), None);
    }

    #[test]
    fn empty_string_key_counts_as_missing() {
        let record = Record::parse(r#"{"id":"","msg":"login"}"#, "id").unwrap();
        assert_eq!(record.key(), None);
    }

    #[test]
    fn custom_key_field_is_honoured() {
        let record = Record::parse(r#"{"uuid":"u-9","id":"ignored"}"#, "uuid").unwrap();
        assert_eq!(record.key(), Some("u-9"));
    }

    #[test]
    fn hash_ignores_field_order() {
        let a = Record::parse(r#"{"id":"1","a":1,"b":2}"#, "id").unwrap();
        let b = Record::parse(r#"{"b":2,"id":"1","a":1}"#, "id").unwrap();
        assert_eq!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn hash_changes_when_content_changes() {
        let a = Record::parse(r#"{"id":"1","status":"open"}"#, "id").unwrap();
        let b = Record::parse(r#"{"id":"1","status":"closed"}"#, "id").unwrap();
        assert_eq!(a.key(), b.key());
        assert_ne!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn hash_is_hex_sha256() {
        let record = Record::parse(r#"{"id":"1"}"#, "id").unwrap();
        assert_eq!(record.hash().len(), 64);
        assert!(record.hash().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn non_object_is_rejected() {
        assert_eq!(
            Record::parse("[1,2]", "id"),
            Err(RecordError::NotAnObject("array"))
        );
        assert!(matches!(
            Record::parse("not json", "id"),
            Err(RecordError::InvalidJson(_))
        ));
    }
}
