//! Field-tolerant snapshot decoding.
//!
//! The backend sends a JSON array of loosely-typed objects. A record is
//! never rejected as a whole: each field is looked up on its own, and a
//! field that is missing, `null` or of the wrong shape falls back to its
//! default. Only a document that is not an array fails the tick.

use crate::entity::SnapshotEntity;
use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::{debug, warn};


/// JSON object backing one snapshot record
pub type Record = Map<String, Value>;

/// Decode a snapshot document into typed records, in document order.
///
/// Array elements that are not objects are skipped with a warning.
pub fn decode_snapshot<E: SnapshotEntity>(document: &Value) -> Result<Vec<E>> {
    let elements = document.as_array().ok_or_else(|| {
        anyhow!(
            "{} snapshot is not a JSON array (got {})",
            E::FAMILY,
            kind_of(document)
        )
    })?;

    let mut records = Vec::with_capacity(elements.len());
    for (index, element) in elements.iter().enumerate() {
        match element.as_object() {
            Some(record) => records.push(E::from_record(record)),
            None => {
                warn!(
                    family = %E::FAMILY,
                    index = index,
                    kind = kind_of(element),
                    "Snapshot element is not an object, skipping"
                );
            }
        }
    }

    Ok(records)
}

/// String field. Numbers and booleans are rendered as text.
pub fn field_string(record: &Record, key: &str) -> Option<String> {
    coerce_string(record.get(key)?)
}

/// Integer field. Floats are rounded, numeric strings are parsed.
pub fn field_i64(record: &Record, key: &str) -> Option<i64> {
    coerce_i64(record.get(key)?)
}

/// Float field. Numeric strings are parsed.
pub fn field_f32(record: &Record, key: &str) -> Option<f32> {
    coerce_f32(record.get(key)?)
}

/// Boolean field. Numbers are true when non-zero; strings accept
/// `true`/`false` in any case.
pub fn field_bool(record: &Record, key: &str) -> Option<bool> {
    coerce_bool(record.get(key)?)
}

/// List field decoded element by element; elements that do not fit `T`
/// are dropped.
pub fn field_list<T: DeserializeOwned>(record: &Record, key: &str) -> Vec<T> {
    record.get(key).map(coerce_list).unwrap_or_default()
}

pub(crate) fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|f| f.round() as i64))
        }
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

pub(crate) fn coerce_f32(value: &Value) -> Option<f32> {
    match value {
        Value::Number(n) => n.as_f64().map(|f| f as f32),
        Value::String(s) => s.trim().parse::<f32>().ok(),
        _ => None,
    }
}

pub(crate) fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => s.trim().to_lowercase().parse::<bool>().ok(),
        _ => None,
    }
}

fn coerce_list<T: DeserializeOwned>(value: &Value) -> Vec<T> {
    let Some(elements) = value.as_array() else {
        return Vec::new();
    };

    elements
        .iter()
        .filter_map(|element| match serde_json::from_value(element.clone()) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                debug!(error = %e, "Dropping list element that does not decode");
                None
            }
        })
        .collect()
}

// Serde adapters for fields inside nested records. They apply the same
// coercions as the `field_*` helpers, so a single bad member never fails
// the record that contains it.

pub(crate) fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Value::deserialize(deserializer).map(|value| coerce_i64(&value).unwrap_or_default())
}

pub(crate) fn lenient_f32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    Value::deserialize(deserializer).map(|value| coerce_f32(&value).unwrap_or_default())
}

pub(crate) fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Value::deserialize(deserializer).map(|value| coerce_bool(&value).unwrap_or_default())
}

/// Nested member that falls back to `T::default()` when null or mistyped
pub(crate) fn lenient_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Value::deserialize(deserializer)
        .map(|value| serde_json::from_value(value).unwrap_or_default())
}

/// Optional nested member; null or mistyped becomes `None`
pub(crate) fn lenient_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Value::deserialize(deserializer).map(|value| serde_json::from_value(value).ok())
}

pub(crate) fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Value::deserialize(deserializer).map(|value| coerce_list(&value))
}

/// Nested record decoded with serde.
///
/// `null` and missing fields are `None`; a nested value that does not fit
/// `T` is logged and treated as missing.
pub fn field_nested<T: DeserializeOwned>(record: &Record, key: &str) -> Option<T> {
    let value = record.get(key)?;
    if value.is_null() {
        return None;
    }

    match serde_json::from_value(value.clone()) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            warn!(field = key, error = %e, "Failed to decode nested field, treating as absent");
            None
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
