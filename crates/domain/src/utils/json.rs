//! Helpers for mapping raw backend JSON into domain models

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::{CrewConnectError, Result};

/// Deserialize a wire DTO from a raw JSON fragment.
///
/// Type mismatches surface as [`CrewConnectError::Schema`] tagged with the
/// model name; missing optional keys are handled by the DTO's `Option`
/// fields.
pub fn decode<T: DeserializeOwned>(model: &str, raw: &Value) -> Result<T> {
    T::deserialize(raw).map_err(|e| CrewConnectError::Schema(format!("invalid {model}: {e}")))
}

/// Unwrap a required DTO field.
pub fn required<T>(value: Option<T>, model: &str, field: &str) -> Result<T> {
    value.ok_or_else(|| CrewConnectError::missing_field(model, field))
}

/// Follow a path of object keys, failing with an unexpected-response error
/// naming the first missing key.
pub fn pointer<'a>(raw: &'a Value, keys: &[&str]) -> Result<&'a Value> {
    keys.iter().try_fold(raw, |node, key| {
        node.get(key).ok_or_else(|| {
            CrewConnectError::unexpected_response(format!("response is missing `{key}`"))
        })
    })
}

/// Like [`pointer`] but requires the target to be an array.
pub fn array<'a>(raw: &'a Value, keys: &[&str]) -> Result<&'a Vec<Value>> {
    pointer(raw, keys)?.as_array().ok_or_else(|| {
        CrewConnectError::unexpected_response(format!(
            "`{}` is not an array",
            keys.last().copied().unwrap_or_default()
        ))
    })
}

/// Accept identifiers sent either as JSON strings or numbers.
pub fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
