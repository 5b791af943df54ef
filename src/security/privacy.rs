//! Sensitive-field masking for audit payloads.

use serde_json::Value;

/// Replacement text for masked values.
pub const MASKED: &str = "***MASKED***";

/// Key fragments that mark a field as sensitive. Matching is
/// case-insensitive and substring-based, so `api_key` and `authToken`
/// are caught alongside the bare names.
pub const SENSITIVE_FIELDS: &[&str] = &["password", "token", "key", "secret", "auth"];

/// Deep copy of `value` with every sensitive field replaced.
pub fn mask_sensitive(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, inner)| {
                    if is_sensitive(key) {
                        (key.clone(), Value::String(MASKED.to_string()))
                    } else {
                        (key.clone(), mask_sensitive(inner))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(mask_sensitive).collect()),
        other => other.clone(),
    }
}

fn is_sensitive(key: &str) -> bool {
    let lower = key.to_lowercase();
    SENSITIVE_FIELDS.iter().any(|field| lower.contains(field))
}
