//! Value: primitives read from program literals and stored in variables.
//! Numbers are f64 so that arithmetic matches the host scripting model.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Coarse kind of a [`Value`], handy for quick dispatch in comparisons.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    Text,
    Opaque,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Value {
    /// Absent or explicit null literal.
    Null,

    Bool(bool),

    Number(f64),

    Text(String),

    /// Objects and arrays that are not variable references. Passed through
    /// unresolved; never inspected beyond coercion.
    Opaque(JsonValue),
}

impl Value {
    pub const ZERO: Value = Value::Number(0.0);

    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::Text(_) => ValueKind::Text,
            Value::Opaque(_) => ValueKind::Opaque,
        }
    }

    /// Build a value from a decoded JSON literal. Objects and arrays become
    /// [`Value::Opaque`]; variable references are handled by the script decoder.
    pub fn from_json(json: &JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(*b),
            JsonValue::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            JsonValue::String(s) => Value::Text(s.clone()),
            other => Value::Opaque(other.clone()),
        }
    }

    /// Inverse of [`Value::from_json`]. Non-finite numbers have no JSON form and
    /// map to `null`.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::Text(s) => JsonValue::String(s.clone()),
            Value::Opaque(json) => json.clone(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(f64::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_literals_map_to_primitives() {
        assert_eq!(Value::from_json(&json!(null)), Value::Null);
        assert_eq!(Value::from_json(&json!(3)), Value::Number(3.0));
        assert_eq!(Value::from_json(&json!("hi")), Value::Text("hi".into()));
        assert_eq!(
            Value::from_json(&json!({"x": 1})).kind(),
            ValueKind::Opaque
        );
    }

    #[test]
    fn non_finite_numbers_serialize_as_null() {
        assert_eq!(Value::Number(f64::NAN).to_json(), json!(null));
        assert_eq!(Value::Number(2.5).to_json(), json!(2.5));
    }

    #[test]
    fn tagged_serde_form() {
        let s = serde_json::to_string(&Value::Number(1.5)).unwrap();
        assert_eq!(s, r#"{"type":"number","data":1.5}"#);
        let back: Value = serde_json::from_str(&s).unwrap();
        assert_eq!(back, Value::Number(1.5));
    }
}
