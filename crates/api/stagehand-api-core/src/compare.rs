//! Equality and ordering with the host's loose/strict semantics.

use std::cmp::Ordering;

use crate::coercion::{to_display_string, to_number};
use crate::Value;

/// `===`: same kind and same value. NaN is never equal to itself; opaque values
/// compare structurally.
pub fn strict_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::Text(x), Value::Text(y)) => x == y,
        (Value::Opaque(x), Value::Opaque(y)) => x == y,
        _ => false,
    }
}

/// `==`: booleans become numbers, opaque values become their display string,
/// and mixed number/text compares numerically. Null equals only null.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    if a.kind() == b.kind() {
        return strict_eq(a, b);
    }
    match (a, b) {
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Bool(x), other) | (other, Value::Bool(x)) => {
            loose_eq(&Value::Number(if *x { 1.0 } else { 0.0 }), other)
        }
        (opaque @ Value::Opaque(_), other) | (other, opaque @ Value::Opaque(_)) => {
            loose_eq(&Value::Text(to_display_string(opaque)), other)
        }
        _ => to_number(a) == to_number(b),
    }
}

/// Relational comparison used by `<`, `>`, `<=`, `>=`. Two text-like values
/// compare lexicographically; anything else numerically. `None` when either
/// side is NaN.
pub fn relational(a: &Value, b: &Value) -> Option<Ordering> {
    let text = |v: &Value| match v {
        Value::Text(s) => Some(s.clone()),
        Value::Opaque(_) => Some(to_display_string(v)),
        _ => None,
    };
    if let (Some(x), Some(y)) = (text(a), text(b)) {
        return Some(x.cmp(&y));
    }
    to_number(a).partial_cmp(&to_number(b))
}

pub fn less_than(a: &Value, b: &Value) -> bool {
    matches!(relational(a, b), Some(Ordering::Less))
}

pub fn greater_than(a: &Value, b: &Value) -> bool {
    matches!(relational(a, b), Some(Ordering::Greater))
}

pub fn less_or_equal(a: &Value, b: &Value) -> bool {
    matches!(relational(a, b), Some(Ordering::Less | Ordering::Equal))
}

pub fn greater_or_equal(a: &Value, b: &Value) -> bool {
    matches!(relational(a, b), Some(Ordering::Greater | Ordering::Equal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn n(v: f64) -> Value {
        Value::Number(v)
    }

    fn t(v: &str) -> Value {
        Value::Text(v.to_string())
    }

    #[test]
    fn loose_equality_coerces_mixed_kinds() {
        assert!(loose_eq(&n(5.0), &t("5")));
        assert!(loose_eq(&Value::Bool(true), &n(1.0)));
        assert!(loose_eq(&Value::Bool(false), &t("0")));
        assert!(loose_eq(&Value::Opaque(json!([7])), &n(7.0)));
        assert!(!loose_eq(&Value::Null, &n(0.0)));
        assert!(loose_eq(&Value::Null, &Value::Null));
        assert!(!loose_eq(&n(f64::NAN), &n(f64::NAN)));
    }

    #[test]
    fn strict_equality_requires_same_kind() {
        assert!(!strict_eq(&n(5.0), &t("5")));
        assert!(strict_eq(&t("a"), &t("a")));
        assert!(strict_eq(
            &Value::Opaque(json!({"a": 1})),
            &Value::Opaque(json!({"a": 1}))
        ));
    }

    #[test]
    fn ordering_numeric_and_lexicographic() {
        assert!(less_than(&n(2.0), &n(10.0)));
        assert!(greater_than(&t("b"), &t("a")));
        // "10" < "9" as text, 10 > 9 as mixed
        assert!(less_than(&t("10"), &t("9")));
        assert!(greater_than(&t("10"), &n(9.0)));
        assert!(less_or_equal(&n(3.0), &n(3.0)));
        assert!(greater_or_equal(&Value::Null, &n(0.0)));
        assert!(!less_than(&t("abc"), &n(1.0)));
        assert!(!greater_or_equal(&t("abc"), &n(1.0)));
    }
}
