//! Coercion helpers following the host scripting model: every value can be read
//! as a number, a display string, or a truthiness flag without failing.

use serde_json::Value as JsonValue;

use crate::Value;

/// Parse text the way the host's `Number(text)` does. Surrounding whitespace is
/// ignored, empty text is 0, anything unparsable is NaN.
pub fn parse_number(text: &str) -> f64 {
    let t = text.trim();
    if t.is_empty() {
        return 0.0;
    }
    match t {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(n) = parse_radix_literal(t) {
        return n;
    }
    // Rust also accepts "inf" and "nan" spellings; the host does not.
    if t
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return f64::NAN;
    }
    t.parse::<f64>().unwrap_or(f64::NAN)
}

/// `0x`, `0o` and `0b` literals. Unsigned only; digits beyond `u64` are NaN.
fn parse_radix_literal(t: &str) -> Option<f64> {
    let mut chars = t.chars();
    if chars.next() != Some('0') {
        return None;
    }
    let radix = match chars.next() {
        Some('x' | 'X') => 16,
        Some('o' | 'O') => 8,
        Some('b' | 'B') => 2,
        _ => return None,
    };
    Some(
        u64::from_str_radix(&t[2..], radix)
            .map(|n| n as f64)
            .unwrap_or(f64::NAN),
    )
}

/// Coerce to a number. Null is 0, booleans are 0/1, text is parsed and opaque
/// values go through their display string (so `[]` is 0 and `[4]` is 4).
pub fn to_number(v: &Value) -> f64 {
    match v {
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => *n,
        Value::Text(s) => parse_number(s),
        Value::Opaque(json) => parse_number(&opaque_display(json)),
    }
}

/// `Number(v) || fallback`: NaN and zero both fall back.
pub fn to_number_or(v: &Value, fallback: f64) -> f64 {
    let n = to_number(v);
    if n.is_nan() || n == 0.0 {
        fallback
    } else {
        n
    }
}

/// Format a number like the host does for string conversion.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        // Exponent form with an explicit sign: 1e+21, 1.5e-7.
        let sci = format!("{n:e}");
        match sci.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => sci,
        }
    } else {
        format!("{n}")
    }
}

/// Coerce to the string shown in a speech bubble or used for concatenation.
pub fn to_display_string(v: &Value) -> String {
    match v {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(*n),
        Value::Text(s) => s.clone(),
        Value::Opaque(json) => opaque_display(json),
    }
}

fn opaque_display(json: &JsonValue) -> String {
    match json {
        JsonValue::Array(items) => items
            .iter()
            .map(|item| match item {
                JsonValue::Null => String::new(),
                JsonValue::Array(_) | JsonValue::Object(_) => opaque_display(item),
                other => to_display_string(&Value::from_json(other)),
            })
            .collect::<Vec<_>>()
            .join(","),
        JsonValue::Object(_) => "[object Object]".to_string(),
        other => to_display_string(&Value::from_json(other)),
    }
}

/// Host truthiness: null, false, 0, NaN and "" are falsy.
pub fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0.0 && !n.is_nan(),
        Value::Text(s) => !s.is_empty(),
        Value::Opaque(_) => true,
    }
}

/// The host `+` operator: concatenation as soon as either side is text-like,
/// numeric addition otherwise.
pub fn loose_add(a: &Value, b: &Value) -> Value {
    let text_like = |v: &Value| matches!(v, Value::Text(_) | Value::Opaque(_));
    if text_like(a) || text_like(b) {
        let mut out = to_display_string(a);
        out.push_str(&to_display_string(b));
        Value::Text(out)
    } else {
        Value::Number(to_number(a) + to_number(b))
    }
}
