//! Expressions and conditions as they appear in instruction payloads.

use serde_json::Value as JsonValue;
use stagehand_api_core::{coercion, Value};

/// Either a literal or a reference to a global variable (`{ "var": "score" }`).
/// Any other object is kept as an opaque literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Value),
    Var(String),
}

impl Expression {
    pub fn decode(json: Option<&JsonValue>) -> Self {
        match json {
            None => Expression::Literal(Value::Null),
            Some(JsonValue::Object(obj)) => match obj.get("var") {
                Some(JsonValue::String(name)) => Expression::Var(name.clone()),
                // Non-text names are used through their string form, like an
                // object key would be.
                Some(other) => Expression::Var(coercion::to_display_string(&Value::from_json(
                    other,
                ))),
                None => Expression::Literal(Value::from_json(&JsonValue::Object(obj.clone()))),
            },
            Some(other) => Expression::Literal(Value::from_json(other)),
        }
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Expression::Literal(value.into())
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expression::Var(name.into())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CompareOp {
    LooseEq,
    StrictEq,
    LooseNe,
    StrictNe,
    Greater,
    Less,
    GreaterEq,
    LessEq,
}

impl CompareOp {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "==" => CompareOp::LooseEq,
            "===" => CompareOp::StrictEq,
            "!=" => CompareOp::LooseNe,
            "!==" => CompareOp::StrictNe,
            ">" => CompareOp::Greater,
            "<" => CompareOp::Less,
            ">=" => CompareOp::GreaterEq,
            "<=" => CompareOp::LessEq,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::LooseEq => "==",
            CompareOp::StrictEq => "===",
            CompareOp::LooseNe => "!=",
            CompareOp::StrictNe => "!==",
            CompareOp::Greater => ">",
            CompareOp::Less => "<",
            CompareOp::GreaterEq => ">=",
            CompareOp::LessEq => "<=",
        }
    }
}

/// `{ left, op, right }`. A missing or unrecognized operator is kept as `None`
/// and evaluates to false. A missing operand is `None` as well, which is not
/// the same as an explicit `null` literal: it only loosely equals `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub left: Option<Expression>,
    pub op: Option<CompareOp>,
    pub right: Option<Expression>,
}

impl Condition {
    pub fn new(left: Expression, op: CompareOp, right: Expression) -> Self {
        Self {
            left: Some(left),
            op: Some(op),
            right: Some(right),
        }
    }

    /// Decode a `cond` payload. Anything that is not an object yields a
    /// condition with no operator.
    pub fn decode(json: Option<&JsonValue>) -> Self {
        let obj = json.and_then(JsonValue::as_object);
        let field = |key: &str| obj.and_then(|o| o.get(key));
        let operand = |key: &str| field(key).map(|json| Expression::decode(Some(json)));
        Self {
            left: operand("left"),
            op: field("op")
                .and_then(JsonValue::as_str)
                .and_then(CompareOp::parse),
            right: operand("right"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn var_objects_become_references() {
        assert_eq!(
            Expression::decode(Some(&json!({"var": "score"}))),
            Expression::Var("score".into())
        );
        assert_eq!(
            Expression::decode(Some(&json!({"var": 3}))),
            Expression::Var("3".into())
        );
        assert_eq!(
            Expression::decode(Some(&json!({"other": 1}))),
            Expression::Literal(Value::Opaque(json!({"other": 1})))
        );
        assert_eq!(Expression::decode(None), Expression::Literal(Value::Null));
    }

    #[test]
    fn unknown_operator_is_kept_as_none() {
        let c = Condition::decode(Some(&json!({"left": 1, "op": "<>", "right": 2})));
        assert_eq!(c.op, None);
        let c = Condition::decode(Some(&json!(true)));
        assert_eq!(c.op, None);
        let c = Condition::decode(Some(&json!({"left": 1, "op": ">=", "right": 2})));
        assert_eq!(c.op, Some(CompareOp::GreaterEq));
    }

    #[test]
    fn absent_operand_differs_from_null() {
        let c = Condition::decode(Some(&json!({"op": "===", "right": null})));
        assert_eq!(c.left, None);
        assert_eq!(c.right, Some(Expression::Literal(Value::Null)));
    }
}
