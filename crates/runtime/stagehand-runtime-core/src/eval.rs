//! Expression resolution and condition evaluation against the variable store.

use stagehand_api_core::{compare, Value};
use stagehand_script_core::{CompareOp, Condition, Expression};

use crate::variables::VariableStore;

/// Literal as-is; a variable reference reads the store (unset reads as `0`).
pub fn resolve(expr: &Expression, vars: &VariableStore) -> Value {
    match expr {
        Expression::Literal(value) => value.clone(),
        Expression::Var(name) => vars.get(name),
    }
}

/// Compare both resolved sides. A condition without a recognized operator is
/// false.
pub fn evaluate(cond: &Condition, vars: &VariableStore) -> bool {
    let Some(op) = cond.op else {
        return false;
    };
    let left = cond.left.as_ref().map(|expr| resolve(expr, vars));
    let right = cond.right.as_ref().map(|expr| resolve(expr, vars));
    match (left, right) {
        (Some(left), Some(right)) => compare_values(op, &left, &right),
        (left, right) => compare_absent(op, left.as_ref(), right.as_ref()),
    }
}

fn compare_values(op: CompareOp, left: &Value, right: &Value) -> bool {
    match op {
        CompareOp::LooseEq => compare::loose_eq(left, right),
        CompareOp::StrictEq => compare::strict_eq(left, right),
        CompareOp::LooseNe => !compare::loose_eq(left, right),
        CompareOp::StrictNe => !compare::strict_eq(left, right),
        CompareOp::Greater => compare::greater_than(left, right),
        CompareOp::Less => compare::less_than(left, right),
        CompareOp::GreaterEq => compare::greater_or_equal(left, right),
        CompareOp::LessEq => compare::less_or_equal(left, right),
    }
}

/// At least one operand is missing. A missing operand strictly equals only
/// another missing operand, loosely equals `null` too, and never orders.
fn compare_absent(op: CompareOp, left: Option<&Value>, right: Option<&Value>) -> bool {
    let nullish = |side: Option<&Value>| side.map_or(true, Value::is_null);
    let strict = left.is_none() && right.is_none();
    let loose = nullish(left) && nullish(right);
    match op {
        CompareOp::LooseEq => loose,
        CompareOp::StrictEq => strict,
        CompareOp::LooseNe => !loose,
        CompareOp::StrictNe => !strict,
        CompareOp::Greater | CompareOp::Less | CompareOp::GreaterEq | CompareOp::LessEq => false,
    }
}
