//! Instruction records decoded into a tagged enum.
//!
//! A record is a single-entry mapping `{ "<namespace>-<command>": payload }`.
//! Only the first entry is honored. Unrecognized pairs and payloads missing their
//! required shape decode into catch-all variants so a stream can log and skip
//! them at run time instead of failing to load.

use std::sync::Arc;

use serde_json::{Map, Value as JsonValue};

use crate::expr::{Condition, Expression};

/// Ordered, shareable instruction list. Cloning is a reference-count bump.
pub type Block = Arc<[Instruction]>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Right,
    Left,
    Down,
    Up,
}

impl Direction {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "right" => Direction::Right,
            "left" => Direction::Left,
            "down" => Direction::Down,
            "up" => Direction::Up,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Right => "right",
            Direction::Left => "left",
            Direction::Down => "down",
            Direction::Up => "up",
        }
    }

    /// Screen-space offset for `amount`; y grows downward.
    pub fn offset(self, amount: f64) -> (f64, f64) {
        match self {
            Direction::Right => (amount, 0.0),
            Direction::Left => (-amount, 0.0),
            Direction::Down => (0.0, amount),
            Direction::Up => (0.0, -amount),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MathOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Mod,
}

impl MathOp {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "add" => MathOp::Add,
            "subtract" => MathOp::Subtract,
            "multiply" => MathOp::Multiply,
            "divide" => MathOp::Divide,
            "mod" => MathOp::Mod,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MathOp::Add => "add",
            MathOp::Subtract => "subtract",
            MathOp::Multiply => "multiply",
            MathOp::Divide => "divide",
            MathOp::Mod => "mod",
        }
    }

    /// Apply the operator. Dividing or taking the remainder by exactly zero
    /// returns `current` unchanged.
    pub fn apply(self, current: f64, operand: f64) -> f64 {
        match self {
            MathOp::Add => current + operand,
            MathOp::Subtract => current - operand,
            MathOp::Multiply => current * operand,
            MathOp::Divide if operand == 0.0 => current,
            MathOp::Divide => current / operand,
            MathOp::Mod if operand == 0.0 => current,
            MathOp::Mod => current % operand,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Move {
        direction: Direction,
        amount: Expression,
    },
    Show,
    Hide,
    Scale(Expression),
    Rotate(Expression),
    Say(Expression),
    SetVar {
        var: String,
        value: Expression,
    },
    ChangeVar {
        var: String,
        by: Expression,
    },
    Math {
        op: MathOp,
        var: String,
        value: Expression,
    },
    Wait(Expression),
    Repeat {
        times: Expression,
        body: Block,
    },
    If {
        cond: Condition,
        then: Block,
    },
    IfElse {
        cond: Condition,
        then: Block,
        otherwise: Block,
    },
    Forever {
        body: Block,
    },
    /// No handler for this namespace/command pair.
    Unknown {
        key: String,
    },
    /// Recognized pair whose payload lacks the required shape.
    Malformed {
        key: String,
        reason: String,
    },
}

impl Instruction {
    /// Decode one instruction record.
    pub fn decode(record: &JsonValue) -> Instruction {
        let Some(obj) = record.as_object() else {
            return Instruction::Malformed {
                key: String::new(),
                reason: "instruction record is not a mapping".into(),
            };
        };
        let Some((key, payload)) = obj.iter().next() else {
            return Instruction::Malformed {
                key: String::new(),
                reason: "instruction record is empty".into(),
            };
        };
        match decode_pair(key, payload) {
            Ok(instr) => instr,
            Err(reason) => Instruction::Malformed {
                key: key.clone(),
                reason,
            },
        }
    }

    /// Namespace-command label used in logs.
    pub fn label(&self) -> String {
        match self {
            Instruction::Move { direction, .. } => format!("motion-{}", direction.as_str()),
            Instruction::Show => "visibility-show".into(),
            Instruction::Hide => "visibility-hide".into(),
            Instruction::Scale(_) => "looks-scale".into(),
            Instruction::Rotate(_) => "looks-rotate".into(),
            Instruction::Say(_) => "looks-say".into(),
            Instruction::SetVar { .. } => "data-set".into(),
            Instruction::ChangeVar { .. } => "data-change".into(),
            Instruction::Math { op, .. } => format!("math-{}", op.as_str()),
            Instruction::Wait(_) => "control-wait".into(),
            Instruction::Repeat { .. } => "control-repeat".into(),
            Instruction::If { .. } => "control-if".into(),
            Instruction::IfElse { .. } => "control-ifelse".into(),
            Instruction::Forever { .. } => "control-forever".into(),
            Instruction::Unknown { key } | Instruction::Malformed { key, .. } => key.clone(),
        }
    }

    /// Nested blocks in source order (`do`, `then`, `else`).
    pub fn children(&self) -> Vec<(&'static str, &Block)> {
        match self {
            Instruction::Repeat { body, .. } | Instruction::Forever { body } => vec![("do", body)],
            Instruction::If { then, .. } => vec![("then", then)],
            Instruction::IfElse {
                then, otherwise, ..
            } => vec![("then", then), ("else", otherwise)],
            _ => Vec::new(),
        }
    }
}

/// Decode an instruction list. `None` and `null` are an empty block.
pub fn decode_block(json: Option<&JsonValue>) -> Result<Block, String> {
    match json {
        None | Some(JsonValue::Null) => Ok(Arc::from(Vec::new())),
        Some(JsonValue::Array(items)) => Ok(items.iter().map(Instruction::decode).collect()),
        Some(_) => Err("instruction list is not a sequence".into()),
    }
}

fn decode_pair(key: &str, payload: &JsonValue) -> Result<Instruction, String> {
    let mut parts = key.split('-');
    let namespace = parts.next().unwrap_or_default();
    let command = parts.next().unwrap_or_default();
    let fields = payload.as_object();

    let instr = match (namespace, command) {
        ("motion", cmd) => match Direction::parse(cmd) {
            Some(direction) => Instruction::Move {
                direction,
                amount: Expression::decode(Some(payload)),
            },
            None => unknown(key),
        },
        ("visibility", "show") => Instruction::Show,
        ("visibility", "hide") => Instruction::Hide,
        ("looks", "scale") => Instruction::Scale(Expression::decode(Some(payload))),
        ("looks", "rotate") => Instruction::Rotate(Expression::decode(Some(payload))),
        ("looks", "say") => Instruction::Say(Expression::decode(Some(payload))),
        ("data", "set") => {
            let fields = require_var(fields)?;
            Instruction::SetVar {
                var: fields.0,
                value: Expression::decode(fields.1.get("value")),
            }
        }
        ("data", "change") => {
            let fields = require_var(fields)?;
            Instruction::ChangeVar {
                var: fields.0,
                by: Expression::decode(fields.1.get("by")),
            }
        }
        ("math", cmd) => match MathOp::parse(cmd) {
            Some(op) => {
                let fields = require_var(fields)?;
                Instruction::Math {
                    op,
                    var: fields.0,
                    value: Expression::decode(fields.1.get("value")),
                }
            }
            None => unknown(key),
        },
        ("control", "wait") => Instruction::Wait(Expression::decode(Some(payload))),
        ("control", "repeat") => Instruction::Repeat {
            times: Expression::decode(field(fields, "times")),
            body: decode_block(field(fields, "do"))?,
        },
        ("control", "if") => Instruction::If {
            cond: Condition::decode(field(fields, "cond")),
            then: decode_block(field(fields, "then"))?,
        },
        ("control", "ifelse") => Instruction::IfElse {
            cond: Condition::decode(field(fields, "cond")),
            then: decode_block(field(fields, "then"))?,
            otherwise: decode_block(field(fields, "else"))?,
        },
        ("control", "forever") => Instruction::Forever {
            body: decode_block(field(fields, "do"))?,
        },
        _ => unknown(key),
    };
    Ok(instr)
}

fn unknown(key: &str) -> Instruction {
    Instruction::Unknown {
        key: key.to_string(),
    }
}

fn field<'a>(fields: Option<&'a Map<String, JsonValue>>, key: &str) -> Option<&'a JsonValue> {
    fields.and_then(|f| f.get(key))
}

fn require_var(
    fields: Option<&Map<String, JsonValue>>,
) -> Result<(String, &Map<String, JsonValue>), String> {
    let fields = fields.ok_or_else(|| "payload must be a mapping with a `var` name".to_string())?;
    match fields.get("var") {
        Some(JsonValue::String(name)) => Ok((name.clone(), fields)),
        _ => Err("payload requires `var` to be a string".into()),
    }
}
