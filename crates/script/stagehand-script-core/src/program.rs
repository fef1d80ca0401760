//! Program: `{ meta, sprites, code }` decoded from a JSON-like tree.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::error::ProgramError;
use crate::instruction::{decode_block, Block, Instruction};

/// An immutable, decoded program. Map order follows the source document and is
/// the order actors are created and streams are launched.
#[derive(Debug, Clone, Default)]
pub struct Program {
    /// Free-form key-values, carried but not interpreted.
    pub meta: Map<String, JsonValue>,
    /// Manifest: actor name -> asset name.
    pub sprites: IndexMap<String, String>,
    /// Actor name -> top-level instruction list.
    pub code: IndexMap<String, Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    Unknown,
    Malformed { reason: String },
}

/// A load-time finding for an instruction that will be skipped when executed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub actor: String,
    /// Location such as `code.cat[2].do[0]`.
    pub path: String,
    pub key: String,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl Program {
    pub fn from_json_str(text: &str) -> Result<Self, ProgramError> {
        let tree: JsonValue = serde_json::from_str(text)?;
        Self::from_json(&tree)
    }

    /// Decode a program tree. `null` decodes to an empty program, as does any
    /// missing section.
    pub fn from_json(tree: &JsonValue) -> Result<Self, ProgramError> {
        let root = match tree {
            JsonValue::Null => return Ok(Program::default()),
            JsonValue::Object(root) => root,
            _ => return Err(ProgramError::syntax("$", "program root must be a mapping")),
        };

        let meta = match root.get("meta") {
            None | Some(JsonValue::Null) => Map::new(),
            Some(JsonValue::Object(meta)) => meta.clone(),
            Some(_) => return Err(ProgramError::syntax("meta", "expected a mapping")),
        };

        let mut sprites = IndexMap::new();
        for (actor, asset) in section(root, "sprites")?.into_iter().flatten() {
            match asset {
                JsonValue::String(asset) => {
                    sprites.insert(actor.clone(), asset.clone());
                }
                _ => {
                    return Err(ProgramError::syntax(
                        format!("sprites.{actor}"),
                        "asset name must be a string",
                    ))
                }
            }
        }

        let mut code = IndexMap::new();
        for (actor, list) in section(root, "code")?.into_iter().flatten() {
            let block = decode_block(Some(list))
                .map_err(|reason| ProgramError::syntax(format!("code.{actor}"), reason))?;
            code.insert(actor.clone(), block);
        }

        Ok(Program {
            meta,
            sprites,
            code,
        })
    }

    /// Every instruction that will be skipped at run time, in source order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        for (actor, block) in &self.code {
            collect_diagnostics(actor, &format!("code.{actor}"), block, &mut out);
        }
        out
    }
}

fn section<'a>(
    root: &'a Map<String, JsonValue>,
    name: &str,
) -> Result<Option<&'a Map<String, JsonValue>>, ProgramError> {
    match root.get(name) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Object(map)) => Ok(Some(map)),
        Some(_) => Err(ProgramError::syntax(name, "expected a mapping")),
    }
}

fn collect_diagnostics(actor: &str, path: &str, block: &Block, out: &mut Vec<Diagnostic>) {
    for (idx, instr) in block.iter().enumerate() {
        let here = format!("{path}[{idx}]");
        match instr {
            Instruction::Unknown { key } => out.push(Diagnostic {
                actor: actor.to_string(),
                path: here.clone(),
                key: key.clone(),
                kind: DiagnosticKind::Unknown,
            }),
            Instruction::Malformed { key, reason } => out.push(Diagnostic {
                actor: actor.to_string(),
                path: here.clone(),
                key: key.clone(),
                kind: DiagnosticKind::Malformed {
                    reason: reason.clone(),
                },
            }),
            _ => {}
        }
        for (name, child) in instr.children() {
            collect_diagnostics(actor, &format!("{here}.{name}"), child, out);
        }
    }
}
