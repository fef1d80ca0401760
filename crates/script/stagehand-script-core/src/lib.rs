//! stagehand-script-core: the program tree consumed by the runtime.
//!
//! Programs arrive as an already-parsed JSON-like tree. Decoding turns every
//! instruction record into an [`Instruction`] once, so the runtime dispatches on
//! an enum instead of splitting `namespace-command` keys per step.

pub mod error;
pub mod expr;
pub mod instruction;
pub mod program;

pub use error::ProgramError;
pub use expr::{CompareOp, Condition, Expression};
pub use instruction::{Block, Direction, Instruction, MathOp};
pub use program::{Diagnostic, DiagnosticKind, Program};
