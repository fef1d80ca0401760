//! Maps one decoded instruction onto its handler and tells the executor how to
//! continue.

use std::time::Duration;

use stagehand_api_core::coercion;
use stagehand_script_core::{Block, Instruction};

use crate::config::seconds;
use crate::context::RunContext;
use crate::diagnostics::RuntimeEvent;
use crate::executor::{Frame, Repeat};
use crate::handlers;
use crate::view::ActorView;

pub(crate) enum Flow {
    /// Continue with the next instruction.
    Next,
    /// Run a nested block before continuing.
    Enter(Frame),
    /// Yield to the scheduler for at least this long.
    Suspend(Duration),
}

pub(crate) fn dispatch<V: ActorView>(
    ctx: &mut RunContext<V>,
    actor: &str,
    instr: &Instruction,
) -> Flow {
    log::trace!("{actor}: {}", instr.label());
    match instr {
        Instruction::Move { direction, amount } => {
            handlers::move_actor(ctx, actor, *direction, amount)
        }
        Instruction::Show => handlers::set_visible(ctx, actor, true),
        Instruction::Hide => handlers::set_visible(ctx, actor, false),
        Instruction::Scale(factor) => handlers::scale(ctx, actor, factor),
        Instruction::Rotate(degrees) => handlers::rotate(ctx, actor, degrees),
        Instruction::Say(text) => handlers::say(ctx, actor, text),
        Instruction::SetVar { var, value } => handlers::set_var(ctx, actor, var, value),
        Instruction::ChangeVar { var, by } => handlers::change_var(ctx, actor, var, by),
        Instruction::Math { op, var, value } => handlers::math(ctx, actor, *op, var, value),
        Instruction::Wait(secs) => {
            let secs = coercion::to_number_or(&ctx.resolve(secs), 0.0);
            return Flow::Suspend(seconds(secs));
        }
        Instruction::Repeat { times, body } => {
            let count = coercion::to_number_or(&ctx.resolve(times), 0.0).floor();
            if count >= 1.0 && !body.is_empty() {
                // Saturating float-to-int cast; the current pass is the first.
                let remaining = (count as u64).saturating_sub(1);
                return Flow::Enter(Frame::new(body.clone(), Repeat::Times(remaining)));
            }
        }
        Instruction::If { cond, then } => {
            if ctx.evaluate(cond) {
                return enter_once(then);
            }
        }
        Instruction::IfElse {
            cond,
            then,
            otherwise,
        } => {
            let branch = if ctx.evaluate(cond) { then } else { otherwise };
            return enter_once(branch);
        }
        Instruction::Forever { body } => {
            return Flow::Enter(Frame::new(body.clone(), Repeat::Forever));
        }
        Instruction::Unknown { key } => {
            log::warn!("{actor}: unknown instruction `{key}` skipped");
            ctx.events.push(RuntimeEvent::UnknownInstruction {
                actor: actor.to_string(),
                key: key.clone(),
            });
        }
        Instruction::Malformed { key, reason } => {
            log::warn!("{actor}: malformed `{key}` skipped: {reason}");
            ctx.events.push(RuntimeEvent::MalformedPayload {
                actor: actor.to_string(),
                key: key.clone(),
                reason: reason.clone(),
            });
        }
    }
    Flow::Next
}

fn enter_once(block: &Block) -> Flow {
    if block.is_empty() {
        Flow::Next
    } else {
        Flow::Enter(Frame::new(block.clone(), Repeat::Once))
    }
}
