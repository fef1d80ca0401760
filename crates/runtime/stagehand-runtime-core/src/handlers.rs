//! Leaf instruction handlers. None of them suspend, and every handler that
//! targets an actor is a no-op when the actor does not exist.

use stagehand_api_core::{coercion, Value};
use stagehand_script_core::{Direction, Expression, MathOp};

use crate::context::RunContext;
use crate::scheduler::TimerKind;
use crate::view::ActorView;

pub(crate) fn move_actor<V: ActorView>(
    ctx: &mut RunContext<V>,
    actor: &str,
    direction: Direction,
    amount: &Expression,
) {
    let amount = coercion::to_number_or(&ctx.resolve(amount), 0.0);
    let Some(state) = ctx.actors.get_mut(actor) else {
        return;
    };
    let (dx, dy) = direction.offset(amount);
    state.x += dx;
    state.y += dy;
    ctx.view.set_position(state.view, state.x, state.y);
}

pub(crate) fn set_visible<V: ActorView>(ctx: &mut RunContext<V>, actor: &str, visible: bool) {
    let Some(state) = ctx.actors.get_mut(actor) else {
        return;
    };
    state.visible = visible;
    ctx.view.set_visible(state.view, visible);
}

/// Absolute: zero or non-numeric factors mean `1`.
pub(crate) fn scale<V: ActorView>(ctx: &mut RunContext<V>, actor: &str, factor: &Expression) {
    let factor = coercion::to_number_or(&ctx.resolve(factor), 1.0);
    let Some(state) = ctx.actors.get_mut(actor) else {
        return;
    };
    state.scale = factor;
    ctx.view.set_transform(state.view, state.scale, state.rotation);
}

/// Additive, in degrees.
pub(crate) fn rotate<V: ActorView>(ctx: &mut RunContext<V>, actor: &str, degrees: &Expression) {
    let degrees = coercion::to_number_or(&ctx.resolve(degrees), 0.0);
    let Some(state) = ctx.actors.get_mut(actor) else {
        return;
    };
    state.rotation += degrees;
    ctx.view.set_transform(state.view, state.scale, state.rotation);
}

/// Replace the actor's bubble and schedule its removal. The removal only takes
/// effect if no newer bubble replaced it in the meantime.
pub(crate) fn say<V: ActorView>(ctx: &mut RunContext<V>, actor: &str, text: &Expression) {
    let text = coercion::to_display_string(&ctx.resolve(text));
    let serial = ctx.alloc_bubble();
    let Some(state) = ctx.actors.get_mut(actor) else {
        return;
    };
    if state.bubble.take().is_some() {
        ctx.view.remove_bubble(state.view);
    }
    ctx.view.show_bubble(state.view, &text);
    state.bubble = Some(serial);
    let delay = ctx.config.bubble_duration();
    ctx.timers.schedule(
        ctx.now,
        delay,
        TimerKind::ExpireBubble {
            actor: actor.to_string(),
            bubble: serial,
        },
    );
}

pub(crate) fn set_var<V: ActorView>(
    ctx: &mut RunContext<V>,
    actor: &str,
    var: &str,
    value: &Expression,
) {
    let value = ctx.resolve(value);
    log::trace!("{actor}: {var} = {value:?}");
    ctx.variables.set(var, value, actor, ctx.epoch);
}

/// `current + by` with host `+` semantics: text on either side concatenates.
/// A falsy current value counts as `0`.
pub(crate) fn change_var<V: ActorView>(
    ctx: &mut RunContext<V>,
    actor: &str,
    var: &str,
    by: &Expression,
) {
    let by = ctx.resolve(by);
    let current = match ctx.variables.get_raw(var) {
        Some(raw) if coercion::is_truthy(raw) => raw.clone(),
        _ => Value::ZERO,
    };
    let next = coercion::loose_add(&current, &by);
    log::trace!("{actor}: {var} -> {next:?}");
    ctx.variables.set(var, next, actor, ctx.epoch);
}

/// Arithmetic on the numeric reading of the variable: a falsy current value
/// counts as `0`, anything else is coerced and may be NaN. Division or modulo
/// by an operand of exactly zero leaves the variable untouched.
pub(crate) fn math<V: ActorView>(
    ctx: &mut RunContext<V>,
    actor: &str,
    op: MathOp,
    var: &str,
    value: &Expression,
) {
    let operand = coercion::to_number(&ctx.resolve(value));
    if operand == 0.0 && matches!(op, MathOp::Divide | MathOp::Mod) {
        log::debug!("{actor}: math-{} on `{var}` by zero skipped", op.as_str());
        return;
    }
    let current = match ctx.variables.get_raw(var) {
        Some(raw) if coercion::is_truthy(raw) => coercion::to_number(raw),
        _ => 0.0,
    };
    let next = op.apply(current, operand);
    ctx.variables.set(var, Value::Number(next), actor, ctx.epoch);
}
