//! Cooperative scheduling on a virtual clock.
//!
//! Streams only give up control at suspension points. A suspended stream is
//! parked in the timer queue and resumed when the clock reaches its due time;
//! timers with equal due times fire in creation order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

use crate::diagnostics::{RuntimeEvent, TickFrame};
use crate::executor::StreamStep;
use crate::view::ActorView;
use crate::Runtime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TimerKind {
    /// Resume the stream at this index.
    Resume(usize),
    /// Remove a speech bubble if it is still the actor's current one.
    ExpireBubble { actor: String, bubble: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Timer {
    pub due: Duration,
    pub seq: u64,
    /// Zero-duration yields created during a tick wait for the next tick.
    pub zero_delay: bool,
    pub kind: TimerKind,
}

// Min-heap on (due, seq).
impl Ord for Timer {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Default)]
pub(crate) struct TimerQueue {
    heap: BinaryHeap<Timer>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn schedule(&mut self, now: Duration, delay: Duration, kind: TimerKind) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.heap.push(Timer {
            due: now.saturating_add(delay),
            seq,
            zero_delay: delay.is_zero(),
            kind,
        });
    }

    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.heap.peek().map(|t| t.due)
    }

    /// Pop the earliest timer if it is due at or before `limit`.
    pub fn pop_due(&mut self, limit: Duration) -> Option<Timer> {
        if self.heap.peek()?.due <= limit {
            self.heap.pop()
        } else {
            None
        }
    }

    pub fn push(&mut self, timer: Timer) {
        self.heap.push(timer);
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

/// Advance the clock by `dt`, firing due timers in order.
pub(crate) fn run_tick<V: ActorView>(rt: &mut Runtime<V>, dt: Duration) -> TickFrame {
    rt.ctx.epoch = rt.ctx.epoch.wrapping_add(1);
    let target = rt.ctx.now.saturating_add(dt);
    let tick_start = rt.ctx.timers.next_seq();
    let budget = rt.ctx.config.max_resumes_per_tick.max(1);

    let mut frame = TickFrame {
        epoch: rt.ctx.epoch,
        ..TickFrame::default()
    };
    let mut deferred = Vec::new();

    while let Some(timer) = rt.ctx.timers.pop_due(target) {
        if timer.zero_delay && timer.seq >= tick_start {
            deferred.push(timer);
            continue;
        }
        if frame.resumed >= budget && matches!(timer.kind, TimerKind::Resume(_)) {
            log::warn!(
                "tick {}: resume budget of {budget} exhausted; remaining streams roll over",
                rt.ctx.epoch
            );
            deferred.push(timer);
            break;
        }
        rt.ctx.now = rt.ctx.now.max(timer.due);
        match timer.kind {
            TimerKind::Resume(idx) => {
                frame.resumed += 1;
                if let Some(actor) = resume_stream(rt, idx) {
                    frame.finished.push(actor);
                }
            }
            TimerKind::ExpireBubble { actor, bubble } => expire_bubble(rt, &actor, bubble),
        }
    }
    for timer in deferred {
        rt.ctx.timers.push(timer);
    }

    rt.ctx.now = rt.ctx.now.max(target);
    frame.now = rt.ctx.now;
    frame.events = std::mem::take(&mut rt.ctx.events);
    frame
}

/// Run one slice of stream `idx` and park it according to the outcome.
/// Returns the actor name when the stream finished.
pub(crate) fn resume_stream<V: ActorView>(rt: &mut Runtime<V>, idx: usize) -> Option<String> {
    let Some(stream) = rt.streams.get_mut(idx) else {
        return None;
    };
    match stream.step(&mut rt.ctx, &rt.token) {
        StreamStep::Suspend(delay) if delay == Duration::MAX => {
            log::debug!("stream `{}` parked indefinitely", stream.actor());
            None
        }
        StreamStep::Suspend(delay) => {
            log::debug!("stream `{}` suspended for {delay:?}", stream.actor());
            rt.ctx
                .timers
                .schedule(rt.ctx.now, delay, TimerKind::Resume(idx));
            None
        }
        StreamStep::Done => {
            log::debug!("stream `{}` finished", stream.actor());
            let actor = stream.actor().to_string();
            rt.ctx.events.push(RuntimeEvent::StreamFinished {
                actor: actor.clone(),
            });
            Some(actor)
        }
        StreamStep::Cancelled => {
            log::debug!("stream `{}` cancelled", stream.actor());
            rt.ctx.events.push(RuntimeEvent::StreamCancelled {
                actor: stream.actor().to_string(),
            });
            None
        }
    }
}

fn expire_bubble<V: ActorView>(rt: &mut Runtime<V>, actor: &str, bubble: u64) {
    if let Some(state) = rt.ctx.actors.get_mut(actor) {
        if state.bubble == Some(bubble) {
            state.bubble = None;
            rt.ctx.view.remove_bubble(state.view);
        }
    }
}

/// Tick until every stream is done or the clock passes `limit`. Jumps straight
/// to the next due timer; pending zero-duration yields advance by one frame.
pub(crate) fn run_until_idle<V: ActorView>(rt: &mut Runtime<V>, limit: Duration) -> bool {
    loop {
        if rt.is_idle() {
            return true;
        }
        let now = rt.ctx.now;
        if now >= limit {
            return false;
        }
        let Some(next_due) = rt.ctx.timers.next_due() else {
            return false;
        };
        let dt = if next_due > now {
            next_due - now
        } else {
            rt.ctx.config.frame_duration()
        };
        rt.tick(dt.min(limit - now));
    }
}
