//! Per-actor instruction streams.
//!
//! A stream is an explicit stack of frames instead of a call stack, so it can
//! be parked at any suspension point and resumed later by the scheduler.

use std::time::Duration;

use serde::Serialize;

use stagehand_script_core::Block;

use crate::cancel::CancelToken;
use crate::context::RunContext;
use crate::dispatch::{dispatch, Flow};
use crate::view::ActorView;

/// How a frame behaves once its block runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Repeat {
    Once,
    /// Passes left after the current one.
    Times(u64),
    /// Yields to the scheduler between passes.
    Forever,
}

#[derive(Debug, Clone)]
pub(crate) struct Frame {
    block: Block,
    pc: usize,
    repeat: Repeat,
}

impl Frame {
    pub fn new(block: Block, repeat: Repeat) -> Self {
        Self {
            block,
            pc: 0,
            repeat,
        }
    }
}

/// Externally visible lifecycle of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamPhase {
    Ready,
    Suspended,
    Done,
    Cancelled,
}

pub(crate) enum StreamStep {
    Suspend(Duration),
    Done,
    Cancelled,
}

#[derive(Debug)]
pub(crate) struct Stream {
    actor: String,
    frames: Vec<Frame>,
    phase: StreamPhase,
}

impl Stream {
    pub fn new(actor: &str, block: Block) -> Self {
        Self {
            actor: actor.to_string(),
            frames: vec![Frame::new(block, Repeat::Once)],
            phase: StreamPhase::Ready,
        }
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    pub fn phase(&self) -> StreamPhase {
        self.phase
    }

    /// Run instructions until the stream suspends, finishes or observes
    /// cancellation. The token is checked on entry and before every
    /// instruction.
    pub fn step<V: ActorView>(
        &mut self,
        ctx: &mut RunContext<V>,
        token: &CancelToken,
    ) -> StreamStep {
        match self.phase {
            StreamPhase::Done => return StreamStep::Done,
            StreamPhase::Cancelled => return StreamStep::Cancelled,
            StreamPhase::Ready | StreamPhase::Suspended => {}
        }
        let outcome = self.run(ctx, token);
        self.phase = match outcome {
            StreamStep::Suspend(_) => StreamPhase::Suspended,
            StreamStep::Done => StreamPhase::Done,
            StreamStep::Cancelled => StreamPhase::Cancelled,
        };
        outcome
    }

    fn run<V: ActorView>(&mut self, ctx: &mut RunContext<V>, token: &CancelToken) -> StreamStep {
        loop {
            if token.is_cancelled() {
                self.frames.clear();
                return StreamStep::Cancelled;
            }
            let Some(frame) = self.frames.last_mut() else {
                return StreamStep::Done;
            };

            if frame.pc >= frame.block.len() {
                match frame.repeat {
                    Repeat::Once | Repeat::Times(0) => {
                        self.frames.pop();
                    }
                    Repeat::Times(left) => {
                        frame.repeat = Repeat::Times(left - 1);
                        frame.pc = 0;
                    }
                    Repeat::Forever => {
                        frame.pc = 0;
                        return StreamStep::Suspend(Duration::ZERO);
                    }
                }
                continue;
            }

            let block = frame.block.clone();
            let pc = frame.pc;
            frame.pc += 1;
            match dispatch(ctx, &self.actor, &block[pc]) {
                Flow::Next => {}
                Flow::Enter(child) => self.frames.push(child),
                Flow::Suspend(delay) => return StreamStep::Suspend(delay),
            }
        }
    }
}
