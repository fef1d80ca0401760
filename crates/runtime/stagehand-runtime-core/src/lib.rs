//! stagehand-runtime-core
//!
//! Executes decoded stagehand programs: one instruction stream per actor, all
//! driven by a cooperative scheduler on a virtual clock. Hosts advance the
//! clock with [`Runtime::tick`] (or the `run_*` helpers) and observe the
//! results through an [`ActorView`].

pub mod actors;
pub mod assets;
pub mod cancel;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod eval;
pub mod executor;
pub mod variables;
pub mod view;

mod dispatch;
mod handlers;
mod scheduler;

use std::time::Duration;

use serde_json::{Map, Value as JsonValue};

use stagehand_api_core::Value;
use stagehand_script_core::Program;

pub use crate::actors::{Actor, ActorStore};
pub use crate::assets::{AssetLibrary, AssetRegistry};
pub use crate::cancel::CancelToken;
pub use crate::config::RunConfig;
pub use crate::context::RunContext;
pub use crate::diagnostics::{RuntimeEvent, StartReport, TickFrame};
pub use crate::error::MissingAssetError;
pub use crate::executor::StreamPhase;
pub use crate::variables::{VariableEntry, VariableStore};
pub use crate::view::{ActorView, RecordingView};

use crate::executor::Stream;

/// One program run: actors, variables, streams and the clock that drives them.
pub struct Runtime<V: ActorView> {
    pub(crate) ctx: RunContext<V>,
    assets: Box<dyn AssetRegistry>,
    pub(crate) streams: Vec<Stream>,
    pub(crate) token: CancelToken,
    meta: Map<String, JsonValue>,
}

impl<V: ActorView> Runtime<V> {
    pub fn new(view: V, assets: impl AssetRegistry + 'static, config: RunConfig) -> Self {
        Self {
            ctx: RunContext::new(view, config),
            assets: Box::new(assets),
            streams: Vec::new(),
            token: CancelToken::new(),
            meta: Map::new(),
        }
    }

    /// Cancel every stream of the current run and clear all run state.
    /// Streams observe the cancelled token and never resume.
    pub fn reset(&mut self) {
        self.token.cancel();
        self.token = CancelToken::new();
        self.streams.clear();
        self.meta.clear();
        self.ctx.clear();
        log::debug!("runtime reset at epoch {}", self.ctx.epoch);
    }

    /// Create one actor at the origin. Re-creating an existing name replaces
    /// its state; the old view is left to the host.
    pub fn create_actor(&mut self, name: &str, asset: &str) -> Result<(), MissingAssetError> {
        self.ctx
            .actors
            .create(name, asset, self.assets.as_ref(), &mut self.ctx.view)
            .map(|_| ())
    }

    /// Reset, create every manifest actor, then launch one stream per `code`
    /// entry. Each stream runs its first slice immediately, in `code` order.
    ///
    /// Missing assets are reported and skipped; streams of actors without a
    /// view still run and their actor-targeted instructions are no-ops.
    pub fn start(&mut self, program: &Program) -> StartReport {
        self.reset();
        self.meta = program.meta.clone();

        let mut report = StartReport {
            diagnostics: program.diagnostics(),
            ..StartReport::default()
        };

        for (actor, asset) in &program.sprites {
            match self.create_actor(actor, asset) {
                Ok(()) => report.actors.push(actor.clone()),
                Err(err) => {
                    log::warn!("{err}");
                    report.missing_assets.push(err);
                }
            }
        }

        for (actor, block) in &program.code {
            self.streams.push(Stream::new(actor, block.clone()));
            report.streams.push(actor.clone());
        }
        for idx in 0..self.streams.len() {
            if let Some(actor) = scheduler::resume_stream(self, idx) {
                report.finished.push(actor);
            }
        }
        report.events = std::mem::take(&mut self.ctx.events);

        log::info!(
            "started {} actors, {} streams ({} missing assets, {} timers pending)",
            report.actors.len(),
            report.streams.len(),
            report.missing_assets.len(),
            self.ctx.timers.len()
        );
        report
    }

    /// Advance the clock by `dt`, resuming every stream whose timer falls due.
    pub fn tick(&mut self, dt: Duration) -> TickFrame {
        scheduler::run_tick(self, dt)
    }

    /// Tick until nothing is scheduled or the clock reaches `limit`. Returns
    /// true when idle.
    pub fn run_until_idle(&mut self, limit: Duration) -> bool {
        scheduler::run_until_idle(self, limit)
    }

    /// Advance by `duration` in frame-sized ticks, merging the per-tick reports.
    pub fn run_for(&mut self, duration: Duration) -> TickFrame {
        let frame = self.ctx.config.frame_duration();
        let end = self.ctx.now.saturating_add(duration);
        let mut merged = TickFrame {
            epoch: self.ctx.epoch,
            now: self.ctx.now,
            ..TickFrame::default()
        };
        while self.ctx.now < end {
            let dt = frame.min(end - self.ctx.now);
            let tick = self.tick(dt);
            merged.absorb(tick);
        }
        merged
    }

    /// Nothing left to resume or expire.
    pub fn is_idle(&self) -> bool {
        self.ctx.timers.is_empty()
    }

    pub fn now(&self) -> Duration {
        self.ctx.now
    }

    pub fn epoch(&self) -> u64 {
        self.ctx.epoch
    }

    pub fn actor(&self, name: &str) -> Option<&Actor> {
        self.ctx.actors.get(name)
    }

    pub fn actors(&self) -> &ActorStore {
        &self.ctx.actors
    }

    /// Current value of a global variable (unset reads as `0`).
    pub fn variable(&self, name: &str) -> Value {
        self.ctx.variables.get(name)
    }

    pub fn variables(&self) -> &VariableStore {
        &self.ctx.variables
    }

    pub fn view(&self) -> &V {
        &self.ctx.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.ctx.view
    }

    /// `meta` section of the running program.
    pub fn meta(&self) -> &Map<String, JsonValue> {
        &self.meta
    }

    pub fn stream_states(&self) -> Vec<(String, StreamPhase)> {
        self.streams
            .iter()
            .map(|s| (s.actor().to_string(), s.phase()))
            .collect()
    }

    pub fn config(&self) -> &RunConfig {
        &self.ctx.config
    }

    /// Token of the current run. Cancelling it stops every stream at its next
    /// check; [`Runtime::reset`] and [`Runtime::start`] issue a fresh one.
    pub fn cancel_token(&self) -> CancelToken {
        self.token.clone()
    }
}
