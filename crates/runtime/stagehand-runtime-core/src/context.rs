//! State shared by every stream of one run.

use std::time::Duration;

use stagehand_api_core::Value;
use stagehand_script_core::{Condition, Expression};

use crate::actors::ActorStore;
use crate::config::RunConfig;
use crate::diagnostics::RuntimeEvent;
use crate::eval;
use crate::scheduler::TimerQueue;
use crate::variables::VariableStore;
use crate::view::ActorView;

/// Actors, variables, the view and the clock. Handlers receive it mutably; the
/// scheduler only lends it to one stream at a time.
pub struct RunContext<V: ActorView> {
    pub(crate) actors: ActorStore,
    pub(crate) variables: VariableStore,
    pub(crate) view: V,
    pub(crate) config: RunConfig,
    pub(crate) timers: TimerQueue,
    pub(crate) events: Vec<RuntimeEvent>,
    pub(crate) now: Duration,
    pub(crate) epoch: u64,
    next_bubble: u64,
}

impl<V: ActorView> RunContext<V> {
    pub(crate) fn new(view: V, config: RunConfig) -> Self {
        Self {
            actors: ActorStore::new(),
            variables: VariableStore::new(),
            view,
            config,
            timers: TimerQueue::default(),
            events: Vec::new(),
            now: Duration::ZERO,
            epoch: 0,
            next_bubble: 0,
        }
    }

    pub fn resolve(&self, expr: &Expression) -> Value {
        eval::resolve(expr, &self.variables)
    }

    pub fn evaluate(&self, cond: &Condition) -> bool {
        eval::evaluate(cond, &self.variables)
    }

    pub fn actors(&self) -> &ActorStore {
        &self.actors
    }

    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub(crate) fn alloc_bubble(&mut self) -> u64 {
        self.next_bubble += 1;
        self.next_bubble
    }

    /// Forget all run state and clear the view. The clock restarts at zero.
    pub(crate) fn clear(&mut self) {
        self.actors.clear();
        self.variables.clear();
        self.timers.clear();
        self.events.clear();
        self.now = Duration::ZERO;
        self.view.clear_all();
    }
}
