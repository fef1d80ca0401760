//! Per-tick reports and runtime events.

use std::time::Duration;

use serde::Serialize;

use stagehand_script_core::Diagnostic;

use crate::error::MissingAssetError;

/// Non-fatal occurrences surfaced to hosts alongside log records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RuntimeEvent {
    UnknownInstruction {
        actor: String,
        key: String,
    },
    MalformedPayload {
        actor: String,
        key: String,
        reason: String,
    },
    StreamFinished {
        actor: String,
    },
    StreamCancelled {
        actor: String,
    },
}

/// Result of one [`Runtime::tick`](crate::Runtime::tick).
#[derive(Debug, Clone, Default, Serialize)]
pub struct TickFrame {
    pub epoch: u64,
    /// Clock value after the tick.
    pub now: Duration,
    /// Stream resumptions performed.
    pub resumed: usize,
    /// Streams that reached `Done` during the tick, in completion order.
    pub finished: Vec<String>,
    pub events: Vec<RuntimeEvent>,
}

impl TickFrame {
    /// Fold a later frame into this one.
    pub fn absorb(&mut self, later: TickFrame) {
        self.epoch = later.epoch;
        self.now = later.now;
        self.resumed += later.resumed;
        self.finished.extend(later.finished);
        self.events.extend(later.events);
    }
}

/// Outcome of [`Runtime::start`](crate::Runtime::start).
#[derive(Debug, Clone, Default, Serialize)]
pub struct StartReport {
    /// Actors created from the manifest, in order.
    pub actors: Vec<String>,
    /// Streams launched, in order.
    pub streams: Vec<String>,
    /// Manifest entries whose asset was not registered. Shown to the user; the
    /// rest of the run proceeds.
    pub missing_assets: Vec<MissingAssetError>,
    /// Instructions that will be skipped when reached.
    pub diagnostics: Vec<Diagnostic>,
    /// Events raised while running each stream's first slice.
    pub events: Vec<RuntimeEvent>,
    /// Streams that completed during their first slice.
    pub finished: Vec<String>,
}
