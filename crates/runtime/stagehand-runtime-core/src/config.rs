//! Run configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunables for one runtime. Every field has a default, so partial JSON
/// configs deserialize cleanly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Lifetime of a speech bubble created by `looks-say`.
    pub bubble_seconds: f64,
    /// Clock advance used by `run_until_idle`/`run_for` when only zero-duration
    /// yields are pending.
    pub frame_seconds: f64,
    /// Stream resumptions processed in one tick before the rest roll over.
    pub max_resumes_per_tick: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            bubble_seconds: 2.0,
            frame_seconds: 1.0 / 60.0,
            max_resumes_per_tick: 10_000,
        }
    }
}

const MIN_FRAME: Duration = Duration::from_millis(1);

impl RunConfig {
    pub fn bubble_duration(&self) -> Duration {
        seconds(self.bubble_seconds)
    }

    /// Never shorter than one millisecond so clock-driven loops always advance.
    pub fn frame_duration(&self) -> Duration {
        seconds(self.frame_seconds).max(MIN_FRAME)
    }
}

/// Non-finite or negative seconds clamp to zero; overflow saturates.
pub(crate) fn seconds(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: RunConfig = serde_json::from_str(r#"{"bubble_seconds": 0.5}"#).unwrap();
        assert_eq!(cfg.bubble_seconds, 0.5);
        assert_eq!(cfg.max_resumes_per_tick, 10_000);
    }

    #[test]
    fn frame_duration_has_a_floor() {
        let cfg = RunConfig {
            frame_seconds: 0.0,
            ..RunConfig::default()
        };
        assert_eq!(cfg.frame_duration(), Duration::from_millis(1));
        assert_eq!(seconds(f64::INFINITY), Duration::MAX);
        assert_eq!(seconds(-1.0), Duration::ZERO);
    }
}
