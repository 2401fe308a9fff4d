use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{RunId, TimerStatus};

/// Every state change of the session produces an Event.
/// The presentation layer renders snapshots; collaborators react to the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        run_id: RunId,
        preset_id: String,
        preset_name: String,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        run_id: RunId,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        run_id: RunId,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// The deadline elapsed. Emitted exactly once per run.
    TimerCompleted {
        run_id: RunId,
        preset_name: String,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        status: TimerStatus,
        run_id: RunId,
        preset_id: Option<String>,
        preset_name: Option<String>,
        remaining_secs: u64,
        remaining_formatted: String,
        /// 0.0 .. 1.0, absent while Idle.
        progress: Option<f64>,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn run_id(&self) -> Option<RunId> {
        match self {
            Event::TimerStarted { run_id, .. }
            | Event::TimerPaused { run_id, .. }
            | Event::TimerResumed { run_id, .. }
            | Event::TimerCompleted { run_id, .. }
            | Event::StateSnapshot { run_id, .. } => Some(*run_id),
            Event::TimerReset { .. } => None,
        }
    }
}

/// Convert an epoch-millisecond reading into an event timestamp.
pub(crate) fn timestamp(now_ms: u64) -> DateTime<Utc> {
    i64::try_from(now_ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or_default()
}
