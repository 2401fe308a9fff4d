//! Timer session state machine.
//!
//! The session is driven by wall-clock readings supplied by the caller. It
//! does not schedule anything itself: while it is Running, someone has to call
//! [`TimerSession::tick`] periodically.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -start-> Running <-pause/resume-> Paused
//! Running -deadline-> Completed -restart-> Running
//! any -reset-> Idle
//! ```
//!
//! Remaining time is re-derived from the absolute deadline on every tick
//! instead of being decremented, so a suspended process or a throttled tick
//! source catches up on the next reading.
//!
//! ## Usage
//!
//! ```ignore
//! let mut session = TimerSession::new();
//! session.start(&preset, clock.now_ms());
//! // In a loop:
//! session.tick(clock.now_ms()); // Returns Some(Event::TimerCompleted) once
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::format::format_mm_ss;
use super::preset::TimerPreset;
use crate::events::{timestamp, Event};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    #[default]
    Idle,
    Running,
    Paused,
    Completed,
}

impl TimerStatus {
    /// Running or Paused.
    pub fn is_active(self) -> bool {
        matches!(self, TimerStatus::Running | TimerStatus::Paused)
    }
}

/// Identifies one run of the session, from `start` to its end.
///
/// Asynchronous work is tagged with the run it was requested for, so results
/// that arrive after the user moved on can be recognised and dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub u64);

impl RunId {
    fn next(self) -> Self {
        RunId(self.0.wrapping_add(1))
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run-{}", self.0)
    }
}

/// The single mutable timer of the application.
#[derive(Debug, Clone, Default)]
pub struct TimerSession {
    status: TimerStatus,
    preset: Option<TimerPreset>,
    /// Absolute deadline, only while Running.
    target_end_epoch_ms: Option<u64>,
    /// Authoritative while Paused or Completed; a display value while Running.
    remaining_secs: u64,
    run_id: RunId,
}

impl TimerSession {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn preset(&self) -> Option<&TimerPreset> {
        self.preset.as_ref()
    }

    pub fn target_end_epoch_ms(&self) -> Option<u64> {
        self.target_end_epoch_ms
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// 0.0 .. 1.0 of the bound preset that has elapsed.
    ///
    /// Clamped, because a clock that jumped backwards can push the remaining
    /// time above the preset duration.
    pub fn progress(&self) -> Option<f64> {
        let total = self.preset.as_ref()?.duration_secs;
        if total == 0 {
            return None;
        }
        let elapsed = total as f64 - self.remaining_secs as f64;
        Some((elapsed / total as f64).clamp(0.0, 1.0))
    }

    pub fn remaining_formatted(&self) -> String {
        format_mm_ss(self.remaining_secs)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now_ms: u64) -> Event {
        Event::StateSnapshot {
            status: self.status,
            run_id: self.run_id,
            preset_id: self.preset.as_ref().map(|p| p.id.clone()),
            preset_name: self.preset.as_ref().map(|p| p.name.clone()),
            remaining_secs: self.remaining_secs,
            remaining_formatted: self.remaining_formatted(),
            progress: self.progress(),
            at: timestamp(now_ms),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Bind `preset` and start counting down from its full duration.
    ///
    /// An active run is reset first. Presets without a positive duration are
    /// refused.
    pub fn start(&mut self, preset: &TimerPreset, now_ms: u64) -> Option<Event> {
        if !preset.is_startable() {
            debug!(preset = %preset.id, "refusing to start a zero-length preset");
            return None;
        }
        if self.status.is_active() {
            debug!(run = %self.run_id, "starting over an active run");
            self.clear();
        }

        self.run_id = self.run_id.next();
        self.preset = Some(preset.clone());
        self.target_end_epoch_ms = Some(now_ms.saturating_add(preset.duration_ms()));
        self.remaining_secs = preset.duration_secs;
        self.status = TimerStatus::Running;

        Some(Event::TimerStarted {
            run_id: self.run_id,
            preset_id: preset.id.clone(),
            preset_name: preset.name.clone(),
            duration_secs: preset.duration_secs,
            at: timestamp(now_ms),
        })
    }

    pub fn pause(&mut self, now_ms: u64) -> Option<Event> {
        if self.status != TimerStatus::Running {
            trace!(status = ?self.status, "pause ignored");
            return None;
        }

        let remaining = self.remaining_at(now_ms);
        if remaining == 0 {
            // The deadline passed between ticks.
            return self.complete(now_ms);
        }

        self.remaining_secs = remaining;
        self.target_end_epoch_ms = None;
        self.status = TimerStatus::Paused;
        Some(Event::TimerPaused {
            run_id: self.run_id,
            remaining_secs: self.remaining_secs,
            at: timestamp(now_ms),
        })
    }

    pub fn resume(&mut self, now_ms: u64) -> Option<Event> {
        if self.status != TimerStatus::Paused || self.preset.is_none() {
            trace!(status = ?self.status, "resume ignored");
            return None;
        }

        self.target_end_epoch_ms =
            Some(now_ms.saturating_add(self.remaining_secs.saturating_mul(1000)));
        self.status = TimerStatus::Running;
        Some(Event::TimerResumed {
            run_id: self.run_id,
            remaining_secs: self.remaining_secs,
            at: timestamp(now_ms),
        })
    }

    /// Call periodically. Returns `Some(Event::TimerCompleted)` when the
    /// deadline has elapsed; a no-op outside Running.
    pub fn tick(&mut self, now_ms: u64) -> Option<Event> {
        if self.status != TimerStatus::Running {
            return None;
        }

        let remaining = self.remaining_at(now_ms);
        if remaining == 0 {
            return self.complete(now_ms);
        }
        self.remaining_secs = remaining;
        None
    }

    /// Start the bound preset again. Only valid once a run has completed.
    pub fn restart(&mut self, now_ms: u64) -> Option<Event> {
        if self.status != TimerStatus::Completed {
            trace!(status = ?self.status, "restart ignored");
            return None;
        }
        let preset = self.preset.clone()?;
        self.start(&preset, now_ms)
    }

    /// Back to Idle from any state. Always emits `TimerReset`.
    pub fn reset(&mut self, now_ms: u64) -> Option<Event> {
        self.clear();
        Some(Event::TimerReset {
            at: timestamp(now_ms),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self, now_ms: u64) -> Option<Event> {
        if self.status != TimerStatus::Running || self.remaining_at(now_ms) > 0 {
            return None;
        }

        self.remaining_secs = 0;
        self.target_end_epoch_ms = None;
        self.status = TimerStatus::Completed;
        let preset_name = self.preset.as_ref().map(|p| p.name.clone())?;
        debug!(run = %self.run_id, preset = %preset_name, "run completed");
        Some(Event::TimerCompleted {
            run_id: self.run_id,
            preset_name,
            at: timestamp(now_ms),
        })
    }

    /// Whole seconds left at `now_ms`, rounded up so the display never runs
    /// out early.
    fn remaining_at(&self, now_ms: u64) -> u64 {
        match self.target_end_epoch_ms {
            Some(target) => target.saturating_sub(now_ms).div_ceil(1000),
            None => self.remaining_secs,
        }
    }

    fn clear(&mut self) {
        self.status = TimerStatus::Idle;
        self.preset = None;
        self.target_end_epoch_ms = None;
        self.remaining_secs = 0;
    }
}
