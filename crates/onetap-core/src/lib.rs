//! # OneTap Timer Core Library
//!
//! This library provides the core logic of the OneTap Timer: pick a preset,
//! count down, and celebrate when it is done. Front ends (the `onetap` CLI)
//! are thin presentation layers over the same controller.
//!
//! ## Architecture
//!
//! - **Timer Session**: A wall-clock deadline state machine that requires the
//!   caller to periodically invoke `tick()`; remaining time is re-derived from
//!   the deadline on every tick
//! - **Controller**: Intent dispatch, focus mode, and correlation of late
//!   motivation replies with the run they were requested for
//! - **Collaborators**: Completion notifier (sound, notification) and
//!   motivation fetcher (Gemini with local fallback)
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`TimerSession`]: Core timer state machine
//! - [`TimerApp`]: Controller used by front ends
//! - [`Config`]: Application configuration management
//! - [`MotivationFetcher`] / [`CompletionNotifier`]: Collaborator traits

pub mod app;
pub mod clock;
pub mod error;
pub mod events;
pub mod motivation;
pub mod notify;
pub mod storage;
pub mod timer;

pub use app::{Intent, MotivationState, TimerApp};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, MotivationError, ValidationError};
pub use events::Event;
pub use motivation::{
    spawn_fetch, GeminiFetcher, Locale, Motivation, MotivationFetcher, MotivationReply,
    MotivationRequest, OfflineFetcher,
};
pub use notify::{CompletionNotifier, SilentNotifier, TerminalNotifier};
pub use storage::Config;
pub use timer::{format_mm_ss, PresetIcon, PresetTable, RunId, TimerPreset, TimerSession, TimerStatus};
