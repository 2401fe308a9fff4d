//! Completion notifier -- sound and notification side effects of a run.
//!
//! Notifiers are fire-and-forget. They must not block and must not fail back
//! into the caller: missing audio, a closed terminal or a denied notification
//! permission never affect the timer.

mod audio;
mod payload;
mod terminal;

pub use audio::{AudioCue, Tone, Waveform};
pub use payload::Notification;
pub use terminal::TerminalNotifier;

/// Reacts to run boundaries of the timer session.
pub trait CompletionNotifier: Send + Sync {
    /// Called exactly once per Running -> Completed transition.
    fn on_completed(&self, preset_name: &str);

    /// Called when a run starts.
    fn on_started(&self, _preset_name: &str) {
        // default no-op
    }
}

/// Does nothing. Used when notifications are switched off.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl CompletionNotifier for SilentNotifier {
    fn on_completed(&self, _preset_name: &str) {}
}

impl<N: CompletionNotifier + ?Sized> CompletionNotifier for std::sync::Arc<N> {
    fn on_completed(&self, preset_name: &str) {
        (**self).on_completed(preset_name)
    }

    fn on_started(&self, preset_name: &str) {
        (**self).on_started(preset_name)
    }
}
