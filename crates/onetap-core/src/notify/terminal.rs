use std::io::Write;
use std::sync::Mutex;

use tracing::{debug, info};

use super::{AudioCue, CompletionNotifier, Notification};

/// Plays cues as terminal bells and raises notifications as OSC 9 escapes.
///
/// Output goes to any writer; failures are logged and otherwise ignored.
pub struct TerminalNotifier {
    sink: Mutex<Box<dyn Write + Send>>,
    sound: bool,
    notifications: bool,
}

impl TerminalNotifier {
    pub fn new(sink: Box<dyn Write + Send>, sound: bool, notifications: bool) -> Self {
        Self {
            sink: Mutex::new(sink),
            sound,
            notifications,
        }
    }

    /// Notifier writing to standard error, leaving stdout to the renderer.
    pub fn stderr(sound: bool, notifications: bool) -> Self {
        Self::new(Box::new(std::io::stderr()), sound, notifications)
    }

    fn play(&self, cue: AudioCue) {
        if !self.sound {
            return;
        }
        let bells = "\x07".repeat(cue.tones().len());
        self.emit(&bells);
    }

    fn emit(&self, text: &str) {
        let Ok(mut sink) = self.sink.lock() else {
            debug!("notifier sink poisoned, dropping output");
            return;
        };
        if let Err(e) = sink.write_all(text.as_bytes()).and_then(|_| sink.flush()) {
            debug!(error = %e, "notifier write failed");
        }
    }
}

impl CompletionNotifier for TerminalNotifier {
    fn on_started(&self, preset_name: &str) {
        debug!(preset = preset_name, "start cue");
        self.play(AudioCue::Beep);
    }

    fn on_completed(&self, preset_name: &str) {
        info!(preset = preset_name, "timer finished");
        self.play(AudioCue::Alarm);
        if self.notifications {
            self.emit(&Notification::completed(preset_name).to_osc9());
        }
    }
}
