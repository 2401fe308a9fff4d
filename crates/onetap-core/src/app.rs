//! Application controller.
//!
//! Binds the session to a clock and the collaborators, and holds the bits of
//! presentation state that depend on the run: focus mode and the motivation
//! shown on the completion screen. Front ends forward [`Intent`]s here and
//! render [`TimerApp::snapshot`].

use tracing::{debug, info};

use crate::clock::Clock;
use crate::events::Event;
use crate::motivation::{Locale, Motivation, MotivationReply, MotivationRequest};
use crate::notify::CompletionNotifier;
use crate::timer::{PresetTable, RunId, TimerSession, TimerStatus};

/// A user action forwarded by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Start the preset with this id.
    Start(String),
    Pause,
    Resume,
    Reset,
    /// Start the completed preset again.
    Restart,
    ToggleFocus,
}

/// Motivation as seen by the completion screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MotivationState {
    #[default]
    None,
    Loading {
        run_id: RunId,
    },
    Ready {
        run_id: RunId,
        motivation: Motivation,
    },
}

pub struct TimerApp<C: Clock> {
    clock: C,
    presets: PresetTable,
    session: TimerSession,
    notifier: Box<dyn CompletionNotifier>,
    locale: Locale,
    focus_mode: bool,
    motivation: MotivationState,
    pending_request: Option<MotivationRequest>,
}

impl<C: Clock> TimerApp<C> {
    pub fn new(
        clock: C,
        presets: PresetTable,
        notifier: Box<dyn CompletionNotifier>,
        locale: Locale,
    ) -> Self {
        Self {
            clock,
            presets,
            session: TimerSession::new(),
            notifier,
            locale,
            focus_mode: false,
            motivation: MotivationState::None,
            pending_request: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session(&self) -> &TimerSession {
        &self.session
    }

    pub fn presets(&self) -> &PresetTable {
        &self.presets
    }

    pub fn focus_mode(&self) -> bool {
        self.focus_mode
    }

    pub fn motivation(&self) -> &MotivationState {
        &self.motivation
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn snapshot(&self) -> Event {
        self.session.snapshot(self.clock.now_ms())
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn dispatch(&mut self, intent: Intent) -> Option<Event> {
        let now = self.clock.now_ms();
        let event = match intent {
            Intent::Start(id) => {
                let Some(preset) = self.presets.find(&id).cloned() else {
                    debug!(preset = %id, "start ignored, unknown preset");
                    return None;
                };
                self.session.start(&preset, now)
            }
            Intent::Pause => self.session.pause(now),
            Intent::Resume => self.session.resume(now),
            Intent::Reset => self.session.reset(now),
            Intent::Restart => self.session.restart(now),
            Intent::ToggleFocus => {
                if self.session.status().is_active() {
                    self.focus_mode = !self.focus_mode;
                }
                None
            }
        };
        self.after(event)
    }

    /// Drive the session from the clock. Call periodically while Running.
    pub fn tick(&mut self) -> Option<Event> {
        let event = self.session.tick(self.clock.now_ms());
        self.after(event)
    }

    /// Start the preset named by an external parameter, once.
    ///
    /// The parameter is consumed whether or not it starts anything, so
    /// re-entering does not restart the timer. Only applies while Idle.
    pub fn deep_link_start(&mut self, param: &mut Option<String>) -> Option<Event> {
        let id = param.take()?;
        if self.session.status() != TimerStatus::Idle {
            debug!(preset = %id, "deep link ignored, timer already in use");
            return None;
        }
        info!(preset = %id, "starting from deep link");
        self.dispatch(Intent::Start(id))
    }

    /// Motivation the event loop should fetch, if a run just completed.
    pub fn take_request(&mut self) -> Option<MotivationRequest> {
        self.pending_request.take()
    }

    /// Merge a fetched motivation into the completion screen.
    ///
    /// Returns `false` and drops the reply when it belongs to a run the user
    /// has since reset or replaced.
    pub fn apply_motivation(&mut self, reply: MotivationReply) -> bool {
        let expected = matches!(
            self.motivation,
            MotivationState::Loading { run_id } if run_id == reply.run_id
        );
        if !expected
            || self.session.status() != TimerStatus::Completed
            || self.session.run_id() != reply.run_id
        {
            debug!(run = %reply.run_id, current = %self.session.run_id(), "dropping stale motivation");
            return false;
        }

        self.motivation = MotivationState::Ready {
            run_id: reply.run_id,
            motivation: reply.motivation,
        };
        true
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn after(&mut self, event: Option<Event>) -> Option<Event> {
        match &event {
            Some(Event::TimerStarted { preset_name, .. }) => {
                self.focus_mode = false;
                self.motivation = MotivationState::None;
                self.pending_request = None;
                self.notifier.on_started(preset_name);
            }
            Some(Event::TimerCompleted {
                run_id,
                preset_name,
                ..
            }) => {
                self.focus_mode = false;
                self.notifier.on_completed(preset_name);
                self.motivation = MotivationState::Loading { run_id: *run_id };
                self.pending_request = Some(MotivationRequest {
                    run_id: *run_id,
                    preset_name: preset_name.clone(),
                    locale: self.locale,
                });
            }
            Some(Event::TimerReset { .. }) => {
                self.focus_mode = false;
                self.motivation = MotivationState::None;
                self.pending_request = None;
            }
            _ => {}
        }
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl CompletionNotifier for Recorder {
        fn on_completed(&self, preset_name: &str) {
            self.0.lock().unwrap().push(format!("completed:{preset_name}"));
        }

        fn on_started(&self, preset_name: &str) {
            self.0.lock().unwrap().push(format!("started:{preset_name}"));
        }
    }

    fn app() -> (TimerApp<Arc<ManualClock>>, Arc<ManualClock>, Arc<Recorder>) {
        let clock = Arc::new(ManualClock::new(0));
        let recorder = Arc::new(Recorder::default());
        let app = TimerApp::new(
            clock.clone(),
            PresetTable::default(),
            Box::new(recorder.clone()),
            Locale::En,
        );
        (app, clock, recorder)
    }

    #[test]
    fn completion_notifies_once_and_queues_fetch() {
        let (mut app, clock, recorder) = app();
        app.dispatch(Intent::Start("2".into()));
        clock.set(300_000);
        assert!(matches!(app.tick(), Some(Event::TimerCompleted { .. })));
        assert!(app.tick().is_none());

        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec!["started:Short Break", "completed:Short Break"]
        );
        let request = app.take_request().unwrap();
        assert_eq!(request.preset_name, "Short Break");
        assert_eq!(request.locale, Locale::En);
        assert!(app.take_request().is_none());
        assert_eq!(
            app.motivation(),
            &MotivationState::Loading {
                run_id: request.run_id
            }
        );
    }

    #[test]
    fn fresh_motivation_is_applied() {
        let (mut app, clock, _) = app();
        app.dispatch(Intent::Start("2".into()));
        clock.set(300_000);
        app.tick();
        let request = app.take_request().unwrap();

        let motivation = Motivation::fallback(Locale::En);
        assert!(app.apply_motivation(MotivationReply {
            run_id: request.run_id,
            motivation: motivation.clone(),
        }));
        assert_eq!(
            app.motivation(),
            &MotivationState::Ready {
                run_id: request.run_id,
                motivation
            }
        );
    }

    #[test]
    fn unknown_preset_is_ignored() {
        let (mut app, _, recorder) = app();
        assert!(app.dispatch(Intent::Start("nope".into())).is_none());
        assert_eq!(app.session().status(), TimerStatus::Idle);
        assert!(recorder.0.lock().unwrap().is_empty());
    }

    #[test]
    fn focus_mode_only_while_active_and_cleared_on_transitions() {
        let (mut app, clock, _) = app();
        app.dispatch(Intent::ToggleFocus);
        assert!(!app.focus_mode());

        app.dispatch(Intent::Start("1".into()));
        app.dispatch(Intent::ToggleFocus);
        assert!(app.focus_mode());

        clock.set(1_500_000);
        app.tick();
        assert!(!app.focus_mode());

        app.dispatch(Intent::Restart);
        app.dispatch(Intent::ToggleFocus);
        assert!(app.focus_mode());
        app.dispatch(Intent::Reset);
        assert!(!app.focus_mode());
    }

    #[test]
    fn deep_link_consumes_parameter() {
        let (mut app, _, _) = app();
        let mut param = Some("3".to_string());
        assert!(app.deep_link_start(&mut param).is_some());
        assert!(param.is_none());
        assert_eq!(app.session().preset().unwrap().name, "Nap");

        // Re-entry does nothing.
        assert!(app.deep_link_start(&mut param).is_none());
    }

    #[test]
    fn deep_link_ignored_when_not_idle() {
        let (mut app, _, _) = app();
        app.dispatch(Intent::Start("1".into()));
        let run = app.session().run_id();
        let mut param = Some("3".to_string());
        assert!(app.deep_link_start(&mut param).is_none());
        assert!(param.is_none());
        assert_eq!(app.session().run_id(), run);
    }
}
