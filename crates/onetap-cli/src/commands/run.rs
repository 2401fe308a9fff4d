//! Interactive countdown.
//!
//! A single-threaded loop: the tick interval, stdin lines, motivation replies
//! and Ctrl-C are multiplexed with `select!`, and every transition runs to
//! completion before the next input is looked at.

use std::sync::Arc;

use clap::Args;
use onetap_core::{
    spawn_fetch, CompletionNotifier, Config, Event, GeminiFetcher, Intent, MotivationFetcher,
    MotivationState, OfflineFetcher, SilentNotifier, SystemClock, TerminalNotifier, TimerApp,
    TimerStatus,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::input::{self, Command};
use crate::render::Screen;

#[derive(Args)]
pub struct RunArgs {
    /// Start this preset right away (as a launcher shortcut would)
    #[arg(long, value_name = "ID")]
    start: Option<String>,
    /// Open the started timer in focus mode
    #[arg(long)]
    focus: bool,
    /// Do not ring the terminal bell
    #[arg(long)]
    no_sound: bool,
    /// Never call the motivation provider
    #[arg(long)]
    offline: bool,
    /// Write every timer event as a JSON line to stderr
    #[arg(long)]
    events: bool,
}

fn build_notifier(config: &Config, args: &RunArgs) -> Box<dyn CompletionNotifier> {
    let sound = config.notifications.sound && !args.no_sound;
    let notifications = config.notifications.enabled;
    if !sound && !notifications {
        return Box::new(SilentNotifier);
    }
    Box::new(TerminalNotifier::stderr(sound, notifications))
}

fn build_fetcher(config: &Config, args: &RunArgs) -> Arc<dyn MotivationFetcher> {
    if args.offline || !config.motivation.enabled {
        return Arc::new(OfflineFetcher);
    }
    match GeminiFetcher::new(config.gemini_settings()) {
        Ok(fetcher) => Arc::new(fetcher),
        Err(e) => {
            warn!(error = %e, "motivation provider unavailable, staying offline");
            Arc::new(OfflineFetcher)
        }
    }
}

/// Whether the loop has nothing left to do once stdin is gone.
///
/// A paused timer can only be resumed from stdin, so it counts as settled.
fn settled(app: &TimerApp<SystemClock>) -> bool {
    match app.session().status() {
        TimerStatus::Idle | TimerStatus::Paused => true,
        TimerStatus::Completed => !matches!(app.motivation(), MotivationState::Loading { .. }),
        TimerStatus::Running => false,
    }
}

/// Log a transition and, with `--events`, stream it as a JSON line.
fn report(event: Option<Event>, stream: bool) {
    let Some(event) = event else {
        return;
    };
    match event.run_id() {
        Some(run) => debug!(%run, ?event, "timer event"),
        None => debug!(?event, "timer event"),
    }
    if stream {
        match serde_json::to_string(&event) {
            Ok(line) => eprintln!("{line}"),
            Err(e) => warn!(error = %e, "could not encode event"),
        }
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(event_loop(args));
    // The stdin reader sits on a blocking thread; don't wait for another line.
    runtime.shutdown_background();
    result
}

async fn event_loop(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let fetcher = build_fetcher(&config, &args);
    let mut app = TimerApp::new(
        SystemClock,
        config.presets(),
        build_notifier(&config, &args),
        config.motivation.locale,
    );
    let mut screen = Screen::new(std::io::stdout(), config.ui.clone());

    let mut deep_link = args.start.clone();
    report(app.deep_link_start(&mut deep_link), args.events);
    if args.focus {
        app.dispatch(Intent::ToggleFocus);
    }

    let (replies_tx, mut replies_rx) = mpsc::unbounded_channel();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut notice: Option<String> = None;

    let mut ticker = tokio::time::interval(config.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        if let Some(request) = app.take_request() {
            debug!(run = %request.run_id, "fetching motivation");
            spawn_fetch(fetcher.clone(), request, replies_tx.clone());
        }

        screen.draw(&app, notice.as_deref())?;

        if !stdin_open && settled(&app) {
            break;
        }

        let running = app.session().status() == TimerStatus::Running;
        tokio::select! {
            _ = ticker.tick(), if running => {
                report(app.tick(), args.events);
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => {
                        notice = None;
                        match input::parse(&line) {
                            Some(Command::Quit) => break,
                            Some(Command::Intent(Intent::Start(id))) => {
                                if app.presets().find(&id).is_none() {
                                    notice = Some(format!("no preset with id '{id}'"));
                                }
                                report(app.dispatch(Intent::Start(id)), args.events);
                            }
                            Some(Command::Intent(intent)) => {
                                report(app.dispatch(intent), args.events);
                            }
                            None => {}
                        }
                    }
                    None => {
                        debug!("stdin closed");
                        stdin_open = false;
                    }
                }
            }
            Some(reply) = replies_rx.recv() => {
                app.apply_motivation(reply);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }
    }

    report(Some(app.snapshot()), args.events);
    screen.finish()?;
    Ok(())
}
