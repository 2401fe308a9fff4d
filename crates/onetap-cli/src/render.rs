//! Terminal rendering of the controller state.
//!
//! Frames are plain strings so they can be compared: the screen is only
//! redrawn when the frame changes.

use std::io::{self, Write};

use onetap_core::storage::UiConfig;
use onetap_core::{Clock, MotivationState, PresetIcon, PresetTable, TimerApp, TimerStatus};

const APP_TITLE: &str = "OneTap Timer";
const BAR_WIDTH: usize = 32;

pub fn icon_glyph(icon: PresetIcon) -> &'static str {
    match icon {
        PresetIcon::Zap => "⚡",
        PresetIcon::Coffee => "☕",
        PresetIcon::Bed => "🛏",
        PresetIcon::Egg => "🥚",
        PresetIcon::Dumbbell => "🏋",
        PresetIcon::Code => "💻",
        PresetIcon::Sparkles => "✨",
    }
}

/// `progress` in 0.0 ..= 1.0, rendered `width` cells wide.
pub fn progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn dashboard(presets: &PresetTable) -> String {
    let mut out = format!("{APP_TITLE}\nPick a widget and get going\n\n");
    for preset in presets.iter() {
        out.push_str(&format!(
            "  [{}] {} {:<16} {:>3} min\n",
            preset.id,
            icon_glyph(preset.icon),
            preset.name,
            preset.duration_min()
        ));
    }
    out.push_str("\nType a preset id and press Enter. q quits.\n");
    out
}

pub fn active(status: TimerStatus, name: &str, remaining: &str, progress: f64) -> String {
    let label = if status == TimerStatus::Paused {
        "PAUSED"
    } else {
        "RUNNING"
    };
    let controls = if status == TimerStatus::Paused {
        "r resume"
    } else {
        "p pause"
    };
    format!(
        "{label}\n\n    {remaining}\n    {}\n\n{}\n\n{controls} · f focus mode · x cancel\n",
        name.to_uppercase(),
        progress_bar(progress, BAR_WIDTH),
    )
}

/// Minimal view for focus mode: just the time and a thin bar.
pub fn focus(remaining: &str, progress: f64) -> String {
    format!(
        "\n\n\n            {remaining}\n\n{}\n\nf to return\n",
        progress_bar(progress, BAR_WIDTH)
    )
}

pub fn completed(name: &str, motivation: &MotivationState) -> String {
    let mut out = format!("Done!\n{name} timer finished.\n\n");
    match motivation {
        MotivationState::Ready { motivation, .. } => {
            out.push_str(&format!("  \"{}\"\n", motivation.message));
            if let Some(fact) = &motivation.fun_fact {
                out.push_str(&format!("\n  Fact: {fact}\n"));
            }
        }
        MotivationState::Loading { .. } => out.push_str("  Writing your feedback...\n"),
        MotivationState::None => {}
    }
    out.push_str("\na again · d done\n");
    out
}

/// The whole frame for the current state, plus an optional notice line.
pub fn frame<C: Clock>(app: &TimerApp<C>, notice: Option<&str>) -> String {
    let session = app.session();
    let mut out = match (session.status(), session.preset()) {
        (TimerStatus::Running | TimerStatus::Paused, Some(preset)) => {
            let progress = session.progress().unwrap_or(0.0);
            if app.focus_mode() {
                focus(&session.remaining_formatted(), progress)
            } else {
                active(
                    session.status(),
                    &preset.name,
                    &session.remaining_formatted(),
                    progress,
                )
            }
        }
        (TimerStatus::Completed, Some(preset)) => completed(&preset.name, app.motivation()),
        _ => dashboard(app.presets()),
    };
    if let Some(notice) = notice {
        out.push_str(&format!("\n! {notice}\n"));
    }
    out
}

/// Window title mirroring the countdown while a timer is active.
pub fn title<C: Clock>(app: &TimerApp<C>) -> String {
    let session = app.session();
    match session.preset() {
        Some(preset) if session.status().is_active() => {
            format!("{} · {}", session.remaining_formatted(), preset.name)
        }
        _ => APP_TITLE.to_string(),
    }
}

/// Owns the terminal output and skips redraws of identical frames.
pub struct Screen<W: Write> {
    out: W,
    ui: UiConfig,
    last_frame: Option<String>,
    last_title: Option<String>,
}

impl<W: Write> Screen<W> {
    pub fn new(out: W, ui: UiConfig) -> Self {
        Self {
            out,
            ui,
            last_frame: None,
            last_title: None,
        }
    }

    pub fn draw<C: Clock>(&mut self, app: &TimerApp<C>, notice: Option<&str>) -> io::Result<()> {
        if self.ui.title_preview {
            let title = title(app);
            if self.last_title.as_deref() != Some(title.as_str()) {
                write!(self.out, "\x1b]0;{title}\x07")?;
                self.last_title = Some(title);
            }
        }

        let frame = frame(app, notice);
        if self.last_frame.as_deref() == Some(frame.as_str()) {
            return self.out.flush();
        }
        if self.ui.clear_screen {
            write!(self.out, "\x1b[2J\x1b[H")?;
        } else {
            writeln!(self.out)?;
        }
        write!(self.out, "{frame}")?;
        self.last_frame = Some(frame);
        self.out.flush()
    }

    /// Leave the terminal the way we found it.
    pub fn finish(&mut self) -> io::Result<()> {
        if self.ui.title_preview && self.last_title.is_some() {
            write!(self.out, "\x1b]0;\x07")?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }
}
