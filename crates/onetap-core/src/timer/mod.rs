mod format;
mod preset;
mod session;

pub use format::format_mm_ss;
pub use preset::{PresetIcon, PresetTable, TimerPreset};
pub use session::{RunId, TimerSession, TimerStatus};
