use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Square,
}

/// One synthesized tone, relative to the start of its cue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    pub waveform: Waveform,
    pub start_hz: f32,
    /// Frequency reached at the end of the tone; equal to `start_hz` when flat.
    pub end_hz: f32,
    pub offset_ms: u64,
    pub duration_ms: u64,
    pub gain: f32,
}

/// Sounds the timer makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioCue {
    /// Short falling chirp when a run starts.
    Beep,
    /// Triple square-wave beep when a run completes.
    Alarm,
}

impl AudioCue {
    pub fn tones(self) -> Vec<Tone> {
        match self {
            AudioCue::Beep => vec![Tone {
                waveform: Waveform::Sine,
                start_hz: 880.0,
                end_hz: 440.0,
                offset_ms: 0,
                duration_ms: 500,
                gain: 0.1,
            }],
            AudioCue::Alarm => [0, 400, 800]
                .into_iter()
                .map(|offset_ms| Tone {
                    waveform: Waveform::Square,
                    start_hz: 600.0,
                    end_hz: 600.0,
                    offset_ms,
                    duration_ms: 200,
                    gain: 0.1,
                })
                .collect(),
        }
    }

    /// Total length of the cue in milliseconds.
    pub fn duration_ms(self) -> u64 {
        self.tones()
            .iter()
            .map(|t| t.offset_ms + t.duration_ms)
            .max()
            .unwrap_or(0)
    }
}
