use serde::{Deserialize, Serialize};

const NOTIFICATION_ICON: &str = "https://cdn-icons-png.flaticon.com/512/2921/2921226.png";

/// What a platform notification would show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    /// Alternating vibrate/pause lengths in milliseconds.
    pub vibration: Vec<u32>,
}

impl Notification {
    pub fn completed(preset_name: &str) -> Self {
        Self {
            title: "Time's up!".into(),
            body: format!("{preset_name} is done."),
            icon: NOTIFICATION_ICON.into(),
            vibration: vec![200, 100, 200],
        }
    }

    /// OSC 9 escape sequence, shown as a desktop notification by terminals
    /// that support it and ignored by the rest.
    pub fn to_osc9(&self) -> String {
        let text = format!("{} {}", self.title, self.body);
        let text: String = text.chars().filter(|c| !c.is_control()).collect();
        format!("\x1b]9;{text}\x07")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_payload_names_preset() {
        let n = Notification::completed("Focus");
        assert_eq!(n.body, "Focus is done.");
        assert_eq!(n.vibration, vec![200, 100, 200]);
    }

    #[test]
    fn osc9_strips_control_characters() {
        let n = Notification::completed("Evil\x07\x1bName");
        let osc = n.to_osc9();
        assert_eq!(osc, "\x1b]9;Time's up! EvilName is done.\x07");
    }
}
