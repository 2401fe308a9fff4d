use onetap_core::Intent;

/// One line of user input, interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Intent(Intent),
    Quit,
}

/// Parse a line typed during `onetap run`.
///
/// Single letters are controls; anything else is taken as a preset id.
/// `start <id>` reaches presets whose id collides with a control letter.
pub fn parse(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let command = match line.to_ascii_lowercase().as_str() {
        "p" | "pause" => Command::Intent(Intent::Pause),
        "r" | "resume" => Command::Intent(Intent::Resume),
        "x" | "cancel" | "d" | "done" => Command::Intent(Intent::Reset),
        "a" | "again" => Command::Intent(Intent::Restart),
        "f" | "focus" => Command::Intent(Intent::ToggleFocus),
        "q" | "quit" => Command::Quit,
        _ => {
            let id = line.strip_prefix("start ").map(str::trim).unwrap_or(line);
            Command::Intent(Intent::Start(id.to_string()))
        }
    };
    Some(command)
}
