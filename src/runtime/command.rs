//! Console commands

/// A parsed console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Shut everything down
    Quit,
    /// Start the active split's timer
    Start,
    /// Stop the active split's timer
    Stop,
    /// Zero every timer and rebuild the splits from config
    Reset,
    /// Write records to the record file
    Save,
    /// Activate the split with this name or shortcut
    Activate(String),
}

impl Command {
    /// Parse one line of input
    ///
    /// Returns `None` for blank lines. Anything that is not a built-in
    /// command is taken as a split reference; whether it resolves is decided
    /// when the command is applied.
    pub fn parse(line: &str) -> Option<Self> {
        let token = line.trim();
        let command = match token {
            "" => return None,
            "quit" => Command::Quit,
            "start" => Command::Start,
            "stop" => Command::Stop,
            "reset" => Command::Reset,
            "save" => Command::Save,
            other => Command::Activate(other.to_string()),
        };
        Some(command)
    }
}
