//! # Events
//!
//! Everything that can steer the selector daemon becomes one of two enums:
//! navigation commands arriving on the control socket (`NavCommand`) and
//! out-of-band registry events pushed from background tasks (`RegistryEvent`)
//! over an mpsc channel; the player's exit monitor and the YouTube submission
//! server both hold a sender.

use std::fmt;
use std::str::FromStr;

/// A navigation command from the control socket (button presses, remote).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    Up,
    Down,
    Select,
    Exit,
}

/// The command string was not one of the known navigation words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCommandError(pub String);

impl fmt::Display for ParseCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown command: {:?}", self.0)
    }
}

impl std::error::Error for ParseCommandError {}

impl FromStr for NavCommand {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(NavCommand::Up),
            "down" => Ok(NavCommand::Down),
            "select" => Ok(NavCommand::Select),
            "exit" => Ok(NavCommand::Exit),
            other => Err(ParseCommandError(other.to_string())),
        }
    }
}

/// Out-of-band events feeding back into the dispatch loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// The active module's stream ended (player exited). Reset to the menu.
    ModuleFinished,
    /// A module claims the screen without going through the menu.
    SelfActivate(String),
    /// The YouTube form submitted a media URL to play immediately.
    PlaySubmitted {
        url: String,
        start_time: Option<u32>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_command_parses_known_words() {
        assert_eq!("up".parse::<NavCommand>().unwrap(), NavCommand::Up);
        assert_eq!("down".parse::<NavCommand>().unwrap(), NavCommand::Down);
        assert_eq!("select".parse::<NavCommand>().unwrap(), NavCommand::Select);
        assert_eq!("exit".parse::<NavCommand>().unwrap(), NavCommand::Exit);
    }

    #[test]
    fn test_nav_command_rejects_unknown() {
        let err = "reboot".parse::<NavCommand>().unwrap_err();
        assert_eq!(err, ParseCommandError("reboot".to_string()));
    }
}
