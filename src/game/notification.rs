use std::fmt;
use std::str::FromStr;

use crate::error::AgentError;

/// Outcome of the previous shot, as reported by the game driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notification {
    /// The previous shot missed (or no shot has been fired yet).
    RequestShot,
    Hit,
    Destroyed,
}

impl Notification {
    /// Wire token understood by the game driver.
    pub fn token(self) -> &'static str {
        match self {
            Notification::RequestShot => "shoot",
            Notification::Hit => "hit",
            Notification::Destroyed => "destroyed",
        }
    }
}

impl FromStr for Notification {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shoot" => Ok(Notification::RequestShot),
            "hit" => Ok(Notification::Hit),
            "destroyed" => Ok(Notification::Destroyed),
            other => Err(AgentError::InvalidNotification(format!(
                "unknown token '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
