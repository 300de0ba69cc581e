//! Prompt commands.

use std::str::FromStr;

use crate::error::ClientError;

/// A line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    /// Agent type as understood by the server (`ECONOMIST`, `risk-manager`, ...)
    Add(String),
    /// Agent id
    Remove(String),
    /// Characters per second
    Speed(u32),
    Agents,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = ClientError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let Some(name) = parts.next() else {
            return Err(ClientError::InvalidCommand("empty command".to_string()));
        };
        let argument = parts.next();
        if parts.next().is_some() {
            return Err(ClientError::InvalidCommand(format!(
                "too many arguments for '{}'",
                name
            )));
        }

        let command = match (name.to_ascii_lowercase().as_str(), argument) {
            ("start", None) => Command::Start,
            ("pause", None) => Command::Pause,
            ("agents", None) => Command::Agents,
            ("help", None) => Command::Help,
            ("quit" | "exit", None) => Command::Quit,
            ("add", Some(agent_type)) => Command::Add(agent_type.to_string()),
            ("remove", Some(agent_id)) => Command::Remove(agent_id.to_string()),
            ("speed", Some(value)) => match value.parse::<u32>() {
                Ok(speed) if speed > 0 => Command::Speed(speed),
                _ => {
                    return Err(ClientError::InvalidCommand(format!(
                        "speed must be a positive integer, got '{}'",
                        value
                    )));
                }
            },
            ("add" | "remove" | "speed", None) => {
                return Err(ClientError::InvalidCommand(format!(
                    "'{}' needs an argument (type 'help')",
                    name
                )));
            }
            _ => {
                return Err(ClientError::InvalidCommand(format!(
                    "unknown command '{}' (type 'help')",
                    line.trim()
                )));
            }
        };
        Ok(command)
    }
}
