//! Commands sent from the controlling side (GUI) to the engine.

use std::fmt;

use super::options::{parse_setoption, OptionValue};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuiCommand {
    Uci,
    IsReady,
    UciNewGame,
    SetOption { name: String, value: OptionValue },
    PositionStart(Vec<String>),
    PositionFen(String),
    GoDepth(u32),
    Stop,
    Quit,
}

impl fmt::Display for GuiCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuiCommand::Uci => write!(f, "uci"),
            GuiCommand::IsReady => write!(f, "isready"),
            GuiCommand::UciNewGame => write!(f, "ucinewgame"),
            GuiCommand::SetOption { name, value } => {
                write!(f, "setoption name {name} value {value}")
            }
            GuiCommand::PositionStart(moves) if moves.is_empty() => {
                write!(f, "position startpos moves")
            }
            GuiCommand::PositionStart(moves) => {
                write!(f, "position startpos moves {}", moves.join(" "))
            }
            GuiCommand::PositionFen(fen) => write!(f, "position fen {}", fen.trim()),
            GuiCommand::GoDepth(depth) => write!(f, "go depth {depth}"),
            GuiCommand::Stop => write!(f, "stop"),
            GuiCommand::Quit => write!(f, "quit"),
        }
    }
}

/// Parse a command line as an engine would receive it.
///
/// Returns `None` for blank lines and `Some(Err(line))` for commands this
/// crate never sends.
pub fn parse_gui_command(line: &str) -> Option<Result<GuiCommand, String>> {
    let trimmed = line.trim();
    let parts: Vec<&str> = trimmed.split_whitespace().collect();
    let first = *parts.first()?;

    let cmd = match first {
        "uci" => GuiCommand::Uci,
        "isready" => GuiCommand::IsReady,
        "ucinewgame" => GuiCommand::UciNewGame,
        "setoption" => match parse_setoption(&parts) {
            Some((name, value)) => GuiCommand::SetOption {
                name,
                value: value.as_deref().map_or(OptionValue::Text(String::new()), OptionValue::parse),
            },
            None => return Some(Err(trimmed.to_string())),
        },
        "position" => match parts.get(1).copied() {
            Some("startpos") => {
                let moves = match parts.get(2).copied() {
                    Some("moves") => parts[3..].iter().map(|m| (*m).to_string()).collect(),
                    _ => Vec::new(),
                };
                GuiCommand::PositionStart(moves)
            }
            Some("fen") if parts.len() > 2 => GuiCommand::PositionFen(parts[2..].join(" ")),
            _ => return Some(Err(trimmed.to_string())),
        },
        "go" => match (parts.get(1).copied(), parts.get(2)) {
            (Some("depth"), Some(d)) => match d.parse::<u32>() {
                Ok(depth) => GuiCommand::GoDepth(depth),
                Err(_) => return Some(Err(trimmed.to_string())),
            },
            _ => return Some(Err(trimmed.to_string())),
        },
        "stop" => GuiCommand::Stop,
        "quit" => GuiCommand::Quit,
        _ => return Some(Err(trimmed.to_string())),
    };

    Some(Ok(cmd))
}
