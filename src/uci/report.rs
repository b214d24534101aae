use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::response::EngineLine;

/// Value reported for the ponder move when the engine gave none.
pub const PONDER_NONE: &str = "none";

/// Outcome of one `go` command.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchResult {
    /// Best move in long algebraic notation, e.g. `e2e4`
    pub best_move: String,
    pub ponder: Option<String>,
    /// Last line the engine printed before `bestmove`, empty if none
    pub info: String,
}

impl SearchResult {
    /// Ponder move, or [`PONDER_NONE`] when absent.
    #[must_use]
    pub fn ponder_or_none(&self) -> &str {
        self.ponder.as_deref().unwrap_or(PONDER_NONE)
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bestmove {}", self.best_move)?;
        if let Some(ponder) = &self.ponder {
            write!(f, " ponder {ponder}")?;
        }
        Ok(())
    }
}

/// What the engine said about itself during the `uci` handshake.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineDetails {
    pub name: String,
    pub author: String,
    /// Advertised option names, in the order the engine listed them
    pub options: Vec<String>,
}

impl EngineDetails {
    pub fn new<'a>(lines: impl IntoIterator<Item = &'a EngineLine>) -> Self {
        let mut res = EngineDetails::default();

        for line in lines {
            match line {
                EngineLine::IdName(s) => res.name = s.clone(),
                EngineLine::IdAuthor(s) => res.author = s.clone(),
                EngineLine::Option(name) => res.options.push(name.clone()),
                _ => {}
            }
        }

        res
    }

    #[must_use]
    pub fn advertises(&self, option: &str) -> bool {
        self.options.iter().any(|o| o.eq_ignore_ascii_case(option))
    }
}
