//! Universal Chess Interface (UCI) protocol, GUI side.
//!
//! Renders the commands a controlling program sends to an engine and
//! decodes the lines the engine answers with.

pub mod command;
pub mod options;
pub mod report;
pub mod response;

pub use command::{parse_gui_command, GuiCommand};
pub use options::{effective_options, ContemptRange, OptionSet, OptionValue, CONTEMPT_OPTIONS};
pub use report::{EngineDetails, SearchResult, PONDER_NONE};
pub use response::{EngineLine, READY_OK};

/// Position sent to the engine. The session never mirrors it locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Position {
    /// Moves played from the standard starting position
    StartPos(Vec<String>),
    /// A FEN string, passed through unvalidated
    Fen(String),
}

impl Position {
    #[must_use]
    pub fn startpos() -> Self {
        Position::StartPos(Vec::new())
    }

    #[must_use]
    pub fn to_command(&self) -> GuiCommand {
        match self {
            Position::StartPos(moves) => GuiCommand::PositionStart(moves.clone()),
            Position::Fen(fen) => GuiCommand::PositionFen(fen.clone()),
        }
    }
}

/// Whether `mv` has the shape of a long algebraic move (`e2e4`, `e7e8q`).
///
/// Shape only: no legality check.
#[must_use]
pub fn is_long_algebraic(mv: &str) -> bool {
    let b = mv.as_bytes();
    let square = |f: u8, r: u8| (b'a'..=b'h').contains(&f) && (b'1'..=b'8').contains(&r);
    match b.len() {
        4 => square(b[0], b[1]) && square(b[2], b[3]),
        5 => square(b[0], b[1]) && square(b[2], b[3]) && b"qrbn".contains(&b[4]),
        _ => false,
    }
}
