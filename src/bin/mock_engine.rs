//! Scripted UCI responder for integration tests.
//!
//! Knows no chess. It answers the handshake, accepts a fixed set of options
//! and replies to `go` with canned moves. Extra check options switch on
//! failure modes:
//! - `Omit Ponder`: `bestmove` without a ponder move
//! - `Stall On Go`: no output after `go` until `stop`
//! - `Crash On Go`: exit without answering `go`
//! - `Ignore Quit`: keep running after `quit` and end of input
//! - `Latin1 Info`: a Latin-1 encoded `info string` line before the search output
//! - `Blank Before Bestmove`: an empty line right before `bestmove`
//! - `Stall On Ready`: never answer `isready` again
//! - `Crash On Ready`: exit instead of answering `isready`

use std::io::{self, BufRead, Write};
use std::process;
use std::thread;
use std::time::Duration;

use uci_session::uci::{parse_gui_command, GuiCommand, OptionSet, OptionValue};

/// Names from the session's default table this engine does not know.
const UNSUPPORTED: [&str; 2] = ["Contempt Factor", "Min Split Depth"];

const FLAGS: [&str; 8] = [
    "Omit Ponder",
    "Stall On Go",
    "Crash On Go",
    "Ignore Quit",
    "Latin1 Info",
    "Blank Before Bestmove",
    "Stall On Ready",
    "Crash On Ready",
];

const OPENING_LINE: [&str; 6] = ["e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "a7a6"];

struct MockEngine {
    options: OptionSet,
    /// Side to move is black
    black_to_move: bool,
    plies: usize,
    searching: bool,
}

impl MockEngine {
    fn new() -> Self {
        let mut options: OptionSet = OptionSet::defaults()
            .iter()
            .filter(|(name, _)| !UNSUPPORTED.contains(name))
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
        options.insert("Ponder", true);
        for flag in FLAGS {
            options.insert(flag, false);
        }
        MockEngine {
            options,
            black_to_move: false,
            plies: 0,
            searching: false,
        }
    }

    fn flag(&self, name: &str) -> bool {
        self.options.get(name) == Some(&OptionValue::Bool(true))
    }

    fn handle(&mut self, cmd: GuiCommand, out: &mut impl Write) -> io::Result<bool> {
        match cmd {
            GuiCommand::Uci => {
                writeln!(out, "id name MockEngine")?;
                writeln!(out, "id author uci_session")?;
                for (name, value) in self.options.iter() {
                    let kind = match value {
                        OptionValue::Bool(_) => "check",
                        OptionValue::Int(_) => "spin",
                        OptionValue::Text(_) => "string",
                    };
                    writeln!(out, "option name {name} type {kind} default {value}")?;
                }
                writeln!(out, "uciok")?;
            }
            GuiCommand::IsReady => {
                if self.flag("Crash On Ready") {
                    out.flush()?;
                    process::exit(4);
                }
                if !self.flag("Stall On Ready") {
                    writeln!(out, "readyok")?;
                }
            }
            GuiCommand::UciNewGame => {
                self.black_to_move = false;
                self.plies = 0;
            }
            GuiCommand::SetOption { name, value } => {
                if self.options.get(&name).is_some() {
                    self.options.insert(name, value);
                } else {
                    writeln!(out, "No such option: {name}")?;
                }
            }
            GuiCommand::PositionStart(moves) => {
                self.plies = moves.len();
                self.black_to_move = moves.len() % 2 == 1;
            }
            GuiCommand::PositionFen(fen) => {
                self.plies = 0;
                self.black_to_move = fen.split_whitespace().nth(1) == Some("b");
            }
            GuiCommand::GoDepth(depth) => {
                if self.flag("Crash On Go") {
                    out.flush()?;
                    process::exit(3);
                }
                if self.flag("Latin1 Info") {
                    out.write_all(b"info string Jos\xE9 Ra\xFAl Capablanca\n")?;
                }
                if self.flag("Stall On Go") {
                    self.searching = true;
                } else {
                    for d in 1..=depth {
                        writeln!(out, "{}", self.info_line(d))?;
                    }
                    self.best_move(out)?;
                }
            }
            GuiCommand::Stop => {
                if self.searching {
                    self.searching = false;
                    self.best_move(out)?;
                }
            }
            GuiCommand::Quit => return Ok(self.flag("Ignore Quit")),
        }
        Ok(true)
    }

    fn moves(&self) -> (&'static str, &'static str) {
        if self.plies + 1 < OPENING_LINE.len() {
            (OPENING_LINE[self.plies], OPENING_LINE[self.plies + 1])
        } else if self.black_to_move {
            ("a7a6", "a2a3")
        } else {
            ("a2a3", "a7a6")
        }
    }

    fn info_line(&self, depth: u32) -> String {
        let (best, ponder) = self.moves();
        format!(
            "info depth {depth} seldepth {depth} score cp {} nodes {} pv {best} {ponder}",
            12 * depth,
            20 * depth
        )
    }

    fn best_move(&self, out: &mut impl Write) -> io::Result<()> {
        let (best, ponder) = self.moves();
        if self.flag("Blank Before Bestmove") {
            writeln!(out)?;
        }
        if self.flag("Omit Ponder") {
            writeln!(out, "bestmove {best}")
        } else {
            writeln!(out, "bestmove {best} ponder {ponder}")
        }
    }
}

fn main() -> io::Result<()> {
    let mut engine = MockEngine::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        match parse_gui_command(&line) {
            Some(Ok(cmd)) => {
                if !engine.handle(cmd, &mut stdout)? {
                    return Ok(());
                }
            }
            Some(Err(unknown)) => writeln!(stdout, "Unknown command: {unknown}")?,
            None => {}
        }
        stdout.flush()?;
    }

    if engine.flag("Ignore Quit") {
        loop {
            thread::sleep(Duration::from_secs(60));
        }
    }
    Ok(())
}
