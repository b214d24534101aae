use std::env;
use std::process::ExitCode;

use uci_session::{EngineSession, SessionConfig};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        eprintln!("usage: uci_session [--fen <fen>] [<move1> <move2> ...]");
        eprintln!("engine: UCI_ENGINE_PATH (default: stockfish next to this binary)");
        eprintln!("depth:  UCI_ENGINE_DEPTH (default 2)");
        return ExitCode::SUCCESS;
    }

    let config = match SessionConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(2);
        }
    };

    match run(config, &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: SessionConfig, args: &[String]) -> Result<(), uci_session::SessionError> {
    let mut session = EngineSession::start(config)?;
    for warning in session.warnings() {
        eprintln!("warning: {warning}");
    }

    session.new_game()?;
    match args {
        [flag, fen, ..] if flag == "--fen" => session.set_fen_position(fen)?,
        moves => session.set_position(moves)?,
    }

    let result = session.search()?;
    println!("engine: {}", session.details().name);
    println!("info: {}", result.info);
    println!("bestmove {} ponder {}", result.best_move, result.ponder_or_none());

    session.quit()?;
    Ok(())
}
