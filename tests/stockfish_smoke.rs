//! Runs against a real engine when `STOCKFISH_PATH` points at one.

use std::env;
use std::time::Duration;

use uci_session::uci::is_long_algebraic;
use uci_session::{EngineSession, SessionConfig};

fn real_engine(depth: u32) -> Option<EngineSession> {
    let Some(path) = env::var_os("STOCKFISH_PATH") else {
        eprintln!("STOCKFISH_PATH not set, skipping");
        return None;
    };
    let config = SessionConfig::new(path)
        .with_depth(depth)
        .with_option("Threads", 1)
        .with_option("Hash", 16)
        .with_read_timeout(Duration::from_secs(20));
    Some(EngineSession::start(config).expect("failed to start engine"))
}

#[test]
fn fresh_game_returns_opening_move() {
    let Some(mut session) = real_engine(2) else {
        return;
    };
    session.new_game().unwrap();
    session.set_position::<&str>(&[]).unwrap();

    let result = session.search().unwrap();
    assert!(is_long_algebraic(&result.best_move), "{}", result.best_move);
    let rank = &result.best_move[1..2];
    assert!(rank == "1" || rank == "2", "not a white first move: {}", result.best_move);
}

#[test]
fn depth_one_search_reports_info() {
    let Some(mut session) = real_engine(1) else {
        return;
    };
    session.set_position::<&str>(&[]).unwrap();

    let result = session.search().unwrap();
    assert!(is_long_algebraic(&result.best_move));
    assert!(result.info.starts_with("info"), "info: {}", result.info);
    assert_eq!(session.is_ready().unwrap(), "readyok");
}

#[test]
fn fen_then_search_does_not_error() {
    let Some(mut session) = real_engine(2) else {
        return;
    };
    session
        .set_fen_position("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
        .unwrap();
    assert!(session.search().is_ok());
}
