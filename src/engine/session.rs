//! One engine process and the request/response exchange with it.

use std::process::ExitStatus;
use std::time::Duration;

use rand::Rng;

use super::config::SessionConfig;
use super::process::EngineProcess;
use crate::error::{ConfigurationWarning, DecodeError, SessionError};
use crate::sync::CancelToken;
use crate::uci::{
    effective_options, EngineDetails, EngineLine, GuiCommand, OptionSet, OptionValue, Position,
    SearchResult, READY_OK,
};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Handshake and option setup in progress
    Configuring,
    /// Ready for the next command
    Idle,
    /// `go` was sent and its `bestmove` has not been read yet
    Searching,
    /// The process is gone; every operation fails
    Terminated,
}

/// A running UCI engine.
///
/// Commands are strictly sequential: every state-changing command is
/// followed by an `isready`/`readyok` barrier before the call returns. The
/// engine's position lives only inside the engine process.
pub struct EngineSession {
    process: EngineProcess,
    state: SessionState,
    depth: u32,
    read_timeout: Duration,
    quit_timeout: Duration,
    options: OptionSet,
    details: EngineDetails,
    warnings: Vec<ConfigurationWarning>,
    cancel: CancelToken,
}

impl EngineSession {
    /// Launch the engine and configure it.
    pub fn start(config: SessionConfig) -> Result<Self, SessionError> {
        Self::start_with_rng(config, &mut rand::thread_rng())
    }

    /// [`EngineSession::start`] with a caller-supplied source for random
    /// contempt values.
    pub fn start_with_rng<R: Rng + ?Sized>(
        config: SessionConfig,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        let process = EngineProcess::spawn(&config.engine_path)?;

        let mut session = EngineSession {
            process,
            state: SessionState::Configuring,
            depth: config.depth,
            read_timeout: config.read_timeout,
            quit_timeout: config.quit_timeout,
            options: OptionSet::new(),
            details: EngineDetails::default(),
            warnings: Vec::new(),
            cancel: CancelToken::new(),
        };

        let table = effective_options(&config.overrides, config.contempt.as_ref(), rng);
        let configured = session.checked(|s| {
            s.handshake()?;
            if !config.ponder {
                s.send_option("Ponder", &OptionValue::Bool(false))?;
            }
            for (name, value) in table.iter() {
                s.send_option(name, value)?;
            }
            Ok(())
        });
        configured?;

        session.options = table;
        session.state = SessionState::Idle;
        log::info!(
            "engine '{}' configured: {} options, {} rejected",
            session.details.name,
            session.options.len(),
            session.warnings.len()
        );
        Ok(session)
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Depth sent with `go depth`.
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn set_depth(&mut self, depth: u32) -> Result<(), SessionError> {
        if depth == 0 {
            return Err(SessionError::InvalidConfig(
                "search depth must be at least 1".to_string(),
            ));
        }
        self.depth = depth;
        Ok(())
    }

    /// The option table sent at startup, plus later [`EngineSession::set_option`] calls.
    #[must_use]
    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    #[must_use]
    pub fn details(&self) -> &EngineDetails {
        &self.details
    }

    /// Options the engine refused, in the order they were sent.
    #[must_use]
    pub fn warnings(&self) -> &[ConfigurationWarning] {
        &self.warnings
    }

    /// Token that abandons the current or next search read when cancelled.
    ///
    /// Each search clears the token when it starts.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    #[must_use]
    pub fn is_alive(&mut self) -> bool {
        self.state != SessionState::Terminated && self.process.is_running()
    }

    /// `ucinewgame`. Call before the first position of a new game.
    pub fn new_game(&mut self) -> Result<(), SessionError> {
        self.checked(|s| {
            s.ensure_idle()?;
            s.send(&GuiCommand::UciNewGame)?;
            s.sync_ready().map(drop)
        })
    }

    /// `position startpos moves ...`; an empty list is the starting position.
    pub fn set_position<S: AsRef<str>>(&mut self, moves: &[S]) -> Result<(), SessionError> {
        let moves = moves.iter().map(|m| m.as_ref().to_string()).collect();
        self.apply_position(&Position::StartPos(moves))
    }

    /// `position fen <fen>`. The FEN is not validated.
    pub fn set_fen_position(&mut self, fen: &str) -> Result<(), SessionError> {
        self.apply_position(&Position::Fen(fen.to_string()))
    }

    pub fn apply_position(&mut self, position: &Position) -> Result<(), SessionError> {
        self.checked(|s| {
            s.ensure_idle()?;
            s.send(&position.to_command())?;
            s.sync_ready().map(drop)
        })
    }

    /// Set one option after startup.
    ///
    /// Returns the warning if the engine rejected the name; the warning is
    /// also kept in [`EngineSession::warnings`] and the option is left out of
    /// [`EngineSession::options`].
    pub fn set_option(
        &mut self,
        name: &str,
        value: impl Into<OptionValue>,
    ) -> Result<Option<ConfigurationWarning>, SessionError> {
        let value = value.into();
        self.checked(|s| {
            s.ensure_idle()?;
            let warning = s.send_option(name, &value)?;
            if warning.is_none() {
                s.options.insert(name, value);
            }
            Ok(warning)
        })
    }

    /// Search the current position to the configured depth.
    pub fn search(&mut self) -> Result<SearchResult, SessionError> {
        self.start_search()?;
        self.await_best_move()
    }

    /// Send `go depth <N>` without waiting for the result.
    pub fn start_search(&mut self) -> Result<(), SessionError> {
        self.checked(|s| {
            s.ensure_idle()?;
            s.cancel.reset();
            s.send(&GuiCommand::GoDepth(s.depth))?;
            s.state = SessionState::Searching;
            Ok(())
        })
    }

    /// Read engine output until `bestmove`.
    ///
    /// On cancellation `stop` is sent and the pending `bestmove` is drained
    /// by the next operation.
    pub fn await_best_move(&mut self) -> Result<SearchResult, SessionError> {
        self.checked(|s| {
            if s.state != SessionState::Searching {
                return Err(SessionError::NoSearch);
            }
            let cancel = s.cancel.clone();
            match s.read_best_move(Some(&cancel)) {
                Err(SessionError::Cancelled) => {
                    log::debug!("search cancelled, sending stop");
                    s.send(&GuiCommand::Stop)?;
                    Err(SessionError::Cancelled)
                }
                other => other,
            }
        })
    }

    /// Send `stop` without waiting for the engine's `bestmove`.
    pub fn stop(&mut self) -> Result<(), SessionError> {
        self.checked(|s| s.send(&GuiCommand::Stop))
    }

    /// `stop` and read the `bestmove` it produces. `None` when no search
    /// was running.
    pub fn stop_and_wait(&mut self) -> Result<Option<SearchResult>, SessionError> {
        self.checked(|s| {
            if s.state != SessionState::Searching {
                return Ok(None);
            }
            s.send(&GuiCommand::Stop)?;
            s.read_best_move(None).map(Some)
        })
    }

    /// `isready` barrier. Returns the literal `readyok`.
    pub fn is_ready(&mut self) -> Result<&'static str, SessionError> {
        self.checked(|s| {
            s.ensure_idle()?;
            s.sync_ready()?;
            Ok(READY_OK)
        })
    }

    /// Send `quit`, wait for the process, kill it if it lingers.
    pub fn quit(mut self) -> Result<ExitStatus, SessionError> {
        if self.state == SessionState::Terminated {
            return Err(SessionError::Terminated);
        }
        self.state = SessionState::Terminated;
        Ok(self.process.shutdown(self.quit_timeout)?)
    }

    /// Run `op` unless the session is dead; a fatal error kills the process.
    fn checked<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        if self.state == SessionState::Terminated {
            return Err(SessionError::Terminated);
        }
        let result = op(&mut *self);
        if let Err(e) = &result {
            if e.is_fatal() {
                log::error!("engine session failed: {e}");
                self.state = SessionState::Terminated;
                self.process.kill();
            }
        }
        result
    }

    fn send(&mut self, command: &GuiCommand) -> Result<(), SessionError> {
        self.process.send_line(&command.to_string())
    }

    /// Drain a `bestmove` still owed from a cancelled or unread search.
    fn ensure_idle(&mut self) -> Result<(), SessionError> {
        if self.state == SessionState::Searching {
            let stale = self.read_best_move(None)?;
            log::debug!("discarded unread result: {stale}");
        }
        Ok(())
    }

    fn handshake(&mut self) -> Result<(), SessionError> {
        self.send(&GuiCommand::Uci)?;
        let mut lines = Vec::new();
        loop {
            let raw = self.process.recv_line(self.read_timeout, None, "uciok")?;
            match EngineLine::decode(&raw) {
                Ok(Some(EngineLine::UciOk)) => break,
                Ok(Some(line)) => lines.push(line),
                Ok(None) | Err(_) => {}
            }
        }
        self.details = EngineDetails::new(&lines);
        log::debug!(
            "engine identified as '{}' by '{}'",
            self.details.name,
            self.details.author
        );
        Ok(())
    }

    /// `isready`, then everything the engine printed before `readyok`.
    fn sync_ready(&mut self) -> Result<Vec<String>, SessionError> {
        self.send(&GuiCommand::IsReady)?;
        let mut seen = Vec::new();
        loop {
            let raw = self.process.recv_line(self.read_timeout, None, READY_OK)?;
            if let Ok(Some(EngineLine::ReadyOk)) = EngineLine::decode(&raw) {
                return Ok(seen);
            }
            seen.push(raw);
        }
    }

    fn send_option(
        &mut self,
        name: &str,
        value: &OptionValue,
    ) -> Result<Option<ConfigurationWarning>, SessionError> {
        self.send(&GuiCommand::SetOption {
            name: name.to_string(),
            value: value.clone(),
        })?;
        let seen = self.sync_ready()?;
        let rejection = seen.into_iter().find(|line| {
            matches!(
                EngineLine::decode(line),
                Ok(Some(EngineLine::OptionRejected(_))) | Err(DecodeError::EmptyRejection)
            )
        });

        Ok(rejection.map(|response| {
            let warning = ConfigurationWarning {
                option: name.to_string(),
                response,
            };
            log::warn!("{warning}");
            self.warnings.push(warning.clone());
            warning
        }))
    }

    fn read_best_move(&mut self, cancel: Option<&CancelToken>) -> Result<SearchResult, SessionError> {
        let mut last = String::new();
        loop {
            let raw = self.process.recv_line(self.read_timeout, cancel, "bestmove")?;
            match EngineLine::decode(&raw) {
                Ok(Some(EngineLine::BestMove { best, ponder })) => {
                    self.state = SessionState::Idle;
                    return Ok(SearchResult {
                        best_move: best,
                        ponder,
                        info: last,
                    });
                }
                Err(reason @ DecodeError::MissingBestMove) => {
                    return Err(SessionError::Malformed { line: raw, reason })
                }
                // Blank lines count: `info` is whatever came last.
                Ok(_) | Err(_) => last = raw,
            }
        }
    }
}

impl Drop for EngineSession {
    fn drop(&mut self) {
        if self.state != SessionState::Terminated {
            self.state = SessionState::Terminated;
            if let Err(e) = self.process.shutdown(self.quit_timeout) {
                log::warn!("engine shutdown failed: {e}");
            }
        }
    }
}
