//! Session handle shared between threads.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use super::config::SessionConfig;
use super::session::EngineSession;
use crate::error::SessionError;
use crate::sync::CancelToken;
use crate::uci::SearchResult;

/// An [`EngineSession`] behind a mutex.
///
/// Calls from different threads are serialized so commands and responses
/// never interleave. The cancel token is held outside the lock, so a thread
/// can abandon a search another thread is blocked in.
#[derive(Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<EngineSession>>,
    cancel: CancelToken,
}

impl SharedSession {
    #[must_use]
    pub fn new(session: EngineSession) -> Self {
        let cancel = session.cancel_token();
        SharedSession {
            inner: Arc::new(Mutex::new(session)),
            cancel,
        }
    }

    pub fn start(config: SessionConfig) -> Result<Self, SessionError> {
        EngineSession::start(config).map(SharedSession::new)
    }

    /// Exclusive access for a sequence of commands.
    pub fn lock(&self) -> MutexGuard<'_, EngineSession> {
        self.inner.lock()
    }

    /// Abandon the search currently blocking the session, if any.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn new_game(&self) -> Result<(), SessionError> {
        self.lock().new_game()
    }

    pub fn set_position<S: AsRef<str>>(&self, moves: &[S]) -> Result<(), SessionError> {
        self.lock().set_position(moves)
    }

    pub fn set_fen_position(&self, fen: &str) -> Result<(), SessionError> {
        self.lock().set_fen_position(fen)
    }

    pub fn search(&self) -> Result<SearchResult, SessionError> {
        self.lock().search()
    }

    pub fn is_ready(&self) -> Result<&'static str, SessionError> {
        self.lock().is_ready()
    }
}
