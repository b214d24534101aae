//! Error types for engine sessions.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

/// Error type for decoding a single line of engine output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// `bestmove` line without a move token
    MissingBestMove,
    /// "No such option" line without an option name
    EmptyRejection,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::MissingBestMove => write!(f, "bestmove line has no move token"),
            DecodeError::EmptyRejection => write!(f, "option rejection names no option"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// An option the engine refused to set.
///
/// Not an error: the session keeps running without that option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationWarning {
    /// Option name as sent in `setoption`
    pub option: String,
    /// The engine line that reported the rejection
    pub response: String,
}

impl fmt::Display for ConfigurationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "engine was unable to set option '{}': {}",
            self.option, self.response
        )
    }
}

/// Error type for engine session operations
#[derive(Debug)]
pub enum SessionError {
    /// The engine executable could not be started
    Launch { path: PathBuf, source: io::Error },
    /// The engine closed its output before the expected line arrived
    EngineExited {
        waiting_for: &'static str,
        status: Option<ExitStatus>,
    },
    /// No line arrived within the read timeout
    Timeout {
        waiting_for: &'static str,
        after: Duration,
    },
    /// A sentinel line could not be decoded
    Malformed { line: String, reason: DecodeError },
    /// The caller cancelled a blocking read
    Cancelled,
    /// A result was requested while no search was running
    NoSearch,
    /// Writing to or reading from the engine pipes failed
    Io(io::Error),
    /// The session already hit a fatal error or was shut down
    Terminated,
    /// Rejected session configuration
    InvalidConfig(String),
}

impl SessionError {
    /// Whether this error ends the session.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            SessionError::Cancelled | SessionError::NoSearch | SessionError::InvalidConfig(_)
        )
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Launch { path, source } => {
                write!(f, "failed to launch engine '{}': {source}", path.display())
            }
            SessionError::EngineExited {
                waiting_for,
                status: Some(status),
            } => write!(
                f,
                "engine exited ({status}) while waiting for '{waiting_for}'"
            ),
            SessionError::EngineExited {
                waiting_for,
                status: None,
            } => write!(
                f,
                "engine closed its output while waiting for '{waiting_for}'"
            ),
            SessionError::Timeout { waiting_for, after } => write!(
                f,
                "no engine output for {} ms while waiting for '{waiting_for}'",
                after.as_millis()
            ),
            SessionError::Malformed { line, reason } => {
                write!(f, "malformed engine line '{line}': {reason}")
            }
            SessionError::Cancelled => write!(f, "operation cancelled"),
            SessionError::NoSearch => write!(f, "no search is in progress"),
            SessionError::Io(e) => write!(f, "engine pipe error: {e}"),
            SessionError::Terminated => write!(f, "engine session is terminated"),
            SessionError::InvalidConfig(msg) => write!(f, "invalid session configuration: {msg}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Launch { source, .. } => Some(source),
            SessionError::Malformed { reason, .. } => Some(reason),
            SessionError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SessionError {
    fn from(e: io::Error) -> Self {
        SessionError::Io(e)
    }
}
