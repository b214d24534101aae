//! Engine process sessions.
//!
//! An [`EngineSession`] owns one engine child process: it launches it,
//! performs the UCI handshake and option setup, and turns blocking
//! request/response exchanges into typed results.

mod config;
mod process;
mod session;
mod shared;

pub use config::{
    default_engine_path, SessionConfig, DEFAULT_DEPTH, DEFAULT_QUIT_TIMEOUT, DEFAULT_READ_TIMEOUT,
    ENGINE_FILE_NAME,
};
pub use process::EngineProcess;
pub use session::{EngineSession, SessionState};
pub use shared::SharedSession;
