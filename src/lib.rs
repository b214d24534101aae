pub mod engine;
pub mod error;
pub mod sync;
pub mod uci;

pub use engine::{EngineSession, SessionConfig, SessionState, SharedSession};
pub use error::{ConfigurationWarning, DecodeError, SessionError};
pub use sync::CancelToken;
pub use uci::{OptionSet, OptionValue, Position, SearchResult};
