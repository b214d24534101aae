//! Session configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use once_cell::sync::Lazy;

use crate::error::SessionError;
use crate::uci::{ContemptRange, OptionSet, OptionValue};

/// Default search depth for `go depth`
pub const DEFAULT_DEPTH: u32 = 2;
/// Default per-line read timeout
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);
/// Default grace period between `quit` and a forced kill
pub const DEFAULT_QUIT_TIMEOUT: Duration = Duration::from_secs(1);

/// File name of the engine executable expected next to this program.
pub const ENGINE_FILE_NAME: &str = "stockfish";

/// `stockfish` in the directory of the running executable.
static DEFAULT_ENGINE_PATH: Lazy<PathBuf> = Lazy::new(|| {
    let file = format!("{ENGINE_FILE_NAME}{}", env::consts::EXE_SUFFIX);
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(&file)))
        .unwrap_or_else(|| PathBuf::from(file))
});

#[must_use]
pub fn default_engine_path() -> PathBuf {
    DEFAULT_ENGINE_PATH.clone()
}

/// Everything needed to start and configure one engine session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub engine_path: PathBuf,
    /// Depth sent with every `go depth`
    pub depth: u32,
    /// When false, `setoption name Ponder value false` is sent at startup
    pub ponder: bool,
    /// Applied on top of the default option table
    pub overrides: OptionSet,
    /// Randomize both contempt options within this range
    pub contempt: Option<ContemptRange>,
    pub read_timeout: Duration,
    pub quit_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            engine_path: default_engine_path(),
            depth: DEFAULT_DEPTH,
            ponder: false,
            overrides: OptionSet::new(),
            contempt: None,
            read_timeout: DEFAULT_READ_TIMEOUT,
            quit_timeout: DEFAULT_QUIT_TIMEOUT,
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn new(engine_path: impl Into<PathBuf>) -> Self {
        SessionConfig {
            engine_path: engine_path.into(),
            ..SessionConfig::default()
        }
    }

    /// Defaults overlaid with `UCI_ENGINE_PATH`, `UCI_ENGINE_DEPTH` and
    /// `UCI_ENGINE_TIMEOUT_MS`. Unparseable values are rejected.
    pub fn from_env() -> Result<Self, SessionError> {
        let mut config = SessionConfig::default();
        if let Some(path) = env::var_os("UCI_ENGINE_PATH") {
            config.engine_path = PathBuf::from(path);
        }
        if let Ok(depth) = env::var("UCI_ENGINE_DEPTH") {
            config.depth = depth.trim().parse().map_err(|_| {
                SessionError::InvalidConfig(format!("UCI_ENGINE_DEPTH '{depth}' is not a depth"))
            })?;
        }
        if let Ok(ms) = env::var("UCI_ENGINE_TIMEOUT_MS") {
            let ms: u64 = ms.trim().parse().map_err(|_| {
                SessionError::InvalidConfig(format!("UCI_ENGINE_TIMEOUT_MS '{ms}' is not a number"))
            })?;
            config.read_timeout = Duration::from_millis(ms);
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    #[must_use]
    pub fn with_ponder(mut self, ponder: bool) -> Self {
        self.ponder = ponder;
        self
    }

    #[must_use]
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.overrides.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: OptionSet) -> Self {
        self.overrides = overrides;
        self
    }

    #[must_use]
    pub fn with_random_contempt(mut self, min: i64, max: i64) -> Self {
        self.contempt = Some(ContemptRange::new(min, max));
        self
    }

    #[must_use]
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_quit_timeout(mut self, timeout: Duration) -> Self {
        self.quit_timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        if self.depth == 0 {
            return Err(SessionError::InvalidConfig(
                "search depth must be at least 1".to_string(),
            ));
        }
        if let Some(range) = &self.contempt {
            if !range.is_valid() {
                return Err(SessionError::InvalidConfig(format!(
                    "contempt range {}..={} is empty",
                    range.min, range.max
                )));
            }
        }
        if self.read_timeout.is_zero() {
            return Err(SessionError::InvalidConfig(
                "read timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
