//! Session configuration, read from `teamql.toml`.
//!
//! ```toml
//! busy_timeout_ms = 2000
//! foreign_keys = true
//! log_statements = false
//!
//! [database]
//! kind = "file"
//! path = "teams.db"
//! ```
//!
//! Every key is optional; a missing file section falls back to an
//! in-memory database.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file name.
pub const CONFIG_FILE: &str = "teamql.toml";

#[derive(Debug, Error)]
pub enum Error {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid config in {0}: {1}")]
    Parse(PathBuf, #[source] toml::de::Error),
}

/// Where the session's database lives.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Database {
    #[default]
    Memory,
    File { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub database: Database,
    /// How long a statement waits on a locked database.
    pub busy_timeout_ms: u64,
    /// Enforce `REFERENCES` constraints.
    pub foreign_keys: bool,
    /// Emit every executed statement as a `teamql.query` debug event.
    pub log_statements: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            database: Database::Memory,
            busy_timeout_ms: 5000,
            foreign_keys: true,
            log_statements: true,
        }
    }
}

impl SessionConfig {
    /// Loads `teamql.toml` from the current directory.
    pub fn load() -> Result<Self, Error> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(path.into())
            } else {
                Error::Io(path.into(), e)
            }
        })?;
        Self::from_toml(&content).map_err(|e| Error::Parse(path.into(), e))
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// An in-memory configuration with everything else defaulted.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            database: Database::File { path: path.into() },
            ..Self::default()
        }
    }
}
