//! Where the Mailman installation lives and how to reach it.
//!
//! Stored as JSON, every field optional. A missing file means defaults,
//! which match a stock Debian-style Mailman 2 install.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::consts::{
    DEFAULT_ALIASES_PATH, DEFAULT_NEWALIASES_COMMAND, DEFAULT_PYTHON, DEFAULT_ROOT,
};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Mailman prefix; binaries are under `<root>/bin`.
    pub root: PathBuf,
    /// Interpreter command line used to run `withlist`.
    pub python: String,
    /// Directory containing the `listproxy` module. Goes on `PYTHONPATH`.
    pub proxy_dir: PathBuf,
    pub aliases_path: PathBuf,
    pub newaliases_command: String,
    /// Per-command timeout. Unset means wait forever.
    pub timeout_secs: Option<u64>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            python: DEFAULT_PYTHON.to_string(),
            proxy_dir: Path::new(DEFAULT_ROOT).join("listproxy"),
            aliases_path: PathBuf::from(DEFAULT_ALIASES_PATH),
            newaliases_command: DEFAULT_NEWALIASES_COMMAND.to_string(),
            timeout_secs: None,
        }
    }
}

impl BridgeConfig {
    /// Defaults with a different Mailman prefix.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Read a config file. A file that does not exist yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(Error::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&text).map_err(|e| {
            Error::Configuration(format!("{}: {e}", path.display()))
        })
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// `<root>/bin/<tool>`
    pub fn bin(&self, tool: &str) -> PathBuf {
        self.root.join("bin").join(tool)
    }
}
