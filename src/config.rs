//! User settings read from `$XDG_CONFIG_HOME/themer/config.json`.
//!
//! ```json
//! {
//!     "template": "/home/me/.config/themer/templates/termite",
//!     "output": "/home/me/.config/termite/config"
//! }
//! ```
//!
//! Every field is optional; command-line flags take precedence.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Template rendered by `switch` when `-t` is not given.
    pub template: Option<PathBuf>,
    /// Destination for `switch` output when `-o` is not given.
    pub output: Option<PathBuf>,
}

impl Config {
    /// Read the config at `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(Error::io(path, e)),
        };
        Ok(serde_json::from_str(&json)?)
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&config_dir().join(CONFIG_FILE))
    }
}

/// `$XDG_CONFIG_HOME/themer`, falling back to `$HOME/.config/themer`.
pub fn config_dir() -> PathBuf {
    let config_home = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "~".to_string());
            PathBuf::from(home).join(".config")
        });
    config_home.join("themer")
}
