use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub fn config_file() -> PathBuf {
    dirs::home_dir().unwrap().join(".config").join("spacemark").join("config.toml")
}

/// The plist the window server rewrites on every space change. Only its
/// deletion matters; the content is never read.
pub fn default_marker_file() -> PathBuf {
    dirs::home_dir()
        .unwrap()
        .join("Library")
        .join("Preferences")
        .join("com.apple.spaces.plist")
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    /// Override for the space marker file, mainly for testing against a fake.
    pub marker_file: Option<PathBuf>,
    /// Text placed between display segments in the label.
    pub separator: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            marker_file: None,
            separator: " | ".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        if !path.exists() {
            debug!(?path, "no config file; using defaults");
            return Ok(Config::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = toml::from_str(&contents)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    pub fn marker_file(&self) -> PathBuf {
        self.marker_file.clone().unwrap_or_else(default_marker_file)
    }
}
