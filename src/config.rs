use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::errors::ConfigError;

/// Environment variable that points at an explicit config file.
pub const CONFIG_ENV: &str = "NOTEKEEPER_CONFIG";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// HTTP port to listen on.
    pub port: u16,

    /// Log level for tracing (e.g. "info", "debug").
    #[serde(default = "default_log_level")]
    pub log_level: String,

    pub server_version: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_json(&file).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<AppConfig>(text)
    }
}

/// Locate config.json: `$NOTEKEEPER_CONFIG` first, then the executable's
/// folder, then its parent (the project root when run through cargo).
pub fn locate_config() -> Result<PathBuf, ConfigError> {
    if let Ok(explicit) = env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(explicit));
    }

    let exe_dir = env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));

    let primary = exe_dir.join("config.json");
    if primary.exists() {
        return Ok(primary);
    }

    let fallback = exe_dir.join("..").join("config.json");
    if fallback.exists() {
        return Ok(fallback);
    }

    Err(ConfigError::Missing(
        primary.display().to_string(),
        fallback.display().to_string(),
    ))
}
