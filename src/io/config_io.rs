use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::TimelineConfig;

/// Name of the optional config file inside the chapter directory.
pub const CONFIG_FILE: &str = "plotline.toml";

/// Error type for config loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Load `plotline.toml` from `dir`, falling back to defaults when absent.
pub fn load_config(dir: &Path) -> Result<TimelineConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(TimelineConfig::default());
    }
    let text = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    let config: TimelineConfig =
        toml::from_str(&text).map_err(|e| ConfigError::ParseError { path, source: e })?;
    Ok(config)
}
