//! User configuration (`config.toml`).
//!
//! ```toml
//! [grid]
//! rows = 10
//! cols = 4
//!
//! [log]
//! filter = "gridcalc_core=debug"
//! ```
//!
//! Problems never abort the program: they are collected as warnings and
//! the defaults are used instead.

use directories::ProjectDirs;
use gridcalc_core::{DEFAULT_COLS, DEFAULT_ROWS};
use gridcalc_engine::engine::{MAX_COLS, MAX_ROWS};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

const MAX_CONFIG_FILE_BYTES: u64 = 65_536;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Refusing to read {path}: file too large ({size} bytes, max {max})")]
    TooLarge { path: PathBuf, size: u64, max: u64 },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    grid: Option<GridSection>,
    log: Option<LogSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GridSection {
    rows: Option<usize>,
    cols: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LogSection {
    filter: Option<String>,
}

/// Effective settings after applying the config file to the defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub rows: usize,
    pub cols: usize,
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            log_filter: None,
        }
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "gridcalc")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let meta = std::fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if meta.len() > MAX_CONFIG_FILE_BYTES {
        return Err(ConfigError::TooLarge {
            path: path.to_path_buf(),
            size: meta.len(),
            max: MAX_CONFIG_FILE_BYTES,
        });
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the config from `explicit`, or the user config dir when `None`.
/// Returns the effective config plus any warnings to show the user.
pub fn load_config(explicit: Option<&Path>) -> (Config, Vec<String>) {
    let mut warnings = Vec::new();
    let mut config = Config::default();

    let Some(path) = explicit.map(Path::to_path_buf).or_else(user_config_path) else {
        return (config, warnings);
    };
    if !path.exists() {
        if explicit.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (config, warnings);
    }

    let file = match read_config_file(&path) {
        Ok(file) => file,
        Err(err) => {
            warnings.push(err.to_string());
            return (config, warnings);
        }
    };

    if let Some(grid) = file.grid {
        if let Some(rows) = grid.rows {
            if rows == 0 || rows > MAX_ROWS {
                warnings.push(format!(
                    "Ignoring grid.rows = {}: must be between 1 and {}",
                    rows, MAX_ROWS
                ));
            } else {
                config.rows = rows;
            }
        }
        if let Some(cols) = grid.cols {
            if cols == 0 || cols > MAX_COLS {
                warnings.push(format!(
                    "Ignoring grid.cols = {}: must be between 1 and {}",
                    cols, MAX_COLS
                ));
            } else {
                config.cols = cols;
            }
        }
    }
    config.log_filter = file
        .log
        .and_then(|log| log.filter)
        .filter(|f| !f.trim().is_empty());

    (config, warnings)
}
