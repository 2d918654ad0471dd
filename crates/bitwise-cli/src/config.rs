//! Configuration loading from TOML files.
//!
//! Lookup order:
//! 1. `--config <path>` (must exist)
//! 2. `$BITWISE_CONFIG` environment variable
//! 3. `<config dir>/bitwise/config.toml`
//! 4. Built-in defaults (everything is optional)

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use bitwise_lang::{AngleMode, DEFAULT_EXPORT_WIDTH, DEFAULT_PRECISION, MAX_PRECISION};
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// `"DEG"` or `"RAD"`.
    pub angle_mode: AngleMode,
    /// Decimal places shown, 0-10.
    pub precision: u8,
    /// Column the results start at in `run` output and exports.
    pub export_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            angle_mode: AngleMode::Deg,
            precision: DEFAULT_PRECISION,
            export_width: DEFAULT_EXPORT_WIDTH,
        }
    }
}

impl Config {
    pub fn precision(&self) -> u8 {
        self.precision.min(MAX_PRECISION)
    }
}

/// Load config; `explicit` is the `--config` flag.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        if !path.exists() {
            bail!("config file {} does not exist", path.display());
        }
        return load_from(path);
    }
    match config_path() {
        Some(path) if path.exists() => load_from(&path),
        _ => Ok(Config::default()),
    }
}

/// Parse one config file.
pub fn load_from(path: &Path) -> Result<Config> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Resolve the implicit config file path.
fn config_path() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("BITWISE_CONFIG") {
        return Some(PathBuf::from(p));
    }
    dirs::config_dir().map(|d| d.join("bitwise").join("config.toml"))
}
