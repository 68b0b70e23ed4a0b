//! Shared configuration for the netsim CLI.
//!
//! A small TOML file with output defaults, the default topology file, and
//! terminal settings, layered under `NETSIM_*` environment overrides. The
//! CLI adds `GlobalOpts`-aware resolution on top.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// File name of the topology used when none is configured.
pub const AUTOSAVE_FILE: &str = "autosave.json";

/// Values accepted for `defaults.output`.
pub const OUTPUT_FORMATS: &[&str] = &["table", "json", "json-compact", "yaml", "plain"];

/// Values accepted for `defaults.color`.
pub const COLOR_MODES: &[&str] = &["auto", "always", "never"];

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Device terminal settings.
    #[serde(default)]
    pub terminal: TerminalSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Topology file used when `--topology` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topology: Option<PathBuf>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            topology: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TerminalSettings {
    /// User name shown in terminal prompts.
    #[serde(default = "default_user")]
    pub user: String,
}

impl Default for TerminalSettings {
    fn default() -> Self {
        Self {
            user: default_user(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_user() -> String {
    "admin".into()
}

impl Config {
    /// Check the free-form string fields against their accepted values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_one_of("defaults.output", &self.defaults.output, OUTPUT_FORMATS)?;
        check_one_of("defaults.color", &self.defaults.color, COLOR_MODES)?;
        if self.terminal.user.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "terminal.user".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Configured topology file, or the autosave file in the data dir.
    pub fn topology_path(&self) -> PathBuf {
        self.defaults.topology.clone().unwrap_or_else(autosave_path)
    }
}

fn check_one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), ConfigError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(ConfigError::Validation {
        field: field.into(),
        reason: format!("'{value}' is not one of {}", allowed.join(", ")),
    })
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "netsim", "netsim")
}

/// Location of `config.toml` in the platform config directory.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory holding topology files written without an explicit path.
pub fn data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

pub fn autosave_path() -> PathBuf {
    data_dir().join(AUTOSAVE_FILE)
}

fn dirs_fallback(base: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(base);
    p.push("netsim");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file, still layered under `NETSIM_*` variables.
/// A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("NETSIM_").split("__"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

/// Load config, returning a default if the file is missing or broken.
/// A broken file is logged, not fatal.
pub fn load_config_or_default() -> Config {
    load_config_or_default_from(&config_path())
}

fn load_config_or_default_from(path: &Path) -> Config {
    load_config_from(path).unwrap_or_else(|err| {
        warn!(%err, path = %path.display(), "ignoring unreadable config");
        Config::default()
    })
}

// ── Config saving ───────────────────────────────────────────────────

/// Write `cfg` to [`config_path`], returning where it went.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
