//! CLI configuration: a thin wrapper around `netsim_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--topology, --output, --color).

use std::path::PathBuf;

use clap::ValueEnum;
use tracing::warn;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};

// ── Re-exports from shared crate ────────────────────────────────────

pub use netsim_config::{
    Config, Defaults, TerminalSettings, config_path, load_config, load_config_or_default,
    save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Fill flags the user did not pass from the config file.
///
/// Config values were validated on load; an unparsable one is skipped with
/// a warning rather than failing the command.
pub fn apply_defaults(global: &mut GlobalOpts, config: &Config) {
    if global.output.is_none() {
        global.output = parse_value::<OutputFormat>("defaults.output", &config.defaults.output);
    }
    if global.color.is_none() {
        global.color = parse_value::<ColorMode>("defaults.color", &config.defaults.color);
    }
}

fn parse_value<T: ValueEnum>(key: &str, raw: &str) -> Option<T> {
    T::from_str(raw, true)
        .inspect_err(|_| warn!(key, value = raw, "ignoring unrecognized config value"))
        .ok()
}

/// Topology file to operate on: flag > config > autosave file.
pub fn topology_path(global: &GlobalOpts, config: &Config) -> PathBuf {
    global
        .topology
        .clone()
        .unwrap_or_else(|| config.topology_path())
}
