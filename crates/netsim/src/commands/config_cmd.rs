//! Config subcommand handlers.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Defaults, TerminalSettings};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config as the TOML it would be saved as.
fn format_config(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# could not render config: {e}"))
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Ask for each setting, offering the defaults.
fn prompt_config() -> Result<Config, CliError> {
    let formats = netsim_config::OUTPUT_FORMATS;
    let output = Select::new()
        .with_prompt("Default output format")
        .items(formats)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let colors = netsim_config::COLOR_MODES;
    let color = Select::new()
        .with_prompt("Color output")
        .items(colors)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let topology: String = Input::new()
        .with_prompt("Topology file (empty for the autosave file)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;

    let user: String = Input::new()
        .with_prompt("Terminal user name")
        .default(TerminalSettings::default().user)
        .interact_text()
        .map_err(prompt_err)?;

    Ok(Config {
        defaults: Defaults {
            output: formats.get(output).copied().unwrap_or("table").into(),
            color: colors.get(color).copied().unwrap_or("auto").into(),
            topology: Some(topology.trim())
                .filter(|t| !t.is_empty())
                .map(PathBuf::from),
        },
        terminal: TerminalSettings { user },
    })
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: guided setup ──────────────────────────────────────
        ConfigCommand::Init { force } => {
            let config_path = config::config_path();
            if config_path.exists() && !force {
                return Err(CliError::Conflict {
                    resource_type: "config file".into(),
                    identifier: config_path.display().to_string(),
                });
            }

            let cfg = if global.yes || !io::stdin().is_terminal() {
                Config::default()
            } else {
                eprintln!("netsim configuration");
                eprintln!("   Config path: {}\n", config_path.display());
                prompt_config()?
            };
            cfg.validate()?;

            let written = config::save_config(&cfg)?;
            util::status(
                &format!("Configuration written to {}", written.display()),
                global.quiet,
            );
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = output::render_single(global.format(), &cfg, format_config, |_| {
                config::config_path().display().to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}
