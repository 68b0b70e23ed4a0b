//! Rendering of command results for every `--output` format.
//!
//! Tables come from `tabled` rows, JSON and YAML from the serde form of the
//! model itself, and `plain` prints bare identifiers for shell pipelines.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use netsim_core::OutcomeKind;

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Whether to emit ANSI colors for the given `--color` mode.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Color a ping result line by outcome: green replies, yellow timeouts,
/// red for everything else.
pub fn paint_outcome(line: &str, kind: OutcomeKind, color: bool) -> String {
    if !color {
        return line.to_owned();
    }
    match kind {
        OutcomeKind::Success => line.green().to_string(),
        OutcomeKind::Timeout => line.yellow().to_string(),
        OutcomeKind::Unreachable | OutcomeKind::HostUnreachable => line.red().to_string(),
        OutcomeKind::ConfigError => line.red().bold().to_string(),
    }
}

// ── Rendering ───────────────────────────────────────────────────────

/// Render a collection. `to_row` feeds the table view and `id_fn` the
/// plain view; structured formats serialize `data` as-is.
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            Ok(render_table(data.iter().map(to_row)))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render one item. The table view is whatever text `detail_fn` builds.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Write rendered output to stdout unless `--quiet` or there is nothing to show.
pub fn print_output(output: &str, quiet: bool) {
    if !quiet && !output.is_empty() {
        // EPIPE from `| head` is ignored
        let _ = writeln!(io::stdout().lock(), "{output}");
    }
}

// ── Serializers ─────────────────────────────────────────────────────

fn render_table<R: Tabled>(rows: impl IntoIterator<Item = R>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let out = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(out)
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_yaml::to_string(data)?)
}
