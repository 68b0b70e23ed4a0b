//! Clap derive structures for the `netsim` CLI.
//!
//! Argument grammar for `netsim`: global flags, value enums and subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use netsim_core::{DeviceType, FirewallAction};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// netsim -- build a network topology and ping across it
#[derive(Debug, Parser)]
#[command(
    name = "netsim",
    version,
    about = "Simulate reachability in a small network topology",
    long_about = "Place routers, switches, PCs and access points, link them, assign\n\
        IPv4 settings and router firewall rules, then run simulated pings.\n\n\
        Subnets are a fixed /24: the first three octets decide the segment.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Topology file (defaults to the configured file, then the autosave file)
    #[arg(long, short = 't', env = "NETSIM_TOPOLOGY", global = true)]
    pub topology: Option<PathBuf>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "NETSIM_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: from config, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Assume yes for destructive operations
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

impl GlobalOpts {
    /// Output format after config defaults were applied.
    pub fn format(&self) -> OutputFormat {
        self.output.unwrap_or(OutputFormat::Table)
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color.unwrap_or(ColorMode::Auto)
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// Pretty-printed JSON
    Json,
    /// JSON on one line
    JsonCompact,
    /// YAML
    Yaml,
    /// Bare identifiers, one per line
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Color only when stdout is a terminal
    Auto,
    /// Color even when piped
    Always,
    /// No color
    Never,
}

// ── Domain value enums ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeviceKind {
    Router,
    Switch,
    Pc,
    #[value(alias = "access-point")]
    Ap,
}

impl From<DeviceKind> for DeviceType {
    fn from(kind: DeviceKind) -> Self {
        match kind {
            DeviceKind::Router => Self::Router,
            DeviceKind::Switch => Self::Switch,
            DeviceKind::Pc => Self::Pc,
            DeviceKind::Ap => Self::AccessPoint,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RuleAction {
    Accept,
    Drop,
}

impl From<RuleAction> for FirewallAction {
    fn from(action: RuleAction) -> Self {
        match action {
            RuleAction::Accept => Self::Accept,
            RuleAction::Drop => Self::Drop,
        }
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an empty topology file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Manage devices on the canvas
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Manage links between devices
    #[command(alias = "l")]
    Links(LinksArgs),

    /// Manage router firewall rules
    #[command(alias = "fw")]
    Firewall(FirewallArgs),

    /// Ping an address from a device
    Ping {
        /// Device the ping is issued on
        source: String,

        /// Destination IPv4 address
        #[arg(value_name = "IP")]
        target: String,
    },

    /// Open a device terminal reading commands from stdin
    #[command(alias = "term")]
    Terminal {
        /// Device to log in to
        device: String,
    },

    /// Check the topology for conflicting or malformed settings
    Validate,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Print a shell completion script
    Completions(CompletionsArgs),
}

// ══════════════════════════════════════════════════════════════════════
// Devices
// ══════════════════════════════════════════════════════════════════════

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List devices
    #[command(alias = "ls")]
    List,

    /// Show one device
    Get {
        /// Device ID
        device: String,
    },

    /// Place a new device
    Add {
        /// Kind of device
        #[arg(value_name = "TYPE")]
        kind: DeviceKind,

        /// Display label (defaults to the kind's name)
        #[arg(long)]
        label: Option<String>,
    },

    /// Remove a device and its links
    #[command(alias = "rm")]
    Remove {
        /// Device ID
        device: String,
    },

    /// Change a device's label or IP settings
    Configure {
        /// Device ID
        device: String,

        #[arg(long)]
        label: Option<String>,

        /// IPv4 address ("" to clear)
        #[arg(long)]
        ip: Option<String>,

        #[arg(long)]
        netmask: Option<String>,

        /// Default gateway ("" to clear; ignored for routers)
        #[arg(long)]
        gateway: Option<String>,
    },
}

// ══════════════════════════════════════════════════════════════════════
// Links
// ══════════════════════════════════════════════════════════════════════

#[derive(Debug, Args)]
pub struct LinksArgs {
    #[command(subcommand)]
    pub command: LinksCommand,
}

#[derive(Debug, Subcommand)]
pub enum LinksCommand {
    /// List links
    #[command(alias = "ls")]
    List,

    /// Link two devices
    Add {
        /// First device ID
        a: String,
        /// Second device ID
        b: String,
    },

    /// Remove a link
    #[command(alias = "rm")]
    Remove {
        /// Link ID
        link: String,
    },
}

// ══════════════════════════════════════════════════════════════════════
// Firewall
// ══════════════════════════════════════════════════════════════════════

#[derive(Debug, Args)]
pub struct FirewallArgs {
    #[command(subcommand)]
    pub command: FirewallCommand,
}

#[derive(Debug, Subcommand)]
pub enum FirewallCommand {
    /// List a router's rules in evaluation order
    #[command(alias = "ls")]
    List {
        /// Router device ID
        router: String,
    },

    /// Append a rule to a router
    Add {
        /// Router device ID
        router: String,

        /// Source address or "any"
        #[arg(long)]
        src: String,

        /// Destination address or "any"
        #[arg(long)]
        dst: String,

        #[arg(long, value_enum)]
        action: RuleAction,
    },

    /// Delete a rule by ID
    #[command(alias = "rm")]
    Delete {
        /// Router device ID
        router: String,

        /// Rule ID
        rule: u64,
    },
}

// ══════════════════════════════════════════════════════════════════════
// Config
// ══════════════════════════════════════════════════════════════════════

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file with guided setup
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,

    /// Print the config file location
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
