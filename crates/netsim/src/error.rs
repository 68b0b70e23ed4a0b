//! Errors surfaced by the `netsim` binary.
//!
//! Every failure carries a miette diagnostic code and, where a next step is
//! obvious, a help line. `exit_code` maps each variant to the process status.

use miette::Diagnostic;
use thiserror::Error;

use netsim_config::ConfigError;
use netsim_core::{CoreError, DeviceType, OutcomeKind, SnapshotError, ValidationError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(netsim::not_found),
        help("Run: netsim {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{resource_type} '{identifier}' already exists")]
    #[diagnostic(code(netsim::conflict))]
    Conflict {
        resource_type: String,
        identifier: String,
    },

    #[error("Device {id} is a {device_type}, not a router")]
    #[diagnostic(
        code(netsim::not_a_router),
        help("Firewall rules can only be attached to routers. Run: netsim devices list")
    )]
    NotARouter { id: String, device_type: DeviceType },

    // ── Validation ───────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(netsim::invalid_address),
        help("Addresses are dotted quads such as 192.168.1.10; firewall rules also accept 'any'.")
    )]
    InvalidAddress(ValidationError),

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(netsim::validation))]
    Validation { field: String, reason: String },

    // ── Topology file ────────────────────────────────────────────────

    #[error("Could not load topology from {path}")]
    #[diagnostic(
        code(netsim::topology),
        help("Check the file contents, or start over with: netsim init --force")
    )]
    Topology {
        path: String,
        #[source]
        source: SnapshotError,
    },

    #[error("Topology has {count} problem(s)")]
    #[diagnostic(code(netsim::topology_issues))]
    TopologyIssues { count: usize },

    // ── Simulation ───────────────────────────────────────────────────

    #[error("Ping failed: {kind}")]
    #[diagnostic(code(netsim::ping_failed))]
    PingFailed { kind: OutcomeKind },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(netsim::config),
        help("Inspect the file with: netsim config show")
    )]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(netsim::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not serialize output: {0}")]
    #[diagnostic(code(netsim::json))]
    Json(#[from] serde_json::Error),

    #[error("Could not serialize output: {0}")]
    #[diagnostic(code(netsim::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Process status for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. }
            | Self::InvalidAddress(ValidationError::DuplicateAddress { .. }) => {
                exit_code::CONFLICT
            }
            Self::NotARouter { .. }
            | Self::InvalidAddress(_)
            | Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DeviceNotFound { id } => CliError::NotFound {
                resource_type: "device".into(),
                identifier: id.to_string(),
                list_command: "devices list".into(),
            },

            CoreError::LinkNotFound { id } => CliError::NotFound {
                resource_type: "link".into(),
                identifier: id.to_string(),
                list_command: "links list".into(),
            },

            CoreError::RuleNotFound { device, rule } => CliError::NotFound {
                resource_type: "firewall rule".into(),
                identifier: rule.to_string(),
                list_command: format!("firewall list {device}"),
            },

            CoreError::NotARouter { id, device_type } => CliError::NotARouter {
                id: id.to_string(),
                device_type,
            },

            CoreError::AlreadyLinked { a, b } => CliError::Conflict {
                resource_type: "link".into(),
                identifier: format!("{a} <-> {b}"),
            },

            CoreError::SelfLink { id } => CliError::Validation {
                field: "link".into(),
                reason: format!("cannot link device {id} to itself"),
            },

            CoreError::RuleIdsExhausted { device } => CliError::Validation {
                field: "firewall rule".into(),
                reason: format!(
                    "device {device} has run out of rule ids; delete the rule with the highest id first"
                ),
            },

            CoreError::Validation(err) => CliError::InvalidAddress(err),

            CoreError::Snapshot(source) => CliError::Topology {
                path: "(input)".into(),
                source,
            },
        }
    }
}
