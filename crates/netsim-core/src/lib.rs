//! Topology model and reachability simulation for netsim.
//!
//! The crate is split into a pure simulation core and an editing layer:
//!
//! - **[`engine::ping`]** decides the outcome of a ping issued on one
//!   device over an immutable [`Topology`]. Simulated failures (timeouts,
//!   unknown hosts, misconfiguration) are [`PingOutcome`] values, never
//!   errors.
//!
//! - **[`firewall`]** and **[`address`]** hold the first-match rule
//!   evaluator and the IPv4 text helpers the engine relies on. Subnets are
//!   a fixed `/24`: two addresses share a segment when their first three
//!   octets are textually equal.
//!
//! - **[`terminal`]** interprets the line commands typed into a device's
//!   console and keeps its scrollback.
//!
//! - **[`Workspace`]** owns the editable topology, validates every edit,
//!   and reads and writes the JSON exchange format ([`snapshot`]).
//!
//! - **[`audit`]** reports addressing conflicts in a loaded topology.

pub mod address;
pub mod audit;
pub mod engine;
pub mod error;
pub mod firewall;
pub mod id_alloc;
pub mod model;
pub mod snapshot;
pub mod terminal;
pub mod topology;
pub mod workspace;

// ── Primary re-exports ──────────────────────────────────────────────
pub use address::{AddressOptions, ValidationError};
pub use audit::{Issue, Severity, audit};
pub use engine::{OutcomeKind, PingOutcome, ping};
pub use error::CoreError;
pub use id_alloc::IdAllocator;
pub use snapshot::{Snapshot, SnapshotError, Viewport};
pub use terminal::{TerminalCommand, TerminalSession};
pub use topology::Topology;
pub use workspace::{DeviceSettings, Workspace};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    AddressMatch, Device, DeviceId, DeviceType, FirewallAction, FirewallRule, FirewallRules, Link,
    LinkId, Position, RuleId,
};
