// ── Core error types ──
//
// Failures of workspace operations. Simulated unreachability is never an
// error: `engine::ping` returns it as a `PingOutcome` value.

use thiserror::Error;

use crate::address::ValidationError;
use crate::model::{DeviceId, DeviceType, LinkId, RuleId};
use crate::snapshot::SnapshotError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Lookup errors ────────────────────────────────────────────────
    #[error("Device not found: {id}")]
    DeviceNotFound { id: DeviceId },

    #[error("Link not found: {id}")]
    LinkNotFound { id: LinkId },

    #[error("Firewall rule {rule} not found on device {device}")]
    RuleNotFound { device: DeviceId, rule: RuleId },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Device {id} is a {device_type}; only routers carry firewall rules")]
    NotARouter { id: DeviceId, device_type: DeviceType },

    #[error("Devices {a} and {b} are already linked")]
    AlreadyLinked { a: DeviceId, b: DeviceId },

    #[error("Cannot link device {id} to itself")]
    SelfLink { id: DeviceId },

    #[error("Device {device} has run out of firewall rule ids")]
    RuleIdsExhausted { device: DeviceId },

    // ── Input errors ─────────────────────────────────────────────────
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}
