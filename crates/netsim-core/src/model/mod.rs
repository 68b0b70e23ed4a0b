// ── Domain model ──
//
// Every type in this module is the canonical representation of a piece
// of a simulated topology. The exchange format in `snapshot` converts to
// and from these; the engine only ever reads them.

pub mod entity_id;

pub mod device;
pub mod firewall;
pub mod link;

// ── Re-exports ──────────────────────────────────────────────────────
// Flat access: `use netsim_core::model::*` gives you everything.

// Core identity
pub use entity_id::{DeviceId, LinkId, RuleId};

// Device
pub use device::{Device, DeviceType, Position};

// Firewall
pub use firewall::{AddressMatch, FirewallAction, FirewallRule, FirewallRules};

// Link
pub use link::Link;
