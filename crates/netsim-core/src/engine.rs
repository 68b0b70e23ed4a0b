//! Simulated ping over a [`Topology`].
//!
//! [`ping`] is a pure function of its inputs: it reads the topology, never
//! mutates it, and keeps no state between calls. Unreachability is a normal
//! result, so every outcome (including misconfiguration) comes back as a
//! [`PingOutcome`] value rather than an error.
//!
//! The model has two tiers. Addresses sharing their first three octets are
//! on the same segment and need a direct link. Anything else is reached by a
//! router directly, or by other devices through their gateway router, whose
//! firewall gets the final say.

use std::fmt;

use serde::Serialize;
use strum::Display;
use tracing::debug;

use crate::address::is_same_subnet;
use crate::model::{DeviceId, FirewallAction, RuleId};
use crate::topology::Topology;

/// Payload size printed in every reply line.
pub const REPLY_BYTES: u32 = 32;
/// TTL of a reply that did not cross a router.
pub const DIRECT_TTL: u8 = 64;
/// TTL of a reply routed through a gateway, one simulated hop worth of decay.
pub const ROUTED_TTL: u8 = 54;
/// Latency a router sees reaching a foreign subnet.
pub const ROUTER_UPLINK_LATENCY_MS: u32 = 5;
/// Latency of a reply routed through a gateway.
pub const ROUTED_LATENCY_MS: u32 = 10;

// ── Outcome types ───────────────────────────────────────────────────

/// Result of a simulated ping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PingOutcome {
    Success(Reply),
    Timeout(TimeoutReason),
    Unreachable(UnreachableReason),
    /// Same segment, but no device owns the target address.
    HostUnreachable { target: String },
    ConfigError(ConfigProblem),
}

/// Classification of a [`PingOutcome`], without its details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum OutcomeKind {
    Success,
    Timeout,
    Unreachable,
    HostUnreachable,
    ConfigError,
}

/// A successful echo reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub target: String,
    pub path: ReplyPath,
}

/// How the echo reached its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyPath {
    /// The source pinged its own address.
    Loopback,
    /// Same segment over a direct link.
    Direct,
    /// A router reaching a foreign subnet.
    RouterUplink,
    /// Forwarded by the source's gateway.
    Routed { gateway: String },
}

/// Simulated round-trip time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Latency {
    SubMillisecond,
    Millis(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeoutReason {
    /// Target exists on the segment but has no link to the source.
    NoConnection,
    /// No device owns the configured gateway address.
    GatewayTimeout,
    /// The gateway exists but the source has no link to it.
    GatewayDisconnected,
    /// The gateway's firewall dropped the packet.
    PacketFiltered { rule: RuleId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnreachableReason {
    /// Off-segment target and no gateway configured.
    NoGateway,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigProblem {
    SourceMissing { source: DeviceId },
    SourceUnconfigured { source: DeviceId },
    /// The configured gateway is not on the source's own segment.
    GatewayOffSubnet { gateway: String, source_ip: String },
}

impl PingOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Success(_) => OutcomeKind::Success,
            Self::Timeout(_) => OutcomeKind::Timeout,
            Self::Unreachable(_) => OutcomeKind::Unreachable,
            Self::HostUnreachable { .. } => OutcomeKind::HostUnreachable,
            Self::ConfigError(_) => OutcomeKind::ConfigError,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The reply line or failure phrase shown to the user.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl ReplyPath {
    pub fn latency(&self) -> Latency {
        match self {
            Self::Loopback | Self::Direct => Latency::SubMillisecond,
            Self::RouterUplink => Latency::Millis(ROUTER_UPLINK_LATENCY_MS),
            Self::Routed { .. } => Latency::Millis(ROUTED_LATENCY_MS),
        }
    }

    pub fn ttl(&self) -> u8 {
        match self {
            Self::Routed { .. } => ROUTED_TTL,
            Self::Loopback | Self::Direct | Self::RouterUplink => DIRECT_TTL,
        }
    }
}

// ── Rendering ───────────────────────────────────────────────────────

impl fmt::Display for Latency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SubMillisecond => f.write_str("time<1ms"),
            Self::Millis(ms) => write!(f, "time={ms}ms"),
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Reply from {}: bytes={REPLY_BYTES} {} TTL={}",
            self.target,
            self.path.latency(),
            self.path.ttl()
        )?;
        if let ReplyPath::Routed { gateway } = &self.path {
            write!(f, " (Routed via {gateway})")?;
        }
        Ok(())
    }
}

impl fmt::Display for TimeoutReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoConnection => f.write_str("Request timed out. (No connection)"),
            Self::GatewayTimeout => f.write_str("Gateway timeout."),
            Self::GatewayDisconnected => f.write_str("Gateway disconnected."),
            Self::PacketFiltered { .. } => f.write_str("Request timed out. (Packet filtered)"),
        }
    }
}

impl fmt::Display for UnreachableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoGateway => f.write_str("Destination host unreachable. (No Gateway)"),
        }
    }
}

impl fmt::Display for ConfigProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceMissing { .. } => f.write_str("Error: Source missing."),
            Self::SourceUnconfigured { .. } => f.write_str("Error: IP not configured."),
            Self::GatewayOffSubnet { gateway, source_ip } => {
                write!(f, "Config Error: Gateway ({gateway}) unreachable from {source_ip}.")
            }
        }
    }
}

impl fmt::Display for PingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(reply) => reply.fmt(f),
            Self::Timeout(reason) => reason.fmt(f),
            Self::Unreachable(reason) => reason.fmt(f),
            Self::HostUnreachable { target } => {
                write!(f, "Ping request could not find host {target}.")
            }
            Self::ConfigError(problem) => problem.fmt(f),
        }
    }
}

// ── Engine ──────────────────────────────────────────────────────────

/// Simulate `ping <target_ip>` issued on device `source`.
///
/// The target is compared textually. A four-part target on the source's
/// segment that no device owns, such as `192.168.1.300`, is reported as
/// an unknown host.
pub fn ping(topology: &Topology, source: &DeviceId, target_ip: &str) -> PingOutcome {
    let Some(src) = topology.device(source) else {
        return PingOutcome::ConfigError(ConfigProblem::SourceMissing {
            source: source.clone(),
        });
    };
    let Some(source_ip) = src.ip() else {
        return PingOutcome::ConfigError(ConfigProblem::SourceUnconfigured {
            source: source.clone(),
        });
    };

    let reply = |path| {
        PingOutcome::Success(Reply {
            target: target_ip.to_owned(),
            path,
        })
    };

    if target_ip == source_ip {
        debug!(%source, target_ip, "loopback");
        return reply(ReplyPath::Loopback);
    }

    if is_same_subnet(source_ip, target_ip) {
        let Some(target) = topology.device_by_ip(target_ip) else {
            debug!(%source, target_ip, "no device owns target on local segment");
            return PingOutcome::HostUnreachable {
                target: target_ip.to_owned(),
            };
        };
        let linked = topology.are_linked(source, &target.id);
        debug!(%source, target = %target.id, linked, "local segment");
        return if linked {
            reply(ReplyPath::Direct)
        } else {
            PingOutcome::Timeout(TimeoutReason::NoConnection)
        };
    }

    if src.is_router() {
        debug!(%source, target_ip, "router reaching foreign subnet");
        return reply(ReplyPath::RouterUplink);
    }

    let Some(gateway_ip) = src.gateway() else {
        return PingOutcome::Unreachable(UnreachableReason::NoGateway);
    };
    if !is_same_subnet(source_ip, gateway_ip) {
        return PingOutcome::ConfigError(ConfigProblem::GatewayOffSubnet {
            gateway: gateway_ip.to_owned(),
            source_ip: source_ip.to_owned(),
        });
    }
    let Some(gateway) = topology.device_by_ip(gateway_ip) else {
        debug!(%source, gateway_ip, "no device owns gateway address");
        return PingOutcome::Timeout(TimeoutReason::GatewayTimeout);
    };
    if !topology.are_linked(source, &gateway.id) {
        debug!(%source, gateway = %gateway.id, "not linked to gateway");
        return PingOutcome::Timeout(TimeoutReason::GatewayDisconnected);
    }

    if let Some(rule) =
        crate::firewall::first_match(gateway.firewall_rules.as_slice(), source_ip, target_ip)
    {
        debug!(gateway = %gateway.id, rule = %rule.id, action = %rule.action, "firewall match");
        if rule.action == FirewallAction::Drop {
            return PingOutcome::Timeout(TimeoutReason::PacketFiltered { rule: rule.id });
        }
    }

    reply(ReplyPath::Routed {
        gateway: gateway_ip.to_owned(),
    })
}
