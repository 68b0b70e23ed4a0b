// ── Device domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::entity_id::DeviceId;
use super::firewall::FirewallRules;
use crate::address::DEFAULT_NETMASK;

/// Kind of simulated device.
///
/// Only routers carry firewall rules and reach foreign subnets on their
/// own; every other kind forwards off-subnet traffic to its gateway.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DeviceType {
    Router,
    Switch,
    Pc,
    #[serde(rename = "ap", alias = "accessPoint")]
    #[strum(to_string = "ap", serialize = "accessPoint", serialize = "access-point")]
    AccessPoint,
}

impl DeviceType {
    pub fn is_router(self) -> bool {
        matches!(self, Self::Router)
    }

    /// Label given to a device dropped without an explicit name.
    pub fn default_label(self) -> &'static str {
        match self {
            Self::Router => "Router Mikrotik",
            Self::Switch => "Switch Hub",
            Self::Pc => "PC Client",
            Self::AccessPoint => "Access Point",
        }
    }
}

/// Canvas coordinates. Carried only so topologies round-trip unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A simulated network endpoint and its addressing.
///
/// `gateway` is only consulted for non-routers and `firewall_rules` only
/// for routers; the other combination is representable but inert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: DeviceId,
    pub device_type: DeviceType,
    pub label: String,
    pub ip: Option<String>,
    pub netmask: String,
    pub gateway: Option<String>,
    #[serde(default)]
    pub firewall_rules: FirewallRules,
    #[serde(default)]
    pub position: Position,
}

impl Device {
    /// An unconfigured device: no address, default netmask, no rules.
    pub fn new(id: DeviceId, device_type: DeviceType, label: impl Into<String>) -> Self {
        Self {
            id,
            device_type,
            label: label.into(),
            ip: None,
            netmask: DEFAULT_NETMASK.to_owned(),
            gateway: None,
            firewall_rules: FirewallRules::default(),
            position: Position::default(),
        }
    }

    pub fn is_router(&self) -> bool {
        self.device_type.is_router()
    }

    /// Configured address, treating an empty string as unset.
    pub fn ip(&self) -> Option<&str> {
        self.ip.as_deref().filter(|ip| !ip.is_empty())
    }

    /// Configured gateway, treating an empty string as unset.
    pub fn gateway(&self) -> Option<&str> {
        self.gateway.as_deref().filter(|gw| !gw.is_empty())
    }
}
