//! Whole-topology consistency checks.
//!
//! Loading a document only checks its structure, so a file edited by hand
//! can still carry conflicting or malformed addressing. [`audit`] reports
//! those problems without refusing to work with the topology.

use std::fmt;

use serde::Serialize;
use strum::Display;

use crate::address::{AddressOptions, validate_address};
use crate::model::{Device, DeviceId, LinkId, RuleId};
use crate::topology::Topology;

/// How much an issue affects simulation results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    /// Stored but never consulted.
    Warning,
    /// Changes or breaks ping outcomes.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Issue {
    DuplicateAddress {
        ip: String,
        devices: Vec<DeviceId>,
    },
    InvalidAddress {
        device: DeviceId,
        field: String,
        message: String,
    },
    InvalidRule {
        device: DeviceId,
        rule: RuleId,
        message: String,
    },
    InertFirewallRules {
        device: DeviceId,
        rules: usize,
    },
    DanglingLink {
        link: LinkId,
    },
}

impl Issue {
    pub fn severity(&self) -> Severity {
        match self {
            Self::InertFirewallRules { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Short name of the check that produced this issue.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DuplicateAddress { .. } => "duplicate-address",
            Self::InvalidAddress { .. } => "invalid-address",
            Self::InvalidRule { .. } => "invalid-rule",
            Self::InertFirewallRules { .. } => "inert-firewall-rules",
            Self::DanglingLink { .. } => "dangling-link",
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateAddress { ip, devices } => {
                let ids: Vec<&str> = devices.iter().map(DeviceId::as_str).collect();
                write!(f, "{ip} is assigned to devices {}", ids.join(", "))
            }
            Self::InvalidAddress {
                device, message, ..
            } => write!(f, "device {device}: {message}"),
            Self::InvalidRule {
                device,
                rule,
                message,
            } => write!(f, "device {device} rule {rule}: {message}"),
            Self::InertFirewallRules { device, rules } => write!(
                f,
                "device {device} is not a router; its {rules} firewall rule(s) are ignored"
            ),
            Self::DanglingLink { link } => write!(f, "link {link} has a missing endpoint"),
        }
    }
}

/// Every problem found in `topology`, grouped by kind.
pub fn audit(topology: &Topology) -> Vec<Issue> {
    let mut issues: Vec<Issue> = topology
        .duplicate_ips()
        .into_iter()
        .map(|dup| Issue::DuplicateAddress {
            ip: dup.ip,
            devices: dup.devices,
        })
        .collect();

    for device in topology.devices() {
        audit_device(device, &mut issues);
    }

    issues.extend(
        topology
            .dangling_links()
            .into_iter()
            .map(|link| Issue::DanglingLink {
                link: link.id.clone(),
            }),
    );
    issues
}

fn audit_device(device: &Device, issues: &mut Vec<Issue>) {
    let mut fields = vec![
        ("IP Address", device.ip()),
        ("Subnet Mask", Some(device.netmask.as_str())),
    ];
    if !device.is_router() {
        fields.push(("Gateway", device.gateway()));
    }
    for (field, value) in fields {
        let Some(value) = value else { continue };
        if let Err(err) = validate_address(field, value, AddressOptions::HOST) {
            issues.push(Issue::InvalidAddress {
                device: device.id.clone(),
                field: field.to_owned(),
                message: err.to_string(),
            });
        }
    }

    if !device.is_router() {
        if !device.firewall_rules.is_empty() {
            issues.push(Issue::InertFirewallRules {
                device: device.id.clone(),
                rules: device.firewall_rules.len(),
            });
        }
        return;
    }

    for rule in &device.firewall_rules {
        let endpoints = [
            ("Source IP", rule.src.to_string()),
            ("Dest IP", rule.dst.to_string()),
        ];
        for (field, value) in endpoints {
            if let Err(err) = validate_address(field, &value, AddressOptions::RULE) {
                issues.push(Issue::InvalidRule {
                    device: device.id.clone(),
                    rule: rule.id,
                    message: err.to_string(),
                });
            }
        }
    }
}
