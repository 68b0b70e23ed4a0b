// ── Topology exchange format ──
//
// The persisted form is the canvas document: `nodes` with a `data` block
// holding the device configuration, `edges` for links, and the `viewport`.
// Device settings, firewall rules, positions, link ids and the viewport
// survive a load/save round trip. Canvas presentation fields (edge `type`,
// `sourceHandle`/`targetHandle`, node `width`/`selected`) are dropped on
// load and not written back.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::address::DEFAULT_NETMASK;
use crate::model::{Device, DeviceId, DeviceType, FirewallRules, Link, LinkId, Position};
use crate::topology::Topology;

/// The only node type the canvas produces.
pub const DEVICE_NODE_TYPE: &str = "device";

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid topology document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("node {id} has unsupported type '{kind}'")]
    UnsupportedNode { id: DeviceId, kind: String },

    #[error("device id {id} is used by more than one node")]
    DuplicateDevice { id: DeviceId },

    #[error("link {link} references unknown device {device}")]
    DanglingLink { link: LinkId, device: DeviceId },
}

// ── Document structs ────────────────────────────────────────────────

/// A whole topology document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub viewport: Viewport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: DeviceId,
    #[serde(rename = "type", default = "device_node_type")]
    pub kind: String,
    #[serde(default)]
    pub position: Position,
    pub data: NodeData,
}

/// Device configuration as stored on a node. Unset addresses are empty
/// strings in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    #[serde(default)]
    pub label: String,
    pub device_type: DeviceType,
    #[serde(default, with = "empty_as_none")]
    pub ip: Option<String>,
    #[serde(default = "default_netmask")]
    pub netmask: String,
    #[serde(default, with = "empty_as_none")]
    pub gateway: Option<String>,
    #[serde(default)]
    pub firewall_rules: FirewallRules,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<LinkId>,
    pub source: DeviceId,
    pub target: DeviceId,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

fn device_node_type() -> String {
    DEVICE_NODE_TYPE.into()
}

fn default_netmask() -> String {
    DEFAULT_NETMASK.into()
}

mod empty_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.as_deref().unwrap_or_default())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        Ok(raw.filter(|s| !s.is_empty()))
    }
}

// ── Conversion ──────────────────────────────────────────────────────

impl Snapshot {
    /// Parse a document. Structure is checked by [`Snapshot::into_topology`].
    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the document for a topology and the viewport to store with it.
    pub fn from_topology(topology: &Topology, viewport: Viewport) -> Self {
        let nodes = topology
            .devices()
            .iter()
            .map(|d| Node {
                id: d.id.clone(),
                kind: device_node_type(),
                position: d.position,
                data: NodeData {
                    label: d.label.clone(),
                    device_type: d.device_type,
                    ip: d.ip.clone(),
                    netmask: d.netmask.clone(),
                    gateway: d.gateway.clone(),
                    firewall_rules: d.firewall_rules.clone(),
                },
            })
            .collect();
        let edges = topology
            .links()
            .iter()
            .map(|l| Edge {
                id: Some(l.id.clone()),
                source: l.source.clone(),
                target: l.target.clone(),
            })
            .collect();
        Self {
            nodes,
            edges,
            viewport,
        }
    }

    /// Convert into a topology, rejecting documents that break its
    /// invariants: non-device nodes, repeated ids, or links to nowhere.
    pub fn into_topology(self) -> Result<(Topology, Viewport), SnapshotError> {
        let mut seen = HashSet::new();
        let mut devices = Vec::with_capacity(self.nodes.len());
        for node in self.nodes {
            if node.kind != DEVICE_NODE_TYPE {
                return Err(SnapshotError::UnsupportedNode {
                    id: node.id,
                    kind: node.kind,
                });
            }
            if !seen.insert(node.id.clone()) {
                return Err(SnapshotError::DuplicateDevice { id: node.id });
            }
            let data = node.data;
            devices.push(Device {
                id: node.id,
                device_type: data.device_type,
                label: data.label,
                ip: data.ip,
                netmask: data.netmask,
                gateway: data.gateway,
                firewall_rules: data.firewall_rules,
                position: node.position,
            });
        }

        let mut links = Vec::with_capacity(self.edges.len());
        for edge in self.edges {
            let id = edge
                .id
                .unwrap_or_else(|| LinkId::between(&edge.source, &edge.target));
            for endpoint in [&edge.source, &edge.target] {
                if !seen.contains(endpoint) {
                    return Err(SnapshotError::DanglingLink {
                        link: id,
                        device: endpoint.clone(),
                    });
                }
            }
            links.push(Link {
                id,
                source: edge.source,
                target: edge.target,
            });
        }

        Ok((Topology::new(devices, links), self.viewport))
    }
}
