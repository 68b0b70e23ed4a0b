//! The editable side of a topology.
//!
//! A [`Workspace`] owns the current [`Topology`] together with the canvas
//! viewport and the device id allocator. Every edit goes through it, so the
//! validation that guards saves lives here; the engine only ever sees the
//! resulting topology by shared reference.

use tracing::info;

use crate::address::{AddressOptions, ValidationError, validate_address};
use crate::engine::{self, PingOutcome};
use crate::error::CoreError;
use crate::id_alloc::IdAllocator;
use crate::model::{
    AddressMatch, Device, DeviceId, DeviceType, FirewallAction, FirewallRule, Link, LinkId, RuleId,
};
use crate::snapshot::{Snapshot, Viewport};
use crate::terminal::TerminalSession;
use crate::topology::Topology;

// Field names used in validation messages.
const FIELD_IP: &str = "IP Address";
const FIELD_NETMASK: &str = "Subnet Mask";
const FIELD_GATEWAY: &str = "Gateway";
const FIELD_RULE_SRC: &str = "Source IP";
const FIELD_RULE_DST: &str = "Dest IP";

/// Partial update of a device's general settings. `None` keeps the
/// current value; an empty string clears an address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSettings {
    pub label: Option<String>,
    pub ip: Option<String>,
    pub netmask: Option<String>,
    pub gateway: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Workspace {
    topology: Topology,
    viewport: Viewport,
    ids: IdAllocator,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a workspace from a topology document.
    pub fn from_json(text: &str) -> Result<Self, CoreError> {
        let mut ws = Self::new();
        ws.load_json(text)?;
        Ok(ws)
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn device(&self, id: &DeviceId) -> Result<&Device, CoreError> {
        self.topology
            .device(id)
            .ok_or_else(|| CoreError::DeviceNotFound { id: id.clone() })
    }

    // ── Persistence ─────────────────────────────────────────────────

    /// Replace the workspace with a parsed document.
    ///
    /// On any error the current topology, viewport and id counter are left
    /// exactly as they were.
    pub fn load_json(&mut self, text: &str) -> Result<(), CoreError> {
        let (topology, viewport) = Snapshot::from_json(text)?.into_topology()?;
        self.ids = IdAllocator::seeded_from(topology.devices().iter().map(|d| &d.id));
        info!(
            devices = topology.devices().len(),
            links = topology.links().len(),
            "topology loaded"
        );
        self.topology = topology;
        self.viewport = viewport;
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_topology(&self.topology, self.viewport)
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(self.snapshot().to_json_pretty()?)
    }

    /// Empty the canvas. The id counter keeps counting.
    pub fn clear(&mut self) {
        self.topology = Topology::default();
        info!("topology cleared");
    }

    // ── Devices ─────────────────────────────────────────────────────

    /// Place a new unconfigured device and return its id.
    pub fn add_device(&mut self, device_type: DeviceType, label: Option<&str>) -> DeviceId {
        let id = self.ids.allocate();
        let label = label.unwrap_or_else(|| device_type.default_label());
        self.topology
            .push_device(Device::new(id.clone(), device_type, label));
        info!(%id, %device_type, "device added");
        id
    }

    /// Remove a device and every link attached to it.
    pub fn remove_device(&mut self, id: &DeviceId) -> Result<Device, CoreError> {
        let device = self
            .topology
            .remove_device(id)
            .ok_or_else(|| CoreError::DeviceNotFound { id: id.clone() })?;
        info!(%id, "device removed");
        Ok(device)
    }

    /// Validate and apply new general settings.
    ///
    /// Nothing is written unless every field passes. The address must not
    /// already belong to another device. Routers never keep a gateway.
    pub fn configure_device(
        &mut self,
        id: &DeviceId,
        settings: DeviceSettings,
    ) -> Result<(), CoreError> {
        let device = self.device(id)?;
        let is_router = device.is_router();

        if let Some(ip) = &settings.ip {
            validate_address(FIELD_IP, ip, AddressOptions::HOST)?;
            if let Some(owner) = self.topology.device_by_ip(ip).filter(|d| d.id != *id) {
                return Err(ValidationError::DuplicateAddress {
                    field: FIELD_IP.into(),
                    value: ip.clone(),
                    owner: owner.id.clone(),
                }
                .into());
            }
        }
        if let Some(netmask) = &settings.netmask {
            validate_address(FIELD_NETMASK, netmask, AddressOptions::HOST)?;
        }
        if !is_router {
            if let Some(gateway) = &settings.gateway {
                validate_address(FIELD_GATEWAY, gateway, AddressOptions::HOST)?;
            }
        }

        let device = self
            .topology
            .device_mut(id)
            .ok_or_else(|| CoreError::DeviceNotFound { id: id.clone() })?;
        if let Some(label) = settings.label {
            device.label = label;
        }
        if let Some(ip) = settings.ip {
            device.ip = Some(ip).filter(|s| !s.is_empty());
        }
        if let Some(netmask) = settings.netmask {
            device.netmask = netmask;
        }
        if is_router {
            device.gateway = None;
        } else if let Some(gateway) = settings.gateway {
            device.gateway = Some(gateway).filter(|s| !s.is_empty());
        }
        info!(%id, ip = ?device.ip, gateway = ?device.gateway, "device configured");
        Ok(())
    }

    // ── Links ───────────────────────────────────────────────────────

    /// Draw a link between two existing, distinct, not yet linked devices.
    pub fn connect(&mut self, a: &DeviceId, b: &DeviceId) -> Result<LinkId, CoreError> {
        self.device(a)?;
        self.device(b)?;
        if a == b {
            return Err(CoreError::SelfLink { id: a.clone() });
        }
        if self.topology.are_linked(a, b) {
            return Err(CoreError::AlreadyLinked {
                a: a.clone(),
                b: b.clone(),
            });
        }
        let link = Link::new(a.clone(), b.clone());
        let id = link.id.clone();
        self.topology.push_link(link);
        info!(%id, %a, %b, "link added");
        Ok(id)
    }

    pub fn disconnect(&mut self, id: &LinkId) -> Result<Link, CoreError> {
        let link = self
            .topology
            .remove_link(id)
            .ok_or_else(|| CoreError::LinkNotFound { id: id.clone() })?;
        info!(%id, "link removed");
        Ok(link)
    }

    // ── Firewall ────────────────────────────────────────────────────

    /// Append a rule to a router's list. Both endpoints are required and
    /// may be `any`.
    pub fn add_firewall_rule(
        &mut self,
        router: &DeviceId,
        src: &str,
        dst: &str,
        action: FirewallAction,
    ) -> Result<RuleId, CoreError> {
        for (field, value) in [(FIELD_RULE_SRC, src), (FIELD_RULE_DST, dst)] {
            if value.is_empty() {
                return Err(ValidationError::Empty {
                    field: field.into(),
                }
                .into());
            }
            validate_address(field, value, AddressOptions::RULE)?;
        }

        let device = self.router_mut(router)?;
        let id = device
            .firewall_rules
            .push(AddressMatch::from(src), AddressMatch::from(dst), action)
            .ok_or_else(|| CoreError::RuleIdsExhausted {
                device: router.clone(),
            })?;
        info!(%router, rule = %id, src, dst, %action, "firewall rule added");
        Ok(id)
    }

    pub fn delete_firewall_rule(
        &mut self,
        router: &DeviceId,
        rule: RuleId,
    ) -> Result<FirewallRule, CoreError> {
        let device = self.router_mut(router)?;
        let removed = device
            .firewall_rules
            .remove(rule)
            .ok_or_else(|| CoreError::RuleNotFound {
                device: router.clone(),
                rule,
            })?;
        info!(%router, %rule, "firewall rule deleted");
        Ok(removed)
    }

    fn router_mut(&mut self, id: &DeviceId) -> Result<&mut Device, CoreError> {
        let device = self
            .topology
            .device_mut(id)
            .ok_or_else(|| CoreError::DeviceNotFound { id: id.clone() })?;
        if !device.is_router() {
            return Err(CoreError::NotARouter {
                id: id.clone(),
                device_type: device.device_type,
            });
        }
        Ok(device)
    }

    // ── Simulation ──────────────────────────────────────────────────

    pub fn ping(&self, source: &DeviceId, target_ip: &str) -> PingOutcome {
        engine::ping(&self.topology, source, target_ip)
    }

    pub fn open_terminal(
        &self,
        device: &DeviceId,
        user: impl Into<String>,
    ) -> Result<TerminalSession, CoreError> {
        Ok(TerminalSession::open(self.device(device)?, user))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::engine::OutcomeKind;
    use pretty_assertions::assert_eq;

    fn settings(ip: &str, gateway: Option<&str>) -> DeviceSettings {
        DeviceSettings {
            ip: Some(ip.into()),
            gateway: gateway.map(Into::into),
            ..DeviceSettings::default()
        }
    }

    #[test]
    fn add_device_uses_allocator_and_default_label() {
        let mut ws = Workspace::new();
        let r = ws.add_device(DeviceType::Router, None);
        let pc = ws.add_device(DeviceType::Pc, Some("Desk"));
        assert_eq!((r.as_str(), pc.as_str()), ("10", "11"));
        assert_eq!(ws.device(&r).unwrap().label, "Router Mikrotik");
        assert_eq!(ws.device(&pc).unwrap().label, "Desk");
    }

    #[test]
    fn configure_rejects_out_of_range_and_keeps_state() {
        let mut ws = Workspace::new();
        let pc = ws.add_device(DeviceType::Pc, None);
        ws.configure_device(&pc, settings("192.168.1.10", Some("192.168.1.1")))
            .unwrap();

        let err = ws
            .configure_device(&pc, settings("300.1.1.1", Some("192.168.1.254")))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid IP Address: Value 300 exceeds 255");

        let dev = ws.device(&pc).unwrap();
        assert_eq!(dev.ip(), Some("192.168.1.10"));
        assert_eq!(dev.gateway(), Some("192.168.1.1"));
    }

    #[test]
    fn configure_rejects_bad_gateway_only_for_non_routers() {
        let mut ws = Workspace::new();
        let pc = ws.add_device(DeviceType::Pc, None);
        let router = ws.add_device(DeviceType::Router, None);

        let err = ws.configure_device(&pc, settings("10.0.0.5", Some("10.0.0"))).unwrap_err();
        assert_eq!(err.to_string(), "Invalid Gateway format (e.g. 192.168.1.1)");

        ws.configure_device(&router, settings("10.0.0.1", Some("10.0.0")))
            .unwrap();
        assert_eq!(ws.device(&router).unwrap().gateway, None);
    }

    #[test]
    fn configure_rejects_address_owned_by_another_device() {
        let mut ws = Workspace::new();
        let a = ws.add_device(DeviceType::Pc, None);
        let b = ws.add_device(DeviceType::Pc, None);
        ws.configure_device(&a, settings("10.0.0.5", None)).unwrap();

        let err = ws.configure_device(&b, settings("10.0.0.5", None)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::DuplicateAddress { .. })
        ));
        // Re-saving a device's own address is fine.
        ws.configure_device(&a, settings("10.0.0.5", None)).unwrap();
    }

    #[test]
    fn configure_with_empty_strings_clears_addresses() {
        let mut ws = Workspace::new();
        let pc = ws.add_device(DeviceType::Pc, None);
        ws.configure_device(&pc, settings("10.0.0.5", Some("10.0.0.1"))).unwrap();
        ws.configure_device(&pc, settings("", Some(""))).unwrap();
        let dev = ws.device(&pc).unwrap();
        assert_eq!((dev.ip.as_deref(), dev.gateway.as_deref()), (None, None));
    }

    #[test]
    fn connect_validates_endpoints() {
        let mut ws = Workspace::new();
        let a = ws.add_device(DeviceType::Pc, None);
        let b = ws.add_device(DeviceType::Switch, None);

        ws.connect(&a, &b).unwrap();
        assert!(matches!(
            ws.connect(&b, &a).unwrap_err(),
            CoreError::AlreadyLinked { .. }
        ));
        assert!(matches!(
            ws.connect(&a, &a).unwrap_err(),
            CoreError::SelfLink { .. }
        ));
        assert!(matches!(
            ws.connect(&a, &"99".into()).unwrap_err(),
            CoreError::DeviceNotFound { .. }
        ));
    }

    #[test]
    fn firewall_rules_only_on_routers() {
        let mut ws = Workspace::new();
        let pc = ws.add_device(DeviceType::Pc, None);
        let err = ws
            .add_firewall_rule(&pc, "any", "any", FirewallAction::Drop)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Device 10 is a pc; only routers carry firewall rules"
        );
    }

    #[test]
    fn firewall_rule_endpoints_are_validated() {
        let mut ws = Workspace::new();
        let r = ws.add_device(DeviceType::Router, None);

        let err = ws
            .add_firewall_rule(&r, "", "any", FirewallAction::Drop)
            .unwrap_err();
        assert_eq!(err.to_string(), "Source IP cannot be empty");

        let err = ws
            .add_firewall_rule(&r, "any", "8.8.8.256", FirewallAction::Drop)
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid Dest IP: Value 256 exceeds 255");

        assert!(ws.device(&r).unwrap().firewall_rules.is_empty());
    }

    #[test]
    fn imported_max_rule_id_blocks_new_rules() {
        let doc = r#"{
          "nodes": [
            { "id": "2", "type": "device", "position": { "x": 0, "y": 0 },
              "data": { "label": "R1", "deviceType": "router", "ip": "10.0.0.1",
                "firewallRules": [
                  { "id": 18446744073709551615, "src": "any", "dst": "any", "action": "ACCEPT" }
                ] } }
          ]
        }"#;
        let mut ws = Workspace::from_json(doc).unwrap();
        let router = DeviceId::from("2");

        let err = ws
            .add_firewall_rule(&router, "any", "8.8.8.8", FirewallAction::Drop)
            .unwrap_err();
        assert!(matches!(err, CoreError::RuleIdsExhausted { .. }));
        assert_eq!(err.to_string(), "Device 2 has run out of firewall rule ids");
        assert_eq!(ws.device(&router).unwrap().firewall_rules.len(), 1);

        // freeing the top id makes room again
        ws.delete_firewall_rule(&router, RuleId(u64::MAX)).unwrap();
        let id = ws
            .add_firewall_rule(&router, "any", "8.8.8.8", FirewallAction::Drop)
            .unwrap();
        assert_eq!(id, RuleId(1));
    }

    #[test]
    fn delete_rule_by_id() {
        let mut ws = Workspace::new();
        let r = ws.add_device(DeviceType::Router, None);
        let first = ws
            .add_firewall_rule(&r, "any", "8.8.8.8", FirewallAction::Drop)
            .unwrap();
        ws.add_firewall_rule(&r, "any", "any", FirewallAction::Accept)
            .unwrap();

        ws.delete_firewall_rule(&r, first).unwrap();
        assert_eq!(ws.device(&r).unwrap().firewall_rules.len(), 1);
        assert!(matches!(
            ws.delete_firewall_rule(&r, first).unwrap_err(),
            CoreError::RuleNotFound { .. }
        ));
    }

    #[test]
    fn failed_load_leaves_workspace_untouched() {
        let mut ws = Workspace::new();
        let pc = ws.add_device(DeviceType::Pc, None);
        let before = ws.topology().clone();

        assert!(ws.load_json("{ not json").is_err());
        assert!(
            ws.load_json(r#"{"edges":[{"id":"e","source":"1","target":"2"}]}"#)
                .is_err()
        );

        assert_eq!(ws.topology(), &before);
        assert_eq!(ws.add_device(DeviceType::Pc, None).as_str(), "11");
        assert!(ws.device(&pc).is_ok());
    }

    #[test]
    fn load_reseeds_ids() {
        let mut ws = Workspace::new();
        ws.load_json(
            r#"{"nodes":[
              {"id":"41","data":{"deviceType":"router"}},
              {"id":"7","data":{"deviceType":"pc"}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(ws.add_device(DeviceType::Switch, None).as_str(), "42");
    }

    #[test]
    fn json_round_trip() {
        let mut ws = Workspace::new();
        let r = ws.add_device(DeviceType::Router, None);
        let pc = ws.add_device(DeviceType::Pc, None);
        ws.configure_device(&r, settings("10.0.0.1", None)).unwrap();
        ws.configure_device(&pc, settings("10.0.0.5", Some("10.0.0.1"))).unwrap();
        ws.connect(&pc, &r).unwrap();
        ws.add_firewall_rule(&r, "10.0.0.5", "any", FirewallAction::Drop)
            .unwrap();

        let restored = Workspace::from_json(&ws.to_json().unwrap()).unwrap();
        assert_eq!(restored.topology(), ws.topology());
        assert_eq!(restored.ping(&pc, "8.8.8.8").kind(), OutcomeKind::Timeout);
    }

    #[test]
    fn clear_empties_topology_but_keeps_counting() {
        let mut ws = Workspace::new();
        ws.add_device(DeviceType::Pc, None);
        ws.clear();
        assert!(ws.topology().is_empty());
        assert_eq!(ws.add_device(DeviceType::Pc, None).as_str(), "11");
    }

    #[test]
    fn remove_device_removes_links() {
        let mut ws = Workspace::new();
        let a = ws.add_device(DeviceType::Pc, None);
        let b = ws.add_device(DeviceType::Pc, None);
        let link = ws.connect(&a, &b).unwrap();
        ws.remove_device(&b).unwrap();
        assert!(ws.topology().links().is_empty());
        assert!(matches!(
            ws.disconnect(&link).unwrap_err(),
            CoreError::LinkNotFound { .. }
        ));
    }

    #[test]
    fn open_terminal_requires_device() {
        let mut ws = Workspace::new();
        let pc = ws.add_device(DeviceType::Pc, None);
        assert_eq!(ws.open_terminal(&pc, "admin").unwrap().log().len(), 2);
        assert!(ws.open_terminal(&"nope".into(), "admin").is_err());
    }
}
