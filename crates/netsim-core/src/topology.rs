//! Devices plus the links between them, with the lookups the engine needs.
//!
//! Lookups are linear scans in insertion order. Topologies are small and
//! the engine reads a fresh value for every call, so no indexes are kept.

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{Device, DeviceId, Link, LinkId};

/// Snapshot of a network: every device and every link.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topology {
    devices: Vec<Device>,
    links: Vec<Link>,
}

/// An address claimed by more than one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateAddress {
    pub ip: String,
    pub devices: Vec<DeviceId>,
}

impl Topology {
    pub fn new(devices: Vec<Device>, links: Vec<Link>) -> Self {
        Self { devices, links }
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty() && self.links.is_empty()
    }

    // ── Lookups ─────────────────────────────────────────────────────

    pub fn device(&self, id: &DeviceId) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == *id)
    }

    /// Device owning `ip`. With duplicate addresses the first device in
    /// insertion order wins; `duplicate_ips` reports such conflicts.
    pub fn device_by_ip(&self, ip: &str) -> Option<&Device> {
        if ip.is_empty() {
            return None;
        }
        self.devices.iter().find(|d| d.ip() == Some(ip))
    }

    /// Whether a link joins `a` and `b` in either direction.
    pub fn are_linked(&self, a: &DeviceId, b: &DeviceId) -> bool {
        self.links.iter().any(|l| l.connects(a, b))
    }

    /// Links attached to `device`.
    pub fn links_of<'a>(&'a self, device: &'a DeviceId) -> impl Iterator<Item = &'a Link> + 'a {
        self.links.iter().filter(move |l| l.touches(device))
    }

    // ── Invariant checks ────────────────────────────────────────────

    /// Every non-empty address claimed by two or more devices, in order of
    /// first appearance.
    pub fn duplicate_ips(&self) -> Vec<DuplicateAddress> {
        let mut owners: IndexMap<&str, Vec<DeviceId>> = IndexMap::new();
        for device in &self.devices {
            if let Some(ip) = device.ip() {
                owners.entry(ip).or_default().push(device.id.clone());
            }
        }
        owners
            .into_iter()
            .filter(|(_, devices)| devices.len() > 1)
            .map(|(ip, devices)| DuplicateAddress {
                ip: ip.to_owned(),
                devices,
            })
            .collect()
    }

    /// Links with an endpoint that is not a device of this topology.
    pub fn dangling_links(&self) -> Vec<&Link> {
        self.links
            .iter()
            .filter(|l| self.device(&l.source).is_none() || self.device(&l.target).is_none())
            .collect()
    }

    // ── Mutation (owner side) ───────────────────────────────────────

    pub fn device_mut(&mut self, id: &DeviceId) -> Option<&mut Device> {
        self.devices.iter_mut().find(|d| d.id == *id)
    }

    pub fn push_device(&mut self, device: Device) {
        self.devices.push(device);
    }

    /// Remove a device along with every link attached to it.
    pub fn remove_device(&mut self, id: &DeviceId) -> Option<Device> {
        let index = self.devices.iter().position(|d| d.id == *id)?;
        self.links.retain(|l| !l.touches(id));
        Some(self.devices.remove(index))
    }

    pub fn push_link(&mut self, link: Link) {
        self.links.push(link);
    }

    pub fn remove_link(&mut self, id: &LinkId) -> Option<Link> {
        let index = self.links.iter().position(|l| l.id == *id)?;
        Some(self.links.remove(index))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::DeviceType;
    use pretty_assertions::assert_eq;

    fn pc(id: &str, ip: &str) -> Device {
        let mut d = Device::new(id.into(), DeviceType::Pc, format!("PC {id}"));
        d.ip = Some(ip.into());
        d
    }

    #[test]
    fn device_lookup_by_id_and_ip() {
        let topo = Topology::new(vec![pc("1", "10.0.0.1"), pc("2", "10.0.0.2")], vec![]);
        assert_eq!(topo.device(&"2".into()).unwrap().label, "PC 2");
        assert_eq!(topo.device_by_ip("10.0.0.1").unwrap().id, DeviceId::from("1"));
        assert!(topo.device(&"3".into()).is_none());
        assert!(topo.device_by_ip("10.0.0.3").is_none());
    }

    #[test]
    fn empty_ip_never_matches() {
        let topo = Topology::new(vec![pc("1", "")], vec![]);
        assert!(topo.device_by_ip("").is_none());
    }

    #[test]
    fn duplicate_ip_lookup_returns_first() {
        let topo = Topology::new(vec![pc("1", "10.0.0.1"), pc("2", "10.0.0.1")], vec![]);
        assert_eq!(topo.device_by_ip("10.0.0.1").unwrap().id, DeviceId::from("1"));
    }

    #[test]
    fn links_are_symmetric() {
        let topo = Topology::new(
            vec![pc("1", "10.0.0.1"), pc("2", "10.0.0.2")],
            vec![Link::new("2".into(), "1".into())],
        );
        assert!(topo.are_linked(&"1".into(), &"2".into()));
        assert!(topo.are_linked(&"2".into(), &"1".into()));
        assert!(!topo.are_linked(&"1".into(), &"1".into()));
    }

    #[test]
    fn duplicate_ips_are_reported() {
        let topo = Topology::new(
            vec![
                pc("1", "10.0.0.1"),
                pc("2", "10.0.0.2"),
                pc("3", "10.0.0.1"),
                pc("4", ""),
                pc("5", ""),
            ],
            vec![],
        );
        assert_eq!(
            topo.duplicate_ips(),
            vec![DuplicateAddress {
                ip: "10.0.0.1".into(),
                devices: vec!["1".into(), "3".into()],
            }]
        );
    }

    #[test]
    fn remove_device_drops_its_links() {
        let mut topo = Topology::new(
            vec![pc("1", "10.0.0.1"), pc("2", "10.0.0.2"), pc("3", "10.0.0.3")],
            vec![
                Link::new("1".into(), "2".into()),
                Link::new("2".into(), "3".into()),
                Link::new("1".into(), "3".into()),
            ],
        );
        topo.remove_device(&"2".into()).unwrap();
        assert_eq!(topo.devices().len(), 2);
        assert_eq!(topo.links().len(), 1);
        assert!(topo.are_linked(&"1".into(), &"3".into()));
        assert!(topo.dangling_links().is_empty());
    }

    #[test]
    fn dangling_links_are_reported() {
        let topo = Topology::new(
            vec![pc("1", "10.0.0.1")],
            vec![Link::new("1".into(), "9".into())],
        );
        assert_eq!(topo.dangling_links().len(), 1);
    }
}
