// ── Link domain types ──

use serde::{Deserialize, Serialize};

use super::entity_id::{DeviceId, LinkId};

/// An undirected cable between two devices.
///
/// `source`/`target` only record how the link was drawn; connectivity
/// checks treat both directions alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    pub source: DeviceId,
    pub target: DeviceId,
}

impl Link {
    pub fn new(source: DeviceId, target: DeviceId) -> Self {
        Self {
            id: LinkId::between(&source, &target),
            source,
            target,
        }
    }

    /// Whether this link joins `a` and `b`, in either direction.
    pub fn connects(&self, a: &DeviceId, b: &DeviceId) -> bool {
        (self.source == *a && self.target == *b) || (self.source == *b && self.target == *a)
    }

    pub fn touches(&self, device: &DeviceId) -> bool {
        self.source == *device || self.target == *device
    }
}
