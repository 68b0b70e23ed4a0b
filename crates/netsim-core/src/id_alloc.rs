//! Device id allocation for one workspace.

use crate::model::DeviceId;

/// First id handed out by a fresh workspace.
pub const FIRST_DEVICE_ID: u64 = 10;

/// Issues decimal device ids, one past the last.
///
/// Owned by a workspace, so two workspaces never share a counter. After a
/// load it is reseeded past the highest numeric id in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    next: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self {
            next: FIRST_DEVICE_ID,
        }
    }
}

impl IdAllocator {
    /// Seed past the highest numeric id in `ids`. Non-numeric ids are
    /// skipped; with none at all the counter starts at 1.
    pub fn seeded_from<'a>(ids: impl IntoIterator<Item = &'a DeviceId>) -> Self {
        let max = ids.into_iter().filter_map(DeviceId::as_number).max().unwrap_or(0);
        Self {
            next: max.saturating_add(1),
        }
    }

    /// The id the next call to [`IdAllocator::allocate`] returns.
    pub fn peek(&self) -> DeviceId {
        DeviceId::new(self.next.to_string())
    }

    pub fn allocate(&mut self) -> DeviceId {
        let id = self.peek();
        self.next = self.next.saturating_add(1);
        id
    }
}
