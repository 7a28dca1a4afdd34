//! Sequential identifier allocation.

use tessera_core::{AssetId, RegistryError, RegistryResult};

/// Hands out asset identifiers `last + 1, last + 2, ...`.
///
/// Owned by one [`Registry`](crate::Registry) and seeded from the store's
/// persisted counter. Allocation is two-phase: `peek_next` proposes, and
/// `confirm` advances only once the registration has been committed, so a
/// failed commit never burns an identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdAllocator {
    last: u64,
}

impl IdAllocator {
    pub fn resume(last: u64) -> Self {
        Self { last }
    }

    pub fn peek_next(&self) -> RegistryResult<AssetId> {
        self.last
            .checked_add(1)
            .map(AssetId::new)
            .ok_or_else(|| RegistryError::Store("identifier space exhausted".into()))
    }

    /// Records `id` as allocated. Never moves backwards.
    pub fn confirm(&mut self, id: AssetId) {
        self.last = self.last.max(id.get());
    }

    /// Highest identifier handed out so far.
    pub fn last(&self) -> u64 {
        self.last
    }
}
