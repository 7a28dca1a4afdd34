//! In-memory [`RegistryStore`].
//!
//! Backs the CLI, tests and benchmarks. A batch is applied in one pass with
//! no failure point, so commits are trivially all-or-nothing.

use crate::{RegistryStore, WriteBatch, WriteOp};
use std::collections::{BTreeMap, HashMap};
use tessera_core::{AssetId, AssetRecord, PermissionKey, Principal, RegistryResult};

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    assets: BTreeMap<AssetId, AssetRecord>,
    permissions: HashMap<PermissionKey, bool>,
    counter: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    /// Raw permission rows, including rows whose asset has been removed.
    pub fn permission_count(&self) -> usize {
        self.permissions.len()
    }
}

impl RegistryStore for MemoryStore {
    fn asset(&self, id: AssetId) -> RegistryResult<Option<AssetRecord>> {
        Ok(self.assets.get(&id).cloned())
    }

    fn permission(&self, id: AssetId, principal: &Principal) -> RegistryResult<Option<bool>> {
        Ok(self.permissions.get(&(id, *principal)).copied())
    }

    fn counter(&self) -> RegistryResult<u64> {
        Ok(self.counter)
    }

    fn commit(&mut self, batch: WriteBatch) -> RegistryResult<()> {
        let ops = batch.len();
        for op in batch {
            match op {
                WriteOp::PutAsset(record) => {
                    self.assets.insert(record.asset_identifier, record);
                }
                WriteOp::DeleteAsset(id) => {
                    self.assets.remove(&id);
                }
                WriteOp::PutPermission(entry) => {
                    self.permissions.insert(entry.key(), entry.access_granted);
                }
                WriteOp::SetCounter(value) => {
                    self.counter = value;
                }
            }
        }
        tracing::trace!(ops, "batch committed");
        Ok(())
    }
}
