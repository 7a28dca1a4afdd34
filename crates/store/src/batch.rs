//! Staged writes for a single registry call.

use tessera_core::{AssetId, AssetRecord, PermissionEntry};

/// One staged table write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    PutAsset(AssetRecord),
    DeleteAsset(AssetId),
    PutPermission(PermissionEntry),
    SetCounter(u64),
}

/// Ordered writes committed as one indivisible step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_asset(&mut self, record: AssetRecord) -> &mut Self {
        self.ops.push(WriteOp::PutAsset(record));
        self
    }

    pub fn delete_asset(&mut self, id: AssetId) -> &mut Self {
        self.ops.push(WriteOp::DeleteAsset(id));
        self
    }

    pub fn put_permission(&mut self, entry: PermissionEntry) -> &mut Self {
        self.ops.push(WriteOp::PutPermission(entry));
        self
    }

    pub fn set_counter(&mut self, value: u64) -> &mut Self {
        self.ops.push(WriteOp::SetCounter(value));
        self
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl IntoIterator for WriteBatch {
    type Item = WriteOp;
    type IntoIter = std::vec::IntoIter<WriteOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ops_keep_staging_order() {
        let mut batch = WriteBatch::new();
        batch.delete_asset(AssetId::new(2)).set_counter(5);

        assert_eq!(batch.len(), 2);
        assert_eq!(
            batch.into_iter().collect::<Vec<_>>(),
            vec![WriteOp::DeleteAsset(AssetId::new(2)), WriteOp::SetCounter(5)]
        );
    }

    #[test]
    fn new_batch_is_empty() {
        assert!(WriteBatch::new().is_empty());
    }
}
