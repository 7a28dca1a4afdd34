//! Storage and environment abstractions for Tessera.
//!
//! The registry never owns a persistence engine. It reads through
//! [`RegistryStore`] and commits each call's writes as one [`WriteBatch`].

pub mod batch;
pub mod env;
pub mod memory;

use tessera_core::{AssetId, AssetRecord, Principal, RegistryResult};

pub use batch::{WriteBatch, WriteOp};
pub use env::{CallContext, FixedIdentity, IdentitySource, PositionSource, SequentialPositions};
pub use memory::MemoryStore;

/// Abstraction over the durable key-value tables backing a registry.
///
/// Two keyed tables (assets by identifier, permission flags by
/// `(identifier, principal)`) and one scalar counter. `commit` must apply
/// a batch entirely or not at all.
pub trait RegistryStore: Send {
    fn asset(&self, id: AssetId) -> RegistryResult<Option<AssetRecord>>;

    /// `None` when no entry was ever written for the pair.
    fn permission(&self, id: AssetId, principal: &Principal) -> RegistryResult<Option<bool>>;

    /// Highest identifier ever allocated; zero for a fresh store.
    fn counter(&self) -> RegistryResult<u64>;

    fn commit(&mut self, batch: WriteBatch) -> RegistryResult<()>;
}
