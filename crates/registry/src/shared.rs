//! Lock-guarded registry for multi-threaded hosts.
//!
//! One global mutex, held for the whole validate-then-write of each call.
//! Contention is expected to be low.

use crate::{Call, CallOutput, Registry};
use std::sync::{Mutex, MutexGuard};
use tessera_core::{
    AssetId, AssetMetadata, AssetRecord, Principal, RegistryError, RegistryEvent, RegistryResult,
};
use tessera_store::{CallContext, RegistryStore};

/// `Sync` wrapper around a [`Registry`]. Share it behind an `Arc`.
#[derive(Debug)]
pub struct SharedRegistry<S> {
    inner: Mutex<Registry<S>>,
}

impl<S: RegistryStore> SharedRegistry<S> {
    pub fn new(registry: Registry<S>) -> Self {
        Self {
            inner: Mutex::new(registry),
        }
    }

    pub fn open(store: S) -> RegistryResult<Self> {
        Registry::open(store).map(Self::new)
    }

    fn lock(&self) -> RegistryResult<MutexGuard<'_, Registry<S>>> {
        self.inner
            .lock()
            .map_err(|_| RegistryError::Store("registry lock poisoned".into()))
    }

    /// Runs `f` with exclusive access to the registry.
    pub fn with<T>(
        &self,
        f: impl FnOnce(&mut Registry<S>) -> RegistryResult<T>,
    ) -> RegistryResult<T> {
        let mut guard = self.lock()?;
        f(&mut *guard)
    }

    pub fn register(&self, ctx: &CallContext, metadata: AssetMetadata) -> RegistryResult<AssetId> {
        self.with(|reg| reg.register(ctx, metadata))
    }

    pub fn update(
        &self,
        ctx: &CallContext,
        id: AssetId,
        metadata: AssetMetadata,
    ) -> RegistryResult<()> {
        self.with(|reg| reg.update(ctx, id, metadata))
    }

    pub fn transfer_ownership(
        &self,
        ctx: &CallContext,
        id: AssetId,
        new_owner: Principal,
    ) -> RegistryResult<()> {
        self.with(|reg| reg.transfer_ownership(ctx, id, new_owner))
    }

    pub fn remove(&self, ctx: &CallContext, id: AssetId) -> RegistryResult<()> {
        self.with(|reg| reg.remove(ctx, id))
    }

    pub fn set_permission(
        &self,
        ctx: &CallContext,
        id: AssetId,
        target: Principal,
        granted: bool,
    ) -> RegistryResult<()> {
        self.with(|reg| reg.set_permission(ctx, id, target, granted))
    }

    pub fn get(&self, id: AssetId) -> RegistryResult<Option<AssetRecord>> {
        self.with(|reg| reg.get(id))
    }

    pub fn has_permission(&self, id: AssetId, principal: &Principal) -> RegistryResult<bool> {
        self.with(|reg| reg.has_permission(id, principal))
    }

    pub fn execute(&self, ctx: &CallContext, call: Call) -> RegistryResult<CallOutput> {
        self.with(|reg| reg.execute(ctx, call))
    }

    pub fn total_registered(&self) -> RegistryResult<u64> {
        self.with(|reg| Ok(reg.total_registered()))
    }

    pub fn drain_events(&self) -> RegistryResult<Vec<RegistryEvent>> {
        self.with(|reg| Ok(reg.drain_events()))
    }

    pub fn into_inner(self) -> RegistryResult<Registry<S>> {
        self.inner
            .into_inner()
            .map_err(|_| RegistryError::Store("registry lock poisoned".into()))
    }
}
