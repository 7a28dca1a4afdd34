//! Asset lifecycle: register, update, transfer, remove, lookup.
//!
//! An asset is either absent or present. `register` is the only way in,
//! `remove` the only way out, and a removed identifier never comes back.

use crate::registry::{log_rejection, Registry};
use tessera_core::validation::validate_metadata;
use tessera_core::{
    AssetId, AssetMetadata, AssetRecord, PermissionEntry, Principal, RegistryError,
    RegistryEvent, RegistryResult,
};
use tessera_store::{CallContext, RegistryStore, WriteBatch};

impl<S: RegistryStore> Registry<S> {
    /// Registers a new asset owned by the caller and returns its identifier.
    ///
    /// Also grants the caller access to it. The record, the caller's
    /// permission entry and the advanced counter land in one commit.
    pub fn register(
        &mut self,
        ctx: &CallContext,
        metadata: AssetMetadata,
    ) -> RegistryResult<AssetId> {
        self.try_register(ctx, metadata)
            .inspect_err(|e| log_rejection("register", &ctx.caller, e))
    }

    fn try_register(
        &mut self,
        ctx: &CallContext,
        metadata: AssetMetadata,
    ) -> RegistryResult<AssetId> {
        validate_metadata(&metadata)?;

        let id = self.allocator.peek_next()?;
        if self.store.asset(id)?.is_some() {
            return Err(RegistryError::DuplicateRegistration(id));
        }

        let record = AssetRecord::new(id, ctx.caller, ctx.position, metadata);
        let mut batch = WriteBatch::new();
        batch
            .put_asset(record)
            .put_permission(PermissionEntry {
                asset_identifier: id,
                authorized_principal: ctx.caller,
                access_granted: true,
            })
            .set_counter(id.get());

        self.commit(
            batch,
            RegistryEvent::Registered {
                asset: id,
                owner: ctx.caller,
                position: ctx.position,
            },
        )?;
        self.allocator.confirm(id);

        tracing::info!(
            asset = %id,
            owner = %ctx.caller,
            position = ctx.position,
            "asset registered"
        );
        Ok(id)
    }

    /// Replaces name, size, description and tags. Owner only.
    ///
    /// Existence and ownership are checked before the new metadata is
    /// validated.
    pub fn update(
        &mut self,
        ctx: &CallContext,
        id: AssetId,
        metadata: AssetMetadata,
    ) -> RegistryResult<()> {
        self.try_update(ctx, id, metadata)
            .inspect_err(|e| log_rejection("update", &ctx.caller, e))
    }

    fn try_update(
        &mut self,
        ctx: &CallContext,
        id: AssetId,
        metadata: AssetMetadata,
    ) -> RegistryResult<()> {
        let mut record = self.owned_record(id, &ctx.caller)?;
        validate_metadata(&metadata)?;

        record.replace_metadata(metadata);
        let mut batch = WriteBatch::new();
        batch.put_asset(record);

        self.commit(
            batch,
            RegistryEvent::Updated {
                asset: id,
                by: ctx.caller,
                position: ctx.position,
            },
        )?;

        tracing::info!(asset = %id, by = %ctx.caller, "asset updated");
        Ok(())
    }

    /// Hands the asset to `new_owner`. Owner only.
    ///
    /// Permission entries are left as they are, including the previous
    /// owner's own grant.
    pub fn transfer_ownership(
        &mut self,
        ctx: &CallContext,
        id: AssetId,
        new_owner: Principal,
    ) -> RegistryResult<()> {
        self.try_transfer(ctx, id, new_owner)
            .inspect_err(|e| log_rejection("transfer_ownership", &ctx.caller, e))
    }

    fn try_transfer(
        &mut self,
        ctx: &CallContext,
        id: AssetId,
        new_owner: Principal,
    ) -> RegistryResult<()> {
        let mut record = self.owned_record(id, &ctx.caller)?;
        let previous = record.asset_owner;
        record.asset_owner = new_owner;

        let mut batch = WriteBatch::new();
        batch.put_asset(record);

        self.commit(
            batch,
            RegistryEvent::OwnershipTransferred {
                asset: id,
                from: previous,
                to: new_owner,
                position: ctx.position,
            },
        )?;

        tracing::info!(asset = %id, from = %previous, to = %new_owner, "ownership transferred");
        Ok(())
    }

    /// Deletes the asset record. Owner only.
    ///
    /// Permission rows for the asset are not cleaned up; they stay behind
    /// unobservable because `has_permission` requires a present asset. The
    /// counter is not lowered.
    pub fn remove(&mut self, ctx: &CallContext, id: AssetId) -> RegistryResult<()> {
        self.try_remove(ctx, id)
            .inspect_err(|e| log_rejection("remove", &ctx.caller, e))
    }

    fn try_remove(&mut self, ctx: &CallContext, id: AssetId) -> RegistryResult<()> {
        self.owned_record(id, &ctx.caller)?;

        let mut batch = WriteBatch::new();
        batch.delete_asset(id);

        self.commit(
            batch,
            RegistryEvent::Removed {
                asset: id,
                by: ctx.caller,
                position: ctx.position,
            },
        )?;

        tracing::info!(asset = %id, by = %ctx.caller, "asset removed");
        Ok(())
    }

    /// Read-only lookup. Any caller may read any asset.
    pub fn get(&self, id: AssetId) -> RegistryResult<Option<AssetRecord>> {
        self.store.asset(id)
    }

    pub fn owner_of(&self, id: AssetId) -> RegistryResult<Option<Principal>> {
        Ok(self.get(id)?.map(|record| record.asset_owner))
    }

    pub fn contains(&self, id: AssetId) -> RegistryResult<bool> {
        Ok(self.get(id)?.is_some())
    }
}
