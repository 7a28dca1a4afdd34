//! Per-asset allow-list, managed by the asset's owner.

use crate::registry::{log_rejection, Registry};
use tessera_core::{AssetId, PermissionEntry, Principal, RegistryEvent, RegistryResult};
use tessera_store::{CallContext, RegistryStore, WriteBatch};

impl<S: RegistryStore> Registry<S> {
    /// Grants or revokes `target`'s access to asset `id`. Owner only.
    ///
    /// Upserts the `(id, target)` entry; the owner may target themselves.
    pub fn set_permission(
        &mut self,
        ctx: &CallContext,
        id: AssetId,
        target: Principal,
        granted: bool,
    ) -> RegistryResult<()> {
        self.try_set_permission(ctx, id, target, granted)
            .inspect_err(|e| log_rejection("set_permission", &ctx.caller, e))
    }

    fn try_set_permission(
        &mut self,
        ctx: &CallContext,
        id: AssetId,
        target: Principal,
        granted: bool,
    ) -> RegistryResult<()> {
        self.owned_record(id, &ctx.caller)?;

        let mut batch = WriteBatch::new();
        batch.put_permission(PermissionEntry {
            asset_identifier: id,
            authorized_principal: target,
            access_granted: granted,
        });

        self.commit(
            batch,
            RegistryEvent::PermissionSet {
                asset: id,
                principal: target,
                granted,
                by: ctx.caller,
                position: ctx.position,
            },
        )?;

        tracing::info!(asset = %id, principal = %target, granted, "permission set");
        Ok(())
    }

    /// True iff the asset is present and `principal` holds a granted entry.
    ///
    /// Rows left behind by a removed asset never answer true.
    pub fn has_permission(&self, id: AssetId, principal: &Principal) -> RegistryResult<bool> {
        if self.store.asset(id)?.is_none() {
            return Ok(false);
        }
        Ok(self.store.permission(id, principal)?.unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::{AssetMetadata, RegistryError};
    use tessera_store::MemoryStore;

    const ALICE: Principal = Principal::repeat_byte(0xa1);
    const BOB: Principal = Principal::repeat_byte(0xb0);
    const CAROL: Principal = Principal::repeat_byte(0xc4);

    fn setup() -> (Registry<MemoryStore>, AssetId) {
        let mut reg = Registry::open(MemoryStore::new()).unwrap();
        let id = reg
            .register(
                &CallContext::new(ALICE, 1),
                AssetMetadata::new("doc", 500, "x", ["a"]),
            )
            .unwrap();
        (reg, id)
    }

    #[test]
    fn creator_is_granted_at_registration() {
        let (reg, id) = setup();
        assert!(reg.has_permission(id, &ALICE).unwrap());
        assert!(!reg.has_permission(id, &BOB).unwrap());
    }

    #[test]
    fn latest_set_permission_wins() {
        let (mut reg, id) = setup();
        let owner = CallContext::new(ALICE, 2);

        reg.set_permission(&owner, id, BOB, true).unwrap();
        assert!(reg.has_permission(id, &BOB).unwrap());

        reg.set_permission(&owner, id, BOB, false).unwrap();
        assert!(!reg.has_permission(id, &BOB).unwrap());

        reg.set_permission(&owner, id, BOB, true).unwrap();
        assert!(reg.has_permission(id, &BOB).unwrap());
    }

    #[test]
    fn non_owner_cannot_manage() {
        let (mut reg, id) = setup();
        let before = reg.store().permission_count();

        let err = reg
            .set_permission(&CallContext::new(BOB, 2), id, CAROL, true)
            .unwrap_err();

        assert_eq!(
            err,
            RegistryError::OwnershipVerificationFailed { asset: id, caller: BOB }
        );
        assert_eq!(reg.store().permission_count(), before);
        assert!(!reg.has_permission(id, &CAROL).unwrap());
    }

    #[test]
    fn unknown_asset_is_not_found_and_never_permitted() {
        let (mut reg, _) = setup();
        let missing = AssetId::new(99);

        assert_eq!(
            reg.set_permission(&CallContext::new(ALICE, 2), missing, BOB, true)
                .unwrap_err(),
            RegistryError::AssetNotFound(missing)
        );
        assert!(!reg.has_permission(missing, &ALICE).unwrap());
    }

    #[test]
    fn removed_asset_hides_stale_rows() {
        let (mut reg, id) = setup();
        let owner = CallContext::new(ALICE, 2);
        reg.set_permission(&owner, id, BOB, true).unwrap();

        reg.remove(&owner, id).unwrap();

        assert_eq!(reg.store().permission_count(), 2);
        assert!(!reg.has_permission(id, &ALICE).unwrap());
        assert!(!reg.has_permission(id, &BOB).unwrap());
    }

    #[test]
    fn transfer_keeps_existing_grants() {
        let (mut reg, id) = setup();
        reg.transfer_ownership(&CallContext::new(ALICE, 2), id, BOB)
            .unwrap();

        assert!(reg.has_permission(id, &ALICE).unwrap());
        assert!(!reg.has_permission(id, &BOB).unwrap());

        // The new owner manages the list from now on.
        reg.set_permission(&CallContext::new(BOB, 3), id, ALICE, false)
            .unwrap();
        assert!(!reg.has_permission(id, &ALICE).unwrap());
    }
}
