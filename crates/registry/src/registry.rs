//! The registry handle: store, allocator and optional event journal.

use crate::allocator::IdAllocator;
use tessera_core::{AssetId, AssetRecord, Principal, RegistryError, RegistryEvent, RegistryResult};
use tessera_store::{RegistryStore, WriteBatch};

/// Asset and permission registry over a [`RegistryStore`].
///
/// Every public operation runs validate, read, then one `commit`. Calls
/// are expected to be serialized by the host; wrap in
/// [`SharedRegistry`](crate::SharedRegistry) otherwise.
///
/// ```ignore
/// let mut registry = Registry::open(MemoryStore::new())?.with_journal();
/// let id = registry.register(&ctx, AssetMetadata::new("doc", 500, "x", ["a"]))?;
/// let events = registry.drain_events();
/// ```
#[derive(Debug)]
pub struct Registry<S> {
    pub(crate) store: S,
    pub(crate) allocator: IdAllocator,
    /// `None` unless enabled with [`Registry::with_journal`].
    journal: Option<Vec<RegistryEvent>>,
}

impl<S: RegistryStore> Registry<S> {
    /// Opens a registry, resuming identifier allocation from the store.
    ///
    /// No events are kept until [`Registry::with_journal`] is called.
    pub fn open(store: S) -> RegistryResult<Self> {
        let last = store.counter()?;
        tracing::debug!(last, "registry opened");
        Ok(Self {
            store,
            allocator: IdAllocator::resume(last),
            journal: None,
        })
    }

    /// Keeps one event per committed mutation until drained. The host must
    /// call [`Registry::drain_events`] to bound memory.
    pub fn with_journal(mut self) -> Self {
        self.journal.get_or_insert_with(Vec::new);
        self
    }

    pub fn is_journaling(&self) -> bool {
        self.journal.is_some()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// The counter: highest identifier ever assigned. Removal never lowers it.
    pub fn total_registered(&self) -> u64 {
        self.allocator.last()
    }

    /// Takes every event committed since the last drain, oldest first.
    /// Always empty without a journal.
    pub fn drain_events(&mut self) -> Vec<RegistryEvent> {
        self.journal.as_mut().map(std::mem::take).unwrap_or_default()
    }

    pub(crate) fn commit(
        &mut self,
        batch: WriteBatch,
        event: RegistryEvent,
    ) -> RegistryResult<()> {
        self.store.commit(batch)?;
        if let Some(journal) = self.journal.as_mut() {
            journal.push(event);
        }
        Ok(())
    }

    /// Loads `id` and checks that `caller` owns it.
    pub(crate) fn owned_record(
        &self,
        id: AssetId,
        caller: &Principal,
    ) -> RegistryResult<AssetRecord> {
        let record = self
            .store
            .asset(id)?
            .ok_or(RegistryError::AssetNotFound(id))?;

        if !record.is_owned_by(caller) {
            return Err(RegistryError::OwnershipVerificationFailed {
                asset: id,
                caller: *caller,
            });
        }
        Ok(record)
    }
}

pub(crate) fn log_rejection(op: &'static str, caller: &Principal, error: &RegistryError) {
    tracing::debug!(op, caller = %caller, kind = error.kind(), error = %error, "call rejected");
}
