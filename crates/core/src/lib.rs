//! Domain models, validation rules, and error definitions.
//!
//! Foundation crate -- no I/O dependencies.

pub mod error;
pub mod types;
pub mod validation;

pub use error::{RegistryError, RegistryResult};
pub use types::{
    AssetId, AssetMetadata, AssetRecord, CategoryTags, PermissionEntry, PermissionKey, Position,
    Principal, RegistryEvent,
};
