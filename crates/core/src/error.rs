//! Centralized error types for the Tessera workspace.

use crate::types::{AssetId, Principal};
use thiserror::Error;

/// Every rejection a registry call can produce.
///
/// All kinds are permanent for the call that produced them; none is retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RegistryError {
    #[error("Asset not found: #{0}")]
    AssetNotFound(AssetId),

    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    #[error("Content size {0} outside 1..1000000000")]
    SizeLimitExceeded(u64),

    #[error("Invalid category tags: {0}")]
    CategoryValidationError(String),

    #[error("{caller} does not own asset #{asset}")]
    OwnershipVerificationFailed { asset: AssetId, caller: Principal },

    #[error("Asset #{0} is already registered")]
    DuplicateRegistration(AssetId),

    // Declared for the administrative override; no operation raises these yet.
    #[error("Access denied")]
    AccessDenied,

    #[error("Administrative access required")]
    AdministrativeAccessRequired,

    #[error("Store error: {0}")]
    Store(String),
}

impl RegistryError {
    /// Stable snake_case label, used in machine-readable output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AssetNotFound(_) => "asset_not_found",
            Self::InvalidMetadata(_) => "invalid_metadata",
            Self::SizeLimitExceeded(_) => "size_limit_exceeded",
            Self::CategoryValidationError(_) => "category_validation_error",
            Self::OwnershipVerificationFailed { .. } => "ownership_verification_failed",
            Self::DuplicateRegistration(_) => "duplicate_registration",
            Self::AccessDenied => "access_denied",
            Self::AdministrativeAccessRequired => "administrative_access_required",
            Self::Store(_) => "store",
        }
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;
