//! Domain types for the Tessera asset registry.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

use crate::validation::MAX_TAGS;

/// Environment-supplied ordering value recorded at registration.
pub type Position = u64;

/// Category tags in insertion order. Inline up to the tag cap.
pub type CategoryTags = SmallVec<[String; MAX_TAGS]>;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Registry-assigned asset identifier. Allocation starts at 1.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AssetId(u64);

impl AssetId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for AssetId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// An environment-verified caller or owner identity.
///
/// Opaque to the registry; only compared for equality. Rendered as a
/// 0x-prefixed 20-byte address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(Address);

impl Principal {
    pub const ZERO: Self = Self(Address::ZERO);

    /// Principal whose 20 bytes are all `byte`. Handy for fixtures.
    pub const fn repeat_byte(byte: u8) -> Self {
        Self(Address::repeat_byte(byte))
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Principal {
    type Err = <Address as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Address>().map(Self)
    }
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

/// Caller-supplied, owner-replaceable part of an asset record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMetadata {
    pub asset_name: String,
    /// Bytes of the referenced off-registry content.
    pub content_size: u64,
    pub asset_description: String,
    pub category_tags: CategoryTags,
}

impl AssetMetadata {
    pub fn new<I, T>(
        name: impl Into<String>,
        content_size: u64,
        description: impl Into<String>,
        tags: I,
    ) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            asset_name: name.into(),
            content_size,
            asset_description: description.into(),
            category_tags: tags.into_iter().map(Into::into).collect(),
        }
    }
}

/// A registered asset.
///
/// `asset_identifier` and `registration_position` never change after
/// creation; `asset_owner` changes only through ownership transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub asset_identifier: AssetId,
    pub asset_name: String,
    pub asset_owner: Principal,
    pub content_size: u64,
    pub registration_position: Position,
    pub asset_description: String,
    pub category_tags: CategoryTags,
}

impl AssetRecord {
    pub fn new(
        id: AssetId,
        owner: Principal,
        position: Position,
        metadata: AssetMetadata,
    ) -> Self {
        Self {
            asset_identifier: id,
            asset_name: metadata.asset_name,
            asset_owner: owner,
            content_size: metadata.content_size,
            registration_position: position,
            asset_description: metadata.asset_description,
            category_tags: metadata.category_tags,
        }
    }

    /// Replaces the four metadata fields, leaving identity, owner and
    /// position untouched.
    pub fn replace_metadata(&mut self, metadata: AssetMetadata) {
        self.asset_name = metadata.asset_name;
        self.content_size = metadata.content_size;
        self.asset_description = metadata.asset_description;
        self.category_tags = metadata.category_tags;
    }

    pub fn metadata(&self) -> AssetMetadata {
        AssetMetadata {
            asset_name: self.asset_name.clone(),
            content_size: self.content_size,
            asset_description: self.asset_description.clone(),
            category_tags: self.category_tags.clone(),
        }
    }

    #[inline]
    pub fn is_owned_by(&self, principal: &Principal) -> bool {
        self.asset_owner == *principal
    }
}

// ---------------------------------------------------------------------------
// Permissions
// ---------------------------------------------------------------------------

/// Composite key of a permission entry.
pub type PermissionKey = (AssetId, Principal);

/// Per-(asset, principal) access flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionEntry {
    pub asset_identifier: AssetId,
    pub authorized_principal: Principal,
    pub access_granted: bool,
}

impl PermissionEntry {
    pub fn key(&self) -> PermissionKey {
        (self.asset_identifier, self.authorized_principal)
    }
}

// ---------------------------------------------------------------------------
// Journal
// ---------------------------------------------------------------------------

/// One committed mutation, in commit order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RegistryEvent {
    Registered {
        asset: AssetId,
        owner: Principal,
        position: Position,
    },
    Updated {
        asset: AssetId,
        by: Principal,
        position: Position,
    },
    OwnershipTransferred {
        asset: AssetId,
        from: Principal,
        to: Principal,
        position: Position,
    },
    Removed {
        asset: AssetId,
        by: Principal,
        position: Position,
    },
    PermissionSet {
        asset: AssetId,
        principal: Principal,
        granted: bool,
        by: Principal,
        position: Position,
    },
}
