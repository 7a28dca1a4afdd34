//! Metadata validation rules.
//!
//! The predicates are total: they never fail, only answer. All lengths are
//! byte lengths. [`validate_metadata`] maps them onto the error taxonomy and
//! gates every registration and update.

use crate::error::{RegistryError, RegistryResult};
use crate::types::AssetMetadata;

pub const MAX_NAME_LEN: usize = 64;
pub const MAX_DESCRIPTION_LEN: usize = 128;
pub const MAX_TAG_LEN: usize = 32;
pub const MAX_TAGS: usize = 10;
/// Exclusive upper bound on `content_size`.
pub const CONTENT_SIZE_CAP: u64 = 1_000_000_000;

#[inline]
fn within(len: usize, max: usize) -> bool {
    (1..=max).contains(&len)
}

pub fn is_valid_tag(tag: &str) -> bool {
    within(tag.len(), MAX_TAG_LEN)
}

pub fn is_valid_tag_list<S: AsRef<str>>(tags: &[S]) -> bool {
    within(tags.len(), MAX_TAGS) && tags.iter().all(|t| is_valid_tag(t.as_ref()))
}

pub fn is_valid_name(name: &str) -> bool {
    within(name.len(), MAX_NAME_LEN)
}

pub fn is_valid_description(description: &str) -> bool {
    within(description.len(), MAX_DESCRIPTION_LEN)
}

pub fn is_valid_content_size(size: u64) -> bool {
    (1..CONTENT_SIZE_CAP).contains(&size)
}

/// Checks all four metadata fields in argument order: name, content size,
/// description, tags. The first failing field decides the error.
pub fn validate_metadata(metadata: &AssetMetadata) -> RegistryResult<()> {
    if !is_valid_name(&metadata.asset_name) {
        return Err(RegistryError::InvalidMetadata(format!(
            "name must be 1-{MAX_NAME_LEN} bytes, got {}",
            metadata.asset_name.len()
        )));
    }
    if !is_valid_content_size(metadata.content_size) {
        return Err(RegistryError::SizeLimitExceeded(metadata.content_size));
    }
    if !is_valid_description(&metadata.asset_description) {
        return Err(RegistryError::InvalidMetadata(format!(
            "description must be 1-{MAX_DESCRIPTION_LEN} bytes, got {}",
            metadata.asset_description.len()
        )));
    }
    if !is_valid_tag_list(&metadata.category_tags) {
        return Err(RegistryError::CategoryValidationError(describe_tag_failure(
            &metadata.category_tags,
        )));
    }
    Ok(())
}

fn describe_tag_failure(tags: &[String]) -> String {
    if tags.is_empty() {
        return "at least one tag is required".into();
    }
    if tags.len() > MAX_TAGS {
        return format!("at most {MAX_TAGS} tags allowed, got {}", tags.len());
    }
    match tags.iter().position(|t| !is_valid_tag(t)) {
        Some(i) => format!(
            "tag {i} must be 1-{MAX_TAG_LEN} bytes, got {}",
            tags[i].len()
        ),
        None => "invalid tag list".into(),
    }
}
