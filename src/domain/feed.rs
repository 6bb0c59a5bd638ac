//! Status feed items.

use std::fmt;

use super::validation::{FieldErrors, check_char_field};
use super::{FeedItemId, IdentityId};

pub const STATUS_TEXT_MAX_CHARS: usize = 255;

/// A short status update owned by one identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub id: FeedItemId,
    pub owner: IdentityId,
    pub status_text: String,
    /// Set once at creation.
    pub created_on: String,
}

impl fmt::Display for FeedItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.status_text)
    }
}

#[derive(Debug, Clone)]
pub struct NewFeedItem {
    pub owner: IdentityId,
    pub status_text: String,
    pub created_on: String,
}

impl NewFeedItem {
    pub fn new(owner: IdentityId, status_text: &str) -> Result<Self, FieldErrors> {
        validate_status_text(status_text)?;

        Ok(Self {
            owner,
            status_text: status_text.to_string(),
            created_on: super::now_timestamp(),
        })
    }
}

/// At most [`STATUS_TEXT_MAX_CHARS`] characters, not blank.
pub fn validate_status_text(status_text: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_char_field(
        &mut errors,
        "status_text",
        Some(status_text),
        STATUS_TEXT_MAX_CHARS,
    );
    errors.into_result()
}
