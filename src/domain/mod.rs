//! Domain types for identities and their status feed.
//!
//! Everything in here is storage-agnostic: plain records, validating
//! constructors, and the newtype IDs that keep identity and feed keys apart.

pub mod credential;
pub mod email;
pub mod feed;
pub mod identity;
pub mod validation;

pub use feed::{FeedItem, NewFeedItem, STATUS_TEXT_MAX_CHARS};
pub use identity::{Authenticatable, Identity, IdentityChanges, NewIdentity, NewIdentityError};
pub use validation::FieldErrors;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an [`Identity`].
///
/// # Examples
///
/// ```rust
/// use profiles_api::domain::IdentityId;
///
/// let id = IdentityId::new(7);
/// assert_eq!(id.value(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct IdentityId(i32);

impl IdentityId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for IdentityId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl From<IdentityId> for i32 {
    fn from(id: IdentityId) -> Self {
        id.0
    }
}

/// Unique identifier for a [`FeedItem`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FeedItemId(i32);

impl FeedItemId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for FeedItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for FeedItemId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl From<FeedItemId> for i32 {
    fn from(id: FeedItemId) -> Self {
        id.0
    }
}

/// Current time as an RFC 3339 UTC timestamp with microsecond precision.
///
/// The fixed width keeps stored timestamps lexically sortable.
#[must_use]
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
