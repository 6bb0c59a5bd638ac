//! Domain service for the profile status feed.

use thiserror::Error;

use crate::domain::{FeedItem, FeedItemId, FieldErrors, IdentityId};

/// Errors specific to feed operations.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Feed item not found: {0}")]
    NotFound(FeedItemId),

    #[error("Owner not found: {0}")]
    OwnerNotFound(IdentityId),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for FeedError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

/// Domain service trait for feed items.
#[async_trait::async_trait]
pub trait FeedStore: Send + Sync {
    /// Creates a status update owned by `owner`, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Validation`] if the text is blank or longer than
    /// 255 characters, [`FeedError::OwnerNotFound`] if `owner` does not exist.
    async fn create_feed_item(
        &self,
        owner: IdentityId,
        status_text: &str,
    ) -> Result<FeedItem, FeedError>;

    /// Lists items in creation order, optionally only those of `owner`.
    async fn list_feed_items(&self, owner: Option<IdentityId>)
    -> Result<Vec<FeedItem>, FeedError>;

    async fn get(&self, id: FeedItemId) -> Result<FeedItem, FeedError>;

    /// Replaces the status text. The creation timestamp is left as is.
    async fn update_status(
        &self,
        id: FeedItemId,
        status_text: &str,
    ) -> Result<FeedItem, FeedError>;

    async fn delete(&self, id: FeedItemId) -> Result<(), FeedError>;
}
