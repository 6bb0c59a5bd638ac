//! `SeaORM` implementation of the `FeedStore` trait.

use async_trait::async_trait;

use crate::db::{Store, is_foreign_key_violation};
use crate::domain::feed::validate_status_text;
use crate::domain::{FeedItem, FeedItemId, IdentityId, NewFeedItem};
use crate::services::feed_store::{FeedError, FeedStore};

pub struct SeaOrmFeedStore {
    store: Store,
}

impl SeaOrmFeedStore {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl FeedStore for SeaOrmFeedStore {
    async fn create_feed_item(
        &self,
        owner: IdentityId,
        status_text: &str,
    ) -> Result<FeedItem, FeedError> {
        let new = NewFeedItem::new(owner, status_text).map_err(FeedError::Validation)?;

        self.store
            .feed_repo()
            .insert(new)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    FeedError::OwnerNotFound(owner)
                } else {
                    FeedError::from(e)
                }
            })
    }

    async fn list_feed_items(
        &self,
        owner: Option<IdentityId>,
    ) -> Result<Vec<FeedItem>, FeedError> {
        Ok(self.store.feed_repo().list(owner).await?)
    }

    async fn get(&self, id: FeedItemId) -> Result<FeedItem, FeedError> {
        self.store
            .feed_repo()
            .get(id)
            .await?
            .ok_or(FeedError::NotFound(id))
    }

    async fn update_status(
        &self,
        id: FeedItemId,
        status_text: &str,
    ) -> Result<FeedItem, FeedError> {
        validate_status_text(status_text).map_err(FeedError::Validation)?;

        self.store
            .feed_repo()
            .update_status(id, status_text)
            .await?
            .ok_or(FeedError::NotFound(id))
    }

    async fn delete(&self, id: FeedItemId) -> Result<(), FeedError> {
        if self.store.feed_repo().remove(id).await? {
            Ok(())
        } else {
            Err(FeedError::NotFound(id))
        }
    }
}
