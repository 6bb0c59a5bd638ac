use crate::domain::{FeedItem, FeedItemId, IdentityId, NewFeedItem};
use crate::entities::{prelude::*, profile_feed_items};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

/// Repository for profile feed items
pub struct FeedRepository {
    conn: DatabaseConnection,
}

impl FeedRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(r: profile_feed_items::Model) -> FeedItem {
        FeedItem {
            id: FeedItemId::new(r.id),
            owner: IdentityId::new(r.user_profile_id),
            status_text: r.status_text,
            created_on: r.created_on,
        }
    }

    pub async fn insert(&self, new: NewFeedItem) -> Result<FeedItem, DbErr> {
        let model = profile_feed_items::ActiveModel {
            user_profile_id: Set(new.owner.value()),
            status_text: Set(new.status_text),
            created_on: Set(new.created_on),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        info!("Added feed item {} for identity {}", model.id, new.owner);
        Ok(Self::map_model(model))
    }

    pub async fn get(&self, id: FeedItemId) -> Result<Option<FeedItem>, DbErr> {
        let result = ProfileFeedItems::find_by_id(id.value())
            .one(&self.conn)
            .await?;
        Ok(result.map(Self::map_model))
    }

    /// Creation order: `created_on`, ties broken by id.
    pub async fn list(&self, owner: Option<IdentityId>) -> Result<Vec<FeedItem>, DbErr> {
        let mut query = ProfileFeedItems::find();

        if let Some(owner) = owner {
            query = query.filter(profile_feed_items::Column::UserProfileId.eq(owner.value()));
        }

        let rows = query
            .order_by_asc(profile_feed_items::Column::CreatedOn)
            .order_by_asc(profile_feed_items::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    /// Replaces the status text; `created_on` is never written here.
    pub async fn update_status(
        &self,
        id: FeedItemId,
        status_text: &str,
    ) -> Result<Option<FeedItem>, DbErr> {
        let Some(model) = ProfileFeedItems::find_by_id(id.value())
            .one(&self.conn)
            .await?
        else {
            return Ok(None);
        };

        let mut active: profile_feed_items::ActiveModel = model.into();
        active.status_text = Set(status_text.to_string());
        let model = active.update(&self.conn).await?;

        Ok(Some(Self::map_model(model)))
    }

    pub async fn remove(&self, id: FeedItemId) -> Result<bool, DbErr> {
        let result = ProfileFeedItems::delete_by_id(id.value())
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
