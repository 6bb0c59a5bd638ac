use crate::entities::prelude::*;
use crate::entities::profile_feed_items;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

const FEED_OWNER_INDEX: &str = "idx_profile_feed_items_user_profile_id";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(UserProfiles)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Foreign key to user_profiles with ON DELETE CASCADE comes from the entity relation
        manager
            .create_table(
                schema
                    .create_table_from_entity(ProfileFeedItems)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(FEED_OWNER_INDEX)
                    .table(ProfileFeedItems)
                    .col(profile_feed_items::Column::UserProfileId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProfileFeedItems).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserProfiles).to_owned())
            .await?;

        Ok(())
    }
}
