use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{FeedStore, IdentityStore, SeaOrmFeedStore, SeaOrmIdentityStore};

/// Everything handlers and CLI commands need, built once at startup and
/// passed down explicitly.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub identities: Arc<dyn IdentityStore>,

    pub feed: Arc<dyn FeedStore>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let identities: Arc<dyn IdentityStore> = Arc::new(SeaOrmIdentityStore::new(
            store.clone(),
            config.security.clone(),
        ));
        let feed: Arc<dyn FeedStore> = Arc::new(SeaOrmFeedStore::new(store.clone()));

        Self {
            config: Arc::new(config),
            store,
            identities,
            feed,
        }
    }
}
