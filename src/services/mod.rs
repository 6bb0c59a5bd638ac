pub mod identity_store;
pub mod identity_store_impl;
pub use identity_store::{IdentityError, IdentityStore};
pub use identity_store_impl::SeaOrmIdentityStore;

pub mod feed_store;
pub mod feed_store_impl;
pub use feed_store::{FeedError, FeedStore};
pub use feed_store_impl::SeaOrmFeedStore;
