pub mod prelude;

pub mod auth_tokens;
pub mod profile_feed_items;
pub mod user_profiles;
