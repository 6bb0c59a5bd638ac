pub use super::auth_tokens::Entity as AuthTokens;
pub use super::profile_feed_items::Entity as ProfileFeedItems;
pub use super::user_profiles::Entity as UserProfiles;
