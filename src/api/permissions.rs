use super::ApiError;
use super::auth::Principal;
use crate::domain::{FeedItem, IdentityId};

/// Writes to a profile are allowed only to the profile itself.
pub fn ensure_own_profile(principal: &Principal, profile: IdentityId) -> Result<(), ApiError> {
    let caller = principal.require()?;
    if caller.id == profile {
        Ok(())
    } else {
        Err(ApiError::permission_denied())
    }
}

/// Writes to a feed item are allowed only to its owner.
pub fn ensure_own_status(principal: &Principal, item: &FeedItem) -> Result<(), ApiError> {
    let caller = principal.require()?;
    if caller.id == item.owner {
        Ok(())
    } else {
        Err(ApiError::permission_denied())
    }
}
