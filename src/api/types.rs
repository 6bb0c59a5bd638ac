use serde::Serialize;

use crate::domain::{FeedItem, FeedItemId, FieldErrors, Identity, IdentityId};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            errors: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            errors: None,
        }
    }
}

/// Public view of an identity. The credential never leaves the server.
#[derive(Debug, Serialize)]
pub struct ProfileDto {
    pub id: IdentityId,
    pub email: String,
    pub name: String,
}

impl From<Identity> for ProfileDto {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.id,
            email: identity.email,
            name: identity.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeedItemDto {
    pub id: FeedItemId,
    pub user_profile: IdentityId,
    pub status_text: String,
    pub created_on: String,
}

impl From<FeedItem> for FeedItemDto {
    fn from(item: FeedItem) -> Self {
        Self {
            id: item.id,
            user_profile: item.owner,
            status_text: item.status_text,
            created_on: item.created_on,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
