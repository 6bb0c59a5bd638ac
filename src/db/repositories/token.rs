use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};

use crate::db::is_unique_violation;
use crate::domain::{IdentityId, now_timestamp};
use crate::entities::{auth_tokens, prelude::*};

/// Login tokens, at most one per identity.
pub struct TokenRepository {
    conn: DatabaseConnection,
}

impl TokenRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_for_identity(&self, identity: IdentityId) -> Result<Option<String>, DbErr> {
        let token = AuthTokens::find()
            .filter(auth_tokens::Column::UserProfileId.eq(identity.value()))
            .one(&self.conn)
            .await?;

        Ok(token.map(|t| t.key))
    }

    /// Returns the identity's token, creating one on first use.
    ///
    /// Two concurrent first logins race on the unique `user_profile_id`
    /// column; the loser re-reads the winner's token.
    pub async fn get_or_create(&self, identity: IdentityId) -> Result<String, DbErr> {
        if let Some(key) = self.get_for_identity(identity).await? {
            return Ok(key);
        }

        let insert = auth_tokens::ActiveModel {
            key: Set(generate_token_key()),
            user_profile_id: Set(identity.value()),
            created: Set(now_timestamp()),
        }
        .insert(&self.conn)
        .await;

        match insert {
            Ok(model) => Ok(model.key),
            Err(err) if is_unique_violation(&err) => {
                self.get_for_identity(identity).await?.ok_or(err)
            }
            Err(err) => Err(err),
        }
    }

    pub async fn identity_for_key(&self, key: &str) -> Result<Option<IdentityId>, DbErr> {
        let token = AuthTokens::find_by_id(key.to_string())
            .one(&self.conn)
            .await?;

        Ok(token.map(|t| IdentityId::new(t.user_profile_id)))
    }

    pub async fn revoke(&self, identity: IdentityId) -> Result<bool, DbErr> {
        let result = AuthTokens::delete_many()
            .filter(auth_tokens::Column::UserProfileId.eq(identity.value()))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

/// Generate a random token key (64 character hex string)
#[must_use]
pub fn generate_token_key() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();

    bytes.iter().fold(String::with_capacity(64), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_keys_are_hex_and_unique() {
        let a = generate_token_key();
        let b = generate_token_key();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
