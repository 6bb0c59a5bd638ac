use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::{Expr, LikeExpr},
};
use tracing::info;

use crate::domain::{Identity, IdentityId, NewIdentity, now_timestamp};
use crate::entities::{auth_tokens, prelude::*, profile_feed_items, user_profiles};

/// Column-level changes for [`IdentityRepository::update`]. Values are
/// expected to be normalized and hashed already.
#[derive(Debug, Default)]
pub struct IdentityUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password_hash: Option<String>,
}

/// Persistence for identities. The UNIQUE index on `email` is the authority
/// for duplicate detection, so writes surface the raw [`DbErr`] for callers
/// to classify.
pub struct IdentityRepository {
    conn: DatabaseConnection,
}

impl IdentityRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: user_profiles::Model) -> Identity {
        Identity {
            id: IdentityId::new(model.id),
            email: model.email,
            name: model.name,
            password_hash: model.password_hash,
            is_active: model.is_active,
            is_staff: model.is_staff,
            is_superuser: model.is_superuser,
            last_login: model.last_login,
        }
    }

    pub async fn insert(&self, new: NewIdentity) -> Result<Identity, DbErr> {
        let now = now_timestamp();

        let model = user_profiles::ActiveModel {
            email: Set(new.email),
            name: Set(new.name),
            password_hash: Set(new.password_hash),
            is_active: Set(new.is_active),
            is_staff: Set(new.is_staff),
            is_superuser: Set(new.is_superuser),
            last_login: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        info!("Created identity {} ({})", model.id, model.email);
        Ok(Self::map_model(model))
    }

    pub async fn get(&self, id: IdentityId) -> Result<Option<Identity>, DbErr> {
        let model = UserProfiles::find_by_id(id.value()).one(&self.conn).await?;
        Ok(model.map(Self::map_model))
    }

    /// Exact match on the stored (already normalized) email.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<Identity>, DbErr> {
        let model = UserProfiles::find()
            .filter(user_profiles::Column::Email.eq(email))
            .one(&self.conn)
            .await?;

        Ok(model.map(Self::map_model))
    }

    /// Lists identities by id, optionally filtered by a substring of name or email.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Identity>, DbErr> {
        let mut query = UserProfiles::find();

        if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
            let name = Expr::col(user_profiles::Column::Name);
            let email = Expr::col(user_profiles::Column::Email);
            query = query.filter(
                Condition::any()
                    .add(name.like(contains_pattern(term)))
                    .add(email.like(contains_pattern(term))),
            );
        }

        let rows = query
            .order_by_asc(user_profiles::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn update(
        &self,
        id: IdentityId,
        changes: IdentityUpdate,
    ) -> Result<Option<Identity>, DbErr> {
        let Some(model) = UserProfiles::find_by_id(id.value()).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: user_profiles::ActiveModel = model.into();
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(password_hash) = changes.password_hash {
            active.password_hash = Set(password_hash);
        }
        active.updated_at = Set(now_timestamp());

        let model = active.update(&self.conn).await?;
        Ok(Some(Self::map_model(model)))
    }

    pub async fn set_privileges(
        &self,
        id: IdentityId,
        is_staff: bool,
        is_superuser: bool,
    ) -> Result<Option<Identity>, DbErr> {
        let Some(model) = UserProfiles::find_by_id(id.value()).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: user_profiles::ActiveModel = model.into();
        active.is_staff = Set(is_staff);
        active.is_superuser = Set(is_superuser);
        active.updated_at = Set(now_timestamp());

        let model = active.update(&self.conn).await?;
        Ok(Some(Self::map_model(model)))
    }

    pub async fn set_active(&self, id: IdentityId, is_active: bool) -> Result<bool, DbErr> {
        let result = UserProfiles::update_many()
            .col_expr(user_profiles::Column::IsActive, Expr::value(is_active))
            .col_expr(
                user_profiles::Column::UpdatedAt,
                Expr::value(now_timestamp()),
            )
            .filter(user_profiles::Column::Id.eq(id.value()))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Stamps `last_login` and returns the stored timestamp.
    pub async fn record_login(&self, id: IdentityId) -> Result<String, DbErr> {
        let now = now_timestamp();

        UserProfiles::update_many()
            .col_expr(user_profiles::Column::LastLogin, Expr::value(now.clone()))
            .filter(user_profiles::Column::Id.eq(id.value()))
            .exec(&self.conn)
            .await?;

        Ok(now)
    }

    /// Deletes an identity together with its feed items and token.
    ///
    /// The schema cascades as well; deleting explicitly inside one
    /// transaction keeps the result independent of the connection's
    /// foreign-key pragma.
    pub async fn delete(&self, id: IdentityId) -> Result<bool, DbErr> {
        let txn = self.conn.begin().await?;

        let items = ProfileFeedItems::delete_many()
            .filter(profile_feed_items::Column::UserProfileId.eq(id.value()))
            .exec(&txn)
            .await?;

        AuthTokens::delete_many()
            .filter(auth_tokens::Column::UserProfileId.eq(id.value()))
            .exec(&txn)
            .await?;

        let result = UserProfiles::delete_by_id(id.value()).exec(&txn).await?;

        txn.commit().await?;

        if result.rows_affected > 0 {
            info!(
                "Deleted identity {} and {} feed item(s)",
                id, items.rows_affected
            );
        }

        Ok(result.rows_affected > 0)
    }
}

/// Substring match with `%`, `_` and the escape character taken literally.
fn contains_pattern(term: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape('\\')
}
