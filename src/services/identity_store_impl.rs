//! `SeaORM` implementation of the `IdentityStore` trait.

use async_trait::async_trait;
use tokio::task;
use tracing::{debug, info};

use crate::config::SecurityConfig;
use crate::db::{IdentityUpdate, Store};
use crate::domain::credential;
use crate::domain::email::normalize_email;
use crate::domain::validation::BLANK;
use crate::domain::{
    Authenticatable, FieldErrors, Identity, IdentityChanges, IdentityId, NewIdentity,
};
use crate::services::identity_store::{IdentityError, IdentityStore};

pub struct SeaOrmIdentityStore {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmIdentityStore {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    /// Argon2 is CPU-intensive, so hashing runs on the blocking pool.
    async fn hash(&self, password: String) -> Result<String, IdentityError> {
        let security = self.security.clone();
        let hash =
            task::spawn_blocking(move || credential::hash_password(&password, Some(&security)))
                .await??;
        Ok(hash)
    }
}

#[async_trait]
impl IdentityStore for SeaOrmIdentityStore {
    async fn create_user(
        &self,
        email: &str,
        name: &str,
        password: Option<&str>,
    ) -> Result<Identity, IdentityError> {
        let email = email.to_string();
        let name = name.to_string();
        let password = password.map(str::to_string);
        let security = self.security.clone();

        let new = task::spawn_blocking(move || {
            NewIdentity::new(&email, &name, password.as_deref(), &security)
        })
        .await??;

        let identity = self.store.identity_repo().insert(new).await?;
        Ok(identity)
    }

    async fn create_superuser(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<Identity, IdentityError> {
        if password.is_empty() {
            let errors = FieldErrors::single("password", BLANK);
            return Err(IdentityError::Validation(errors));
        }

        let identity = self.create_user(email, name, Some(password)).await?;

        let promoted = self
            .store
            .identity_repo()
            .set_privileges(identity.id, true, true)
            .await?
            .ok_or(IdentityError::NotFound(identity.id))?;

        info!("Granted superuser to {}", promoted.email);
        Ok(promoted)
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        let email = normalize_email(email);
        let password = password.to_string();

        let Some(identity) = self.store.identity_repo().get_by_email(&email).await? else {
            // Spend the same work as a real check so timing does not reveal the miss
            let _ = self.hash(password).await?;
            debug!("Login failed: unknown email");
            return Err(IdentityError::Authentication);
        };

        let (mut identity, valid) = task::spawn_blocking(move || {
            let valid = identity.verify_credential(&password);
            (identity, valid)
        })
        .await?;

        if !valid || !identity.can_authenticate() {
            debug!("Login failed for identity {}", identity.id);
            return Err(IdentityError::Authentication);
        }

        let stamp = self.store.identity_repo().record_login(identity.id).await?;
        identity.last_login = Some(stamp);

        Ok(identity)
    }

    async fn get(&self, id: IdentityId) -> Result<Identity, IdentityError> {
        self.store
            .identity_repo()
            .get(id)
            .await?
            .ok_or(IdentityError::NotFound(id))
    }

    async fn list(&self, search: Option<&str>) -> Result<Vec<Identity>, IdentityError> {
        Ok(self.store.identity_repo().list(search).await?)
    }

    async fn update(
        &self,
        id: IdentityId,
        changes: IdentityChanges,
    ) -> Result<Identity, IdentityError> {
        let changes = changes.normalize().map_err(IdentityError::Validation)?;

        let password_hash = match changes.password {
            Some(password) => Some(self.hash(password).await?),
            None => None,
        };

        let update = IdentityUpdate {
            email: changes.email,
            name: changes.name,
            password_hash,
        };

        self.store
            .identity_repo()
            .update(id, update)
            .await?
            .ok_or(IdentityError::NotFound(id))
    }

    async fn set_password(
        &self,
        id: IdentityId,
        password: Option<&str>,
    ) -> Result<(), IdentityError> {
        let password_hash = match password {
            Some(password) => self.hash(password.to_string()).await?,
            None => credential::unusable_password(),
        };

        let update = IdentityUpdate {
            password_hash: Some(password_hash),
            ..Default::default()
        };

        self.store
            .identity_repo()
            .update(id, update)
            .await?
            .ok_or(IdentityError::NotFound(id))?;

        info!("Password changed for identity {id}");
        Ok(())
    }

    async fn set_active(&self, id: IdentityId, is_active: bool) -> Result<(), IdentityError> {
        if self.store.identity_repo().set_active(id, is_active).await? {
            Ok(())
        } else {
            Err(IdentityError::NotFound(id))
        }
    }

    async fn delete(&self, id: IdentityId) -> Result<(), IdentityError> {
        if self.store.identity_repo().delete(id).await? {
            Ok(())
        } else {
            Err(IdentityError::NotFound(id))
        }
    }

    async fn issue_token(&self, identity: &Identity) -> Result<String, IdentityError> {
        Ok(self.store.token_repo().get_or_create(identity.id).await?)
    }

    async fn revoke_token(&self, identity: &Identity) -> Result<(), IdentityError> {
        self.store.token_repo().revoke(identity.id).await?;
        Ok(())
    }

    async fn identity_for_token(&self, key: &str) -> Result<Option<Identity>, IdentityError> {
        let Some(id) = self.store.token_repo().identity_for_key(key).await? else {
            return Ok(None);
        };

        let identity = self.store.identity_repo().get(id).await?;
        Ok(identity.filter(|i| i.is_active))
    }
}
