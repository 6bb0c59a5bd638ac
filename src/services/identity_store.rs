//! Domain service for user identities.
//!
//! Owns account creation, password authentication, profile updates and the
//! login tokens handed out to authenticated identities.

use thiserror::Error;

use crate::domain::{FieldErrors, Identity, IdentityChanges, IdentityId, NewIdentityError};

/// Errors specific to identity operations.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("user profile with this email already exists.")]
    UniquenessViolation,

    /// Deliberately says nothing about whether the account exists.
    #[error("Unable to log in with provided credentials.")]
    Authentication,

    #[error("Identity not found: {0}")]
    NotFound(IdentityId),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for IdentityError {
    fn from(err: sea_orm::DbErr) -> Self {
        if crate::db::is_unique_violation(&err) {
            Self::UniquenessViolation
        } else {
            Self::Database(err.to_string())
        }
    }
}

impl From<anyhow::Error> for IdentityError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<NewIdentityError> for IdentityError {
    fn from(err: NewIdentityError) -> Self {
        match err {
            NewIdentityError::Invalid(errors) => Self::Validation(errors),
            NewIdentityError::Credential(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for IdentityError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(format!("Credential task panicked: {err}"))
    }
}

/// Domain service trait for identities.
#[async_trait::async_trait]
pub trait IdentityStore: Send + Sync {
    /// Creates a regular account. Without a password the account cannot log in.
    ///
    /// # Errors
    ///
    /// [`IdentityError::Validation`] for an empty email,
    /// [`IdentityError::UniquenessViolation`] if the normalized email is taken.
    async fn create_user(
        &self,
        email: &str,
        name: &str,
        password: Option<&str>,
    ) -> Result<Identity, IdentityError>;

    /// Creates an account with staff and superuser flags set.
    ///
    /// # Errors
    ///
    /// As [`IdentityStore::create_user`], plus [`IdentityError::Validation`]
    /// for an empty password.
    async fn create_superuser(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<Identity, IdentityError>;

    /// Verifies credentials and returns the identity.
    ///
    /// # Errors
    ///
    /// [`IdentityError::Authentication`] for an unknown email, an inactive
    /// or passwordless account, and a wrong password alike.
    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, IdentityError>;

    async fn get(&self, id: IdentityId) -> Result<Identity, IdentityError>;

    /// Lists identities, optionally filtered by a name/email substring.
    async fn list(&self, search: Option<&str>) -> Result<Vec<Identity>, IdentityError>;

    /// Applies a partial update; a new password is re-hashed.
    async fn update(
        &self,
        id: IdentityId,
        changes: IdentityChanges,
    ) -> Result<Identity, IdentityError>;

    /// Replaces the credential. `None` makes it unusable.
    async fn set_password(
        &self,
        id: IdentityId,
        password: Option<&str>,
    ) -> Result<(), IdentityError>;

    async fn set_active(&self, id: IdentityId, is_active: bool) -> Result<(), IdentityError>;

    /// Deletes the identity along with everything it owns.
    async fn delete(&self, id: IdentityId) -> Result<(), IdentityError>;

    /// Returns the identity's login token, creating it on first use.
    async fn issue_token(&self, identity: &Identity) -> Result<String, IdentityError>;

    async fn revoke_token(&self, identity: &Identity) -> Result<(), IdentityError>;

    /// Resolves a token to its identity. Inactive identities resolve to `None`.
    async fn identity_for_token(&self, key: &str) -> Result<Option<Identity>, IdentityError>;
}
