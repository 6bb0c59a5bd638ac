//! Identity records and their plain constructor.

use std::fmt;

use super::credential;
use super::email::normalize_email;
use super::validation::{BLANK, FieldErrors};
use super::IdentityId;
use crate::config::SecurityConfig;

/// Something that can prove who it is with a password.
pub trait Authenticatable {
    fn credential_hash(&self) -> &str;

    fn can_authenticate(&self) -> bool;

    /// Verifies `password` against the stored credential. CPU-bound; callers
    /// on an async runtime should run it on a blocking thread.
    fn verify_credential(&self, password: &str) -> bool {
        credential::verify_password(self.credential_hash(), password)
    }

    fn has_usable_credential(&self) -> bool {
        credential::is_usable(self.credential_hash())
    }
}

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: IdentityId,
    pub email: String,
    pub name: String,
    pub(crate) password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub last_login: Option<String>,
}

impl Identity {
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn short_name(&self) -> &str {
        &self.name
    }
}

impl Authenticatable for Identity {
    fn credential_hash(&self) -> &str {
        &self.password_hash
    }

    fn can_authenticate(&self) -> bool {
        self.is_active
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.email)
    }
}

/// A validated identity that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl NewIdentity {
    /// Builds a regular account.
    ///
    /// Fails when `email` is empty. The email is normalized and the password,
    /// when present, is hashed; without one the account gets an unusable
    /// credential and can only be used once a password is set.
    pub fn new(
        email: &str,
        name: &str,
        password: Option<&str>,
        security: &SecurityConfig,
    ) -> Result<Self, NewIdentityError> {
        if email.trim().is_empty() {
            return Err(NewIdentityError::Invalid(FieldErrors::single(
                "email",
                "User must have an email address",
            )));
        }

        let password_hash = match password {
            Some(password) => credential::hash_password(password, Some(security))
                .map_err(NewIdentityError::Credential)?,
            None => credential::unusable_password(),
        };

        Ok(Self {
            email: normalize_email(email),
            name: name.to_string(),
            password_hash,
            is_active: true,
            is_staff: false,
            is_superuser: false,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NewIdentityError {
    #[error("Validation failed: {0}")]
    Invalid(FieldErrors),

    #[error("Failed to derive credential: {0}")]
    Credential(anyhow::Error),
}

/// Partial update of an identity. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct IdentityChanges {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

impl IdentityChanges {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.email.is_none() && self.name.is_none() && self.password.is_none()
    }

    /// Rejects blank replacements and normalizes the email in place.
    pub fn normalize(mut self) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();

        if let Some(email) = self.email.as_deref() {
            if email.trim().is_empty() {
                errors.add("email", BLANK);
            } else {
                self.email = Some(normalize_email(email));
            }
        }

        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            errors.add("name", BLANK);
        }

        errors.into_result().map(|()| self)
    }
}
