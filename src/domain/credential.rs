//! Password credential derivation and verification.
//!
//! Hashes are Argon2id PHC strings. Accounts provisioned without a password
//! carry an unusable marker instead, which never verifies.

use anyhow::Result;
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use rand::{Rng, distr::Alphanumeric};

use crate::config::SecurityConfig;

/// Prefix marking a credential that can never be used to log in.
pub const UNUSABLE_PASSWORD_PREFIX: char = '!';

const UNUSABLE_SUFFIX_LEN: usize = 40;

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses the crate's default params.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// A random credential that no password can match.
#[must_use]
pub fn unusable_password() -> String {
    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(UNUSABLE_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("{UNUSABLE_PASSWORD_PREFIX}{suffix}")
}

#[must_use]
pub fn is_usable(credential_hash: &str) -> bool {
    !credential_hash.is_empty() && !credential_hash.starts_with(UNUSABLE_PASSWORD_PREFIX)
}

/// Checks `password` against a stored credential.
///
/// The comparison inside `argon2` is constant-time. Malformed or unusable
/// credentials simply fail.
#[must_use]
pub fn verify_password(credential_hash: &str, password: &str) -> bool {
    if !is_usable(credential_hash) {
        return false;
    }

    let Ok(parsed) = PasswordHash::new(credential_hash) else {
        tracing::warn!("Stored credential is not a valid PHC string");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        }
    }

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("pw123", Some(&fast_config())).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(&hash, "pw123"));
        assert!(!verify_password(&hash, "pw124"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same", Some(&fast_config())).unwrap();
        let b = hash_password("same", Some(&fast_config())).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_unusable_password_never_verifies() {
        let marker = unusable_password();
        assert_eq!(marker.len(), UNUSABLE_SUFFIX_LEN + 1);
        assert!(!is_usable(&marker));
        assert!(!verify_password(&marker, ""));
        assert!(!verify_password(&marker, &marker));
    }

    #[test]
    fn test_garbage_hash_fails_closed() {
        assert!(!verify_password("not-a-phc-string", "anything"));
        assert!(!verify_password("", ""));
    }

    #[test]
    fn test_rejects_invalid_params() {
        let config = SecurityConfig {
            argon2_memory_cost_kib: 0,
            ..fast_config()
        };
        assert!(hash_password("pw", Some(&config)).is_err());
    }
}
