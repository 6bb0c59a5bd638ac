use crate::services::IdentityError;
use crate::state::SharedState;

use super::prompt_line;

pub async fn cmd_create_superuser(
    state: &SharedState,
    email: &str,
    name: &str,
    password: Option<String>,
) -> anyhow::Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt_line("Password: ")?,
    };

    match state
        .identities
        .create_superuser(email, name, &password)
        .await
    {
        Ok(identity) => {
            println!("✓ Superuser created: {} (ID: {})", identity, identity.id);
            Ok(())
        }
        Err(IdentityError::Validation(errors)) => anyhow::bail!("Invalid input: {errors}"),
        Err(IdentityError::UniquenessViolation) => {
            anyhow::bail!("An account with email {email} already exists")
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::Store;

    #[tokio::test]
    async fn test_duplicate_superuser_is_an_error() {
        let mut config = Config::default();
        config.security.argon2_memory_cost_kib = 1024;
        config.security.argon2_time_cost = 1;
        let store = Store::new("sqlite::memory:").await.unwrap();
        let state = SharedState::with_store(config, store);

        let password = Some("pw".to_string());
        cmd_create_superuser(&state, "root@example.org", "Root", password.clone())
            .await
            .unwrap();

        assert!(
            cmd_create_superuser(&state, "root@EXAMPLE.org", "Root", password)
                .await
                .is_err()
        );
        assert!(
            cmd_create_superuser(&state, "other@example.org", "Other", Some(String::new()))
                .await
                .is_err()
        );
    }
}
