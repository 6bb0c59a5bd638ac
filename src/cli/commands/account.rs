use crate::domain::Identity;
use crate::domain::email::normalize_email;
use crate::state::SharedState;

use super::prompt_line;

async fn find_account(state: &SharedState, email: &str) -> anyhow::Result<Identity> {
    state
        .store
        .identity_repo()
        .get_by_email(&normalize_email(email))
        .await?
        .ok_or_else(|| anyhow::anyhow!("No account found for {email}"))
}

pub async fn cmd_change_password(
    state: &SharedState,
    email: &str,
    password: Option<String>,
    unusable: bool,
) -> anyhow::Result<()> {
    let identity = find_account(state, email).await?;

    let password = if unusable {
        None
    } else {
        match password {
            Some(p) => Some(p),
            None => Some(prompt_line("New password: ")?),
        }
    };

    state
        .identities
        .set_password(identity.id, password.as_deref())
        .await?;

    if unusable {
        println!("✓ Password disabled for {identity}");
    } else {
        println!("✓ Password changed for {identity}");
    }
    Ok(())
}

pub async fn cmd_set_active(state: &SharedState, email: &str, active: bool) -> anyhow::Result<()> {
    let identity = find_account(state, email).await?;

    state.identities.set_active(identity.id, active).await?;

    let verb = if active { "Activated" } else { "Deactivated" };
    println!("✓ {verb}: {identity}");
    Ok(())
}
