mod account;
mod superuser;

pub use account::{cmd_change_password, cmd_set_active};
pub use superuser::cmd_create_superuser;

use std::io::Write;

/// Reads one line from stdin after printing `prompt`.
fn prompt_line(prompt: &str) -> anyhow::Result<String> {
    print!("{prompt}");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}
