//! API token management commands.

use console::style;

use crate::http::extractors::auth::create_token;
use crate::state::AppState;

/// Mint a new API token for a user id and print it once.
pub async fn create(state: &AppState, user_id: &str) -> anyhow::Result<()> {
    let token = create_token(&state.db_pool, user_id).await?;

    println!();
    println!(
        "  {} API token for '{}' (save this -- it won't be shown again):",
        style("🔑").bold(),
        style(user_id).cyan()
    );
    println!();
    println!("      {token}");
    println!();
    Ok(())
}
