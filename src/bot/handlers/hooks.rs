//! Hooks run around every command invocation.

use crate::{bot::Context, core::guard, errors::Result};
use tracing::{debug, error};

/// Marks an invocation that claimed the player's command flag.
struct FlagClaimed;

/// Runs the command gate; failures surface as `CommandCheckFailed`.
pub async fn command_check(ctx: Context<'_>) -> Result<bool> {
    let user_id = i64::try_from(ctx.author().id.get())?;
    let command = &ctx.command().qualified_name;

    let claimed = guard::check_command(&ctx.data().database, user_id, command).await?;
    if claimed {
        ctx.set_invocation_data(FlagClaimed).await;
    }
    debug!(user_id, command = %command, claimed, "Command admitted");
    Ok(true)
}

/// Releases the command flag after a successful command.
pub async fn post_command(ctx: Context<'_>) {
    release_flag(ctx).await;
}

/// Releases the command flag if this invocation claimed it.
pub async fn release_flag(ctx: Context<'_>) {
    if ctx.invocation_data::<FlagClaimed>().await.is_none() {
        return;
    }
    let Ok(user_id) = i64::try_from(ctx.author().id.get()) else {
        return;
    };
    if let Err(e) = guard::release_command(&ctx.data().database, user_id).await {
        error!(user_id, "Failed to release command flag: {e}");
    }
}
