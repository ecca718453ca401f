//! Command gate - administrator kill switches and the per-player command flag.
//!
//! Every invocation passes through [`check_command`] before it runs. A player
//! may only have one stateful command in flight at a time; the flag is
//! claimed with a conditional `UPDATE` and released once the command ends.

use crate::{
    core::player,
    entities::{DisabledCommand, disabled_command},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info};

/// Commands usable before `/start` and without claiming the command flag.
pub const ONBOARDING_EXEMPT: &[&str] = &["start", "help", "ping", "weather", "video", "mtr", "admin"];

/// Whether the command (or its parent) skips onboarding and the command flag.
#[must_use]
pub fn is_exempt(command: &str) -> bool {
    let root = command.split_whitespace().next().unwrap_or_default();
    ONBOARDING_EXEMPT.contains(&root)
}

/// Finds the kill switch covering `command`: its own, or that of a parent command.
async fn find_disabled<C>(db: &C, command: &str) -> Result<Option<disabled_command::Model>>
where
    C: ConnectionTrait,
{
    let words: Vec<&str> = command.split_whitespace().collect();
    let candidates: Vec<String> = (1..=words.len()).map(|n| words[..n].join(" ")).collect();
    if candidates.is_empty() {
        return Ok(None);
    }

    DisabledCommand::find()
        .filter(disabled_command::Column::Name.is_in(candidates))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Gates one invocation of `command` by `user_id`.
///
/// Returns `true` when the command flag was claimed and must be released with
/// [`release_command`] once the command finishes.
pub async fn check_command<C>(db: &C, user_id: i64, command: &str) -> Result<bool>
where
    C: ConnectionTrait,
{
    if let Some(disabled) = find_disabled(db, command).await? {
        return Err(Error::CommandDisabled {
            name: disabled.name,
            reason: disabled.reason,
        });
    }

    if is_exempt(command) {
        return Ok(false);
    }

    player::require_player(db, user_id).await?;

    if !player::try_begin_command(db, user_id).await? {
        debug!(user_id, command, "Command flag already held");
        return Err(Error::CommandAlreadyRunning);
    }
    Ok(true)
}

/// Releases the command flag of `user_id`.
pub async fn release_command<C>(db: &C, user_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    player::end_command(db, user_id).await
}

/// Disables `command` (and its subcommands) until it is enabled again.
pub async fn disable_command<C>(db: &C, command: &str, reason: Option<String>) -> Result<()>
where
    C: ConnectionTrait,
{
    let name = command.trim().to_lowercase();
    let now = Utc::now();

    if let Some(existing) = DisabledCommand::find_by_id(name.clone()).one(db).await? {
        let mut active_model: disabled_command::ActiveModel = existing.into();
        active_model.reason = Set(reason);
        active_model.disabled_at = Set(now);
        active_model.update(db).await?;
    } else {
        disabled_command::ActiveModel {
            name: Set(name.clone()),
            reason: Set(reason),
            disabled_at: Set(now),
        }
        .insert(db)
        .await?;
    }

    info!(command = %name, "Command disabled");
    Ok(())
}

/// Re-enables `command`; returns `false` when it was not disabled.
pub async fn enable_command<C>(db: &C, command: &str) -> Result<bool>
where
    C: ConnectionTrait,
{
    let name = command.trim().to_lowercase();
    let result = DisabledCommand::delete_by_id(name.clone()).exec(db).await?;
    if result.rows_affected > 0 {
        info!(command = %name, "Command enabled");
    }
    Ok(result.rows_affected > 0)
}

/// Every disabled command, alphabetically.
pub async fn list_disabled_commands<C>(db: &C) -> Result<Vec<disabled_command::Model>>
where
    C: ConnectionTrait,
{
    DisabledCommand::find()
        .order_by_asc(disabled_command::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_check_command_claims_flag_once() -> Result<()> {
        let db = setup_with_player(1).await?;

        assert!(check_command(&db, 1, "scavenge").await?);
        let second = check_command(&db, 1, "farm harvest").await;
        assert!(matches!(second, Err(Error::CommandAlreadyRunning)));

        release_command(&db, 1).await?;
        assert!(check_command(&db, 1, "farm harvest").await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_check_command_requires_onboarding() -> Result<()> {
        let db = setup_test_db().await?;

        let result = check_command(&db, 7, "inventory").await;
        assert!(matches!(result, Err(Error::NeedsOnboarding { user_id: 7 })));

        assert!(!check_command(&db, 7, "start").await?);
        assert!(!check_command(&db, 7, "admin disable").await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_disabled_parent_covers_subcommands() -> Result<()> {
        let db = setup_with_player(1).await?;
        disable_command(&db, "Farm", Some("drought".to_string())).await?;

        let result = check_command(&db, 1, "farm harvest").await;
        match result {
            Err(Error::CommandDisabled { name, reason }) => {
                assert_eq!(name, "farm");
                assert_eq!(reason.as_deref(), Some("drought"));
            }
            other => panic!("expected CommandDisabled, got {other:?}"),
        }
        // the flag was never claimed
        assert!(!player::require_player(&db, 1).await?.is_running_command);

        assert!(enable_command(&db, "farm").await?);
        assert!(!enable_command(&db, "farm").await?);
        assert!(check_command(&db, 1, "farm harvest").await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_disable_twice_updates_reason() -> Result<()> {
        let db = setup_test_db().await?;
        disable_command(&db, "trade", None).await?;
        disable_command(&db, "trade", Some("exploit".to_string())).await?;
        disable_command(&db, "maze", None).await?;

        let disabled = list_disabled_commands(&db).await?;
        assert_eq!(disabled.len(), 2);
        assert_eq!(disabled[0].name, "maze");
        assert_eq!(disabled[1].reason.as_deref(), Some("exploit"));
        Ok(())
    }
}
