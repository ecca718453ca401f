//! Administrator commands - kill switches and maintenance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, embeds, handlers::autocomplete, tasks},
        core::guard,
        errors::Result,
    };
    use std::fmt::Write;

    /// Administrator tools.
    #[poise::command(
        slash_command,
        subcommands("disable", "enable", "disabled", "refresh_villagers"),
        required_permissions = "ADMINISTRATOR",
        default_member_permissions = "ADMINISTRATOR",
        guild_only
    )]
    pub async fn admin(_ctx: Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Disables a command (and its subcommands) for everyone.
    #[poise::command(slash_command, required_permissions = "ADMINISTRATOR")]
    pub async fn disable(
        ctx: Context<'_>,
        #[description = "Command name, e.g. \"farm harvest\""]
        #[autocomplete = "autocomplete::autocomplete_command_name"]
        command: String,
        #[description = "Reason shown to players"] reason: Option<String>,
    ) -> Result<()> {
        if command.trim().to_lowercase().starts_with("admin") {
            ctx.say("The admin commands cannot be disabled.").await?;
            return Ok(());
        }
        guard::disable_command(&ctx.data().database, &command, reason).await?;
        ctx.say(format!("🚫 `/{}` is now disabled.", command.trim().to_lowercase()))
            .await?;
        Ok(())
    }

    /// Re-enables a disabled command.
    #[poise::command(slash_command, required_permissions = "ADMINISTRATOR")]
    pub async fn enable(
        ctx: Context<'_>,
        #[description = "Command name"]
        #[autocomplete = "autocomplete::autocomplete_command_name"]
        command: String,
    ) -> Result<()> {
        let message = if guard::enable_command(&ctx.data().database, &command).await? {
            format!("✅ `/{}` is enabled again.", command.trim().to_lowercase())
        } else {
            format!("`/{}` was not disabled.", command.trim().to_lowercase())
        };
        ctx.say(message).await?;
        Ok(())
    }

    /// Lists disabled commands.
    #[poise::command(slash_command, required_permissions = "ADMINISTRATOR")]
    pub async fn disabled(ctx: Context<'_>) -> Result<()> {
        let disabled = guard::list_disabled_commands(&ctx.data().database).await?;
        if disabled.is_empty() {
            ctx.say("Every command is enabled.").await?;
            return Ok(());
        }

        let mut description = String::new();
        for entry in &disabled {
            write!(&mut description, "• `/{}` since {}", entry.name, entry.disabled_at.format("%Y-%m-%d %H:%M"))?;
            if let Some(reason) = &entry.reason {
                write!(&mut description, " - {reason}")?;
            }
            description.push('\n');
        }
        embeds::send(ctx, embeds::info("🚫 Disabled commands").description(description)).await
    }

    /// Replaces every villager right now.
    #[poise::command(slash_command, required_permissions = "ADMINISTRATOR")]
    pub async fn refresh_villagers(ctx: Context<'_>) -> Result<()> {
        ctx.defer().await?;
        let data = ctx.data();
        let stored = tasks::refresh_villagers(&data.database, &data.http, &data.game.villagers).await?;
        ctx.say(format!("🏘️ {stored} new villagers arrived in town.")).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
