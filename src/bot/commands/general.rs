//! General Discord commands - ping, help and onboarding.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, commands::author_id, embeds},
        core::{farm, player},
        errors::Result,
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command)]
    pub async fn ping(ctx: Context<'_>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command)]
    pub async fn help(ctx: Context<'_>) -> Result<()> {
        let help_text = "**BOSS Help**\n\
        Survive, scavenge and trade your way to the top.\n\n\
        **Getting started**\n\
        • `/start` - Create your survivor.\n\
        • `/profile [user]` - Health, hunger, experience and balances.\n\
        • `/balance` - Your scrap metal and copper.\n\
        • `/leaderboard <currency>` - The richest survivors.\n\n\
        **Items**\n\
        • `/inventory [which]` - Backpack, chest or vault contents.\n\
        • `/move <item> <quantity> <from> <to>` - Move items between inventories.\n\
        • `/buy`, `/sell`, `/item`, `/eat` - Shop, inspect and eat.\n\
        • `/exchange <direction> <amount>` - Trade scrap metal for copper and back.\n\n\
        **Activities**\n\
        • `/farm view|plant|harvest` - Grow crops.\n\
        • `/villagers`, `/trade <villager> [times]` - Deal with the locals.\n\
        • `/scavenge` - Search the ruins (costs hunger).\n\
        • `/maze [width] [height]` - Solve a maze for scrap metal.\n\
        • `/trivia` - Answer a question for scrap metal.\n\n\
        **Utility**\n\
        • `/weather`, `/video <query>`, `/mtr <line> <station>`, `/ping`";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Creates your survivor and farm.
    #[poise::command(slash_command)]
    pub async fn start(ctx: Context<'_>) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = author_id(ctx)?;

        let created = player::register_player(db, user_id).await?;
        farm::ensure_farm(db, user_id, ctx.data().game.farm.plot_count).await?;

        embeds::send(
            ctx,
            embeds::success(
                "Welcome, survivor",
                format!(
                    "You crawl out of the bunker with **{}** scrap metal, full health and a full stomach.\n\
                     Try `/scavenge` to find supplies and `/help` for everything else.",
                    created.scrap_metal
                ),
            ),
        )
        .await
    }
}

// Re-export all commands
pub use inner::*;
