//! Profile, balance and leaderboard commands.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, commands::{CurrencyChoice, author_id}, embeds},
        core::{farm, player},
        entities::Currency,
        errors::Result,
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    const LEADERBOARD_SIZE: u64 = 10;

    /// Shows a survivor's vitals and balances.
    #[poise::command(slash_command)]
    pub async fn profile(
        ctx: Context<'_>,
        #[description = "Survivor to look at (defaults to you)"] user: Option<serenity::User>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let target = user.as_ref().unwrap_or_else(|| ctx.author());
        let target_id = i64::try_from(target.id.get())?;

        let Some(survivor) = player::get_player(db, target_id).await? else {
            ctx.say(format!("{} has not started playing yet.", target.name))
                .await?;
            return Ok(());
        };

        let health_bar = farm::growth_bar(f64::from(survivor.health) / f64::from(player::MAX_VITAL), 10);
        let hunger_bar = farm::growth_bar(f64::from(survivor.hunger) / f64::from(player::MAX_VITAL), 10);

        let embed = embeds::info(format!("{}'s profile", target.name))
            .thumbnail(target.face())
            .field("❤️ Health", health_bar, false)
            .field("🍖 Hunger", hunger_bar, false)
            .field("⭐ Experience", survivor.experience.to_string(), true)
            .field(
                format!("{} Scrap metal", Currency::ScrapMetal.emoji()),
                survivor.scrap_metal.to_string(),
                true,
            )
            .field(
                format!("{} Copper", Currency::Copper.emoji()),
                survivor.copper.to_string(),
                true,
            )
            .footer(serenity::CreateEmbedFooter::new(format!(
                "Surviving since {}",
                survivor.created_at.format("%Y-%m-%d")
            )));

        embeds::send(ctx, embed).await
    }

    /// Shows your scrap metal and copper.
    #[poise::command(slash_command)]
    pub async fn balance(ctx: Context<'_>) -> Result<()> {
        let survivor = player::require_player(&ctx.data().database, author_id(ctx)?).await?;
        ctx.say(format!(
            "{} **{}** scrap metal · {} **{}** copper",
            Currency::ScrapMetal.emoji(),
            survivor.scrap_metal,
            Currency::Copper.emoji(),
            survivor.copper
        ))
        .await?;
        Ok(())
    }

    /// Shows the richest survivors.
    #[poise::command(slash_command)]
    pub async fn leaderboard(
        ctx: Context<'_>,
        #[description = "Currency to rank by"] currency: Option<CurrencyChoice>,
    ) -> Result<()> {
        let currency = Currency::from(currency.unwrap_or(CurrencyChoice::ScrapMetal));
        let top = player::leaderboard(&ctx.data().database, currency, LEADERBOARD_SIZE).await?;

        if top.is_empty() {
            ctx.say("Nobody has started playing yet.").await?;
            return Ok(());
        }

        let mut description = String::new();
        for (rank, survivor) in top.iter().enumerate() {
            let medal = match rank {
                0 => "🥇",
                1 => "🥈",
                2 => "🥉",
                _ => "▫️",
            };
            writeln!(
                &mut description,
                "{medal} **{}.** <@{}> - {} {}",
                rank + 1,
                survivor.id,
                player::balance_of(survivor, currency),
                currency.emoji()
            )?;
        }

        embeds::send(
            ctx,
            embeds::info(format!("🏆 Richest survivors ({currency})")).description(description),
        )
        .await
    }
}

// Re-export all commands
pub use inner::*;
