//! Farm commands - view, plant and harvest.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, commands::author_id, embeds, handlers::autocomplete},
        core::farm::{self, GrowthStage},
        errors::{Error, Result},
    };
    use chrono::Utc;
    use rand::{SeedableRng, rngs::StdRng};
    use std::fmt::Write;

    /// Grow crops on your plots.
    #[poise::command(slash_command, subcommands("view", "plant", "harvest"))]
    pub async fn farm(_ctx: Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Shows every plot and how far its crop has grown.
    #[poise::command(slash_command)]
    pub async fn view(ctx: Context<'_>) -> Result<()> {
        let db = &ctx.data().database;
        let game = &ctx.data().game;
        let user_id = author_id(ctx)?;
        let now = Utc::now();

        let plots = farm::ensure_farm(db, user_id, game.farm.plot_count).await?;

        let mut description = String::new();
        for plot in &plots {
            let stage = farm::growth_stage(plot, &game.crops, now);
            let slot = plot.slot + 1;
            match (stage, plot.crop.as_deref(), plot.planted_at) {
                (GrowthStage::Empty, ..) | (_, None, _) | (_, _, None) => {
                    writeln!(&mut description, "{} **Plot {slot}** - empty", stage.emoji())?;
                }
                (_, Some(crop_name), Some(planted_at)) => {
                    let bar = game.find_crop(crop_name).map_or_else(
                        || farm::growth_bar(1.0, 10),
                        |crop| farm::growth_bar(farm::growth_fraction(planted_at, now, crop.growth_minutes), 10),
                    );
                    writeln!(&mut description, "{} **Plot {slot}** - {crop_name} {bar}", stage.emoji())?;
                }
            }
        }

        embeds::send(ctx, embeds::info("🌱 Your farm").description(description)).await
    }

    /// Plants a crop in an empty plot, using one seed from your backpack.
    #[poise::command(slash_command)]
    pub async fn plant(
        ctx: Context<'_>,
        #[description = "Plot number"]
        #[min = 1]
        plot: i32,
        #[description = "Crop to plant"]
        #[autocomplete = "autocomplete::autocomplete_crop"]
        crop: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let game = &ctx.data().game;
        let user_id = author_id(ctx)?;

        let crop = game.find_crop(&crop).ok_or_else(|| Error::Farm {
            reason: format!("there is no crop called {crop}"),
        })?;

        farm::ensure_farm(db, user_id, game.farm.plot_count).await?;
        farm::plant(db, user_id, plot - 1, crop, Utc::now()).await?;

        ctx.say(format!(
            "🌱 Planted {} in plot {plot}. It will be ripe in {} minutes.",
            crop.name, crop.growth_minutes
        ))
        .await?;
        Ok(())
    }

    /// Harvests every ripe plot into your backpack.
    #[poise::command(slash_command)]
    pub async fn harvest(ctx: Context<'_>) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = author_id(ctx)?;
        let mut rng = StdRng::from_entropy();

        let outcomes = farm::harvest(db, user_id, &ctx.data().game.crops, Utc::now(), &mut rng).await?;

        if outcomes.is_empty() {
            ctx.say("🌾 Nothing is ripe yet.").await?;
            return Ok(());
        }

        let mut description = String::new();
        for outcome in &outcomes {
            writeln!(
                &mut description,
                "Plot {}: {}× {}",
                outcome.slot + 1,
                outcome.quantity,
                outcome.item_name
            )?;
        }
        embeds::send(ctx, embeds::success("🌾 Harvest", description)).await
    }
}

// Re-export all commands
pub use inner::*;
