//! Utility commands backed by public web APIs.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, embeds, handlers::autocomplete},
        errors::{Error, Result},
        services::{
            transit::{self, Arrival},
            video, weather,
        },
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Builds the bulletin embed shared by `/weather` and the daily announcement.
    #[must_use]
    pub fn forecast_embed(forecast: &weather::Forecast) -> serenity::CreateEmbed {
        let mut embed = embeds::info("🌤️ Local weather forecast");
        for (title, text) in forecast.sections() {
            embed = embed.field(title, embeds::truncate(text, 1024), false);
        }
        if !forecast.forecast_period.is_empty() {
            embed = embed.description(forecast.forecast_period.clone());
        }
        embed.footer(serenity::CreateEmbedFooter::new(format!(
            "Updated {}",
            forecast.update_time
        )))
    }

    /// Shows the latest local weather bulletin.
    #[poise::command(slash_command)]
    pub async fn weather(ctx: Context<'_>) -> Result<()> {
        ctx.defer().await?;
        let forecast =
            weather::fetch_forecast(&ctx.data().http, &ctx.data().game.weather.feed_url).await?;
        embeds::send(ctx, forecast_embed(&forecast)).await
    }

    /// Searches for videos.
    #[poise::command(slash_command)]
    pub async fn video(
        ctx: Context<'_>,
        #[description = "What to search for"] query: String,
    ) -> Result<()> {
        let Some(api_key) = ctx.data().settings.youtube_api_key.as_deref() else {
            return Err(Error::ExternalService {
                service: "Video search",
                message: "no API key is configured".to_string(),
            });
        };

        ctx.defer().await?;
        let videos = video::search_videos(&ctx.data().http, api_key, &query).await?;

        let mut description = String::new();
        for (index, found) in videos.iter().enumerate() {
            writeln!(
                &mut description,
                "**{}.** [{}]({}) · {}",
                index + 1,
                found.title,
                found.url,
                found.channel
            )?;
        }
        embeds::send(
            ctx,
            embeds::info(format!("🎬 Results for \"{query}\"")).description(description),
        )
        .await
    }

    fn describe_arrivals(arrivals: &[Arrival]) -> String {
        if arrivals.is_empty() {
            return "No trains scheduled".to_string();
        }
        arrivals
            .iter()
            .map(|arrival| {
                let eta = arrival
                    .minutes
                    .map_or_else(|| "arriving".to_string(), |m| format!("{m} min"));
                format!(
                    "to **{}** · platform {} · {eta}",
                    arrival.destination, arrival.platform
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Shows the next MTR trains at a station.
    #[poise::command(slash_command)]
    pub async fn mtr(
        ctx: Context<'_>,
        #[description = "Line"]
        #[autocomplete = "autocomplete::autocomplete_mtr_line"]
        line: String,
        #[description = "Station code, e.g. TKO"] station: String,
    ) -> Result<()> {
        ctx.defer().await?;
        let schedule = transit::fetch_schedule(&ctx.data().http, &line, &station).await?;

        let title = format!(
            "🚇 {} · {}",
            transit::line_name(&schedule.line).unwrap_or(schedule.line.as_str()),
            schedule.station
        );
        let mut embed = embeds::info(title)
            .field("Up", describe_arrivals(&schedule.up), false)
            .field("Down", describe_arrivals(&schedule.down), false);
        if schedule.delayed {
            embed = embed.description("⚠️ The operator reports delays on this line.");
        }
        embeds::send(ctx, embed).await
    }
}

// Re-export all commands
pub use inner::*;
