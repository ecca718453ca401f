//! Villager commands - browse offers and trade.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, commands::author_id, embeds, handlers::autocomplete},
        core::villager::{self, TradeGood, VillagerOffer},
        errors::Result,
    };

    const VILLAGERS_PER_PAGE: usize = 5;

    fn describe_goods(goods: &[TradeGood]) -> String {
        goods
            .iter()
            .map(TradeGood::describe)
            .collect::<Vec<_>>()
            .join(" + ")
    }

    fn describe_offer(offer: &VillagerOffer) -> String {
        format!(
            "**#{} {}** the {} ({} trades left)\n  gives {} for {}",
            offer.villager.id,
            offer.villager.name,
            offer.villager.job,
            offer.villager.remaining_trades,
            describe_goods(&offer.supplies),
            describe_goods(&offer.demands)
        )
    }

    /// Lists the villagers in town and what they trade.
    #[poise::command(slash_command)]
    pub async fn villagers(ctx: Context<'_>) -> Result<()> {
        let offers = villager::list_villagers(&ctx.data().database).await?;
        if offers.is_empty() {
            ctx.say("🏚️ The town is empty. Villagers arrive with the next refresh.")
                .await?;
            return Ok(());
        }

        let lines: Vec<String> = offers.iter().map(describe_offer).collect();
        embeds::paginate_lines(ctx, "🏘️ **Villagers in town**", &lines, VILLAGERS_PER_PAGE).await
    }

    /// Trades with a villager.
    #[poise::command(slash_command)]
    pub async fn trade(
        ctx: Context<'_>,
        #[description = "Villager to trade with"]
        #[autocomplete = "autocomplete::autocomplete_villager"]
        villager: i64,
        #[description = "How many times (defaults to 1)"]
        #[min = 1]
        times: Option<i32>,
    ) -> Result<()> {
        let times = times.unwrap_or(1);
        let offer =
            villager::trade_with_villager(&ctx.data().database, author_id(ctx)?, villager, times).await?;

        embeds::send(
            ctx,
            embeds::success(
                "🤝 Trade complete",
                format!(
                    "{} took {} and gave you {} ({times}×).",
                    offer.villager.name,
                    describe_goods(&offer.demands),
                    describe_goods(&offer.supplies)
                ),
            ),
        )
        .await
    }
}

// Re-export all commands
pub use inner::*;
