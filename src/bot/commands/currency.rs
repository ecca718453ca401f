//! Currency exchange command.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, commands::author_id, embeds},
        core::currency::{self, ExchangeDirection},
        errors::Result,
    };
    use poise::serenity_prelude as serenity;
    use std::time::Duration;

    const CONFIRM_TIMEOUT: Duration = Duration::from_secs(30);

    /// Exchange direction parameter.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
    pub enum ExchangeChoice {
        #[name = "Scrap metal → copper"]
        BuyCopper,
        #[name = "Copper → scrap metal"]
        SellCopper,
    }

    impl From<ExchangeChoice> for ExchangeDirection {
        fn from(choice: ExchangeChoice) -> Self {
            match choice {
                ExchangeChoice::BuyCopper => Self::ScrapToCopper,
                ExchangeChoice::SellCopper => Self::CopperToScrap,
            }
        }
    }

    /// Exchanges scrap metal and copper at today's rate.
    #[poise::command(slash_command)]
    pub async fn exchange(
        ctx: Context<'_>,
        #[description = "Which way to exchange"] direction: ExchangeChoice,
        #[description = "Amount of the currency you give"]
        #[min = 1]
        amount: i64,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = author_id(ctx)?;
        let direction = ExchangeDirection::from(direction);

        let rate = currency::roll_rate(&mut rand::thread_rng(), &ctx.data().game.exchange, direction);
        let quote = currency::quote(amount, direction, rate)?;
        let (from, to) = (direction.from_currency(), direction.to_currency());

        let id = ctx.id();
        let confirm_id = format!("{id}_confirm");
        let cancel_id = format!("{id}_cancel");
        let buttons = serenity::CreateActionRow::Buttons(vec![
            serenity::CreateButton::new(&confirm_id)
                .label("Confirm")
                .style(serenity::ButtonStyle::Success),
            serenity::CreateButton::new(&cancel_id)
                .label("Cancel")
                .style(serenity::ButtonStyle::Secondary),
        ]);

        let offer = embeds::info("💱 Exchange offer").description(format!(
            "Give **{}** {} {from} and receive **{}** {} {to}.\nRate: {:.2} scrap metal per copper.",
            quote.amount_in,
            from.emoji(),
            quote.amount_out,
            to.emoji(),
            quote.rate
        ));
        let reply = ctx
            .send(poise::CreateReply::default().embed(offer).components(vec![buttons]))
            .await?;

        let interaction = serenity::ComponentInteractionCollector::new(ctx)
            .author_id(ctx.author().id)
            .channel_id(ctx.channel_id())
            .timeout(CONFIRM_TIMEOUT)
            .filter(move |mci| mci.data.custom_id.starts_with(&id.to_string()))
            .await;

        let outcome = match interaction {
            Some(mci) if mci.data.custom_id == confirm_id => {
                mci.defer(ctx).await?;
                match currency::exchange(db, user_id, &quote).await {
                    Ok((source, target)) => embeds::success(
                        "💱 Exchange complete",
                        format!(
                            "You now have **{source}** {} {from} and **{target}** {} {to}.",
                            from.emoji(),
                            to.emoji()
                        ),
                    ),
                    Err(e) if e.is_user_facing() => embeds::error(e.to_string()),
                    Err(e) => return Err(e),
                }
            }
            Some(mci) => {
                mci.defer(ctx).await?;
                embeds::info("💱 Exchange cancelled")
            }
            None => embeds::info("💱 Exchange offer expired"),
        };

        reply
            .edit(ctx, poise::CreateReply::default().embed(outcome).components(vec![]))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
