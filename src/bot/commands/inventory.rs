//! Inventory and shop commands.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            Context,
            commands::{InventoryChoice, author_id},
            embeds,
            handlers::autocomplete,
        },
        core::{inventory, item, player},
        entities::{Currency, InventoryType},
        errors::{Error, Result},
    };
    use std::fmt::Write;

    const ITEMS_PER_PAGE: usize = 15;

    /// Shows the contents of your backpack, chest or vault.
    #[poise::command(slash_command)]
    pub async fn inventory(
        ctx: Context<'_>,
        #[description = "Which inventory (defaults to backpack)"] which: Option<InventoryChoice>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = author_id(ctx)?;
        let inventory_type = InventoryType::from(which.unwrap_or(InventoryChoice::Backpack));

        let entries = inventory::get_inventory(db, user_id, inventory_type).await?;
        let capacity = inventory_type
            .slot_limit()
            .map_or_else(|| "∞".to_string(), |limit| limit.to_string());
        let header = format!(
            "🎒 **Your {inventory_type}** ({}/{capacity} slots)",
            entries.len()
        );

        if entries.is_empty() {
            ctx.say(format!("{header}\n\nNothing here yet.")).await?;
            return Ok(());
        }

        let lines: Vec<String> = entries
            .iter()
            .map(|entry| format!("{} × **{}**", entry.item.display_name(), entry.quantity))
            .collect();
        embeds::paginate_lines(ctx, &header, &lines, ITEMS_PER_PAGE).await
    }

    /// Moves items between your backpack, chest and vault.
    #[poise::command(slash_command, rename = "move")]
    pub async fn move_item(
        ctx: Context<'_>,
        #[description = "Item to move"]
        #[autocomplete = "autocomplete::autocomplete_item_name"]
        item: String,
        #[description = "How many"]
        #[min = 1]
        quantity: i64,
        #[description = "Source inventory"] from: InventoryChoice,
        #[description = "Destination inventory"] to: InventoryChoice,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = author_id(ctx)?;
        let catalog_item = item::get_item_by_name(db, &item).await?;
        let (from, to) = (InventoryType::from(from), InventoryType::from(to));

        inventory::move_item(db, user_id, &catalog_item, quantity, from, to).await?;

        ctx.say(format!(
            "📦 Moved {quantity}× {} from your {from} to your {to}.",
            catalog_item.display_name()
        ))
        .await?;
        Ok(())
    }

    /// Sells items from your backpack for scrap metal.
    #[poise::command(slash_command)]
    pub async fn sell(
        ctx: Context<'_>,
        #[description = "Item to sell"]
        #[autocomplete = "autocomplete::autocomplete_backpack_item"]
        item: String,
        #[description = "How many (defaults to 1)"]
        #[min = 1]
        quantity: Option<i64>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = author_id(ctx)?;
        let catalog_item = item::get_item_by_name(db, &item).await?;
        let quantity = quantity.unwrap_or(1);

        let earned = inventory::sell_item(db, user_id, &catalog_item, quantity).await?;

        ctx.say(format!(
            "💰 Sold {quantity}× {} for **{earned}** {} scrap metal.",
            catalog_item.display_name(),
            Currency::ScrapMetal.emoji()
        ))
        .await?;
        Ok(())
    }

    /// Buys items into your backpack with scrap metal.
    #[poise::command(slash_command)]
    pub async fn buy(
        ctx: Context<'_>,
        #[description = "Item to buy"]
        #[autocomplete = "autocomplete::autocomplete_item_name"]
        item: String,
        #[description = "How many (defaults to 1)"]
        #[min = 1]
        quantity: Option<i64>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = author_id(ctx)?;
        let catalog_item = item::get_item_by_name(db, &item).await?;
        let quantity = quantity.unwrap_or(1);

        let cost = inventory::buy_item(db, user_id, &catalog_item, quantity).await?;

        ctx.say(format!(
            "🛒 Bought {quantity}× {} for **{cost}** {} scrap metal.",
            catalog_item.display_name(),
            Currency::ScrapMetal.emoji()
        ))
        .await?;
        Ok(())
    }

    /// Shows what an item is and what it is worth.
    #[poise::command(slash_command)]
    pub async fn item(
        ctx: Context<'_>,
        #[description = "Item to look up"]
        #[autocomplete = "autocomplete::autocomplete_item_name"]
        name: String,
    ) -> Result<()> {
        let catalog_item = item::get_item_by_name(&ctx.data().database, &name).await?;
        let price = |price: Option<i64>| price.map_or_else(|| "-".to_string(), |p| p.to_string());

        let mut description = catalog_item.description.clone();
        if let (Some(min), Some(max)) = (catalog_item.min_food_value, catalog_item.max_food_value) {
            write!(&mut description, "\n\nRestores **{min}-{max}** hunger when eaten.")?;
        }

        let embed = embeds::info(catalog_item.display_name())
            .description(description)
            .field("Type", catalog_item.item_type.to_string(), true)
            .field("Rarity", catalog_item.rarity.to_string(), true)
            .field("Buy", price(catalog_item.buy_price), true)
            .field("Sell", price(catalog_item.sell_price), true)
            .field("Trade value", price(catalog_item.trade_price), true);

        embeds::send(ctx, embed).await
    }

    /// Eats food from your backpack to restore hunger.
    #[poise::command(slash_command)]
    pub async fn eat(
        ctx: Context<'_>,
        #[description = "Food to eat"]
        #[autocomplete = "autocomplete::autocomplete_backpack_food"]
        food: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = author_id(ctx)?;
        let catalog_item = item::get_item_by_name(db, &food).await?;

        let food_value = item::roll_food_value(&mut rand::thread_rng(), &catalog_item).ok_or_else(|| {
            Error::NotTradable {
                name: catalog_item.name.clone(),
                action: "eaten",
            }
        })?;
        let hunger = player::eat(db, user_id, &catalog_item, food_value).await?;

        ctx.say(format!(
            "🍽️ You ate {} and restored {food_value} hunger. Hunger is now **{hunger}/{}**.",
            catalog_item.display_name(),
            player::MAX_VITAL
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
