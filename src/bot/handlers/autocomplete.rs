//! Autocomplete handlers for Discord slash command parameters.
//!
//! Discord shows at most 25 suggestions; every handler caps its list there
//! and swallows database errors, since a failed suggestion list is harmless.

use crate::{
    bot::Context,
    core::{inventory, item, villager},
    entities::{InventoryType, ItemType},
    services::transit,
};
use poise::serenity_prelude as serenity;

const MAX_CHOICES: usize = 25;

fn author_id(ctx: Context<'_>) -> Option<i64> {
    i64::try_from(ctx.author().id.get()).ok()
}

/// Suggests catalog item names containing the partial input.
pub async fn autocomplete_item_name(ctx: Context<'_>, partial: &str) -> Vec<String> {
    let db = &ctx.data().database;
    let Ok(items) = item::search_items(db, partial, MAX_CHOICES as u64).await else {
        return Vec::new();
    };
    items.into_iter().map(|item| item.name).collect()
}

async fn backpack_names(ctx: Context<'_>, partial: &str, only: Option<ItemType>) -> Vec<String> {
    let Some(user_id) = author_id(ctx) else {
        return Vec::new();
    };
    let db = &ctx.data().database;
    let Ok(entries) = inventory::get_inventory(db, user_id, InventoryType::Backpack).await else {
        return Vec::new();
    };

    let partial_lower = partial.to_lowercase();
    entries
        .into_iter()
        .filter(|entry| only.is_none_or(|item_type| entry.item.item_type == item_type))
        .filter(|entry| entry.item.name.to_lowercase().contains(&partial_lower))
        .map(|entry| entry.item.name)
        .take(MAX_CHOICES)
        .collect()
}

/// Suggests items in the author's backpack.
pub async fn autocomplete_backpack_item(ctx: Context<'_>, partial: &str) -> Vec<String> {
    backpack_names(ctx, partial, None).await
}

/// Suggests food in the author's backpack.
pub async fn autocomplete_backpack_food(ctx: Context<'_>, partial: &str) -> Vec<String> {
    backpack_names(ctx, partial, Some(ItemType::Food)).await
}

/// Suggests configured crop names.
pub async fn autocomplete_crop(ctx: Context<'_>, partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    ctx.data()
        .game
        .crops
        .iter()
        .filter(|crop| crop.name.to_lowercase().contains(&partial_lower))
        .map(|crop| crop.name.clone())
        .take(MAX_CHOICES)
        .collect()
}

/// Suggests current villagers, labelled with name and job, valued by id.
pub async fn autocomplete_villager(ctx: Context<'_>, partial: &str) -> Vec<serenity::AutocompleteChoice> {
    let db = &ctx.data().database;
    let Ok(offers) = villager::list_villagers(db).await else {
        return Vec::new();
    };

    let partial_lower = partial.to_lowercase();
    offers
        .into_iter()
        .map(|offer| offer.villager)
        .filter(|v| {
            v.name.to_lowercase().contains(&partial_lower) || v.id.to_string().starts_with(partial)
        })
        .take(MAX_CHOICES)
        .map(|v| {
            serenity::AutocompleteChoice::new(
                format!("#{} {} the {} ({} trades left)", v.id, v.name, v.job, v.remaining_trades),
                v.id,
            )
        })
        .collect()
}

/// Suggests MTR lines by code or name.
pub async fn autocomplete_mtr_line(_ctx: Context<'_>, partial: &str) -> Vec<serenity::AutocompleteChoice> {
    let partial_lower = partial.to_lowercase();
    transit::LINES
        .iter()
        .filter(|(code, name)| {
            code.to_lowercase().contains(&partial_lower) || name.to_lowercase().contains(&partial_lower)
        })
        .map(|(code, name)| serenity::AutocompleteChoice::new(format!("{code} - {name}"), *code))
        .collect()
}

/// Suggests qualified command names, subcommands included.
pub async fn autocomplete_command_name(ctx: Context<'_>, partial: &str) -> Vec<String> {
    fn collect(commands: &[poise::Command<crate::bot::BotData, crate::errors::Error>], out: &mut Vec<String>) {
        for command in commands {
            out.push(command.qualified_name.clone());
            collect(&command.subcommands, out);
        }
    }

    let mut names = Vec::new();
    collect(&ctx.framework().options().commands, &mut names);

    let partial_lower = partial.to_lowercase();
    names.retain(|name| name.contains(&partial_lower));
    names.sort();
    names.truncate(MAX_CHOICES);
    names
}
