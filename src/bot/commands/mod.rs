//! Discord command implementations organized by game area.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Administrator commands
pub mod admin;
/// Currency exchange
pub mod currency;
/// Farm commands
pub mod farm;
/// Scavenging, maze and trivia
pub mod games;
/// General utility commands
pub mod general;
/// Inventory and shop commands
pub mod inventory;
/// Profile, balance and leaderboard
pub mod profile;
/// Weather, video search and train times
pub mod utility;
/// Villager trading
pub mod villager;

use crate::{
    bot::Context,
    entities::{Currency, InventoryType},
    errors::Result,
};

/// Currency parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum CurrencyChoice {
    #[name = "Scrap metal"]
    ScrapMetal,
    #[name = "Copper"]
    Copper,
}

impl From<CurrencyChoice> for Currency {
    fn from(choice: CurrencyChoice) -> Self {
        match choice {
            CurrencyChoice::ScrapMetal => Self::ScrapMetal,
            CurrencyChoice::Copper => Self::Copper,
        }
    }
}

/// Inventory parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum InventoryChoice {
    #[name = "Backpack"]
    Backpack,
    #[name = "Chest"]
    Chest,
    #[name = "Vault"]
    Vault,
}

impl From<InventoryChoice> for InventoryType {
    fn from(choice: InventoryChoice) -> Self {
        match choice {
            InventoryChoice::Backpack => Self::Backpack,
            InventoryChoice::Chest => Self::Chest,
            InventoryChoice::Vault => Self::Vault,
        }
    }
}

/// The invoking user's id as stored in the database.
pub(crate) fn author_id(ctx: Context<'_>) -> Result<i64> {
    Ok(i64::try_from(ctx.author().id.get())?)
}

// Export commands
pub use admin::*;
pub use currency::*;
pub use farm::*;
pub use games::*;
pub use general::*;
pub use inventory::*;
pub use profile::*;
pub use utility::*;
pub use villager::*;
