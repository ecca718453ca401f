//! Active enums shared by several entities.
//!
//! Each enum is stored as a short lowercase string so the schema stays
//! readable from `psql` and portable to `SQLite` for tests.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two in-game currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Currency {
    /// The common currency, earned by selling and scavenging
    #[sea_orm(string_value = "scrap_metal")]
    ScrapMetal,
    /// The scarce currency, only obtainable through exchange and villagers
    #[sea_orm(string_value = "copper")]
    Copper,
}

impl Currency {
    /// Emoji used when rendering amounts of this currency.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::ScrapMetal => "🔩",
            Self::Copper => "🪙",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ScrapMetal => "scrap metal",
            Self::Copper => "copper",
        })
    }
}

/// Where an inventory entry lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum InventoryType {
    /// Carried items, limited to 32 distinct items
    #[sea_orm(string_value = "backpack")]
    Backpack,
    /// Home storage without a slot limit
    #[sea_orm(string_value = "chest")]
    Chest,
    /// Protected storage, limited to 5 distinct items
    #[sea_orm(string_value = "vault")]
    Vault,
}

impl InventoryType {
    /// Maximum number of distinct items, `None` when unbounded.
    #[must_use]
    pub const fn slot_limit(self) -> Option<u64> {
        match self {
            Self::Backpack => Some(32),
            Self::Chest => None,
            Self::Vault => Some(5),
        }
    }
}

impl fmt::Display for InventoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Backpack => "backpack",
            Self::Chest => "chest",
            Self::Vault => "vault",
        })
    }
}

/// Item rarity, also used as the scavenging weight class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[sea_orm(string_value = "common")]
    Common,
    #[sea_orm(string_value = "uncommon")]
    Uncommon,
    #[sea_orm(string_value = "rare")]
    Rare,
    #[sea_orm(string_value = "epic")]
    Epic,
    #[sea_orm(string_value = "legendary")]
    Legendary,
}

impl Rarity {
    /// Relative scavenging weight; rarer items are found less often.
    #[must_use]
    pub const fn weight(self) -> u32 {
        match self {
            Self::Common => 60,
            Self::Uncommon => 25,
            Self::Rare => 10,
            Self::Epic => 4,
            Self::Legendary => 1,
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Common => "Common",
            Self::Uncommon => "Uncommon",
            Self::Rare => "Rare",
            Self::Epic => "Epic",
            Self::Legendary => "Legendary",
        })
    }
}

/// Broad item category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    #[sea_orm(string_value = "material")]
    Material,
    #[sea_orm(string_value = "food")]
    Food,
    #[sea_orm(string_value = "seed")]
    Seed,
    #[sea_orm(string_value = "crop")]
    Crop,
    #[sea_orm(string_value = "tool")]
    Tool,
    #[sea_orm(string_value = "valuable")]
    Valuable,
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Material => "Material",
            Self::Food => "Food",
            Self::Seed => "Seed",
            Self::Crop => "Crop",
            Self::Tool => "Tool",
            Self::Valuable => "Valuable",
        })
    }
}

/// Villager job archetype. Each job has its own trade templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Job {
    #[sea_orm(string_value = "farmer")]
    Farmer,
    #[sea_orm(string_value = "blacksmith")]
    Blacksmith,
    #[sea_orm(string_value = "butcher")]
    Butcher,
    #[sea_orm(string_value = "fisherman")]
    Fisherman,
    #[sea_orm(string_value = "librarian")]
    Librarian,
    #[sea_orm(string_value = "scavenger")]
    Scavenger,
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Farmer => "Farmer",
            Self::Blacksmith => "Blacksmith",
            Self::Butcher => "Butcher",
            Self::Fisherman => "Fisherman",
            Self::Librarian => "Librarian",
            Self::Scavenger => "Scavenger",
        })
    }
}

/// Which side of a villager offer a trade row sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum TradeSide {
    /// What the villager wants from the player
    #[sea_orm(string_value = "demand")]
    Demand,
    /// What the villager gives to the player
    #[sea_orm(string_value = "supply")]
    Supply,
}
