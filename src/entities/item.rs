//! Item entity - The static item catalog.
//!
//! Rows are seeded from `config.toml` and never modified by gameplay.
//! Prices are in scrap metal; a missing price means the item cannot be
//! bought or sold that way.

use super::enums::{ItemType, Rarity};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    /// Unique identifier for the item
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Display name, unique across the catalog
    #[sea_orm(unique)]
    pub name: String,
    /// Flavour text shown by `/item`
    pub description: String,
    /// Rarity class
    pub rarity: Rarity,
    /// Broad category
    pub item_type: ItemType,
    /// Price to buy one unit from the shop
    pub buy_price: Option<i64>,
    /// Scrap metal received for selling one unit
    pub sell_price: Option<i64>,
    /// Value used when villagers price this item
    pub trade_price: Option<i64>,
    /// Discord emoji reference
    pub emoji: String,
    /// Lower bound of hunger restored when eaten (food only)
    pub min_food_value: Option<i32>,
    /// Upper bound of hunger restored when eaten (food only)
    pub max_food_value: Option<i32>,
}

/// Defines relationships between Item and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One item appears in many inventory entries
    #[sea_orm(has_many = "super::inventory::Entity")]
    Inventory,
}

impl Related<super::inventory::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inventory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Name prefixed with the item's emoji.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.emoji, self.name)
    }
}
