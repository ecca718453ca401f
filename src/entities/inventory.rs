//! Inventory entity - `(player, inventory type, item) -> quantity`.
//!
//! Stored rows always have a positive quantity; a row reaching zero is
//! deleted so the row count equals the number of occupied slots.

use super::enums::InventoryType;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Inventory entry database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventories")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning player
    pub player_id: i64,
    /// Backpack, chest or vault
    pub inventory_type: InventoryType,
    /// Catalog item
    pub item_id: i32,
    /// Number of units held
    pub quantity: i64,
}

/// Defines relationships between Inventory and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry belongs to one player
    #[sea_orm(
        belongs_to = "super::player::Entity",
        from = "Column::PlayerId",
        to = "super::player::Column::Id"
    )]
    Player,
    /// Each entry refers to one catalog item
    #[sea_orm(
        belongs_to = "super::item::Entity",
        from = "Column::ItemId",
        to = "super::item::Column::Id"
    )]
    Item,
}

impl Related<super::player::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Player.def()
    }
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
