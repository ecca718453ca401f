//! Player entity - One row per Discord user who has started playing.
//!
//! Balances are kept non-negative by the conditional updates in
//! `core::player::modify_currency`; health and hunger stay within 0..=100.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Player database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "players")]
pub struct Model {
    /// Discord user id
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    /// Scrap metal balance
    pub scrap_metal: i64,
    /// Copper balance
    pub copper: i64,
    /// Accumulated experience points
    pub experience: i64,
    /// Health, 0..=100
    pub health: i32,
    /// Hunger (satiation), 0..=100; 0 means starving
    pub hunger: i32,
    /// Advisory flag set while one of the player's commands is running
    pub is_running_command: bool,
    /// When the player registered
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Player and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One player has many inventory entries
    #[sea_orm(has_many = "super::inventory::Entity")]
    Inventory,
    /// One player has many farm plots
    #[sea_orm(has_many = "super::farm_plot::Entity")]
    FarmPlots,
}

impl Related<super::inventory::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inventory.def()
    }
}

impl Related<super::farm_plot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FarmPlots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
