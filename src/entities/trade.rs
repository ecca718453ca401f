//! Trade entity - One good on one side of a villager's offer.
//!
//! A row is either an item+quantity pair (`item_id` set) or a
//! currency+amount pair (`currency` set); `core::villager::TradeGood`
//! is the typed view of a row.

use super::enums::{Currency, TradeSide};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Trade database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trades")]
pub struct Model {
    /// Unique identifier for the trade row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Villager offering this trade
    pub villager_id: i64,
    /// Demand (player gives) or supply (player receives)
    pub side: TradeSide,
    /// Catalog item, for item goods
    pub item_id: Option<i32>,
    /// Currency, for currency goods
    pub currency: Option<Currency>,
    /// Units of the item or amount of the currency
    pub quantity: i64,
}

/// Defines relationships between Trade and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each trade row belongs to one villager
    #[sea_orm(
        belongs_to = "super::villager::Entity",
        from = "Column::VillagerId",
        to = "super::villager::Column::Id"
    )]
    Villager,
}

impl Related<super::villager::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Villager.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
