//! Villager entity - Ephemeral NPC traders, regenerated every hour.

use super::enums::Job;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Villager database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "villagers")]
pub struct Model {
    /// Unique identifier, referenced by `/trade`
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Generated display name
    pub name: String,
    /// Job archetype that picked the trade template
    pub job: Job,
    /// How many more times this villager will trade before the next refresh
    pub remaining_trades: i32,
    /// When this villager was generated
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Villager and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One villager has many trade rows
    #[sea_orm(has_many = "super::trade::Entity")]
    Trades,
}

impl Related<super::trade::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trades.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
