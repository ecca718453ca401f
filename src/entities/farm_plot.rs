//! Farm plot entity - One slot of a player's fixed-length farm.
//!
//! An empty plot has both `crop` and `planted_at` unset.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Farm plot database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "farm_plots")]
pub struct Model {
    /// Unique identifier for the plot row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning player
    pub player_id: i64,
    /// Position in the farm, starting at 0
    pub slot: i32,
    /// Crop type name from `config.toml`
    pub crop: Option<String>,
    /// When the crop was planted
    pub planted_at: Option<DateTimeUtc>,
}

/// Defines relationships between `FarmPlot` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each plot belongs to one player
    #[sea_orm(
        belongs_to = "super::player::Entity",
        from = "Column::PlayerId",
        to = "super::player::Column::Id"
    )]
    Player,
}

impl Related<super::player::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Player.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
