//! Disabled command entity - Commands switched off by an administrator.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Disabled command database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "disabled_commands")]
pub struct Model {
    /// Qualified command name, e.g. `"farm harvest"`
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    /// Optional explanation shown to players
    pub reason: Option<String>,
    /// When the command was disabled
    pub disabled_at: DateTimeUtc,
}

/// `DisabledCommand` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
