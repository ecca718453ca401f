//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod disabled_command;
pub mod enums;
pub mod farm_plot;
pub mod inventory;
pub mod item;
pub mod player;
pub mod system_state;
pub mod trade;
pub mod villager;

// Re-export specific types to avoid conflicts
pub use disabled_command::{Entity as DisabledCommand, Model as DisabledCommandModel};
pub use enums::{Currency, InventoryType, ItemType, Job, Rarity, TradeSide};
pub use farm_plot::{Entity as FarmPlot, Model as FarmPlotModel};
pub use inventory::{Entity as Inventory, Model as InventoryModel};
pub use item::{Entity as Item, Model as ItemModel};
pub use player::{Entity as Player, Model as PlayerModel};
pub use system_state::{Entity as SystemState, Model as SystemStateModel};
pub use trade::{Entity as Trade, Model as TradeModel};
pub use villager::{Entity as Villager, Model as VillagerModel};
