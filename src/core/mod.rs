//! Core game logic, independent of Discord.
//!
//! Functions take any `SeaORM` connection (or transaction) so commands, the
//! periodic tasks and tests share the same code paths.

pub mod currency;
pub mod farm;
pub mod guard;
pub mod inventory;
pub mod item;
pub mod maze;
pub mod player;
pub mod scavenge;
pub mod system_state;
pub mod villager;
