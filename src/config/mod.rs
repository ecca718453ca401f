/// Database connection and table management
pub mod database;

/// Runtime settings from environment variables
pub mod env;

/// Game content loading from config.toml
pub mod game;

pub use env::Settings;
pub use game::GameConfig;
