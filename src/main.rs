use boss::{
    bot::{self, BotData},
    config::{self, Settings, database},
    core::{item, player},
    errors::{Error, Result},
    services,
};
use dotenvy::dotenv;
use std::{env, sync::Arc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    if dotenv().is_err() {
        info!("No .env file loaded, using the process environment");
    }

    // 3. Load game content
    let config_path = config::env::config_path();
    let game = config::game::load_config(&config_path)
        .inspect(|game| {
            info!(
                path = %config_path,
                items = game.items.len(),
                crops = game.crops.len(),
                "Game configuration loaded"
            );
        })
        .inspect_err(|e| error!("Failed to load {config_path}: {e}"))?;
    let settings = Settings::from_env();
    if settings.log_channel.is_none() {
        warn!("LOG_CHANNEL_ID not set, unexpected errors will only be logged locally");
    }

    // 4. Connect and prepare the database
    let db = database::create_connection(&database::get_database_url())
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    database::create_tables(&db).await?;

    let seeded = item::seed_items(&db, &game.items).await?;
    info!(seeded, "Item catalog seeded");

    let cleared = player::clear_running_flags(&db).await?;
    if cleared > 0 {
        warn!(cleared, "Cleared command flags left by the previous run");
    }

    // 5. Run the bot
    // DISCORD_BOT_TOKEN is loaded here, directly before use
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {e}"))
        .map_err(Error::EnvVar)?;

    let data = BotData::new(db, services::http_client()?, Arc::new(game), settings);
    bot::run_bot(token, data).await
}
