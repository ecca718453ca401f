//! Bot layer - Discord-specific interface and command handlers
//!
//! This module wires the game logic into Poise: shared data, the slash
//! command list, the hooks that run around every command and the periodic
//! tasks started once the bot is ready.

/// Discord command implementations grouped by game area
pub mod commands;
/// Embed builders and pagination helpers
pub mod embeds;
/// Discord interaction handlers (autocomplete, hooks, errors)
pub mod handlers;
/// Background loops started after login
pub mod tasks;

use crate::{
    config::{GameConfig, Settings},
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{info, instrument};

/// Shared data available to all bot commands.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// HTTP client shared by the external services
    pub http: reqwest::Client,
    /// Game content and tunables
    pub game: Arc<GameConfig>,
    /// Runtime settings from the environment
    pub settings: Settings,
}

impl BotData {
    /// Creates a new `BotData` instance.
    #[must_use]
    pub const fn new(
        database: DatabaseConnection,
        http: reqwest::Client,
        game: Arc<GameConfig>,
        settings: Settings,
    ) -> Self {
        Self {
            database,
            http,
            game,
            settings,
        }
    }
}

/// Poise context used by every command.
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// Every registered slash command.
#[must_use]
pub fn all_commands() -> Vec<poise::Command<BotData, Error>> {
    vec![
        commands::ping(),
        commands::help(),
        commands::start(),
        commands::profile(),
        commands::balance(),
        commands::leaderboard(),
        commands::inventory(),
        commands::move_item(),
        commands::sell(),
        commands::buy(),
        commands::item(),
        commands::eat(),
        commands::exchange(),
        commands::farm(),
        commands::villagers(),
        commands::trade(),
        commands::scavenge(),
        commands::maze(),
        commands::trivia(),
        commands::weather(),
        commands::video(),
        commands::mtr(),
        commands::admin(),
    ]
}

/// Builds the framework and runs the gateway client until it stops.
#[instrument(skip_all)]
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: all_commands(),
            command_check: Some(|ctx| Box::pin(handlers::hooks::command_check(ctx))),
            post_command: |ctx| Box::pin(handlers::hooks::post_command(ctx)),
            on_error: |error| Box::pin(handlers::error::on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Registered {} commands globally", framework.options().commands.len());

                tasks::spawn_all(&data, Arc::clone(&ctx.http));
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await?;

    info!("Starting bot client...");
    client.start().await?;
    Ok(())
}
