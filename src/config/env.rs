//! Runtime settings read from environment variables.
//!
//! Everything here is optional except the bot token, which `main` reads
//! directly before use so it never sits in a long-lived struct.

use poise::serenity_prelude::ChannelId;

/// Settings read once at startup.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Channel receiving unexpected errors
    pub log_channel: Option<ChannelId>,
    /// Channel receiving the daily weather bulletin
    pub announce_channel: Option<ChannelId>,
    /// Hides debug output from users when true
    pub production: bool,
    /// Key for the video search API
    pub youtube_api_key: Option<String>,
}

impl Settings {
    /// Reads `LOG_CHANNEL_ID`, `ANNOUNCE_CHANNEL_ID`, `BOSS_ENV` and `YOUTUBE_API_KEY`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let channel = |key: &str| {
            lookup(key)
                .and_then(|raw| raw.trim().parse::<u64>().ok())
                .filter(|id| *id != 0)
                .map(ChannelId::new)
        };

        Self {
            log_channel: channel("LOG_CHANNEL_ID"),
            announce_channel: channel("ANNOUNCE_CHANNEL_ID"),
            production: lookup("BOSS_ENV").is_some_and(|env| env.eq_ignore_ascii_case("production")),
            youtube_api_key: lookup("YOUTUBE_API_KEY").filter(|key| !key.is_empty()),
        }
    }
}

/// Path of the game configuration file, `BOSS_CONFIG` or `config.toml`.
#[must_use]
pub fn config_path() -> String {
    std::env::var("BOSS_CONFIG").unwrap_or_else(|_| "config.toml".to_string())
}
