//! Background loops started once the bot is ready.
//!
//! Each loop ticks on a `tokio::time::interval`, checks in `system_state`
//! whether its work is due and logs (never propagates) failures so one bad
//! tick does not stop the loop.

use crate::{
    bot::{BotData, commands::forecast_embed},
    config::{
        database::retry_once,
        game::{VillagerConfig, WeatherConfig},
    },
    core::{system_state, villager},
    errors::Result,
    services::{
        names::{self, HttpNameSource},
        weather,
    },
};
use chrono::{DateTime, Timelike, Utc};
use poise::serenity_prelude as serenity;
use rand::{SeedableRng, rngs::StdRng};
use sea_orm::DatabaseConnection;
use std::{sync::Arc, time::Duration};
use tracing::{debug, error, info};

/// A named unit of periodic work.
#[async_trait::async_trait]
pub trait Looper {
    /// Name used in logs
    const NAME: &'static str;

    /// Time between ticks.
    fn period(&self) -> Duration;

    /// One tick of work.
    async fn loop_func(&self) -> Result<()>;

    /// Runs `loop_func` forever, logging failures.
    async fn start(self: Arc<Self>)
    where
        Self: Sync + Send,
    {
        let mut interval = tokio::time::interval(self.period());
        loop {
            interval.tick().await;
            if let Err(err) = self.loop_func().await {
                error!("{} error: {err:?}", Self::NAME);
            }
        }
    }
}

/// Fetches names, plans villagers and replaces the current ones.
pub async fn refresh_villagers(
    db: &DatabaseConnection,
    http: &reqwest::Client,
    config: &VillagerConfig,
) -> Result<usize> {
    let source = HttpNameSource::new(http.clone(), config.name_api_url.clone());
    let names = names::names_or_fallback(&source, config.count).await;
    let plans = villager::plan_villagers(&mut StdRng::from_entropy(), &names, config);
    retry_once("villager refresh", || villager::replace_villagers(db, &plans)).await
}

/// Whether a refresh recorded at `last` is due again at `now`.
#[must_use]
pub fn refresh_due(last: Option<&str>, now: DateTime<Utc>, every: Duration) -> bool {
    let Some(last) = last.and_then(|raw| DateTime::parse_from_rfc3339(raw).ok()) else {
        return true;
    };
    let every = chrono::Duration::from_std(every).unwrap_or(chrono::Duration::MAX);
    now.signed_duration_since(last.with_timezone(&Utc)) >= every
}

/// Whether the daily announcement should go out at `now`.
#[must_use]
pub fn announcement_due(last_date: Option<&str>, now: DateTime<Utc>, announce_hour: u32) -> bool {
    let today = now.format("%Y-%m-%d").to_string();
    now.hour() >= announce_hour && last_date != Some(today.as_str())
}

/// Replaces the villagers once the configured refresh period has passed.
pub struct VillagerRefresher {
    database: DatabaseConnection,
    http: reqwest::Client,
    config: VillagerConfig,
}

#[async_trait::async_trait]
impl Looper for VillagerRefresher {
    const NAME: &'static str = "Villager refresher";

    fn period(&self) -> Duration {
        Duration::from_secs(60)
    }

    async fn loop_func(&self) -> Result<()> {
        let last = retry_once("read last villager refresh", || {
            system_state::get_value(&self.database, system_state::LAST_VILLAGER_REFRESH_KEY)
        })
        .await?;

        let every = Duration::from_secs(self.config.refresh_minutes.saturating_mul(60));
        if !refresh_due(last.as_deref(), Utc::now(), every) {
            debug!("Villager refresh not due yet");
            return Ok(());
        }

        let stored = refresh_villagers(&self.database, &self.http, &self.config).await?;
        info!(stored, "Villagers refreshed");
        Ok(())
    }
}

/// Posts the weather bulletin once a day after the configured hour.
pub struct WeatherAnnouncer {
    database: DatabaseConnection,
    http: reqwest::Client,
    discord: Arc<serenity::Http>,
    channel: serenity::ChannelId,
    config: WeatherConfig,
}

#[async_trait::async_trait]
impl Looper for WeatherAnnouncer {
    const NAME: &'static str = "Weather announcer";

    fn period(&self) -> Duration {
        Duration::from_secs(300)
    }

    async fn loop_func(&self) -> Result<()> {
        let now = Utc::now();
        let last = retry_once("read last weather announcement", || {
            system_state::get_value(&self.database, system_state::LAST_WEATHER_ANNOUNCEMENT_KEY)
        })
        .await?;

        if !announcement_due(last.as_deref(), now, self.config.announce_hour) {
            return Ok(());
        }

        let forecast = weather::fetch_forecast(&self.http, &self.config.feed_url).await?;
        self.channel
            .send_message(
                &self.discord,
                serenity::CreateMessage::new().embed(forecast_embed(&forecast)),
            )
            .await?;

        let today = now.format("%Y-%m-%d").to_string();
        retry_once("record weather announcement", || {
            system_state::set_value(&self.database, system_state::LAST_WEATHER_ANNOUNCEMENT_KEY, &today)
        })
        .await?;
        info!(channel = %self.channel, "Weather bulletin announced");
        Ok(())
    }
}

/// Spawns every background loop.
pub fn spawn_all(data: &BotData, discord: Arc<serenity::Http>) {
    let refresher = Arc::new(VillagerRefresher {
        database: data.database.clone(),
        http: data.http.clone(),
        config: data.game.villagers.clone(),
    });
    tokio::spawn(refresher.start());

    if let Some(channel) = data.settings.announce_channel {
        let announcer = Arc::new(WeatherAnnouncer {
            database: data.database.clone(),
            http: data.http.clone(),
            discord,
            channel,
            config: data.game.weather.clone(),
        });
        tokio::spawn(announcer.start());
    } else {
        info!("ANNOUNCE_CHANNEL_ID not set, weather announcements disabled");
    }
}
