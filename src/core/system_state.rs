//! Key/value bookkeeping for background work.
//!
//! The periodic tasks record here when they last ran so a restart does not
//! repeat a daily announcement or skip a due refresh.

use crate::{
    entities::{SystemState, system_state},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{Set, prelude::*};

/// Key of the timestamp (RFC 3339) of the last villager refresh.
pub const LAST_VILLAGER_REFRESH_KEY: &str = "last_villager_refresh";
/// Key of the date (`YYYY-MM-DD`) of the last weather announcement.
pub const LAST_WEATHER_ANNOUNCEMENT_KEY: &str = "last_weather_announcement";

/// Retrieves the value stored under `key`, if any.
pub async fn get_value<C>(db: &C, key: &str) -> Result<Option<String>>
where
    C: ConnectionTrait,
{
    let state = SystemState::find()
        .filter(system_state::Column::Key.eq(key))
        .one(db)
        .await?;
    Ok(state.map(|s| s.value))
}

/// Stores `value` under `key`, replacing any previous value.
pub async fn set_value<C>(db: &C, key: &str, value: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    let now = Utc::now();

    let existing = SystemState::find()
        .filter(system_state::Column::Key.eq(key))
        .one(db)
        .await?;

    if let Some(state) = existing {
        let mut active_model: system_state::ActiveModel = state.into();
        active_model.value = Set(value.to_string());
        active_model.updated_at = Set(now);
        active_model.update(db).await?;
    } else {
        let new_state = system_state::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            updated_at: Set(now),
            ..Default::default()
        };
        new_state.insert(db).await?;
    }

    Ok(())
}
