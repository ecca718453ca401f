//! Local weather forecast bulletin (Hong Kong Observatory open data).

use crate::errors::{Error, Result};
use serde::Deserialize;

/// The `flw` (local weather forecast) feed.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    /// Synoptic overview
    #[serde(default)]
    pub general_situation: String,
    /// Tropical cyclone information, empty when none
    #[serde(default)]
    pub tc_info: String,
    /// Fire danger warning, empty when none
    #[serde(default)]
    pub fire_danger_warning: String,
    /// Period the forecast covers
    #[serde(default)]
    pub forecast_period: String,
    /// The forecast itself
    #[serde(default)]
    pub forecast_desc: String,
    /// Outlook for the following days
    #[serde(default)]
    pub outlook: String,
    /// Bulletin issue time (ISO 8601)
    #[serde(default)]
    pub update_time: String,
}

impl Forecast {
    /// Whether the bulletin carries any forecast at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forecast_desc.trim().is_empty() && self.general_situation.trim().is_empty()
    }

    /// Sections worth showing, as `(title, text)` pairs.
    #[must_use]
    pub fn sections(&self) -> Vec<(&'static str, &str)> {
        [
            ("General situation", self.general_situation.as_str()),
            ("Tropical cyclone", self.tc_info.as_str()),
            ("Fire danger", self.fire_danger_warning.as_str()),
            ("Forecast", self.forecast_desc.as_str()),
            ("Outlook", self.outlook.as_str()),
        ]
        .into_iter()
        .filter(|(_, text)| !text.trim().is_empty())
        .collect()
    }
}

/// Fetches the current bulletin from `feed_url`.
pub async fn fetch_forecast(client: &reqwest::Client, feed_url: &str) -> Result<Forecast> {
    let forecast: Forecast =
        super::get_json(client, "Weather service", feed_url, &[] as &[(&str, &str)]).await?;
    if forecast.is_empty() {
        return Err(Error::ExternalService {
            service: "Weather service",
            message: "the bulletin is empty".to_string(),
        });
    }
    Ok(forecast)
}
