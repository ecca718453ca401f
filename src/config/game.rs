//! Game content configuration loaded from `config.toml`
//!
//! The item catalog, crop types and the tunables of the economy live in a
//! TOML file so they can change without a rebuild. The catalog is seeded into
//! the database on startup; everything else is read straight from memory.

use crate::entities::{ItemType, Rarity};
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone, Default)]
pub struct GameConfig {
    /// Currency exchange tunables
    #[serde(default)]
    pub exchange: ExchangeConfig,
    /// Farm layout
    #[serde(default)]
    pub farm: FarmConfig,
    /// Villager generation
    #[serde(default)]
    pub villagers: VillagerConfig,
    /// Weather bulletin feed and announcement time
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Scavenging tunables
    #[serde(default)]
    pub scavenge: ScavengeConfig,
    /// Item catalog seed
    #[serde(default)]
    pub items: Vec<ItemConfig>,
    /// Plantable crop types
    #[serde(default)]
    pub crops: Vec<CropConfig>,
}

/// Exchange rate between scrap metal and copper.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Base price of one copper in scrap metal
    pub scrap_per_copper: i64,
    /// Maximum markup applied when buying copper with scrap metal
    pub buy_spread: f64,
    /// Maximum discount applied when selling copper for scrap metal
    pub sell_spread: f64,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            scrap_per_copper: 10,
            buy_spread: 0.25,
            sell_spread: 0.10,
        }
    }
}

/// Farm layout.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct FarmConfig {
    /// Number of plots every player owns
    pub plot_count: i32,
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self { plot_count: 8 }
    }
}

/// Villager generation settings.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct VillagerConfig {
    /// Villagers generated per refresh
    pub count: usize,
    /// Minimum trades each villager offers before the next refresh
    pub min_trades: i32,
    /// Maximum trades each villager offers before the next refresh
    pub max_trades: i32,
    /// Random name API returning a JSON array of strings, `{count}` is replaced
    pub name_api_url: String,
    /// Minutes between refreshes
    pub refresh_minutes: u64,
}

impl Default for VillagerConfig {
    fn default() -> Self {
        Self {
            count: 8,
            min_trades: 3,
            max_trades: 10,
            name_api_url: "https://names.drycodes.com/{count}?nameOptions=boy_names,girl_names&separator=space&format=json".to_string(),
            refresh_minutes: 60,
        }
    }
}

/// Weather bulletin settings.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WeatherConfig {
    /// Local forecast feed
    pub feed_url: String,
    /// Hour of day (UTC) of the daily announcement
    pub announce_hour: u32,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            feed_url: "https://data.weather.gov.hk/weatherAPI/opendata/weather.php?dataType=flw&lang=en".to_string(),
            announce_hour: 0,
        }
    }
}

/// Scavenging tunables.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct ScavengeConfig {
    /// Loot rolls per scavenge
    pub rolls: usize,
    /// Hunger consumed per scavenge
    pub hunger_cost: i32,
    /// Experience gained per scavenge
    pub experience: i64,
}

impl Default for ScavengeConfig {
    fn default() -> Self {
        Self {
            rolls: 3,
            hunger_cost: 10,
            experience: 5,
        }
    }
}

/// Configuration for a single catalog item
#[derive(Debug, Deserialize, Clone)]
pub struct ItemConfig {
    /// Unique item name
    pub name: String,
    /// Flavour text
    #[serde(default)]
    pub description: String,
    /// Rarity class
    pub rarity: Rarity,
    /// Broad category
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Shop price in scrap metal
    pub buy_price: Option<i64>,
    /// Scrap metal received per unit sold
    pub sell_price: Option<i64>,
    /// Villager valuation
    pub trade_price: Option<i64>,
    /// Discord emoji reference
    #[serde(default = "default_emoji")]
    pub emoji: String,
    /// Lower bound of hunger restored (food only)
    pub min_food_value: Option<i32>,
    /// Upper bound of hunger restored (food only)
    pub max_food_value: Option<i32>,
}

fn default_emoji() -> String {
    "📦".to_string()
}

/// A plantable crop.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CropConfig {
    /// Crop type name, stored on the plot
    pub name: String,
    /// Item consumed when planting
    pub seed_item: String,
    /// Item produced when harvesting
    pub harvest_item: String,
    /// Minutes from planting until ripe
    pub growth_minutes: i64,
    /// Fewest units produced per plot
    pub min_yield: i64,
    /// Most units produced per plot
    pub max_yield: i64,
}

impl GameConfig {
    /// Looks up a crop type by name, ignoring case.
    #[must_use]
    pub fn find_crop(&self, name: &str) -> Option<&CropConfig> {
        self.crops
            .iter()
            .find(|crop| crop.name.eq_ignore_ascii_case(name))
    }

    /// Checks cross references and ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for item in &self.items {
            if !names.insert(item.name.to_lowercase()) {
                return Err(config_error(format!("Duplicate item '{}'", item.name)));
            }
            let has_food_value = item.min_food_value.is_some() || item.max_food_value.is_some();
            if has_food_value && item.item_type != ItemType::Food {
                return Err(config_error(format!(
                    "Item '{}' has a food value but is not food",
                    item.name
                )));
            }
            if let (Some(min), Some(max)) = (item.min_food_value, item.max_food_value) {
                if min > max {
                    return Err(config_error(format!(
                        "Item '{}' has min_food_value {min} above max_food_value {max}",
                        item.name
                    )));
                }
            }
        }

        for crop in &self.crops {
            for referenced in [&crop.seed_item, &crop.harvest_item] {
                if !names.contains(&referenced.to_lowercase()) {
                    return Err(config_error(format!(
                        "Crop '{}' references unknown item '{referenced}'",
                        crop.name
                    )));
                }
            }
            if crop.growth_minutes <= 0 || crop.min_yield <= 0 || crop.min_yield > crop.max_yield {
                return Err(config_error(format!(
                    "Crop '{}' needs a positive growth time and a valid yield range",
                    crop.name
                )));
            }
        }

        if self.villagers.min_trades <= 0 || self.villagers.min_trades > self.villagers.max_trades {
            return Err(config_error("Invalid villager trade range".to_string()));
        }
        if self.exchange.scrap_per_copper <= 0
            || !(0.0..1.0).contains(&self.exchange.sell_spread)
            || self.exchange.buy_spread < 0.0
        {
            return Err(config_error("Invalid exchange settings".to_string()));
        }

        Ok(())
    }
}

const fn config_error(message: String) -> Error {
    Error::Config { message }
}

/// Parses and validates game configuration from a TOML string
pub fn parse_config(contents: &str) -> Result<GameConfig> {
    let config: GameConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    config.validate()?;
    Ok(config)
}

/// Loads game configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A crop references an item missing from the catalog
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<GameConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!(
            "Failed to read config file {}: {e}",
            path.as_ref().display()
        ),
    })?;

    parse_config(&contents)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    const SAMPLE: &str = r#"
        [exchange]
        scrap_per_copper = 12

        [farm]
        plot_count = 4

        [[items]]
        name = "Wheat Seed"
        rarity = "common"
        type = "seed"
        buy_price = 5

        [[items]]
        name = "Wheat"
        rarity = "common"
        type = "crop"
        sell_price = 3

        [[items]]
        name = "Bread"
        rarity = "uncommon"
        type = "food"
        emoji = "🍞"
        min_food_value = 10
        max_food_value = 20

        [[crops]]
        name = "wheat"
        seed_item = "Wheat Seed"
        harvest_item = "Wheat"
        growth_minutes = 30
        min_yield = 1
        max_yield = 3
    "#;

    #[test]
    fn test_parse_game_config() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.items.len(), 3);
        assert_eq!(config.items[0].item_type, ItemType::Seed);
        assert_eq!(config.items[0].emoji, "📦");
        assert_eq!(config.items[2].emoji, "🍞");
        assert_eq!(config.exchange.scrap_per_copper, 12);
        // Unset fields keep their defaults
        assert_eq!(config.exchange.buy_spread, 0.25);
        assert_eq!(config.farm.plot_count, 4);
        assert_eq!(config.villagers.count, 8);
        assert_eq!(config.find_crop("WHEAT").unwrap().harvest_item, "Wheat");
    }

    #[test]
    fn test_crop_with_unknown_item_is_rejected() {
        let broken = SAMPLE.replace("harvest_item = \"Wheat\"", "harvest_item = \"Rye\"");
        let result = parse_config(&broken);
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_inverted_food_range_is_rejected() {
        let broken = SAMPLE.replace("min_food_value = 10", "min_food_value = 30");
        assert!(parse_config(&broken).is_err());
    }

    #[test]
    fn test_food_value_on_non_food_is_rejected() {
        let broken = SAMPLE.replace(
            "type = \"crop\"\n        sell_price = 3",
            "type = \"crop\"\n        sell_price = 3\n        min_food_value = 5",
        );
        assert!(broken.contains("min_food_value = 5"));
        assert!(matches!(parse_config(&broken), Err(Error::Config { .. })));
    }

    #[test]
    fn test_shipped_config_is_valid() {
        let config = load_config(concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml")).unwrap();
        assert!(!config.items.is_empty());
        assert!(!config.crops.is_empty());
    }
}
