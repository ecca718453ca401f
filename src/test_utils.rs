//! Shared test utilities for BOSS.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::player,
    entities::{ItemType, Rarity, item},
    errors::Result,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Sets up a test database with one registered player.
pub async fn setup_with_player(user_id: i64) -> Result<DatabaseConnection> {
    let db = setup_test_db().await?;
    player::register_player(&db, user_id).await?;
    Ok(db)
}

/// Creates a catalog item with sensible defaults.
///
/// # Defaults
/// * rarity: common
/// * `buy_price`: 5, `sell_price`: 2
/// * food items restore 10..=20 hunger
pub async fn create_test_item(
    db: &DatabaseConnection,
    name: &str,
    item_type: ItemType,
) -> Result<item::Model> {
    let (min_food_value, max_food_value) = if item_type == ItemType::Food {
        (Some(10), Some(20))
    } else {
        (None, None)
    };

    let model = item::ActiveModel {
        name: Set(name.to_string()),
        description: Set(format!("A test {item_type}")),
        rarity: Set(Rarity::Common),
        item_type: Set(item_type),
        buy_price: Set(Some(5)),
        sell_price: Set(Some(2)),
        trade_price: Set(Some(3)),
        emoji: Set("📦".to_string()),
        min_food_value: Set(min_food_value),
        max_food_value: Set(max_food_value),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(model)
}
