//! Player business logic - registration, balances and vitals.
//!
//! Balance changes go through a single conditional `UPDATE` so the
//! non-negative invariant holds even when two interactions of the same player
//! race: `SET balance = balance + delta WHERE id = ? AND balance + delta >= 0`.

use crate::{
    core::inventory,
    entities::{Currency, InventoryType, ItemType, Player, item, player},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{debug, info, instrument};

/// Scrap metal every new player starts with.
pub const STARTING_SCRAP_METAL: i64 = 100;
/// Upper bound of health and hunger.
pub const MAX_VITAL: i32 = 100;

const fn currency_column(currency: Currency) -> player::Column {
    match currency {
        Currency::ScrapMetal => player::Column::ScrapMetal,
        Currency::Copper => player::Column::Copper,
    }
}

/// Balance of `currency` held by `player`.
#[must_use]
pub const fn balance_of(player: &player::Model, currency: Currency) -> i64 {
    match currency {
        Currency::ScrapMetal => player.scrap_metal,
        Currency::Copper => player.copper,
    }
}

/// Creates a new player with the starting balances and full vitals.
#[instrument(skip(db))]
pub async fn register_player<C>(db: &C, user_id: i64) -> Result<player::Model>
where
    C: ConnectionTrait,
{
    if get_player(db, user_id).await?.is_some() {
        return Err(Error::AlreadyRegistered { user_id });
    }

    let new_player = player::ActiveModel {
        id: Set(user_id),
        scrap_metal: Set(STARTING_SCRAP_METAL),
        copper: Set(0),
        experience: Set(0),
        health: Set(MAX_VITAL),
        hunger: Set(MAX_VITAL),
        is_running_command: Set(false),
        created_at: Set(Utc::now()),
    };

    let created = new_player.insert(db).await?;
    info!(user_id, "Registered new player");
    Ok(created)
}

/// Finds a player by Discord user id.
pub async fn get_player<C>(db: &C, user_id: i64) -> Result<Option<player::Model>>
where
    C: ConnectionTrait,
{
    Player::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Finds a player, failing with `NeedsOnboarding` when they never used `/start`.
pub async fn require_player<C>(db: &C, user_id: i64) -> Result<player::Model>
where
    C: ConnectionTrait,
{
    get_player(db, user_id)
        .await?
        .ok_or(Error::NeedsOnboarding { user_id })
}

/// Atomically adds `delta` (negative to subtract) to a balance and returns the new balance.
///
/// Fails with `NegativeBalance` when the balance would drop below zero; the
/// balance is left untouched in that case.
#[instrument(skip(db))]
pub async fn modify_currency<C>(
    db: &C,
    user_id: i64,
    currency: Currency,
    delta: i64,
) -> Result<i64>
where
    C: ConnectionTrait,
{
    let column = currency_column(currency);

    let result = Player::update_many()
        .col_expr(column, Expr::col(column).add(delta))
        .filter(player::Column::Id.eq(user_id))
        .filter(Expr::expr(Expr::col(column).add(delta)).gte(0))
        .exec(db)
        .await?;

    let player = require_player(db, user_id).await?;
    let balance = balance_of(&player, currency);

    if result.rows_affected == 0 {
        debug!(balance, delta, "Currency change rejected");
        return Err(Error::NegativeBalance {
            currency,
            current: balance,
            required: -delta,
        });
    }

    Ok(balance)
}

/// Adds experience points and returns the new total.
pub async fn modify_experience<C>(db: &C, user_id: i64, delta: i64) -> Result<i64>
where
    C: ConnectionTrait,
{
    let player = require_player(db, user_id).await?;
    let experience = player.experience.saturating_add(delta).max(0);

    let mut active_model: player::ActiveModel = player.into();
    active_model.experience = Set(experience);
    active_model.update(db).await?;
    Ok(experience)
}

/// Adds `delta` to health, clamped to 0..=100, and returns the new value.
pub async fn modify_health<C>(db: &C, user_id: i64, delta: i32) -> Result<i32>
where
    C: ConnectionTrait,
{
    let player = require_player(db, user_id).await?;
    let health = player.health.saturating_add(delta).clamp(0, MAX_VITAL);

    let mut active_model: player::ActiveModel = player.into();
    active_model.health = Set(health);
    active_model.update(db).await?;
    Ok(health)
}

/// Adds `delta` to hunger, clamped to 0..=100, and returns the new value.
pub async fn modify_hunger<C>(db: &C, user_id: i64, delta: i32) -> Result<i32>
where
    C: ConnectionTrait,
{
    let player = require_player(db, user_id).await?;
    let hunger = player.hunger.saturating_add(delta).clamp(0, MAX_VITAL);

    let mut active_model: player::ActiveModel = player.into();
    active_model.hunger = Set(hunger);
    active_model.update(db).await?;
    Ok(hunger)
}

/// Eats one unit of a food item from the backpack and restores hunger.
///
/// `food_value` is rolled by the caller from the item's range. Returns the
/// new hunger value.
#[instrument(skip(db, food), fields(item = %food.name))]
pub async fn eat<C>(db: &C, user_id: i64, food: &item::Model, food_value: i32) -> Result<i32>
where
    C: ConnectionTrait + TransactionTrait,
{
    if food.item_type != ItemType::Food {
        return Err(Error::NotTradable {
            name: food.name.clone(),
            action: "eaten",
        });
    }

    let txn = db.begin().await?;
    inventory::modify_item(&txn, user_id, InventoryType::Backpack, food.id, -1).await?;
    let hunger = modify_hunger(&txn, user_id, food_value).await?;
    txn.commit().await?;

    Ok(hunger)
}

/// Sets the "running a command" flag if it is not already set.
///
/// Returns `false` when another command of the same player holds the flag.
pub async fn try_begin_command<C>(db: &C, user_id: i64) -> Result<bool>
where
    C: ConnectionTrait,
{
    let result = Player::update_many()
        .col_expr(player::Column::IsRunningCommand, Expr::value(true))
        .filter(player::Column::Id.eq(user_id))
        .filter(player::Column::IsRunningCommand.eq(false))
        .exec(db)
        .await?;
    Ok(result.rows_affected == 1)
}

/// Clears the "running a command" flag.
pub async fn end_command<C>(db: &C, user_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    Player::update_many()
        .col_expr(player::Column::IsRunningCommand, Expr::value(false))
        .filter(player::Column::Id.eq(user_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Clears every flag left behind by a previous process; returns how many were set.
pub async fn clear_running_flags<C>(db: &C) -> Result<u64>
where
    C: ConnectionTrait,
{
    let result = Player::update_many()
        .col_expr(player::Column::IsRunningCommand, Expr::value(false))
        .filter(player::Column::IsRunningCommand.eq(true))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Players with the largest balance of `currency`, richest first.
pub async fn leaderboard<C>(db: &C, currency: Currency, limit: u64) -> Result<Vec<player::Model>>
where
    C: ConnectionTrait,
{
    Player::find()
        .order_by_desc(currency_column(currency))
        .order_by_asc(player::Column::Id)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_register_player_defaults() -> Result<()> {
        let db = setup_test_db().await?;

        let player = register_player(&db, 42).await?;
        assert_eq!(player.id, 42);
        assert_eq!(player.scrap_metal, STARTING_SCRAP_METAL);
        assert_eq!(player.copper, 0);
        assert_eq!(player.health, MAX_VITAL);
        assert!(!player.is_running_command);

        let again = register_player(&db, 42).await;
        assert!(matches!(again, Err(Error::AlreadyRegistered { user_id: 42 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_require_player_needs_onboarding() -> Result<()> {
        let db = setup_test_db().await?;
        let result = require_player(&db, 7).await;
        assert!(matches!(result, Err(Error::NeedsOnboarding { user_id: 7 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_modify_currency_adds_and_subtracts() -> Result<()> {
        let db = setup_test_db().await?;
        register_player(&db, 1).await?;

        assert_eq!(modify_currency(&db, 1, Currency::Copper, 15).await?, 15);
        assert_eq!(modify_currency(&db, 1, Currency::Copper, -5).await?, 10);
        assert_eq!(
            modify_currency(&db, 1, Currency::ScrapMetal, -STARTING_SCRAP_METAL).await?,
            0
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_modify_currency_rejects_negative_balance() -> Result<()> {
        let db = setup_test_db().await?;
        register_player(&db, 1).await?;

        let result = modify_currency(&db, 1, Currency::ScrapMetal, -150).await;
        assert!(matches!(
            result,
            Err(Error::NegativeBalance {
                currency: Currency::ScrapMetal,
                current: 100,
                required: 150
            })
        ));

        // Balance untouched
        let player = require_player(&db, 1).await?;
        assert_eq!(player.scrap_metal, 100);
        Ok(())
    }

    #[tokio::test]
    async fn test_modify_currency_unknown_player() -> Result<()> {
        let db = setup_test_db().await?;
        let result = modify_currency(&db, 99, Currency::Copper, 5).await;
        assert!(matches!(result, Err(Error::NeedsOnboarding { user_id: 99 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_vitals_are_clamped() -> Result<()> {
        let db = setup_test_db().await?;
        register_player(&db, 1).await?;

        assert_eq!(modify_hunger(&db, 1, 50).await?, MAX_VITAL);
        assert_eq!(modify_hunger(&db, 1, -130).await?, 0);
        assert_eq!(modify_health(&db, 1, -30).await?, 70);
        assert_eq!(modify_experience(&db, 1, 12).await?, 12);
        Ok(())
    }

    #[tokio::test]
    async fn test_command_flag_is_exclusive() -> Result<()> {
        let db = setup_test_db().await?;
        register_player(&db, 1).await?;

        assert!(try_begin_command(&db, 1).await?);
        assert!(!try_begin_command(&db, 1).await?);

        end_command(&db, 1).await?;
        assert!(try_begin_command(&db, 1).await?);

        assert_eq!(clear_running_flags(&db).await?, 1);
        assert!(!require_player(&db, 1).await?.is_running_command);
        Ok(())
    }

    #[tokio::test]
    async fn test_eat_restores_hunger_and_consumes_food() -> Result<()> {
        let db = setup_test_db().await?;
        register_player(&db, 1).await?;
        modify_hunger(&db, 1, -60).await?;
        let bread = create_test_item(&db, "Bread", ItemType::Food).await?;
        inventory::modify_item(&db, 1, InventoryType::Backpack, bread.id, 2).await?;

        let hunger = eat(&db, 1, &bread, 15).await?;
        assert_eq!(hunger, 55);
        assert_eq!(
            inventory::get_quantity(&db, 1, InventoryType::Backpack, bread.id).await?,
            1
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_eat_without_food_fails_and_keeps_hunger() -> Result<()> {
        let db = setup_test_db().await?;
        register_player(&db, 1).await?;
        modify_hunger(&db, 1, -60).await?;
        let bread = create_test_item(&db, "Bread", ItemType::Food).await?;

        let result = eat(&db, 1, &bread, 15).await;
        assert!(matches!(result, Err(Error::MoveItem { .. })));
        assert_eq!(require_player(&db, 1).await?.hunger, 40);
        Ok(())
    }

    #[tokio::test]
    async fn test_eat_rejects_non_food() -> Result<()> {
        let db = setup_test_db().await?;
        register_player(&db, 1).await?;
        let scrap = create_test_item(&db, "Rusty Pipe", ItemType::Material).await?;

        let result = eat(&db, 1, &scrap, 10).await;
        assert!(matches!(result, Err(Error::NotTradable { action: "eaten", .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_leaderboard_orders_by_balance() -> Result<()> {
        let db = setup_test_db().await?;
        for id in 1..=3 {
            register_player(&db, id).await?;
        }
        modify_currency(&db, 2, Currency::Copper, 50).await?;
        modify_currency(&db, 3, Currency::Copper, 20).await?;

        let top = leaderboard(&db, Currency::Copper, 2).await?;
        let ids: Vec<i64> = top.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3]);
        Ok(())
    }
}
