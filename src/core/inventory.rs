//! Inventory business logic - backpack, chest and vault.
//!
//! Every change runs inside a (possibly nested) transaction: the row is
//! written first, then the slot count is re-read in the same transaction and
//! the write is rolled back when the inventory type's cap is exceeded. Rows
//! that reach zero are deleted, so the row count is the slot count.

use crate::{
    core::player,
    entities::{Currency, Inventory, InventoryType, Item, inventory, item},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, instrument};

/// One occupied slot, joined with its catalog item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEntry {
    /// The catalog item
    pub item: item::Model,
    /// Units held
    pub quantity: i64,
}

async fn find_entry<C>(
    db: &C,
    player_id: i64,
    inventory_type: InventoryType,
    item_id: i32,
) -> Result<Option<inventory::Model>>
where
    C: ConnectionTrait,
{
    Inventory::find()
        .filter(inventory::Column::PlayerId.eq(player_id))
        .filter(inventory::Column::InventoryType.eq(inventory_type))
        .filter(inventory::Column::ItemId.eq(item_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// All entries of one inventory, alphabetically by item name.
pub async fn get_inventory<C>(
    db: &C,
    player_id: i64,
    inventory_type: InventoryType,
) -> Result<Vec<InventoryEntry>>
where
    C: ConnectionTrait,
{
    let rows = Inventory::find()
        .filter(inventory::Column::PlayerId.eq(player_id))
        .filter(inventory::Column::InventoryType.eq(inventory_type))
        .find_also_related(Item)
        .order_by_asc(item::Column::Name)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(entry, item)| {
            item.map(|item| InventoryEntry {
                item,
                quantity: entry.quantity,
            })
        })
        .collect())
}

/// Units of `item_id` held in one inventory.
pub async fn get_quantity<C>(
    db: &C,
    player_id: i64,
    inventory_type: InventoryType,
    item_id: i32,
) -> Result<i64>
where
    C: ConnectionTrait,
{
    Ok(find_entry(db, player_id, inventory_type, item_id)
        .await?
        .map_or(0, |entry| entry.quantity))
}

/// Number of distinct items in one inventory.
pub async fn slots_used<C>(db: &C, player_id: i64, inventory_type: InventoryType) -> Result<u64>
where
    C: ConnectionTrait,
{
    Inventory::find()
        .filter(inventory::Column::PlayerId.eq(player_id))
        .filter(inventory::Column::InventoryType.eq(inventory_type))
        .count(db)
        .await
        .map_err(Into::into)
}

/// Adds `delta` units (negative to remove) of an item and returns the new quantity.
///
/// Fails with `MoveItem` when removing more than held and with `SlotLimit`
/// when a new item does not fit; nothing is written in either case.
#[instrument(skip(db))]
pub async fn modify_item<C>(
    db: &C,
    player_id: i64,
    inventory_type: InventoryType,
    item_id: i32,
    delta: i64,
) -> Result<i64>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let existing = find_entry(&txn, player_id, inventory_type, item_id).await?;
    let current = existing.as_ref().map_or(0, |entry| entry.quantity);
    let new_quantity = current + delta;

    if new_quantity < 0 {
        return Err(Error::MoveItem {
            reason: format!(
                "you only have {current} in your {inventory_type}, but {} are needed",
                -delta
            ),
        });
    }

    match existing {
        Some(entry) if new_quantity == 0 => {
            entry.delete(&txn).await?;
        }
        Some(entry) => {
            let mut active_model: inventory::ActiveModel = entry.into();
            active_model.quantity = Set(new_quantity);
            active_model.update(&txn).await?;
        }
        None if new_quantity == 0 => {}
        None => {
            inventory::ActiveModel {
                player_id: Set(player_id),
                inventory_type: Set(inventory_type),
                item_id: Set(item_id),
                quantity: Set(new_quantity),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            if let Some(limit) = inventory_type.slot_limit() {
                let used = slots_used(&txn, player_id, inventory_type).await?;
                if used > limit {
                    debug!(used, limit, "Slot limit exceeded, rolling back");
                    return Err(Error::SlotLimit {
                        inventory: inventory_type,
                        limit,
                    });
                }
            }
        }
    }

    txn.commit().await?;
    Ok(new_quantity)
}

/// Moves `quantity` units of an item from one inventory type to another.
#[instrument(skip(db, item), fields(item = %item.name))]
pub async fn move_item<C>(
    db: &C,
    player_id: i64,
    item: &item::Model,
    quantity: i64,
    from: InventoryType,
    to: InventoryType,
) -> Result<()>
where
    C: ConnectionTrait + TransactionTrait,
{
    if quantity <= 0 {
        return Err(Error::MoveItem {
            reason: format!("quantity must be positive, got {quantity}"),
        });
    }
    if from == to {
        return Err(Error::MoveItem {
            reason: format!("{} is already in your {to}", item.name),
        });
    }

    let txn = db.begin().await?;
    modify_item(&txn, player_id, from, item.id, -quantity).await?;
    modify_item(&txn, player_id, to, item.id, quantity).await?;
    txn.commit().await?;
    Ok(())
}

/// Sells items from the backpack; returns the scrap metal earned.
#[instrument(skip(db, item), fields(item = %item.name))]
pub async fn sell_item<C>(db: &C, player_id: i64, item: &item::Model, quantity: i64) -> Result<i64>
where
    C: ConnectionTrait + TransactionTrait,
{
    if quantity <= 0 {
        return Err(Error::InvalidAmount { amount: quantity });
    }
    let price = item.sell_price.ok_or_else(|| Error::NotTradable {
        name: item.name.clone(),
        action: "sold",
    })?;
    let earned = price
        .checked_mul(quantity)
        .ok_or(Error::InvalidAmount { amount: quantity })?;

    let txn = db.begin().await?;
    modify_item(&txn, player_id, InventoryType::Backpack, item.id, -quantity).await?;
    player::modify_currency(&txn, player_id, Currency::ScrapMetal, earned).await?;
    txn.commit().await?;
    Ok(earned)
}

/// Buys items into the backpack; returns the scrap metal spent.
#[instrument(skip(db, item), fields(item = %item.name))]
pub async fn buy_item<C>(db: &C, player_id: i64, item: &item::Model, quantity: i64) -> Result<i64>
where
    C: ConnectionTrait + TransactionTrait,
{
    if quantity <= 0 {
        return Err(Error::InvalidAmount { amount: quantity });
    }
    let price = item.buy_price.ok_or_else(|| Error::NotTradable {
        name: item.name.clone(),
        action: "bought",
    })?;
    let cost = price
        .checked_mul(quantity)
        .ok_or(Error::InvalidAmount { amount: quantity })?;

    let txn = db.begin().await?;
    player::modify_currency(&txn, player_id, Currency::ScrapMetal, -cost).await?;
    modify_item(&txn, player_id, InventoryType::Backpack, item.id, quantity).await?;
    txn.commit().await?;
    Ok(cost)
}
