//! Scavenging - rarity-weighted loot in exchange for hunger.

use crate::{
    core::{inventory, player},
    entities::{InventoryType, item},
    errors::{Error, Result},
};
use rand::{Rng, distributions::WeightedIndex, prelude::Distribution};
use sea_orm::{ConnectionTrait, TransactionTrait};
use tracing::{info, instrument};

/// Units of one item found while scavenging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LootDrop {
    /// The item found
    pub item: item::Model,
    /// Units found
    pub quantity: i64,
}

/// What a scavenging trip produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScavengeOutcome {
    /// Loot added to the backpack
    pub loot: Vec<LootDrop>,
    /// Hunger after the trip
    pub hunger: i32,
    /// Experience after the trip
    pub experience: i64,
}

/// Draws `rolls` items from `catalog`, each weighted by its rarity.
///
/// Repeated draws of the same item are merged into one drop. An empty
/// catalog yields no loot.
pub fn roll_loot<R: Rng + ?Sized>(rng: &mut R, catalog: &[item::Model], rolls: usize) -> Vec<LootDrop> {
    let Ok(weights) = WeightedIndex::new(catalog.iter().map(|item| item.rarity.weight())) else {
        return Vec::new();
    };

    let mut drops: Vec<LootDrop> = Vec::new();
    for _ in 0..rolls {
        let picked = &catalog[weights.sample(rng)];
        match drops.iter_mut().find(|drop| drop.item.id == picked.id) {
            Some(drop) => drop.quantity += 1,
            None => drops.push(LootDrop {
                item: picked.clone(),
                quantity: 1,
            }),
        }
    }
    drops
}

/// Spends hunger and stores `loot` in the backpack, all or nothing.
#[instrument(skip(db, loot), fields(drops = loot.len()))]
pub async fn scavenge<C>(
    db: &C,
    player_id: i64,
    loot: Vec<LootDrop>,
    hunger_cost: i32,
    experience_gain: i64,
) -> Result<ScavengeOutcome>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let current = player::require_player(&txn, player_id).await?;
    if current.hunger < hunger_cost {
        return Err(Error::TooHungry {
            hunger: current.hunger,
            required: hunger_cost,
        });
    }

    let hunger = player::modify_hunger(&txn, player_id, -hunger_cost).await?;
    for drop in &loot {
        inventory::modify_item(
            &txn,
            player_id,
            InventoryType::Backpack,
            drop.item.id,
            drop.quantity,
        )
        .await?;
    }
    let experience = player::modify_experience(&txn, player_id, experience_gain).await?;

    txn.commit().await?;
    info!(hunger, "Scavenging trip complete");

    Ok(ScavengeOutcome {
        loot,
        hunger,
        experience,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::{ItemType, Rarity};
    use crate::test_utils::*;
    use rand::{SeedableRng, rngs::StdRng};
    use sea_orm::{ActiveModelTrait, Set};

    #[test]
    fn test_roll_loot_empty_catalog() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(roll_loot(&mut rng, &[], 5).is_empty());
    }

    #[tokio::test]
    async fn test_roll_loot_favours_common_items() -> Result<()> {
        let db = setup_test_db().await?;
        let common = create_test_item(&db, "Rusty Pipe", ItemType::Material).await?;
        let legendary = create_test_item(&db, "Ancient Relic", ItemType::Valuable).await?;
        let mut active_model: item::ActiveModel = legendary.into();
        active_model.rarity = Set(Rarity::Legendary);
        let legendary = active_model.update(&db).await?;

        let mut rng = StdRng::seed_from_u64(42);
        let loot = roll_loot(&mut rng, &[common.clone(), legendary.clone()], 1000);

        let count = |id: i32| {
            loot.iter()
                .find(|drop| drop.item.id == id)
                .map_or(0, |drop| drop.quantity)
        };
        assert_eq!(count(common.id) + count(legendary.id), 1000);
        assert!(count(common.id) > count(legendary.id) * 10);
        Ok(())
    }

    #[tokio::test]
    async fn test_scavenge_adds_loot_and_spends_hunger() -> Result<()> {
        let db = setup_with_player(1).await?;
        let pipe = create_test_item(&db, "Rusty Pipe", ItemType::Material).await?;
        let loot = vec![LootDrop {
            item: pipe.clone(),
            quantity: 3,
        }];

        let outcome = scavenge(&db, 1, loot, 10, 5).await?;
        assert_eq!(outcome.hunger, 90);
        assert_eq!(outcome.experience, 5);
        assert_eq!(
            inventory::get_quantity(&db, 1, InventoryType::Backpack, pipe.id).await?,
            3
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_scavenge_too_hungry() -> Result<()> {
        let db = setup_with_player(1).await?;
        let pipe = create_test_item(&db, "Rusty Pipe", ItemType::Material).await?;
        player::modify_hunger(&db, 1, -95).await?;

        let loot = vec![LootDrop {
            item: pipe.clone(),
            quantity: 1,
        }];
        let result = scavenge(&db, 1, loot, 10, 5).await;
        assert!(matches!(
            result,
            Err(Error::TooHungry {
                hunger: 5,
                required: 10
            })
        ));
        assert_eq!(
            inventory::get_quantity(&db, 1, InventoryType::Backpack, pipe.id).await?,
            0
        );
        Ok(())
    }
}
