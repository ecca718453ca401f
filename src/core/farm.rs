//! Farm business logic - planting, growth and harvesting.
//!
//! Every player owns a fixed number of plots. Growth is never stored: the
//! stage is derived from the time elapsed since planting and the crop's
//! growth period whenever the farm is read.

use crate::{
    config::game::CropConfig,
    core::{inventory, item},
    entities::{FarmPlot, InventoryType, farm_plot},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use rand::Rng;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::OnConflict};
use std::collections::HashSet;
use tracing::{info, instrument, warn};

/// Growth stage of a plot, derived at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthStage {
    /// Nothing planted
    Empty,
    /// Less than half grown
    Seedling,
    /// At least half grown
    Growing,
    /// Ready to harvest
    Ripe,
}

impl GrowthStage {
    /// Emoji used on the farm view.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Empty => "🟫",
            Self::Seedling => "🌱",
            Self::Growing => "🌿",
            Self::Ripe => "🌾",
        }
    }
}

/// What one ripe plot produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestOutcome {
    /// Plot the crop grew on
    pub slot: i32,
    /// Crop type name
    pub crop: String,
    /// Item added to the backpack
    pub item_name: String,
    /// Units added
    pub quantity: i64,
}

/// Fraction of the growth period elapsed, in `0.0..=1.0`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn growth_fraction(planted_at: DateTime<Utc>, now: DateTime<Utc>, growth_minutes: i64) -> f64 {
    if growth_minutes <= 0 {
        return 1.0;
    }
    let elapsed = (now - planted_at).num_seconds().max(0) as f64;
    (elapsed / (growth_minutes as f64 * 60.0)).clamp(0.0, 1.0)
}

/// Stage of a plot at `now`. Crops missing from the configuration count as ripe
/// so the plot can be cleared.
#[must_use]
pub fn growth_stage(plot: &farm_plot::Model, crops: &[CropConfig], now: DateTime<Utc>) -> GrowthStage {
    let (Some(crop_name), Some(planted_at)) = (&plot.crop, plot.planted_at) else {
        return GrowthStage::Empty;
    };
    let Some(crop) = crops.iter().find(|crop| &crop.name == crop_name) else {
        return GrowthStage::Ripe;
    };

    let fraction = growth_fraction(planted_at, now, crop.growth_minutes);
    if fraction >= 1.0 {
        GrowthStage::Ripe
    } else if fraction >= 0.5 {
        GrowthStage::Growing
    } else {
        GrowthStage::Seedling
    }
}

/// Text progress bar such as `[██████░░░░] 60%`.
#[must_use]
pub fn growth_bar(fraction: f64, bar_length: usize) -> String {
    let clamped = fraction.clamp(0.0, 1.0);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = (clamped * bar_length as f64).round() as usize;
    let empty = bar_length.saturating_sub(filled);

    format!(
        "[{}{}] {:.0}%",
        "█".repeat(filled),
        "░".repeat(empty),
        clamped * 100.0
    )
}

/// Creates the plots a player is missing and returns the whole farm.
///
/// Concurrent calls are safe: plots that already exist are skipped by the
/// unique `(player_id, slot)` key.
pub async fn ensure_farm<C>(db: &C, player_id: i64, plot_count: i32) -> Result<Vec<farm_plot::Model>>
where
    C: ConnectionTrait,
{
    let existing: HashSet<i32> = get_farm(db, player_id)
        .await?
        .into_iter()
        .map(|plot| plot.slot)
        .collect();

    let missing: Vec<farm_plot::ActiveModel> = (0..plot_count)
        .filter(|slot| !existing.contains(slot))
        .map(|slot| farm_plot::ActiveModel {
            player_id: Set(player_id),
            slot: Set(slot),
            crop: Set(None),
            planted_at: Set(None),
            ..Default::default()
        })
        .collect();

    if !missing.is_empty() {
        FarmPlot::insert_many(missing)
            .on_conflict(
                OnConflict::columns([farm_plot::Column::PlayerId, farm_plot::Column::Slot])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
    }

    get_farm(db, player_id).await
}

/// All plots of a player, by slot.
pub async fn get_farm<C>(db: &C, player_id: i64) -> Result<Vec<farm_plot::Model>>
where
    C: ConnectionTrait,
{
    FarmPlot::find()
        .filter(farm_plot::Column::PlayerId.eq(player_id))
        .order_by_asc(farm_plot::Column::Slot)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Plants `crop` in an empty plot, consuming one seed from the backpack.
#[instrument(skip(db, crop), fields(crop = %crop.name))]
pub async fn plant<C>(
    db: &C,
    player_id: i64,
    slot: i32,
    crop: &CropConfig,
    now: DateTime<Utc>,
) -> Result<farm_plot::Model>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let plot = FarmPlot::find()
        .filter(farm_plot::Column::PlayerId.eq(player_id))
        .filter(farm_plot::Column::Slot.eq(slot))
        .one(&txn)
        .await?
        .ok_or_else(|| Error::Farm {
            reason: format!("plot {} does not exist", slot + 1),
        })?;

    if plot.crop.is_some() {
        return Err(Error::Farm {
            reason: format!("plot {} is already planted", slot + 1),
        });
    }

    let seed = item::get_item_by_name(&txn, &crop.seed_item).await?;
    inventory::modify_item(&txn, player_id, InventoryType::Backpack, seed.id, -1)
        .await
        .map_err(|e| match e {
            Error::MoveItem { .. } => Error::Farm {
                reason: format!("you need a {} to plant {}", seed.name, crop.name),
            },
            other => other,
        })?;

    let mut active_model: farm_plot::ActiveModel = plot.into();
    active_model.crop = Set(Some(crop.name.clone()));
    active_model.planted_at = Set(Some(now));
    let planted = active_model.update(&txn).await?;

    txn.commit().await?;
    Ok(planted)
}

/// Harvests every ripe plot into the backpack and clears it.
///
/// Either every ripe plot is harvested or, when the backpack overflows,
/// none is.
#[instrument(skip(db, crops, rng))]
pub async fn harvest<C, R>(
    db: &C,
    player_id: i64,
    crops: &[CropConfig],
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<Vec<HarvestOutcome>>
where
    C: ConnectionTrait + TransactionTrait,
    R: Rng + Send,
{
    let txn = db.begin().await?;
    let mut outcomes = Vec::new();

    for plot in get_farm(&txn, player_id).await? {
        if growth_stage(&plot, crops, now) != GrowthStage::Ripe {
            continue;
        }
        let slot = plot.slot;
        let crop_name = plot.crop.clone().unwrap_or_default();

        if let Some(crop) = crops.iter().find(|crop| crop.name == crop_name) {
            let produce = item::get_item_by_name(&txn, &crop.harvest_item).await?;
            let quantity = rng.gen_range(crop.min_yield..=crop.max_yield);
            inventory::modify_item(&txn, player_id, InventoryType::Backpack, produce.id, quantity)
                .await?;
            outcomes.push(HarvestOutcome {
                slot,
                crop: crop_name,
                item_name: produce.name,
                quantity,
            });
        } else {
            warn!(slot, crop = %crop_name, "Clearing plot with unknown crop");
        }

        let mut active_model: farm_plot::ActiveModel = plot.into();
        active_model.crop = Set(None);
        active_model.planted_at = Set(None);
        active_model.update(&txn).await?;
    }

    txn.commit().await?;
    info!(harvested = outcomes.len(), "Harvest complete");
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::entities::ItemType;
    use crate::test_utils::*;
    use chrono::Duration;
    use rand::{SeedableRng, rngs::StdRng};

    fn wheat() -> CropConfig {
        CropConfig {
            name: "wheat".to_string(),
            seed_item: "Wheat Seed".to_string(),
            harvest_item: "Wheat".to_string(),
            growth_minutes: 60,
            min_yield: 2,
            max_yield: 4,
        }
    }

    async fn setup_farm() -> Result<(sea_orm::DatabaseConnection, i32)> {
        let db = setup_with_player(1).await?;
        let seed = create_test_item(&db, "Wheat Seed", ItemType::Seed).await?;
        create_test_item(&db, "Wheat", ItemType::Crop).await?;
        ensure_farm(&db, 1, 4).await?;
        Ok((db, seed.id))
    }

    #[test]
    fn test_growth_fraction_and_bar() {
        let planted = Utc::now();
        assert_eq!(growth_fraction(planted, planted + Duration::minutes(30), 60), 0.5);
        assert_eq!(growth_fraction(planted, planted + Duration::minutes(90), 60), 1.0);
        assert_eq!(growth_fraction(planted, planted - Duration::minutes(5), 60), 0.0);

        assert_eq!(growth_bar(0.5, 10), "[█████░░░░░] 50%");
        assert_eq!(growth_bar(1.5, 4), "[████] 100%");
    }

    #[test]
    fn test_growth_stage_thresholds() {
        let planted = Utc::now();
        let plot = farm_plot::Model {
            id: 1,
            player_id: 1,
            slot: 0,
            crop: Some("wheat".to_string()),
            planted_at: Some(planted),
        };
        let crops = [wheat()];

        assert_eq!(growth_stage(&plot, &crops, planted), GrowthStage::Seedling);
        assert_eq!(
            growth_stage(&plot, &crops, planted + Duration::minutes(45)),
            GrowthStage::Growing
        );
        assert_eq!(
            growth_stage(&plot, &crops, planted + Duration::minutes(60)),
            GrowthStage::Ripe
        );

        let empty = farm_plot::Model {
            crop: None,
            planted_at: None,
            ..plot
        };
        assert_eq!(growth_stage(&empty, &crops, planted), GrowthStage::Empty);
    }

    #[tokio::test]
    async fn test_ensure_farm_is_idempotent() -> Result<()> {
        let db = setup_with_player(1).await?;
        assert_eq!(ensure_farm(&db, 1, 4).await?.len(), 4);
        assert_eq!(ensure_farm(&db, 1, 4).await?.len(), 4);
        // Growing the farm only adds the missing plots
        let plots = ensure_farm(&db, 1, 6).await?;
        let slots: Vec<i32> = plots.iter().map(|plot| plot.slot).collect();
        assert_eq!(slots, vec![0, 1, 2, 3, 4, 5]);
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_ensure_farm_creates_each_plot_once() -> Result<()> {
        let db = setup_with_player(1).await?;

        let (first, second) = tokio::join!(ensure_farm(&db, 1, 8), ensure_farm(&db, 1, 8));
        first?;
        second?;

        let slots: Vec<i32> = get_farm(&db, 1).await?.iter().map(|plot| plot.slot).collect();
        assert_eq!(slots, (0..8).collect::<Vec<_>>());
        Ok(())
    }

    #[tokio::test]
    async fn test_plant_consumes_seed() -> Result<()> {
        let (db, seed_id) = setup_farm().await?;
        inventory::modify_item(&db, 1, InventoryType::Backpack, seed_id, 2).await?;

        let plot = plant(&db, 1, 2, &wheat(), Utc::now()).await?;
        assert_eq!(plot.crop.as_deref(), Some("wheat"));
        assert_eq!(
            inventory::get_quantity(&db, 1, InventoryType::Backpack, seed_id).await?,
            1
        );

        let again = plant(&db, 1, 2, &wheat(), Utc::now()).await;
        assert!(matches!(again, Err(Error::Farm { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_plant_without_seed_or_plot_fails() -> Result<()> {
        let (db, seed_id) = setup_farm().await?;

        let no_seed = plant(&db, 1, 0, &wheat(), Utc::now()).await;
        assert!(matches!(no_seed, Err(Error::Farm { .. })));

        inventory::modify_item(&db, 1, InventoryType::Backpack, seed_id, 1).await?;
        let no_plot = plant(&db, 1, 10, &wheat(), Utc::now()).await;
        assert!(matches!(no_plot, Err(Error::Farm { .. })));
        // The seed was not consumed
        assert_eq!(
            inventory::get_quantity(&db, 1, InventoryType::Backpack, seed_id).await?,
            1
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_harvest_only_ripe_plots() -> Result<()> {
        let (db, seed_id) = setup_farm().await?;
        inventory::modify_item(&db, 1, InventoryType::Backpack, seed_id, 2).await?;
        let planted = Utc::now() - Duration::minutes(120);
        plant(&db, 1, 0, &wheat(), planted).await?;
        plant(&db, 1, 1, &wheat(), Utc::now()).await?;

        let mut rng = StdRng::seed_from_u64(11);
        let outcomes = harvest(&db, 1, &[wheat()], Utc::now(), &mut rng).await?;

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].slot, 0);
        assert!((2..=4).contains(&outcomes[0].quantity));

        let farm = get_farm(&db, 1).await?;
        assert!(farm[0].crop.is_none());
        assert!(farm[1].crop.is_some());

        let wheat_item = item::get_item_by_name(&db, "Wheat").await?;
        assert_eq!(
            inventory::get_quantity(&db, 1, InventoryType::Backpack, wheat_item.id).await?,
            outcomes[0].quantity
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_harvest_into_full_backpack_harvests_nothing() -> Result<()> {
        let (db, wheat_seed) = setup_farm().await?;
        let potato_seed = create_test_item(&db, "Potato Seed", ItemType::Seed).await?;
        create_test_item(&db, "Potato", ItemType::Crop).await?;
        let potato = CropConfig {
            name: "potato".to_string(),
            seed_item: "Potato Seed".to_string(),
            harvest_item: "Potato".to_string(),
            ..wheat()
        };

        inventory::modify_item(&db, 1, InventoryType::Backpack, wheat_seed, 1).await?;
        inventory::modify_item(&db, 1, InventoryType::Backpack, potato_seed.id, 1).await?;
        let planted = Utc::now() - Duration::minutes(120);
        plant(&db, 1, 0, &wheat(), planted).await?;
        plant(&db, 1, 1, &potato, planted).await?;

        // One free slot left: wheat fits, potatoes do not
        for i in 0..31 {
            let junk = create_test_item(&db, &format!("Junk {i}"), ItemType::Material).await?;
            inventory::modify_item(&db, 1, InventoryType::Backpack, junk.id, 1).await?;
        }

        let mut rng = StdRng::seed_from_u64(4);
        let result = harvest(&db, 1, &[wheat(), potato], Utc::now(), &mut rng).await;
        assert!(matches!(
            result,
            Err(Error::SlotLimit {
                inventory: InventoryType::Backpack,
                ..
            })
        ));

        let farm = get_farm(&db, 1).await?;
        assert!(farm[0].crop.is_some());
        assert!(farm[1].crop.is_some());
        assert_eq!(inventory::slots_used(&db, 1, InventoryType::Backpack).await?, 31);
        Ok(())
    }
}
