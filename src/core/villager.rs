//! Villager business logic - generation and trading.
//!
//! Villagers are throwaway NPC traders. Every refresh replaces all of them:
//! each generated name gets a random job, each job has a few hardcoded trade
//! templates, and the quantities in the chosen template are rolled. Both
//! tables are truncated and refilled in one transaction so players never see
//! a half-built market.

use crate::{
    config::game::VillagerConfig,
    core::{inventory, item as catalog, player, system_state},
    entities::{
        Currency, InventoryType, Item, Job, Trade, TradeSide, Villager, item, trade, villager,
    },
    errors::{Error, Result},
};
use chrono::Utc;
use rand::{Rng, seq::SliceRandom};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// One good on one side of an offer.
///
/// `I` is the item representation: a catalog name while planning, the full
/// catalog row once stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Good<I> {
    /// Units of a catalog item
    Item {
        /// The item
        item: I,
        /// Units per trade
        quantity: i64,
    },
    /// An amount of currency
    Currency {
        /// The currency
        currency: Currency,
        /// Amount per trade
        amount: i64,
    },
}

/// A good as stored, with its catalog item resolved.
pub type TradeGood = Good<item::Model>;

/// A rolled good before it is stored.
pub type PlannedGood = Good<&'static str>;

impl TradeGood {
    /// Short display such as `3x 🌾 Wheat` or `2 🪙 copper`.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Item { item, quantity } => format!("{quantity}x {}", item.display_name()),
            Self::Currency { currency, amount } => {
                format!("{amount} {} {currency}", currency.emoji())
            }
        }
    }
}

/// Range template for one good.
#[derive(Debug, Clone, Copy)]
pub enum GoodTemplate {
    /// Item with a quantity range
    Item(&'static str, i64, i64),
    /// Currency with an amount range
    Currency(Currency, i64, i64),
}

impl GoodTemplate {
    fn roll<R: Rng + ?Sized>(self, rng: &mut R) -> PlannedGood {
        match self {
            Self::Item(name, min, max) => Good::Item {
                item: name,
                quantity: rng.gen_range(min..=max),
            },
            Self::Currency(currency, min, max) => Good::Currency {
                currency,
                amount: rng.gen_range(min..=max),
            },
        }
    }
}

/// A trade template: everything demanded for everything supplied.
#[derive(Debug, Clone, Copy)]
pub struct TradeTemplate {
    /// Goods the player gives
    pub demands: &'static [GoodTemplate],
    /// Goods the player receives
    pub supplies: &'static [GoodTemplate],
}

const FARMER: &[TradeTemplate] = &[
    TradeTemplate {
        demands: &[GoodTemplate::Item("Wheat", 8, 16)],
        supplies: &[GoodTemplate::Currency(Currency::Copper, 1, 3)],
    },
    TradeTemplate {
        demands: &[GoodTemplate::Currency(Currency::ScrapMetal, 20, 40)],
        supplies: &[GoodTemplate::Item("Wheat Seed", 2, 5)],
    },
    TradeTemplate {
        demands: &[GoodTemplate::Item("Potato", 6, 12)],
        supplies: &[GoodTemplate::Item("Bread", 1, 3)],
    },
];

const BLACKSMITH: &[TradeTemplate] = &[
    TradeTemplate {
        demands: &[GoodTemplate::Item("Rusty Pipe", 5, 10)],
        supplies: &[GoodTemplate::Item("Iron Ingot", 1, 2)],
    },
    TradeTemplate {
        demands: &[GoodTemplate::Currency(Currency::Copper, 2, 4)],
        supplies: &[GoodTemplate::Item("Crowbar", 1, 1)],
    },
    TradeTemplate {
        demands: &[GoodTemplate::Item("Iron Ingot", 3, 5)],
        supplies: &[GoodTemplate::Currency(Currency::Copper, 2, 4)],
    },
];

const BUTCHER: &[TradeTemplate] = &[
    TradeTemplate {
        demands: &[GoodTemplate::Item("Raw Meat", 3, 6)],
        supplies: &[GoodTemplate::Currency(Currency::Copper, 1, 2)],
    },
    TradeTemplate {
        demands: &[GoodTemplate::Currency(Currency::ScrapMetal, 15, 30)],
        supplies: &[GoodTemplate::Item("Cooked Meat", 1, 3)],
    },
];

const FISHERMAN: &[TradeTemplate] = &[
    TradeTemplate {
        demands: &[GoodTemplate::Currency(Currency::ScrapMetal, 40, 60)],
        supplies: &[GoodTemplate::Item("Fishing Rod", 1, 1)],
    },
    TradeTemplate {
        demands: &[GoodTemplate::Item("Raw Fish", 4, 8)],
        supplies: &[GoodTemplate::Currency(Currency::Copper, 1, 2)],
    },
];

const LIBRARIAN: &[TradeTemplate] = &[
    TradeTemplate {
        demands: &[GoodTemplate::Item("Old Book", 1, 2)],
        supplies: &[GoodTemplate::Currency(Currency::Copper, 3, 6)],
    },
    TradeTemplate {
        demands: &[GoodTemplate::Currency(Currency::Copper, 5, 8)],
        supplies: &[GoodTemplate::Item("Ancient Relic", 1, 1)],
    },
];

const SCAVENGER: &[TradeTemplate] = &[
    TradeTemplate {
        demands: &[GoodTemplate::Currency(Currency::Copper, 1, 2)],
        supplies: &[GoodTemplate::Item("Circuit Board", 1, 3)],
    },
    TradeTemplate {
        demands: &[
            GoodTemplate::Item("Duct Tape", 3, 5),
            GoodTemplate::Item("Cloth", 2, 4),
        ],
        supplies: &[GoodTemplate::Currency(Currency::ScrapMetal, 30, 60)],
    },
];

const ALL_JOBS: [Job; 6] = [
    Job::Farmer,
    Job::Blacksmith,
    Job::Butcher,
    Job::Fisherman,
    Job::Librarian,
    Job::Scavenger,
];

/// The hardcoded trade templates of a job.
#[must_use]
pub const fn templates_for(job: Job) -> &'static [TradeTemplate] {
    match job {
        Job::Farmer => FARMER,
        Job::Blacksmith => BLACKSMITH,
        Job::Butcher => BUTCHER,
        Job::Fisherman => FISHERMAN,
        Job::Librarian => LIBRARIAN,
        Job::Scavenger => SCAVENGER,
    }
}

/// A villager rolled but not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VillagerPlan {
    /// Display name
    pub name: String,
    /// Job archetype
    pub job: Job,
    /// Trades available until the next refresh
    pub remaining_trades: i32,
    /// Goods the player gives
    pub demands: Vec<PlannedGood>,
    /// Goods the player receives
    pub supplies: Vec<PlannedGood>,
}

/// A stored villager with its resolved offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VillagerOffer {
    /// The villager row
    pub villager: villager::Model,
    /// Goods the player gives
    pub demands: Vec<TradeGood>,
    /// Goods the player receives
    pub supplies: Vec<TradeGood>,
}

/// Rolls one villager per name.
pub fn plan_villagers<R: Rng + ?Sized>(
    rng: &mut R,
    names: &[String],
    config: &VillagerConfig,
) -> Vec<VillagerPlan> {
    names
        .iter()
        .filter_map(|name| {
            let job = *ALL_JOBS.choose(rng)?;
            let template = templates_for(job).choose(rng)?;
            Some(VillagerPlan {
                name: name.trim().to_string(),
                job,
                remaining_trades: rng.gen_range(config.min_trades..=config.max_trades),
                demands: template.demands.iter().map(|good| good.roll(rng)).collect(),
                supplies: template.supplies.iter().map(|good| good.roll(rng)).collect(),
            })
        })
        .collect()
}

async fn resolve_planned<C>(
    db: &C,
    goods: &[PlannedGood],
    cache: &mut HashMap<&'static str, Option<item::Model>>,
) -> Result<Option<Vec<TradeGood>>>
where
    C: ConnectionTrait,
{
    let mut resolved = Vec::with_capacity(goods.len());
    for good in goods {
        match good {
            Good::Item { item, quantity } => {
                if !cache.contains_key(item) {
                    let found = catalog::find_by_name(db, item).await?;
                    cache.insert(*item, found);
                }
                let Some(Some(model)) = cache.get(item) else {
                    warn!(item = *item, "Villager template references an unknown item");
                    return Ok(None);
                };
                resolved.push(Good::Item {
                    item: model.clone(),
                    quantity: *quantity,
                });
            }
            Good::Currency { currency, amount } => resolved.push(Good::Currency {
                currency: *currency,
                amount: *amount,
            }),
        }
    }
    Ok(Some(resolved))
}

async fn insert_goods<C>(db: &C, villager_id: i64, side: TradeSide, goods: &[TradeGood]) -> Result<()>
where
    C: ConnectionTrait,
{
    for good in goods {
        let (item_id, currency, quantity) = match good {
            Good::Item { item, quantity } => (Some(item.id), None, *quantity),
            Good::Currency { currency, amount } => (None, Some(*currency), *amount),
        };
        trade::ActiveModel {
            villager_id: Set(villager_id),
            side: Set(side),
            item_id: Set(item_id),
            currency: Set(currency),
            quantity: Set(quantity),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

/// Replaces every villager and trade with `plans`; returns how many villagers were stored.
///
/// Plans whose goods name items missing from the catalog are skipped.
#[instrument(skip_all, fields(planned = plans.len()))]
pub async fn replace_villagers<C>(db: &C, plans: &[VillagerPlan]) -> Result<usize>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    Trade::delete_many().exec(&txn).await?;
    Villager::delete_many().exec(&txn).await?;

    let now = Utc::now();
    let mut cache = HashMap::new();
    let mut stored = 0;

    for plan in plans {
        let (Some(demands), Some(supplies)) = (
            resolve_planned(&txn, &plan.demands, &mut cache).await?,
            resolve_planned(&txn, &plan.supplies, &mut cache).await?,
        ) else {
            continue;
        };

        let villager = villager::ActiveModel {
            name: Set(plan.name.clone()),
            job: Set(plan.job),
            remaining_trades: Set(plan.remaining_trades),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        insert_goods(&txn, villager.id, TradeSide::Demand, &demands).await?;
        insert_goods(&txn, villager.id, TradeSide::Supply, &supplies).await?;
        stored += 1;
    }

    system_state::set_value(
        &txn,
        system_state::LAST_VILLAGER_REFRESH_KEY,
        &now.to_rfc3339(),
    )
    .await?;
    txn.commit().await?;

    info!(stored, "Villagers replaced");
    Ok(stored)
}

async fn load_offers<C>(db: &C, villagers: Vec<villager::Model>) -> Result<Vec<VillagerOffer>>
where
    C: ConnectionTrait,
{
    let ids: Vec<i64> = villagers.iter().map(|v| v.id).collect();
    let trades = Trade::find()
        .filter(trade::Column::VillagerId.is_in(ids))
        .order_by_asc(trade::Column::Id)
        .all(db)
        .await?;

    let item_ids: Vec<i32> = trades.iter().filter_map(|t| t.item_id).collect();
    let items: HashMap<i32, item::Model> = Item::find()
        .filter(item::Column::Id.is_in(item_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|item| (item.id, item))
        .collect();

    let mut offers: Vec<VillagerOffer> = villagers
        .into_iter()
        .map(|villager| VillagerOffer {
            villager,
            demands: Vec::new(),
            supplies: Vec::new(),
        })
        .collect();

    for row in trades {
        let good = match (row.item_id, row.currency) {
            (Some(item_id), _) => match items.get(&item_id) {
                Some(item) => Good::Item {
                    item: item.clone(),
                    quantity: row.quantity,
                },
                None => continue,
            },
            (None, Some(currency)) => Good::Currency {
                currency,
                amount: row.quantity,
            },
            (None, None) => continue,
        };

        if let Some(offer) = offers.iter_mut().find(|o| o.villager.id == row.villager_id) {
            match row.side {
                TradeSide::Demand => offer.demands.push(good),
                TradeSide::Supply => offer.supplies.push(good),
            }
        }
    }

    Ok(offers)
}

/// Every current villager with its offer, by id.
pub async fn list_villagers<C>(db: &C) -> Result<Vec<VillagerOffer>>
where
    C: ConnectionTrait,
{
    let villagers = Villager::find()
        .order_by_asc(villager::Column::Id)
        .all(db)
        .await?;
    load_offers(db, villagers).await
}

/// One villager with its offer, failing with `VillagerNotFound`.
pub async fn get_villager<C>(db: &C, villager_id: i64) -> Result<VillagerOffer>
where
    C: ConnectionTrait,
{
    let villager = Villager::find_by_id(villager_id)
        .one(db)
        .await?
        .ok_or(Error::VillagerNotFound { id: villager_id })?;
    load_offers(db, vec![villager])
        .await?
        .pop()
        .ok_or(Error::VillagerNotFound { id: villager_id })
}

async fn apply_good<C>(db: &C, player_id: i64, good: &TradeGood, sign: i64, times: i64) -> Result<()>
where
    C: ConnectionTrait + TransactionTrait,
{
    match good {
        Good::Item { item, quantity } => {
            inventory::modify_item(
                db,
                player_id,
                InventoryType::Backpack,
                item.id,
                sign * quantity * times,
            )
            .await?;
        }
        Good::Currency { currency, amount } => {
            player::modify_currency(db, player_id, *currency, sign * amount * times).await?;
        }
    }
    Ok(())
}

/// Takes `times` trades from a villager if it still has that many.
///
/// The check and the decrement are one statement, so two traders can never
/// both spend the last trade.
pub(crate) async fn claim_trades<C>(db: &C, villager_id: i64, times: i32) -> Result<bool>
where
    C: ConnectionTrait,
{
    let result = Villager::update_many()
        .col_expr(
            villager::Column::RemainingTrades,
            Expr::col(villager::Column::RemainingTrades).sub(times),
        )
        .filter(villager::Column::Id.eq(villager_id))
        .filter(villager::Column::RemainingTrades.gte(times))
        .exec(db)
        .await?;
    Ok(result.rows_affected == 1)
}

/// Trades with a villager `times` times in one transaction.
///
/// The player pays every demand and receives every supply; any failure rolls
/// the whole trade back. Returns the offer as it was traded.
#[instrument(skip(db))]
pub async fn trade_with_villager<C>(
    db: &C,
    player_id: i64,
    villager_id: i64,
    times: i32,
) -> Result<VillagerOffer>
where
    C: ConnectionTrait + TransactionTrait,
{
    if times <= 0 {
        return Err(Error::InvalidAmount {
            amount: i64::from(times),
        });
    }

    let txn = db.begin().await?;
    let mut offer = get_villager(&txn, villager_id).await?;
    if !claim_trades(&txn, villager_id, times).await? {
        let remaining = Villager::find_by_id(villager_id)
            .one(&txn)
            .await?
            .map_or(0, |current| current.remaining_trades);
        return Err(Error::OutOfTrades {
            name: offer.villager.name.clone(),
            remaining,
        });
    }
    offer.villager.remaining_trades -= times;

    let times_i64 = i64::from(times);
    for demand in &offer.demands {
        apply_good(&txn, player_id, demand, -1, times_i64).await?;
    }
    for supply in &offer.supplies {
        apply_good(&txn, player_id, supply, 1, times_i64).await?;
    }

    txn.commit().await?;
    info!(villager = %offer.villager.name, times, "Villager trade complete");
    Ok(offer)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::ItemType;
    use crate::test_utils::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn wheat_for_copper(name: &str) -> VillagerPlan {
        VillagerPlan {
            name: name.to_string(),
            job: Job::Farmer,
            remaining_trades: 3,
            demands: vec![Good::Item {
                item: "Wheat",
                quantity: 4,
            }],
            supplies: vec![Good::Currency {
                currency: Currency::Copper,
                amount: 2,
            }],
        }
    }

    #[test]
    fn test_plan_villagers_rolls_within_templates() {
        let mut rng = StdRng::seed_from_u64(5);
        let names: Vec<String> = (0..20).map(|i| format!("Villager {i}")).collect();
        let config = VillagerConfig::default();

        let plans = plan_villagers(&mut rng, &names, &config);
        assert_eq!(plans.len(), 20);
        for plan in &plans {
            assert!((config.min_trades..=config.max_trades).contains(&plan.remaining_trades));
            assert!(!plan.demands.is_empty());
            assert!(!plan.supplies.is_empty());
            for good in plan.demands.iter().chain(&plan.supplies) {
                match good {
                    Good::Item { quantity, .. } => assert!(*quantity >= 1),
                    Good::Currency { amount, .. } => assert!(*amount >= 1),
                }
            }
        }
    }

    #[test]
    fn test_every_job_has_templates() {
        for job in ALL_JOBS {
            assert!(!templates_for(job).is_empty(), "{job} has no templates");
        }
    }

    #[test]
    fn test_templates_only_name_shipped_items() {
        let config = crate::config::game::load_config(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/config.toml"
        ))
        .unwrap();
        for job in ALL_JOBS {
            for template in templates_for(job) {
                for good in template.demands.iter().chain(template.supplies) {
                    if let GoodTemplate::Item(name, min, max) = good {
                        assert!(
                            config.items.iter().any(|item| item.name == *name),
                            "{name} is missing from config.toml"
                        );
                        assert!(min <= max);
                    }
                }
            }
        }
    }

    #[tokio::test]
    async fn test_replace_villagers_truncates_previous() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_item(&db, "Wheat", ItemType::Crop).await?;

        replace_villagers(&db, &[wheat_for_copper("Ada"), wheat_for_copper("Bo")]).await?;
        let stored = replace_villagers(&db, &[wheat_for_copper("Cy")]).await?;
        assert_eq!(stored, 1);

        let offers = list_villagers(&db).await?;
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].villager.name, "Cy");
        assert_eq!(offers[0].demands.len(), 1);
        assert_eq!(offers[0].supplies.len(), 1);
        assert_eq!(Trade::find().all(&db).await?.len(), 2);
        assert!(
            system_state::get_value(&db, system_state::LAST_VILLAGER_REFRESH_KEY)
                .await?
                .is_some()
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_replace_villagers_skips_unknown_items() -> Result<()> {
        let db = setup_test_db().await?;
        // "Wheat" is not in the catalog
        let stored = replace_villagers(&db, &[wheat_for_copper("Ada")]).await?;
        assert_eq!(stored, 0);
        assert!(list_villagers(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_trade_with_villager_moves_goods() -> Result<()> {
        let db = setup_with_player(1).await?;
        let wheat = create_test_item(&db, "Wheat", ItemType::Crop).await?;
        inventory::modify_item(&db, 1, InventoryType::Backpack, wheat.id, 10).await?;
        replace_villagers(&db, &[wheat_for_copper("Ada")]).await?;
        let villager_id = list_villagers(&db).await?[0].villager.id;

        trade_with_villager(&db, 1, villager_id, 2).await?;

        assert_eq!(
            inventory::get_quantity(&db, 1, InventoryType::Backpack, wheat.id).await?,
            2
        );
        assert_eq!(player::require_player(&db, 1).await?.copper, 4);
        assert_eq!(get_villager(&db, villager_id).await?.villager.remaining_trades, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_trade_rolls_back_when_player_cannot_pay() -> Result<()> {
        let db = setup_with_player(1).await?;
        let wheat = create_test_item(&db, "Wheat", ItemType::Crop).await?;
        inventory::modify_item(&db, 1, InventoryType::Backpack, wheat.id, 3).await?;
        replace_villagers(&db, &[wheat_for_copper("Ada")]).await?;
        let villager_id = list_villagers(&db).await?[0].villager.id;

        let result = trade_with_villager(&db, 1, villager_id, 1).await;
        assert!(matches!(result, Err(Error::MoveItem { .. })));
        assert_eq!(player::require_player(&db, 1).await?.copper, 0);
        assert_eq!(get_villager(&db, villager_id).await?.villager.remaining_trades, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_trade_limits() -> Result<()> {
        let db = setup_with_player(1).await?;
        create_test_item(&db, "Wheat", ItemType::Crop).await?;
        replace_villagers(&db, &[wheat_for_copper("Ada")]).await?;
        let villager_id = list_villagers(&db).await?[0].villager.id;

        let too_many = trade_with_villager(&db, 1, villager_id, 4).await;
        assert!(matches!(too_many, Err(Error::OutOfTrades { remaining: 3, .. })));

        let missing = trade_with_villager(&db, 1, villager_id + 100, 1).await;
        assert!(matches!(missing, Err(Error::VillagerNotFound { .. })));

        let zero = trade_with_villager(&db, 1, villager_id, 0).await;
        assert!(matches!(zero, Err(Error::InvalidAmount { amount: 0 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_last_trade_can_only_be_claimed_once() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_item(&db, "Wheat", ItemType::Crop).await?;
        replace_villagers(&db, &[VillagerPlan {
            remaining_trades: 1,
            ..wheat_for_copper("Ada")
        }])
        .await?;
        let villager_id = list_villagers(&db).await?[0].villager.id;

        // Both traders read one remaining trade before either claims it
        let seen_first = get_villager(&db, villager_id).await?.villager.remaining_trades;
        let seen_second = get_villager(&db, villager_id).await?.villager.remaining_trades;
        assert_eq!((seen_first, seen_second), (1, 1));

        assert!(claim_trades(&db, villager_id, 1).await?);
        assert!(!claim_trades(&db, villager_id, 1).await?);
        assert_eq!(get_villager(&db, villager_id).await?.villager.remaining_trades, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_trading_exhausts_villager() -> Result<()> {
        let db = setup_with_player(1).await?;
        let wheat = create_test_item(&db, "Wheat", ItemType::Crop).await?;
        inventory::modify_item(&db, 1, InventoryType::Backpack, wheat.id, 20).await?;
        replace_villagers(&db, &[wheat_for_copper("Ada")]).await?;
        let villager_id = list_villagers(&db).await?[0].villager.id;

        let offer = trade_with_villager(&db, 1, villager_id, 3).await?;
        assert_eq!(offer.villager.remaining_trades, 0);

        let again = trade_with_villager(&db, 1, villager_id, 1).await;
        assert!(matches!(again, Err(Error::OutOfTrades { remaining: 0, .. })));
        assert_eq!(
            inventory::get_quantity(&db, 1, InventoryType::Backpack, wheat.id).await?,
            8
        );
        assert_eq!(player::require_player(&db, 1).await?.copper, 6);
        Ok(())
    }
}
