//! Item catalog operations.
//!
//! The catalog is seeded from `config.toml`; gameplay only ever reads it.

use crate::{
    config::game::ItemConfig,
    entities::{Item, ItemType, item},
    errors::{Error, Result},
};
use rand::Rng;
use sea_orm::{
    QueryOrder, QuerySelect, Set,
    prelude::*,
    sea_query::{Expr, Func, LikeExpr},
};
use tracing::{info, instrument};

/// Inserts catalog items that are missing by name; existing rows are left alone.
///
/// Returns the number of inserted items.
#[instrument(skip_all, fields(configured = items.len()))]
pub async fn seed_items<C>(db: &C, items: &[ItemConfig]) -> Result<usize>
where
    C: ConnectionTrait,
{
    let mut inserted = 0;
    for config in items {
        if find_by_name(db, &config.name).await?.is_some() {
            continue;
        }

        item::ActiveModel {
            name: Set(config.name.clone()),
            description: Set(config.description.clone()),
            rarity: Set(config.rarity),
            item_type: Set(config.item_type),
            buy_price: Set(config.buy_price),
            sell_price: Set(config.sell_price),
            trade_price: Set(config.trade_price),
            emoji: Set(config.emoji.clone()),
            min_food_value: Set(config.min_food_value),
            max_food_value: Set(config.max_food_value),
            ..Default::default()
        }
        .insert(db)
        .await?;
        inserted += 1;
    }

    info!(inserted, "Item catalog seeded");
    Ok(inserted)
}

/// Finds an item by name, ignoring case.
pub async fn find_by_name<C>(db: &C, name: &str) -> Result<Option<item::Model>>
where
    C: ConnectionTrait,
{
    Item::find()
        .filter(Expr::expr(Func::lower(Expr::col(item::Column::Name))).eq(name.trim().to_lowercase()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an item by name, failing with `ItemNotFound`.
pub async fn get_item_by_name<C>(db: &C, name: &str) -> Result<item::Model>
where
    C: ConnectionTrait,
{
    find_by_name(db, name)
        .await?
        .ok_or_else(|| Error::ItemNotFound {
            name: name.to_string(),
        })
}

/// Finds an item by its id.
pub async fn get_item_by_id<C>(db: &C, item_id: i32) -> Result<Option<item::Model>>
where
    C: ConnectionTrait,
{
    Item::find_by_id(item_id).one(db).await.map_err(Into::into)
}

/// Escapes `LIKE` wildcards so user input only matches literally.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Items whose name contains `partial`, ignoring case, alphabetically.
pub async fn search_items<C>(db: &C, partial: &str, limit: u64) -> Result<Vec<item::Model>>
where
    C: ConnectionTrait,
{
    let pattern = format!("%{}%", escape_like(&partial.trim().to_lowercase()));
    Item::find()
        .filter(
            Expr::expr(Func::lower(Expr::col(item::Column::Name)))
                .like(LikeExpr::new(pattern).escape('\\')),
        )
        .order_by_asc(item::Column::Name)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// The whole catalog, optionally restricted to one item type.
pub async fn list_items<C>(db: &C, item_type: Option<ItemType>) -> Result<Vec<item::Model>>
where
    C: ConnectionTrait,
{
    let mut query = Item::find();
    if let Some(item_type) = item_type {
        query = query.filter(item::Column::ItemType.eq(item_type));
    }
    query
        .order_by_asc(item::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Rolls how much hunger eating `food` restores, `None` for non-food items.
pub fn roll_food_value<R: Rng + ?Sized>(rng: &mut R, food: &item::Model) -> Option<i32> {
    if food.item_type != ItemType::Food {
        return None;
    }
    match (food.min_food_value, food.max_food_value) {
        (Some(min), Some(max)) if min <= max => Some(rng.gen_range(min..=max)),
        (Some(value), None) | (None, Some(value)) => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::Rarity;
    use crate::test_utils::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn item_config(name: &str) -> ItemConfig {
        ItemConfig {
            name: name.to_string(),
            description: String::new(),
            rarity: Rarity::Common,
            item_type: ItemType::Material,
            buy_price: Some(4),
            sell_price: Some(2),
            trade_price: None,
            emoji: "🔧".to_string(),
            min_food_value: None,
            max_food_value: None,
        }
    }

    #[tokio::test]
    async fn test_seed_items_skips_existing() -> Result<()> {
        let db = setup_test_db().await?;
        let configs = vec![item_config("Wrench"), item_config("Copper Wire")];

        assert_eq!(seed_items(&db, &configs).await?, 2);
        assert_eq!(seed_items(&db, &configs).await?, 0);
        assert_eq!(list_items(&db, None).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_find_by_name_ignores_case() -> Result<()> {
        let db = setup_test_db().await?;
        seed_items(&db, &[item_config("Copper Wire")]).await?;

        let found = find_by_name(&db, "copper wire").await?.unwrap();
        assert_eq!(found.name, "Copper Wire");

        let missing = get_item_by_name(&db, "Plutonium").await;
        assert!(matches!(missing, Err(Error::ItemNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_search_items_matches_substring() -> Result<()> {
        let db = setup_test_db().await?;
        seed_items(
            &db,
            &[item_config("Copper Wire"), item_config("Wrench"), item_config("Barbed Wire")],
        )
        .await?;

        let names: Vec<String> = search_items(&db, "WIRE", 25)
            .await?
            .into_iter()
            .map(|item| item.name)
            .collect();
        assert_eq!(names, vec!["Barbed Wire", "Copper Wire"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_search_items_treats_wildcards_literally() -> Result<()> {
        let db = setup_test_db().await?;
        seed_items(
            &db,
            &[item_config("Copper Wire"), item_config("Pipe_Wrench"), item_config("100% Juice")],
        )
        .await?;

        let names = |items: Vec<item::Model>| items.into_iter().map(|item| item.name).collect::<Vec<_>>();
        assert_eq!(names(search_items(&db, "_", 25).await?), vec!["Pipe_Wrench"]);
        assert_eq!(names(search_items(&db, "%", 25).await?), vec!["100% Juice"]);
        assert!(search_items(&db, "c_pper", 25).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_list_items_filters_by_type() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_item(&db, "Bread", ItemType::Food).await?;
        create_test_item(&db, "Pipe", ItemType::Material).await?;

        let food = list_items(&db, Some(ItemType::Food)).await?;
        assert_eq!(food.len(), 1);
        assert_eq!(food[0].name, "Bread");
        Ok(())
    }

    #[tokio::test]
    async fn test_roll_food_value_within_range() -> Result<()> {
        let db = setup_test_db().await?;
        let bread = create_test_item(&db, "Bread", ItemType::Food).await?;
        let pipe = create_test_item(&db, "Pipe", ItemType::Material).await?;
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..50 {
            let value = roll_food_value(&mut rng, &bread).unwrap();
            assert!((10..=20).contains(&value));
        }
        assert_eq!(roll_food_value(&mut rng, &pipe), None);
        Ok(())
    }
}
