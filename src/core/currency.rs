//! Currency exchange between scrap metal and copper.
//!
//! The exchange has a fixed base rate (`scrap_per_copper`) and a random
//! spread that always favours the house: buying copper costs up to
//! `buy_spread` more scrap metal, selling copper yields up to `sell_spread`
//! less. The rate is rolled by the caller so the quote can be shown before
//! anything touches the database.

use crate::{
    config::game::ExchangeConfig,
    core::player,
    entities::Currency,
    errors::{Error, Result},
};
use rand::Rng;
use sea_orm::{ConnectionTrait, TransactionTrait};
use tracing::instrument;

/// Which way the exchange goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeDirection {
    /// Spend scrap metal, receive copper
    ScrapToCopper,
    /// Spend copper, receive scrap metal
    CopperToScrap,
}

impl ExchangeDirection {
    /// Currency the player gives up.
    #[must_use]
    pub const fn from_currency(self) -> Currency {
        match self {
            Self::ScrapToCopper => Currency::ScrapMetal,
            Self::CopperToScrap => Currency::Copper,
        }
    }

    /// Currency the player receives.
    #[must_use]
    pub const fn to_currency(self) -> Currency {
        match self {
            Self::ScrapToCopper => Currency::Copper,
            Self::CopperToScrap => Currency::ScrapMetal,
        }
    }
}

/// A priced exchange, ready to apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExchangeQuote {
    /// Direction of the exchange
    pub direction: ExchangeDirection,
    /// Scrap metal per copper used for this quote
    pub rate: f64,
    /// Amount of the source currency taken from the player
    pub amount_in: i64,
    /// Amount of the target currency given to the player
    pub amount_out: i64,
}

/// Rolls a scrap-per-copper rate for one exchange.
pub fn roll_rate<R: Rng + ?Sized>(
    rng: &mut R,
    config: &ExchangeConfig,
    direction: ExchangeDirection,
) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let base = config.scrap_per_copper as f64;
    let factor = match direction {
        ExchangeDirection::ScrapToCopper => 1.0 + rng.gen_range(0.0..=config.buy_spread),
        ExchangeDirection::CopperToScrap => 1.0 - rng.gen_range(0.0..=config.sell_spread),
    };
    base * factor
}

/// Prices exchanging `amount` of the direction's source currency at `rate`.
///
/// Buying copper only takes the scrap metal needed for whole copper coins;
/// the remainder stays with the player.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn quote(amount: i64, direction: ExchangeDirection, rate: f64) -> Result<ExchangeQuote> {
    if amount <= 0 || !rate.is_finite() || rate <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }

    let (amount_in, amount_out) = match direction {
        ExchangeDirection::ScrapToCopper => {
            let copper = (amount as f64 / rate).floor() as i64;
            let scrap = ((copper as f64) * rate).ceil() as i64;
            (scrap.min(amount), copper)
        }
        ExchangeDirection::CopperToScrap => (amount, (amount as f64 * rate).floor() as i64),
    };

    if amount_out <= 0 {
        return Err(Error::InvalidAmount { amount });
    }

    Ok(ExchangeQuote {
        direction,
        rate,
        amount_in,
        amount_out,
    })
}

/// Applies a quote to both balances in one transaction.
///
/// Returns the new `(source, target)` balances.
#[instrument(skip(db))]
pub async fn exchange<C>(db: &C, user_id: i64, quote: &ExchangeQuote) -> Result<(i64, i64)>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let source = player::modify_currency(
        &txn,
        user_id,
        quote.direction.from_currency(),
        -quote.amount_in,
    )
    .await?;
    let target = player::modify_currency(
        &txn,
        user_id,
        quote.direction.to_currency(),
        quote.amount_out,
    )
    .await?;
    txn.commit().await?;
    Ok((source, target))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_roll_rate_spread_is_asymmetric() {
        let config = ExchangeConfig::default();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let buy = roll_rate(&mut rng, &config, ExchangeDirection::ScrapToCopper);
            assert!((10.0..=12.5).contains(&buy));

            let sell = roll_rate(&mut rng, &config, ExchangeDirection::CopperToScrap);
            assert!((9.0..=10.0).contains(&sell));
        }
    }

    #[test]
    fn test_quote_scrap_to_copper_keeps_remainder() {
        let quote = quote(105, ExchangeDirection::ScrapToCopper, 10.0).unwrap();
        assert_eq!(quote.amount_out, 10);
        assert_eq!(quote.amount_in, 100);
    }

    #[test]
    fn test_quote_copper_to_scrap_rounds_down() {
        let quote = quote(3, ExchangeDirection::CopperToScrap, 9.5).unwrap();
        assert_eq!(quote.amount_in, 3);
        assert_eq!(quote.amount_out, 28);
    }

    #[test]
    fn test_quote_rejects_worthless_amounts() {
        assert!(matches!(
            quote(0, ExchangeDirection::CopperToScrap, 10.0),
            Err(Error::InvalidAmount { amount: 0 })
        ));
        assert!(matches!(
            quote(-5, ExchangeDirection::ScrapToCopper, 10.0),
            Err(Error::InvalidAmount { amount: -5 })
        ));
        // Not enough scrap metal for a single copper coin
        assert!(matches!(
            quote(9, ExchangeDirection::ScrapToCopper, 10.0),
            Err(Error::InvalidAmount { amount: 9 })
        ));
    }

    #[tokio::test]
    async fn test_exchange_moves_both_balances() -> Result<()> {
        let db = setup_with_player(1).await?;

        let quote = quote(50, ExchangeDirection::ScrapToCopper, 10.0)?;
        let (scrap, copper) = exchange(&db, 1, &quote).await?;
        assert_eq!(scrap, 50);
        assert_eq!(copper, 5);
        Ok(())
    }

    #[tokio::test]
    async fn test_exchange_without_funds_changes_nothing() -> Result<()> {
        let db = setup_with_player(1).await?;

        let quote = quote(5, ExchangeDirection::CopperToScrap, 10.0)?;
        let result = exchange(&db, 1, &quote).await;
        assert!(matches!(
            result,
            Err(Error::NegativeBalance {
                currency: Currency::Copper,
                ..
            })
        ));

        let player = player::require_player(&db, 1).await?;
        assert_eq!(player.scrap_metal, player::STARTING_SCRAP_METAL);
        assert_eq!(player.copper, 0);
        Ok(())
    }
}
