//! Unified error type for the bot.
//!
//! Domain variants describe a rule the player broke and are rendered to them
//! as-is; everything else is unexpected and goes to the log channel.

use crate::entities::{Currency, InventoryType};
use thiserror::Error;

/// Every failure the bot can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Any `SeaORM` failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// An external API answered with something unusable
    #[error("{service} is unavailable: {message}")]
    ExternalService {
        /// Human-readable service name
        service: &'static str,
        /// What went wrong
        message: String,
    },

    /// Amount or quantity outside the accepted range
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: i64,
    },

    /// A currency change would have made a balance negative
    #[error("Not enough {currency}: you have {current}, but {required} is needed")]
    NegativeBalance {
        /// Currency that ran short
        currency: Currency,
        /// Balance before the change
        current: i64,
        /// Amount the change needed
        required: i64,
    },

    /// An inventory change was rejected
    #[error("Cannot move item: {reason}")]
    MoveItem {
        /// Why the move failed
        reason: String,
    },

    /// The destination inventory has no free slot for a new item
    #[error("Your {inventory} is full ({limit} slots)")]
    SlotLimit {
        /// Inventory that overflowed
        inventory: InventoryType,
        /// Its slot cap
        limit: u64,
    },

    /// No catalog item with this name
    #[error("Item not found: {name}")]
    ItemNotFound {
        /// The name that was looked up
        name: String,
    },

    /// The item has no price for the requested action
    #[error("{name} cannot be {action}")]
    NotTradable {
        /// Item name
        name: String,
        /// `"bought"`, `"sold"` or `"eaten"`
        action: &'static str,
    },

    /// No villager with this id
    #[error("Villager #{id} not found, the villagers may have moved on")]
    VillagerNotFound {
        /// The id that was looked up
        id: i64,
    },

    /// The villager has fewer trades left than requested
    #[error("{name} only has {remaining} trades left")]
    OutOfTrades {
        /// Villager name
        name: String,
        /// Trades left
        remaining: i32,
    },

    /// A farm action was rejected
    #[error("Farm error: {reason}")]
    Farm {
        /// Why the action failed
        reason: String,
    },

    /// The player's hunger is too low for the action
    #[error("You are too hungry to do that (hunger {hunger}, need {required})")]
    TooHungry {
        /// Current hunger
        hunger: i32,
        /// Hunger the action costs
        required: i32,
    },

    /// The user has not registered with `/start`
    #[error("You have not started playing yet, use `/start` first")]
    NeedsOnboarding {
        /// Discord user id
        user_id: i64,
    },

    /// `/start` was used twice
    #[error("You have already started playing")]
    AlreadyRegistered {
        /// Discord user id
        user_id: i64,
    },

    /// The command was disabled by an administrator
    #[error("`/{name}` is currently disabled{}", .reason.as_ref().map(|r| format!(": {r}")).unwrap_or_default())]
    CommandDisabled {
        /// Qualified command name
        name: String,
        /// Optional administrator note
        reason: Option<String>,
    },

    /// Another command of the same player is still running
    #[error("You are already running a command, wait for it to finish")]
    CommandAlreadyRunning,

    /// Missing environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Integer conversion failure (Discord ids, counts)
    #[error("Integer conversion error: {0}")]
    TryFromInt(#[from] std::num::TryFromIntError),

    /// Formatting failure while building a message
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Serenity/Poise failure
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl Error {
    /// Whether the error is a game rule the player should simply be told about.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount { .. }
                | Self::NegativeBalance { .. }
                | Self::MoveItem { .. }
                | Self::SlotLimit { .. }
                | Self::ItemNotFound { .. }
                | Self::NotTradable { .. }
                | Self::VillagerNotFound { .. }
                | Self::OutOfTrades { .. }
                | Self::Farm { .. }
                | Self::TooHungry { .. }
                | Self::NeedsOnboarding { .. }
                | Self::AlreadyRegistered { .. }
                | Self::CommandDisabled { .. }
                | Self::CommandAlreadyRunning
        )
    }

    /// Whether the error came from a lost or unavailable database connection.
    #[must_use]
    pub const fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Database(sea_orm::DbErr::Conn(_) | sea_orm::DbErr::ConnectionAcquire(_))
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_are_user_facing() {
        assert!(Error::CommandAlreadyRunning.is_user_facing());
        assert!(Error::InvalidAmount { amount: -1 }.is_user_facing());
        assert!(
            !Error::Config {
                message: "broken".to_string()
            }
            .is_user_facing()
        );
    }

    #[test]
    fn test_command_disabled_message_includes_reason() {
        let with_reason = Error::CommandDisabled {
            name: "farm harvest".to_string(),
            reason: Some("maintenance".to_string()),
        };
        assert_eq!(
            with_reason.to_string(),
            "`/farm harvest` is currently disabled: maintenance"
        );

        let without_reason = Error::CommandDisabled {
            name: "trade".to_string(),
            reason: None,
        };
        assert_eq!(without_reason.to_string(), "`/trade` is currently disabled");
    }

    #[test]
    fn test_negative_balance_message() {
        let err = Error::NegativeBalance {
            currency: Currency::Copper,
            current: 3,
            required: 10,
        };
        assert_eq!(
            err.to_string(),
            "Not enough copper: you have 3, but 10 is needed"
        );
    }
}
