//! Error types for game commands.
//!
//! Handlers return `GameError`, which carries context for logs. At the
//! session boundary every error collapses to a `CommandError`: a code from
//! the closed `ErrorCode` taxonomy plus a human-readable message. The
//! external contract never depends on which internal failure occurred.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entity::EntityId;
use crate::cards::CardId;

/// Closed error taxonomy exposed to clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    GameNotStarted,
    GameAlreadyStarted,
    GameOver,
    NotYourTurn,
    NotEnemyTurn,
    GameNotInShop,
    RoundNotCleared,
    CardNotFound,
    CardNotOnField,
    FieldFull,
    HandFull,
    NotEnoughGold,
    AlreadyAttacked,
    AbilityAlreadyUsed,
    TargetNotFound,
    TargetRequired,
    AttackEnemyOnly,
    InvalidTarget,
    InvalidAbility,
    InvalidMerge,
    InvalidDeck,
    InvalidShopIndex,
    MaxCopiesPerCard,
    UnknownError,
}

/// Errors raised by command handlers.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("no game has been started")]
    GameNotStarted,

    #[error("a game is already in progress")]
    GameAlreadyStarted,

    #[error("the game is over")]
    GameOver,

    #[error("it is not the player's turn")]
    NotYourTurn,

    #[error("it is not the enemy's turn")]
    NotEnemyTurn,

    #[error("the shop is not open")]
    GameNotInShop,

    #[error("the round has not been cleared")]
    RoundNotCleared,

    #[error("no card at hand index {index}")]
    HandIndexOutOfRange { index: usize },

    #[error("card {0} is not in the catalog")]
    UnknownCard(CardId),

    #[error("{0} is not a unit on the player's field")]
    CardNotOnField(EntityId),

    #[error("the field is full")]
    FieldFull,

    #[error("the hand is full")]
    HandFull,

    #[error("not enough gold: have {have}, need {need}")]
    NotEnoughGold { have: u32, need: u32 },

    #[error("{0} has already attacked this turn")]
    AlreadyAttacked(EntityId),

    #[error("{0} has already used an ability this turn")]
    AbilityAlreadyUsed(EntityId),

    #[error("target {0} not found")]
    TargetNotFound(EntityId),

    #[error("this effect requires a target")]
    TargetRequired,

    #[error("attacks may only target enemy units")]
    AttackEnemyOnly,

    #[error("invalid target {0} for this effect")]
    InvalidTarget(EntityId),

    #[error("unit {unit} has no ability at index {index}")]
    InvalidAbility { unit: EntityId, index: usize },

    #[error("cannot merge: {0}")]
    InvalidMerge(&'static str),

    #[error("invalid deck: {0}")]
    InvalidDeck(String),

    #[error("no shop offer at index {index}")]
    InvalidShopIndex { index: usize },

    #[error("deck already holds the maximum {limit} copies of {card}")]
    MaxCopiesPerCard { card: CardId, limit: usize },

    #[error("internal error: {0}")]
    Internal(String),
}

impl GameError {
    /// Map to the external error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            GameError::GameNotStarted => ErrorCode::GameNotStarted,
            GameError::GameAlreadyStarted => ErrorCode::GameAlreadyStarted,
            GameError::GameOver => ErrorCode::GameOver,
            GameError::NotYourTurn => ErrorCode::NotYourTurn,
            GameError::NotEnemyTurn => ErrorCode::NotEnemyTurn,
            GameError::GameNotInShop => ErrorCode::GameNotInShop,
            GameError::RoundNotCleared => ErrorCode::RoundNotCleared,
            GameError::HandIndexOutOfRange { .. } | GameError::UnknownCard(_) => ErrorCode::CardNotFound,
            GameError::CardNotOnField(_) => ErrorCode::CardNotOnField,
            GameError::FieldFull => ErrorCode::FieldFull,
            GameError::HandFull => ErrorCode::HandFull,
            GameError::NotEnoughGold { .. } => ErrorCode::NotEnoughGold,
            GameError::AlreadyAttacked(_) => ErrorCode::AlreadyAttacked,
            GameError::AbilityAlreadyUsed(_) => ErrorCode::AbilityAlreadyUsed,
            GameError::TargetNotFound(_) => ErrorCode::TargetNotFound,
            GameError::TargetRequired => ErrorCode::TargetRequired,
            GameError::AttackEnemyOnly => ErrorCode::AttackEnemyOnly,
            GameError::InvalidTarget(_) => ErrorCode::InvalidTarget,
            GameError::InvalidAbility { .. } => ErrorCode::InvalidAbility,
            GameError::InvalidMerge(_) => ErrorCode::InvalidMerge,
            GameError::InvalidDeck(_) => ErrorCode::InvalidDeck,
            GameError::InvalidShopIndex { .. } => ErrorCode::InvalidShopIndex,
            GameError::MaxCopiesPerCard { .. } => ErrorCode::MaxCopiesPerCard,
            GameError::Internal(_) => ErrorCode::UnknownError,
        }
    }
}

/// Result type alias for command handlers.
pub type GameResult<T> = Result<T, GameError>;

/// Error returned across the session boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{code:?}: {message}")]
pub struct CommandError {
    pub code: ErrorCode,
    pub message: String,
}

impl CommandError {
    /// The error reported when an internal fault was caught.
    #[must_use]
    pub fn unknown(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::UnknownError,
            message: message.into(),
        }
    }
}

impl From<GameError> for CommandError {
    fn from(err: GameError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
        }
    }
}
