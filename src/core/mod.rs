//! Core engine types: ids, RNG, configuration, errors, commands, events, state.
//!
//! Everything here is independent of the concrete rules; handlers in
//! `rules` and `effects` mutate the `GameState` defined here.

pub mod action;
pub mod config;
pub mod entity;
pub mod error;
pub mod event;
pub mod rng;
pub mod state;

pub use action::{Command, CommandRecord, MergeSource};
pub use config::{ConfigError, DeckLimits, PacingConfig, RulesConfig, SpawnBand, SpawnConfig};
pub use entity::{EntityId, IdAllocator};
pub use error::{CommandError, ErrorCode, GameError, GameResult};
pub use event::{AttackLogEntry, GameEvent};
pub use rng::GameRng;
pub use state::{Entity, FieldUnit, GameState, GameStatus, ShopOffer};
