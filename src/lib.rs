//! # card-gauntlet
//!
//! A server-authoritative, turn-based card battle engine. A player fights
//! an endless run of scaling enemy waves with a deck of unit and spell
//! cards, earns gold for every kill, and buys new cards between rounds.
//!
//! ## Design Principles
//!
//! 1. **Server-Authoritative**: Clients send commands and receive
//!    snapshots. Every rule is enforced here, identically for every client.
//!
//! 2. **Explicit Ownership**: One `Session` owns one `GameState` and lends
//!    it to a stateless `Engine` by `&mut`. No handler keeps its own copy.
//!
//! 3. **Data-Driven Effects**: Cards name an effect kind and a value. An
//!    `EffectRegistry` maps each kind to a handler.
//!
//! ## Architecture
//!
//! - **Validate, then mutate**: handlers check every precondition first,
//!   and the session restores a checkpoint on any failure anyway.
//!
//! - **Persistent Data Structures**: O(1) state checkpoints via `im-rs`.
//!
//! - **Deterministic**: a seeded ChaCha RNG drives shuffles and spawns, so
//!   a seed plus a command list replays a game exactly.
//!
//! ## Modules
//!
//! - `core`: Entity ids, RNG, configuration, errors, commands, events, state
//! - `zones`: The fixed five-slot field
//! - `cards`: Card definitions, instances, registry, built-in catalog
//! - `effects`: Effect kinds, targeting, and the handler registry
//! - `rules`: The engine: turn flow, actions, enemy AI, shop
//! - `session`: Sync session, snapshots, and the async paced handle

pub mod cards;
pub mod core;
pub mod effects;
pub mod rules;
pub mod session;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    Command, CommandError, CommandRecord, EntityId, ErrorCode, GameError, GameEvent, GameResult, GameRng,
    GameState, GameStatus, MergeSource, RulesConfig,
};

pub use crate::zones::{Field, FIELD_SLOTS};

pub use crate::cards::{CardDefinition, CardId, CardKind, CardRegistry, GameCard};

pub use crate::effects::{Effect, EffectHandler, EffectKind, EffectRegistry};

pub use crate::rules::{EnemyPhase, Engine};

pub use crate::session::{Session, SessionHandle, Snapshot};
