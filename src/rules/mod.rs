//! Game rules.
//!
//! `Engine` implements every rule of the game as methods spread over:
//! - `engine`: status evaluation and turn/round flow
//! - `actions`: play card, attack, activate ability, merge
//! - `enemy`: wave spawning and enemy AI
//! - `shop`: offers and purchases
//!
//! The engine holds no per-game data. Callers own the `GameState`.

mod actions;
pub mod enemy;
pub mod engine;
mod shop;

pub use enemy::pick_target;
pub use engine::{EnemyPhase, Engine};
