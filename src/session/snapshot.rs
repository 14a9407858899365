//! Immutable state snapshots.
//!
//! A `Snapshot` is what leaves the session after every accepted command.
//! It owns its data, so nothing a client does with it can reach back into
//! the live `GameState`. The draw pile is reported as a count only.

use serde::{Deserialize, Serialize};

use crate::cards::GameCard;
use crate::core::{AttackLogEntry, Entity, FieldUnit, GameEvent, GameState, GameStatus, ShopOffer};

/// Client-facing view of one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub status: GameStatus,
    pub round: u32,
    pub turn: u32,
    pub gold: u32,
    pub player: Entity,
    /// Always one entry per slot.
    pub player_field: Vec<Option<FieldUnit>>,
    pub enemy_field: Vec<Option<FieldUnit>>,
    pub hand: Vec<GameCard>,
    pub deck_count: usize,
    pub discard: Vec<GameCard>,
    pub exhaust_count: usize,
    pub shop: Vec<ShopOffer>,
    pub attack_log: Vec<AttackLogEntry>,
    pub events: Vec<GameEvent>,
}

impl Snapshot {
    /// Capture the current state.
    #[must_use]
    pub fn from_state(state: &GameState) -> Self {
        Self {
            status: state.status,
            round: state.round,
            turn: state.turn,
            gold: state.gold,
            player: state.player.clone(),
            player_field: state.player_field.slots().to_vec(),
            enemy_field: state.enemy_field.slots().to_vec(),
            hand: state.hand.iter().cloned().collect(),
            deck_count: state.deck.len(),
            discard: state.discard.iter().cloned().collect(),
            exhaust_count: state.exhaust.len(),
            shop: state.shop.iter().cloned().collect(),
            attack_log: state.attack_log.iter().cloned().collect(),
            events: state.events.iter().cloned().collect(),
        }
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Live units on the player's field.
    pub fn player_units(&self) -> impl Iterator<Item = &FieldUnit> {
        self.player_field.iter().flatten()
    }

    /// Live units on the enemy field.
    pub fn enemy_units(&self) -> impl Iterator<Item = &FieldUnit> {
        self.enemy_field.iter().flatten()
    }
}
