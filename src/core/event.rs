//! Attack log and event log entries.
//!
//! Both logs are append-only within a turn and reset when a new turn (or
//! the enemy turn) begins. Presentation layers replay them to animate what
//! happened between two snapshots.

use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use super::state::GameStatus;
use crate::cards::CardId;
use crate::effects::EffectKind;

/// One resolved attack.
///
/// Overkill carried to the player avatar is logged as a second entry with
/// the avatar as target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackLogEntry {
    pub attacker_id: EntityId,
    pub target_id: EntityId,
    pub damage: i64,
}

impl AttackLogEntry {
    #[must_use]
    pub fn new(attacker_id: EntityId, target_id: EntityId, damage: i64) -> Self {
        Self {
            attacker_id,
            target_id,
            damage,
        }
    }
}

/// Something that happened during a command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GameEvent {
    CardPlayed { instance_id: EntityId, card_id: CardId },
    UnitSummoned { unit_id: EntityId, slot: usize },
    UnitDied { unit_id: EntityId, card_id: CardId, enemy: bool },
    UnitTransformed { unit_id: EntityId, into: CardId },
    UnitsMerged { source_id: EntityId, target_id: EntityId, stack: u32 },
    EffectResolved { kind: EffectKind, target_id: Option<EntityId> },
    GoldGained { amount: u32 },
    GoldSpent { amount: u32 },
    CardsDrawn { count: usize },
    WaveSpawned { round: u32, count: usize },
    CardBought { card_id: CardId, instance_id: EntityId },
    StatusChanged { from: GameStatus, to: GameStatus },
}
