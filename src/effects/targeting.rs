//! Target lookup and death resolution.
//!
//! `find_target` resolves an id against, in order: enemy field units, the
//! player avatar, player field units. Ids are globally unique, so the order
//! only matters as a tie-break contract.
//!
//! Death resolution is shared by every damage source:
//! - A unit at or below 0 HP leaves its slot immediately
//! - A dying enemy pays its cost in gold
//! - A dying player unit sends its source card to the discard pile

use serde::{Deserialize, Serialize};

use crate::core::{EntityId, FieldUnit, GameEvent, GameState};

/// Which row of the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Enemy,
}

/// A resolved target location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetRef {
    EnemyUnit { slot: usize },
    Player,
    PlayerUnit { slot: usize },
}

impl TargetRef {
    /// The field side and slot, if the target is a unit.
    #[must_use]
    pub fn unit_slot(self) -> Option<(Side, usize)> {
        match self {
            TargetRef::EnemyUnit { slot } => Some((Side::Enemy, slot)),
            TargetRef::PlayerUnit { slot } => Some((Side::Player, slot)),
            TargetRef::Player => None,
        }
    }
}

/// Resolve an id to a target location.
#[must_use]
pub fn find_target(state: &GameState, id: EntityId) -> Option<TargetRef> {
    if let Some(slot) = state.enemy_field.slot_of(id) {
        return Some(TargetRef::EnemyUnit { slot });
    }
    if state.player.id == id {
        return Some(TargetRef::Player);
    }
    state
        .player_field
        .slot_of(id)
        .map(|slot| TargetRef::PlayerUnit { slot })
}

/// Unit at a resolved location.
#[must_use]
pub fn unit_at(state: &GameState, side: Side, slot: usize) -> Option<&FieldUnit> {
    match side {
        Side::Player => state.player_field.get(slot),
        Side::Enemy => state.enemy_field.get(slot),
    }
}

fn unit_at_mut(state: &mut GameState, side: Side, slot: usize) -> Option<&mut FieldUnit> {
    match side {
        Side::Player => state.player_field.get_mut(slot),
        Side::Enemy => state.enemy_field.get_mut(slot),
    }
}

/// Outcome of damaging a unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageOutcome {
    /// Damage applied to the unit.
    pub dealt: i64,
    /// Damage beyond the unit's remaining HP.
    pub overkill: i64,
    pub killed: bool,
}

/// Damage the unit in a slot and resolve its death.
///
/// Returns `None` if the slot is empty.
pub fn damage_unit(state: &mut GameState, side: Side, slot: usize, amount: i64) -> Option<DamageOutcome> {
    let unit = unit_at_mut(state, side, slot)?;
    let overkill = unit.take_damage(amount);
    let dealt = amount.max(0) - overkill;
    let killed = resolve_death(state, side, slot).is_some();
    Some(DamageOutcome { dealt, overkill, killed })
}

/// Damage the player avatar. HP may drop below zero; the status check
/// turns that into `DEFEAT`.
pub fn damage_player(state: &mut GameState, amount: i64) {
    state.player.current_hp -= amount.max(0);
}

/// Remove the unit in a slot if it is dead, paying out its consequences.
///
/// Returns the removed unit.
pub fn resolve_death(state: &mut GameState, side: Side, slot: usize) -> Option<FieldUnit> {
    if unit_at(state, side, slot)?.is_alive() {
        return None;
    }
    let mut unit = match side {
        Side::Player => state.player_field.remove(slot)?,
        Side::Enemy => state.enemy_field.remove(slot)?,
    };

    state.events.push_back(GameEvent::UnitDied {
        unit_id: unit.id,
        card_id: unit.card_id,
        enemy: side == Side::Enemy,
    });
    match side {
        Side::Enemy => state.gain_gold(unit.cost),
        Side::Player => {
            if let Some(card) = unit.source_card.take() {
                state.discard.push_back(card);
            }
        }
    }
    Some(unit)
}
