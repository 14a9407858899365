//! Player actions: play card, attack, activate ability, merge.
//!
//! Each action checks every precondition before its first write. Gold is
//! debited only once the action is known to succeed, so a rejected action
//! never charges the player.

use tracing::debug;

use super::engine::Engine;
use crate::cards::CardKind;
use crate::core::{
    AttackLogEntry, EntityId, FieldUnit, GameError, GameEvent, GameResult, GameState, MergeSource,
};
use crate::effects::targeting::{self, Side, TargetRef};
use crate::effects::EffectContext;

/// Stats absorbed by the target of a merge.
struct Absorbed {
    id: EntityId,
    attack: i64,
    max_hp: i64,
    current_hp: i64,
    stack: u32,
}

impl Engine {
    /// Play the card at `hand_index`.
    ///
    /// Units are summoned into the first empty player slot and keep their
    /// card until they die. Spells resolve through the effect registry and
    /// their card goes to the discard pile.
    pub fn play_card(&self, state: &mut GameState, hand_index: usize, target_id: Option<EntityId>) -> GameResult<()> {
        Self::ensure_playing(state)?;
        let card = state
            .hand
            .get(hand_index)
            .cloned()
            .ok_or(GameError::HandIndexOutOfRange { index: hand_index })?;
        let def = self.cards.require(card.card_id)?;
        state.ensure_gold(def.cost)?;

        match &def.kind {
            CardKind::Unit(_) => {
                let slot = state.player_field.first_empty().ok_or(GameError::FieldFull)?;
                let unit = FieldUnit::from_card(card.clone(), def)
                    .ok_or_else(|| GameError::Internal(format!("{} has no unit stats", def.id)))?;

                state.spend_gold(def.cost)?;
                state.hand.remove(hand_index);
                state
                    .player_field
                    .place(slot, unit)
                    .map_err(|_| GameError::Internal(format!("slot {} is occupied", slot)))?;
                state.events.push_back(GameEvent::CardPlayed {
                    instance_id: card.instance_id,
                    card_id: card.card_id,
                });
                state.events.push_back(GameEvent::UnitSummoned {
                    unit_id: card.instance_id,
                    slot,
                });
                debug!(card = %def.name, slot, gold = state.gold, "unit summoned");
            }
            CardKind::Spell { effect } => {
                let ctx = EffectContext::for_spell(&self.cards, &self.config, effect, card.instance_id, target_id);
                let target = self.effects.validate(&ctx, state)?;

                state.spend_gold(def.cost)?;
                state.hand.remove(hand_index);
                state.events.push_back(GameEvent::CardPlayed {
                    instance_id: card.instance_id,
                    card_id: card.card_id,
                });
                state.discard.push_back(card);
                self.effects.apply(&ctx, state, target)?;
                debug!(card = %def.name, gold = state.gold, "spell resolved");
            }
        }
        Ok(())
    }

    /// A player unit attacks an enemy unit. No overkill spill.
    pub fn attack(&self, state: &mut GameState, attacker_id: EntityId, target_id: EntityId) -> GameResult<()> {
        Self::ensure_playing(state)?;
        let attacker_slot = state
            .player_field
            .slot_of(attacker_id)
            .ok_or(GameError::CardNotOnField(attacker_id))?;
        let power = match state.player_field.get(attacker_slot) {
            Some(unit) if unit.has_attacked => return Err(GameError::AlreadyAttacked(attacker_id)),
            Some(unit) => unit.attack,
            None => return Err(GameError::CardNotOnField(attacker_id)),
        };

        let target_slot = match targeting::find_target(state, target_id) {
            Some(TargetRef::EnemyUnit { slot }) => slot,
            Some(_) => return Err(GameError::AttackEnemyOnly),
            None => return Err(GameError::TargetNotFound(target_id)),
        };

        if let Some(unit) = state.player_field.get_mut(attacker_slot) {
            unit.has_attacked = true;
        }
        let outcome = targeting::damage_unit(state, Side::Enemy, target_slot, power);
        state
            .attack_log
            .push_back(AttackLogEntry::new(attacker_id, target_id, power));
        debug!(
            attacker = %attacker_id,
            target = %target_id,
            damage = power,
            killed = outcome.is_some_and(|o| o.killed),
            "player attack"
        );
        Ok(())
    }

    /// Activate ability `ability_index` of a player field unit.
    ///
    /// A unit may activate at most one ability per turn.
    pub fn activate_ability(
        &self,
        state: &mut GameState,
        unit_id: EntityId,
        ability_index: usize,
        target_id: Option<EntityId>,
    ) -> GameResult<()> {
        Self::ensure_playing(state)?;
        let unit = state
            .player_field
            .find(unit_id)
            .ok_or(GameError::CardNotOnField(unit_id))?;
        let ability = unit
            .abilities
            .get(ability_index)
            .cloned()
            .ok_or(GameError::InvalidAbility {
                unit: unit_id,
                index: ability_index,
            })?;
        if unit.ability_used {
            return Err(GameError::AbilityAlreadyUsed(unit_id));
        }
        state.ensure_gold(ability.cost)?;

        let ctx = EffectContext::for_ability(&self.cards, &self.config, &ability.effect, unit_id, target_id);
        let target = self.effects.validate(&ctx, state)?;

        state.spend_gold(ability.cost)?;
        if let Some(unit) = state.player_field.find_mut(unit_id) {
            unit.ability_used = true;
        }
        self.effects.apply(&ctx, state, target)?;
        debug!(unit = %unit_id, ability = %ability.name, "ability activated");
        Ok(())
    }

    /// Merge a same-card unit from hand or field into a player field unit.
    ///
    /// From hand costs the card's gold cost; from field is free and empties
    /// the source slot. The absorbed card goes to the exhaust pile.
    pub fn merge_units(&self, state: &mut GameState, source: MergeSource, target_id: EntityId) -> GameResult<()> {
        Self::ensure_playing(state)?;
        let target_slot = state
            .player_field
            .slot_of(target_id)
            .ok_or(GameError::CardNotOnField(target_id))?;
        let target_card = state
            .player_field
            .get(target_slot)
            .map(|u| u.card_id)
            .ok_or(GameError::CardNotOnField(target_id))?;

        let absorbed = match source {
            MergeSource::Hand { index } => {
                let card = state
                    .hand
                    .get(index)
                    .cloned()
                    .ok_or(GameError::HandIndexOutOfRange { index })?;
                let def = self.cards.require(card.card_id)?;
                let stats = def
                    .unit_stats()
                    .ok_or(GameError::InvalidMerge("only unit cards can merge"))?;
                if card.card_id != target_card {
                    return Err(GameError::InvalidMerge("units must share a card"));
                }
                state.spend_gold(def.cost)?;

                state.hand.remove(index);
                let absorbed = Absorbed {
                    id: card.instance_id,
                    attack: stats.attack,
                    max_hp: stats.max_hp,
                    current_hp: stats.max_hp,
                    stack: 1,
                };
                state.exhaust.push_back(card);
                absorbed
            }
            MergeSource::Field { unit_id } => {
                if unit_id == target_id {
                    return Err(GameError::InvalidMerge("a unit cannot merge into itself"));
                }
                let source_slot = state
                    .player_field
                    .slot_of(unit_id)
                    .ok_or(GameError::CardNotOnField(unit_id))?;
                if state.player_field.get(source_slot).map(|u| u.card_id) != Some(target_card) {
                    return Err(GameError::InvalidMerge("units must share a card"));
                }

                let mut unit = state
                    .player_field
                    .remove(source_slot)
                    .ok_or(GameError::CardNotOnField(unit_id))?;
                if let Some(card) = unit.source_card.take() {
                    state.exhaust.push_back(card);
                }
                Absorbed {
                    id: unit.id,
                    attack: unit.attack,
                    max_hp: unit.max_hp,
                    current_hp: unit.current_hp,
                    stack: unit.stack,
                }
            }
        };

        let target = state
            .player_field
            .get_mut(target_slot)
            .ok_or(GameError::CardNotOnField(target_id))?;
        target.max_hp += absorbed.max_hp;
        target.attack += absorbed.attack;
        target.current_hp = (target.current_hp + absorbed.current_hp).min(target.max_hp);
        target.stack += absorbed.stack.max(1);
        let stack = target.stack;

        state.events.push_back(GameEvent::UnitsMerged {
            source_id: absorbed.id,
            target_id,
            stack,
        });
        debug!(source = %absorbed.id, target = %target_id, stack, "units merged");
        Ok(())
    }
}
