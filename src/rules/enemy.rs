//! Enemy waves and enemy AI.
//!
//! ## Spawning
//!
//! Wave size comes from the round's band in `SpawnConfig`. Slots are picked
//! by shuffling the free slot indices and taking the first N. Templates are
//! drawn from the round's cost band (the whole unit catalog if the band is
//! empty), and every unit is scaled by the round tier plus a chance of one
//! elite stack.
//!
//! ## Attacks
//!
//! Each live enemy, in slot order, attacks the player unit with the lowest
//! current HP (ties go to the lowest slot). With no player units on the
//! field it attacks the avatar. Overkill from a killing blow carries over
//! to the avatar.

use tracing::debug;

use super::engine::Engine;
use crate::core::{AttackLogEntry, FieldUnit, GameEvent, GameState};
use crate::effects::targeting::{self, Side};
use crate::zones::{Field, FIELD_SLOTS};

/// Slot of the player unit an enemy attacks next.
#[must_use]
pub fn pick_target(field: &Field) -> Option<usize> {
    field
        .units()
        .min_by_key(|(slot, unit)| (unit.current_hp, *slot))
        .map(|(slot, _)| slot)
}

impl Engine {
    /// Populate free enemy slots for the current round. Returns the number
    /// of units spawned.
    pub fn spawn_wave(&self, state: &mut GameState) -> usize {
        let spawn = &self.config.spawn;
        let round = state.round;

        let mut slots: Vec<usize> = (0..FIELD_SLOTS).filter(|&s| state.enemy_field.get(s).is_none()).collect();
        let (min, max) = spawn.band_for(round);
        let count = usize::try_from(state.rng.gen_range_inclusive(min, max))
            .unwrap_or(0)
            .min(slots.len());
        state.rng.shuffle(&mut slots);

        let (min_cost, max_cost) = spawn.cost_band(round);
        let mut pool = self.cards.units_in_cost_band(min_cost, max_cost);
        if pool.is_empty() {
            pool = self.cards.unit_templates();
        }
        let tier = spawn.tier(round);

        let mut spawned = 0;
        for &slot in slots.iter().take(count) {
            let Some(def) = state.rng.choose(&pool).copied() else {
                break;
            };
            let elite = state.rng.gen_bool(spawn.elite_chance);
            let id = state.ids.alloc();
            let Some(unit) = FieldUnit::enemy(id, def, tier + u32::from(elite)) else {
                continue;
            };
            if state.enemy_field.place(slot, unit).is_ok() {
                spawned += 1;
                if !state.encountered.contains(&def.id) {
                    state.encountered.push_back(def.id);
                }
            }
        }

        state.events.push_back(GameEvent::WaveSpawned { round, count: spawned });
        debug!(round, tier, spawned, "wave spawned");
        spawned
    }

    /// Every live enemy attacks once.
    pub fn resolve_enemy_attacks(&self, state: &mut GameState) {
        let attackers: Vec<_> = state
            .enemy_field
            .units()
            .map(|(_, unit)| (unit.id, unit.attack))
            .collect();

        for (attacker_id, power) in attackers {
            if !state.player.is_alive() {
                break;
            }

            match pick_target(&state.player_field) {
                Some(slot) => {
                    let Some(target_id) = state.player_field.get(slot).map(|u| u.id) else {
                        continue;
                    };
                    let outcome = targeting::damage_unit(state, Side::Player, slot, power);
                    state
                        .attack_log
                        .push_back(AttackLogEntry::new(attacker_id, target_id, power));

                    let overkill = outcome.map_or(0, |o| o.overkill);
                    if overkill > 0 {
                        targeting::damage_player(state, overkill);
                        state
                            .attack_log
                            .push_back(AttackLogEntry::new(attacker_id, state.player.id, overkill));
                    }
                    debug!(attacker = %attacker_id, target = %target_id, damage = power, overkill, "enemy attack");
                }
                None => {
                    targeting::damage_player(state, power);
                    state
                        .attack_log
                        .push_back(AttackLogEntry::new(attacker_id, state.player.id, power));
                    debug!(attacker = %attacker_id, damage = power, hp = state.player.current_hp, "enemy hits player");
                }
            }
        }
    }
}
