//! Enemy wave scaling tests.
//!
//! These tests sweep rounds across the band and tier thresholds:
//! - Wave size per round band
//! - Cost band and stack multiplier per tier
//! - Fallback to the full catalog when a cost band is empty
//! - Same seed, same wave

use std::sync::Arc;

use card_gauntlet::cards::catalog::standard_registry;
use card_gauntlet::cards::{CardDefinition, CardId, CardRegistry};
use card_gauntlet::core::{GameState, RulesConfig};
use card_gauntlet::rules::Engine;

fn spawn_at(engine: &Engine, round: u32, seed: u64) -> GameState {
    let mut state = GameState::new(engine.config(), seed);
    state.round = round;
    engine.spawn_wave(&mut state);
    state
}

/// Test wave sizes at every band threshold.
#[test]
fn test_wave_size_bands() {
    let engine = Engine::new(Arc::new(standard_registry()), RulesConfig::default());
    let cases = [
        (1, 1, 2),
        (4, 1, 2),
        (5, 2, 3),
        (9, 2, 3),
        (10, 3, 4),
        (14, 3, 4),
        (15, 3, 5),
        (19, 3, 5),
        (20, 4, 5),
        (50, 4, 5),
    ];

    for (round, min, max) in cases {
        let mut seen = Vec::new();
        for seed in 0..40 {
            let count = spawn_at(&engine, round, seed).enemy_field.live_count();
            assert!(
                (min..=max).contains(&count),
                "round {}: {} units outside {}..={}",
                round,
                count,
                min,
                max
            );
            seen.push(count);
        }
        assert!(seen.contains(&min) || seen.contains(&max));
    }
}

/// Test the cost band and multiplier per ten-round tier.
#[test]
fn test_tier_scaling() {
    let engine = Engine::new(
        Arc::new(standard_registry()),
        RulesConfig::default().with_elite_chance(0.0),
    );
    let cases = [(1, 1, 1, 1), (10, 1, 1, 1), (11, 1, 2, 2), (25, 2, 3, 3), (41, 4, 5, 5), (50, 4, 5, 5)];

    for (round, min_cost, max_cost, stack) in cases {
        for seed in 0..10 {
            let state = spawn_at(&engine, round, seed);
            for (_, unit) in state.enemy_field.units() {
                assert!((min_cost..=max_cost).contains(&unit.cost), "round {}", round);
                assert_eq!(unit.stack, stack, "round {}", round);

                let stats = engine.cards().get(unit.card_id).unwrap().unit_stats().unwrap();
                assert_eq!(unit.attack, stats.attack * i64::from(stack));
                assert_eq!(unit.max_hp, stats.max_hp * i64::from(stack));
                assert_eq!(unit.current_hp, unit.max_hp);
            }
        }
    }
}

/// Test that elites get exactly one extra stack.
#[test]
fn test_elites() {
    let engine = Engine::new(
        Arc::new(standard_registry()),
        RulesConfig::default().with_elite_chance(1.0),
    );

    let state = spawn_at(&engine, 12, 3);

    assert!(state.enemy_field.units().all(|(_, unit)| unit.stack == 3));
}

/// Test fallback to every unit when the cost band is empty.
#[test]
fn test_empty_cost_band_falls_back() {
    let mut registry = CardRegistry::new();
    registry.register(CardDefinition::unit(CardId::new(1), "Rat", 1, 10, 20));
    registry.register(CardDefinition::unit(CardId::new(2), "Bat", 1, 20, 10));
    let engine = Engine::new(Arc::new(registry), RulesConfig::default().with_elite_chance(0.0));

    let state = spawn_at(&engine, 35, 1);

    assert!(state.enemy_field.live_count() >= 4);
    for (_, unit) in state.enemy_field.units() {
        assert_eq!(unit.cost, 1);
        assert_eq!(unit.stack, 4);
    }
}

/// Test that the same seed spawns the same wave.
#[test]
fn test_spawn_is_seeded() {
    let engine = Engine::new(Arc::new(standard_registry()), RulesConfig::default());

    let a = spawn_at(&engine, 17, 99);
    let b = spawn_at(&engine, 17, 99);

    assert_eq!(a.enemy_field, b.enemy_field);
    assert_eq!(a.encountered, b.encountered);
}

/// Test that placement is spread over all slots rather than packed left.
#[test]
fn test_slot_placement_is_random() {
    let engine = Engine::new(Arc::new(standard_registry()), RulesConfig::default());
    let mut used = [false; 5];

    for seed in 0..50 {
        let state = spawn_at(&engine, 1, seed);
        for (slot, _) in state.enemy_field.units() {
            used[slot] = true;
        }
    }

    assert!(used.iter().all(|&u| u));
}
