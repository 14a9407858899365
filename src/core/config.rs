//! Rules configuration.
//!
//! Every tunable constant of the ruleset lives in `RulesConfig`:
//! - Board and hand limits
//! - Economy and starting resources
//! - Deck construction limits
//! - Enemy wave tables
//! - Presentation pacing for the enemy turn
//!
//! Defaults are the canonical ruleset. Hosts can override any subset from
//! TOML; missing keys keep their defaults.
//!
//! ```
//! use card_gauntlet::core::RulesConfig;
//!
//! let config = RulesConfig::from_toml_str("starting_gold = 8\n[deck]\nmax_copies = 2\n").unwrap();
//! assert_eq!(config.starting_gold, 8);
//! assert_eq!(config.deck.max_copies, 2);
//! assert_eq!(config.max_round, 50);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse rules config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid rules config: {0}")]
    Invalid(String),
}

/// Deck construction limits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckLimits {
    /// Minimum deck size.
    pub min_size: usize,
    /// Maximum deck size.
    pub max_size: usize,
    /// Maximum copies of one card definition.
    pub max_copies: usize,
}

impl Default for DeckLimits {
    fn default() -> Self {
        Self {
            min_size: 8,
            max_size: 30,
            max_copies: 3,
        }
    }
}

/// One row of the wave-size table: from `from_round` onwards, waves hold
/// between `min` and `max` units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnBand {
    pub from_round: u32,
    pub min: u32,
    pub max: u32,
}

impl SpawnBand {
    pub const fn new(from_round: u32, min: u32, max: u32) -> Self {
        Self { from_round, min, max }
    }
}

/// Enemy wave generation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Wave-size bands, sorted by `from_round`.
    pub bands: Vec<SpawnBand>,
    /// The template cost band rises once every this many rounds.
    pub rounds_per_tier: u32,
    /// Highest template cost ever requested.
    pub max_cost: u32,
    /// Chance that a spawned unit gets one extra stack.
    pub elite_chance: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            bands: vec![
                SpawnBand::new(1, 1, 2),
                SpawnBand::new(5, 2, 3),
                SpawnBand::new(10, 3, 4),
                SpawnBand::new(15, 3, 5),
                SpawnBand::new(20, 4, 5),
            ],
            rounds_per_tier: 10,
            max_cost: 5,
            elite_chance: 0.2,
        }
    }
}

impl SpawnConfig {
    /// Wave-size range for a round. Rounds before the first band use it anyway.
    #[must_use]
    pub fn band_for(&self, round: u32) -> (u32, u32) {
        self.bands
            .iter()
            .rev()
            .find(|b| round >= b.from_round)
            .or_else(|| self.bands.first())
            .map_or((1, 1), |b| (b.min, b.max))
    }

    /// Scaling tier for a round: `ceil(round / rounds_per_tier)`, at least 1.
    #[must_use]
    pub fn tier(&self, round: u32) -> u32 {
        round.div_ceil(self.rounds_per_tier.max(1)).max(1)
    }

    /// Inclusive template cost band `(min_cost, max_cost)` for a round.
    #[must_use]
    pub fn cost_band(&self, round: u32) -> (u32, u32) {
        let max_cost = self.tier(round).min(self.max_cost);
        let min_cost = max_cost.saturating_sub(1).max(1);
        (min_cost, max_cost)
    }
}

/// Presentation pacing between enemy sub-phases.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Pause after End Turn before enemy attacks resolve.
    pub enemy_attack_delay_ms: u64,
    /// Pause per attack-log entry before control returns to the player.
    pub per_log_entry_ms: u64,
    /// Lower bound for the return-to-player pause.
    pub min_return_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            enemy_attack_delay_ms: 600,
            per_log_entry_ms: 400,
            min_return_delay_ms: 300,
        }
    }
}

impl PacingConfig {
    /// No pauses at all (tests, headless simulation).
    #[must_use]
    pub fn instant() -> Self {
        Self {
            enemy_attack_delay_ms: 0,
            per_log_entry_ms: 0,
            min_return_delay_ms: 0,
        }
    }

    #[must_use]
    pub fn attack_delay(&self) -> Duration {
        Duration::from_millis(self.enemy_attack_delay_ms)
    }

    /// Return-to-player pause, proportional to the log the enemy produced.
    #[must_use]
    pub fn return_delay(&self, log_entries: usize) -> Duration {
        let ms = self.per_log_entry_ms.saturating_mul(log_entries as u64);
        Duration::from_millis(ms.max(self.min_return_delay_ms))
    }
}

/// Complete rules configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Number of slots on each side of the field.
    pub field_slots: usize,
    /// Maximum cards in hand.
    pub max_hand_size: usize,
    /// Cards drawn when the game starts.
    pub opening_hand_size: usize,
    /// Gold at game start.
    pub starting_gold: u32,
    /// Player avatar HP.
    pub player_max_hp: i64,
    /// The game is won once the round counter exceeds this.
    pub max_round: u32,
    pub deck: DeckLimits,
    pub spawn: SpawnConfig,
    pub pacing: PacingConfig,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            field_slots: crate::zones::FIELD_SLOTS,
            max_hand_size: 5,
            opening_hand_size: 4,
            starting_gold: 5,
            player_max_hp: 2000,
            max_round: 50,
            deck: DeckLimits::default(),
            spawn: SpawnConfig::default(),
            pacing: PacingConfig::default(),
        }
    }
}

impl RulesConfig {
    /// Parse a configuration from TOML and validate it.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check semantic constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.field_slots != crate::zones::FIELD_SLOTS {
            return Err(ConfigError::Invalid(format!(
                "field_slots must be {}, got {}",
                crate::zones::FIELD_SLOTS,
                self.field_slots
            )));
        }
        if self.max_hand_size == 0 || self.opening_hand_size > self.max_hand_size {
            return Err(ConfigError::Invalid(
                "opening_hand_size must not exceed a non-zero max_hand_size".into(),
            ));
        }
        if self.player_max_hp <= 0 {
            return Err(ConfigError::Invalid("player_max_hp must be positive".into()));
        }
        if self.deck.min_size > self.deck.max_size || self.deck.max_copies == 0 {
            return Err(ConfigError::Invalid("deck limits are inconsistent".into()));
        }
        if self.spawn.bands.is_empty() {
            return Err(ConfigError::Invalid("spawn.bands must not be empty".into()));
        }
        if !(0.0..=1.0).contains(&self.spawn.elite_chance) {
            return Err(ConfigError::Invalid(format!(
                "spawn.elite_chance must be within 0.0..=1.0, got {}",
                self.spawn.elite_chance
            )));
        }
        let sorted = self.spawn.bands.windows(2).all(|w| w[0].from_round < w[1].from_round);
        let bounded = self
            .spawn
            .bands
            .iter()
            .all(|b| b.min >= 1 && b.min <= b.max && b.max as usize <= self.field_slots);
        if !sorted || !bounded {
            return Err(ConfigError::Invalid(
                "spawn.bands must be sorted with 1 <= min <= max <= field_slots".into(),
            ));
        }
        Ok(())
    }

    /// Set the starting gold.
    #[must_use]
    pub fn with_starting_gold(mut self, gold: u32) -> Self {
        self.starting_gold = gold;
        self
    }

    /// Set the player avatar HP.
    #[must_use]
    pub fn with_player_hp(mut self, hp: i64) -> Self {
        self.player_max_hp = hp;
        self
    }

    /// Set the round ceiling.
    #[must_use]
    pub fn with_max_round(mut self, round: u32) -> Self {
        self.max_round = round;
        self
    }

    /// Set the opening hand size.
    #[must_use]
    pub fn with_opening_hand(mut self, size: usize) -> Self {
        self.opening_hand_size = size;
        self
    }

    /// Replace the deck limits.
    #[must_use]
    pub fn with_deck_limits(mut self, deck: DeckLimits) -> Self {
        self.deck = deck;
        self
    }

    /// Replace the pacing.
    #[must_use]
    pub fn with_pacing(mut self, pacing: PacingConfig) -> Self {
        self.pacing = pacing;
        self
    }

    /// Set the elite chance.
    #[must_use]
    pub fn with_elite_chance(mut self, chance: f64) -> Self {
        self.spawn.elite_chance = chance;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = RulesConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.field_slots, 5);
        assert_eq!(config.max_hand_size, 5);
        assert_eq!(config.max_round, 50);
    }

    #[test]
    fn test_spawn_bands() {
        let spawn = SpawnConfig::default();

        assert_eq!(spawn.band_for(1), (1, 2));
        assert_eq!(spawn.band_for(4), (1, 2));
        assert_eq!(spawn.band_for(5), (2, 3));
        assert_eq!(spawn.band_for(9), (2, 3));
        assert_eq!(spawn.band_for(10), (3, 4));
        assert_eq!(spawn.band_for(14), (3, 4));
        assert_eq!(spawn.band_for(15), (3, 5));
        assert_eq!(spawn.band_for(19), (3, 5));
        assert_eq!(spawn.band_for(20), (4, 5));
        assert_eq!(spawn.band_for(49), (4, 5));
        assert_eq!(spawn.band_for(0), (1, 2));
    }

    #[test]
    fn test_tier_and_cost_band() {
        let spawn = SpawnConfig::default();

        assert_eq!(spawn.tier(1), 1);
        assert_eq!(spawn.tier(10), 1);
        assert_eq!(spawn.tier(11), 2);
        assert_eq!(spawn.tier(50), 5);

        assert_eq!(spawn.cost_band(1), (1, 1));
        assert_eq!(spawn.cost_band(11), (1, 2));
        assert_eq!(spawn.cost_band(25), (2, 3));
        assert_eq!(spawn.cost_band(50), (4, 5));
        assert_eq!(spawn.cost_band(90), (4, 5)); // Capped at max_cost
    }

    #[test]
    fn test_return_delay_scales_with_log() {
        let pacing = PacingConfig::default();

        assert_eq!(pacing.return_delay(0), Duration::from_millis(300));
        assert_eq!(pacing.return_delay(3), Duration::from_millis(1200));
        assert_eq!(PacingConfig::instant().return_delay(10), Duration::ZERO);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = RulesConfig::from_toml_str(
            r#"
            player_max_hp = 500

            [pacing]
            per_log_entry_ms = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.player_max_hp, 500);
        assert_eq!(config.pacing.per_log_entry_ms, 10);
        assert_eq!(config.pacing.enemy_attack_delay_ms, 600);
        assert_eq!(config.deck, DeckLimits::default());
    }

    #[test]
    fn test_from_toml_rejects_bad_field_width() {
        let err = RulesConfig::from_toml_str("field_slots = 7").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_from_toml_rejects_bad_elite_chance() {
        for source in ["[spawn]\nelite_chance = nan\n", "[spawn]\nelite_chance = 1.5\n", "[spawn]\nelite_chance = -0.1\n"] {
            let err = RulesConfig::from_toml_str(source).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{source}");
        }
        assert!(RulesConfig::from_toml_str("[spawn]\nelite_chance = 1.0\n").is_ok());
    }

    #[test]
    fn test_from_toml_rejects_syntax() {
        let err = RulesConfig::from_toml_str("starting_gold = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_builder() {
        let config = RulesConfig::default()
            .with_starting_gold(10)
            .with_player_hp(99)
            .with_max_round(3)
            .with_pacing(PacingConfig::instant());

        assert_eq!(config.starting_gold, 10);
        assert_eq!(config.player_max_hp, 99);
        assert_eq!(config.max_round, 3);
        assert_eq!(config.pacing.enemy_attack_delay_ms, 0);
    }
}
