//! The turn/round state machine.
//!
//! `Engine` is stateless with respect to any one game: it holds the card
//! catalog, the rules configuration, and the effect registry, and every
//! operation borrows the `GameState` it acts on. One engine can drive any
//! number of sessions.
//!
//! ## Status transitions
//!
//! - `PLAYING` → `ENEMY_TURN`: `end_turn`
//! - `ENEMY_TURN` → `PLAYING`: `advance_enemy_turn`, in two sub-phases
//!   (attacks resolve, then the next player turn begins)
//! - `PLAYING`/`ENEMY_TURN` → `ROUND_VICTORY`: enemy field cleared
//! - `ROUND_VICTORY` → `SHOP`: `confirm_round`
//! - `SHOP` → `PLAYING`: `continue_round`, which spawns the next wave
//! - any → `DEFEAT` / `VICTORY`: terminal
//!
//! `evaluate_status` runs after every mutating operation and is the only
//! place that leaves active play. Defeat takes priority over round clear.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::cards::{CardId, CardRegistry};
use crate::core::{Command, CommandRecord, GameError, GameResult, GameState, GameStatus, RulesConfig};
use crate::effects::EffectRegistry;

/// What one call to `Engine::advance_enemy_turn` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyPhase {
    /// Enemy units attacked. Carries the number of attack-log entries, which
    /// sizes the pause before control returns.
    AttacksResolved { log_entries: usize },
    /// The next player turn began.
    PlayerTurnBegan,
}

/// The rules engine.
pub struct Engine {
    pub(crate) cards: Arc<CardRegistry>,
    pub(crate) config: RulesConfig,
    pub(crate) effects: EffectRegistry,
}

impl Engine {
    /// Create an engine with the built-in effect handlers.
    #[must_use]
    pub fn new(cards: Arc<CardRegistry>, config: RulesConfig) -> Self {
        Self {
            cards,
            config,
            effects: EffectRegistry::standard(),
        }
    }

    /// Replace the effect registry (builder pattern).
    #[must_use]
    pub fn with_effects(mut self, effects: EffectRegistry) -> Self {
        self.effects = effects;
        self
    }

    #[must_use]
    pub fn cards(&self) -> &CardRegistry {
        &self.cards
    }

    #[must_use]
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    #[must_use]
    pub fn effects(&self) -> &EffectRegistry {
        &self.effects
    }

    // === Game setup ===

    /// Validate a deck list against the catalog and deck limits.
    pub fn validate_deck(&self, deck: &[CardId]) -> GameResult<()> {
        let limits = &self.config.deck;
        if deck.len() < limits.min_size || deck.len() > limits.max_size {
            return Err(GameError::InvalidDeck(format!(
                "deck has {} cards, expected {}..={}",
                deck.len(),
                limits.min_size,
                limits.max_size
            )));
        }

        let mut copies: FxHashMap<CardId, usize> = FxHashMap::default();
        for &card_id in deck {
            self.cards.require(card_id)?;
            let count = copies.entry(card_id).or_insert(0);
            *count += 1;
            if *count > limits.max_copies {
                return Err(GameError::InvalidDeck(format!(
                    "{} appears more than {} times",
                    card_id, limits.max_copies
                )));
            }
        }
        Ok(())
    }

    /// Build a new game: shuffled deck, opening hand, first wave.
    pub fn start_game(&self, deck: &[CardId], seed: u64) -> GameResult<GameState> {
        self.validate_deck(deck)?;

        let mut state = GameState::new(&self.config, seed);
        for &card_id in deck {
            let card = state.new_card(card_id);
            state.deck.push_back(card);
        }
        state.shuffle_deck();
        state.draw_cards(self.config.opening_hand_size, self.config.max_hand_size);
        self.spawn_wave(&mut state);
        self.evaluate_status(&mut state);

        info!(seed, deck_size = deck.len(), "game started");
        Ok(state)
    }

    // === Command dispatch ===

    /// Apply one command to a running game, then re-evaluate status.
    ///
    /// On error the state may be partially written; callers that need
    /// atomicity restore a checkpoint (see `Session`).
    pub fn apply(&self, state: &mut GameState, command: &Command) -> GameResult<()> {
        if state.status.is_terminal() {
            return Err(GameError::GameOver);
        }
        let (round, turn) = (state.round, state.turn);

        match command {
            Command::StartGame { .. } => return Err(GameError::GameAlreadyStarted),
            Command::PlayCard { hand_index, target_id } => self.play_card(state, *hand_index, *target_id)?,
            Command::Attack { attacker_id, target_id } => self.attack(state, *attacker_id, *target_id)?,
            Command::ActivateAbility {
                unit_id,
                ability_index,
                target_id,
            } => self.activate_ability(state, *unit_id, *ability_index, *target_id)?,
            Command::MergeUnits { source, target_id } => self.merge_units(state, *source, *target_id)?,
            Command::EndTurn => self.end_turn(state)?,
            Command::ConfirmRound => self.confirm_round(state)?,
            Command::BuyCard { offer_index } => self.buy_card(state, *offer_index)?,
            Command::ContinueRound => self.continue_round(state)?,
        }

        self.evaluate_status(state);
        state.history.push_back(CommandRecord {
            round,
            turn,
            command: command.clone(),
        });
        debug!(command = command.name(), round, turn, status = ?state.status, "command applied");
        Ok(())
    }

    // === Status ===

    /// Re-run the game-over and round-clear checks.
    pub fn evaluate_status(&self, state: &mut GameState) {
        if state.status.is_terminal() {
            return;
        }

        if !state.player.is_alive() {
            state.set_status(GameStatus::Defeat);
            info!(round = state.round, turn = state.turn, "defeat");
        } else if state.round > self.config.max_round {
            state.set_status(GameStatus::Victory);
            info!(round = state.round, "victory");
        } else if state.status.is_combat() && state.enemy_field.is_clear() {
            self.open_shop(state);
            state.set_status(GameStatus::RoundVictory);
            info!(round = state.round, turn = state.turn, offers = state.shop.len(), "round cleared");
        }
    }

    /// Require the player's turn.
    pub(crate) fn ensure_playing(state: &GameState) -> GameResult<()> {
        match state.status {
            GameStatus::Playing => Ok(()),
            status if status.is_terminal() => Err(GameError::GameOver),
            _ => Err(GameError::NotYourTurn),
        }
    }

    // === Turn flow ===

    /// `PLAYING` → `ENEMY_TURN`.
    pub fn end_turn(&self, state: &mut GameState) -> GameResult<()> {
        Self::ensure_playing(state)?;
        state.clear_logs();
        state.enemy_attacks_resolved = false;
        state.set_status(GameStatus::EnemyTurn);
        Ok(())
    }

    /// Run the next enemy sub-phase.
    ///
    /// The first call resolves enemy attacks; the second begins the next
    /// player turn. Status is re-evaluated after each, so a defeat during
    /// the attacks ends the enemy turn early.
    pub fn advance_enemy_turn(&self, state: &mut GameState) -> GameResult<EnemyPhase> {
        if state.status != GameStatus::EnemyTurn {
            return Err(GameError::NotEnemyTurn);
        }

        let phase = if state.enemy_attacks_resolved {
            self.begin_player_turn(state);
            EnemyPhase::PlayerTurnBegan
        } else {
            self.resolve_enemy_attacks(state);
            state.enemy_attacks_resolved = true;
            EnemyPhase::AttacksResolved {
                log_entries: state.attack_log.len(),
            }
        };

        self.evaluate_status(state);
        Ok(phase)
    }

    /// `ROUND_VICTORY` → `SHOP`.
    pub fn confirm_round(&self, state: &mut GameState) -> GameResult<()> {
        if state.status != GameStatus::RoundVictory {
            return Err(GameError::RoundNotCleared);
        }
        state.set_status(GameStatus::Shop);
        Ok(())
    }

    /// `SHOP` → `PLAYING` in the next round, or `VICTORY` past the ceiling.
    pub fn continue_round(&self, state: &mut GameState) -> GameResult<()> {
        if state.status != GameStatus::Shop {
            return Err(GameError::GameNotInShop);
        }

        state.round += 1;
        state.shop.clear();
        state.encountered.clear();
        if state.round > self.config.max_round {
            self.evaluate_status(state);
            return Ok(());
        }

        state.enemy_field.clear();
        state.clear_logs();
        self.spawn_wave(state);
        self.begin_player_turn(state);
        info!(round = state.round, "round started");
        Ok(())
    }

    fn begin_player_turn(&self, state: &mut GameState) {
        state.turn += 1;
        state.clear_logs();
        state.reset_player_units();
        state.draw_cards(1, self.config.max_hand_size);
        state.set_status(GameStatus::Playing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::catalog::{self, standard_registry, starter_deck};
    use crate::core::ErrorCode;

    fn engine() -> Engine {
        Engine::new(Arc::new(standard_registry()), RulesConfig::default())
    }

    #[test]
    fn test_start_game() {
        let engine = engine();
        let state = engine.start_game(&starter_deck(), 7).unwrap();

        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.round, 1);
        assert_eq!(state.turn, 1);
        assert_eq!(state.hand.len(), 4);
        assert_eq!(state.deck.len(), 6);
        assert!(!state.enemy_field.is_clear());
        assert_eq!(state.total_cards(), 10);
    }

    #[test]
    fn test_start_game_rejects_bad_decks() {
        let engine = engine();

        let short = vec![catalog::SQUIRE; 3];
        assert_eq!(engine.start_game(&short, 1).unwrap_err().code(), ErrorCode::InvalidDeck);

        let mut copies = starter_deck();
        copies.push(catalog::SQUIRE);
        assert_eq!(engine.start_game(&copies, 1).unwrap_err().code(), ErrorCode::InvalidDeck);

        let mut unknown = starter_deck();
        unknown[0] = CardId::new(999);
        assert_eq!(
            engine.start_game(&unknown, 1).unwrap_err(),
            GameError::UnknownCard(CardId::new(999))
        );
    }

    #[test]
    fn test_end_turn_only_while_playing() {
        let engine = engine();
        let mut state = engine.start_game(&starter_deck(), 7).unwrap();

        engine.end_turn(&mut state).unwrap();
        assert_eq!(state.status, GameStatus::EnemyTurn);
        assert_eq!(engine.end_turn(&mut state), Err(GameError::NotYourTurn));
    }

    #[test]
    fn test_enemy_turn_two_phases() {
        let engine = engine();
        let mut state = engine.start_game(&starter_deck(), 7).unwrap();
        let hand_before = state.hand.len();

        engine.end_turn(&mut state).unwrap();
        let first = engine.advance_enemy_turn(&mut state).unwrap();
        assert!(matches!(first, EnemyPhase::AttacksResolved { log_entries } if log_entries >= 1));
        assert_eq!(state.status, GameStatus::EnemyTurn);

        let second = engine.advance_enemy_turn(&mut state).unwrap();
        assert_eq!(second, EnemyPhase::PlayerTurnBegan);
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.turn, 2);
        assert_eq!(state.hand.len(), hand_before + 1);

        assert_eq!(engine.advance_enemy_turn(&mut state), Err(GameError::NotEnemyTurn));
    }

    #[test]
    fn test_defeat_beats_round_clear() {
        let engine = engine();
        let mut state = engine.start_game(&starter_deck(), 7).unwrap();
        state.enemy_field.clear();
        state.player.current_hp = 0;

        engine.evaluate_status(&mut state);

        assert_eq!(state.status, GameStatus::Defeat);
    }

    #[test]
    fn test_round_clear_opens_shop_after_confirm() {
        let engine = engine();
        let mut state = engine.start_game(&starter_deck(), 7).unwrap();
        let spawned = state.encountered.len();
        state.enemy_field.clear();

        engine.evaluate_status(&mut state);
        assert_eq!(state.status, GameStatus::RoundVictory);
        assert_eq!(state.shop.len(), spawned);

        assert_eq!(engine.continue_round(&mut state), Err(GameError::GameNotInShop));
        engine.confirm_round(&mut state).unwrap();
        assert_eq!(state.status, GameStatus::Shop);
        assert_eq!(engine.confirm_round(&mut state), Err(GameError::RoundNotCleared));
    }

    #[test]
    fn test_continue_round_spawns_next_wave() {
        let engine = engine();
        let mut state = engine.start_game(&starter_deck(), 7).unwrap();
        state.enemy_field.clear();
        engine.evaluate_status(&mut state);
        engine.confirm_round(&mut state).unwrap();

        engine.continue_round(&mut state).unwrap();

        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.round, 2);
        assert_eq!(state.turn, 2);
        assert!(state.shop.is_empty());
        assert!(!state.enemy_field.is_clear());
    }

    #[test]
    fn test_victory_past_round_ceiling() {
        let engine = Engine::new(Arc::new(standard_registry()), RulesConfig::default().with_max_round(1));
        let mut state = engine.start_game(&starter_deck(), 7).unwrap();
        state.enemy_field.clear();
        engine.evaluate_status(&mut state);
        engine.confirm_round(&mut state).unwrap();

        engine.continue_round(&mut state).unwrap();

        assert_eq!(state.status, GameStatus::Victory);
        assert_eq!(engine.apply(&mut state, &Command::EndTurn), Err(GameError::GameOver));
    }

    #[test]
    fn test_apply_records_history() {
        let engine = engine();
        let mut state = engine.start_game(&starter_deck(), 7).unwrap();

        engine.apply(&mut state, &Command::EndTurn).unwrap();

        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history[0].command, Command::EndTurn);
        assert_eq!(state.history[0].turn, 1);
    }
}
