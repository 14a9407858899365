//! Game state: the root aggregate of one session.
//!
//! ## GameState
//!
//! Everything a running game consists of:
//! - Player avatar, both field rows
//! - Card piles (deck, hand, discard, exhaust)
//! - Gold, turn and round counters, status
//! - Shop offers and the templates encountered this round
//! - Attack log, event log, and command history
//! - RNG and id allocator
//!
//! The session exclusively owns one `GameState` and lends it to stateless
//! handlers by `&mut`. Piles and logs use `im` persistent vectors so the
//! session can checkpoint the whole aggregate before a command and
//! snapshots can share structure with live state.
//!
//! ## Invariants
//!
//! - Each field has exactly `FIELD_SLOTS` slots
//! - `hand.len() <= max_hand_size`
//! - Every field unit has `0 < current_hp <= max_hp`
//! - Gold is unsigned and only debited through `spend_gold`

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::action::CommandRecord;
use super::config::RulesConfig;
use super::entity::{EntityId, IdAllocator};
use super::error::{GameError, GameResult};
use super::event::{AttackLogEntry, GameEvent};
use super::rng::GameRng;
use crate::cards::{Ability, CardDefinition, CardId, CardKind, GameCard};
use crate::zones::Field;

/// Where the game is in its turn/round cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    /// The player's turn.
    Playing,
    /// Enemy units are attacking.
    EnemyTurn,
    /// Between rounds, buying cards.
    Shop,
    /// Enemy field cleared, waiting for the player to confirm.
    RoundVictory,
    /// Round ceiling exceeded. Terminal.
    Victory,
    /// Player avatar died. Terminal.
    Defeat,
}

impl GameStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Victory | GameStatus::Defeat)
    }

    /// Statuses in which combat is live and the round can be cleared.
    #[must_use]
    pub fn is_combat(self) -> bool {
        matches!(self, GameStatus::Playing | GameStatus::EnemyTurn)
    }
}

/// The player avatar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub max_hp: i64,
    pub current_hp: i64,
}

impl Entity {
    #[must_use]
    pub fn new(id: EntityId, name: impl Into<String>, max_hp: i64) -> Self {
        Self {
            id,
            name: name.into(),
            max_hp,
            current_hp: max_hp,
        }
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }
}

/// A unit standing in a field slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldUnit {
    pub id: EntityId,
    /// Current definition. Changes when the unit transforms.
    pub card_id: CardId,
    pub name: String,
    pub cost: u32,
    pub attack: i64,
    pub current_hp: i64,
    pub max_hp: i64,
    pub abilities: SmallVec<[Ability; 2]>,
    pub has_attacked: bool,
    pub ability_used: bool,
    /// Merge level. Enemies start at their scaling multiplier.
    pub stack: u32,
    /// The card that summoned this unit. `None` for enemies.
    pub source_card: Option<GameCard>,
}

impl FieldUnit {
    /// Summon a player unit from a card. `None` if the card is a spell.
    #[must_use]
    pub fn from_card(card: GameCard, def: &CardDefinition) -> Option<Self> {
        let stats = def.unit_stats()?;
        Some(Self {
            id: card.instance_id,
            card_id: def.id,
            name: def.name.clone(),
            cost: def.cost,
            attack: stats.attack,
            current_hp: stats.max_hp,
            max_hp: stats.max_hp,
            abilities: stats.abilities.clone(),
            has_attacked: false,
            ability_used: false,
            stack: 1,
            source_card: Some(card),
        })
    }

    /// Spawn an enemy unit with attack and HP scaled by `multiplier`.
    #[must_use]
    pub fn enemy(id: EntityId, def: &CardDefinition, multiplier: u32) -> Option<Self> {
        let stats = def.unit_stats()?;
        let multiplier = multiplier.max(1);
        let max_hp = stats.max_hp * i64::from(multiplier);
        Some(Self {
            id,
            card_id: def.id,
            name: def.name.clone(),
            cost: def.cost,
            attack: stats.attack * i64::from(multiplier),
            current_hp: max_hp,
            max_hp,
            abilities: stats.abilities.clone(),
            has_attacked: false,
            ability_used: false,
            stack: multiplier,
            source_card: None,
        })
    }

    #[must_use]
    pub fn is_enemy(&self) -> bool {
        self.source_card.is_none()
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Apply damage. Returns the damage in excess of the HP the unit had.
    pub fn take_damage(&mut self, amount: i64) -> i64 {
        let amount = amount.max(0);
        let overkill = (amount - self.current_hp).max(0);
        self.current_hp -= amount;
        overkill
    }

    /// Restore HP up to max. Returns the amount actually restored.
    pub fn heal(&mut self, amount: i64) -> i64 {
        let before = self.current_hp;
        self.current_hp = (self.current_hp + amount.max(0)).min(self.max_hp);
        self.current_hp - before
    }

    /// Clear per-turn flags.
    pub fn reset_turn(&mut self) {
        self.has_attacked = false;
        self.ability_used = false;
    }

    /// Replace identity and stats in place, keeping id, slot, source card,
    /// stack, and per-turn flags.
    ///
    /// Stats are scaled by the current stack and the unit returns at full HP.
    pub fn transform_into(&mut self, def: &CardDefinition) {
        if let CardKind::Unit(stats) = &def.kind {
            let stack = i64::from(self.stack.max(1));
            self.card_id = def.id;
            self.name = def.name.clone();
            self.cost = def.cost;
            self.attack = stats.attack * stack;
            self.max_hp = stats.max_hp * stack;
            self.current_hp = self.max_hp;
            self.abilities = stats.abilities.clone();
        }
    }
}

/// One purchasable shop slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopOffer {
    pub card_id: CardId,
    pub name: String,
    pub cost: u32,
}

/// Complete state of one game.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Entity,
    pub player_field: Field,
    pub enemy_field: Field,

    /// Draw pile. Top = back.
    pub deck: Vector<GameCard>,
    pub hand: Vector<GameCard>,
    pub discard: Vector<GameCard>,
    pub exhaust: Vector<GameCard>,

    pub gold: u32,
    pub turn: u32,
    pub round: u32,
    pub status: GameStatus,

    pub shop: Vector<ShopOffer>,
    /// Templates spawned this round, in first-spawn order, without repeats.
    pub encountered: Vector<CardId>,

    pub attack_log: Vector<AttackLogEntry>,
    pub events: Vector<GameEvent>,
    /// Accepted commands in order. Bounded by the game's length, since a
    /// game ends at the round ceiling.
    pub history: Vector<CommandRecord>,
    /// Seed the game was started with. With `history` it reproduces the game.
    pub seed: u64,

    /// Set once enemy attacks of the current enemy turn have resolved.
    pub enemy_attacks_resolved: bool,

    pub ids: IdAllocator,
    pub rng: GameRng,
}

impl GameState {
    /// Create a fresh state: round 1, turn 1, `PLAYING`, empty piles and fields.
    #[must_use]
    pub fn new(config: &RulesConfig, seed: u64) -> Self {
        Self {
            player: Entity::new(EntityId::PLAYER, "Player", config.player_max_hp),
            player_field: Field::new(),
            enemy_field: Field::new(),
            deck: Vector::new(),
            hand: Vector::new(),
            discard: Vector::new(),
            exhaust: Vector::new(),
            gold: config.starting_gold,
            turn: 1,
            round: 1,
            status: GameStatus::Playing,
            shop: Vector::new(),
            encountered: Vector::new(),
            attack_log: Vector::new(),
            events: Vector::new(),
            history: Vector::new(),
            seed,
            enemy_attacks_resolved: false,
            ids: IdAllocator::new(),
            rng: GameRng::new(seed),
        }
    }

    // === Gold ===

    /// Check that `amount` gold is available.
    pub fn ensure_gold(&self, amount: u32) -> GameResult<()> {
        if self.gold < amount {
            return Err(GameError::NotEnoughGold {
                have: self.gold,
                need: amount,
            });
        }
        Ok(())
    }

    /// Debit gold, failing without change if there is not enough.
    pub fn spend_gold(&mut self, amount: u32) -> GameResult<()> {
        self.ensure_gold(amount)?;
        self.gold -= amount;
        if amount > 0 {
            self.events.push_back(GameEvent::GoldSpent { amount });
        }
        Ok(())
    }

    /// Credit gold.
    pub fn gain_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
        if amount > 0 {
            self.events.push_back(GameEvent::GoldGained { amount });
        }
    }

    // === Piles ===

    /// Allocate a new card instance owned by the player.
    pub fn new_card(&mut self, card_id: CardId) -> GameCard {
        GameCard::new(self.ids.alloc(), card_id)
    }

    /// Draw one card from the top of the deck.
    ///
    /// No-op when the deck is empty or the hand is at `max_hand`.
    pub fn draw_card(&mut self, max_hand: usize) -> Option<EntityId> {
        if self.hand.len() >= max_hand {
            return None;
        }
        let card = self.deck.pop_back()?;
        let id = card.instance_id;
        self.hand.push_back(card);
        Some(id)
    }

    /// Draw up to `count` cards. Returns how many were drawn.
    pub fn draw_cards(&mut self, count: usize, max_hand: usize) -> usize {
        let drawn = (0..count).take_while(|_| self.draw_card(max_hand).is_some()).count();
        if drawn > 0 {
            self.events.push_back(GameEvent::CardsDrawn { count: drawn });
        }
        drawn
    }

    /// Shuffle the deck.
    pub fn shuffle_deck(&mut self) {
        let mut cards: Vec<GameCard> = self.deck.iter().cloned().collect();
        self.rng.shuffle(&mut cards);
        self.deck = cards.into_iter().collect();
    }

    /// Copies of a definition the player owns, wherever they sit.
    ///
    /// Field units count by their source card, so a transformed unit still
    /// counts as the card it was played from.
    #[must_use]
    pub fn copies_owned(&self, card_id: CardId) -> usize {
        let piles = self
            .deck
            .iter()
            .chain(self.hand.iter())
            .chain(self.discard.iter())
            .chain(self.exhaust.iter())
            .filter(|c| c.card_id == card_id)
            .count();
        let fielded = self
            .player_field
            .units()
            .filter_map(|(_, u)| u.source_card.as_ref())
            .filter(|c| c.card_id == card_id)
            .count();
        piles + fielded
    }

    /// Cards across every container the player's collection can occupy.
    ///
    /// Player field units count once each (their source card).
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.deck.len()
            + self.hand.len()
            + self.discard.len()
            + self.exhaust.len()
            + self.player_field.units().filter(|(_, u)| u.source_card.is_some()).count()
    }

    // === Turn bookkeeping ===

    /// Reset per-turn flags on every player unit.
    pub fn reset_player_units(&mut self) {
        for unit in self.player_field.units_mut() {
            unit.reset_turn();
        }
    }

    /// Clear the per-turn logs.
    pub fn clear_logs(&mut self) {
        self.attack_log.clear();
        self.events.clear();
    }

    /// Change status, recording the transition.
    pub fn set_status(&mut self, status: GameStatus) {
        if self.status != status {
            self.events.push_back(GameEvent::StatusChanged {
                from: self.status,
                to: status,
            });
            self.status = status;
        }
    }
}
