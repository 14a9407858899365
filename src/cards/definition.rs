//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card type. For
//! example, "Fireball" costs 2 gold and deals 300 damage - these are part
//! of the definition.
//!
//! Instance-specific data (owner, instance id, current HP on the field) is
//! stored separately in `GameCard` and `FieldUnit`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::effects::Effect;

/// Unique identifier for a card definition.
///
/// This identifies the "type" of card (e.g., "Knight"), not a specific
/// instance in a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// An activatable ability printed on a unit card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    pub effect: Effect,
    /// Gold paid on activation.
    pub cost: u32,
}

impl Ability {
    #[must_use]
    pub fn new(name: impl Into<String>, effect: Effect) -> Self {
        Self {
            name: name.into(),
            effect,
            cost: 0,
        }
    }

    #[must_use]
    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }
}

/// Combat stats of a unit card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitStats {
    pub attack: i64,
    pub max_hp: i64,
    /// Most units carry zero or one ability.
    pub abilities: SmallVec<[Ability; 2]>,
}

/// What a card does when played.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CardKind {
    /// Summoned to the field.
    Unit(UnitStats),
    /// Resolved immediately through the effect registry.
    Spell { effect: Effect },
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use card_gauntlet::cards::{CardDefinition, CardId};
///
/// let knight = CardDefinition::unit(CardId::new(3), "Knight", 2, 250, 400)
///     .with_description("Sturdy frontliner.");
///
/// assert!(knight.is_unit());
/// assert_eq!(knight.unit_stats().unwrap().max_hp, 400);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Unique identifier for this card definition.
    pub id: CardId,

    /// Card name (for display/debugging).
    pub name: String,

    /// Rules text.
    pub description: String,

    /// Gold cost to play, buy, or merge from hand. Also the bounty paid when
    /// an enemy built from this template dies.
    pub cost: u32,

    pub kind: CardKind,
}

impl CardDefinition {
    /// Create a unit card definition.
    #[must_use]
    pub fn unit(id: CardId, name: impl Into<String>, cost: u32, attack: i64, max_hp: i64) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            cost,
            kind: CardKind::Unit(UnitStats {
                attack,
                max_hp,
                abilities: SmallVec::new(),
            }),
        }
    }

    /// Create a spell card definition.
    #[must_use]
    pub fn spell(id: CardId, name: impl Into<String>, cost: u32, effect: Effect) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            cost,
            kind: CardKind::Spell { effect },
        }
    }

    /// Set the rules text (builder pattern).
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add an ability (builder pattern). Ignored on spells.
    #[must_use]
    pub fn with_ability(mut self, ability: Ability) -> Self {
        if let CardKind::Unit(stats) = &mut self.kind {
            stats.abilities.push(ability);
        }
        self
    }

    #[must_use]
    pub fn is_unit(&self) -> bool {
        matches!(self.kind, CardKind::Unit(_))
    }

    /// Unit stats, or `None` for spells.
    #[must_use]
    pub fn unit_stats(&self) -> Option<&UnitStats> {
        match &self.kind {
            CardKind::Unit(stats) => Some(stats),
            CardKind::Spell { .. } => None,
        }
    }

    /// Spell effect, or `None` for units.
    #[must_use]
    pub fn spell_effect(&self) -> Option<&Effect> {
        match &self.kind {
            CardKind::Spell { effect } => Some(effect),
            CardKind::Unit(_) => None,
        }
    }
}
