//! Card registry for definition lookup.
//!
//! The `CardRegistry` stores every card definition of the catalog. It is
//! read-only once a session starts and is shared between sessions behind
//! an `Arc`.

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardId};
use crate::core::{GameError, GameResult};

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use card_gauntlet::cards::{CardRegistry, CardDefinition, CardId};
///
/// let mut registry = CardRegistry::new();
/// registry.register(CardDefinition::unit(CardId::new(1), "Squire", 1, 100, 200));
///
/// let found = registry.get(CardId::new(1)).unwrap();
/// assert_eq!(found.name, "Squire");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, CardDefinition>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition.
    ///
    /// Panics if a card with the same ID already exists.
    pub fn register(&mut self, card: CardDefinition) {
        if self.cards.contains_key(&card.id) {
            panic!("Card with ID {:?} already registered", card.id);
        }
        self.cards.insert(card.id, card);
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Get a card definition by ID, or `CardNotFound`.
    pub fn require(&self, id: CardId) -> GameResult<&CardDefinition> {
        self.get(id).ok_or(GameError::UnknownCard(id))
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }

    /// All unit definitions, sorted by id.
    ///
    /// Sorted so random picks over the list are reproducible per seed.
    #[must_use]
    pub fn unit_templates(&self) -> Vec<&CardDefinition> {
        let mut units: Vec<_> = self.cards.values().filter(|c| c.is_unit()).collect();
        units.sort_by_key(|c| c.id);
        units
    }

    /// Unit definitions whose cost lies in `min_cost..=max_cost`, sorted by id.
    #[must_use]
    pub fn units_in_cost_band(&self, min_cost: u32, max_cost: u32) -> Vec<&CardDefinition> {
        self.unit_templates()
            .into_iter()
            .filter(|c| (min_cost..=max_cost).contains(&c.cost))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::Effect;

    fn sample() -> CardRegistry {
        let mut registry = CardRegistry::new();
        registry.register(CardDefinition::unit(CardId::new(3), "Ogre", 3, 400, 600));
        registry.register(CardDefinition::unit(CardId::new(1), "Squire", 1, 100, 200));
        registry.register(CardDefinition::unit(CardId::new(2), "Knight", 2, 250, 400));
        registry.register(CardDefinition::spell(CardId::new(9), "Windfall", 1, Effect::gold(3)));
        registry
    }

    #[test]
    fn test_register_and_get() {
        let registry = sample();

        assert_eq!(registry.len(), 4);
        assert_eq!(registry.get(CardId::new(1)).unwrap().name, "Squire");
        assert!(registry.get(CardId::new(99)).is_none());
        assert!(registry.contains(CardId::new(9)));
    }

    #[test]
    fn test_require_unknown() {
        let registry = sample();

        assert_eq!(
            registry.require(CardId::new(99)).unwrap_err(),
            GameError::UnknownCard(CardId::new(99))
        );
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_id_panics() {
        let mut registry = sample();
        registry.register(CardDefinition::unit(CardId::new(1), "Again", 1, 1, 1));
    }

    #[test]
    fn test_unit_templates_sorted_without_spells() {
        let registry = sample();

        let ids: Vec<_> = registry.unit_templates().iter().map(|c| c.id.raw()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_units_in_cost_band() {
        let registry = sample();

        let band: Vec<_> = registry.units_in_cost_band(2, 3).iter().map(|c| c.id.raw()).collect();
        assert_eq!(band, vec![2, 3]);
        assert!(registry.units_in_cost_band(4, 5).is_empty());
    }
}
