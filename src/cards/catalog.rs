//! The built-in card catalog.
//!
//! An illustrative set covering every effect kind and every cost tier the
//! wave generator draws from (1 through 5).

use super::definition::{Ability, CardDefinition, CardId};
use super::registry::CardRegistry;
use crate::effects::Effect;

pub const SQUIRE: CardId = CardId::new(1);
pub const ARCHER: CardId = CardId::new(2);
pub const CATERPILLAR: CardId = CardId::new(3);
pub const KNIGHT: CardId = CardId::new(4);
pub const MINER: CardId = CardId::new(5);
pub const SCHOLAR: CardId = CardId::new(6);
pub const BUTTERFLY: CardId = CardId::new(7);
pub const OGRE: CardId = CardId::new(8);
pub const CLERIC: CardId = CardId::new(9);
pub const GOLEM: CardId = CardId::new(10);
pub const WYVERN: CardId = CardId::new(11);
pub const DRAGON: CardId = CardId::new(12);
pub const TITAN: CardId = CardId::new(13);

pub const FIREBALL: CardId = CardId::new(20);
pub const WINDFALL: CardId = CardId::new(21);
pub const INSIGHT: CardId = CardId::new(22);
pub const REMEDY: CardId = CardId::new(23);

/// Build the standard catalog.
#[must_use]
pub fn standard_registry() -> CardRegistry {
    let mut registry = CardRegistry::new();

    registry.register(CardDefinition::unit(SQUIRE, "Squire", 1, 100, 200).with_description("A loyal recruit."));
    registry.register(
        CardDefinition::unit(ARCHER, "Archer", 1, 150, 100)
            .with_description("Volley: pay 1 gold to deal 100 damage to an enemy unit.")
            .with_ability(Ability::new("Volley", Effect::damage(100)).with_cost(1)),
    );
    registry.register(
        CardDefinition::unit(CATERPILLAR, "Caterpillar", 1, 50, 150)
            .with_description("Metamorphose: pay 2 gold to become a Butterfly.")
            .with_ability(Ability::new("Metamorphose", Effect::transform(BUTTERFLY)).with_cost(2)),
    );
    registry.register(CardDefinition::unit(KNIGHT, "Knight", 2, 250, 400).with_description("Sturdy frontliner."));
    registry.register(
        CardDefinition::unit(MINER, "Miner", 2, 100, 300)
            .with_description("Dig: gain 1 gold.")
            .with_ability(Ability::new("Dig", Effect::gold(1))),
    );
    registry.register(
        CardDefinition::unit(SCHOLAR, "Scholar", 2, 100, 200)
            .with_description("Study: pay 1 gold to draw a card.")
            .with_ability(Ability::new("Study", Effect::draw(1)).with_cost(1)),
    );
    registry.register(CardDefinition::unit(BUTTERFLY, "Butterfly", 3, 300, 300));
    registry.register(CardDefinition::unit(OGRE, "Ogre", 3, 400, 600));
    registry.register(
        CardDefinition::unit(CLERIC, "Cleric", 3, 150, 400)
            .with_description("Mend: pay 1 gold to restore 200 HP to a friendly unit or yourself.")
            .with_ability(Ability::new("Mend", Effect::heal(200)).with_cost(1)),
    );
    registry.register(CardDefinition::unit(GOLEM, "Golem", 4, 500, 900));
    registry.register(CardDefinition::unit(WYVERN, "Wyvern", 4, 600, 500));
    registry.register(CardDefinition::unit(DRAGON, "Dragon", 5, 800, 1000));
    registry.register(CardDefinition::unit(TITAN, "Titan", 5, 600, 1400));

    registry.register(
        CardDefinition::spell(FIREBALL, "Fireball", 2, Effect::damage(300))
            .with_description("Deal 300 damage to an enemy unit."),
    );
    registry.register(CardDefinition::spell(WINDFALL, "Windfall", 1, Effect::gold(3)).with_description("Gain 3 gold."));
    registry.register(CardDefinition::spell(INSIGHT, "Insight", 1, Effect::draw(2)).with_description("Draw 2 cards."));
    registry.register(
        CardDefinition::spell(REMEDY, "Remedy", 1, Effect::heal(300))
            .with_description("Restore 300 HP to a friendly unit or yourself."),
    );

    registry
}

/// A legal ten-card starting deck for the standard catalog.
#[must_use]
pub fn starter_deck() -> Vec<CardId> {
    vec![
        SQUIRE, SQUIRE, SQUIRE, ARCHER, ARCHER, CATERPILLAR, KNIGHT, MINER, FIREBALL, WINDFALL,
    ]
}
