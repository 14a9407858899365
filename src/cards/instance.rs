//! Card instances - one physical copy of a card in the player's collection.
//!
//! A `GameCard` lives in exactly one container at a time: deck, hand,
//! discard, exhaust, or attached to the field unit it summoned. Moves
//! between containers transfer ownership of the value; nothing clones a
//! card instance in place.

use serde::{Deserialize, Serialize};

use super::definition::CardId;
use crate::core::EntityId;

/// A card instance in a game.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameCard {
    /// Unique instance id. A unit summoned from this card reuses it.
    pub instance_id: EntityId,

    /// Reference to the card definition.
    pub card_id: CardId,

    /// Owning entity (the player avatar for every collection card).
    pub owner: EntityId,
}

impl GameCard {
    /// Create a card instance owned by the player.
    #[must_use]
    pub fn new(instance_id: EntityId, card_id: CardId) -> Self {
        Self {
            instance_id,
            card_id,
            owner: EntityId::PLAYER,
        }
    }
}
