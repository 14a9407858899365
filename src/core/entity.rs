//! Entity identification system.
//!
//! Every addressable game object (the player avatar, card instances, field
//! units) has a unique `EntityId`.
//!
//! ## ID Layout
//!
//! - `0`: Reserved for the player avatar
//! - `1..`: Card instances and enemy units, allocated by `IdAllocator`
//!
//! A player unit summoned from a card keeps the card instance's id, so the
//! id a client saw in hand is the id it targets on the field.
//!
//! ```
//! use card_gauntlet::core::{EntityId, IdAllocator};
//!
//! let mut ids = IdAllocator::new();
//! let first = ids.alloc();
//!
//! assert!(EntityId::PLAYER.is_player());
//! assert!(!first.is_player());
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for any game entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl EntityId {
    /// The player avatar.
    pub const PLAYER: EntityId = EntityId(0);

    /// Check if this entity ID refers to the player avatar.
    #[must_use]
    pub const fn is_player(self) -> bool {
        self.0 == Self::PLAYER.0
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Monotonic allocator for entity ids.
///
/// Ids are never reused within a game, so an id that left the field can
/// never alias a newer unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    /// Create an allocator whose first id follows the reserved player id.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: EntityId::PLAYER.0 + 1 }
    }

    /// Allocate a new entity ID.
    pub fn alloc(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }

    /// Peek at the id the next `alloc` call will return.
    #[must_use]
    pub const fn peek(&self) -> EntityId {
        EntityId(self.next)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
