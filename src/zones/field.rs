//! The battlefield: a fixed row of unit slots.
//!
//! Each side owns one `Field` of exactly `FIELD_SLOTS` slots. Slots are
//! never added or removed; a slot is either empty or holds one live unit.
//! Scan order (slot 0 first) is the tie-break everywhere a rule says
//! "first".

use serde::{Deserialize, Serialize};

use crate::core::{EntityId, FieldUnit};

/// Number of slots on each side of the field.
pub const FIELD_SLOTS: usize = 5;

/// A fixed-size row of unit slots.
///
/// ```
/// use card_gauntlet::zones::{Field, FIELD_SLOTS};
///
/// let field = Field::new();
/// assert_eq!(field.slots().len(), FIELD_SLOTS);
/// assert_eq!(field.first_empty(), Some(0));
/// assert!(field.is_clear());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    slots: [Option<FieldUnit>; FIELD_SLOTS],
}

impl Field {
    /// Create an empty field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All slots in scan order.
    #[must_use]
    pub fn slots(&self) -> &[Option<FieldUnit>; FIELD_SLOTS] {
        &self.slots
    }

    /// First empty slot by scan order.
    #[must_use]
    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.first_empty().is_none()
    }

    /// True when no slot holds a unit.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Unit in a slot.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&FieldUnit> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut FieldUnit> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    /// Slot holding the unit with this id.
    #[must_use]
    pub fn slot_of(&self, id: EntityId) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.as_ref().is_some_and(|u| u.id == id))
    }

    /// Unit with this id.
    #[must_use]
    pub fn find(&self, id: EntityId) -> Option<&FieldUnit> {
        self.slot_of(id).and_then(|slot| self.get(slot))
    }

    pub fn find_mut(&mut self, id: EntityId) -> Option<&mut FieldUnit> {
        let slot = self.slot_of(id)?;
        self.get_mut(slot)
    }

    /// Put a unit into an empty slot.
    ///
    /// Hands the unit back if the slot is occupied or out of range.
    pub fn place(&mut self, slot: usize, unit: FieldUnit) -> Result<(), FieldUnit> {
        match self.slots.get_mut(slot) {
            Some(entry @ None) => {
                *entry = Some(unit);
                Ok(())
            }
            _ => Err(unit),
        }
    }

    /// Empty a slot, returning what it held.
    pub fn remove(&mut self, slot: usize) -> Option<FieldUnit> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    /// Empty every slot, returning the removed units in scan order.
    pub fn clear(&mut self) -> Vec<FieldUnit> {
        self.slots.iter_mut().filter_map(Option::take).collect()
    }

    /// Occupied slots with their index.
    pub fn units(&self) -> impl Iterator<Item = (usize, &FieldUnit)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|u| (i, u)))
    }

    pub fn units_mut(&mut self) -> impl Iterator<Item = &mut FieldUnit> {
        self.slots.iter_mut().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardId};

    fn unit(id: u32) -> FieldUnit {
        let def = CardDefinition::unit(CardId::new(1), "Squire", 1, 100, 200);
        FieldUnit::enemy(EntityId(id), &def, 1).unwrap()
    }

    #[test]
    fn test_place_and_first_empty() {
        let mut field = Field::new();

        assert!(field.place(0, unit(1)).is_ok());
        assert!(field.place(2, unit(2)).is_ok());

        assert_eq!(field.first_empty(), Some(1));
        assert_eq!(field.live_count(), 2);
        assert!(!field.is_clear());
    }

    #[test]
    fn test_place_rejects_occupied_and_out_of_range() {
        let mut field = Field::new();
        field.place(0, unit(1)).unwrap();

        let back = field.place(0, unit(2)).unwrap_err();
        assert_eq!(back.id, EntityId(2));
        assert!(field.place(FIELD_SLOTS, unit(3)).is_err());
        assert_eq!(field.find(EntityId(1)).unwrap().id, EntityId(1));
    }

    #[test]
    fn test_full_field() {
        let mut field = Field::new();
        for slot in 0..FIELD_SLOTS {
            field.place(slot, unit(slot as u32 + 1)).unwrap();
        }

        assert!(field.is_full());
        assert_eq!(field.first_empty(), None);
        assert_eq!(field.slots().len(), FIELD_SLOTS);
    }

    #[test]
    fn test_remove_and_clear_keep_arity() {
        let mut field = Field::new();
        field.place(1, unit(1)).unwrap();
        field.place(3, unit(2)).unwrap();

        let removed = field.remove(1).unwrap();
        assert_eq!(removed.id, EntityId(1));
        assert!(field.remove(1).is_none());
        assert_eq!(field.slot_of(EntityId(2)), Some(3));

        let cleared = field.clear();
        assert_eq!(cleared.len(), 1);
        assert!(field.is_clear());
        assert_eq!(field.slots().len(), FIELD_SLOTS);
    }

    #[test]
    fn test_units_iterates_in_slot_order() {
        let mut field = Field::new();
        field.place(4, unit(7)).unwrap();
        field.place(1, unit(8)).unwrap();

        let order: Vec<_> = field.units().map(|(slot, u)| (slot, u.id.raw())).collect();
        assert_eq!(order, vec![(1, 8), (4, 7)]);
    }
}
