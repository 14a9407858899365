//! Zones: the fixed-width battlefield rows.
//!
//! Card piles (deck, hand, discard, exhaust) are plain persistent vectors
//! on `GameState`; only the field has slot semantics worth a type.

mod field;

pub use field::{Field, FIELD_SLOTS};
