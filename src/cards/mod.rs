//! Card system: definitions, instances, registry, and the built-in catalog.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `CardDefinition`: Static card data (cost, unit stats or spell effect)
//! - `GameCard`: One owned copy of a card during a game
//! - `CardRegistry`: Card definition lookup

pub mod catalog;
pub mod definition;
pub mod instance;
pub mod registry;

pub use definition::{Ability, CardDefinition, CardId, CardKind, UnitStats};
pub use instance::GameCard;
pub use registry::CardRegistry;
