//! Effect system for spells and unit abilities.
//!
//! - `Effect`: kind + magnitude + target requirement
//! - `targeting`: id lookup and death resolution shared by all damage
//! - `EffectRegistry`: kind → handler dispatch table
//!
//! ## Design Philosophy
//!
//! Cards never carry code. A card names an effect kind and a value; the
//! registry owns the behavior. Handlers validate against an immutable
//! state before anything is written.

mod effect;
mod resolver;
pub mod targeting;

pub use effect::{Effect, EffectKind, TargetRequirement};
pub use resolver::{
    resolve_requirement, DamageHandler, DrawHandler, EffectContext, EffectHandler, EffectRegistry, EffectSource,
    GoldHandler, HealHandler, TransformHandler,
};
pub use targeting::{find_target, DamageOutcome, Side, TargetRef};
