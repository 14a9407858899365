//! Effect definitions.
//!
//! Spells and unit abilities both carry an `Effect`: a kind from a small
//! closed set, a magnitude, and what the effect needs to be pointed at.
//! The kind is the key into the `EffectRegistry`; nothing dispatches on
//! card ids.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;

/// The closed set of effect kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Direct damage to a resolved target, followed by death resolution.
    Damage,
    /// Restore HP, capped at max HP.
    Heal,
    /// Replace the acting unit's identity in place.
    Transform,
    /// Credit gold.
    Gold,
    /// Draw cards, respecting the hand cap.
    Draw,
}

impl EffectKind {
    /// Every kind, in registration order.
    pub const ALL: [EffectKind; 5] = [
        EffectKind::Damage,
        EffectKind::Heal,
        EffectKind::Transform,
        EffectKind::Gold,
        EffectKind::Draw,
    ];
}

/// What an effect must be pointed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetRequirement {
    /// No target; a supplied target id is ignored.
    None,
    /// A live enemy field unit.
    EnemyUnit,
    /// A live player field unit or the player avatar.
    Friendly,
    /// The unit activating the ability. Only valid on abilities.
    SourceUnit,
}

/// An effect with its magnitude.
///
/// `value` is damage, healing, gold, or cards drawn. For `Transform` it is
/// the raw id of the card definition to become.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub value: i64,
    pub target: TargetRequirement,
}

impl Effect {
    /// Create a damage effect aimed at an enemy unit.
    #[must_use]
    pub fn damage(amount: i64) -> Self {
        Self {
            kind: EffectKind::Damage,
            value: amount,
            target: TargetRequirement::EnemyUnit,
        }
    }

    /// Create a heal effect aimed at a friendly unit or the avatar.
    #[must_use]
    pub fn heal(amount: i64) -> Self {
        Self {
            kind: EffectKind::Heal,
            value: amount,
            target: TargetRequirement::Friendly,
        }
    }

    /// Create a gold effect.
    #[must_use]
    pub fn gold(amount: i64) -> Self {
        Self {
            kind: EffectKind::Gold,
            value: amount,
            target: TargetRequirement::None,
        }
    }

    /// Create a draw cards effect.
    #[must_use]
    pub fn draw(count: i64) -> Self {
        Self {
            kind: EffectKind::Draw,
            value: count,
            target: TargetRequirement::None,
        }
    }

    /// Create a transform effect turning the source unit into `into`.
    #[must_use]
    pub fn transform(into: CardId) -> Self {
        Self {
            kind: EffectKind::Transform,
            value: i64::from(into.raw()),
            target: TargetRequirement::SourceUnit,
        }
    }

    /// Override the target requirement (builder pattern).
    #[must_use]
    pub fn targeting(mut self, target: TargetRequirement) -> Self {
        self.target = target;
        self
    }

    /// The card a `Transform` effect turns into.
    #[must_use]
    pub fn transform_into(&self) -> Option<CardId> {
        match self.kind {
            EffectKind::Transform => u32::try_from(self.value).ok().map(CardId::new),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_pick_targets() {
        assert_eq!(Effect::damage(5).target, TargetRequirement::EnemyUnit);
        assert_eq!(Effect::heal(5).target, TargetRequirement::Friendly);
        assert_eq!(Effect::gold(5).target, TargetRequirement::None);
        assert_eq!(Effect::draw(1).target, TargetRequirement::None);
        assert_eq!(Effect::transform(CardId::new(7)).target, TargetRequirement::SourceUnit);
    }

    #[test]
    fn test_transform_into() {
        assert_eq!(Effect::transform(CardId::new(7)).transform_into(), Some(CardId::new(7)));
        assert_eq!(Effect::damage(7).transform_into(), None);
    }

    #[test]
    fn test_targeting_override() {
        let effect = Effect::damage(50).targeting(TargetRequirement::Friendly);
        assert_eq!(effect.kind, EffectKind::Damage);
        assert_eq!(effect.target, TargetRequirement::Friendly);
    }
}
