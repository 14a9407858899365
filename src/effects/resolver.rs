//! Effect resolution - executing effects on game state.
//!
//! The `EffectRegistry` maps each `EffectKind` to a handler. Spell casting
//! and ability activation both go through it, so adding a new kind means
//! registering a handler, not touching the call sites.
//!
//! Resolution is two-phase. `validate` checks every precondition against
//! an immutable state and resolves the target; `apply` performs the
//! mutation and cannot fail. Callers debit costs between the two, so a
//! rejected effect never leaves a partial write behind.

use rustc_hash::FxHashMap;

use super::effect::{Effect, EffectKind, TargetRequirement};
use super::targeting::{self, Side, TargetRef};
use crate::cards::CardRegistry;
use crate::core::{EntityId, GameError, GameEvent, GameResult, GameState, RulesConfig};

/// What is producing the effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectSource {
    /// A spell card being played from hand.
    Card { instance_id: EntityId },
    /// An ability of a player field unit.
    Unit { unit_id: EntityId },
}

/// Everything a handler may read while validating or applying.
pub struct EffectContext<'a> {
    pub registry: &'a CardRegistry,
    pub config: &'a RulesConfig,
    pub effect: &'a Effect,
    pub source: EffectSource,
    pub target_id: Option<EntityId>,
    /// Hand slots that will be free when the effect applies (the spell's
    /// own card leaves the hand first).
    pub hand_slots_freed: usize,
}

impl<'a> EffectContext<'a> {
    /// Context for a spell played from hand.
    #[must_use]
    pub fn for_spell(
        registry: &'a CardRegistry,
        config: &'a RulesConfig,
        effect: &'a Effect,
        instance_id: EntityId,
        target_id: Option<EntityId>,
    ) -> Self {
        Self {
            registry,
            config,
            effect,
            source: EffectSource::Card { instance_id },
            target_id,
            hand_slots_freed: 1,
        }
    }

    /// Context for a unit ability.
    #[must_use]
    pub fn for_ability(
        registry: &'a CardRegistry,
        config: &'a RulesConfig,
        effect: &'a Effect,
        unit_id: EntityId,
        target_id: Option<EntityId>,
    ) -> Self {
        Self {
            registry,
            config,
            effect,
            source: EffectSource::Unit { unit_id },
            target_id,
            hand_slots_freed: 0,
        }
    }
}

/// Resolve the effect's target requirement against the current state.
pub fn resolve_requirement(ctx: &EffectContext<'_>, state: &GameState) -> GameResult<Option<TargetRef>> {
    let lookup = |id: EntityId| targeting::find_target(state, id).ok_or(GameError::TargetNotFound(id));

    match ctx.effect.target {
        TargetRequirement::None => Ok(None),
        TargetRequirement::EnemyUnit => {
            let id = ctx.target_id.ok_or(GameError::TargetRequired)?;
            match lookup(id)? {
                target @ TargetRef::EnemyUnit { .. } => Ok(Some(target)),
                _ => Err(GameError::InvalidTarget(id)),
            }
        }
        TargetRequirement::Friendly => {
            let id = ctx.target_id.ok_or(GameError::TargetRequired)?;
            match lookup(id)? {
                target @ (TargetRef::Player | TargetRef::PlayerUnit { .. }) => Ok(Some(target)),
                TargetRef::EnemyUnit { .. } => Err(GameError::InvalidTarget(id)),
            }
        }
        TargetRequirement::SourceUnit => match ctx.source {
            EffectSource::Unit { unit_id } => state
                .player_field
                .slot_of(unit_id)
                .map(|slot| Some(TargetRef::PlayerUnit { slot }))
                .ok_or(GameError::CardNotOnField(unit_id)),
            EffectSource::Card { .. } => Err(GameError::TargetRequired),
        },
    }
}

/// Handler for one effect kind.
pub trait EffectHandler: Send + Sync {
    /// The kind this handler resolves.
    fn kind(&self) -> EffectKind;

    /// Check preconditions and resolve the target. Must not mutate.
    fn validate(&self, ctx: &EffectContext<'_>, state: &GameState) -> GameResult<Option<TargetRef>> {
        resolve_requirement(ctx, state)
    }

    /// Perform the effect on a target returned by `validate`.
    fn apply(&self, ctx: &EffectContext<'_>, state: &mut GameState, target: Option<TargetRef>);
}

/// Direct damage, then death resolution. No overkill spill.
pub struct DamageHandler;

impl EffectHandler for DamageHandler {
    fn kind(&self) -> EffectKind {
        EffectKind::Damage
    }

    fn apply(&self, ctx: &EffectContext<'_>, state: &mut GameState, target: Option<TargetRef>) {
        match target {
            Some(TargetRef::Player) => targeting::damage_player(state, ctx.effect.value),
            Some(TargetRef::EnemyUnit { slot }) => {
                targeting::damage_unit(state, Side::Enemy, slot, ctx.effect.value);
            }
            Some(TargetRef::PlayerUnit { slot }) => {
                targeting::damage_unit(state, Side::Player, slot, ctx.effect.value);
            }
            None => {}
        }
    }
}

/// Restore HP up to max.
pub struct HealHandler;

impl EffectHandler for HealHandler {
    fn kind(&self) -> EffectKind {
        EffectKind::Heal
    }

    fn apply(&self, ctx: &EffectContext<'_>, state: &mut GameState, target: Option<TargetRef>) {
        let amount = ctx.effect.value.max(0);
        match target {
            Some(TargetRef::Player) => {
                state.player.current_hp = (state.player.current_hp + amount).min(state.player.max_hp);
            }
            Some(TargetRef::PlayerUnit { slot }) => {
                if let Some(unit) = state.player_field.get_mut(slot) {
                    unit.heal(amount);
                }
            }
            Some(TargetRef::EnemyUnit { slot }) => {
                if let Some(unit) = state.enemy_field.get_mut(slot) {
                    unit.heal(amount);
                }
            }
            None => {}
        }
    }
}

/// Replace the acting unit's identity in place.
pub struct TransformHandler;

impl EffectHandler for TransformHandler {
    fn kind(&self) -> EffectKind {
        EffectKind::Transform
    }

    fn validate(&self, ctx: &EffectContext<'_>, state: &GameState) -> GameResult<Option<TargetRef>> {
        let target = resolve_requirement(ctx, state)?;
        let into = ctx
            .effect
            .transform_into()
            .ok_or(GameError::Internal("transform effect without a card".into()))?;
        if !ctx.registry.require(into)?.is_unit() {
            return Err(GameError::UnknownCard(into));
        }
        match target {
            Some(TargetRef::PlayerUnit { .. }) => Ok(target),
            _ => Err(GameError::TargetRequired),
        }
    }

    fn apply(&self, ctx: &EffectContext<'_>, state: &mut GameState, target: Option<TargetRef>) {
        let Some(TargetRef::PlayerUnit { slot }) = target else {
            return;
        };
        let Some(def) = ctx.effect.transform_into().and_then(|id| ctx.registry.get(id)) else {
            return;
        };
        if let Some(unit) = state.player_field.get_mut(slot) {
            unit.transform_into(def);
            let unit_id = unit.id;
            state.events.push_back(GameEvent::UnitTransformed { unit_id, into: def.id });
        }
    }
}

/// Credit gold.
pub struct GoldHandler;

impl EffectHandler for GoldHandler {
    fn kind(&self) -> EffectKind {
        EffectKind::Gold
    }

    fn apply(&self, ctx: &EffectContext<'_>, state: &mut GameState, _target: Option<TargetRef>) {
        let amount = u32::try_from(ctx.effect.value.max(0)).unwrap_or(u32::MAX);
        state.gain_gold(amount);
    }
}

/// Draw cards up to the hand cap.
pub struct DrawHandler;

impl EffectHandler for DrawHandler {
    fn kind(&self) -> EffectKind {
        EffectKind::Draw
    }

    fn validate(&self, ctx: &EffectContext<'_>, state: &GameState) -> GameResult<Option<TargetRef>> {
        let target = resolve_requirement(ctx, state)?;
        let hand_after = state.hand.len().saturating_sub(ctx.hand_slots_freed);
        if ctx.effect.value > 0 && hand_after >= ctx.config.max_hand_size {
            return Err(GameError::HandFull);
        }
        Ok(target)
    }

    fn apply(&self, ctx: &EffectContext<'_>, state: &mut GameState, _target: Option<TargetRef>) {
        let count = usize::try_from(ctx.effect.value.max(0)).unwrap_or(0);
        state.draw_cards(count, ctx.config.max_hand_size);
    }
}

/// Lookup table from effect kind to handler.
///
/// ```
/// use card_gauntlet::effects::{EffectKind, EffectRegistry};
///
/// let registry = EffectRegistry::standard();
/// assert!(registry.handler(EffectKind::Transform).is_ok());
/// ```
pub struct EffectRegistry {
    handlers: FxHashMap<EffectKind, Box<dyn EffectHandler>>,
}

impl EffectRegistry {
    /// A registry with no handlers.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            handlers: FxHashMap::default(),
        }
    }

    /// A registry with a handler for every built-in kind.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(DamageHandler));
        registry.register(Box::new(HealHandler));
        registry.register(Box::new(TransformHandler));
        registry.register(Box::new(GoldHandler));
        registry.register(Box::new(DrawHandler));
        registry
    }

    /// Register a handler, replacing any previous handler for its kind.
    pub fn register(&mut self, handler: Box<dyn EffectHandler>) {
        self.handlers.insert(handler.kind(), handler);
    }

    /// Handler for a kind.
    pub fn handler(&self, kind: EffectKind) -> GameResult<&dyn EffectHandler> {
        self.handlers
            .get(&kind)
            .map(Box::as_ref)
            .ok_or_else(|| GameError::Internal(format!("no handler registered for {:?}", kind)))
    }

    /// Validate an effect without mutating.
    pub fn validate(&self, ctx: &EffectContext<'_>, state: &GameState) -> GameResult<Option<TargetRef>> {
        self.handler(ctx.effect.kind)?.validate(ctx, state)
    }

    /// Apply a validated effect and record it.
    pub fn apply(&self, ctx: &EffectContext<'_>, state: &mut GameState, target: Option<TargetRef>) -> GameResult<()> {
        let handler = self.handler(ctx.effect.kind)?;
        let target_id = ctx.effect_target_id(target, state);
        handler.apply(ctx, state, target);
        state.events.push_back(GameEvent::EffectResolved {
            kind: ctx.effect.kind,
            target_id,
        });
        Ok(())
    }
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl EffectContext<'_> {
    fn effect_target_id(&self, target: Option<TargetRef>, state: &GameState) -> Option<EntityId> {
        match target? {
            TargetRef::Player => Some(state.player.id),
            TargetRef::EnemyUnit { slot } => state.enemy_field.get(slot).map(|u| u.id),
            TargetRef::PlayerUnit { slot } => state.player_field.get(slot).map(|u| u.id),
        }
    }
}
