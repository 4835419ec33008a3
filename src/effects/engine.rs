//! The effect engine: resolves descriptors through the registries.
//!
//! `EffectEngine` owns three registries (effects, requirements, milestone
//! metrics). The catalog is validated against them at load time, so every
//! descriptor the engine meets during play has an implementation.
//!
//! Effects mutate the state handed to them through an [`EffectContext`]; the
//! context also carries the [`Dealer`] used by card-drawing effects, which is
//! how draws stay replayable.

use tracing::warn;

use super::builtin;
use super::descriptor::{EffectDescriptor, RequirementDescriptor};
use super::registry::{EffectFn, MetricFn, Needs, Registry, RequirementFn};
use crate::board::Board;
use crate::cards::{Milestone, Tag};
use crate::core::{GameState, Player, PlayerId};
use crate::error::{Error, Result};

/// Source of cards for drawing effects.
pub trait Dealer {
    /// Draw up to `count` cards for `recipient`. The caller puts them in hand.
    fn draw_cards(&mut self, state: &mut GameState, recipient: PlayerId, count: usize)
        -> Vec<String>;
}

/// Everything an effect can touch.
pub struct EffectContext<'a> {
    pub state: &'a mut GameState,
    /// Player the effect resolves for.
    pub actor: PlayerId,
    /// Tags of the card being played; empty for standard projects.
    pub source_tags: &'a [Tag],
    pub dealer: &'a mut dyn Dealer,
}

impl<'a> EffectContext<'a> {
    pub fn new(
        state: &'a mut GameState,
        actor: PlayerId,
        source_tags: &'a [Tag],
        dealer: &'a mut dyn Dealer,
    ) -> Self {
        Self {
            state,
            actor,
            source_tags,
            dealer,
        }
    }
}

/// Descriptor-driven rules engine.
///
/// ## Example
///
/// ```
/// use terraform_engine::effects::EffectEngine;
///
/// let engine = EffectEngine::standard();
/// assert!(engine.knows_effect("gainMcPerTag"));
/// assert!(engine.knows_requirement("minOxygen"));
/// assert!(!engine.knows_effect("summonDragon"));
/// ```
#[derive(Clone, Debug)]
pub struct EffectEngine {
    effects: Registry<EffectFn>,
    requirements: Registry<RequirementFn>,
    metrics: Registry<MetricFn>,
}

impl Default for EffectEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl EffectEngine {
    /// Engine with the built-in registries.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            effects: builtin::effects(),
            requirements: builtin::requirements(),
            metrics: builtin::metrics(),
        }
    }

    /// Engine with no registered behavior.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            effects: Registry::new(),
            requirements: Registry::new(),
            metrics: Registry::new(),
        }
    }

    // === Registration ===

    #[must_use]
    pub fn with_effect(mut self, name: &str, f: EffectFn, needs: Needs) -> Self {
        self.effects.register(name, f, needs);
        self
    }

    #[must_use]
    pub fn with_requirement(mut self, name: &str, f: RequirementFn, needs: Needs) -> Self {
        self.requirements.register(name, f, needs);
        self
    }

    #[must_use]
    pub fn with_metric(mut self, name: &str, f: MetricFn, needs: Needs) -> Self {
        self.metrics.register(name, f, needs);
        self
    }

    #[must_use]
    pub fn knows_effect(&self, name: &str) -> bool {
        self.effects.contains(name)
    }

    #[must_use]
    pub fn knows_requirement(&self, name: &str) -> bool {
        self.requirements.contains(name)
    }

    #[must_use]
    pub fn knows_metric(&self, name: &str) -> bool {
        self.metrics.contains(name)
    }

    // === Validation ===

    /// Fail on any unknown or underspecified effect descriptor.
    pub fn validate_effects(&self, effects: &[EffectDescriptor], owner: &str) -> Result<()> {
        for d in effects {
            let needs = self.effects.needs(&d.kind).ok_or_else(|| Error::UnknownDescriptor {
                kind: "effect",
                name: d.kind.clone(),
                owner: owner.to_string(),
            })?;
            if let Some(field) = needs.missing(d.resource.is_some(), d.tag.is_some(), d.amount.is_some()) {
                return Err(Error::Catalog(format!(
                    "effect '{}' in '{owner}' is missing '{field}'",
                    d.kind
                )));
            }
        }
        Ok(())
    }

    pub fn validate_requirements(
        &self,
        requirements: &[RequirementDescriptor],
        owner: &str,
    ) -> Result<()> {
        for r in requirements {
            let needs = self
                .requirements
                .needs(&r.kind)
                .ok_or_else(|| Error::UnknownDescriptor {
                    kind: "requirement",
                    name: r.kind.clone(),
                    owner: owner.to_string(),
                })?;
            if let Some(field) = needs.missing(r.resource.is_some(), r.tag.is_some(), r.amount.is_some()) {
                return Err(Error::Catalog(format!(
                    "requirement '{}' in '{owner}' is missing '{field}'",
                    r.kind
                )));
            }
        }
        Ok(())
    }

    pub fn validate_metric(&self, milestone: &Milestone) -> Result<()> {
        let needs = self
            .metrics
            .needs(&milestone.metric)
            .ok_or_else(|| Error::UnknownDescriptor {
                kind: "metric",
                name: milestone.metric.clone(),
                owner: milestone.name.clone(),
            })?;
        if let Some(field) = needs.missing(false, milestone.tag.is_some(), true) {
            return Err(Error::Catalog(format!(
                "milestone '{}' is missing '{field}'",
                milestone.name
            )));
        }
        Ok(())
    }

    // === Evaluation ===

    /// Apply effects in order.
    pub fn apply(&self, effects: &[EffectDescriptor], ctx: &mut EffectContext<'_>) {
        for d in effects {
            match self.effects.get(&d.kind) {
                Some(f) => f(d, ctx),
                None => warn!(effect = %d.kind, "skipping unregistered effect"),
            }
        }
    }

    /// Every requirement holds. Unregistered requirements never hold.
    #[must_use]
    pub fn requirements_met(
        &self,
        requirements: &[RequirementDescriptor],
        player: &Player,
        board: &Board,
    ) -> bool {
        requirements.iter().all(|r| {
            self.requirements
                .get(&r.kind)
                .is_some_and(|f| f(r, player, board))
        })
    }

    /// A player's current value on a milestone's metric.
    #[must_use]
    pub fn measure(&self, milestone: &Milestone, player: &Player, board: &Board) -> Option<i32> {
        self.metrics
            .get(&milestone.metric)
            .map(|f| f(player, board, milestone.tag))
    }

    /// The player meets the milestone threshold.
    #[must_use]
    pub fn milestone_reached(&self, milestone: &Milestone, player: &Player, board: &Board) -> bool {
        self.measure(milestone, player, board)
            .is_some_and(|value| value >= milestone.threshold)
    }
}
