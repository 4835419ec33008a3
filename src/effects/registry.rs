//! Name-keyed registries of pure functions.
//!
//! Three registries back the engine: effects, requirements and milestone
//! metrics. Each maps a descriptor `type` string to a plain `fn` plus the
//! parameters that descriptor must carry. Plain function pointers keep the
//! registries `Copy`-cheap to look up and free of captured state.

use rustc_hash::FxHashMap;

use super::descriptor::{EffectDescriptor, RequirementDescriptor};
use super::engine::EffectContext;
use crate::board::Board;
use crate::cards::Tag;
use crate::core::Player;

/// Applies one effect.
pub type EffectFn = fn(&EffectDescriptor, &mut EffectContext<'_>);

/// Evaluates one requirement for a player.
pub type RequirementFn = fn(&RequirementDescriptor, &Player, &Board) -> bool;

/// Measures a player for a milestone.
pub type MetricFn = fn(&Player, &Board, Option<Tag>) -> i32;

/// Parameters a descriptor must supply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Needs {
    pub resource: bool,
    pub tag: bool,
    pub amount: bool,
}

impl Needs {
    pub const NONE: Needs = Needs {
        resource: false,
        tag: false,
        amount: false,
    };
    pub const TAG: Needs = Needs {
        resource: false,
        tag: true,
        amount: false,
    };
    pub const AMOUNT: Needs = Needs {
        resource: false,
        tag: false,
        amount: true,
    };
    pub const RESOURCE_AMOUNT: Needs = Needs {
        resource: true,
        tag: false,
        amount: true,
    };
    pub const TAG_AMOUNT: Needs = Needs {
        resource: false,
        tag: true,
        amount: true,
    };

    /// First missing parameter, if any.
    #[must_use]
    pub fn missing(&self, resource: bool, tag: bool, amount: bool) -> Option<&'static str> {
        if self.resource && !resource {
            Some("resource")
        } else if self.tag && !tag {
            Some("tag")
        } else if self.amount && !amount {
            Some("amount")
        } else {
            None
        }
    }
}

/// Registry from descriptor type name to implementation.
#[derive(Clone)]
pub struct Registry<F> {
    entries: FxHashMap<String, (F, Needs)>,
}

impl<F> std::fmt::Debug for Registry<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.entries.keys().collect();
        names.sort_unstable();
        f.debug_struct("Registry").field("entries", &names).finish()
    }
}

impl<F> Default for Registry<F> {
    fn default() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }
}

impl<F: Copy> Registry<F> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace an implementation.
    pub fn register(&mut self, name: impl Into<String>, f: F, needs: Needs) {
        self.entries.insert(name.into(), (f, needs));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<F> {
        self.entries.get(name).map(|(f, _)| *f)
    }

    #[must_use]
    pub fn needs(&self, name: &str) -> Option<Needs> {
        self.entries.get(name).map(|(_, n)| *n)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
