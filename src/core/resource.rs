//! Resources and per-resource counters.
//!
//! MegaCredits are the currency; the other five are stock resources.
//! `ResourceMap` is a fixed-size array indexed by `Resource`, so copies are
//! cheap and serialization order is stable.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// A resource kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    /// Currency.
    #[serde(alias = "mc")]
    MegaCredits,
    Steel,
    Titanium,
    Plants,
    Energy,
    Heat,
}

impl Resource {
    /// All resources in storage order.
    pub const ALL: [Resource; 6] = [
        Resource::MegaCredits,
        Resource::Steel,
        Resource::Titanium,
        Resource::Plants,
        Resource::Energy,
        Resource::Heat,
    ];

    const fn slot(self) -> usize {
        match self {
            Resource::MegaCredits => 0,
            Resource::Steel => 1,
            Resource::Titanium => 2,
            Resource::Plants => 3,
            Resource::Energy => 4,
            Resource::Heat => 5,
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Resource::MegaCredits => "MC",
            Resource::Steel => "steel",
            Resource::Titanium => "titanium",
            Resource::Plants => "plants",
            Resource::Energy => "energy",
            Resource::Heat => "heat",
        };
        f.write_str(name)
    }
}

/// One counter per resource.
///
/// ```
/// use terraform_engine::core::{Resource, ResourceMap};
///
/// let mut stock = ResourceMap::default();
/// stock[Resource::Heat] += 8;
/// assert_eq!(stock[Resource::Heat], 8);
/// assert_eq!(stock[Resource::Plants], 0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceMap([i32; 6]);

impl ResourceMap {
    /// Build from a sparse map (catalog format), missing entries are zero.
    #[must_use]
    pub fn from_sparse(entries: &FxHashMap<Resource, i32>) -> Self {
        let mut map = Self::default();
        for (&resource, &amount) in entries {
            map[resource] = amount;
        }
        map
    }

    /// Add another map entry-wise.
    pub fn add_all(&mut self, other: &ResourceMap) {
        for resource in Resource::ALL {
            self[resource] += other[resource];
        }
    }

    /// Iterate over (resource, amount) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Resource, i32)> + '_ {
        Resource::ALL.iter().map(move |&r| (r, self[r]))
    }
}

impl Index<Resource> for ResourceMap {
    type Output = i32;

    fn index(&self, resource: Resource) -> &Self::Output {
        &self.0[resource.slot()]
    }
}

impl IndexMut<Resource> for ResourceMap {
    fn index_mut(&mut self, resource: Resource) -> &mut Self::Output {
        &mut self.0[resource.slot()]
    }
}
