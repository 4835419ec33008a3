//! Corporations and their cost discounts.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::card::{Card, Tag};
use crate::core::{Resource, ResourceMap};

/// What a discount applies to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiscountTarget {
    /// Every project card.
    AnyCard,
    /// Cards carrying a tag.
    CardTag(Tag),
    /// One standard project, by id.
    StandardProject(String),
}

/// A flat MegaCredit reduction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    pub applies_to: DiscountTarget,
    pub amount: i32,
}

/// Corporation definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Corporation {
    pub name: String,

    /// Opening MegaCredits.
    pub starting_currency: i32,

    #[serde(default)]
    pub starting_resources: FxHashMap<Resource, i32>,

    #[serde(default)]
    pub starting_production: FxHashMap<Resource, i32>,

    #[serde(default)]
    pub ability_description: String,

    #[serde(default)]
    pub discounts: Vec<Discount>,
}

impl Corporation {
    #[must_use]
    pub fn new(name: impl Into<String>, starting_currency: i32) -> Self {
        Self {
            name: name.into(),
            starting_currency,
            starting_resources: FxHashMap::default(),
            starting_production: FxHashMap::default(),
            ability_description: String::new(),
            discounts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_production(mut self, resource: Resource, amount: i32) -> Self {
        self.starting_production.insert(resource, amount);
        self
    }

    #[must_use]
    pub fn with_discount(mut self, applies_to: DiscountTarget, amount: i32) -> Self {
        self.discounts.push(Discount { applies_to, amount });
        self
    }

    /// Opening stock: starting resources with the currency added on top.
    #[must_use]
    pub fn opening_resources(&self) -> ResourceMap {
        let mut stock = ResourceMap::from_sparse(&self.starting_resources);
        stock[Resource::MegaCredits] += self.starting_currency;
        stock
    }

    #[must_use]
    pub fn opening_production(&self) -> ResourceMap {
        ResourceMap::from_sparse(&self.starting_production)
    }

    /// Total discount on a project card. A tag discount applies once even
    /// if the card carries the tag twice.
    #[must_use]
    pub fn card_discount(&self, card: &Card) -> i32 {
        self.discounts
            .iter()
            .filter(|d| match &d.applies_to {
                DiscountTarget::AnyCard => true,
                DiscountTarget::CardTag(tag) => card.has_tag(*tag),
                DiscountTarget::StandardProject(_) => false,
            })
            .map(|d| d.amount)
            .sum()
    }

    /// Total discount on a standard project.
    #[must_use]
    pub fn project_discount(&self, project_id: &str) -> i32 {
        self.discounts
            .iter()
            .filter(|d| matches!(&d.applies_to, DiscountTarget::StandardProject(id) if id == project_id))
            .map(|d| d.amount)
            .sum()
    }
}
