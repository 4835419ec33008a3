//! Project cards - static card data.
//!
//! A `Card` is pure data: cost, tags, points, an optional tile, and lists
//! of effect/requirement descriptors. Behavior is resolved by name through
//! the effect engine's registries whenever a card is played, so only names
//! ever appear in saved state.

use serde::{Deserialize, Serialize};

use crate::board::TileType;
use crate::effects::{EffectDescriptor, RequirementDescriptor};

/// Card category label used for synergies and requirements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Building,
    Space,
    Power,
    Science,
    Plant,
    Microbe,
    Animal,
    Earth,
    Jovian,
    City,
    Event,
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use terraform_engine::cards::{Card, Tag};
/// use terraform_engine::core::Resource;
/// use terraform_engine::effects::EffectDescriptor;
///
/// let card = Card::new("Heat Trappers", 6)
///     .with_tags(&[Tag::Power, Tag::Building])
///     .with_points(-1)
///     .with_effect(EffectDescriptor::increase_production(Resource::Energy, 1));
///
/// assert!(card.has_tag(Tag::Power));
/// assert_eq!(card.victory_points, -1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Unique card name; the catalog key.
    pub name: String,

    /// Price in MegaCredits before discounts.
    pub cost: i32,

    #[serde(default)]
    pub tags: Vec<Tag>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub victory_points: i32,

    /// Tile the card places when played (suspends for a target).
    #[serde(default)]
    pub tile_to_place: Option<TileType>,

    #[serde(default)]
    pub effects: Vec<EffectDescriptor>,

    #[serde(default)]
    pub requirements: Vec<RequirementDescriptor>,
}

impl Card {
    /// Create a card with a name and cost.
    #[must_use]
    pub fn new(name: impl Into<String>, cost: i32) -> Self {
        Self {
            name: name.into(),
            cost,
            tags: Vec::new(),
            description: String::new(),
            victory_points: 0,
            tile_to_place: None,
            effects: Vec::new(),
            requirements: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_tags(mut self, tags: &[Tag]) -> Self {
        self.tags.extend_from_slice(tags);
        self
    }

    #[must_use]
    pub fn with_points(mut self, points: i32) -> Self {
        self.victory_points = points;
        self
    }

    #[must_use]
    pub fn with_tile(mut self, tile: TileType) -> Self {
        self.tile_to_place = Some(tile);
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: EffectDescriptor) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_requirement(mut self, requirement: RequirementDescriptor) -> Self {
        self.requirements.push(requirement);
        self
    }

    #[must_use]
    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }
}
