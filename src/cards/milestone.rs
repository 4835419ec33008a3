//! Milestone and standard project definitions.
//!
//! Both are data records. Milestones name a metric from the effect engine's
//! metric registry; standard projects carry effect descriptors like cards.

use serde::{Deserialize, Serialize};

use super::card::Tag;
use crate::board::TileType;
use crate::effects::EffectDescriptor;

/// A milestone: reach `threshold` on `metric` to claim it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Metric registry key (for example `cities` or `tags`).
    pub metric: String,

    /// Tag argument for tag-counting metrics.
    #[serde(default)]
    pub tag: Option<Tag>,

    pub threshold: i32,
}

impl Milestone {
    #[must_use]
    pub fn new(name: impl Into<String>, metric: impl Into<String>, threshold: i32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            metric: metric.into(),
            tag: None,
            threshold,
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tag = Some(tag);
        self
    }
}

/// A standard project, always available during the action phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardProject {
    /// Stable identifier used in move payloads.
    pub id: String,

    pub name: String,

    pub cost: i32,

    #[serde(default)]
    pub effects: Vec<EffectDescriptor>,

    /// Tile placed on completion (suspends for a target).
    #[serde(default)]
    pub tile: Option<TileType>,

    /// Suspends for a card sale instead of resolving immediately.
    #[serde(default)]
    pub sells_cards: bool,
}

impl StandardProject {
    /// True when using the project waits on a follow-up choice.
    #[must_use]
    pub fn suspends(&self) -> bool {
        self.tile.is_some() || self.sells_cards
    }
}
