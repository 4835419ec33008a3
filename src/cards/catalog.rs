//! The catalog: every card, corporation, milestone and standard project.
//!
//! Loaded once from JSON and shared read-only (behind an `Arc`) by every
//! component of a session. Loading fails fast: any descriptor naming an
//! effect, requirement or metric the engine does not know is an
//! [`Error::UnknownDescriptor`], and duplicate names are an
//! [`Error::Catalog`].
//!
//! ## File format
//!
//! ```json
//! {
//!   "cards": [ { "name": "...", "cost": 7, ... } ],
//!   "corporations": [ { "name": "...", "startingCurrency": 42, ... } ],
//!   "milestones": [ { "name": "...", "metric": "cities", "threshold": 3 } ],
//!   "standardProjects": [ { "id": "city", "name": "City", "cost": 25, ... } ]
//! }
//! ```

use rustc_hash::FxHashMap;
use serde::Deserialize;

use super::card::Card;
use super::corporation::Corporation;
use super::milestone::{Milestone, StandardProject};
use crate::effects::EffectEngine;
use crate::error::{Error, Result};

const BUILTIN: &str = include_str!("../../data/catalog.json");

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogFile {
    #[serde(default)]
    cards: Vec<Card>,
    #[serde(default)]
    corporations: Vec<Corporation>,
    #[serde(default)]
    milestones: Vec<Milestone>,
    #[serde(default)]
    standard_projects: Vec<StandardProject>,
}

/// Read-only game content.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    cards: FxHashMap<String, Card>,
    /// Card names in file order; the unshuffled deck.
    card_order: Vec<String>,
    corporations: FxHashMap<String, Corporation>,
    corporation_order: Vec<String>,
    milestones: Vec<Milestone>,
    projects: Vec<StandardProject>,
}

impl Catalog {
    /// The bundled content, validated against the standard registries.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN)
    }

    /// Parse and validate against the standard registries.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_json_with(json, &EffectEngine::standard())
    }

    /// Parse and validate against a specific engine's registries.
    pub fn from_json_with(json: &str, engine: &EffectEngine) -> Result<Self> {
        let file: CatalogFile =
            serde_json::from_str(json).map_err(|e| Error::Catalog(e.to_string()))?;

        let mut catalog = Self::new();
        for card in file.cards {
            catalog.add_card(card)?;
        }
        for corporation in file.corporations {
            catalog.add_corporation(corporation)?;
        }
        for milestone in file.milestones {
            catalog.add_milestone(milestone)?;
        }
        for project in file.standard_projects {
            catalog.add_project(project)?;
        }

        catalog.validate(engine)?;
        Ok(catalog)
    }

    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Building ===

    /// Add a card. Fails if the name is taken.
    pub fn add_card(&mut self, card: Card) -> Result<()> {
        if self.cards.contains_key(&card.name) {
            return Err(Error::Catalog(format!("duplicate card '{}'", card.name)));
        }
        self.card_order.push(card.name.clone());
        self.cards.insert(card.name.clone(), card);
        Ok(())
    }

    pub fn add_corporation(&mut self, corporation: Corporation) -> Result<()> {
        if self.corporations.contains_key(&corporation.name) {
            return Err(Error::Catalog(format!(
                "duplicate corporation '{}'",
                corporation.name
            )));
        }
        self.corporation_order.push(corporation.name.clone());
        self.corporations.insert(corporation.name.clone(), corporation);
        Ok(())
    }

    pub fn add_milestone(&mut self, milestone: Milestone) -> Result<()> {
        if self.milestone(&milestone.name).is_some() {
            return Err(Error::Catalog(format!(
                "duplicate milestone '{}'",
                milestone.name
            )));
        }
        self.milestones.push(milestone);
        Ok(())
    }

    pub fn add_project(&mut self, project: StandardProject) -> Result<()> {
        if self.project(&project.id).is_some() {
            return Err(Error::Catalog(format!(
                "duplicate standard project '{}'",
                project.id
            )));
        }
        self.projects.push(project);
        Ok(())
    }

    /// Check every descriptor against the engine's registries.
    pub fn validate(&self, engine: &EffectEngine) -> Result<()> {
        for card in self.cards() {
            engine.validate_effects(&card.effects, &card.name)?;
            engine.validate_requirements(&card.requirements, &card.name)?;
        }
        for project in &self.projects {
            engine.validate_effects(&project.effects, &project.id)?;
        }
        for milestone in &self.milestones {
            engine.validate_metric(milestone)?;
        }
        Ok(())
    }

    // === Lookup ===

    #[must_use]
    pub fn card(&self, name: &str) -> Option<&Card> {
        self.cards.get(name)
    }

    /// Cards in catalog order.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.card_order.iter().filter_map(|name| self.cards.get(name))
    }

    /// Card names in catalog order.
    #[must_use]
    pub fn card_names(&self) -> &[String] {
        &self.card_order
    }

    #[must_use]
    pub fn corporation(&self, name: &str) -> Option<&Corporation> {
        self.corporations.get(name)
    }

    /// Corporation names in catalog order.
    #[must_use]
    pub fn corporation_names(&self) -> &[String] {
        &self.corporation_order
    }

    #[must_use]
    pub fn milestone(&self, name: &str) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.name == name)
    }

    #[must_use]
    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    #[must_use]
    pub fn project(&self, id: &str) -> Option<&StandardProject> {
        self.projects.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn projects(&self) -> &[StandardProject] {
        &self.projects
    }
}
