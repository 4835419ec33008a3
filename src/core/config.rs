//! Game configuration.
//!
//! A `GameConfig` fixes table size limits, deal sizes, conversion rates,
//! milestone economics and the board layout. Defaults describe the standard
//! game; tables can override any field from JSON (missing fields keep the
//! default) or with the `with_*` builders.
//!
//! ```
//! use terraform_engine::core::{FirstPlayerPolicy, GameConfig};
//!
//! let config = GameConfig::default()
//!     .with_seed(7)
//!     .with_first_player_policy(FirstPlayerPolicy::Rotate);
//! assert!(config.validate().is_ok());
//! assert_eq!(config.row_widths, vec![5, 6, 7, 8, 9, 8, 7, 6, 5]);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How the first player changes between generations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstPlayerPolicy {
    /// The same seat opens every generation.
    #[default]
    Fixed,
    /// The opening seat moves one to the left each generation.
    Rotate,
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for deck shuffles.
    pub seed: u64,

    pub min_players: usize,
    pub max_players: usize,

    /// Terraform rating every player starts with.
    pub starting_terraform_rating: i32,

    /// Corporations dealt to each player at game start.
    pub corporations_dealt: usize,

    /// Research cards dealt in generation 1.
    pub initial_research_cards: usize,

    /// Research cards dealt in later generations.
    pub research_cards: usize,

    /// Price of each research card bought.
    pub card_buy_cost: i32,

    /// MegaCredits gained per card sold.
    pub card_sell_value: i32,

    /// Plants spent per greenery conversion.
    pub plants_per_greenery: i32,

    /// Heat spent per temperature step.
    pub heat_per_temperature: i32,

    pub milestone_cost: i32,
    pub milestone_points: i32,

    pub first_player_policy: FirstPlayerPolicy,

    /// Hex board row widths, top to bottom.
    pub row_widths: Vec<usize>,

    /// Coordinates reserved for ocean tiles.
    pub ocean_coords: Vec<(usize, usize)>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            min_players: 1,
            max_players: 5,
            starting_terraform_rating: 20,
            corporations_dealt: 2,
            initial_research_cards: 10,
            research_cards: 4,
            card_buy_cost: 3,
            card_sell_value: 1,
            plants_per_greenery: 8,
            heat_per_temperature: 8,
            milestone_cost: 8,
            milestone_points: 5,
            first_player_policy: FirstPlayerPolicy::Fixed,
            row_widths: vec![5, 6, 7, 8, 9, 8, 7, 6, 5],
            ocean_coords: vec![
                (0, 3),
                (0, 4),
                (1, 5),
                (3, 7),
                (4, 8),
                (5, 6),
                (5, 7),
                (6, 6),
                (8, 4),
            ],
        }
    }
}

impl GameConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the shuffle seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the first-player policy.
    #[must_use]
    pub fn with_first_player_policy(mut self, policy: FirstPlayerPolicy) -> Self {
        self.first_player_policy = policy;
        self
    }

    /// Set deal sizes for corporations and research.
    #[must_use]
    pub fn with_deal_sizes(mut self, corporations: usize, initial: usize, later: usize) -> Self {
        self.corporations_dealt = corporations;
        self.initial_research_cards = initial;
        self.research_cards = later;
        self
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.min_players == 0 || self.min_players > self.max_players || self.max_players > 255 {
            return Err(Error::Config(format!(
                "player range {}..={} is invalid",
                self.min_players, self.max_players
            )));
        }
        if self.row_widths.is_empty() || self.row_widths.contains(&0) {
            return Err(Error::Config("board rows must be non-empty".to_string()));
        }
        for &(row, col) in &self.ocean_coords {
            let in_bounds = self.row_widths.get(row).is_some_and(|&w| col < w);
            if !in_bounds {
                return Err(Error::Config(format!(
                    "ocean coordinate ({row}, {col}) is off the board"
                )));
            }
        }
        if self.corporations_dealt == 0 {
            return Err(Error::Config("at least one corporation must be dealt".to_string()));
        }
        if self.plants_per_greenery <= 0 || self.heat_per_temperature <= 0 {
            return Err(Error::Config("conversion rates must be positive".to_string()));
        }
        Ok(())
    }
}
