//! The board: hex grid, global parameters, milestone claims.
//!
//! Global parameters only move up and stop at their maxima. Once all three
//! are maxed the final-generation flag is raised and never lowered.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::layout::HexLayout;
use super::tile::{Coord, Tile, TileType};
use crate::core::{GameConfig, PlayerId};

pub const OXYGEN_MAX: i32 = 14;
pub const TEMPERATURE_MIN: i32 = -30;
pub const TEMPERATURE_MAX: i32 = 8;
/// Degrees per temperature step.
pub const TEMPERATURE_STEP: i32 = 2;
pub const OCEAN_MAX: i32 = 9;
/// Milestones that can be claimed across all players.
pub const MILESTONE_CAP: usize = 3;

/// Oxygen, temperature and ocean count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalParameters {
    oxygen: i32,
    temperature: i32,
    oceans: i32,
}

impl Default for GlobalParameters {
    fn default() -> Self {
        Self {
            oxygen: 0,
            temperature: TEMPERATURE_MIN,
            oceans: 0,
        }
    }
}

impl GlobalParameters {
    #[must_use]
    pub fn oxygen(&self) -> i32 {
        self.oxygen
    }

    #[must_use]
    pub fn temperature(&self) -> i32 {
        self.temperature
    }

    #[must_use]
    pub fn oceans(&self) -> i32 {
        self.oceans
    }

    /// Raise oxygen by one percent. Returns false at the maximum.
    pub fn raise_oxygen(&mut self) -> bool {
        if self.oxygen >= OXYGEN_MAX {
            return false;
        }
        self.oxygen += 1;
        true
    }

    /// Raise temperature by one step. Returns false at the maximum.
    pub fn raise_temperature(&mut self) -> bool {
        if self.temperature >= TEMPERATURE_MAX {
            return false;
        }
        self.temperature = (self.temperature + TEMPERATURE_STEP).min(TEMPERATURE_MAX);
        true
    }

    fn add_ocean(&mut self) -> bool {
        if self.oceans >= OCEAN_MAX {
            return false;
        }
        self.oceans += 1;
        true
    }

    /// All three parameters are at their maxima.
    #[must_use]
    pub fn all_maxed(&self) -> bool {
        self.oxygen >= OXYGEN_MAX && self.temperature >= TEMPERATURE_MAX && self.oceans >= OCEAN_MAX
    }
}

/// The shared board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    layout: HexLayout,
    tiles: Vec<Tile>,
    params: GlobalParameters,
    /// Milestone name to claimant.
    milestones: BTreeMap<String, PlayerId>,
    final_generation: bool,
}

impl Board {
    /// Build an empty board from the configured layout.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        let layout = HexLayout::new(&config.row_widths);
        let tiles = layout
            .coords()
            .map(|coord| {
                let reserved = config.ocean_coords.contains(&(coord.row, coord.col));
                Tile::land(coord, reserved)
            })
            .collect();

        Self {
            layout,
            tiles,
            params: GlobalParameters::default(),
            milestones: BTreeMap::new(),
            final_generation: false,
        }
    }

    #[must_use]
    pub fn layout(&self) -> &HexLayout {
        &self.layout
    }

    #[must_use]
    pub fn tile(&self, coord: Coord) -> Option<&Tile> {
        self.layout.index_of(coord).map(|i| &self.tiles[i])
    }

    /// All spaces in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Tiles adjacent to `coord`.
    pub fn adjacent_tiles(&self, coord: Coord) -> impl Iterator<Item = &Tile> + '_ {
        self.layout
            .neighbors(coord)
            .into_iter()
            .filter_map(move |c| self.tile(c))
    }

    /// Coordinates reserved for oceans.
    pub fn ocean_coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.tiles
            .iter()
            .filter(|t| t.ocean_reserved)
            .map(Tile::coord)
    }

    // === Global parameters ===

    #[must_use]
    pub fn params(&self) -> &GlobalParameters {
        &self.params
    }

    #[must_use]
    pub fn oxygen(&self) -> i32 {
        self.params.oxygen
    }

    #[must_use]
    pub fn temperature(&self) -> i32 {
        self.params.temperature
    }

    #[must_use]
    pub fn oceans(&self) -> i32 {
        self.params.oceans
    }

    /// Raise oxygen one step. Returns whether it moved.
    pub fn raise_oxygen(&mut self) -> bool {
        let raised = self.params.raise_oxygen();
        self.refresh_final_generation();
        raised
    }

    /// Raise temperature one step. Returns whether it moved.
    pub fn raise_temperature(&mut self) -> bool {
        let raised = self.params.raise_temperature();
        self.refresh_final_generation();
        raised
    }

    /// Final generation has been triggered. Sticky.
    #[must_use]
    pub fn is_final_generation(&self) -> bool {
        self.final_generation
    }

    fn refresh_final_generation(&mut self) {
        if self.params.all_maxed() {
            self.final_generation = true;
        }
    }

    // === Tiles ===

    /// Put a tile on the board, unchecked. The action pipeline validates
    /// targets with `PlacementValidator` before calling this.
    ///
    /// Oceans are left unowned and advance the ocean count; returns whether a
    /// global parameter moved (ocean count, for oceans).
    pub fn put_tile(&mut self, coord: Coord, tile_type: TileType, owner: PlayerId) -> bool {
        let Some(index) = self.layout.index_of(coord) else {
            return false;
        };
        let tile = &mut self.tiles[index];
        tile.tile_type = tile_type;
        if tile_type == TileType::Ocean {
            tile.owner = None;
            let raised = self.params.add_ocean();
            self.refresh_final_generation();
            raised
        } else {
            tile.owner = Some(owner);
            false
        }
    }

    /// Tiles owned by a player.
    pub fn owned_by(&self, player: PlayerId) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(move |t| t.owner == Some(player))
    }

    /// Count a player's tiles of one type.
    #[must_use]
    pub fn count_owned(&self, player: PlayerId, tile_type: TileType) -> usize {
        self.owned_by(player).filter(|t| t.tile_type == tile_type).count()
    }

    /// Board points: one per owned greenery, plus one per greenery next to
    /// each owned city.
    #[must_use]
    pub fn tile_points(&self, player: PlayerId) -> i32 {
        let greeneries = self.count_owned(player, TileType::Greenery) as i32;
        let city_bonus: i32 = self
            .owned_by(player)
            .filter(|t| t.tile_type == TileType::City)
            .map(|city| {
                self.adjacent_tiles(city.coord())
                    .filter(|t| t.tile_type == TileType::Greenery)
                    .count() as i32
            })
            .sum();
        greeneries + city_bonus
    }

    // === Milestones ===

    /// Claimed milestones and their claimants.
    #[must_use]
    pub fn milestones(&self) -> &BTreeMap<String, PlayerId> {
        &self.milestones
    }

    #[must_use]
    pub fn is_claimed(&self, milestone: &str) -> bool {
        self.milestones.contains_key(milestone)
    }

    /// Record a claim. Returns false if already claimed or the cap is reached.
    pub(crate) fn record_claim(&mut self, milestone: &str, player: PlayerId) -> bool {
        if self.milestones.len() >= MILESTONE_CAP || self.is_claimed(milestone) {
            return false;
        }
        self.milestones.insert(milestone.to_string(), player);
        true
    }
}
