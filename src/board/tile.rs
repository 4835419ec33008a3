//! Board tiles.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// What occupies a space.
///
/// Every space starts as `Land`; placing a tile changes its type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TileType {
    Land,
    Ocean,
    City,
    Greenery,
}

impl std::fmt::Display for TileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TileType::Land => "LAND",
            TileType::Ocean => "OCEAN",
            TileType::City => "CITY",
            TileType::Greenery => "GREENERY",
        };
        f.write_str(name)
    }
}

/// A (row, col) coordinate on the hex grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One board space.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub row: usize,
    pub col: usize,
    pub tile_type: TileType,
    /// Player who placed the tile. Oceans stay unowned.
    pub owner: Option<PlayerId>,
    /// Reserved for an ocean; never takes a city or greenery.
    pub ocean_reserved: bool,
}

impl Tile {
    /// A fresh land space.
    #[must_use]
    pub fn land(coord: Coord, ocean_reserved: bool) -> Self {
        Self {
            row: coord.row,
            col: coord.col,
            tile_type: TileType::Land,
            owner: None,
            ocean_reserved,
        }
    }

    #[must_use]
    pub fn coord(&self) -> Coord {
        Coord::new(self.row, self.col)
    }

    /// Unowned land that may take a city or greenery.
    #[must_use]
    pub fn is_open_land(&self) -> bool {
        self.tile_type == TileType::Land && self.owner.is_none() && !self.ocean_reserved
    }
}
