//! The hex board and its placement rules.
//!
//! - `HexLayout`: rows of varying width and their adjacency
//! - `Board`: tiles, global parameters, milestone claims, final-generation flag
//! - `PlacementValidator`: city/greenery/ocean placement rules

mod grid;
mod layout;
mod placement;
mod tile;

pub use grid::{
    Board, GlobalParameters, MILESTONE_CAP, OCEAN_MAX, OXYGEN_MAX, TEMPERATURE_MAX,
    TEMPERATURE_MIN, TEMPERATURE_STEP,
};
pub use layout::{HexLayout, Neighbors};
pub use placement::PlacementValidator;
pub use tile::{Coord, Tile, TileType};
