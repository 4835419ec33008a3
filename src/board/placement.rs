//! Tile placement rules.
//!
//! Pure functions over a `Board`:
//!
//! - **CITY**: open land (LAND, unowned, not ocean-reserved) with no adjacent
//!   city.
//! - **GREENERY**: open land. If the player owns any tile that still has an
//!   open land neighbor, the greenery must go next to one of their tiles;
//!   otherwise any open land is accepted.
//! - **OCEAN**: an ocean-reserved space not yet flooded, while the ocean
//!   count is below its maximum.

use super::grid::{Board, OCEAN_MAX};
use super::tile::{Coord, TileType};
use crate::core::PlayerId;
use crate::error::Rejection;

/// Spatial rule checks for tile placement.
pub struct PlacementValidator;

impl PlacementValidator {
    /// Check whether `player` may put `tile` at `coord`.
    #[must_use]
    pub fn can_place(board: &Board, player: PlayerId, tile: TileType, coord: Coord) -> bool {
        let Some(target) = board.tile(coord) else {
            return false;
        };

        match tile {
            TileType::City => {
                target.is_open_land()
                    && !board
                        .adjacent_tiles(coord)
                        .any(|t| t.tile_type == TileType::City)
            }
            TileType::Greenery => {
                if !target.is_open_land() {
                    return false;
                }
                if Self::has_adjacent_option(board, player) {
                    board.adjacent_tiles(coord).any(|t| t.owner == Some(player))
                } else {
                    true
                }
            }
            TileType::Ocean => {
                target.ocean_reserved
                    && target.tile_type == TileType::Land
                    && board.oceans() < OCEAN_MAX
            }
            TileType::Land => false,
        }
    }

    /// Like [`can_place`](Self::can_place), as a rejection.
    pub fn check(board: &Board, player: PlayerId, tile: TileType, coord: Coord) -> Result<(), Rejection> {
        if Self::can_place(board, player, tile, coord) {
            Ok(())
        } else {
            Err(Rejection::InvalidPlacement {
                tile,
                row: coord.row,
                col: coord.col,
            })
        }
    }

    /// Every coordinate that accepts the tile, in row-major order.
    #[must_use]
    pub fn valid_targets(board: &Board, player: PlayerId, tile: TileType) -> Vec<Coord> {
        board
            .layout()
            .coords()
            .filter(|&c| Self::can_place(board, player, tile, c))
            .collect()
    }

    /// Whether the tile can go anywhere at all.
    #[must_use]
    pub fn any_valid(board: &Board, player: PlayerId, tile: TileType) -> bool {
        board
            .layout()
            .coords()
            .any(|c| Self::can_place(board, player, tile, c))
    }

    /// The player owns a tile with at least one open land neighbor.
    fn has_adjacent_option(board: &Board, player: PlayerId) -> bool {
        board
            .owned_by(player)
            .any(|owned| board.adjacent_tiles(owned.coord()).any(|t| t.is_open_land()))
    }
}
