//! Tile geometry of the active map.
//!
//! The compositor only needs the tile size to keep content that extends
//! beyond a single tile (tall equipment, wide effects) inside the offscreen
//! buffer. Read-only; queried on every compositor run.

/// Tile edge length used when no map context is available.
pub const DEFAULT_TILE_SIZE: u32 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    pub tile_width: u32,
    pub tile_height: u32,
}

impl Default for TileGrid {
    fn default() -> Self {
        Self {
            tile_width: DEFAULT_TILE_SIZE,
            tile_height: DEFAULT_TILE_SIZE,
        }
    }
}

impl TileGrid {
    pub fn new(tile_width: u32, tile_height: u32) -> Self {
        Self {
            tile_width,
            tile_height,
        }
    }
}
