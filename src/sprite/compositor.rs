//! Offscreen render path.
//!
//! Flattens a layer stack into a fixed-size software buffer and converts it
//! into drawable image(s). Layers are drawn with the plain per-layer path,
//! never through a compound sprite's own dispatch, so a nested stack cannot
//! recurse back into compositing.

use crate::render::image::Image;
use crate::render::surface::SoftwareSurface;
use crate::resources::tilegrid::TileGrid;
use crate::sprite::api::Sprite;

/// Offscreen buffer width in pixels. Large enough for content that extends
/// beyond one tile.
pub const BUFFER_WIDTH: u32 = 100;
/// Offscreen buffer height in pixels.
pub const BUFFER_HEIGHT: u32 = 100;

/// Result of flattening a layer stack.
pub struct Composite {
    pub image: Image,
    pub alpha_image: Option<Image>,
    /// Correction to apply when the flattened image is later drawn at the
    /// stack's position, mirroring the inset used inside the buffer.
    pub offset: (i32, i32),
}

/// Render every non-empty layer into the offscreen buffer and produce the
/// drawable composite.
///
/// Returns `None` when the buffer cannot be allocated; the caller then
/// falls back to per-layer drawing.
pub fn compose(
    layers: &mut [Option<Box<dyn Sprite>>],
    grid: Option<TileGrid>,
    alpha_blending: bool,
) -> Option<Composite> {
    let mut buffer = SoftwareSurface::new(BUFFER_WIDTH, BUFFER_HEIGHT)?;

    // Inset the stack by half a tile so tall or wide content stays inside
    // the buffer.
    let grid = grid.unwrap_or_default();
    let inset_x = (grid.tile_width / 2) as i32;
    let inset_y = (grid.tile_height / 2) as i32;

    for layer in layers.iter_mut().flatten() {
        layer.draw(&mut buffer, inset_x, inset_y);
    }

    let image = buffer.to_image();
    let alpha_image = alpha_blending.then(|| image.with_alpha_channel());

    Some(Composite {
        image,
        alpha_image,
        offset: (-inset_x, -inset_y),
    })
}
