//! Drawing surface abstraction and the software framebuffer.
//!
//! The compositor and the per-layer draw path both target [`DrawSurface`],
//! so a layer stack can be flattened into an offscreen buffer with exactly
//! the same code that draws it to the screen.

use crate::render::image::Image;

/// Destination for image blits. Implemented by the software framebuffer
/// here and by whatever the embedding game client draws to.
pub trait DrawSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Blit `image` with its current alpha at (`x`, `y`), clipping against
    /// the surface bounds. Coordinates may be negative.
    fn draw_image(&mut self, image: &Image, x: i32, y: i32);
}

/// Heap-allocated RGBA framebuffer with src-over alpha blending.
///
/// Used as the compositor's offscreen buffer and as the screen stand-in for
/// headless tests and the simulation binary.
pub struct SoftwareSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

/// Upper bound on surface dimensions. Degenerate or absurd sizes are
/// treated as an allocation failure, which callers handle by falling back
/// to per-layer drawing.
const MAX_SURFACE_DIM: u32 = 8192;

impl SoftwareSurface {
    /// Allocate a transparent surface. Returns `None` for zero-sized or
    /// oversized dimensions instead of erroring; the compositor degrades
    /// gracefully on `None`.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 || width > MAX_SURFACE_DIM || height > MAX_SURFACE_DIM {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        })
    }

    /// Convert the buffer contents into a drawable image.
    pub fn to_image(&self) -> Image {
        // Length always matches the dimensions, so this cannot fail.
        Image::from_pixels(self.width, self.height, self.pixels.clone())
            .unwrap_or_else(|_| Image::solid(self.width, self.height, [0, 0, 0, 0]))
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Reset every pixel to transparent black.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }
}

impl DrawSurface for SoftwareSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn draw_image(&mut self, image: &Image, x: i32, y: i32) {
        let global_alpha = image.alpha();
        if global_alpha <= 0.0 {
            return;
        }

        // Clip the source rectangle against the surface bounds.
        let src_x0 = (-x).max(0) as u32;
        let src_y0 = (-y).max(0) as u32;
        let dst_x0 = x.max(0) as u32;
        let dst_y0 = y.max(0) as u32;
        if src_x0 >= image.width() || src_y0 >= image.height() {
            return;
        }
        if dst_x0 >= self.width || dst_y0 >= self.height {
            return;
        }
        let cols = (image.width() - src_x0).min(self.width - dst_x0);
        let rows = (image.height() - src_y0).min(self.height - dst_y0);

        let src = image.pixels();
        for row in 0..rows {
            for col in 0..cols {
                let si = (((src_y0 + row) * image.width() + src_x0 + col) * 4) as usize;
                let di = (((dst_y0 + row) * self.width + dst_x0 + col) * 4) as usize;

                let sa = src[si + 3] as f32 / 255.0 * global_alpha;
                if sa <= 0.0 {
                    continue;
                }
                let da = self.pixels[di + 3] as f32 / 255.0;
                let out_a = sa + da * (1.0 - sa);
                for ch in 0..3 {
                    let sc = src[si + ch] as f32;
                    let dc = self.pixels[di + ch] as f32;
                    self.pixels[di + ch] = (sc * sa + dc * (1.0 - sa)).round() as u8;
                }
                self.pixels[di + 3] = (out_a * 255.0).round() as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_degenerate_dimensions() {
        assert!(SoftwareSurface::new(0, 10).is_none());
        assert!(SoftwareSurface::new(10, 0).is_none());
        assert!(SoftwareSurface::new(10, 10).is_some());
    }

    #[test]
    fn blit_clips_negative_coordinates() {
        let mut surface = SoftwareSurface::new(4, 4).unwrap();
        let img = Image::solid(4, 4, [255, 0, 0, 255]);
        surface.draw_image(&img, -2, -2);

        // Only the 2x2 overlap at the top-left corner is written.
        let px = surface.pixels();
        assert_eq!(px[0], 255); // (0,0) red
        assert_eq!(px[3], 255); // (0,0) opaque
        let idx = (2 * 4 + 2) * 4; // (2,2) untouched
        assert_eq!(px[idx + 3], 0);
    }

    #[test]
    fn opaque_blit_replaces_destination() {
        let mut surface = SoftwareSurface::new(2, 2).unwrap();
        surface.draw_image(&Image::solid(2, 2, [0, 255, 0, 255]), 0, 0);
        surface.draw_image(&Image::solid(2, 2, [0, 0, 255, 255]), 0, 0);
        let px = surface.pixels();
        assert_eq!(&px[0..4], &[0, 0, 255, 255]);
    }
}
