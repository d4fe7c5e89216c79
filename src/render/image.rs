//! Drawable image backed by an RGBA8 pixel buffer.
//!
//! Every image carries a process-unique identity token minted at creation.
//! Layer content signatures are derived from this token, so two layers whose
//! current frames are the *same* image object (or clones of it) compare equal,
//! while visually different frames never collide.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

/// RGBA8 image with a draw-time alpha multiplier.
///
/// Cloning an image keeps its identity token: a clone is pixel-identical to
/// the original, which is exactly what the token promises. Derived images
/// (the translucent composite variant) get a fresh token.
#[derive(Debug, Clone)]
pub struct Image {
    id: u64,
    width: u32,
    height: u32,
    alpha: f32,
    pixels: Vec<u8>,
}

impl Image {
    /// Construct an image from a raw RGBA8 pixel buffer.
    ///
    /// Returns an error if the buffer length does not match the dimensions.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, String> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(format!(
                "Pixel buffer length {} does not match {}x{} RGBA image",
                pixels.len(),
                width,
                height
            ));
        }
        Ok(Self {
            id: NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed),
            width,
            height,
            alpha: 1.0,
            pixels,
        })
    }

    /// Construct a solid-color image. Convenient for tests and the
    /// simulation binary.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..(width as usize * height as usize) {
            pixels.extend_from_slice(&rgba);
        }
        Self {
            id: NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed),
            width,
            height,
            alpha: 1.0,
            pixels,
        }
    }

    /// Duplicate this image with its own alpha channel, for use as the
    /// translucent composite variant. The duplicate gets a fresh identity
    /// token and starts fully opaque.
    pub fn with_alpha_channel(&self) -> Self {
        Self {
            id: NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed),
            width: self.width,
            height: self.height,
            alpha: 1.0,
            pixels: self.pixels.clone(),
        }
    }

    /// Set the draw-time alpha multiplier (0.0 transparent, 1.0 opaque).
    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Process-unique identity token. Stable for the lifetime of the image
    /// and shared by clones.
    pub fn id(&self) -> u64 {
        self.id
    }
}
