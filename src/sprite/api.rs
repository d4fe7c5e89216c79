//! The Sprite capability and content signatures.
//!
//! Everything that can be drawn as one layer of a being implements
//! [`Sprite`]: concrete frame-based layers, and [`CompoundSprite`] itself so
//! stacks can be nested or treated uniformly by the render pass.
//!
//! [`CompoundSprite`]: crate::sprite::compound::CompoundSprite

use crate::render::image::Image;
use crate::render::surface::DrawSurface;
use smallvec::SmallVec;

/// Opaque per-layer identity token used to detect "has this layer's visible
/// output changed".
///
/// Minted from the identity of the layer's current frame image, so equality
/// of two signatures implies pixel-identical draw output for that layer.
/// This is the contract the composite cache lives or dies by: a token that
/// changes every frame means the cache never hits, a token that survives a
/// visual change serves stale composites.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct ContentSignature(u64);

impl ContentSignature {
    /// Signature of a layer whose current output is `image`.
    pub fn of(image: &Image) -> Self {
        Self(image.id())
    }
}

/// Ordered signature sequence of a layer stack, one element per slot.
/// `None` denotes an empty slot. Stacks are small, so this stays inline.
pub type SignatureSeq = SmallVec<[Option<ContentSignature>; 8]>;

/// Facing direction of an animated layer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum SpriteDirection {
    #[default]
    Down,
    Left,
    Up,
    Right,
}

impl SpriteDirection {
    pub(crate) fn index(self) -> usize {
        match self {
            SpriteDirection::Down => 0,
            SpriteDirection::Left => 1,
            SpriteDirection::Up => 2,
            SpriteDirection::Right => 3,
        }
    }
}

/// One drawable animated layer of a being.
///
/// The boolean returns report whether the call changed the layer's visual
/// output; callers use them to decide whether a recomposition is due. None
/// of these operations can fail.
pub trait Sprite {
    /// Advance the animation by `dt` seconds.
    fn update(&mut self, dt: f32) -> bool;

    /// Switch to the named action (e.g. "walk", "attack").
    fn play(&mut self, action: &str) -> bool;

    /// Rewind the current action to its first frame.
    fn reset(&mut self) -> bool;

    /// Change the facing direction.
    fn set_direction(&mut self, direction: SpriteDirection) -> bool;

    /// Select the layer's display variant (e.g. a recolor index).
    fn update_number(&mut self, number: u32) -> bool;

    /// Draw the current frame at (`x`, `y`).
    fn draw(&mut self, surface: &mut dyn DrawSurface, x: i32, y: i32);

    /// Set the alpha this layer draws with.
    fn set_alpha(&mut self, alpha: f32);

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn current_frame(&self) -> usize;

    fn frame_count(&self) -> usize;

    /// Token that is stable while this layer's visible output is unchanged
    /// and different whenever it changes.
    fn content_signature(&self) -> ContentSignature;

    /// The image currently representing this layer, if there is one.
    fn image(&self) -> Option<&Image>;
}
