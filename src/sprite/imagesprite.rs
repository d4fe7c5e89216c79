//! Frame-based sprite layer.
//!
//! The simplest useful [`Sprite`]: named actions mapped to per-direction
//! frame lists, advanced on a fixed frame delay. Enough to stack bodies,
//! hair and equipment in tests and in the simulation binary; a real game
//! client brings its own layer types.

use crate::render::image::Image;
use crate::render::surface::DrawSurface;
use crate::sprite::api::{ContentSignature, Sprite, SpriteDirection};
use std::collections::HashMap;

/// Default seconds per frame when none is given.
const DEFAULT_FRAME_DELAY: f32 = 0.1;

/// Frames of one action, indexed by direction. Directions without frames
/// fall back to `Down`.
#[derive(Debug, Clone, Default)]
struct ActionFrames {
    by_direction: [Vec<Image>; 4],
}

impl ActionFrames {
    fn frames(&self, direction: SpriteDirection) -> &[Image] {
        let frames = &self.by_direction[direction.index()];
        if frames.is_empty() {
            &self.by_direction[SpriteDirection::Down.index()]
        } else {
            frames
        }
    }
}

/// A sprite layer playing one action at a time from a set of frame lists.
#[derive(Debug, Clone)]
pub struct ImageSprite {
    actions: HashMap<String, ActionFrames>,
    current_action: String,
    direction: SpriteDirection,
    frame_index: usize,
    elapsed: f32,
    frame_delay: f32,
    alpha: f32,
    number: u32,
}

impl ImageSprite {
    /// Create a sprite with a single action.
    pub fn new(action: impl Into<String>, frames: Vec<Image>) -> Self {
        let action = action.into();
        let mut sprite = Self {
            actions: HashMap::new(),
            current_action: action.clone(),
            direction: SpriteDirection::default(),
            frame_index: 0,
            elapsed: 0.0,
            frame_delay: DEFAULT_FRAME_DELAY,
            alpha: 1.0,
            number: 0,
        };
        sprite.add_action(action, SpriteDirection::Down, frames);
        sprite
    }

    /// Create a static single-frame layer.
    pub fn still(image: Image) -> Self {
        Self::new("stand", vec![image])
    }

    /// Add or replace the frame list for an action and direction.
    pub fn add_action(
        &mut self,
        action: impl Into<String>,
        direction: SpriteDirection,
        frames: Vec<Image>,
    ) {
        let entry = self.actions.entry(action.into()).or_default();
        entry.by_direction[direction.index()] = frames;
    }

    /// Set the seconds each frame is shown for.
    pub fn set_frame_delay(&mut self, delay: f32) {
        if delay > 0.0 {
            self.frame_delay = delay;
        }
    }

    fn current_frames(&self) -> &[Image] {
        self.actions
            .get(&self.current_action)
            .map(|a| a.frames(self.direction))
            .unwrap_or(&[])
    }

    fn current_image(&self) -> Option<&Image> {
        self.current_frames().get(self.frame_index)
    }
}

impl Sprite for ImageSprite {
    fn update(&mut self, dt: f32) -> bool {
        let count = self.current_frames().len();
        if count <= 1 || dt <= 0.0 {
            return false;
        }
        self.elapsed += dt;
        let before = self.frame_index;
        while self.elapsed >= self.frame_delay {
            self.elapsed -= self.frame_delay;
            self.frame_index = (self.frame_index + 1) % count;
        }
        self.frame_index != before
    }

    fn play(&mut self, action: &str) -> bool {
        if !self.actions.contains_key(action) {
            return false;
        }
        let changed = self.current_action != action || self.frame_index != 0;
        self.current_action = action.to_string();
        self.frame_index = 0;
        self.elapsed = 0.0;
        changed
    }

    fn reset(&mut self) -> bool {
        let changed = self.frame_index != 0;
        self.frame_index = 0;
        self.elapsed = 0.0;
        changed
    }

    fn set_direction(&mut self, direction: SpriteDirection) -> bool {
        if self.direction == direction {
            return false;
        }
        self.direction = direction;
        // Frame index carries over; the visible frame only changes when the
        // new direction has its own frame list.
        true
    }

    fn update_number(&mut self, number: u32) -> bool {
        // Single-variant layer type; the number is recorded but selects
        // nothing.
        let changed = self.number != number;
        self.number = number;
        changed
    }

    fn draw(&mut self, surface: &mut dyn DrawSurface, x: i32, y: i32) {
        let alpha = self.alpha;
        let direction = self.direction;
        let frame_index = self.frame_index;
        if let Some(image) = self.actions.get_mut(&self.current_action).and_then(|a| {
            let dir = if a.by_direction[direction.index()].is_empty() {
                SpriteDirection::Down.index()
            } else {
                direction.index()
            };
            a.by_direction[dir].get_mut(frame_index)
        }) {
            image.set_alpha(alpha);
            surface.draw_image(image, x, y);
        }
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
    }

    fn width(&self) -> u32 {
        self.current_image().map_or(0, Image::width)
    }

    fn height(&self) -> u32 {
        self.current_image().map_or(0, Image::height)
    }

    fn current_frame(&self) -> usize {
        self.frame_index
    }

    fn frame_count(&self) -> usize {
        self.current_frames().len()
    }

    fn content_signature(&self) -> ContentSignature {
        self.current_image()
            .map(ContentSignature::of)
            .unwrap_or_default()
    }

    fn image(&self) -> Option<&Image> {
        self.current_image()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_is_stable_until_the_frame_advances() {
        let a = Image::solid(8, 8, [255, 0, 0, 255]);
        let b = Image::solid(8, 8, [0, 255, 0, 255]);
        let mut sprite = ImageSprite::new("walk", vec![a, b]);
        sprite.set_frame_delay(0.1);

        let sig0 = sprite.content_signature();
        assert!(!sprite.update(0.05));
        assert_eq!(sprite.content_signature(), sig0);

        assert!(sprite.update(0.06));
        assert_ne!(sprite.content_signature(), sig0);
    }

    #[test]
    fn clones_of_one_image_share_a_signature() {
        let base = Image::solid(8, 8, [1, 2, 3, 255]);
        let s1 = ImageSprite::still(base.clone());
        let s2 = ImageSprite::still(base);
        assert_eq!(s1.content_signature(), s2.content_signature());
    }

    #[test]
    fn play_rewinds_and_reports_change() {
        let frames = vec![
            Image::solid(4, 4, [9, 9, 9, 255]),
            Image::solid(4, 4, [8, 8, 8, 255]),
        ];
        let mut sprite = ImageSprite::new("walk", frames);
        sprite.update(0.15);
        assert_eq!(sprite.current_frame(), 1);
        assert!(sprite.play("walk"));
        assert_eq!(sprite.current_frame(), 0);
        assert!(!sprite.play("walk"));
    }
}
