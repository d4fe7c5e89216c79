//! Integration tests for compound sprite mutation, delegation and draw
//! dispatch.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use spritestack::render::image::Image;
use spritestack::render::surface::{DrawSurface, SoftwareSurface};
use spritestack::resources::renderconfig::CachePolicy;
use spritestack::sprite::api::{ContentSignature, Sprite, SpriteDirection};
use spritestack::sprite::compound::CompoundSprite;
use spritestack::sprite::imagesprite::ImageSprite;

const EPSILON: f32 = 1e-6;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// Policy with the rate limiter off so every dirty draw recomposes.
fn eager_policy() -> CachePolicy {
    CachePolicy {
        delayed_recompose: false,
        ..CachePolicy::default()
    }
}

fn still_layer(rgba: [u8; 4]) -> ImageSprite {
    ImageSprite::still(Image::solid(16, 16, rgba))
}

fn walking_layer(shade: u8) -> ImageSprite {
    let frames = vec![
        Image::solid(16, 16, [shade, 0, 0, 255]),
        Image::solid(16, 16, [0, shade, 0, 255]),
    ];
    ImageSprite::new("walk", frames)
}

fn stack_of(count: usize) -> CompoundSprite {
    let mut compound = CompoundSprite::new(eager_policy());
    for i in 0..count {
        compound.add_sprite(Box::new(still_layer([10 + i as u8, 20, 30, 255])));
    }
    compound
}

fn screen() -> SoftwareSurface {
    SoftwareSurface::new(64, 64).expect("screen allocation")
}

/// Layer wrapper that counts how often its alpha is set.
struct CountingLayer {
    inner: ImageSprite,
    alpha_sets: Rc<Cell<u32>>,
}

impl Sprite for CountingLayer {
    fn update(&mut self, dt: f32) -> bool {
        self.inner.update(dt)
    }
    fn play(&mut self, action: &str) -> bool {
        self.inner.play(action)
    }
    fn reset(&mut self) -> bool {
        self.inner.reset()
    }
    fn set_direction(&mut self, direction: SpriteDirection) -> bool {
        self.inner.set_direction(direction)
    }
    fn update_number(&mut self, number: u32) -> bool {
        self.inner.update_number(number)
    }
    fn draw(&mut self, surface: &mut dyn DrawSurface, x: i32, y: i32) {
        self.inner.draw(surface, x, y)
    }
    fn set_alpha(&mut self, alpha: f32) {
        self.alpha_sets.set(self.alpha_sets.get() + 1);
        self.inner.set_alpha(alpha)
    }
    fn width(&self) -> u32 {
        self.inner.width()
    }
    fn height(&self) -> u32 {
        self.inner.height()
    }
    fn current_frame(&self) -> usize {
        self.inner.current_frame()
    }
    fn frame_count(&self) -> usize {
        self.inner.frame_count()
    }
    fn content_signature(&self) -> ContentSignature {
        self.inner.content_signature()
    }
    fn image(&self) -> Option<&Image> {
        self.inner.image()
    }
}

#[test]
fn setting_an_empty_slot_to_empty_stays_clean() {
    let mut compound = stack_of(4);
    compound.ensure_size(5);
    let mut surface = screen();
    compound.draw(&mut surface, 10, 10);
    assert!(!compound.is_dirty());

    compound.set_sprite(4, None);
    assert!(!compound.is_dirty());

    compound.remove_sprite(4);
    assert!(!compound.is_dirty());
}

#[test]
fn replacing_a_layer_marks_dirty() {
    let mut compound = stack_of(4);
    let mut surface = screen();
    compound.draw(&mut surface, 10, 10);
    assert!(!compound.is_dirty());

    compound.set_sprite(0, Some(Box::new(still_layer([99, 99, 99, 255]))));
    assert!(compound.is_dirty());
}

#[test]
fn ensure_size_grows_but_never_shrinks() {
    let mut compound = stack_of(2);
    compound.ensure_size(5);
    assert_eq!(compound.layer_count(), 5);
    compound.ensure_size(3);
    assert_eq!(compound.layer_count(), 5);
}

#[test]
fn queries_come_from_the_first_occupied_slot() {
    let mut compound = CompoundSprite::new(eager_policy());
    compound.ensure_size(2);
    assert_eq!(compound.width(), 0);
    assert_eq!(compound.height(), 0);
    assert_eq!(compound.frame_count(), 0);

    compound.set_sprite(1, Some(Box::new(walking_layer(200))));
    assert_eq!(compound.width(), 16);
    assert_eq!(compound.height(), 16);
    assert_eq!(compound.frame_count(), 2);
    assert_eq!(compound.current_frame(), 0);
}

#[test]
fn empty_stack_draws_nothing() {
    let mut compound = CompoundSprite::new(eager_policy());
    let mut surface = screen();
    compound.draw(&mut surface, 10, 10);
    assert!(surface.pixels().iter().all(|&b| b == 0));
}

#[test]
fn deep_stack_is_drawn_as_one_composite() {
    let mut compound = stack_of(5);
    let mut surface = screen();
    compound.draw(&mut surface, 32, 32);

    assert!(compound.has_composite());
    assert_eq!(compound.layer_count(), 1);
    assert!(surface.pixels().iter().any(|&b| b != 0));
}

#[test]
fn zero_alpha_falls_back_to_per_layer_and_draws_nothing() {
    let mut compound = stack_of(5);
    compound.set_alpha(0.0);
    let mut surface = screen();
    compound.draw(&mut surface, 32, 32);
    assert!(surface.pixels().iter().all(|&b| b == 0));
}

#[test]
fn translucent_composite_is_dimmer_than_opaque() {
    let mut compound = stack_of(5);
    let mut opaque = screen();
    compound.draw(&mut opaque, 32, 32);
    let full: u32 = opaque.pixels().iter().map(|&b| b as u32).sum();

    compound.set_alpha(0.5);
    let mut translucent = screen();
    compound.draw(&mut translucent, 32, 32);
    let half: u32 = translucent.pixels().iter().map(|&b| b as u32).sum();

    assert!(half > 0);
    assert!(half < full);
}

#[test]
fn broadcast_play_restarts_the_elapsed_accumulator() {
    let mut compound = CompoundSprite::new(eager_policy());
    for shade in [100, 150, 200, 250] {
        compound.add_sprite(Box::new(walking_layer(shade)));
    }

    compound.update(0.15); // advances every layer to frame 1
    assert!(compound.elapsed_time() > 0.0);

    assert!(compound.play("walk"));
    assert!(approx_eq(compound.elapsed_time(), 0.0));
    assert!(compound.is_dirty());
}

#[test]
fn update_tracks_start_time_on_first_nonzero_call() {
    let mut compound = stack_of(2);
    compound.update(0.0);
    assert!(compound.start_time().is_none());

    compound.update(0.1);
    assert!(compound.start_time().is_some());

    compound.clear();
    compound.update(0.1);
    assert!(approx_eq(compound.elapsed_time(), 0.1));
}

#[test]
fn clear_empties_everything() {
    let mut compound = stack_of(6);
    let mut surface = screen();
    compound.draw(&mut surface, 10, 10);
    compound.set_sprite(0, Some(Box::new(still_layer([1, 2, 3, 255]))));
    compound.draw(&mut surface, 10, 10);

    compound.clear();
    assert_eq!(compound.layer_count(), 0);
    assert_eq!(compound.pooled_count(), 0);
    assert!(!compound.has_composite());
}

#[test]
fn alpha_fix_pushes_down_at_most_once_per_value() {
    let policy = CachePolicy {
        alpha_fix: true,
        software_renderer: true,
        delayed_recompose: false,
        ..CachePolicy::default()
    };
    let mut compound = CompoundSprite::new(policy);
    let mut counters = Vec::new();
    for shade in [60, 120, 180, 240] {
        let counter = Rc::new(Cell::new(0));
        counters.push(Rc::clone(&counter));
        compound.add_sprite(Box::new(CountingLayer {
            inner: still_layer([shade, shade, shade, 255]),
            alpha_sets: counter,
        }));
    }

    compound.set_alpha(0.5);
    compound.set_alpha(0.5);
    for counter in &counters {
        assert_eq!(counter.get(), 1);
    }
}

#[test]
fn alpha_fix_skips_shallow_stacks() {
    let policy = CachePolicy {
        alpha_fix: true,
        software_renderer: true,
        delayed_recompose: false,
        ..CachePolicy::default()
    };
    let mut compound = CompoundSprite::new(policy);
    let counter = Rc::new(Cell::new(0));
    for _ in 0..3 {
        compound.add_sprite(Box::new(CountingLayer {
            inner: still_layer([80, 80, 80, 255]),
            alpha_sets: Rc::clone(&counter),
        }));
    }

    compound.set_alpha(0.25);
    assert_eq!(counter.get(), 0);
}

#[test]
fn update_number_does_not_restart_the_timer() {
    let mut compound = stack_of(4);
    compound.update(0.2);
    let elapsed = compound.elapsed_time();

    assert!(compound.update_number(7));
    assert!(approx_eq(compound.elapsed_time(), elapsed));
    assert!(compound.is_dirty());
}

#[test]
fn nested_compound_sprites_are_drawable_layers() {
    let mut inner = stack_of(2);
    inner.set_alpha(1.0);

    let mut outer = CompoundSprite::new(eager_policy());
    outer.add_sprite(Box::new(inner));
    outer.add_sprite(Box::new(still_layer([5, 5, 5, 255])));

    let mut surface = screen();
    outer.draw(&mut surface, 20, 20);
    assert!(surface.pixels().iter().any(|&b| b != 0));
}
