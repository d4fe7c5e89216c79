//! Compound sprite: an ordered stack of layers drawn as one.
//!
//! A being on screen is a stack of independently animated layers (base
//! body, equipment, hair, effects). Drawing N layers per frame for hundreds
//! of beings is wasteful when the stack's visual content has not changed,
//! so the compound sprite flattens the stack into a single pre-blended
//! image and keeps a small pool of previously flattened combinations keyed
//! by the layers' content signatures. Toggling between two equipment sets
//! then recomposes each set at most once.
//!
//! # Draw dispatch
//!
//! Selected fresh on every draw call, after the update pass has run if the
//! stack is dirty:
//! - no slots → draw nothing
//! - alpha == 1 and a composite exists → draw the one image
//! - 0 < alpha < 1 and a translucent variant exists → set its alpha, draw it
//! - otherwise → draw every layer individually
//!
//! # Related
//!
//! - [`crate::sprite::cache`] – composite entries and the bounded pool
//! - [`crate::sprite::compositor`] – the offscreen render path
//! - [`crate::resources::renderconfig::CachePolicy`] – the policy flags

use crate::render::image::Image;
use crate::render::surface::DrawSurface;
use crate::resources::renderconfig::CachePolicy;
use crate::resources::tilegrid::TileGrid;
use crate::sprite::api::{ContentSignature, SignatureSeq, Sprite, SpriteDirection};
use crate::sprite::cache::{CacheStats, CompositeEntry, CompositePool};
use crate::sprite::compositor;
use log::{debug, warn};

/// Stacks at or below this many slots are always drawn per layer; the
/// compositing overhead outweighs the saved draw calls.
pub const COMPOSITE_LAYER_THRESHOLD: usize = 3;

/// Minimum seconds between recomposition attempts when delayed recompose is
/// on. Ten 10 ms engine ticks.
pub const MIN_RECOMPOSE_DELAY: f32 = 0.1;

/// An ordered stack of owned sprite layers that is itself a [`Sprite`].
///
/// Owns every non-empty layer slot, the checked-out active composite entry
/// and the per-sprite composite pool. All mutation and animation calls mark
/// the stack dirty; the next draw decides whether to reuse a pooled
/// composite, flatten afresh, or fall back to per-layer drawing.
pub struct CompoundSprite {
    layers: Vec<Option<Box<dyn Sprite>>>,
    policy: CachePolicy,
    grid: Option<TileGrid>,
    dirty: bool,
    /// Checked-out composite entry, if the stack is currently flattened.
    active: Option<CompositeEntry>,
    pool: CompositePool,
    alpha: f32,
    /// Internal clock in seconds, advanced by `update`.
    clock: f32,
    last_attempt: Option<f32>,
    start_time: Option<f32>,
    elapsed: f32,
    pending_timer_reset: bool,
    stats: CacheStats,
}

impl CompoundSprite {
    /// Create an empty stack with the given policy flags.
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            layers: Vec::new(),
            policy,
            grid: None,
            dirty: false,
            active: None,
            pool: CompositePool::new(),
            alpha: 1.0,
            clock: 0.0,
            last_attempt: None,
            start_time: None,
            elapsed: 0.0,
            pending_timer_reset: false,
            stats: CacheStats::default(),
        }
    }

    /// Set the tile geometry the compositor uses for its draw offset.
    /// `None` falls back to the default tile size.
    pub fn set_tile_grid(&mut self, grid: Option<TileGrid>) {
        self.grid = grid;
    }

    /// Append a new slot holding `sprite`.
    pub fn add_sprite(&mut self, sprite: Box<dyn Sprite>) {
        self.layers.push(Some(sprite));
        self.dirty = true;
    }

    /// Replace the layer in slot `index`, destroying the previous occupant.
    /// Setting an empty slot to empty is a no-op and does not mark dirty.
    ///
    /// The index must already be in range (`ensure_size` first); anything
    /// else is a caller bug and panics.
    pub fn set_sprite(&mut self, index: usize, sprite: Option<Box<dyn Sprite>>) {
        if self.layers[index].is_none() && sprite.is_none() {
            return;
        }
        self.layers[index] = sprite;
        self.dirty = true;
    }

    /// Destroy and empty slot `index`. No-op if the slot is already empty.
    pub fn remove_sprite(&mut self, index: usize) {
        if self.layers[index].is_some() {
            self.layers[index] = None;
            self.dirty = true;
        }
    }

    /// Grow the slot count to `size`, leaving new slots empty. Never
    /// shrinks.
    pub fn ensure_size(&mut self, size: usize) {
        if self.layers.len() < size {
            self.layers.resize_with(size, || None);
            self.dirty = true;
        }
    }

    /// Destroy every layer, the active composite and every pooled entry,
    /// and force the next animation timer reset.
    pub fn clear(&mut self) {
        self.layers.clear();
        self.active = None;
        self.pool.clear();
        self.dirty = true;
        self.pending_timer_reset = true;
    }

    /// Number of layers from the renderer's point of view: 1 while the
    /// stack is drawn as one flattened image, otherwise the raw slot count.
    pub fn layer_count(&self) -> usize {
        if self.active.is_some() {
            1
        } else {
            self.layers.len()
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Whether a mutation or animation change is pending recomposition.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of composites currently resident in the pool (the checked-out
    /// active entry not included).
    pub fn pooled_count(&self) -> usize {
        self.pool.len()
    }

    pub fn has_composite(&self) -> bool {
        self.active.is_some()
    }

    /// Seconds of animation time accumulated since the last restart.
    pub fn elapsed_time(&self) -> f32 {
        self.elapsed
    }

    /// Clock value at the first non-zero `update`, if any.
    pub fn start_time(&self) -> Option<f32> {
        self.start_time
    }

    fn first_layer(&self) -> Option<&dyn Sprite> {
        self.layers.iter().flatten().next().map(|boxed| &**boxed)
    }

    fn current_signatures(&self) -> SignatureSeq {
        self.layers
            .iter()
            .map(|slot| slot.as_ref().map(|layer| layer.content_signature()))
            .collect()
    }

    /// Broadcast `f` to every non-empty layer. Marks dirty when any layer
    /// reports a change; when `restart` is set and every layer reported a
    /// change, the elapsed-time accumulator is rewound.
    fn broadcast(&mut self, restart: bool, mut f: impl FnMut(&mut dyn Sprite) -> bool) -> bool {
        let mut any = false;
        let mut all = true;
        let mut seen = false;
        for layer in self.layers.iter_mut().flatten() {
            seen = true;
            let changed = f(&mut **layer);
            any |= changed;
            all &= changed;
        }
        if any {
            self.dirty = true;
        }
        if restart && seen && all {
            self.elapsed = 0.0;
        }
        any
    }

    fn draw_per_layer(&mut self, surface: &mut dyn DrawSurface, x: i32, y: i32) {
        let alpha = self.alpha;
        for layer in self.layers.iter_mut().flatten() {
            layer.set_alpha(alpha);
            layer.draw(surface, x, y);
        }
    }

    /// The update pass: decide whether the stack gets a composite and from
    /// where. Runs at most once per draw call, before dispatch.
    fn refresh_composite(&mut self) {
        if !self.policy.compositing {
            return;
        }

        if self.policy.delayed_recompose {
            if let Some(last) = self.last_attempt
                && self.clock - last < MIN_RECOMPOSE_DELAY
            {
                // Too soon; keep whatever composite state we have.
                return;
            }
            self.last_attempt = Some(self.clock);
        }

        if self.policy.disable_basic_caching || self.layers.len() <= COMPOSITE_LAYER_THRESHOLD {
            self.active = None;
            return;
        }

        if self.policy.disable_advanced_caching {
            let signatures = self.current_signatures();
            self.recompose(signatures);
            return;
        }

        let signatures = self.current_signatures();

        // Write the checked-out entry back to the pool before looking for a
        // match; it is the most recently used combination.
        if let Some(previous) = self.active.take() {
            let evicted = self.pool.push_front(previous);
            self.stats.evictions += evicted as u64;
        }

        if let Some(entry) = self.pool.take_match(&signatures) {
            debug!("composite cache hit ({} pooled)", self.pool.len());
            self.stats.hits += 1;
            self.active = Some(entry);
            return;
        }

        self.stats.misses += 1;
        self.recompose(signatures);
    }

    fn recompose(&mut self, signatures: SignatureSeq) {
        self.stats.composes += 1;
        match compositor::compose(&mut self.layers, self.grid, self.policy.alpha_blending) {
            Some(composite) => {
                self.active = Some(CompositeEntry {
                    image: composite.image,
                    alpha_image: composite.alpha_image,
                    signatures,
                    offset: composite.offset,
                });
            }
            None => {
                // Degrade to per-layer drawing rather than erroring.
                warn!("offscreen buffer allocation failed; drawing per layer");
                self.active = None;
            }
        }
    }
}

impl Sprite for CompoundSprite {
    fn update(&mut self, dt: f32) -> bool {
        self.clock += dt;
        if self.pending_timer_reset {
            self.start_time = None;
            self.elapsed = 0.0;
            self.pending_timer_reset = false;
        }
        if dt != 0.0 && self.start_time.is_none() {
            self.start_time = Some(self.clock - dt);
        }
        self.elapsed += dt;

        let mut any = false;
        for layer in self.layers.iter_mut().flatten() {
            any |= layer.update(dt);
        }
        if any {
            self.dirty = true;
        }
        any
    }

    fn play(&mut self, action: &str) -> bool {
        self.broadcast(true, |layer| layer.play(action))
    }

    fn reset(&mut self) -> bool {
        self.broadcast(true, |layer| layer.reset())
    }

    fn set_direction(&mut self, direction: SpriteDirection) -> bool {
        self.broadcast(true, |layer| layer.set_direction(direction))
    }

    fn update_number(&mut self, number: u32) -> bool {
        self.broadcast(false, |layer| layer.update_number(number))
    }

    fn draw(&mut self, surface: &mut dyn DrawSurface, x: i32, y: i32) {
        if self.dirty {
            self.refresh_composite();
            self.dirty = false;
        }

        if self.layers.is_empty() {
            return;
        }

        let alpha = self.alpha;
        if alpha >= 1.0 {
            if let Some(entry) = &self.active {
                surface.draw_image(&entry.image, x + entry.offset.0, y + entry.offset.1);
                return;
            }
        } else if alpha > 0.0 {
            if let Some(entry) = self.active.as_mut()
                && let Some(alpha_image) = entry.alpha_image.as_mut()
            {
                alpha_image.set_alpha(alpha);
                let offset = entry.offset;
                surface.draw_image(alpha_image, x + offset.0, y + offset.1);
                return;
            }
        }
        self.draw_per_layer(surface, x, y);
    }

    fn set_alpha(&mut self, alpha: f32) {
        if alpha == self.alpha {
            return;
        }
        self.alpha = alpha;
        // A composite's translucent variant is baked at compose time; on
        // deep software-rendered stacks the alpha fix pushes a changing
        // alpha down to the layers instead.
        if self.policy.alpha_fix
            && self.policy.software_renderer
            && self.layers.len() > COMPOSITE_LAYER_THRESHOLD
        {
            for layer in self.layers.iter_mut().flatten() {
                layer.set_alpha(alpha);
            }
        }
    }

    fn width(&self) -> u32 {
        self.first_layer().map_or(0, |layer| layer.width())
    }

    fn height(&self) -> u32 {
        self.first_layer().map_or(0, |layer| layer.height())
    }

    fn current_frame(&self) -> usize {
        self.first_layer().map_or(0, |layer| layer.current_frame())
    }

    fn frame_count(&self) -> usize {
        self.first_layer().map_or(0, |layer| layer.frame_count())
    }

    fn content_signature(&self) -> ContentSignature {
        if let Some(entry) = &self.active {
            ContentSignature::of(&entry.image)
        } else {
            self.first_layer()
                .map(|layer| layer.content_signature())
                .unwrap_or_default()
        }
    }

    fn image(&self) -> Option<&Image> {
        self.active.as_ref().map(|entry| &entry.image)
    }
}
