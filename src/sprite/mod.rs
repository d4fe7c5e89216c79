//! Layered sprites and the compositing cache.
//!
//! Submodules overview:
//! - [`api`] – the [`Sprite`](api::Sprite) capability, content signatures
//!   and directions
//! - [`imagesprite`] – a minimal frame-based layer implementation
//! - [`compound`] – the compound sprite: layer stack, dirty tracking and
//!   draw dispatch
//! - [`cache`] – composite cache entries and the bounded per-sprite pool
//! - [`compositor`] – the offscreen flattening path

pub mod api;
pub mod cache;
pub mod compound;
pub mod compositor;
pub mod imagesprite;
