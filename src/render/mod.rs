//! Drawing primitives.
//!
//! Submodules overview:
//! - [`image`] – RGBA8 image object with identity tokens and alpha
//! - [`surface`] – the [`DrawSurface`](surface::DrawSurface) trait and the
//!   software framebuffer used for offscreen compositing and headless runs

pub mod image;
pub mod surface;
