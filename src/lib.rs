//! Spritestack library.
//!
//! Layered-sprite compositing and caching engine: a being on screen is a
//! stack of independently animated layers, flattened into cached single
//! images so recurring layer combinations are recomposed at most once.
//! This module exposes the sprite capability, the compound sprite, the
//! software render primitives and the configuration resources for use in
//! integration tests and as a reusable library.

pub mod render;
pub mod resources;
pub mod sprite;
