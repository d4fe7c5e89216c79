//! Shared resources read by the sprite subsystem.
//!
//! Overview
//! - `renderconfig` – INI-backed render/caching configuration and the
//!   per-sprite `CachePolicy` snapshot
//! - `tilegrid` – tile geometry of the active map, used by the compositor
pub mod renderconfig;
pub mod tilegrid;
