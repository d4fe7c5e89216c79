//! Composite cache entries and the per-sprite pool.
//!
//! A [`CompositeEntry`] is one flattened render result tagged with the
//! signature sequence that produced it. The [`CompositePool`] keeps up to
//! [`POOL_CAPACITY`] of them in most-recently-reused-first order, so
//! recurring layer combinations (toggling between two equipment sets, say)
//! are recomposed at most once. The pool is never shared between compound
//! sprites: signatures are only comparable within one layer-stack lineage.

use crate::render::image::Image;
use crate::sprite::api::{ContentSignature, SignatureSeq};
use arrayvec::ArrayVec;

/// Maximum number of pooled composites per compound sprite.
pub const POOL_CAPACITY: usize = 10;

/// Number of oldest entries destroyed together when the pool is full.
pub const EVICTION_BATCH: usize = 3;

/// One flattened layer stack: the pre-blended image, the optional
/// translucent variant, the signature sequence it was composed from and the
/// draw offset computed at compose time.
///
/// An entry exclusively owns its images. It is either checked out (held by
/// the compound sprite as its live composite) or pooled, never both.
#[derive(Debug)]
pub struct CompositeEntry {
    pub image: Image,
    pub alpha_image: Option<Image>,
    pub signatures: SignatureSeq,
    pub offset: (i32, i32),
}

impl CompositeEntry {
    /// Whether this entry was composed from exactly the given signature
    /// sequence. A `None` signature only matches an empty slot.
    pub fn matches(&self, current: &[Option<ContentSignature>]) -> bool {
        self.signatures.len() == current.len()
            && self.signatures.iter().zip(current).all(|(a, b)| a == b)
    }
}

/// Bounded, recency-ordered collection of composite entries.
#[derive(Debug, Default)]
pub struct CompositePool {
    entries: ArrayVec<CompositeEntry, POOL_CAPACITY>,
}

impl CompositePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Destroy every pooled entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Insert `entry` as the most recently used candidate. When the pool is
    /// full, the [`EVICTION_BATCH`] oldest entries are destroyed first.
    /// Returns how many entries were evicted.
    pub fn push_front(&mut self, entry: CompositeEntry) -> usize {
        let mut evicted = 0;
        if self.entries.is_full() {
            let keep = POOL_CAPACITY - EVICTION_BATCH;
            evicted = self.entries.len() - keep;
            self.entries.truncate(keep);
        }
        self.entries.insert(0, entry);
        evicted
    }

    /// Find, remove and return the first entry matching the given signature
    /// sequence. The front-to-back scan favors recently reused
    /// combinations, so among equally valid matches the most recent wins.
    pub fn take_match(&mut self, current: &[Option<ContentSignature>]) -> Option<CompositeEntry> {
        let index = self.entries.iter().position(|e| e.matches(current))?;
        Some(self.entries.remove(index))
    }
}

/// Running counters for cache behavior, exposed for diagnostics and logged
/// by the simulation binary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Offscreen compositor runs.
    pub composes: u64,
    /// Pool lookups that found a matching entry.
    pub hits: u64,
    /// Pool lookups that found none.
    pub misses: u64,
    /// Entries destroyed by batch eviction.
    pub evictions: u64,
}
