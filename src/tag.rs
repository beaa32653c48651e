//! Ownership tags identifying mutation lineages.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use once_cell::sync::Lazy;

static GLOBAL: Lazy<Arc<TagSource>> = Lazy::new(|| Arc::new(TagSource::new()));

/// Identifies one mutation lineage ("transient").
///
/// A node stamped with a vector's current tag was written by that vector
/// since its last fork and may be mutated in place.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(u64);

impl Tag {
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({})", self.0)
    }
}

/// Generator of strictly increasing tags. Never reset, never recycles a tag.
#[derive(Debug)]
pub struct TagSource {
    next: AtomicU64,
}

impl TagSource {
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// The process-wide source used by [`Vector::new`](crate::Vector::new).
    pub fn global() -> Arc<TagSource> {
        Arc::clone(&GLOBAL)
    }

    /// Allocate a tag distinct from every tag this source handed out before.
    /// Safe to call from any number of threads.
    #[inline]
    pub fn allocate(&self) -> Tag {
        Tag(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for TagSource {
    fn default() -> Self {
        Self::new()
    }
}
