//! Branching parameters shared by every node of one vector.

use crate::error::{Error, Result};

/// Largest accepted shift. Nodes wider than 2^16 slots are rejected.
pub const MAX_SHIFT: u32 = 16;

const DEFAULT_SHIFT: u32 = 5;

/// Leaf width and internal fan-out, both powers of two.
///
/// Chosen once when a vector is constructed and carried unchanged through
/// every fork of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorParameters {
    leaf_shift: u32,
    leaf_mask: usize,
    internal_shift: u32,
    internal_mask: usize,
}

impl VectorParameters {
    /// Build parameters for leaves of `2^leaf_shift` elements and internal
    /// nodes of `2^internal_shift` children.
    pub fn new(leaf_shift: u32, internal_shift: u32) -> Result<Self> {
        Self::check_shift("leaf_shift", leaf_shift)?;
        Self::check_shift("internal_shift", internal_shift)?;
        Ok(Self {
            leaf_shift,
            leaf_mask: (1usize << leaf_shift) - 1,
            internal_shift,
            internal_mask: (1usize << internal_shift) - 1,
        })
    }

    fn check_shift(name: &str, shift: u32) -> Result<()> {
        if shift == 0 {
            return Err(Error::InvalidConfiguration(format!(
                "{name} must be at least 1"
            )));
        }
        if shift > MAX_SHIFT {
            return Err(Error::InvalidConfiguration(format!(
                "{name} must be at most {MAX_SHIFT}, got {shift}"
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn leaf_shift(&self) -> u32 {
        self.leaf_shift
    }

    #[inline]
    pub fn leaf_mask(&self) -> usize {
        self.leaf_mask
    }

    /// Number of element slots in a leaf.
    #[inline]
    pub fn leaf_width(&self) -> usize {
        self.leaf_mask + 1
    }

    #[inline]
    pub fn internal_shift(&self) -> u32 {
        self.internal_shift
    }

    #[inline]
    pub fn internal_mask(&self) -> usize {
        self.internal_mask
    }

    /// Number of child slots in an internal node.
    #[inline]
    pub fn internal_width(&self) -> usize {
        self.internal_mask + 1
    }
}

impl Default for VectorParameters {
    fn default() -> Self {
        Self {
            leaf_shift: DEFAULT_SHIFT,
            leaf_mask: (1usize << DEFAULT_SHIFT) - 1,
            internal_shift: DEFAULT_SHIFT,
            internal_mask: (1usize << DEFAULT_SHIFT) - 1,
        }
    }
}
