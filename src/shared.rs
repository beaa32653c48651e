//! A single writer lineage behind a lock, handing out O(1) snapshots.

use parking_lot::RwLock;

use crate::error::Result;
use crate::vector::Vector;

/// Thread-safe wrapper around one [`Vector`] lineage.
///
/// Writers serialise on the lock. Readers that need a stable view call
/// [`SharedVector::snapshot`] and work on the returned fork without holding
/// the lock at all.
pub struct SharedVector<T> {
    inner: RwLock<Vector<T>>,
}

impl<T: Clone> SharedVector<T> {
    pub fn new(vector: Vector<T>) -> Self {
        Self {
            inner: RwLock::new(vector),
        }
    }

    pub fn push(&self, value: T) {
        self.inner.write().push(value);
    }

    pub fn set(&self, index: usize, value: T) -> Result<()> {
        self.inner.write().set(index, value)
    }

    pub fn try_pop(&self) -> Option<T> {
        self.inner.write().try_pop()
    }

    /// Clone of the element at `index`.
    pub fn get(&self, index: usize) -> Result<T> {
        self.inner.read().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Independent copy of the current contents.
    ///
    /// Takes the write lock only for the fork itself, which re-tags the
    /// lineage so later writes copy instead of touching shared nodes.
    pub fn snapshot(&self) -> Vector<T> {
        self.inner.write().fork()
    }

    pub fn into_inner(self) -> Vector<T> {
        self.inner.into_inner()
    }
}

impl<T: Clone> Default for SharedVector<T> {
    fn default() -> Self {
        Self::new(Vector::new())
    }
}

impl<T: Clone> From<Vector<T>> for SharedVector<T> {
    fn from(vector: Vector<T>) -> Self {
        Self::new(vector)
    }
}
