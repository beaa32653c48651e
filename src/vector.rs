//! The persistent vector: a trie of full leaves plus a tail buffer.
//!
//! Indices `[0, tail_offset)` live in the trie, indices `[tail_offset, len)`
//! live in `tail`. Only the rightmost spine of the trie may be partially
//! populated; every node to the left of it is full. `pop_tail` relies on
//! that when it treats an empty first slot as an empty node.

use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use tracing::trace;

use crate::error::{Error, Result};
use crate::node::Node;
use crate::params::VectorParameters;
use crate::tag::{Tag, TagSource};

/// Persistent indexed sequence with O(1) fork.
///
/// Mutation goes through `&mut self` and only ever copies the nodes on the
/// touched root-to-leaf path that this lineage does not already own.
pub struct Vector<T> {
    pub(crate) params: VectorParameters,
    tags: Arc<TagSource>,
    tag: Tag,
    pub(crate) root: Node<T>,
    /// Always a leaf.
    pub(crate) tail: Node<T>,
    /// `(index >> shift) & internal_mask` is the root slot for `index`.
    pub(crate) shift: u32,
    pub(crate) count: usize,
}

impl<T> Vector<T> {
    /// Empty vector with 32-way nodes and the process-wide tag source.
    pub fn new() -> Self {
        Self::with_params(VectorParameters::default())
    }

    pub fn with_params(params: VectorParameters) -> Self {
        Self::with_tag_source(params, TagSource::global())
    }

    /// Empty vector drawing its tags (and those of its forks) from `tags`.
    pub fn with_tag_source(params: VectorParameters, tags: Arc<TagSource>) -> Self {
        let tag = tags.allocate();
        Self {
            params,
            tags,
            tag,
            root: Node::internal(tag, params.internal_width()),
            tail: Node::leaf(tag, params.leaf_width()),
            shift: params.leaf_shift(),
            count: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn params(&self) -> VectorParameters {
        self.params
    }

    /// Shift applied at the root; equals `leaf_shift` while the trie has a
    /// single level of internal nodes.
    #[inline]
    pub fn shift(&self) -> u32 {
        self.shift
    }

    /// The tag this vector currently writes with.
    #[inline]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// First index held by the tail.
    #[inline]
    pub(crate) fn tail_offset(&self) -> usize {
        if self.count == 0 {
            0
        } else {
            (self.count - 1) & !self.params.leaf_mask()
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.count {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.count,
            });
        }
        Ok(())
    }

    /// Live values of the leaf holding `index`.
    pub(crate) fn leaf_values(&self, index: usize) -> &[T] {
        if index >= self.tail_offset() {
            return self.tail.values();
        }

        let p = &self.params;
        let mut node = &self.root;
        let mut shift = self.shift;
        loop {
            node = match node.children().get((index >> shift) & p.internal_mask()) {
                Some(child) => child,
                None => return &[],
            };
            if shift == p.leaf_shift() {
                break;
            }
            shift -= p.internal_shift();
        }
        node.values()
    }

    pub fn get(&self, index: usize) -> Result<&T> {
        self.check_index(index)?;
        self.leaf_values(index)
            .get(index & self.params.leaf_mask())
            .ok_or(Error::IndexOutOfRange {
                index,
                len: self.count,
            })
    }

    pub fn first(&self) -> Option<&T> {
        self.get(0).ok()
    }

    pub fn last(&self) -> Option<&T> {
        self.count.checked_sub(1).and_then(|i| self.get(i).ok())
    }

    /// Detach this vector from everything it currently shares and return an
    /// independent vector with the same contents. O(1).
    ///
    /// Both sides get fresh tags, so nodes either of them owned before the
    /// fork are now foreign to both and get copied on first write.
    pub fn fork(&mut self) -> Self {
        let old = self.tag;
        self.tag = self.tags.allocate();
        let forked = Self {
            params: self.params,
            tags: Arc::clone(&self.tags),
            tag: self.tags.allocate(),
            root: self.root.clone(),
            tail: self.tail.clone(),
            shift: self.shift,
            count: self.count,
        };
        trace!(
            target: "forkvec::vector",
            old = old.get(),
            retagged = self.tag.get(),
            forked = forked.tag.get(),
            count = self.count,
            "forked vector"
        );
        forked
    }
}

impl<T: Clone> Vector<T> {
    /// Overwrite the element at `index`.
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        self.check_index(index)?;
        let p = self.params;
        let tag = self.tag;

        let slot = if index >= self.tail_offset() {
            &mut self.tail
        } else {
            let mut node = &mut self.root;
            let mut shift = self.shift;
            loop {
                let internal = node.internal_mut(tag, p.internal_width());
                node = &mut internal.children[(index >> shift) & p.internal_mask()];
                if shift == p.leaf_shift() {
                    break;
                }
                shift -= p.internal_shift();
            }
            node
        };

        slot.leaf_mut(tag).values[index & p.leaf_mask()] = value;
        Ok(())
    }

    /// Append `value`. Amortized O(1).
    pub fn push(&mut self, value: T) {
        if self.count > 0 && self.count & self.params.leaf_mask() == 0 {
            self.push_tail();
        }

        let tail = self.tail.leaf_mut(self.tag);
        debug_assert_eq!(tail.values.len(), self.count & self.params.leaf_mask());
        tail.values.push(value);
        self.count += 1;
    }

    /// Graft the full tail into the trie as its new rightmost leaf and start
    /// a fresh tail.
    fn push_tail(&mut self) {
        let p = self.params;
        let tag = self.tag;

        // A root at `shift` addresses 2^(shift + internal_shift) trie elements.
        let full = 1usize
            .checked_shl(self.shift + p.internal_shift())
            .map_or(false, |capacity| self.count > capacity);
        if full {
            let old_root = std::mem::replace(&mut self.root, Node::Empty);
            self.root
                .internal_mut(tag, p.internal_width())
                .children[0] = old_root;
            self.shift += p.internal_shift();
            trace!(
                target: "forkvec::vector",
                shift = self.shift,
                count = self.count,
                "grew trie root"
            );
        }

        let leaf = std::mem::replace(&mut self.tail, Node::leaf(tag, p.leaf_width()));
        let last = self.count - 1;
        let mut node = &mut self.root;
        let mut shift = self.shift;
        loop {
            let internal = node.internal_mut(tag, p.internal_width());
            let slot = &mut internal.children[(last >> shift) & p.internal_mask()];
            if shift == p.leaf_shift() {
                debug_assert!(slot.is_empty());
                *slot = leaf;
                break;
            }
            node = slot;
            shift -= p.internal_shift();
        }
    }

    /// Remove and return the last element, or `None` when empty.
    pub fn try_pop(&mut self) -> Option<T> {
        if self.count == 0 {
            return None;
        }

        let value = self.tail.leaf_mut(self.tag).values.pop();
        self.count -= 1;
        if self.count > 0 && self.count & self.params.leaf_mask() == 0 {
            self.pop_tail();
        }
        value
    }

    /// Move the rightmost trie leaf into the (now empty) tail and shrink the
    /// trie if that leaves it taller than needed.
    fn pop_tail(&mut self) {
        let p = self.params;
        let tag = self.tag;
        let last = self.count - 1;

        self.tail = detach_rightmost(&mut self.root, self.shift, last, &p, tag);
        debug_assert_eq!(self.tail.values().len(), p.leaf_width());

        // Rightmost-dense: an empty second slot leaves the root with one child.
        let single_child = self.root.children().get(1).map_or(true, Node::is_empty);
        if self.shift > p.leaf_shift() && single_child {
            let child = self.root.children().first().cloned().unwrap_or(Node::Empty);
            self.root = child;
            self.shift -= p.internal_shift();
            trace!(
                target: "forkvec::vector",
                shift = self.shift,
                count = self.count,
                "collapsed trie root"
            );
        } else if self.shift == p.leaf_shift() && self.root.is_empty() {
            self.root = Node::internal(tag, p.internal_width());
        }
    }
}

/// Detach the leaf holding index `last` from the subtree at `node`, writing
/// under `tag`. A node left without children collapses to `Empty`.
fn detach_rightmost<T>(
    node: &mut Node<T>,
    shift: u32,
    last: usize,
    p: &VectorParameters,
    tag: Tag,
) -> Node<T> {
    let internal = node.internal_mut(tag, p.internal_width());
    let slot = &mut internal.children[(last >> shift) & p.internal_mask()];
    let leaf = if shift == p.leaf_shift() {
        std::mem::replace(slot, Node::Empty)
    } else {
        detach_rightmost(slot, shift - p.internal_shift(), last, p, tag)
    };
    // Only the rightmost spine is ever partial, so an empty first slot means
    // the whole node is empty.
    if internal.children[0].is_empty() {
        *node = Node::Empty;
    }
    leaf
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for Vector<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for Vector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for Vector<T> {}
