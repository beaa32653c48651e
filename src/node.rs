//! Trie nodes and the copy-on-write rule.
//!
//! A node carries the tag of the lineage that last wrote it. A lineage may
//! write a node in place only when the node carries its own tag; any other
//! node is first replaced in its parent slot by a shallow copy stamped with
//! the writer's tag. `internal_mut` and `leaf_mut` are the only ways to get
//! mutable access to a node, so every write path goes through that rule.

use std::sync::Arc;

use crate::tag::Tag;

/// One slot of the trie. Cloning a `Node` shares the underlying node.
pub(crate) enum Node<T> {
    /// No node here.
    Empty,
    Internal(Arc<Internal<T>>),
    Leaf(Arc<Leaf<T>>),
}

pub(crate) struct Internal<T> {
    tag: Tag,
    /// Exactly `internal_width` slots.
    pub(crate) children: Box<[Node<T>]>,
}

pub(crate) struct Leaf<T> {
    tag: Tag,
    /// Live slots are `values[..len]`; capacity is the leaf width.
    pub(crate) values: Vec<T>,
}

impl<T> Clone for Node<T> {
    fn clone(&self) -> Self {
        match self {
            Node::Empty => Node::Empty,
            Node::Internal(node) => Node::Internal(Arc::clone(node)),
            Node::Leaf(node) => Node::Leaf(Arc::clone(node)),
        }
    }
}

impl<T> Clone for Internal<T> {
    fn clone(&self) -> Self {
        Self {
            tag: self.tag,
            children: self.children.clone(),
        }
    }
}

impl<T: Clone> Clone for Leaf<T> {
    fn clone(&self) -> Self {
        Self {
            tag: self.tag,
            values: copy_values(&self.values),
        }
    }
}

// Keeps the copy at full leaf capacity so later pushes never reallocate.
fn copy_values<T: Clone>(values: &Vec<T>) -> Vec<T> {
    let mut out = Vec::with_capacity(values.capacity());
    out.extend_from_slice(values);
    out
}

impl<T> Node<T> {
    /// Fresh internal node with `width` empty children.
    pub(crate) fn internal(tag: Tag, width: usize) -> Self {
        let children = (0..width).map(|_| Node::Empty).collect();
        Node::Internal(Arc::new(Internal { tag, children }))
    }

    /// Fresh leaf with room for `width` elements and none live.
    pub(crate) fn leaf(tag: Tag, width: usize) -> Self {
        Node::Leaf(Arc::new(Leaf {
            tag,
            values: Vec::with_capacity(width),
        }))
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        matches!(self, Node::Empty)
    }

    #[cfg(test)]
    pub(crate) fn tag(&self) -> Option<Tag> {
        match self {
            Node::Empty => None,
            Node::Internal(node) => Some(node.tag),
            Node::Leaf(node) => Some(node.tag),
        }
    }

    /// Child slots of an internal node; empty for anything else.
    #[inline]
    pub(crate) fn children(&self) -> &[Node<T>] {
        match self {
            Node::Internal(node) => &node.children,
            _ => &[],
        }
    }

    /// Live values of a leaf; empty for anything else.
    #[inline]
    pub(crate) fn values(&self) -> &[T] {
        match self {
            Node::Leaf(node) => &node.values,
            _ => &[],
        }
    }

    /// Make this slot an internal node writable by `tag` and borrow it.
    ///
    /// An `Empty` slot becomes a fresh internal node of `width` children.
    /// A node stamped with another tag is replaced by a copy stamped with
    /// `tag`; the original stays untouched for whoever else holds it.
    pub(crate) fn internal_mut(&mut self, tag: Tag, width: usize) -> &mut Internal<T> {
        match self {
            Node::Empty => *self = Node::internal(tag, width),
            Node::Internal(node) if node.tag != tag => {
                let copy = Internal {
                    tag,
                    children: node.children.clone(),
                };
                *node = Arc::new(copy);
            }
            Node::Internal(_) => {}
            Node::Leaf(_) => panic!("trie path reached a leaf above the leaf level"),
        }
        match self {
            Node::Internal(node) => Arc::make_mut(node),
            _ => unreachable!(),
        }
    }
}

impl<T: Clone> Node<T> {
    /// Make this slot a leaf writable by `tag` and borrow it.
    ///
    /// Same rule as [`Node::internal_mut`]; the slot must already hold a leaf.
    pub(crate) fn leaf_mut(&mut self, tag: Tag) -> &mut Leaf<T> {
        match self {
            Node::Leaf(node) if node.tag != tag => {
                let copy = Leaf {
                    tag,
                    values: copy_values(&node.values),
                };
                *node = Arc::new(copy);
            }
            Node::Leaf(_) => {}
            Node::Empty | Node::Internal(_) => panic!("expected a leaf node"),
        }
        match self {
            Node::Leaf(node) => Arc::make_mut(node),
            _ => unreachable!(),
        }
    }
}
