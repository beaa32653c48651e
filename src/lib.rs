//! # forkvec
//!
//! A persistent indexed sequence with O(1) fork.
//!
//! The vector is a trie of fixed-width leaves under fixed-fan-out internal
//! nodes, plus a tail leaf kept outside the trie so that push and pop touch
//! the trie only once per leaf. Every node carries the ownership tag of the
//! lineage that last wrote it; a lineage writes in place only into nodes
//! carrying its own tag and copies everything else on the way down.
//! [`Vector::fork`] hands out fresh tags on both sides, which is all it takes
//! to make the two vectors independent.
//!
//! ## Example
//!
//! ```rust
//! use forkvec::Vector;
//!
//! let mut v: Vector<u64> = (0..1000).collect();
//! let mut snapshot = v.fork();
//!
//! v.set(10, 42).unwrap();
//! v.push(1000);
//! assert_eq!(snapshot.try_pop(), Some(999));
//!
//! assert_eq!(v[10], 42);
//! assert_eq!(v.len(), 1001);
//! assert_eq!(snapshot[10], 10);
//! assert_eq!(snapshot.len(), 999);
//! ```

#![deny(unsafe_code)]

mod error;
mod iter;
mod node;
mod params;
mod shared;
mod tag;
mod vector;

pub use error::{Error, Result};
pub use iter::Iter;
pub use params::{VectorParameters, MAX_SHIFT};
pub use shared::SharedVector;
pub use tag::{Tag, TagSource};
pub use vector::Vector;

#[cfg(test)]
mod proptests;
