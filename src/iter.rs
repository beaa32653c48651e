//! Iteration and collection-trait integration.

use std::iter::FusedIterator;

use crate::vector::Vector;

/// Borrowing iterator over a [`Vector`], front to back.
///
/// Descends the trie once per leaf rather than once per element.
pub struct Iter<'a, T> {
    vector: &'a Vector<T>,
    leaf: std::slice::Iter<'a, T>,
    /// Index of the element after the current leaf.
    next_leaf: usize,
    remaining: usize,
}

impl<T> Vector<T> {
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            vector: self,
            leaf: <&[T]>::default().iter(),
            next_leaf: 0,
            remaining: self.len(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        loop {
            if let Some(value) = self.leaf.next() {
                self.remaining -= 1;
                return Some(value);
            }
            let values = self.vector.leaf_values(self.next_leaf);
            if values.is_empty() {
                self.remaining = 0;
                return None;
            }
            self.next_leaf += values.len();
            self.leaf = values.iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Clone> Extend<T> for Vector<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T: Clone> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vector = Vector::new();
        vector.extend(iter);
        vector
    }
}
