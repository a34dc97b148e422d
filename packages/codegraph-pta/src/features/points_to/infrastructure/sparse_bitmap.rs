//! Sparse Bitmap for Points-to Sets
//!
//! Sorted, deduplicated `Vec<u32>`:
//! - Insert: O(log n) search + shift
//! - Contains: O(log n)
//! - Union / difference / intersects: O(n + m) merge
//!
//! Points-to sets only grow, so there is no removal.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sorted set of dense `u32` ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SparseBitmap {
    elements: Vec<u32>,
}

impl SparseBitmap {
    /// Create an empty bitmap
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a single element
    #[inline]
    pub fn singleton(element: u32) -> Self {
        Self {
            elements: vec![element],
        }
    }

    /// Insert an element. Returns true if element was not present.
    #[inline]
    pub fn insert(&mut self, element: u32) -> bool {
        match self.elements.binary_search(&element) {
            Ok(_) => false,
            Err(pos) => {
                self.elements.insert(pos, element);
                true
            }
        }
    }

    #[inline]
    pub fn contains(&self, element: u32) -> bool {
        self.elements.binary_search(&element).is_ok()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate in ascending order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.elements.iter().copied()
    }

    /// self = self ∪ other; returns the elements that were new to self
    pub fn union_with(&mut self, other: &SparseBitmap) -> SparseBitmap {
        let added = other.difference(self);
        if added.is_empty() {
            return added;
        }

        let mut merged = Vec::with_capacity(self.elements.len() + added.elements.len());
        let (mut i, mut j) = (0, 0);
        while i < self.elements.len() && j < added.elements.len() {
            if self.elements[i] < added.elements[j] {
                merged.push(self.elements[i]);
                i += 1;
            } else {
                merged.push(added.elements[j]);
                j += 1;
            }
        }
        merged.extend_from_slice(&self.elements[i..]);
        merged.extend_from_slice(&added.elements[j..]);
        self.elements = merged;

        added
    }

    /// Elements of self not in other
    pub fn difference(&self, other: &SparseBitmap) -> SparseBitmap {
        let mut result = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.elements.len() {
            if j >= other.elements.len() {
                result.extend_from_slice(&self.elements[i..]);
                break;
            }
            match self.elements[i].cmp(&other.elements[j]) {
                Ordering::Less => {
                    result.push(self.elements[i]);
                    i += 1;
                }
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    i += 1;
                    j += 1;
                }
            }
        }
        SparseBitmap { elements: result }
    }

    /// Whether the two sets share an element
    pub fn intersects(&self, other: &SparseBitmap) -> bool {
        let (mut i, mut j) = (0, 0);
        while i < self.elements.len() && j < other.elements.len() {
            match self.elements[i].cmp(&other.elements[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => return true,
            }
        }
        false
    }

    /// Whether every element of self is in other
    pub fn is_subset_of(&self, other: &SparseBitmap) -> bool {
        self.len() <= other.len() && self.difference(other).is_empty()
    }
}

impl FromIterator<u32> for SparseBitmap {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut elements: Vec<u32> = iter.into_iter().collect();
        elements.sort_unstable();
        elements.dedup();
        Self { elements }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut bm = SparseBitmap::new();
        assert!(bm.is_empty());

        assert!(bm.insert(5));
        assert!(bm.insert(1));
        assert!(!bm.insert(5));

        assert_eq!(bm.len(), 2);
        assert!(bm.contains(1));
        assert!(!bm.contains(2));
        assert_eq!(bm.iter().collect::<Vec<_>>(), vec![1, 5]);
    }

    #[test]
    fn test_union_returns_delta() {
        let mut a: SparseBitmap = [1, 3, 5].into_iter().collect();
        let b: SparseBitmap = [2, 3, 6].into_iter().collect();

        let delta = a.union_with(&b);
        assert_eq!(delta.iter().collect::<Vec<_>>(), vec![2, 6]);
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![1, 2, 3, 5, 6]);

        let again = a.union_with(&b);
        assert!(again.is_empty());
    }

    #[test]
    fn test_difference() {
        let a: SparseBitmap = [1, 2, 3, 4].into_iter().collect();
        let b: SparseBitmap = [2, 4, 9].into_iter().collect();
        assert_eq!(a.difference(&b).iter().collect::<Vec<_>>(), vec![1, 3]);
        assert!(b.difference(&b).is_empty());
    }

    #[test]
    fn test_intersects() {
        let a: SparseBitmap = [1, 5, 9].into_iter().collect();
        let b: SparseBitmap = [2, 9].into_iter().collect();
        let c: SparseBitmap = [3, 4].into_iter().collect();
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_subset() {
        let a: SparseBitmap = [1, 5].into_iter().collect();
        let b: SparseBitmap = [1, 3, 5].into_iter().collect();
        assert!(a.is_subset_of(&b));
        assert!(!b.is_subset_of(&a));
    }

    // ═══════════════════════════════════════════════════════════════════════
    // EDGE CASES
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_empty_operations() {
        let mut empty = SparseBitmap::new();
        let other = SparseBitmap::singleton(7);
        assert!(!empty.intersects(&other));
        assert!(empty.is_subset_of(&other));
        let delta = empty.union_with(&other);
        assert_eq!(delta, other);
        assert_eq!(empty, other);
    }

    #[test]
    fn test_from_iter_dedups() {
        let bm: SparseBitmap = [4, 4, 1, 4].into_iter().collect();
        assert_eq!(bm.len(), 2);
    }
}
