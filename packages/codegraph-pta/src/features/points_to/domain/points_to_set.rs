//! Points-to set over context-qualified objects

use super::pointer::CsObjId;
use crate::features::points_to::infrastructure::sparse_bitmap::SparseBitmap;
use serde::{Deserialize, Serialize};

/// Monotonically growing set of [`CsObjId`]s
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsToSet {
    bits: SparseBitmap,
}

impl PointsToSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn singleton(obj: CsObjId) -> Self {
        Self {
            bits: SparseBitmap::singleton(obj.0),
        }
    }

    /// Returns true if `obj` was new
    #[inline]
    pub fn add(&mut self, obj: CsObjId) -> bool {
        self.bits.insert(obj.0)
    }

    /// Add every object of `other`; returns the objects that were new
    pub fn add_all(&mut self, other: &PointsToSet) -> PointsToSet {
        PointsToSet {
            bits: self.bits.union_with(&other.bits),
        }
    }

    #[inline]
    pub fn contains(&self, obj: CsObjId) -> bool {
        self.bits.contains(obj.0)
    }

    pub fn intersects(&self, other: &PointsToSet) -> bool {
        self.bits.intersects(&other.bits)
    }

    pub fn is_subset_of(&self, other: &PointsToSet) -> bool {
        self.bits.is_subset_of(&other.bits)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Objects in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = CsObjId> + '_ {
        self.bits.iter().map(CsObjId)
    }
}

impl FromIterator<CsObjId> for PointsToSet {
    fn from_iter<I: IntoIterator<Item = CsObjId>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().map(|o| o.0).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_all_returns_delta() {
        let mut pts = PointsToSet::singleton(CsObjId(1));
        let other: PointsToSet = [CsObjId(1), CsObjId(4)].into_iter().collect();

        let delta = pts.add_all(&other);
        assert_eq!(delta.iter().collect::<Vec<_>>(), vec![CsObjId(4)]);
        assert_eq!(pts.len(), 2);
        assert!(pts.add_all(&other).is_empty());
    }
}
