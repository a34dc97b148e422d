//! Dataflow facts and results

use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use std::hash::Hash;

/// IN/OUT facts per node
///
/// For a forward analysis IN is the fact before the node and OUT the fact
/// after it; for a backward analysis the roles are mirrored (OUT is what the
/// successors need, IN what the node needs).
#[derive(Debug, Clone)]
pub struct DataflowResult<N, F> {
    in_facts: FxHashMap<N, F>,
    out_facts: FxHashMap<N, F>,
}

impl<N, F> Default for DataflowResult<N, F> {
    fn default() -> Self {
        Self {
            in_facts: FxHashMap::default(),
            out_facts: FxHashMap::default(),
        }
    }
}

impl<N: Copy + Eq + Hash, F> DataflowResult<N, F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_facts(in_facts: FxHashMap<N, F>, out_facts: FxHashMap<N, F>) -> Self {
        Self {
            in_facts,
            out_facts,
        }
    }

    pub fn get_in_fact(&self, node: N) -> Option<&F> {
        self.in_facts.get(&node)
    }

    pub fn get_out_fact(&self, node: N) -> Option<&F> {
        self.out_facts.get(&node)
    }

    pub fn set_in_fact(&mut self, node: N, fact: F) {
        self.in_facts.insert(node, fact);
    }

    pub fn set_out_fact(&mut self, node: N, fact: F) {
        self.out_facts.insert(node, fact);
    }

    pub(crate) fn take_in_fact(&mut self, node: N) -> Option<F> {
        self.in_facts.remove(&node)
    }

    pub(crate) fn take_out_fact(&mut self, node: N) -> Option<F> {
        self.out_facts.remove(&node)
    }

    /// Nodes with an OUT fact
    pub fn nodes(&self) -> impl Iterator<Item = N> + '_ {
        self.out_facts.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.out_facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.out_facts.is_empty()
    }
}

/// Set-valued fact (live variables and similar may analyses)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SetFact<T: Ord> {
    elems: BTreeSet<T>,
}

impl<T: Ord + Clone> SetFact<T> {
    pub fn new() -> Self {
        Self {
            elems: BTreeSet::new(),
        }
    }

    pub fn contains(&self, elem: &T) -> bool {
        self.elems.contains(elem)
    }

    pub fn add(&mut self, elem: T) -> bool {
        self.elems.insert(elem)
    }

    pub fn remove(&mut self, elem: &T) -> bool {
        self.elems.remove(elem)
    }

    /// Returns true if `self` changed
    pub fn union(&mut self, other: &SetFact<T>) -> bool {
        let before = self.elems.len();
        self.elems.extend(other.elems.iter().cloned());
        self.elems.len() != before
    }

    /// Overwrite with `other`, returns true if `self` changed
    pub fn set(&mut self, other: &SetFact<T>) -> bool {
        if self.elems == other.elems {
            return false;
        }
        self.elems.clone_from(&other.elems);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.elems.iter()
    }

    pub fn len(&self) -> usize {
        self.elems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }
}

impl<T: Ord + Clone> FromIterator<T> for SetFact<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            elems: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_fact_union_reports_change() {
        let mut a: SetFact<u32> = [1, 2].into_iter().collect();
        let b: SetFact<u32> = [2, 3].into_iter().collect();
        assert!(a.union(&b));
        assert!(!a.union(&b));
        assert_eq!(a.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_set_fact_set() {
        let mut a: SetFact<u32> = [1].into_iter().collect();
        let b: SetFact<u32> = [4].into_iter().collect();
        assert!(a.set(&b));
        assert!(!a.set(&b));
        assert!(a.contains(&4) && !a.contains(&1));
    }

    #[test]
    fn test_result_take_and_set() {
        let mut result: DataflowResult<u32, SetFact<u32>> = DataflowResult::new();
        result.set_out_fact(0, [7].into_iter().collect());
        assert_eq!(result.len(), 1);
        let fact = result.take_out_fact(0).unwrap();
        assert!(result.get_out_fact(0).is_none());
        result.set_out_fact(0, fact);
        assert!(result.get_out_fact(0).unwrap().contains(&7));
        assert!(result.get_in_fact(0).is_none());
    }
}
