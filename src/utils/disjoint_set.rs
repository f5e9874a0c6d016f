/*!
# Disjoint Sets

Union-find over arbitrary node values.
Elements are registered one by one with [`DisjointSet::create`]; afterwards only
[`DisjointSet::find`] and [`DisjointSet::union`] are used.
*/

use std::collections::BTreeMap;

use fxhash::FxHashMap;

use crate::node::NodeId;

/// Union-find with path compression and union by rank
#[derive(Clone, Debug, Default)]
pub struct DisjointSet<N> {
    parent: FxHashMap<N, N>,
    rank: FxHashMap<N, u32>,
    num_sets: usize,
}

impl<N: NodeId> DisjointSet<N> {
    pub fn new() -> Self {
        Self {
            parent: FxHashMap::default(),
            rank: FxHashMap::default(),
            num_sets: 0,
        }
    }

    /// Creates a disjoint set with every element of `items` as a singleton
    pub fn from_elements(items: impl IntoIterator<Item = N>) -> Self {
        let mut set = Self::new();
        for x in items {
            set.create(x);
        }
        set
    }

    /// Registers `x` as a new singleton set.
    /// ** Panics if `x` was already registered **
    pub fn create(&mut self, x: N) {
        assert!(
            !self.parent.contains_key(&x),
            "element {x:?} is already part of the disjoint set"
        );
        self.rank.insert(x.clone(), 0);
        self.parent.insert(x.clone(), x);
        self.num_sets += 1;
    }

    /// Returns *true* if `x` was registered
    pub fn contains(&self, x: &N) -> bool {
        self.parent.contains_key(x)
    }

    /// Returns the number of registered elements
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Returns *true* if no element was registered
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Returns the number of disjoint sets
    pub fn number_of_sets(&self) -> usize {
        self.num_sets
    }

    /// Returns the representative of the set containing `x` or `None` if `x` is unknown.
    /// Every element on the path to the root points directly to the root afterwards.
    pub fn find(&mut self, x: &N) -> Option<N> {
        let mut root = self.parent.get(x)?.clone();
        loop {
            let next = self.parent.get(&root)?;
            if *next == root {
                break;
            }
            root = next.clone();
        }

        let mut current = x.clone();
        while current != root {
            let next = self.parent.insert(current, root.clone())?;
            current = next;
        }

        Some(root)
    }

    /// Merges the sets containing `x` and `y`; the root of lower rank is attached below
    /// the other root and ranks only grow on ties.
    /// Returns *true* if two different sets were merged.
    pub fn union(&mut self, x: &N, y: &N) -> bool {
        let (Some(rx), Some(ry)) = (self.find(x), self.find(y)) else {
            return false;
        };
        if rx == ry {
            return false;
        }

        let rank_x = self.rank.get(&rx).copied().unwrap_or(0);
        let rank_y = self.rank.get(&ry).copied().unwrap_or(0);

        if rank_x < rank_y {
            self.parent.insert(rx, ry);
        } else {
            if rank_x == rank_y {
                self.rank.insert(rx.clone(), rank_x + 1);
            }
            self.parent.insert(ry, rx);
        }

        self.num_sets -= 1;
        true
    }

    /// Returns *true* if both elements are known and in the same set
    pub fn same_set(&mut self, x: &N, y: &N) -> bool {
        match (self.find(x), self.find(y)) {
            (Some(rx), Some(ry)) => rx == ry,
            _ => false,
        }
    }

    /// Returns all sets, each sorted, ordered by their smallest element
    pub fn sets(&mut self) -> Vec<Vec<N>> {
        let elements: Vec<N> = self.parent.keys().cloned().collect();
        let mut groups: BTreeMap<N, Vec<N>> = BTreeMap::new();
        for x in elements {
            if let Some(root) = self.find(&x) {
                groups.entry(root).or_default().push(x);
            }
        }

        let mut sets: Vec<Vec<N>> = groups
            .into_values()
            .map(|mut s| {
                s.sort();
                s
            })
            .collect();
        sets.sort();
        sets
    }

    #[cfg(test)]
    fn rank_of(&self, x: &N) -> u32 {
        self.rank[x]
    }

    #[cfg(test)]
    fn parent_of(&self, x: &N) -> &N {
        &self.parent[x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn union_and_find() {
        let mut ds = DisjointSet::from_elements(0..8u32);
        assert_eq!(ds.number_of_sets(), 8);

        assert!(ds.union(&0, &1));
        assert!(ds.union(&2, &3));
        assert!(ds.union(&0, &3));
        assert!(!ds.union(&1, &2));
        assert_eq!(ds.number_of_sets(), 5);

        assert!(ds.same_set(&1, &2));
        assert!(!ds.same_set(&1, &4));
        assert!(!ds.same_set(&1, &42));
        assert_eq!(ds.find(&42), None);

        assert_eq!(
            ds.sets(),
            vec![vec![0, 1, 2, 3], vec![4], vec![5], vec![6], vec![7]]
        );
    }

    #[test]
    fn rank_only_grows_on_ties() {
        let mut ds = DisjointSet::from_elements(['a', 'b', 'c']);
        ds.union(&'a', &'b');
        let root = ds.find(&'a').unwrap();
        assert_eq!(ds.rank_of(&root), 1);

        ds.union(&'c', &'a');
        assert_eq!(ds.find(&'c'), Some(root));
        assert_eq!(ds.rank_of(&root), 1);
    }

    #[test]
    fn path_compression() {
        let rng = &mut Pcg64Mcg::seed_from_u64(7);
        let n = 200u32;
        let mut ds = DisjointSet::from_elements(0..n);
        for _ in 0..150 {
            let x = rng.random_range(0..n);
            let y = rng.random_range(0..n);
            ds.union(&x, &y);
        }

        for x in 0..n {
            let root = ds.find(&x).unwrap();
            assert_eq!(ds.parent_of(&x), &root);
        }

        let sizes: usize = ds.sets().iter().map(|s| s.len()).sum();
        assert_eq!(sizes, n as usize);
    }

    #[test]
    #[should_panic]
    fn recreating_panics() {
        let mut ds = DisjointSet::new();
        ds.create(1u32);
        ds.create(1u32);
    }
}
