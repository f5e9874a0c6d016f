/*!
# Degree Queues

Priority containers over small non-negative integer keys (usually degrees).
Peeling orders, smallest-first and largest-first strategies only differ in whether they
extract the minimum or the maximum; the container choice is a type parameter of those algorithms.

Both implementations break ties by the smallest node, so they are interchangeable:
- [`BucketQueue`]: array of buckets indexed by key with moving cursors,
- [`OrderedQueue`]: a single ordered set of `(key, node)` pairs.
*/

use std::collections::BTreeSet;

use fxhash::FxHashMap;

use crate::node::NodeId;

/// Common interface of priority containers keyed by small integers
pub trait DegreeQueue<N: NodeId>: Sized {
    /// Creates a queue from `(node, key)` pairs
    fn from_keys(items: impl IntoIterator<Item = (N, usize)>) -> Self;

    /// Returns the number of nodes in the queue
    fn len(&self) -> usize;

    /// Returns *true* if the queue is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the current key of `u` if it is in the queue
    fn key_of(&self, u: &N) -> Option<usize>;

    /// Returns *true* if `u` is in the queue
    fn contains(&self, u: &N) -> bool {
        self.key_of(u).is_some()
    }

    /// Changes the key of `u`; no-op if `u` is not in the queue
    fn set_key(&mut self, u: &N, key: usize);

    /// Removes `u` from the queue and returns its key
    fn remove(&mut self, u: &N) -> Option<usize>;

    /// Removes and returns the smallest node with minimum key
    fn pop_min(&mut self) -> Option<(N, usize)>;

    /// Removes and returns the smallest node with maximum key
    fn pop_max(&mut self) -> Option<(N, usize)>;

    /// Decreases the key of `u` by one (saturating)
    fn decrement(&mut self, u: &N) {
        if let Some(k) = self.key_of(u) {
            self.set_key(u, k.saturating_sub(1));
        }
    }

    /// Increases the key of `u` by one
    fn increment(&mut self, u: &N) {
        if let Some(k) = self.key_of(u) {
            self.set_key(u, k + 1);
        }
    }
}

/// Bucket array indexed by key
#[derive(Clone, Debug)]
pub struct BucketQueue<N> {
    keys: FxHashMap<N, usize>,
    buckets: Vec<BTreeSet<N>>,
    min_cursor: usize,
}

impl<N: NodeId> BucketQueue<N> {
    fn bucket_mut(&mut self, key: usize) -> &mut BTreeSet<N> {
        if self.buckets.len() <= key {
            self.buckets.resize_with(key + 1, BTreeSet::new);
        }
        &mut self.buckets[key]
    }

    fn insert(&mut self, u: N, key: usize) {
        self.bucket_mut(key).insert(u.clone());
        self.keys.insert(u, key);
        self.min_cursor = self.min_cursor.min(key);
    }
}

impl<N: NodeId> DegreeQueue<N> for BucketQueue<N> {
    fn from_keys(items: impl IntoIterator<Item = (N, usize)>) -> Self {
        let mut queue = Self {
            keys: FxHashMap::default(),
            buckets: Vec::new(),
            min_cursor: 0,
        };
        for (u, key) in items {
            queue.insert(u, key);
        }
        queue
    }

    fn len(&self) -> usize {
        self.keys.len()
    }

    fn key_of(&self, u: &N) -> Option<usize> {
        self.keys.get(u).copied()
    }

    fn set_key(&mut self, u: &N, key: usize) {
        if self.remove(u).is_some() {
            self.insert(u.clone(), key);
        }
    }

    fn remove(&mut self, u: &N) -> Option<usize> {
        let key = self.keys.remove(u)?;
        self.buckets[key].remove(u);
        Some(key)
    }

    fn pop_min(&mut self) -> Option<(N, usize)> {
        if self.keys.is_empty() {
            return None;
        }
        while self.buckets[self.min_cursor].is_empty() {
            self.min_cursor += 1;
        }

        let key = self.min_cursor;
        let u = self.buckets[key].pop_first()?;
        self.keys.remove(&u);
        Some((u, key))
    }

    fn pop_max(&mut self) -> Option<(N, usize)> {
        if self.keys.is_empty() {
            return None;
        }
        while self.buckets.last().is_some_and(|b| b.is_empty()) {
            self.buckets.pop();
        }

        let key = self.buckets.len() - 1;
        let u = self.buckets[key].pop_first()?;
        self.keys.remove(&u);
        Some((u, key))
    }
}

/// Ordered set of `(key, node)` pairs
#[derive(Clone, Debug)]
pub struct OrderedQueue<N> {
    keys: FxHashMap<N, usize>,
    entries: BTreeSet<(usize, N)>,
}

impl<N: NodeId> DegreeQueue<N> for OrderedQueue<N> {
    fn from_keys(items: impl IntoIterator<Item = (N, usize)>) -> Self {
        let mut keys = FxHashMap::default();
        let mut entries = BTreeSet::new();
        for (u, key) in items {
            entries.insert((key, u.clone()));
            keys.insert(u, key);
        }
        Self { keys, entries }
    }

    fn len(&self) -> usize {
        self.keys.len()
    }

    fn key_of(&self, u: &N) -> Option<usize> {
        self.keys.get(u).copied()
    }

    fn set_key(&mut self, u: &N, key: usize) {
        if let Some(old) = self.keys.get_mut(u) {
            self.entries.remove(&(*old, u.clone()));
            *old = key;
            self.entries.insert((key, u.clone()));
        }
    }

    fn remove(&mut self, u: &N) -> Option<usize> {
        let key = self.keys.remove(u)?;
        self.entries.remove(&(key, u.clone()));
        Some(key)
    }

    fn pop_min(&mut self) -> Option<(N, usize)> {
        let (key, u) = self.entries.pop_first()?;
        self.keys.remove(&u);
        Some((u, key))
    }

    fn pop_max(&mut self) -> Option<(N, usize)> {
        let max_key = self.entries.last()?.0;
        let entry = self
            .entries
            .iter()
            .rev()
            .take_while(|(k, _)| *k == max_key)
            .last()?
            .clone();
        self.entries.remove(&entry);
        self.keys.remove(&entry.1);
        Some((entry.1, entry.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    fn drain<Q: DegreeQueue<u32>>(mut q: Q, max: bool) -> Vec<(u32, usize)> {
        std::iter::from_fn(|| if max { q.pop_max() } else { q.pop_min() }).collect_vec()
    }

    #[test]
    fn ties_by_smallest_node() {
        let items = [(5u32, 2), (1, 2), (3, 0), (4, 7), (2, 7)];
        let expected_min = vec![(3, 0), (1, 2), (5, 2), (2, 7), (4, 7)];
        let expected_max = vec![(2, 7), (4, 7), (1, 2), (5, 2), (3, 0)];

        assert_eq!(drain(BucketQueue::from_keys(items), false), expected_min);
        assert_eq!(drain(OrderedQueue::from_keys(items), false), expected_min);
        assert_eq!(drain(BucketQueue::from_keys(items), true), expected_max);
        assert_eq!(drain(OrderedQueue::from_keys(items), true), expected_max);
    }

    #[test]
    fn implementations_agree() {
        let rng = &mut Pcg64Mcg::seed_from_u64(11);
        for _ in 0..20 {
            let items = (0..50u32).map(|u| (u, rng.random_range(0..10))).collect_vec();
            let mut bq = BucketQueue::from_keys(items.clone());
            let mut oq = OrderedQueue::from_keys(items);

            for _ in 0..100 {
                let u = rng.random_range(0..50u32);
                match rng.random_range(0..4) {
                    0 => {
                        bq.decrement(&u);
                        oq.decrement(&u);
                    }
                    1 => {
                        bq.increment(&u);
                        oq.increment(&u);
                    }
                    2 => assert_eq!(bq.pop_min(), oq.pop_min()),
                    _ => assert_eq!(bq.pop_max(), oq.pop_max()),
                }
                assert_eq!(bq.len(), oq.len());
            }
        }
    }
}
