/*!
# Interval Graphs

An interval graph is the intersection graph of intervals on a line. We encode `n` intervals by a
*double permutation*: a sequence of length `2n` in which every label of `0..n` appears twice, the
first occurrence marking the start and the second one the end of the interval.

All solvers below sweep the sequence once, keeping the set of *active* intervals (started but not
yet ended), which pairwise overlap.

```
use graphtheory::{prelude::*, classes::interval::*};

// a path on six intervals
let repr = IntervalRepresentation::new(vec![0, 1, 0, 2, 1, 3, 2, 4, 3, 5, 4, 5]).unwrap();
assert_eq!(repr.maximum_independent_set().cardinality, 3);
assert_eq!(repr.minimum_dominating_set().cardinality, 2);

let g: AdjMap<Node> = repr.to_graph().unwrap();
assert_eq!(g.number_of_edges(), 5);
```
*/

use std::{
    cmp::Reverse,
    collections::{BTreeMap, BTreeSet, BinaryHeap},
};

use tracing::{debug, trace};

use super::*;

/// Event of the sweep over a double permutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Start(Node),
    End(Node),
}

/// Validated double permutation of interval endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalRepresentation {
    sequence: Vec<Node>,
    /// `(start, end)` position of every interval
    endpoints: Vec<(usize, usize)>,
}

impl IntervalRepresentation {
    /// Fails with [`GraphError::InvalidRepresentation`] unless `sequence` contains every label of
    /// `0..sequence.len() / 2` exactly twice
    pub fn new(sequence: Vec<Node>) -> Result<Self> {
        let endpoints = double_permutation_endpoints(&sequence)?;
        Ok(Self {
            sequence,
            endpoints,
        })
    }

    pub fn sequence(&self) -> &[Node] {
        &self.sequence
    }

    pub fn number_of_intervals(&self) -> usize {
        self.endpoints.len()
    }

    /// Start and end position of interval `u`
    pub fn interval(&self, u: Node) -> Option<(usize, usize)> {
        self.endpoints.get(u as usize).copied()
    }

    /// Returns *true* if the distinct intervals `u` and `v` overlap
    pub fn are_adjacent(&self, u: Node, v: Node) -> bool {
        match (self.interval(u), self.interval(v)) {
            (Some((su, eu)), Some((sv, ev))) => u != v && su < ev && sv < eu,
            _ => false,
        }
    }

    fn events(&self) -> impl Iterator<Item = Event> + '_ {
        self.sequence.iter().enumerate().map(|(i, &u)| {
            if self.endpoints[u as usize].0 == i {
                Event::Start(u)
            } else {
                Event::End(u)
            }
        })
    }

    /// Builds the intersection graph: every starting interval is adjacent to all active ones
    pub fn to_graph<G>(&self) -> Result<G>
    where
        G: GraphEditing<Node = Node>,
    {
        let n = self.number_of_intervals();
        let mut graph = G::with_capacity(n, false);
        graph.add_nodes(0..n as Node);

        let mut active = BTreeSet::new();
        for event in self.events() {
            match event {
                Event::Start(u) => {
                    for &v in &active {
                        graph.add_edge((v, u))?;
                    }
                    active.insert(u);
                }
                Event::End(u) => {
                    active.remove(&u);
                }
            }
        }
        Ok(graph)
    }

    /// Optimal coloring: a starting interval takes the least free color, an ending one frees its
    /// color again
    pub fn coloring(&self) -> Coloring<Node> {
        let mut free = BinaryHeap::new();
        let mut colors = 0;
        let mut color = BTreeMap::new();

        for event in self.events() {
            match event {
                Event::Start(u) => {
                    let c = match free.pop() {
                        Some(Reverse(c)) => c,
                        None => {
                            colors += 1;
                            colors - 1
                        }
                    };
                    color.insert(u, c);
                }
                Event::End(u) => {
                    if let Some(&c) = color.get(&u) {
                        free.push(Reverse(c));
                    }
                }
            }
        }
        Coloring { color, colors }
    }

    /// Maximum independent set: the first interval to end joins the set and all intervals
    /// overlapping it are discarded
    pub fn maximum_independent_set(&self) -> IndependentSet<Node> {
        let mut active = BTreeSet::new();
        let mut set = BTreeSet::new();
        for event in self.events() {
            match event {
                Event::Start(u) => {
                    active.insert(u);
                }
                Event::End(u) => {
                    if active.contains(&u) {
                        trace!(u, discarded = active.len() - 1, "interval taken");
                        set.insert(u);
                        active.clear();
                    }
                }
            }
        }
        IndependentSet::new(set)
    }

    /// Greedy domination: when an undominated interval ends, the active interval reaching
    /// furthest right joins the dominating set. The undominated intervals at these moments are
    /// pairwise at distance at least three.
    fn domination(&self) -> (BTreeSet<Node>, BTreeSet<Node>) {
        debug!(n = self.number_of_intervals(), "interval domination");
        let mut dominated = vec![false; self.number_of_intervals()];
        let mut active: BTreeSet<(usize, Node)> = BTreeSet::new();
        let mut reach = 0;
        let mut dominating_set = BTreeSet::new();
        let mut stable_set = BTreeSet::new();

        for (i, event) in self.events().enumerate() {
            match event {
                Event::Start(u) => {
                    let end = self.endpoints[u as usize].1;
                    if i < reach {
                        dominated[u as usize] = true;
                    }
                    active.insert((end, u));
                }
                Event::End(u) => {
                    if !dominated[u as usize] {
                        // `u` itself is still active
                        if let Some(&(end, w)) = active.last() {
                            for &(_, v) in &active {
                                dominated[v as usize] = true;
                            }
                            reach = reach.max(end);
                            dominating_set.insert(w);
                            stable_set.insert(u);
                        }
                    }
                    active.remove(&(i, u));
                }
            }
        }
        (dominating_set, stable_set)
    }

    /// Minimum dominating set
    pub fn minimum_dominating_set(&self) -> DominatingSet<Node> {
        DominatingSet::new(self.domination().0)
    }

    /// Intervals with pairwise disjoint closed neighborhoods, as many as the minimum dominating
    /// set has members; certifies its optimality
    pub fn two_stable_set(&self) -> BTreeSet<Node> {
        self.domination().1
    }

    /// Maximum clique: the largest set of simultaneously active intervals
    pub fn maximum_clique(&self) -> BTreeSet<Node> {
        let mut active = BTreeSet::new();
        let mut best = BTreeSet::new();
        for event in self.events() {
            match event {
                Event::Start(u) => {
                    active.insert(u);
                    if active.len() > best.len() {
                        best = active.clone();
                    }
                }
                Event::End(u) => {
                    active.remove(&u);
                }
            }
        }
        best
    }
}

/// Builds the interval graph of a double permutation.
/// Fails with [`GraphError::InvalidRepresentation`] for malformed sequences.
pub fn make_abstract_interval_graph<G>(sequence: &[Node]) -> Result<G>
where
    G: GraphEditing<Node = Node>,
{
    IntervalRepresentation::new(sequence.to_vec())?.to_graph()
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::{classes::chordal::PeoSearch, gens::*, testing::random_double_permutation};

    const PATH: [Node; 12] = [0, 1, 0, 2, 1, 3, 2, 4, 3, 5, 4, 5];

    #[test]
    fn path_of_six_intervals() {
        let repr = IntervalRepresentation::new(PATH.to_vec()).unwrap();
        assert_eq!(repr.number_of_intervals(), 6);
        assert_eq!(repr.interval(2), Some((3, 6)));
        assert!(repr.are_adjacent(1, 2));
        assert!(!repr.are_adjacent(0, 2));
        assert!(!repr.are_adjacent(3, 3));

        let iset = repr.maximum_independent_set();
        assert_eq!(iset.independent_set, BTreeSet::from([0, 2, 4]));
        assert_eq!(iset.cardinality, 3);

        assert_eq!(
            repr.minimum_dominating_set().dominating_set,
            BTreeSet::from([1, 4])
        );
        assert_eq!(repr.two_stable_set(), BTreeSet::from([0, 3]));
        assert_eq!(repr.maximum_clique().len(), 2);
        assert_eq!(repr.coloring().colors, 2);

        let g: AdjMap<Node> = make_abstract_interval_graph(&PATH).unwrap();
        let mut path: AdjMap<Node> = AdjMap::undirected();
        path.connect_path(0..6).unwrap();
        assert!(g.is_equal_to(&path));
    }

    #[test]
    fn malformed_sequences_are_rejected() {
        for sequence in [vec![0, 1, 0], vec![0, 0, 1, 2], vec![0, 0, 0, 1], vec![1, 1]] {
            assert!(matches!(
                IntervalRepresentation::new(sequence),
                Err(GraphError::InvalidRepresentation { .. })
            ));
        }
        let empty = IntervalRepresentation::new(Vec::new()).unwrap();
        assert_eq!(empty.maximum_independent_set().cardinality, 0);
        assert!(empty.maximum_clique().is_empty());
    }

    #[test]
    fn graph_matches_the_overlap_rule() {
        let rng = &mut Pcg64Mcg::seed_from_u64(101);
        for n in [1, 5, 12, 20] {
            let repr = IntervalRepresentation::new(random_double_permutation(rng, n)).unwrap();
            let g: AdjMap<Node> = repr.to_graph().unwrap();
            assert_eq!(g.number_of_nodes(), n);
            for (u, v) in (0..n as Node).tuple_combinations() {
                assert_eq!(g.has_edge(&u, &v), repr.are_adjacent(u, v));
            }
        }
    }

    #[test]
    fn sweeps_are_optimal() {
        let rng = &mut Pcg64Mcg::seed_from_u64(103);
        for _ in 0..10 {
            let repr = IntervalRepresentation::new(random_double_permutation(rng, 10)).unwrap();
            let g: AdjMap<Node> = repr.to_graph().unwrap();
            let peo = PeoSearch::new(&g).run().unwrap();

            let coloring = repr.coloring();
            assert!(g.is_proper_coloring(&coloring.color));
            assert_eq!(coloring.colors, repr.maximum_clique().len());
            assert_eq!(coloring.colors, peo.maximum_clique().len());

            let iset = repr.maximum_independent_set();
            assert!(g.is_independent_set(&iset.independent_set));
            assert_eq!(
                iset.cardinality,
                peo.maximum_independent_set().cardinality
            );

            let dset = repr.minimum_dominating_set();
            assert!(g.is_dominating_set(&dset.dominating_set));
            assert_eq!(dset.cardinality, g.minimum_dominating_set().unwrap().cardinality);

            let stable = repr.two_stable_set();
            assert_eq!(stable.len(), dset.cardinality);
            for (u, v) in stable.iter().tuple_combinations() {
                let nu: BTreeSet<Node> = g.closed_neighbors_of(u).collect();
                assert!(g.closed_neighbors_of(v).all(|w| !nu.contains(&w)));
            }
        }
    }
}
