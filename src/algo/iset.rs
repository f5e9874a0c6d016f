/*!
# Independent Set Heuristics

An *independent set* is a set of pairwise non-adjacent nodes. All strategies of
[`IndependentSetSearch`] return **maximal** independent sets of undirected graphs: every node
outside the set has a neighbor inside. They differ in the order in which candidates are offered:

| Strategy | Order |
|---|---|
| [`IndependentSetStrategy::Unordered`] | node iteration order |
| [`IndependentSetStrategy::Random`] | seeded shuffle |
| [`IndependentSetStrategy::SmallestFirst`] | minimum degree in the remaining graph; the chosen node and its neighbors are deleted |
| [`IndependentSetStrategy::LargestLast`] | nondecreasing degree in the input graph |
| [`IndependentSetStrategy::LargestLastDynamic`] | nodes of maximum degree in the remaining graph are deleted until no edge is left |
| [`IndependentSetStrategy::LargestFirst`] | nonincreasing degree in the input graph |

Strategies that maintain degrees dynamically are generic over the [`DegreeQueue`] used.
*/

use std::collections::BTreeSet;

use itertools::Itertools;
use rand::{SeedableRng, seq::SliceRandom};
use rand_pcg::Pcg64Mcg;
use tracing::{debug, trace};

use super::*;
use crate::gens::DEFAULT_SEED;

/// An independent set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndependentSet<N> {
    pub independent_set: BTreeSet<N>,
    pub cardinality: usize,
}

impl<N: NodeId> IndependentSet<N> {
    pub fn new(independent_set: BTreeSet<N>) -> Self {
        let cardinality = independent_set.len();
        Self {
            independent_set,
            cardinality,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndependentSetStrategy {
    #[default]
    Unordered,
    Random,
    SmallestFirst,
    LargestLast,
    LargestLastDynamic,
    LargestFirst,
}

/// Heuristic maximal independent set of an undirected graph
pub struct IndependentSetSearch<'a, G> {
    graph: &'a G,
    strategy: IndependentSetStrategy,
    seed: u64,
}

impl<'a, G> IndependentSetSearch<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            strategy: IndependentSetStrategy::default(),
            seed: DEFAULT_SEED,
        }
    }

    pub fn strategy(mut self, strategy: IndependentSetStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Seed of [`IndependentSetStrategy::Random`]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Fails with [`GraphError::DirectedMisuse`] for directed graphs
    pub fn run(&self) -> Result<IndependentSet<G::Node>> {
        self.run_with::<BucketQueue<G::Node>>()
    }

    /// As [`IndependentSetSearch::run`] with an explicit degree queue for the dynamic strategies
    pub fn run_with<Q: DegreeQueue<G::Node>>(&self) -> Result<IndependentSet<G::Node>> {
        self.graph.require_undirected()?;
        debug!(
            n = self.graph.number_of_nodes(),
            strategy = ?self.strategy,
            "independent set"
        );

        let degree_order = || {
            self.graph
                .vertices()
                .sorted_by_key(|u| self.graph.out_degree_of(u))
                .collect_vec()
        };

        let set = match self.strategy {
            IndependentSetStrategy::Unordered => self.greedy(self.graph.vertices()),
            IndependentSetStrategy::Random => {
                let mut order = self.graph.vertices().collect_vec();
                order.shuffle(&mut Pcg64Mcg::seed_from_u64(self.seed));
                self.greedy(order)
            }
            IndependentSetStrategy::LargestLast => self.greedy(degree_order()),
            IndependentSetStrategy::LargestFirst => self.greedy(degree_order().into_iter().rev()),
            IndependentSetStrategy::SmallestFirst => self.smallest_first::<Q>(),
            IndependentSetStrategy::LargestLastDynamic => self.largest_last_dynamic::<Q>(),
        };

        Ok(IndependentSet::new(set))
    }

    fn degree_queue<Q: DegreeQueue<G::Node>>(&self) -> Q {
        Q::from_keys(self.graph.vertices().map(|u| {
            let degree = self.graph.out_degree_of(&u);
            (u, degree)
        }))
    }

    /// Adds every candidate without a neighbor in the set
    fn greedy(&self, candidates: impl IntoIterator<Item = G::Node>) -> BTreeSet<G::Node> {
        let mut set = BTreeSet::new();
        for u in candidates {
            if !self.graph.neighbors_of(&u).any(|v| set.contains(&v)) {
                set.insert(u);
            }
        }
        set
    }

    fn smallest_first<Q: DegreeQueue<G::Node>>(&self) -> BTreeSet<G::Node> {
        let mut queue: Q = self.degree_queue();
        let mut set = BTreeSet::new();

        while let Some((u, degree)) = queue.pop_min() {
            trace!(?u, degree, "take node of minimum degree");
            let removed = self
                .graph
                .neighbors_of(&u)
                .filter(|v| queue.remove(v).is_some())
                .collect_vec();
            for v in removed {
                for w in self.graph.neighbors_of(&v) {
                    queue.decrement(&w);
                }
            }
            set.insert(u);
        }
        set
    }

    fn largest_last_dynamic<Q: DegreeQueue<G::Node>>(&self) -> BTreeSet<G::Node> {
        let mut queue: Q = self.degree_queue();
        let mut removed = Vec::new();

        while let Some((u, degree)) = queue.pop_max() {
            if degree == 0 {
                // the remaining graph is edgeless
                removed.push(u);
                break;
            }
            for v in self.graph.neighbors_of(&u) {
                queue.decrement(&v);
            }
            removed.push(u);
        }

        let mut remaining = BTreeSet::new();
        while let Some((u, _)) = queue.pop_min() {
            remaining.insert(u);
        }
        trace!(deleted = removed.len(), kept = remaining.len(), "peeled");
        self.greedy(remaining.into_iter().chain(removed.into_iter().rev()))
    }
}

/// Independent sets directly on graphs
pub trait IndependentSets: AdjacencyList + Sized {
    /// Returns *true* if no two nodes of `set` are adjacent
    fn is_independent_set(&self, set: &BTreeSet<Self::Node>) -> bool {
        set.iter()
            .all(|u| self.neighbors_of(u).all(|v| !set.contains(&v)))
    }

    /// Maximal independent set in node iteration order
    fn maximal_independent_set(&self) -> Result<IndependentSet<Self::Node>> {
        IndependentSetSearch::new(self).run()
    }
}

impl<G> IndependentSets for G where G: AdjacencyList + Sized {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gens::*;

    const STRATEGIES: [IndependentSetStrategy; 6] = [
        IndependentSetStrategy::Unordered,
        IndependentSetStrategy::Random,
        IndependentSetStrategy::SmallestFirst,
        IndependentSetStrategy::LargestLast,
        IndependentSetStrategy::LargestLastDynamic,
        IndependentSetStrategy::LargestFirst,
    ];

    fn is_maximal(g: &AdjMap<Node>, set: &BTreeSet<Node>) -> bool {
        g.vertices()
            .all(|u| set.contains(&u) || g.neighbors_of(&u).any(|v| set.contains(&v)))
    }

    #[test]
    fn star() {
        let g: AdjMap<Node> = AdjMap::from_edges(false, [(0, 1), (0, 2), (0, 3), (0, 4)]).unwrap();

        let unordered = g.maximal_independent_set().unwrap();
        assert_eq!(unordered.independent_set, BTreeSet::from([0]));
        assert_eq!(unordered.cardinality, 1);

        for strategy in [
            IndependentSetStrategy::SmallestFirst,
            IndependentSetStrategy::LargestLast,
            IndependentSetStrategy::LargestLastDynamic,
        ] {
            let set = IndependentSetSearch::new(&g)
                .strategy(strategy)
                .run()
                .unwrap();
            assert_eq!(set.independent_set, BTreeSet::from([1, 2, 3, 4]));
        }
    }

    #[test]
    fn sets_are_maximal_on_random_graphs() {
        let mut factory = GraphFactory::with_seed(67);
        for _ in 0..10 {
            let g: AdjMap<Node> = factory.sparse(30, 50).unwrap();
            for strategy in STRATEGIES {
                let search = IndependentSetSearch::new(&g).strategy(strategy).seed(3);
                let set = search.run().unwrap();
                assert!(g.is_independent_set(&set.independent_set));
                assert!(is_maximal(&g, &set.independent_set));
                assert_eq!(search.run().unwrap(), set);
                assert_eq!(search.run_with::<OrderedQueue<Node>>().unwrap(), set);
            }
        }
    }

    #[test]
    fn cycle_and_complete_graph() {
        let mut factory = GraphFactory::with_seed(1);
        let c: AdjMap<Node> = factory.cycle(8).unwrap();
        let k: AdjMap<Node> = factory.complete(6).unwrap();
        for strategy in STRATEGIES {
            let search =
                |g: &AdjMap<Node>| IndependentSetSearch::new(g).strategy(strategy).run().unwrap();
            assert!(search(&c).cardinality >= 3);
            assert_eq!(search(&k).cardinality, 1);
        }
        assert_eq!(
            c.maximal_independent_set().unwrap().independent_set,
            BTreeSet::from([0, 2, 4, 6])
        );
    }
}
