/*!
# Dominating Sets

A *dominating set* is a set of nodes such that every node is in the set or adjacent to a node
in the set. [`DominatingSetSearch`] offers

- greedy heuristics: candidates are scanned in node order ([`DominatingSetStrategy::Unordered`]),
  shuffled ([`DominatingSetStrategy::Random`]) or by nonincreasing degree
  ([`DominatingSetStrategy::LargestFirst`]); whenever a candidate is not yet dominated, the node of its
  closed neighborhood dominating the most undominated nodes joins the set,
- an exact branch-and-bound search ([`DominatingSetStrategy::Backtracking`]) that branches on the
  closed neighborhood of the first undominated node,
- the same search seeded with the largest-first solution as initial bound
  ([`DominatingSetStrategy::Hybrid`]).
*/

use std::collections::BTreeSet;

use itertools::Itertools;
use rand::{SeedableRng, seq::SliceRandom};
use rand_pcg::Pcg64Mcg;
use tracing::{debug, trace};

use super::*;
use crate::gens::DEFAULT_SEED;

/// A dominating set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DominatingSet<N> {
    pub dominating_set: BTreeSet<N>,
    pub cardinality: usize,
}

impl<N: NodeId> DominatingSet<N> {
    pub fn new(dominating_set: BTreeSet<N>) -> Self {
        let cardinality = dominating_set.len();
        Self {
            dominating_set,
            cardinality,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DominatingSetStrategy {
    #[default]
    Unordered,
    Random,
    LargestFirst,
    Backtracking,
    Hybrid,
}

/// Small or minimum dominating set of an undirected graph
pub struct DominatingSetSearch<'a, G> {
    graph: &'a G,
    strategy: DominatingSetStrategy,
    seed: u64,
}

impl<'a, G> DominatingSetSearch<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            strategy: DominatingSetStrategy::default(),
            seed: DEFAULT_SEED,
        }
    }

    pub fn strategy(mut self, strategy: DominatingSetStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Seed of [`DominatingSetStrategy::Random`]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Fails with [`GraphError::DirectedMisuse`] for directed graphs
    pub fn run(&self) -> Result<DominatingSet<G::Node>> {
        self.graph.require_undirected()?;
        debug!(
            n = self.graph.number_of_nodes(),
            m = self.graph.number_of_edges(),
            strategy = ?self.strategy,
            "dominating set"
        );

        let indexer = Indexer::new(self.graph);
        let closed = closed_neighborhoods(indexer.adjacency(self.graph));
        let n = closed.len();
        let largest_first = || {
            (0..n)
                .sorted_by_key(|&u| std::cmp::Reverse(closed[u].len()))
                .collect_vec()
        };

        let set = match self.strategy {
            DominatingSetStrategy::Unordered => greedy(&closed, 0..n),
            DominatingSetStrategy::Random => {
                let mut order = (0..n).collect_vec();
                order.shuffle(&mut Pcg64Mcg::seed_from_u64(self.seed));
                greedy(&closed, order)
            }
            DominatingSetStrategy::LargestFirst => greedy(&closed, largest_first()),
            DominatingSetStrategy::Backtracking => BranchAndBound::new(&closed, (0..n).collect()).solve(),
            DominatingSetStrategy::Hybrid => {
                let initial = greedy(&closed, largest_first());
                BranchAndBound::new(&closed, initial).solve()
            }
        };

        Ok(DominatingSet::new(indexer.nodes_of(&set).into_iter().collect()))
    }
}

/// `N[u]` with `u` first, followed by its neighbors in increasing order
fn closed_neighborhoods(adj: Vec<Vec<usize>>) -> Vec<Vec<usize>> {
    adj.into_iter()
        .enumerate()
        .map(|(u, nbs)| std::iter::once(u).chain(nbs).collect())
        .collect()
}

fn greedy(closed: &[Vec<usize>], order: impl IntoIterator<Item = usize>) -> Vec<usize> {
    let mut dominated = vec![false; closed.len()];
    let mut set = Vec::new();

    for u in order {
        if dominated[u] {
            continue;
        }
        let gain = |v: usize| closed[v].iter().filter(|&&w| !dominated[w]).count();
        // `max_by_key` keeps the last maximum; reversing keeps `u` and then the smallest neighbor
        let Some(best) = closed[u].iter().rev().copied().max_by_key(|&v| gain(v)) else {
            continue;
        };
        for &w in &closed[best] {
            dominated[w] = true;
        }
        set.push(best);
    }
    set
}

/// Exact search for a minimum dominating set in index space
struct BranchAndBound<'a> {
    closed: &'a [Vec<usize>],
    dominators: Vec<usize>,
    chosen: Vec<usize>,
    best: Vec<usize>,
    max_closed: usize,
    branches: usize,
}

impl<'a> BranchAndBound<'a> {
    fn new(closed: &'a [Vec<usize>], initial: Vec<usize>) -> Self {
        Self {
            closed,
            dominators: vec![0; closed.len()],
            chosen: Vec::new(),
            best: initial,
            max_closed: closed.iter().map(Vec::len).max().unwrap_or(1),
            branches: 0,
        }
    }

    fn solve(mut self) -> Vec<usize> {
        self.branch();
        trace!(branches = self.branches, size = self.best.len(), "search finished");
        self.best
    }

    fn gain(&self, v: usize) -> usize {
        self.closed[v]
            .iter()
            .filter(|&&w| self.dominators[w] == 0)
            .count()
    }

    fn branch(&mut self) {
        self.branches += 1;
        let undominated = self.dominators.iter().filter(|&&d| d == 0).count();
        let Some(u) = self.dominators.iter().position(|&d| d == 0) else {
            if self.chosen.len() < self.best.len() {
                self.best = self.chosen.clone();
            }
            return;
        };

        let lower_bound = self.chosen.len() + undominated.div_ceil(self.max_closed);
        if lower_bound >= self.best.len() {
            return;
        }

        let candidates = self.closed[u]
            .iter()
            .copied()
            .sorted_by_key(|&v| std::cmp::Reverse(self.gain(v)))
            .collect_vec();
        for v in candidates {
            self.chosen.push(v);
            for &w in &self.closed[v] {
                self.dominators[w] += 1;
            }
            self.branch();
            for &w in &self.closed[v] {
                self.dominators[w] -= 1;
            }
            self.chosen.pop();
        }
    }
}

/// Dominating sets directly on graphs
pub trait DominatingSets: AdjacencyList + Sized {
    /// Returns *true* if every node is in `set` or has a neighbor in `set`
    fn is_dominating_set(&self, set: &BTreeSet<Self::Node>) -> bool {
        self.vertices()
            .all(|u| set.contains(&u) || self.neighbors_of(&u).any(|v| set.contains(&v)))
    }

    /// Greedy dominating set in node order
    fn dominating_set(&self) -> Result<DominatingSet<Self::Node>> {
        DominatingSetSearch::new(self).run()
    }

    /// Dominating set of minimum cardinality; exponential in the worst case
    fn minimum_dominating_set(&self) -> Result<DominatingSet<Self::Node>> {
        DominatingSetSearch::new(self)
            .strategy(DominatingSetStrategy::Hybrid)
            .run()
    }
}

impl<G> DominatingSets for G where G: AdjacencyList + Sized {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gens::*;

    const HEURISTICS: [DominatingSetStrategy; 3] = [
        DominatingSetStrategy::Unordered,
        DominatingSetStrategy::Random,
        DominatingSetStrategy::LargestFirst,
    ];

    fn brute_force_minimum(g: &AdjMap<Node>) -> usize {
        let nodes = g.vertices().collect_vec();
        (0..=nodes.len())
            .find(|&k| {
                nodes
                    .iter()
                    .copied()
                    .combinations(k)
                    .any(|c| g.is_dominating_set(&c.into_iter().collect()))
            })
            .unwrap()
    }

    #[test]
    fn star_and_path() {
        let star: AdjMap<Node> =
            AdjMap::from_edges(false, [(0, 1), (0, 2), (0, 3), (0, 4)]).unwrap();
        assert_eq!(
            star.dominating_set().unwrap().dominating_set,
            BTreeSet::from([0])
        );

        let mut path: AdjMap<Node> = AdjMap::undirected();
        path.connect_path(0..5).unwrap();
        let set = path.dominating_set().unwrap();
        assert_eq!(set.dominating_set, BTreeSet::from([1, 3]));
        assert_eq!(set.cardinality, 2);
        assert_eq!(path.minimum_dominating_set().unwrap().cardinality, 2);
    }

    #[test]
    fn exact_strategies_are_minimum() {
        let mut factory = GraphFactory::with_seed(71);
        for _ in 0..8 {
            let g: AdjMap<Node> = factory.sparse(10, 12).unwrap();
            let minimum = brute_force_minimum(&g);
            for strategy in [
                DominatingSetStrategy::Backtracking,
                DominatingSetStrategy::Hybrid,
            ] {
                let set = DominatingSetSearch::new(&g)
                    .strategy(strategy)
                    .run()
                    .unwrap();
                assert!(g.is_dominating_set(&set.dominating_set));
                assert_eq!(set.cardinality, minimum);
            }
            for strategy in HEURISTICS {
                let set = DominatingSetSearch::new(&g)
                    .strategy(strategy)
                    .run()
                    .unwrap();
                assert!(g.is_dominating_set(&set.dominating_set));
                assert!(set.cardinality >= minimum);
            }
        }
    }

    #[test]
    fn isolated_nodes_and_directed_graphs() {
        let g: AdjMap<Node> = AdjMap::from_nodes_and_edges(false, 0..4, [(0, 1)]).unwrap();
        assert_eq!(
            g.minimum_dominating_set().unwrap().dominating_set,
            BTreeSet::from([0, 2, 3])
        );

        let g: AdjMap<Node> = AdjMap::from_edges(true, [(0, 1)]).unwrap();
        assert_eq!(g.dominating_set(), Err(GraphError::DirectedMisuse));
    }
}
