/*!
# Transitive Closure

All strategies compute the same reflexive reachability relation `T`, stored as one bitset row
per node in index space:
- [`ClosureStrategy::Warshall`]: boolean Floyd–Warshall over the rows in `O(n^3 / w)`,
- [`ClosureStrategy::Bfs`] and [`ClosureStrategy::Dfs`]: one search per source in `O(n (n + m))`,
- [`ClosureStrategy::SuccessorSquaring`]: repeatedly replaces every row by the union of the rows
  of its members until nothing changes.
*/

use std::fmt::Debug;

use itertools::Itertools;
use num::One;
use tracing::{debug, trace};

use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClosureStrategy {
    #[default]
    Warshall,
    Bfs,
    Dfs,
    SuccessorSquaring,
}

/// Reflexive reachability relation of a graph
#[derive(Clone)]
pub struct Reachability<N> {
    indexer: Indexer<N>,
    rows: Vec<IndexBitSet>,
}

impl<N: NodeId> Reachability<N> {
    /// Returns *true* if `v` is reachable from `u`.
    /// Every node reaches itself; unknown nodes reach nothing.
    pub fn reaches(&self, u: &N, v: &N) -> bool {
        match (self.indexer.index_of(u), self.indexer.index_of(v)) {
            (Some(i), Some(j)) => self.rows[i].get_bit(j as NodeIndex),
            _ => false,
        }
    }

    /// Returns all nodes reachable from `u` (including `u`) in iteration order of the graph
    pub fn reachable_from(&self, u: &N) -> Vec<N> {
        let Some(i) = self.indexer.index_of(u) else {
            return Vec::new();
        };
        self.rows[i]
            .iter_set_bits()
            .map(|j| self.indexer.node(j as usize).clone())
            .collect()
    }

    /// Returns all pairs `(u, v)` with `u != v` and `v` reachable from `u`
    pub fn pairs(&self) -> Vec<(N, N)> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(i, row)| {
                row.iter_set_bits()
                    .filter(move |&j| j as usize != i)
                    .map(move |j| {
                        (
                            self.indexer.node(i).clone(),
                            self.indexer.node(j as usize).clone(),
                        )
                    })
            })
            .collect()
    }

    /// Number of pairs in the relation (the diagonal included)
    pub fn cardinality(&self) -> usize {
        self.rows.iter().map(|row| row.cardinality() as usize).sum()
    }

    /// Builds the closure as a directed graph (without the reflexive loops)
    pub fn to_graph<G>(&self) -> Result<G>
    where
        G: GraphEditing<Node = N>,
    {
        let mut graph = G::with_capacity(self.indexer.len(), true);
        graph.add_nodes(self.indexer.nodes().iter().cloned());
        for (u, v) in self.pairs() {
            graph.add_edge((u, v, G::Weight::one()))?;
        }
        Ok(graph)
    }

    fn row(&self, i: usize) -> Vec<NodeIndex> {
        self.rows[i].iter_set_bits().collect()
    }
}

impl<N: NodeId> PartialEq for Reachability<N> {
    fn eq(&self, other: &Self) -> bool {
        self.indexer.nodes() == other.indexer.nodes()
            && (0..self.rows.len()).all(|i| self.row(i) == other.row(i))
    }
}

impl<N: NodeId> Debug for Reachability<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.indexer
                    .nodes()
                    .iter()
                    .map(|u| (u, self.reachable_from(u))),
            )
            .finish()
    }
}

/// Computes the transitive closure of a directed or undirected graph
pub struct TransitiveClosure<'a, G> {
    graph: &'a G,
    strategy: ClosureStrategy,
}

impl<'a, G> TransitiveClosure<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            strategy: ClosureStrategy::default(),
        }
    }

    pub fn strategy(mut self, strategy: ClosureStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn run(&self) -> Reachability<G::Node> {
        debug!(
            n = self.graph.number_of_nodes(),
            strategy = ?self.strategy,
            "transitive closure"
        );

        let indexer = Indexer::new(self.graph);
        let adj = indexer.adjacency(self.graph);
        let rows = match self.strategy {
            ClosureStrategy::Warshall => warshall(&adj),
            ClosureStrategy::Bfs | ClosureStrategy::Dfs => {
                search_per_source(&adj, self.strategy == ClosureStrategy::Bfs)
            }
            ClosureStrategy::SuccessorSquaring => successor_squaring(&adj),
        };
        Reachability { indexer, rows }
    }
}

/// Rows containing the diagonal and the out-neighborhood of every node
fn initial_rows(adj: &[Vec<usize>]) -> Vec<IndexBitSet> {
    let n = adj.len() as NodeIndex;
    adj.iter()
        .enumerate()
        .map(|(i, nbs)| {
            let mut row = IndexBitSet::new(n);
            row.set_bit(i as NodeIndex);
            for &j in nbs {
                row.set_bit(j as NodeIndex);
            }
            row
        })
        .collect()
}

/// Adds every member of `rows[src]` to `rows[dst]`; returns *true* if `rows[dst]` grew
fn merge_row(rows: &mut [IndexBitSet], dst: usize, src: usize) -> bool {
    if dst == src {
        return false;
    }
    let members = rows[src].iter_set_bits().collect_vec();
    let mut grown = false;
    for j in members {
        grown |= !rows[dst].set_bit(j);
    }
    grown
}

fn warshall(adj: &[Vec<usize>]) -> Vec<IndexBitSet> {
    let mut rows = initial_rows(adj);
    for k in 0..rows.len() {
        for i in 0..rows.len() {
            if rows[i].get_bit(k as NodeIndex) {
                merge_row(&mut rows, i, k);
            }
        }
    }
    rows
}

fn search_per_source(adj: &[Vec<usize>], breadth_first: bool) -> Vec<IndexBitSet> {
    let n = adj.len();
    (0..n)
        .map(|s| {
            let mut row = IndexBitSet::new(n as NodeIndex);
            row.set_bit(s as NodeIndex);
            let mut frontier = std::collections::VecDeque::from([s]);
            while let Some(u) = if breadth_first {
                frontier.pop_front()
            } else {
                frontier.pop_back()
            } {
                for &v in &adj[u] {
                    if !row.set_bit(v as NodeIndex) {
                        frontier.push_back(v);
                    }
                }
            }
            row
        })
        .collect()
}

fn successor_squaring(adj: &[Vec<usize>]) -> Vec<IndexBitSet> {
    let mut rows = initial_rows(adj);
    let mut round = 0;
    loop {
        round += 1;
        let mut changed = false;
        for i in 0..rows.len() {
            let members = rows[i].iter_set_bits().collect_vec();
            for j in members {
                changed |= merge_row(&mut rows, i, j as usize);
            }
        }
        trace!(round, changed, "successor squaring");
        if !changed {
            return rows;
        }
    }
}

/// Transitive closure directly on graphs
pub trait TransitiveClosureExt: AdjacencyList + Sized {
    fn transitive_closure(&self) -> Reachability<Self::Node> {
        TransitiveClosure::new(self).run()
    }
}

impl<G> TransitiveClosureExt for G where G: AdjacencyList + Sized {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gens::GraphFactory;

    const STRATEGIES: [ClosureStrategy; 4] = [
        ClosureStrategy::Warshall,
        ClosureStrategy::Bfs,
        ClosureStrategy::Dfs,
        ClosureStrategy::SuccessorSquaring,
    ];

    #[test]
    fn chain_with_cycle() {
        let g: AdjMap<Node> = AdjMap::from_edges(true, [(0, 1), (1, 2), (2, 1), (3, 0)]).unwrap();
        let t = g.transitive_closure();

        assert_eq!(t.reachable_from(&0), vec![0, 1, 2]);
        assert_eq!(t.reachable_from(&1), vec![1, 2]);
        assert_eq!(t.reachable_from(&3), vec![0, 1, 2, 3]);
        assert!(t.reaches(&2, &1));
        assert!(!t.reaches(&2, &0));
        assert!(!t.reaches(&0, &7));
        assert_eq!(t.cardinality(), 3 + 2 + 2 + 4);

        let closed: AdjMap<Node> = t.to_graph().unwrap();
        assert_eq!(closed.number_of_edges(), t.pairs().len());
        assert!(closed.has_edge(&3, &2));
    }

    #[test]
    fn strategies_agree() {
        for directed in [false, true] {
            let mut factory = GraphFactory::with_seed(13).directed(directed);
            for _ in 0..10 {
                let g: AdjMap<Node> = factory.sparse(20, 25).unwrap();
                let reference = TransitiveClosure::new(&g).run();

                for strategy in STRATEGIES {
                    let t = TransitiveClosure::new(&g).strategy(strategy).run();
                    assert_eq!(t, reference);
                }

                // reflexive and transitive
                for u in g.vertices() {
                    assert!(reference.reaches(&u, &u));
                    for v in reference.reachable_from(&u) {
                        for w in reference.reachable_from(&v) {
                            assert!(reference.reaches(&u, &w));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn undirected_closure_is_component_relation() {
        let g: AdjMap<Node> = AdjMap::from_edges(false, [(0, 1), (1, 2), (5, 6)]).unwrap();
        let t = TransitiveClosure::new(&g)
            .strategy(ClosureStrategy::SuccessorSquaring)
            .run();
        assert_eq!(t.reachable_from(&2), vec![0, 1, 2]);
        assert_eq!(t.reachable_from(&6), vec![5, 6]);
    }
}
