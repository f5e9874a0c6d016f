/*!
# Bipartite Graph Algorithms

Functionality includes:
- Computing a two-coloring of an undirected graph by BFS or DFS (fails with
  [`GraphError::NotBipartite`] if some edge joins two nodes of equal color)
- Testing whether a graph is bipartite
- Checking whether a candidate node set is one side of a valid bipartition
*/

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::{traversal::*, *};

/// Search used to propagate colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStrategy {
    #[default]
    Bfs,
    Dfs,
}

/// A two-coloring of the node set.
///
/// - Nodes of color `0` are considered to be on the **left** side
/// - Nodes of color `1` are considered to be on the **right** side
///
/// The first node of every component (in iteration order) is on the left side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bipartition<N> {
    pub color: BTreeMap<N, u8>,
}

impl<N: NodeId> Bipartition<N> {
    /// Returns `true` if the node is on the left (0) side of the partition.
    pub fn is_on_left_side(&self, u: &N) -> bool {
        self.color.get(u) == Some(&0)
    }

    /// Returns `true` if the node is on the right (1) side of the partition.
    pub fn is_on_right_side(&self, u: &N) -> bool {
        self.color.get(u) == Some(&1)
    }

    /// Nodes of color `0`
    pub fn left(&self) -> BTreeSet<N> {
        self.side(0)
    }

    /// Nodes of color `1`
    pub fn right(&self) -> BTreeSet<N> {
        self.side(1)
    }

    fn side(&self, color: u8) -> BTreeSet<N> {
        self.color
            .iter()
            .filter(|&(_, &c)| c == color)
            .map(|(u, _)| u.clone())
            .collect()
    }
}

/// Two-coloring of an undirected graph
pub struct Bipartite<'a, G> {
    graph: &'a G,
    strategy: SearchStrategy,
}

impl<'a, G> Bipartite<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            strategy: SearchStrategy::default(),
        }
    }

    /// Sets the search that propagates colors
    pub fn strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Fails with [`GraphError::DirectedMisuse`] for directed graphs and with
    /// [`GraphError::NotBipartite`] if the graph contains an odd cycle
    pub fn run(&self) -> Result<Bipartition<G::Node>> {
        self.graph.require_undirected()?;
        debug!(
            n = self.graph.number_of_nodes(),
            strategy = ?self.strategy,
            "two-coloring"
        );

        let Some(start) = self.graph.vertices().next() else {
            return Ok(Bipartition {
                color: BTreeMap::new(),
            });
        };
        let bipartition = match self.strategy {
            SearchStrategy::Bfs => propose_possibly_illegal_bipartition(self.graph.bfs(&start)),
            SearchStrategy::Dfs => propose_possibly_illegal_bipartition(self.graph.dfs(&start)),
        };

        ensure!(
            self.graph.is_bipartition(&bipartition.right()),
            GraphError::NotBipartite
        );
        Ok(bipartition)
    }
}

/// Colors every node opposite to its predecessor in the search forest.
///
/// - If the graph is bipartite, the returned partition is valid
/// - If the graph is not bipartite, the returned partition may be invalid
fn propose_possibly_illegal_bipartition<G, S>(
    mut search: TraversalSearch<'_, G, S>,
) -> Bipartition<G::Node>
where
    G: AdjacencyList,
    S: NodeSequencer<PredecessorOfNode<G::Node>>,
{
    let mut color = BTreeMap::new();
    loop {
        for (pred, node) in search.by_ref() {
            let c = pred.and_then(|p| color.get(&p).map(|c| 1 - c)).unwrap_or(0);
            color.insert(node, c);
        }

        if !search.try_restart_at_unvisited() {
            break;
        }
    }
    Bipartition { color }
}

/// A trait for testing and computing bipartitions in graphs.
pub trait BipartiteTest: AdjacencyList + Sized {
    /// Tests whether the given node set and its complement form a valid bipartition,
    /// i.e. every edge has exactly one endpoint in `right`.
    ///
    /// # Examples
    /// ```
    /// use std::collections::BTreeSet;
    /// use graphtheory::{prelude::*, algo::*, gens::*};
    ///
    /// let mut g: AdjMap<Node> = AdjMap::undirected();
    /// g.connect_path(0..10).unwrap();
    ///
    /// assert!(g.is_bipartition(&BTreeSet::from([0, 2, 4, 6, 8])));
    /// ```
    fn is_bipartition(&self, right: &BTreeSet<Self::Node>) -> bool {
        self.edges()
            .all(|e| right.contains(&e.source) != right.contains(&e.target))
    }

    /// Computes a valid bipartition of an undirected graph, if one exists.
    ///
    /// # Examples
    /// ```
    /// use graphtheory::{prelude::*, algo::*, gens::*};
    ///
    /// let mut g: AdjMap<Node> = AdjMap::undirected();
    /// g.connect_path(0..10).unwrap();
    ///
    /// let bip = g.compute_bipartition().unwrap();
    /// assert_eq!(bip.right().len(), 5);
    /// ```
    fn compute_bipartition(&self) -> Option<Bipartition<Self::Node>> {
        Bipartite::new(self).run().ok()
    }

    /// Tests whether an undirected graph is bipartite; directed graphs are never bipartite
    /// in this sense.
    fn is_bipartite(&self) -> bool {
        self.compute_bipartition().is_some()
    }
}

impl<G> BipartiteTest for G where G: AdjacencyList + Sized {}

#[cfg(test)]
mod test {
    use super::*;
    use crate::gens::*;

    #[test]
    fn path() {
        for n in 1..10 {
            let mut graph: AdjMap<Node> = AdjMap::undirected();
            graph.add_node(0);
            graph.connect_path(0..n).unwrap();

            assert!(graph.is_bipartite());

            if n > 2 {
                let mut graph = graph.clone();
                graph.remove_edge(&(n / 2), &(n / 2 + 1));
                assert!(graph.is_bipartite());
            }

            if n > 2 {
                let mut graph = graph.clone();
                let u = 1 - (n % 2);
                if !graph.has_edge(&u, &(n - 1)) {
                    graph.add_edge((u, n - 1)).unwrap();
                    assert!(!graph.is_bipartite());
                }
            }
        }
    }

    #[test]
    fn strategies_agree() {
        let g: AdjMap<Node> = GraphFactory::new().ladder(6).unwrap();
        let bfs = Bipartite::new(&g).run().unwrap();
        let dfs = Bipartite::new(&g).strategy(SearchStrategy::Dfs).run().unwrap();

        assert_eq!(bfs, dfs);
        assert!(bfs.is_on_left_side(&0));
        assert!(bfs.is_on_right_side(&1));
        assert!(bfs.is_on_right_side(&6));
        assert!(g.is_bipartition(&bfs.right()));
        assert!(g.is_bipartition(&bfs.left()));
    }

    #[test]
    fn odd_cycles_and_directed_graphs() {
        let g: AdjMap<Node> = GraphFactory::new().cycle(7).unwrap();
        for strategy in [SearchStrategy::Bfs, SearchStrategy::Dfs] {
            assert_eq!(
                Bipartite::new(&g).strategy(strategy).run(),
                Err(GraphError::NotBipartite)
            );
        }

        let directed: AdjMap<Node> = AdjMap::from_edges(true, [(0, 1)]).unwrap();
        assert_eq!(
            Bipartite::new(&directed).run(),
            Err(GraphError::DirectedMisuse)
        );
        assert!(!directed.is_bipartite());
    }

    #[test]
    fn forests_are_bipartite() {
        let mut factory = GraphFactory::with_seed(8);
        for _ in 0..10 {
            let mut g: AdjMap<Node> = factory.random_tree(25).unwrap();
            g.add_edges([(100, 101), (101, 102)]).unwrap();
            let bip = g.compute_bipartition().unwrap();
            assert_eq!(bip.color.len(), 28);
            assert!(bip.is_on_left_side(&100));
        }
    }
}
