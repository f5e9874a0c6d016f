use itertools::Itertools;
use tracing::{debug, trace};

use super::*;

/// A cycle visiting every node exactly once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HamiltonianCycle<N, W> {
    /// Nodes of the cycle starting and ending at the source; the length is `n + 1`
    pub hamilton_cycle: Vec<N>,
    /// The same cycle as a sequence of edges
    pub hamilton_edges: Vec<Edge<N, W>>,
}

impl<N: NodeId, W: Weight> HamiltonianCycle<N, W> {
    /// Builds the cycle as a subgraph with the original weights
    pub fn to_graph<G>(&self, directed: bool) -> Result<G>
    where
        G: GraphEditing<Node = N, Weight = W>,
    {
        G::from_edges(directed, self.hamilton_edges.iter())
    }
}

/// Backtracking search for a Hamiltonian cycle.
///
/// Extends a path from the source through unused neighbors (smallest first) and records the
/// first path of length `n` whose last node has an edge back to the source.
/// The search is exponential in the worst case.
pub struct HamiltonianSearch<'a, G> {
    graph: &'a G,
}

impl<'a, G> HamiltonianSearch<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self { graph }
    }

    /// Returns `Ok(None)` if no Hamiltonian cycle exists.
    /// Fails with [`GraphError::NodeNotFound`] for an unknown source.
    pub fn run(&self, source: &G::Node) -> Result<Option<HamiltonianCycle<G::Node, G::Weight>>> {
        debug!(
            n = self.graph.number_of_nodes(),
            m = self.graph.number_of_edges(),
            "hamiltonian cycle search"
        );
        let indexer = Indexer::new(self.graph);
        let s = indexer
            .index_of(source)
            .ok_or_else(|| GraphError::node_not_found(source))?;

        let n = indexer.len();
        let min_len = if self.graph.is_directed() { 2 } else { 3 };
        if n < min_len {
            return Ok(None);
        }

        let adj = indexer.weighted_adjacency(self.graph);
        let mut path = vec![s];
        let mut used = vec![false; n];
        used[s] = true;
        if !extend(&adj, &mut path, &mut used) {
            return Ok(None);
        }
        path.push(s);

        let hamilton_edges = path
            .iter()
            .tuple_windows()
            .filter_map(|(&u, &v)| {
                let &(_, w) = adj[u].iter().find(|(x, _)| *x == v)?;
                Some(Edge::new(indexer.node(u).clone(), indexer.node(v).clone(), w))
            })
            .collect_vec();
        Ok(Some(HamiltonianCycle {
            hamilton_cycle: indexer.nodes_of(&path),
            hamilton_edges,
        }))
    }
}

/// Extends `path` to a Hamiltonian cycle; `cursor[i]` is the next neighbor of `path[i]` to try
fn extend<W>(adj: &[Vec<(usize, W)>], path: &mut Vec<usize>, used: &mut [bool]) -> bool {
    let Some(&first) = path.first() else {
        return false;
    };
    let closes = |u: usize| adj[u].iter().any(|&(v, _)| v == first);
    if path.len() == used.len() {
        return path.last().is_some_and(|&u| closes(u));
    }

    let mut cursor = vec![0usize; path.len()];
    while let Some(i) = cursor.last_mut() {
        let Some(&u) = path.last() else {
            return false;
        };
        let Some(&(v, _)) = adj[u].get(*i) else {
            cursor.pop();
            if !cursor.is_empty() {
                trace!(depth = path.len(), "backtracking");
                if let Some(w) = path.pop() {
                    used[w] = false;
                }
            }
            continue;
        };
        *i += 1;
        if used[v] {
            continue;
        }

        used[v] = true;
        path.push(v);
        if path.len() < used.len() {
            cursor.push(0);
        } else if closes(v) {
            return true;
        } else {
            trace!(depth = path.len(), "backtracking");
            path.pop();
            used[v] = false;
        }
    }
    false
}

/// Hamiltonian cycles directly on graphs
pub trait Hamiltonian: AdjacencyList + Sized {
    /// Nodes of a Hamiltonian cycle starting at the first node, or `None` if there is none
    fn hamiltonian_cycle(&self) -> Option<Vec<Self::Node>> {
        let source = self.vertices().next()?;
        HamiltonianSearch::new(self)
            .run(&source)
            .ok()
            .flatten()
            .map(|cycle| cycle.hamilton_cycle)
    }
}

impl<G> Hamiltonian for G where G: AdjacencyList + Sized {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gens::*;

    #[test]
    fn cycles_and_complete_graphs() {
        let g: AdjMap<Node> = GraphFactory::new().cycle(6).unwrap();
        assert_eq!(g.hamiltonian_cycle(), Some(vec![0, 1, 2, 3, 4, 5, 0]));

        let k5: AdjMap<Node> = GraphFactory::new().complete(5).unwrap();
        assert_eq!(k5.hamiltonian_cycle(), Some(vec![0, 1, 2, 3, 4, 0]));

        let directed: AdjMap<Node> = GraphFactory::new().directed(true).cycle(2).unwrap();
        assert_eq!(directed.hamiltonian_cycle(), Some(vec![0, 1, 0]));
    }

    #[test]
    fn outputs_are_consistent() {
        let g: AdjMap<Node> = GraphFactory::with_seed(4)
            .weights(1..=20)
            .ladder(5)
            .unwrap();
        let cycle = HamiltonianSearch::new(&g).run(&3).unwrap().unwrap();

        assert_eq!(cycle.hamilton_cycle.len(), 11);
        assert_eq!(cycle.hamilton_cycle.first(), Some(&3));
        assert_eq!(cycle.hamilton_cycle.last(), Some(&3));
        assert_eq!(
            cycle.hamilton_cycle.iter().sorted().dedup().count(),
            g.number_of_nodes()
        );

        let sub: AdjMap<Node> = cycle.to_graph(false).unwrap();
        assert_eq!(sub.number_of_nodes(), 10);
        assert_eq!(sub.number_of_edges(), 10);
        for e in &cycle.hamilton_edges {
            assert_eq!(g.weight(&e.source, &e.target), Some(e.weight));
            assert_eq!(sub.degree_of(&e.source), Ok(2));
        }
    }

    #[test]
    fn missing_cycles() {
        let tree: AdjMap<Node> = GraphFactory::with_seed(2).random_tree(8).unwrap();
        assert_eq!(tree.hamiltonian_cycle(), None);

        // K_{2,3} has no Hamiltonian cycle
        let k23: AdjMap<Node> = AdjMap::from_edges(
            false,
            [(0, 2), (0, 3), (0, 4), (1, 2), (1, 3), (1, 4)],
        )
        .unwrap();
        assert_eq!(HamiltonianSearch::new(&k23).run(&0), Ok(None));
        assert_eq!(
            HamiltonianSearch::new(&k23).run(&7),
            Err(GraphError::NodeNotFound {
                node: "7".to_string()
            })
        );

        let edge: AdjMap<Node> = AdjMap::from_edges(false, [(0, 1)]).unwrap();
        assert_eq!(edge.hamiltonian_cycle(), None);
    }

    #[test]
    fn long_cycle() {
        let n = 100_000;
        let g: AdjMap<Node> = GraphFactory::new().cycle(n).unwrap();
        let cycle = g.hamiltonian_cycle().unwrap();
        assert_eq!(cycle.len(), n + 1);
        assert!(cycle[..n].iter().copied().eq(0..n as Node));
    }
}
