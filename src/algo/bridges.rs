use tracing::debug;

use super::*;

/// Bridges of an undirected graph
pub trait Bridges: Graph + Sized {
    /// Returns all bridges, normalized and sorted by endpoints.
    /// Fails with [`GraphError::DirectedMisuse`] for directed graphs.
    fn compute_bridges(&self) -> Result<Vec<EdgeOf<Self>>> {
        Ok(BridgeSearch::new(self).run()?.cut_edges)
    }
}

impl<G> Bridges for G where G: Graph + Sized {}

/// Result of a bridge search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutEdges<N, W> {
    /// Bridges `(u, v, w)` with `u < v`, sorted by endpoints
    pub cut_edges: Vec<Edge<N, W>>,
}

/// Tarjan's low-link bridge search.
///
/// Runs one depth-first search per component (with an explicit stack) recording discovery times
/// and the lowest discovery time reachable by a single back edge from the subtree of every node.
/// The tree edge `(parent, child)` is a bridge iff `low(child) > discovery(parent)`.
pub struct BridgeSearch<'a, G> {
    graph: &'a G,
}

impl<'a, G> BridgeSearch<'a, G>
where
    G: Graph,
{
    pub fn new(graph: &'a G) -> Self {
        Self { graph }
    }

    pub fn run(&self) -> Result<CutEdges<G::Node, G::Weight>> {
        self.graph.require_undirected()?;
        debug!(
            n = self.graph.number_of_nodes(),
            m = self.graph.number_of_edges(),
            "bridge search"
        );

        let indexer = Indexer::new(self.graph);
        let adj = indexer.adjacency(self.graph);
        let mut nodes_info = vec![NodeInfo::default(); adj.len()];
        let mut time = 0;
        let mut bridges = Vec::new();

        for root in 0..adj.len() {
            if nodes_info[root].discovery != 0 || adj[root].is_empty() {
                continue;
            }

            time += 1;
            nodes_info[root] = NodeInfo::discovered(root, time);
            let mut stack = vec![(root, 0)];

            while let Some(frame) = stack.last_mut() {
                let (u, pos) = *frame;
                if let Some(&v) = adj[u].get(pos) {
                    frame.1 += 1;
                    if nodes_info[v].discovery == 0 {
                        time += 1;
                        nodes_info[v] = NodeInfo::discovered(u, time);
                        stack.push((v, 0));
                    } else if v != nodes_info[u].parent {
                        let v_disc = nodes_info[v].discovery;
                        nodes_info[u].update_low(v_disc);
                    }
                } else {
                    stack.pop();
                    let parent = nodes_info[u].parent;
                    if parent != u {
                        let low = nodes_info[u].low;
                        nodes_info[parent].update_low(low);
                        if low > nodes_info[parent].discovery {
                            bridges.push((parent, u));
                        }
                    }
                }
            }
        }

        let mut cut_edges = bridges
            .into_iter()
            .filter_map(|(u, v)| {
                let (u, v) = (indexer.node(u), indexer.node(v));
                let w = self.graph.weight(u, v)?;
                Some(Edge::new(u.clone(), v.clone(), w).normalized())
            })
            .collect::<Vec<_>>();
        cut_edges.sort_by(|a, b| a.endpoints().cmp(&b.endpoints()));
        Ok(CutEdges { cut_edges })
    }
}

#[derive(Clone, Copy, Default)]
struct NodeInfo {
    low: usize,
    discovery: usize,
    parent: usize,
}

impl NodeInfo {
    fn discovered(parent: usize, time: usize) -> Self {
        Self {
            low: time,
            discovery: time,
            parent,
        }
    }

    fn update_low(&mut self, value: usize) {
        self.low = self.low.min(value);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::gens::*;
    use itertools::Itertools;

    #[test]
    fn bridges_in_path() {
        for n in [1, 5, 10, 15] {
            let mut graph: AdjMap<Node> = AdjMap::undirected();
            graph.add_node(0);
            graph.connect_path(0..n).unwrap();

            let bridges = graph.compute_bridges().unwrap();
            assert_eq!(bridges, graph.edges().collect_vec());
        }
    }

    #[test]
    fn bridge_in_example() {
        let graph: AdjMap<Node> = AdjMap::from_edges(
            false,
            [(0, 1, 1), (0, 2, 1), (2, 1, 1), (1, 3, 7), (3, 4, 1), (4, 5, 1), (5, 3, 1)],
        )
        .unwrap();

        assert_eq!(graph.compute_bridges().unwrap(), vec![Edge::new(1, 3, 7)]);

        let directed: AdjMap<Node> = AdjMap::from_edges(true, [(0, 1)]).unwrap();
        assert_eq!(directed.compute_bridges(), Err(GraphError::DirectedMisuse));
    }

    #[test]
    fn bridgeless_graphs() {
        let g: AdjMap<Node> = GraphFactory::new().toroidal_grid(4).unwrap();
        assert!(g.compute_bridges().unwrap().is_empty());

        let g: AdjMap<Node> = GraphFactory::new().complete(5).unwrap();
        assert!(g.compute_bridges().unwrap().is_empty());
    }

    #[test]
    fn tree_plus_edge() {
        let mut factory = GraphFactory::with_seed(21);
        for _ in 0..10 {
            let mut tree: AdjMap<Node> = factory.random_tree(30).unwrap();
            assert_eq!(tree.compute_bridges().unwrap().len(), 29);

            // close a cycle through the tree path between two non-adjacent nodes
            let (u, v) = (0, 29);
            if tree.has_edge(&u, &v) {
                continue;
            }
            let cycle_len = tree.shortest_hop_path(&u, &v).unwrap().len();
            tree.add_edge((u, v)).unwrap();

            let bridges = tree.compute_bridges().unwrap();
            assert_eq!(bridges.len(), 29 - (cycle_len - 1));
        }
    }
}
