/*!
# Vertex Cover Heuristics

A *node cover* is a set of nodes containing at least one endpoint of every edge.
Computing a minimum node cover is NP-hard; the strategies of [`VertexCoverSearch`] compute
(inclusion-)small covers of undirected graphs:

- [`CoverStrategy::Approximation`]: takes both endpoints of every uncovered edge; at most twice the optimum,
- [`CoverStrategy::DegreeGreedy`]: takes the endpoint of higher degree of every uncovered edge,
- [`CoverStrategy::LargestFirst`]: repeatedly takes a node of maximum remaining degree and deletes it.

Exact solutions on forests are provided by [`crate::classes::forest`].
*/

use std::collections::BTreeSet;

use tracing::{debug, trace};

use super::*;

/// A node cover
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeCover<N> {
    pub node_cover: BTreeSet<N>,
    pub cardinality: usize,
}

impl<N: NodeId> NodeCover<N> {
    pub fn new(node_cover: BTreeSet<N>) -> Self {
        let cardinality = node_cover.len();
        Self {
            node_cover,
            cardinality,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoverStrategy {
    #[default]
    Approximation,
    DegreeGreedy,
    LargestFirst,
}

/// Heuristic node cover of an undirected graph
pub struct VertexCoverSearch<'a, G> {
    graph: &'a G,
    strategy: CoverStrategy,
}

impl<'a, G> VertexCoverSearch<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            strategy: CoverStrategy::default(),
        }
    }

    pub fn strategy(mut self, strategy: CoverStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Runs the configured strategy; [`CoverStrategy::LargestFirst`] uses a [`BucketQueue`].
    /// Fails with [`GraphError::DirectedMisuse`] for directed graphs.
    pub fn run(&self) -> Result<NodeCover<G::Node>> {
        self.run_with::<BucketQueue<G::Node>>()
    }

    /// As [`VertexCoverSearch::run`] with an explicit degree queue for [`CoverStrategy::LargestFirst`]
    pub fn run_with<Q: DegreeQueue<G::Node>>(&self) -> Result<NodeCover<G::Node>> {
        self.graph.require_undirected()?;
        debug!(
            n = self.graph.number_of_nodes(),
            strategy = ?self.strategy,
            "node cover"
        );

        let mut cover = BTreeSet::new();
        match self.strategy {
            CoverStrategy::Approximation => {
                for e in self.graph.edges() {
                    if !cover.contains(&e.source) && !cover.contains(&e.target) {
                        cover.insert(e.source);
                        cover.insert(e.target);
                    }
                }
            }
            CoverStrategy::DegreeGreedy => {
                for e in self.graph.edges() {
                    if cover.contains(&e.source) || cover.contains(&e.target) {
                        continue;
                    }
                    if self.graph.out_degree_of(&e.target) > self.graph.out_degree_of(&e.source) {
                        cover.insert(e.target);
                    } else {
                        cover.insert(e.source);
                    }
                }
            }
            CoverStrategy::LargestFirst => {
                let mut queue = Q::from_keys(self.graph.vertices().map(|u| {
                    let degree = self.graph.out_degree_of(&u);
                    (u, degree)
                }));
                while let Some((u, degree)) = queue.pop_max() {
                    if degree == 0 {
                        break;
                    }
                    trace!(?u, degree, "cover node of maximum degree");
                    for v in self.graph.neighbors_of(&u) {
                        queue.decrement(&v);
                    }
                    cover.insert(u);
                }
            }
        }

        Ok(NodeCover::new(cover))
    }
}

/// Node covers directly on graphs
pub trait VertexCover: AdjacencyList + Sized {
    /// Returns *true* if every edge has an endpoint in `cover`
    fn is_node_cover(&self, cover: &BTreeSet<Self::Node>) -> bool {
        self.edges()
            .all(|e| cover.contains(&e.source) || cover.contains(&e.target))
    }

    /// Node cover of at most twice the minimum size
    fn approximate_node_cover(&self) -> Result<NodeCover<Self::Node>> {
        VertexCoverSearch::new(self).run()
    }
}

impl<G> VertexCover for G where G: AdjacencyList + Sized {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gens::*;

    const STRATEGIES: [CoverStrategy; 3] = [
        CoverStrategy::Approximation,
        CoverStrategy::DegreeGreedy,
        CoverStrategy::LargestFirst,
    ];

    #[test]
    fn star() {
        let g: AdjMap<Node> = AdjMap::from_edges(false, [(0, 1), (0, 2), (0, 3), (0, 4)]).unwrap();

        let approx = g.approximate_node_cover().unwrap();
        assert_eq!(approx.node_cover, BTreeSet::from([0, 1]));
        assert_eq!(approx.cardinality, 2);

        for strategy in [CoverStrategy::DegreeGreedy, CoverStrategy::LargestFirst] {
            let cover = VertexCoverSearch::new(&g).strategy(strategy).run().unwrap();
            assert_eq!(cover.node_cover, BTreeSet::from([0]));
        }
    }

    #[test]
    fn covers_are_valid_on_random_graphs() {
        let mut factory = GraphFactory::with_seed(61);
        for _ in 0..10 {
            let g: AdjMap<Node> = factory.sparse(30, 60).unwrap();
            let approx = g.approximate_node_cover().unwrap();
            assert_eq!(approx.cardinality % 2, 0);
            for strategy in STRATEGIES {
                let cover = VertexCoverSearch::new(&g).strategy(strategy).run().unwrap();
                assert!(g.is_node_cover(&cover.node_cover));
                assert_eq!(cover.cardinality, cover.node_cover.len());
            }

            let ordered = VertexCoverSearch::new(&g)
                .strategy(CoverStrategy::LargestFirst)
                .run_with::<OrderedQueue<Node>>()
                .unwrap();
            assert_eq!(
                ordered,
                VertexCoverSearch::new(&g)
                    .strategy(CoverStrategy::LargestFirst)
                    .run()
                    .unwrap()
            );
        }
    }

    #[test]
    fn rejects_directed_graphs() {
        let g: AdjMap<Node> = AdjMap::from_edges(true, [(0, 1)]).unwrap();
        assert_eq!(
            g.approximate_node_cover(),
            Err(GraphError::DirectedMisuse)
        );
    }
}
