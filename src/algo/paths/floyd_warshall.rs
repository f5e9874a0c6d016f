use tracing::{debug, trace};

use super::*;

/// Floyd–Warshall all-pairs shortest paths in `O(n^3)`.
///
/// Relaxes every pair through every intermediate node `k` while maintaining a parent matrix
/// for path reconstruction. A negative diagonal entry afterwards means a negative cycle
/// ([`GraphError::NegativeCycle`]).
pub struct FloydWarshall<'a, G> {
    graph: &'a G,
}

impl<'a, G> FloydWarshall<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self { graph }
    }

    pub fn run(&self) -> Result<DistanceMatrix<G::Node, G::Weight>> {
        debug!(
            n = self.graph.number_of_nodes(),
            m = self.graph.number_of_edges(),
            "floyd-warshall"
        );
        let indexer = Indexer::new(self.graph);
        let (mut distance, mut parent) = edge_matrices(&indexer.weighted_adjacency(self.graph));
        let n = indexer.len();

        for k in 0..n {
            for i in 0..n {
                let Some(dik) = distance[i][k] else {
                    continue;
                };
                for j in 0..n {
                    let Some(dkj) = distance[k][j] else {
                        continue;
                    };
                    let candidate = dik + dkj;
                    if distance[i][j].is_none_or(|dij| candidate < dij) {
                        distance[i][j] = Some(candidate);
                        parent[i][j] = parent[k][j];
                    }
                }
            }
            trace!(k, "intermediate node done");
        }

        DistanceMatrix::from_indexed(indexer, distance, parent)
    }
}
