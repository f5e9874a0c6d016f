use tracing::{debug, trace};

use super::*;

/// Johnson's all-pairs shortest paths for sparse graphs with arbitrary weights.
///
/// 1. A virtual source with zero-weight edges to every node is appended in index space and the
///    Bellman–Ford kernel computes potentials `h` from it ([`GraphError::NegativeCycle`]).
/// 2. Every edge is reweighted to `w(u, v) + h(u) - h(v) >= 0`.
/// 3. The Dijkstra kernel runs from every node and distances are shifted back by the potentials.
pub struct Johnson<'a, G> {
    graph: &'a G,
}

impl<'a, G> Johnson<'a, G>
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
            "johnson"
        );
        let indexer = Indexer::new(self.graph);
        let adj = indexer.weighted_adjacency(self.graph);
        let n = adj.len();
        let zero = G::Weight::zero();

        let mut extended = adj.clone();
        extended.push((0..n).map(|v| (v, zero)).collect());
        let mut initial = vec![None; n + 1];
        initial[n] = Some(zero);
        let (potential, _) = bellman_ford_indexed(&extended, initial)?;
        let h = potential
            .into_iter()
            .take(n)
            .map(|p| p.unwrap_or(zero))
            .collect::<Vec<_>>();
        trace!(?h, "potentials");

        let reweighted = adj
            .iter()
            .enumerate()
            .map(|(u, nbs)| nbs.iter().map(|&(v, w)| (v, w + h[u] - h[v])).collect())
            .collect::<Vec<Vec<_>>>();

        let mut distance = Vec::with_capacity(n);
        let mut parent = Vec::with_capacity(n);
        for s in 0..n {
            let (row, parents) = dijkstra_indexed(&reweighted, s)
                .map_err(|(u, v)| GraphError::negative_weight(indexer.node(u), indexer.node(v)))?;
            distance.push(
                row.into_iter()
                    .enumerate()
                    .map(|(v, d)| d.map(|d| d - h[s] + h[v]))
                    .collect(),
            );
            parent.push(parents);
        }

        DistanceMatrix::from_indexed(indexer, distance, parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gens::GraphFactory;

    #[test]
    fn agrees_with_floyd_warshall_on_negative_weights() {
        let g: AdjMap<Node> = AdjMap::from_edges(
            true,
            [
                (0, 1, 3),
                (0, 2, 8),
                (0, 4, -4),
                (1, 3, 1),
                (1, 4, 7),
                (2, 1, 4),
                (3, 0, 2),
                (3, 2, -5),
                (4, 3, 6),
            ],
        )
        .unwrap();

        let johnson = Johnson::new(&g).run().unwrap();
        assert_eq!(johnson, FloydWarshall::new(&g).run().unwrap());
        assert_eq!(johnson.distance(&0, &2), Some(-3));
        assert_eq!(johnson.path(&0, &2).unwrap(), vec![0, 4, 3, 2]);
        assert_eq!(johnson.distance(&2, &0), Some(7));
    }

    #[test]
    fn negative_cycles_and_random_graphs() {
        let g: AdjMap<Node> = AdjMap::from_edges(true, [(0, 1, 1), (1, 0, -2)]).unwrap();
        assert_eq!(Johnson::new(&g).run(), Err(GraphError::NegativeCycle));

        let mut factory = GraphFactory::with_seed(37).weights(0..=10).directed(true);
        for _ in 0..5 {
            let g: AdjMap<Node> = factory.sparse(20, 50).unwrap();
            assert_eq!(
                Johnson::new(&g).run().unwrap(),
                FloydWarshall::new(&g).run().unwrap()
            );
        }
    }
}
