use tracing::debug;

use super::*;

/// Bellman–Ford single-source shortest paths for arbitrary weights.
///
/// Relaxes every edge in up to `n - 1` rounds; an improvement in an additional round proves a
/// negative cycle reachable from the source ([`GraphError::NegativeCycle`]).
/// In an undirected graph every negative edge forms such a cycle.
pub struct BellmanFord<'a, G> {
    graph: &'a G,
}

impl<'a, G> BellmanFord<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self { graph }
    }

    pub fn run(&self, source: &G::Node) -> Result<ShortestPaths<G::Node, G::Weight>> {
        debug!(
            n = self.graph.number_of_nodes(),
            m = self.graph.number_of_edges(),
            "bellman-ford"
        );
        let indexer = Indexer::new(self.graph);
        let s = index_of_source(&indexer, source)?;
        let adj = indexer.weighted_adjacency(self.graph);

        let mut initial = vec![None; adj.len()];
        initial[s] = Some(G::Weight::zero());
        let (distance, parent) = bellman_ford_indexed(&adj, initial)?;
        Ok(ShortestPaths::from_indexed(
            &indexer,
            source.clone(),
            distance,
            parent,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gens::GraphFactory;

    fn cormen() -> AdjMap<char> {
        AdjMap::from_edges(
            true,
            [
                ('s', 't', 6),
                ('s', 'y', 7),
                ('t', 'y', 8),
                ('t', 'x', 5),
                ('t', 'z', -4),
                ('x', 't', -2),
                ('y', 'x', -3),
                ('y', 'z', 9),
                ('z', 's', 2),
                ('z', 'x', 7),
            ],
        )
        .unwrap()
    }

    #[test]
    fn negative_edges() {
        let g = cormen();
        let sp = g.bellman_ford(&'s').unwrap();

        assert_eq!(
            sp.distance,
            BTreeMap::from([('s', 0), ('t', 2), ('x', 4), ('y', 7), ('z', -2)])
        );
        assert_eq!(sp.path(&'z').unwrap(), vec!['s', 'y', 'x', 't', 'z']);
    }

    #[test]
    fn negative_cycles() {
        let mut g = cormen();
        g.remove_edge(&'z', &'s');
        g.add_edge(('z', 's', -5)).unwrap();
        assert_eq!(g.bellman_ford(&'s'), Err(GraphError::NegativeCycle));

        // not reachable from the source
        let g: AdjMap<Node> =
            AdjMap::from_edges(true, [(0, 1, 1), (2, 3, -2), (3, 2, 1)]).unwrap();
        assert_eq!(g.bellman_ford(&0).unwrap().distance.len(), 2);
        assert_eq!(g.bellman_ford(&2), Err(GraphError::NegativeCycle));

        let undirected: AdjMap<Node> = AdjMap::from_edges(false, [(0, 1, -1)]).unwrap();
        assert_eq!(undirected.bellman_ford(&0), Err(GraphError::NegativeCycle));
    }

    #[test]
    fn agrees_with_dijkstra() {
        let mut factory = GraphFactory::with_seed(23).weights(0..=20).directed(true);
        for _ in 0..10 {
            let g: AdjMap<Node> = factory.connected(30, 70).unwrap();
            for s in [0, 7, 29] {
                assert_eq!(
                    g.bellman_ford(&s).unwrap().distance,
                    g.dijkstra(&s).unwrap().distance
                );
            }
        }
    }
}
