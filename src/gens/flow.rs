use rand::seq::index::sample;

use super::*;

impl<R: Rng> GraphFactory<R> {
    /// Directed flow network on `n >= 2` nodes with source `0` and sink `n - 1`.
    ///
    /// Routes `paths` random source-to-sink paths through up to `max_hops` distinct random
    /// intermediate nodes; every traversed edge gains a random capacity (from the configured
    /// weight range, unit otherwise). Capacities of edges used by several paths are summed.
    /// The result is always directed, independent of the factory's configuration.
    pub fn flow_network<G>(&mut self, n: usize, paths: usize, max_hops: usize) -> Result<G>
    where
        G: GraphEditing<Node = Node>,
    {
        ensure!(
            n >= 2,
            GraphError::invalid_argument("a flow network needs a source and a sink")
        );
        debug!(n, paths, max_hops, "generating flow network");

        let (source, sink) = (0 as Node, (n - 1) as Node);
        let mut graph = G::with_capacity(n, true);
        graph.add_nodes(0..n as Node);

        for _ in 0..paths {
            let hops = self.rng.random_range(0..=max_hops.min(n - 2));
            let mut route = vec![source];
            route.extend(
                sample(&mut self.rng, n - 2, hops)
                    .into_iter()
                    .map(|i| (i + 1) as Node),
            );
            route.push(sink);

            for pair in route.windows(2) {
                let (u, v) = (pair[0], pair[1]);
                let capacity: G::Weight = self.next_weight();
                let total = match graph.remove_edge(&u, &v) {
                    Some(existing) => existing + capacity,
                    None => capacity,
                };
                graph.add_edge(Edge::new(u, v, total))?;
            }
        }

        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{algo::*, repr::*};

    #[test]
    fn sink_is_reachable() {
        let mut factory = GraphFactory::with_seed(9).weights(1..=5);
        for _ in 0..10 {
            let g: AdjMap<Node> = factory.flow_network(12, 6, 4).unwrap();
            assert!(g.is_directed());
            assert_eq!(g.in_degree_of(&0), 0);
            assert_eq!(g.out_degree_of(&11), 0);

            let bfs = Bfs::new(&g).run(Some(&0)).unwrap();
            assert!(bfs.distance.contains_key(&11));

            let flow = EdmondsKarp::new(&g).run(&0, &11).unwrap();
            assert!(flow.max_flow >= 1);
        }
    }

    #[test]
    fn capacities_are_summed() {
        let mut factory = GraphFactory::with_seed(1);
        let g: AdjMap<Node> = factory.flow_network(2, 5, 3).unwrap();
        assert_eq!(g.number_of_edges(), 1);
        assert_eq!(g.weight(&0, &1), Some(5));
    }
}
