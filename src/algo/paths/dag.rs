use tracing::debug;

use super::*;

/// Shortest paths in a directed acyclic graph: relaxes the out-edges of every node in
/// topological order. Negative weights are allowed.
/// Fails with [`GraphError::NotDag`] or [`GraphError::UndirectedMisuse`].
pub struct DagShortestPaths<'a, G> {
    graph: &'a G,
}

impl<'a, G> DagShortestPaths<'a, G>
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
            "dag shortest paths"
        );
        ensure!(
            self.graph.has_node(source),
            GraphError::node_not_found(source)
        );
        let order = TopologicalSort::new(self.graph).run()?;

        let mut distance = BTreeMap::from([(source.clone(), G::Weight::zero())]);
        let mut parent = BTreeMap::from([(source.clone(), None)]);
        for u in order.sorted_nodes {
            let Some(&du) = distance.get(&u) else {
                continue;
            };
            for e in self.graph.out_edges_of(&u) {
                let candidate = du + e.weight;
                if distance.get(&e.target).is_none_or(|&dv| candidate < dv) {
                    distance.insert(e.target.clone(), candidate);
                    parent.insert(e.target, Some(u.clone()));
                }
            }
        }

        Ok(ShortestPaths {
            source: source.clone(),
            distance,
            parent,
        })
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;
    use crate::gens::GraphFactory;

    #[test]
    fn negative_weights_on_dag() {
        // CLRS figure 24.5
        let g: AdjMap<char> = AdjMap::from_edges(
            true,
            [
                ('r', 's', 5),
                ('r', 't', 3),
                ('s', 't', 2),
                ('s', 'x', 6),
                ('t', 'x', 7),
                ('t', 'y', 4),
                ('t', 'z', 2),
                ('x', 'y', -1),
                ('x', 'z', 1),
                ('y', 'z', -2),
            ],
        )
        .unwrap();

        let sp = DagShortestPaths::new(&g).run(&'s').unwrap();
        assert_eq!(
            sp.distance,
            BTreeMap::from([('s', 0), ('t', 2), ('x', 6), ('y', 5), ('z', 3)])
        );
        assert_eq!(sp.path(&'z').unwrap(), vec!['s', 'x', 'y', 'z']);
        assert!(sp.path(&'r').is_err());
        assert_eq!(sp, g.bellman_ford(&'s').unwrap());
    }

    #[test]
    fn rejects_cycles() {
        let g: AdjMap<Node> = AdjMap::from_edges(true, [(0, 1), (1, 0)]).unwrap();
        assert_eq!(DagShortestPaths::new(&g).run(&0), Err(GraphError::NotDag));

        let g: AdjMap<Node> = AdjMap::from_edges(false, [(0, 1)]).unwrap();
        assert_eq!(
            DagShortestPaths::new(&g).run(&0),
            Err(GraphError::UndirectedMisuse)
        );
    }

    #[test]
    fn agrees_with_dijkstra() {
        let mut factory = GraphFactory::with_seed(29).weights(0..=9).directed(true);
        for _ in 0..10 {
            let random: AdjMap<Node> = factory.sparse(30, 80).unwrap();
            let dag: AdjMap<Node> = AdjMap::from_nodes_and_edges(
                true,
                random.vertices(),
                random
                    .edges()
                    .map(|e| e.normalized())
                    .unique_by(|e| e.endpoints()),
            )
            .unwrap();

            assert_eq!(
                DagShortestPaths::new(&dag).run(&0).unwrap().distance,
                dag.dijkstra(&0).unwrap().distance
            );
        }
    }
}
