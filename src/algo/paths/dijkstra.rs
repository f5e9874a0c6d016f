use tracing::debug;

use super::*;

/// Priority structure used to select the next node to settle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DijkstraVariant {
    /// Binary heap with lazy deletion in `O((n + m) log n)`
    #[default]
    Heap,
    /// Linear scan over a dense weight matrix in `O(n^2)`
    Matrix,
}

/// Dijkstra's single-source shortest paths for non-negative weights.
///
/// By default all edge weights are checked before the search starts; with the check disabled
/// only negative edges reached by the search are reported.
/// Both fail with [`GraphError::NegativeWeight`].
pub struct Dijkstra<'a, G> {
    graph: &'a G,
    variant: DijkstraVariant,
    check_weights: bool,
}

impl<'a, G> Dijkstra<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            variant: DijkstraVariant::default(),
            check_weights: true,
        }
    }

    pub fn variant(mut self, variant: DijkstraVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Enables or disables the upfront scan for negative weights
    pub fn check_weights(mut self, check_weights: bool) -> Self {
        self.check_weights = check_weights;
        self
    }

    pub fn run(&self, source: &G::Node) -> Result<ShortestPaths<G::Node, G::Weight>> {
        debug!(
            n = self.graph.number_of_nodes(),
            m = self.graph.number_of_edges(),
            variant = ?self.variant,
            "dijkstra"
        );
        if self.check_weights {
            check_non_negative(self.graph)?;
        }

        let indexer = Indexer::new(self.graph);
        let s = index_of_source(&indexer, source)?;
        let adj = indexer.weighted_adjacency(self.graph);

        let searched = match self.variant {
            DijkstraVariant::Heap => dijkstra_indexed(&adj, s),
            DijkstraVariant::Matrix => dijkstra_dense(&adj, s),
        };
        let (distance, parent) = searched.map_err(|(u, v)| {
            GraphError::negative_weight(indexer.node(u), indexer.node(v))
        })?;
        Ok(ShortestPaths::from_indexed(
            &indexer,
            source.clone(),
            distance,
            parent,
        ))
    }
}

/// `O(n^2)` Dijkstra: selects the unsettled node of minimum distance (smallest index on ties)
/// by a linear scan and relaxes its row of the weight matrix
fn dijkstra_dense<W: Weight>(
    adj: &[Vec<(usize, W)>],
    source: usize,
) -> std::result::Result<(Vec<Option<W>>, Vec<Option<usize>>), (usize, usize)> {
    let n = adj.len();
    let mut matrix = vec![vec![None; n]; n];
    for (u, nbs) in adj.iter().enumerate() {
        for &(v, w) in nbs {
            matrix[u][v] = Some(w);
        }
    }

    let mut distance: Vec<Option<W>> = vec![None; n];
    let mut parent = vec![None; n];
    let mut settled = vec![false; n];
    distance[source] = Some(W::zero());

    loop {
        let next = (0..n)
            .filter(|&u| !settled[u])
            .filter_map(|u| Some((distance[u]?, u)))
            .min();
        let Some((d, u)) = next else {
            break;
        };
        settled[u] = true;

        for (v, w) in matrix[u].iter().enumerate() {
            let Some(w) = *w else {
                continue;
            };
            if w < W::zero() {
                return Err((u, v));
            }
            let candidate = d + w;
            if !settled[v] && distance[v].is_none_or(|dv| candidate < dv) {
                distance[v] = Some(candidate);
                parent[v] = Some(u);
            }
        }
    }
    Ok((distance, parent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gens::GraphFactory;

    const VARIANTS: [DijkstraVariant; 2] = [DijkstraVariant::Heap, DijkstraVariant::Matrix];

    #[test]
    fn triangle_plus_tail() {
        let g: AdjMap<char> = AdjMap::from_edges(
            false,
            [('A', 'B', 1), ('A', 'C', 5), ('B', 'C', 1), ('B', 'D', 3), ('C', 'D', 1)],
        )
        .unwrap();

        for variant in VARIANTS {
            let sp = Dijkstra::new(&g).variant(variant).run(&'A').unwrap();
            assert_eq!(
                sp.distance,
                BTreeMap::from([('A', 0), ('B', 1), ('C', 2), ('D', 3)])
            );
            assert_eq!(sp.parent[&'D'], Some('C'));
            assert_eq!(sp.path(&'D').unwrap(), vec!['A', 'B', 'C', 'D']);
        }
        assert_eq!(
            g.shortest_path(&'D', &'A').unwrap(),
            Some(vec!['D', 'C', 'B', 'A'])
        );
    }

    #[test]
    fn unreachable_targets() {
        let g: AdjMap<Node> = AdjMap::from_edges(true, [(0, 1, 4), (2, 0, 1)]).unwrap();
        let sp = g.dijkstra(&0).unwrap();

        assert_eq!(sp.distance_to(&1), Some(4));
        assert_eq!(sp.distance_to(&2), None);
        assert_eq!(
            sp.path(&2),
            Err(GraphError::NoPathToTarget {
                target: "2".to_string()
            })
        );
        assert_eq!(
            g.dijkstra(&5),
            Err(GraphError::NodeNotFound {
                node: "5".to_string()
            })
        );
    }

    #[test]
    fn negative_weights() {
        let g: AdjMap<Node> = AdjMap::from_edges(true, [(0, 1, 2), (2, 3, -1)]).unwrap();
        assert_eq!(
            g.dijkstra(&0),
            Err(GraphError::NegativeWeight {
                from: "2".to_string(),
                target: "3".to_string()
            })
        );

        // the negative edge is not reachable from 0
        for variant in VARIANTS {
            let sp = Dijkstra::new(&g)
                .variant(variant)
                .check_weights(false)
                .run(&0)
                .unwrap();
            assert_eq!(sp.distance_to(&1), Some(2));
            assert!(Dijkstra::new(&g)
                .variant(variant)
                .check_weights(false)
                .run(&2)
                .is_err());
        }
    }

    #[test]
    fn variants_agree() {
        let mut factory = GraphFactory::with_seed(19).weights(0..=12);
        for directed in [false, true] {
            factory = factory.directed(directed);
            for _ in 0..10 {
                let g: AdjMap<Node> = factory.sparse(40, 90).unwrap();
                let heap = Dijkstra::new(&g).run(&0).unwrap();
                let dense = Dijkstra::new(&g)
                    .variant(DijkstraVariant::Matrix)
                    .run(&0)
                    .unwrap();
                assert_eq!(heap.distance, dense.distance);
            }
        }
    }
}
