/*!
# Edge Coloring

A *proper edge coloring* assigns colors to the edges of an undirected graph such that edges
sharing an endpoint receive distinct colors. [`SequentialEdgeColoring`] scans the edges in
order and gives every edge the least color free at both of its endpoints, using at most
`2 * max_degree - 1` colors.
*/

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::{coloring::Saturation, *};

/// A proper edge coloring; edges are keyed `(u, v)` with `u < v`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeColoring<N> {
    pub color: BTreeMap<(N, N), usize>,
    pub colors: usize,
}

impl<N: NodeId> EdgeColoring<N> {
    /// Color of the edge `{u, v}` given in any orientation
    pub fn color_of(&self, u: &N, v: &N) -> Option<usize> {
        let key = if u < v {
            (u.clone(), v.clone())
        } else {
            (v.clone(), u.clone())
        };
        self.color.get(&key).copied()
    }
}

/// Unordered-sequential edge coloring of an undirected graph
pub struct SequentialEdgeColoring<'a, G> {
    graph: &'a G,
}

impl<'a, G> SequentialEdgeColoring<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self { graph }
    }

    /// Fails with [`GraphError::DirectedMisuse`] for directed graphs
    pub fn run(&self) -> Result<EdgeColoring<G::Node>> {
        self.graph.require_undirected()?;
        debug!(m = self.graph.number_of_edges(), "edge coloring");

        let mut around: BTreeMap<G::Node, BTreeSet<usize>> = BTreeMap::new();
        let mut saturation = Saturation::new(2 * self.graph.max_degree());
        let mut color = BTreeMap::new();

        for e in self.graph.edges() {
            let used = around
                .get(&e.source)
                .into_iter()
                .chain(around.get(&e.target))
                .flatten()
                .copied();
            let c = saturation.least_free(used);
            around.entry(e.source.clone()).or_default().insert(c);
            around.entry(e.target.clone()).or_default().insert(c);
            color.insert((e.source, e.target), c);
        }

        let colors = color.values().max().map_or(0, |&c| c + 1);
        Ok(EdgeColoring { color, colors })
    }
}

/// Edge colorings directly on graphs
pub trait EdgeColorable: AdjacencyList + Sized {
    /// Returns *true* if every edge is colored and adjacent edges differ
    fn is_proper_edge_coloring(&self, coloring: &EdgeColoring<Self::Node>) -> bool {
        self.vertices().all(|u| {
            let mut seen = BTreeSet::new();
            self.neighbors_of(&u)
                .all(|v| coloring.color_of(&u, &v).is_some_and(|c| seen.insert(c)))
        })
    }

    fn edge_coloring(&self) -> Result<EdgeColoring<Self::Node>> {
        SequentialEdgeColoring::new(self).run()
    }
}

impl<G> EdgeColorable for G where G: AdjacencyList + Sized {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gens::*;

    #[test]
    fn star_and_cycles() {
        let star: AdjMap<Node> =
            AdjMap::from_edges(false, [(0, 1), (0, 2), (0, 3), (0, 4)]).unwrap();
        let coloring = star.edge_coloring().unwrap();
        assert_eq!(coloring.colors, 4);
        assert_eq!(coloring.color_of(&3, &0), Some(2));
        assert!(star.is_proper_edge_coloring(&coloring));

        let mut factory = GraphFactory::with_seed(2);
        let c5: AdjMap<Node> = factory.cycle(5).unwrap();
        assert_eq!(c5.edge_coloring().unwrap().colors, 3);
        let c6: AdjMap<Node> = factory.cycle(6).unwrap();
        assert_eq!(c6.edge_coloring().unwrap().colors, 2);
    }

    #[test]
    fn random_graphs_respect_the_bound() {
        let mut factory = GraphFactory::with_seed(79);
        for _ in 0..10 {
            let g: AdjMap<Node> = factory.sparse(25, 70).unwrap();
            let coloring = g.edge_coloring().unwrap();
            assert!(g.is_proper_edge_coloring(&coloring));
            assert_eq!(coloring.color.len(), g.number_of_edges());
            assert!(coloring.colors < 2 * g.max_degree());
            assert!(coloring.colors >= g.max_degree());
        }
    }
}
