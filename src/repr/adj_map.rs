use std::collections::BTreeMap;

use super::*;

/// Sparse adjacency-map representation.
///
/// Stores for every node an ordered map of its out-neighbors to the edge weight.
/// Directed graphs additionally keep the in-neighborhoods so that in-edges and in-degrees
/// are as cheap as their outgoing counterparts.
/// For undirected graphs, every edge `{u, v}` is stored as `u -> v` and `v -> u`.
///
/// # Examples
/// ```
/// use graphtheory::prelude::*;
///
/// let mut g: AdjMap<char> = AdjMap::undirected();
/// g.add_edges([('a', 'b', 3), ('b', 'c', 1)]).unwrap();
///
/// assert_eq!(g.number_of_edges(), 2);
/// assert_eq!(g.weight(&'b', &'a'), Some(3));
/// assert_eq!(g.neighbors_of(&'b').collect::<Vec<_>>(), vec!['a', 'c']);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdjMap<N: Ord, W = i64> {
    directed: bool,
    out_nbs: BTreeMap<N, BTreeMap<N, W>>,
    in_nbs: BTreeMap<N, BTreeMap<N, W>>,
    num_edges: usize,
}

impl<N: NodeId, W: Weight> AdjMap<N, W> {
    /// Incoming neighborhoods; for undirected graphs identical to the outgoing ones
    fn in_map(&self) -> &BTreeMap<N, BTreeMap<N, W>> {
        if self.directed {
            &self.in_nbs
        } else {
            &self.out_nbs
        }
    }
}

impl<N: NodeId, W: Weight> GraphType for AdjMap<N, W> {
    type Node = N;
    type Weight = W;

    fn is_directed(&self) -> bool {
        self.directed
    }
}

impl<N: NodeId, W: Weight> GraphNodeOrder for AdjMap<N, W> {
    fn number_of_nodes(&self) -> usize {
        self.out_nbs.len()
    }

    fn vertices(&self) -> impl Iterator<Item = N> + '_ {
        self.out_nbs.keys().cloned()
    }

    fn has_node(&self, u: &N) -> bool {
        self.out_nbs.contains_key(u)
    }
}

impl<N: NodeId, W: Weight> GraphEdgeOrder for AdjMap<N, W> {
    fn number_of_edges(&self) -> usize {
        self.num_edges
    }
}

impl<N: NodeId, W: Weight> AdjacencyTest for AdjMap<N, W> {
    fn weight(&self, u: &N, v: &N) -> Option<W> {
        self.out_nbs.get(u)?.get(v).copied()
    }
}

impl<N: NodeId, W: Weight> AdjacencyList for AdjMap<N, W> {
    fn out_edges_of(&self, u: &N) -> impl Iterator<Item = Edge<N, W>> + '_ {
        let source = u.clone();
        self.out_nbs
            .get(u)
            .into_iter()
            .flat_map(move |nbs| {
                let source = source.clone();
                nbs.iter()
                    .map(move |(v, w)| Edge::new(source.clone(), v.clone(), *w))
            })
    }

    fn in_edges_of(&self, u: &N) -> impl Iterator<Item = Edge<N, W>> + '_ {
        let target = u.clone();
        self.in_map()
            .get(u)
            .into_iter()
            .flat_map(move |nbs| {
                let target = target.clone();
                nbs.iter()
                    .map(move |(v, w)| Edge::new(v.clone(), target.clone(), *w))
            })
    }

    fn out_degree_of(&self, u: &N) -> usize {
        self.out_nbs.get(u).map_or(0, |nbs| nbs.len())
    }

    fn in_degree_of(&self, u: &N) -> usize {
        self.in_map().get(u).map_or(0, |nbs| nbs.len())
    }

    fn neighbors_of(&self, u: &N) -> impl Iterator<Item = N> + '_ {
        self.out_nbs
            .get(u)
            .into_iter()
            .flat_map(|nbs| nbs.keys().cloned())
    }

    fn in_neighbors_of(&self, u: &N) -> impl Iterator<Item = N> + '_ {
        self.in_map()
            .get(u)
            .into_iter()
            .flat_map(|nbs| nbs.keys().cloned())
    }
}

impl<N: NodeId, W: Weight> GraphNew for AdjMap<N, W> {
    fn with_capacity(_n: usize, directed: bool) -> Self {
        Self {
            directed,
            out_nbs: BTreeMap::new(),
            in_nbs: BTreeMap::new(),
            num_edges: 0,
        }
    }
}

impl<N: NodeId, W: Weight> GraphEditing for AdjMap<N, W> {
    fn add_node(&mut self, u: N) -> bool {
        if self.out_nbs.contains_key(&u) {
            return false;
        }
        if self.directed {
            self.in_nbs.insert(u.clone(), BTreeMap::new());
        }
        self.out_nbs.insert(u, BTreeMap::new());
        true
    }

    fn remove_node(&mut self, u: &N) -> bool {
        let Some(out) = self.out_nbs.remove(u) else {
            return false;
        };

        if self.directed {
            let inc = self.in_nbs.remove(u).unwrap_or_default();
            for v in out.keys() {
                if let Some(nbs) = self.in_nbs.get_mut(v) {
                    nbs.remove(u);
                }
            }
            for v in inc.keys() {
                if let Some(nbs) = self.out_nbs.get_mut(v) {
                    nbs.remove(u);
                }
            }
            self.num_edges -= out.len() + inc.len();
        } else {
            for v in out.keys() {
                if let Some(nbs) = self.out_nbs.get_mut(v) {
                    nbs.remove(u);
                }
            }
            self.num_edges -= out.len();
        }

        true
    }

    fn add_edge(&mut self, edge: impl Into<Edge<N, W>>) -> Result<()> {
        let edge = edge.into();
        check_insertable(self, &edge)?;

        self.add_node(edge.source.clone());
        self.add_node(edge.target.clone());

        let Edge {
            source,
            target,
            weight,
        } = edge;

        if let Some(nbs) = self.out_nbs.get_mut(&source) {
            nbs.insert(target.clone(), weight);
        }
        let reverse = if self.directed {
            &mut self.in_nbs
        } else {
            &mut self.out_nbs
        };
        if let Some(nbs) = reverse.get_mut(&target) {
            nbs.insert(source, weight);
        }

        self.num_edges += 1;
        Ok(())
    }

    fn remove_edge(&mut self, u: &N, v: &N) -> Option<W> {
        let weight = self.out_nbs.get_mut(u)?.remove(v)?;
        let reverse = if self.directed {
            &mut self.in_nbs
        } else {
            &mut self.out_nbs
        };
        if let Some(nbs) = reverse.get_mut(v) {
            nbs.remove(u);
        }
        self.num_edges -= 1;
        Some(weight)
    }
}

impl<N: NodeId, W: Weight> Default for AdjMap<N, W> {
    fn default() -> Self {
        Self::undirected()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_nodes() {
        let mut g: AdjMap<String> = AdjMap::directed();
        g.add_edge(("x".to_string(), "y".to_string(), 4)).unwrap();
        g.add_edge(("y".to_string(), "x".to_string(), 2)).unwrap();

        assert_eq!(g.number_of_edges(), 2);
        assert_eq!(g.weight(&"x".to_string(), &"y".to_string()), Some(4));
        assert_eq!(g.in_degree_of(&"x".to_string()), 1);
        assert_eq!(g.degree_of(&"x".to_string()), Err(GraphError::DirectedMisuse));
    }

    #[test]
    fn undirected_registers_both_directions() {
        let mut g: AdjMap<u32> = AdjMap::undirected();
        g.add_edge((3, 1, 5)).unwrap();
        assert_eq!(g.weight(&1, &3), Some(5));
        assert_eq!(g.edges().collect::<Vec<_>>(), vec![Edge::new(1, 3, 5)]);
        assert_eq!(
            g.add_edge((1, 3, 2)),
            Err(GraphError::parallel_rejected(&1u32, &3u32))
        );

        assert_eq!(g.remove_edge(&1, &3), Some(5));
        assert!(!g.has_edge(&3, &1));
        assert_eq!(g.number_of_nodes(), 2);
    }

    #[test]
    fn remove_node_in_directed_graph() {
        let mut g: AdjMap<u32> =
            AdjMap::from_edges(true, [(0, 1), (1, 2), (2, 0), (3, 1)]).unwrap();
        assert!(g.remove_node(&1));
        assert!(!g.remove_node(&1));
        assert_eq!(g.number_of_edges(), 1);
        assert_eq!(g.out_degree_of(&3), 0);
        assert_eq!(g.in_degree_of(&2), 0);
        assert_eq!(g.in_neighbors_of(&0).collect::<Vec<_>>(), vec![2]);
    }
}
