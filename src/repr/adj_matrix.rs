use fxhash::FxHashMap;

use super::*;

/// Dense adjacency-matrix representation.
///
/// Every node occupies a slot; `matrix[i][j]` holds the weight of the edge from the node in
/// slot `i` to the node in slot `j`. Deleting a node clears its row and column in `O(n)` and
/// frees its slot for reuse by the next inserted node.
/// Nodes are iterated in slot order.
#[derive(Clone, Debug)]
pub struct AdjMatrix<N, W = i64> {
    directed: bool,
    labels: Vec<Option<N>>,
    slots: FxHashMap<N, usize>,
    free_slots: Vec<usize>,
    matrix: Vec<Vec<Option<W>>>,
    num_edges: usize,
}

impl<N: NodeId, W: Weight> AdjMatrix<N, W> {
    fn slot_of(&self, u: &N) -> Option<usize> {
        self.slots.get(u).copied()
    }

    fn label_of(&self, slot: usize) -> Option<&N> {
        self.labels[slot].as_ref()
    }

    fn allocate_slot(&mut self) -> usize {
        if let Some(slot) = self.free_slots.pop() {
            return slot;
        }

        let slot = self.labels.len();
        self.labels.push(None);
        for row in self.matrix.iter_mut() {
            row.push(None);
        }
        self.matrix.push(vec![None; slot + 1]);
        slot
    }
}

impl<N: NodeId, W: Weight> GraphType for AdjMatrix<N, W> {
    type Node = N;
    type Weight = W;

    fn is_directed(&self) -> bool {
        self.directed
    }
}

impl<N: NodeId, W: Weight> GraphNodeOrder for AdjMatrix<N, W> {
    fn number_of_nodes(&self) -> usize {
        self.slots.len()
    }

    fn vertices(&self) -> impl Iterator<Item = N> + '_ {
        self.labels.iter().flatten().cloned()
    }

    fn has_node(&self, u: &N) -> bool {
        self.slots.contains_key(u)
    }
}

impl<N: NodeId, W: Weight> GraphEdgeOrder for AdjMatrix<N, W> {
    fn number_of_edges(&self) -> usize {
        self.num_edges
    }
}

impl<N: NodeId, W: Weight> AdjacencyTest for AdjMatrix<N, W> {
    fn weight(&self, u: &N, v: &N) -> Option<W> {
        self.matrix[self.slot_of(u)?][self.slot_of(v)?]
    }
}

impl<N: NodeId, W: Weight> AdjacencyList for AdjMatrix<N, W> {
    fn out_edges_of(&self, u: &N) -> impl Iterator<Item = Edge<N, W>> + '_ {
        let slot = self.slot_of(u);
        slot.into_iter().flat_map(move |i| {
            self.matrix[i].iter().enumerate().filter_map(move |(j, w)| {
                let w = (*w)?;
                Some(Edge::new(
                    self.label_of(i)?.clone(),
                    self.label_of(j)?.clone(),
                    w,
                ))
            })
        })
    }

    fn in_edges_of(&self, u: &N) -> impl Iterator<Item = Edge<N, W>> + '_ {
        let slot = self.slot_of(u);
        slot.into_iter().flat_map(move |j| {
            self.matrix.iter().enumerate().filter_map(move |(i, row)| {
                let w = row[j]?;
                Some(Edge::new(
                    self.label_of(i)?.clone(),
                    self.label_of(j)?.clone(),
                    w,
                ))
            })
        })
    }

    fn out_degree_of(&self, u: &N) -> usize {
        self.slot_of(u)
            .map_or(0, |i| self.matrix[i].iter().filter(|w| w.is_some()).count())
    }

    fn in_degree_of(&self, u: &N) -> usize {
        self.slot_of(u).map_or(0, |j| {
            self.matrix.iter().filter(|row| row[j].is_some()).count()
        })
    }
}

impl<N: NodeId, W: Weight> GraphNew for AdjMatrix<N, W> {
    fn with_capacity(n: usize, directed: bool) -> Self {
        Self {
            directed,
            labels: Vec::with_capacity(n),
            slots: FxHashMap::default(),
            free_slots: Vec::new(),
            matrix: Vec::with_capacity(n),
            num_edges: 0,
        }
    }
}

impl<N: NodeId, W: Weight> GraphEditing for AdjMatrix<N, W> {
    fn add_node(&mut self, u: N) -> bool {
        if self.slots.contains_key(&u) {
            return false;
        }

        let slot = self.allocate_slot();
        self.labels[slot] = Some(u.clone());
        self.slots.insert(u, slot);
        true
    }

    fn remove_node(&mut self, u: &N) -> bool {
        let Some(slot) = self.slots.remove(u) else {
            return false;
        };

        let out = self.matrix[slot].iter().filter(|w| w.is_some()).count();
        let inc = self
            .matrix
            .iter()
            .enumerate()
            .filter(|(i, row)| *i != slot && row[slot].is_some())
            .count();
        self.num_edges -= if self.directed { out + inc } else { out };

        self.matrix[slot].iter_mut().for_each(|w| *w = None);
        for row in self.matrix.iter_mut() {
            row[slot] = None;
        }

        self.labels[slot] = None;
        self.free_slots.push(slot);
        true
    }

    fn add_edge(&mut self, edge: impl Into<Edge<N, W>>) -> Result<()> {
        let edge = edge.into();
        check_insertable(self, &edge)?;

        self.add_node(edge.source.clone());
        self.add_node(edge.target.clone());

        let (Some(i), Some(j)) = (self.slot_of(&edge.source), self.slot_of(&edge.target)) else {
            return Err(GraphError::node_not_found(&edge.source));
        };

        self.matrix[i][j] = Some(edge.weight);
        if !self.directed {
            self.matrix[j][i] = Some(edge.weight);
        }

        self.num_edges += 1;
        Ok(())
    }

    fn remove_edge(&mut self, u: &N, v: &N) -> Option<W> {
        let (i, j) = (self.slot_of(u)?, self.slot_of(v)?);
        let weight = self.matrix[i][j].take()?;
        if !self.directed {
            self.matrix[j][i] = None;
        }

        self.num_edges -= 1;
        Some(weight)
    }
}

impl<N: NodeId, W: Weight> PartialEq for AdjMatrix<N, W> {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal_to(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_are_reused() {
        let mut g: AdjMatrix<u32> = AdjMatrix::from_edges(false, [(0, 1), (1, 2), (2, 0)]).unwrap();
        assert!(g.remove_node(&1));
        assert_eq!(g.number_of_edges(), 1);
        assert_eq!(g.vertices().collect::<Vec<_>>(), vec![0, 2]);

        g.add_edge((7, 0, 3)).unwrap();
        assert_eq!(g.vertices().collect::<Vec<_>>(), vec![0, 7, 2]);
        assert_eq!(g.weight(&0, &7), Some(3));
        assert_eq!(g.weight(&0, &1), None);
        assert_eq!(g.degree_of(&0), Ok(2));
    }

    #[test]
    fn equality_with_sparse_backend() {
        let edges = [(0, 1, 2), (1, 2, 3), (2, 3, 4)];
        let dense: AdjMatrix<u32> = AdjMatrix::from_edges(true, edges).unwrap();
        let sparse: AdjMap<u32> = AdjMap::from_edges(true, edges).unwrap();
        assert!(dense.is_equal_to(&sparse));
        assert!(sparse.is_equal_to(&dense));

        let other: AdjMap<u32> = AdjMap::from_edges(true, [(0, 1, 2), (1, 2, 3), (2, 3, 5)]).unwrap();
        assert!(!dense.is_equal_to(&other));
        assert_eq!(AdjMap::from_graph(&dense).unwrap(), sparse);
    }
}
