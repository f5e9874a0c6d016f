use super::*;

impl<R: Rng> GraphFactory<R> {
    /// Toroidal grid on `size × size` nodes; node `(r, c)` is labelled `r * size + c`
    /// and connected to `(r, c + 1)` and `(r + 1, c)` modulo `size`.
    /// Fails for `size < 3` as smaller tori would contain loops or parallel edges.
    pub fn toroidal_grid<G>(&mut self, size: usize) -> Result<G>
    where
        G: GraphEditing<Node = Node>,
    {
        ensure!(
            size >= 3,
            GraphError::invalid_argument("a toroidal grid needs at least 3 nodes per side")
        );
        debug!(size, directed = self.directed, "generating toroidal grid");

        let label = |r: usize, c: usize| ((r % size) * size + (c % size)) as Node;
        let mut graph: G = self.empty(size * size);
        for r in 0..size {
            for c in 0..size {
                graph.add_edge(self.next_edge::<G::Weight>(label(r, c), label(r, c + 1)))?;
                graph.add_edge(self.next_edge::<G::Weight>(label(r, c), label(r + 1, c)))?;
            }
        }
        Ok(graph)
    }

    /// Triangular lattice on `rows × cols` nodes: a (non-toroidal) grid in which every cell
    /// is split by the diagonal from `(r, c)` to `(r + 1, c + 1)`.
    pub fn triangle_lattice<G>(&mut self, rows: usize, cols: usize) -> Result<G>
    where
        G: GraphEditing<Node = Node>,
    {
        debug!(rows, cols, directed = self.directed, "generating triangular lattice");

        let label = |r: usize, c: usize| (r * cols + c) as Node;
        let mut graph: G = self.empty(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                if c + 1 < cols {
                    graph.add_edge(self.next_edge::<G::Weight>(label(r, c), label(r, c + 1)))?;
                }
                if r + 1 < rows {
                    graph.add_edge(self.next_edge::<G::Weight>(label(r, c), label(r + 1, c)))?;
                }
                if r + 1 < rows && c + 1 < cols {
                    graph.add_edge(
                        self.next_edge::<G::Weight>(label(r, c), label(r + 1, c + 1)),
                    )?;
                }
            }
        }
        Ok(graph)
    }

    /// Ladder with `n` rungs: two paths `0..n` and `n..2n` with rungs `(i, n + i)`
    pub fn ladder<G>(&mut self, n: usize) -> Result<G>
    where
        G: GraphEditing<Node = Node>,
    {
        debug!(n, directed = self.directed, "generating ladder");

        let n = n as Node;
        let mut graph: G = self.empty(2 * n as usize);
        for i in 0..n {
            if i + 1 < n {
                graph.add_edge(self.next_edge::<G::Weight>(i, i + 1))?;
                graph.add_edge(self.next_edge::<G::Weight>(n + i, n + i + 1))?;
            }
            graph.add_edge(self.next_edge::<G::Weight>(i, n + i))?;
        }
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{algo::*, repr::*};

    #[test]
    fn toroidal_grid_is_four_regular() {
        let g: AdjMap<Node> = GraphFactory::new().toroidal_grid(4).unwrap();
        assert_eq!(g.number_of_nodes(), 16);
        assert_eq!(g.number_of_edges(), 32);
        assert!(g.vertices().all(|u| g.degree_of(&u) == Ok(4)));
        assert!(g.has_edge(&3, &0));
        assert!(g.has_edge(&12, &0));

        assert!(GraphFactory::new().toroidal_grid::<AdjMap<Node>>(2).is_err());
    }

    #[test]
    fn triangle_lattice_counts() {
        let g: AdjMap<Node> = GraphFactory::new().triangle_lattice(3, 4).unwrap();
        // horizontal + vertical + diagonal
        assert_eq!(g.number_of_edges(), 3 * 3 + 2 * 4 + 2 * 3);
        assert!(g.has_edge(&0, &5));
        assert!(g.is_connected().unwrap());
    }

    #[test]
    fn ladder_is_bipartite() {
        let g: AdjMap<Node> = GraphFactory::new().ladder(5).unwrap();
        assert_eq!(g.number_of_nodes(), 10);
        assert_eq!(g.number_of_edges(), 13);
        assert!(g.is_bipartite());
    }
}
