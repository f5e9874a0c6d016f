use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand_distr::{Bernoulli, Distribution, Uniform};

use crate::utils::Probability;

use super::*;

impl<R: Rng> GraphFactory<R> {
    /// Random tree on `n` nodes: every node `i > 0` is attached to a uniformly chosen node `j < i`.
    /// Directed trees are oriented away from `0`.
    pub fn random_tree<G>(&mut self, n: usize) -> Result<G>
    where
        G: GraphEditing<Node = Node>,
    {
        debug!(n, directed = self.directed, "generating random tree");
        let mut graph: G = self.empty(n);
        for i in 1..n as Node {
            let parent = Uniform::new(0, i)
                .map_err(|e| GraphError::invalid_argument(e.to_string()))?
                .sample(&mut self.rng);
            graph.add_edge(self.next_edge::<G::Weight>(parent, i))?;
        }
        Ok(graph)
    }

    /// Random graph on `n` nodes with exactly `m` edges chosen uniformly.
    /// Fails if `m` exceeds the number of node pairs.
    pub fn sparse<G>(&mut self, n: usize, m: usize) -> Result<G>
    where
        G: GraphEditing<Node = Node>,
    {
        ensure!(
            m <= self.max_edges(n),
            GraphError::invalid_argument(format!("{m} edges do not fit into {n} nodes"))
        );
        debug!(n, m, directed = self.directed, "generating sparse random graph");

        let mut graph: G = self.empty(n);
        let pairs = self.sample_pairs(n, m, &BTreeSet::new());
        for (u, v) in pairs {
            graph.add_edge(self.next_edge::<G::Weight>(u, v))?;
        }
        Ok(graph)
    }

    /// Random connected graph on `n` nodes with exactly `m >= n - 1` edges:
    /// a random spanning tree extended by uniformly chosen additional edges.
    /// Directed graphs are weakly connected.
    pub fn connected<G>(&mut self, n: usize, m: usize) -> Result<G>
    where
        G: GraphEditing<Node = Node>,
    {
        ensure!(
            m + 1 >= n && m <= self.max_edges(n),
            GraphError::invalid_argument(format!(
                "a connected graph on {n} nodes can not have {m} edges"
            ))
        );
        debug!(n, m, directed = self.directed, "generating connected random graph");

        let mut graph: G = self.random_tree(n)?;
        let taken: BTreeSet<(Node, Node)> = graph
            .edges()
            .map(|e| self.pair_key(e.source, e.target))
            .collect();
        let extra = m - graph.number_of_edges();
        for (u, v) in self.sample_pairs(n, extra, &taken) {
            graph.add_edge(self.next_edge::<G::Weight>(u, v))?;
        }
        Ok(graph)
    }

    /// Erdős–Rényi graph: every node pair becomes an edge independently with probability `p`
    pub fn gnp<G>(&mut self, n: usize, p: f64) -> Result<G>
    where
        G: GraphEditing<Node = Node>,
    {
        ensure!(
            p.is_probability(),
            GraphError::invalid_argument(format!("{p} is not a probability"))
        );
        debug!(n, p, directed = self.directed, "generating G(n,p) graph");

        let coin = Bernoulli::new(p).map_err(|e| GraphError::invalid_argument(e.to_string()))?;
        let mut graph: G = self.empty(n);
        for u in 0..n as Node {
            for v in 0..n as Node {
                if (u < v || (self.directed && u != v)) && coin.sample(&mut self.rng) {
                    graph.add_edge(self.next_edge::<G::Weight>(u, v))?;
                }
            }
        }
        Ok(graph)
    }

    /// Canonical key of a node pair; undirected pairs are normalized
    fn pair_key(&self, u: Node, v: Node) -> (Node, Node) {
        if self.directed || u < v { (u, v) } else { (v, u) }
    }

    /// Draws `m` distinct node pairs that are neither loops nor in `taken`.
    ///
    /// Dense requests shuffle the list of all admissible pairs, sparse requests use rejection sampling.
    fn sample_pairs(
        &mut self,
        n: usize,
        m: usize,
        taken: &BTreeSet<(Node, Node)>,
    ) -> Vec<(Node, Node)> {
        if m == 0 || n < 2 {
            return Vec::new();
        }

        if 2 * (m + taken.len()) > self.max_edges(n) {
            let mut candidates = Vec::new();
            for u in 0..n as Node {
                for v in 0..n as Node {
                    if (u < v || (self.directed && u != v)) && !taken.contains(&(u, v)) {
                        candidates.push((u, v));
                    }
                }
            }
            candidates.shuffle(&mut self.rng);
            candidates.truncate(m);
            candidates.sort();
            return candidates;
        }

        let mut chosen = BTreeSet::new();
        while chosen.len() < m {
            let u = self.rng.random_range(0..n as Node);
            let v = self.rng.random_range(0..n as Node);
            if u == v {
                continue;
            }
            let key = self.pair_key(u, v);
            if !taken.contains(&key) {
                chosen.insert(key);
            }
        }
        chosen.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{algo::*, repr::*};

    #[test]
    fn random_trees_are_trees() {
        let mut factory = GraphFactory::with_seed(1);
        for n in [1, 2, 10, 50] {
            let g: AdjMap<Node> = factory.random_tree(n).unwrap();
            assert_eq!(g.number_of_nodes(), n);
            assert_eq!(g.number_of_edges(), n - 1);
            assert!(g.is_connected().unwrap());
        }
    }

    #[test]
    fn sparse_has_exact_edge_count() {
        for directed in [false, true] {
            let mut factory = GraphFactory::with_seed(2).directed(directed);
            for (n, m) in [(10, 0), (10, 9), (10, 40), (10, 45), (30, 100)] {
                let g: AdjMap<Node> = factory.sparse(n, m).unwrap();
                assert_eq!(g.number_of_nodes(), n);
                assert_eq!(g.number_of_edges(), m);
            }
        }

        assert!(GraphFactory::new().sparse::<AdjMap<Node>>(5, 11).is_err());
    }

    #[test]
    fn connected_graphs() {
        let mut factory = GraphFactory::with_seed(3);
        for (n, m) in [(5, 4), (20, 30), (20, 190)] {
            let g: AdjMap<Node> = factory.connected(n, m).unwrap();
            assert_eq!(g.number_of_edges(), m);
            assert!(g.is_connected().unwrap());
        }
        assert!(factory.connected::<AdjMap<Node>>(10, 5).is_err());
    }

    #[test]
    fn gnp_extremes() {
        let mut factory = GraphFactory::with_seed(4);
        let empty: AdjMap<Node> = factory.gnp(10, 0.0).unwrap();
        assert_eq!(empty.number_of_edges(), 0);

        let full: AdjMap<Node> = factory.gnp(10, 1.0).unwrap();
        assert_eq!(full.number_of_edges(), 45);

        assert!(factory.gnp::<AdjMap<Node>>(10, 1.5).is_err());
    }
}
