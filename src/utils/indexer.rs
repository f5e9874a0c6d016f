use fxhash::FxHashMap;
use itertools::Itertools;

use crate::{node::NodeId, ops::*};

/// Bijection between the nodes of a graph and `0..n`.
///
/// Index-based algorithms (matrices, residual networks, bitset rows) translate the graph once
/// and work on dense indices afterwards. Indices follow the iteration order of the graph.
#[derive(Clone, Debug)]
pub struct Indexer<N> {
    nodes: Vec<N>,
    index: FxHashMap<N, usize>,
}

impl<N: NodeId> Indexer<N> {
    /// Indexes the nodes of the graph in its iteration order
    pub fn new<G>(graph: &G) -> Self
    where
        G: GraphNodeOrder<Node = N>,
    {
        Self::from_nodes(graph.vertices())
    }

    /// Indexes a sequence of nodes; duplicates are skipped
    pub fn from_nodes(nodes: impl IntoIterator<Item = N>) -> Self {
        let mut indexer = Self {
            nodes: Vec::new(),
            index: FxHashMap::default(),
        };
        for u in nodes {
            indexer.push(u);
        }
        indexer
    }

    /// Adds a node (if not present) and returns its index
    pub fn push(&mut self, u: N) -> usize {
        if let Some(&i) = self.index.get(&u) {
            return i;
        }
        let i = self.nodes.len();
        self.index.insert(u.clone(), i);
        self.nodes.push(u);
        i
    }

    /// Returns the number of indexed nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns *true* if no node is indexed
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the index of a node
    pub fn index_of(&self, u: &N) -> Option<usize> {
        self.index.get(u).copied()
    }

    /// Returns the node with index `i`.
    /// ** Panics if `i >= n` **
    pub fn node(&self, i: usize) -> &N {
        &self.nodes[i]
    }

    /// Returns all nodes in index order
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    /// Translates a sequence of indices into nodes
    pub fn nodes_of<'a>(&'a self, indices: impl IntoIterator<Item = &'a usize>) -> Vec<N> {
        indices.into_iter().map(|&i| self.nodes[i].clone()).collect()
    }

    /// Out-neighborhoods of all nodes in index space, each sorted
    pub fn adjacency<G>(&self, graph: &G) -> Vec<Vec<usize>>
    where
        G: AdjacencyList<Node = N>,
    {
        self.nodes
            .iter()
            .map(|u| {
                graph
                    .neighbors_of(u)
                    .filter_map(|v| self.index_of(&v))
                    .sorted()
                    .collect_vec()
            })
            .collect_vec()
    }

    /// Weighted out-neighborhoods of all nodes in index space, each sorted by neighbor index
    pub fn weighted_adjacency<G>(&self, graph: &G) -> Vec<Vec<(usize, G::Weight)>>
    where
        G: AdjacencyList<Node = N>,
    {
        self.nodes
            .iter()
            .map(|u| {
                graph
                    .out_edges_of(u)
                    .filter_map(|e| Some((self.index_of(&e.target)?, e.weight)))
                    .sorted_by_key(|(v, _)| *v)
                    .collect_vec()
            })
            .collect_vec()
    }

    /// Dense weight matrix in index space; absent edges are `None`
    pub fn weight_matrix<G>(&self, graph: &G) -> Vec<Vec<Option<G::Weight>>>
    where
        G: AdjacencyList<Node = N>,
    {
        let n = self.len();
        let mut matrix = vec![vec![None; n]; n];
        for (i, nbs) in self.weighted_adjacency(graph).into_iter().enumerate() {
            for (j, w) in nbs {
                matrix[i][j] = Some(w);
            }
        }
        matrix
    }
}
