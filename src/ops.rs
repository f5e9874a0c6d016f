/*!
# Graph Operations

Capability traits every graph representation implements and every algorithm is generic over.
Representations only have to provide a small core (node/edge counts, adjacency and weight lookup,
insertion/deletion); everything else is provided by default implementations.

Missing nodes are never an error on lookup: neighborhoods of unknown nodes are empty,
their degrees are zero and weight lookups return `None`.
Structural violations (loops, parallel edges, directedness mismatches) are reported as [`GraphError`].
*/

use itertools::Itertools;

use crate::{edge::*, error::*, node::*};

/// Node type of a graph
pub type NodeOf<G> = <G as GraphType>::Node;

/// Weight type of a graph
pub type WeightOf<G> = <G as GraphType>::Weight;

/// Edge type of a graph
pub type EdgeOf<G> = Edge<NodeOf<G>, WeightOf<G>>;

/// Associated node and weight types as well as the directedness of a graph
pub trait GraphType {
    type Node: NodeId;
    type Weight: Weight;

    /// Returns *true* if edges are oriented
    fn is_directed(&self) -> bool;

    /// Returns *true* if edges are not oriented
    fn is_undirected(&self) -> bool {
        !self.is_directed()
    }

    /// Fails with [`GraphError::UndirectedMisuse`] if the graph is undirected
    fn require_directed(&self) -> Result<()> {
        ensure!(self.is_directed(), GraphError::UndirectedMisuse);
        Ok(())
    }

    /// Fails with [`GraphError::DirectedMisuse`] if the graph is directed
    fn require_undirected(&self) -> Result<()> {
        ensure!(self.is_undirected(), GraphError::DirectedMisuse);
        Ok(())
    }
}

/// Provides getters pertaining to the node-size of a graph
pub trait GraphNodeOrder: GraphType {
    /// Returns the number of nodes of the graph
    fn number_of_nodes(&self) -> usize;

    /// Return the number of nodes
    fn len(&self) -> usize {
        self.number_of_nodes()
    }

    /// Returns *true* if the graph has no nodes (and thus no edges)
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over V in the deterministic iteration order of the representation
    fn vertices(&self) -> impl Iterator<Item = Self::Node> + '_;

    /// Returns *true* if the node is part of the graph
    fn has_node(&self, u: &Self::Node) -> bool;
}

/// Provides getters pertaining to the edge-size of a graph
pub trait GraphEdgeOrder: GraphType {
    /// Returns the number of edges of the graph.
    /// Undirected edges are counted once.
    fn number_of_edges(&self) -> usize;

    /// Returns *true* if the graph has no edges
    fn is_edgeless(&self) -> bool {
        self.number_of_edges() == 0
    }
}

/// Trait to test existence of edges
pub trait AdjacencyTest: GraphType {
    /// Returns the weight of the edge `(u, v)` or `None` if it does not exist
    fn weight(&self, u: &Self::Node, v: &Self::Node) -> Option<Self::Weight>;

    /// Returns *true* if the egde `(u, v)` exists in the graph.
    fn has_edge(&self, u: &Self::Node, v: &Self::Node) -> bool {
        self.weight(u, v).is_some()
    }

    /// Returns *true* if there exists an edge `(u, v)` as well as `(v, u)` in the graph.
    fn has_bidirected_edge(&self, u: &Self::Node, v: &Self::Node) -> bool {
        self.has_edge(u, v) && self.has_edge(v, u)
    }
}

/// Traits pertaining getters for neighborhoods & edges
pub trait AdjacencyList: GraphNodeOrder + GraphEdgeOrder {
    /// Returns an iterator over the outgoing edges `(u, v, w)` of `u`.
    /// For undirected graphs, every incident edge is reported with `u` as source.
    fn out_edges_of(&self, u: &Self::Node) -> impl Iterator<Item = EdgeOf<Self>> + '_;

    /// Returns an iterator over the incoming edges `(v, u, w)` of `u`.
    /// For undirected graphs, every incident edge is reported with `u` as target.
    fn in_edges_of(&self, u: &Self::Node) -> impl Iterator<Item = EdgeOf<Self>> + '_;

    /// Returns the number of outgoing edges of `u`
    fn out_degree_of(&self, u: &Self::Node) -> usize;

    /// Returns the number of incoming edges of `u`
    fn in_degree_of(&self, u: &Self::Node) -> usize;

    /// Returns an iterator over the (out-)neighborhood of a given vertex.
    fn neighbors_of(&self, u: &Self::Node) -> impl Iterator<Item = Self::Node> + '_ {
        self.out_edges_of(u).map(|e| e.target)
    }

    /// Returns an iterator over nodes `v` with edges `(v, u)`
    fn in_neighbors_of(&self, u: &Self::Node) -> impl Iterator<Item = Self::Node> + '_ {
        self.in_edges_of(u).map(|e| e.source)
    }

    /// Returns an iterator over the closed neighborhood of a given vertex.
    fn closed_neighbors_of(&self, u: &Self::Node) -> impl Iterator<Item = Self::Node> + '_ {
        std::iter::once(u.clone()).chain(self.neighbors_of(u))
    }

    /// Returns the degree of `u` in an undirected graph.
    /// Fails with [`GraphError::DirectedMisuse`] for directed graphs.
    fn degree_of(&self, u: &Self::Node) -> Result<usize> {
        self.require_undirected()?;
        Ok(self.out_degree_of(u))
    }

    /// Returns the maximum out-degree in the graph
    fn max_degree(&self) -> usize {
        self.vertices()
            .map(|u| self.out_degree_of(&u))
            .max()
            .unwrap_or(0)
    }

    /// Returns an iterator to all vertices with non-zero in- or out-degree
    fn vertices_with_neighbors(&self) -> impl Iterator<Item = Self::Node> + '_ {
        self.vertices()
            .filter(|u| self.out_degree_of(u) + self.in_degree_of(u) > 0)
    }

    /// Returns an iterator over all edges in the graph.
    /// Undirected edges `{u, v}` are reported once as `(u, v)` with `u < v`.
    fn edges(&self) -> impl Iterator<Item = EdgeOf<Self>> + '_ {
        let directed = self.is_directed();
        self.vertices().flat_map(move |u| {
            self.out_edges_of(&u)
                .filter(move |e| directed || e.source < e.target)
                .collect_vec()
        })
    }

    /// Returns all edges sorted by `(weight, source, target)`
    fn sorted_edges(&self) -> Vec<EdgeOf<Self>> {
        let mut edges = self.edges().collect_vec();
        edges.sort();
        edges
    }

    /// Returns the sum of all edge weights
    fn total_weight(&self) -> Self::Weight {
        self.edges().map(|e| e.weight).sum()
    }
}

/// Trait for creating a new empty graph
pub trait GraphNew: GraphType + Sized {
    /// Creates an empty graph
    fn new(directed: bool) -> Self {
        Self::with_capacity(0, directed)
    }

    /// Creates an empty graph expected to hold `n` nodes
    fn with_capacity(n: usize, directed: bool) -> Self;

    /// Creates an empty directed graph
    fn directed() -> Self {
        Self::new(true)
    }

    /// Creates an empty undirected graph
    fn undirected() -> Self {
        Self::new(false)
    }
}

/// Provides functions to insert/delete nodes and edges
pub trait GraphEditing: GraphNew + AdjacencyList + AdjacencyTest + GraphEdgeOrder {
    /// Adds a node to the graph.
    /// Returns *true* exactly if the node was not present previously.
    fn add_node(&mut self, u: Self::Node) -> bool;

    /// Adds all nodes in the collection
    fn add_nodes(&mut self, nodes: impl IntoIterator<Item = Self::Node>) {
        for u in nodes {
            self.add_node(u);
        }
    }

    /// Removes a node and all incident edges (in both directions).
    /// Returns *true* exactly if the node was present.
    fn remove_node(&mut self, u: &Self::Node) -> bool;

    /// Adds the edge to the graph; missing endpoints are inserted.
    /// For undirected graphs the edge is registered at both endpoints.
    ///
    /// Fails with [`GraphError::LoopRejected`] for loops and with
    /// [`GraphError::ParallelRejected`] if an edge between the endpoints exists.
    fn add_edge(&mut self, edge: impl Into<EdgeOf<Self>>) -> Result<()>;

    /// Adds all edges in the collection, stopping at the first failure
    fn add_edges<E>(&mut self, edges: impl IntoIterator<Item = E>) -> Result<()>
    where
        E: Into<EdgeOf<Self>>,
    {
        for e in edges {
            self.add_edge(e)?;
        }
        Ok(())
    }

    /// Removes the edge `(u, v)` (identified by its endpoints only).
    /// Returns the weight of the removed edge or `None` if it did not exist.
    fn remove_edge(&mut self, u: &Self::Node, v: &Self::Node) -> Option<Self::Weight>;

    /// Creates a graph from a collection of edges
    fn from_edges<E>(directed: bool, edges: impl IntoIterator<Item = E>) -> Result<Self>
    where
        E: Into<EdgeOf<Self>>,
    {
        let mut graph = Self::new(directed);
        graph.add_edges(edges)?;
        Ok(graph)
    }

    /// Creates a graph with a given node set and a collection of edges
    fn from_nodes_and_edges<E>(
        directed: bool,
        nodes: impl IntoIterator<Item = Self::Node>,
        edges: impl IntoIterator<Item = E>,
    ) -> Result<Self>
    where
        E: Into<EdgeOf<Self>>,
    {
        let mut graph = Self::new(directed);
        graph.add_nodes(nodes);
        graph.add_edges(edges)?;
        Ok(graph)
    }

    /// Copies another graph (possibly of a different representation) into a new graph.
    /// Fails if `Self` rejects an edge of `other`, e.g. a loop.
    fn from_graph<G>(other: &G) -> Result<Self>
    where
        G: AdjacencyList<Node = Self::Node, Weight = Self::Weight>,
    {
        let mut graph = Self::with_capacity(other.number_of_nodes(), other.is_directed());
        graph.add_nodes(other.vertices());
        graph.add_edges(other.edges())?;
        Ok(graph)
    }
}

/// Reversal of all edges
pub trait GraphTranspose: GraphEditing {
    /// Returns a new graph with every edge reversed.
    /// For undirected graphs, this is a copy.
    fn transpose(&self) -> Result<Self> {
        let mut graph = Self::with_capacity(self.number_of_nodes(), self.is_directed());
        graph.add_nodes(self.vertices());
        graph.add_edges(self.edges().map(|e| e.inverted()))?;
        Ok(graph)
    }
}

impl<G: GraphEditing> GraphTranspose for G {}

/// Structural equality across representations
pub trait GraphEquality: AdjacencyList + AdjacencyTest + GraphEdgeOrder {
    /// Returns *true* if both graphs have the same directedness, node set and weighted edge set
    fn is_equal_to<H>(&self, other: &H) -> bool
    where
        H: AdjacencyList<Node = Self::Node, Weight = Self::Weight> + AdjacencyTest + GraphEdgeOrder,
    {
        self.is_directed() == other.is_directed()
            && self.number_of_nodes() == other.number_of_nodes()
            && self.number_of_edges() == other.number_of_edges()
            && self.vertices().all(|u| other.has_node(&u))
            && self
                .edges()
                .all(|e| other.weight(&e.source, &e.target) == Some(e.weight))
    }
}

impl<G> GraphEquality for G where G: AdjacencyList + AdjacencyTest + GraphEdgeOrder {}

/// Umbrella trait for read-only graph access
pub trait Graph: GraphNodeOrder + GraphEdgeOrder + AdjacencyList + AdjacencyTest {}

impl<G> Graph for G where G: GraphNodeOrder + GraphEdgeOrder + AdjacencyList + AdjacencyTest {}

/// Umbrella trait for graphs that can be copied and edited
pub trait GraphMut: Graph + GraphEditing + Clone {}

impl<G> GraphMut for G where G: Graph + GraphEditing + Clone {}
