/*!
# Matching Algorithms

This module provides algorithms for computing **matchings** in undirected graphs.

A *matching* is a set of edges without shared endpoints.
- A **maximal matching** cannot be extended by adding another edge, but may not be optimal in size.
- A **maximum matching** is the largest possible matching.

Provided are
- maximum matchings in bipartite graphs by Hopcroft–Karp, by single augmenting paths and by a
  reduction to maximum flow ([`MaximumBipartiteMatching`]),
- greedy maximal matchings in edge order and in non-decreasing weight order ([`GreedyMatching`]).
*/

use std::{
    cmp::Reverse,
    collections::{BTreeMap, BTreeSet, BinaryHeap, VecDeque},
};

use itertools::Itertools;
use num::One;
use tracing::{debug, trace};

use super::*;

/// A matching given by the partner of every matched node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matching<N, W> {
    /// Partner of every matched node; contains both `u -> v` and `v -> u`
    pub mate: BTreeMap<N, N>,
    /// Number of matched edges
    pub cardinality: usize,
    /// Total weight of the matched edges
    pub weight: W,
}

impl<N: NodeId, W: Weight> Matching<N, W> {
    fn from_pairs<G>(graph: &G, pairs: impl IntoIterator<Item = (N, N)>) -> Self
    where
        G: AdjacencyTest<Node = N, Weight = W>,
    {
        let mut mate = BTreeMap::new();
        let mut weight = W::zero();
        let mut cardinality = 0;
        for (u, v) in pairs {
            weight = weight + graph.weight(&u, &v).unwrap_or_else(W::zero);
            mate.insert(u.clone(), v.clone());
            mate.insert(v, u);
            cardinality += 1;
        }
        Self {
            mate,
            cardinality,
            weight,
        }
    }

    /// Returns the partner of `u` if `u` is matched
    pub fn mate_of(&self, u: &N) -> Option<&N> {
        self.mate.get(u)
    }

    pub fn is_matched(&self, u: &N) -> bool {
        self.mate.contains_key(u)
    }

    /// Matched edges `(u, v)` with `u < v` in increasing order
    pub fn edges(&self) -> Vec<(N, N)> {
        self.mate
            .iter()
            .filter(|(u, v)| u < v)
            .map(|(u, v)| (u.clone(), v.clone()))
            .collect()
    }

    /// Returns *true* if every matched pair is an edge of `graph` and partners are mutual
    pub fn is_valid_in<G>(&self, graph: &G) -> bool
    where
        G: AdjacencyTest<Node = N>,
    {
        self.mate
            .iter()
            .all(|(u, v)| self.mate.get(v) == Some(u) && graph.has_edge(u, v))
            && self.mate.len() == 2 * self.cardinality
    }
}

/// Algorithm used by [`MaximumBipartiteMatching`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BipartiteMatchingStrategy {
    /// Phases of vertex-disjoint shortest augmenting paths in `O(m sqrt(n))`
    #[default]
    HopcroftKarp,
    /// One augmenting path per free left node in `O(n m)`
    AugmentingPath,
    /// Unit-capacity network with a virtual source and sink solved by [`FordFulkerson`]
    MaxFlow,
}

/// Maximum matching of an undirected bipartite graph.
///
/// The sides are taken from the two-coloring computed by [`Bipartite`], i.e. nodes of color `0`
/// form the left side. Fails with [`GraphError::DirectedMisuse`] or [`GraphError::NotBipartite`].
pub struct MaximumBipartiteMatching<'a, G> {
    graph: &'a G,
    strategy: BipartiteMatchingStrategy,
}

impl<'a, G> MaximumBipartiteMatching<'a, G>
where
    G: AdjacencyList + AdjacencyTest,
{
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            strategy: BipartiteMatchingStrategy::default(),
        }
    }

    pub fn strategy(mut self, strategy: BipartiteMatchingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn run(&self) -> Result<Matching<G::Node, G::Weight>> {
        let bipartition = Bipartite::new(self.graph).run()?;
        debug!(
            n = self.graph.number_of_nodes(),
            m = self.graph.number_of_edges(),
            strategy = ?self.strategy,
            "maximum bipartite matching"
        );

        if self.strategy == BipartiteMatchingStrategy::MaxFlow {
            return self.run_max_flow(&bipartition);
        }

        let indexer = Indexer::new(self.graph);
        let adj = indexer.adjacency(self.graph);
        let left = indexer
            .nodes()
            .iter()
            .enumerate()
            .filter(|(_, u)| bipartition.is_on_left_side(u))
            .map(|(i, _)| i)
            .collect_vec();

        let mut mate = vec![None; indexer.len()];
        match self.strategy {
            BipartiteMatchingStrategy::HopcroftKarp => hopcroft_karp(&adj, &left, &mut mate),
            _ => augmenting_paths(&adj, &left, &mut mate),
        }

        let pairs = left
            .iter()
            .filter_map(|&u| mate[u].map(|v| (indexer.node(u).clone(), indexer.node(v).clone())));
        Ok(Matching::from_pairs(self.graph, pairs))
    }

    fn run_max_flow(
        &self,
        bipartition: &Bipartition<G::Node>,
    ) -> Result<Matching<G::Node, G::Weight>> {
        let mut network: AdjMap<Terminal<G::Node>, G::Weight> = AdjMap::directed();
        network.add_nodes([Terminal::Source, Terminal::Sink]);
        let unit = G::Weight::one();

        for u in self.graph.vertices() {
            if bipartition.is_on_left_side(&u) {
                network.add_edge((Terminal::Source, Terminal::Inner(u.clone()), unit))?;
                for v in self.graph.neighbors_of(&u) {
                    network.add_edge((Terminal::Inner(u.clone()), Terminal::Inner(v), unit))?;
                }
            } else {
                network.add_edge((Terminal::Inner(u), Terminal::Sink, unit))?;
            }
        }

        let flow = FordFulkerson::new(&network).run(&Terminal::Source, &Terminal::Sink)?;
        trace!(augmentations = flow.augmentations, "unit network saturated");

        let pairs = flow.flow.into_keys().filter_map(|pair| match pair {
            (Terminal::Inner(u), Terminal::Inner(v)) => Some((u, v)),
            _ => None,
        });
        Ok(Matching::from_pairs(self.graph, pairs))
    }
}

/// Nodes of the unit network built for flow-based matching
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Terminal<N> {
    Source,
    Inner(N),
    Sink,
}

const UNREACHED: usize = usize::MAX;

fn hopcroft_karp(adj: &[Vec<usize>], left: &[usize], mate: &mut [Option<usize>]) {
    let mut layer = vec![UNREACHED; adj.len()];
    let mut phase = 0;
    while let Some(limit) = layer_free_nodes(adj, left, mate, &mut layer) {
        let mut augmented = 0;
        for &u in left {
            if mate[u].is_none() && augment_along_layers(adj, u, limit, mate, &mut layer) {
                augmented += 1;
            }
        }
        phase += 1;
        trace!(phase, limit, augmented, "hopcroft-karp phase");
    }
}

/// BFS from all free left nodes along alternating paths.
/// Returns the length of the shortest augmenting path or `None` if there is none.
fn layer_free_nodes(
    adj: &[Vec<usize>],
    left: &[usize],
    mate: &[Option<usize>],
    layer: &mut [usize],
) -> Option<usize> {
    let mut queue = VecDeque::new();
    for &u in left {
        if mate[u].is_none() {
            layer[u] = 0;
            queue.push_back(u);
        } else {
            layer[u] = UNREACHED;
        }
    }

    let mut limit = UNREACHED;
    while let Some(u) = queue.pop_front() {
        if layer[u] >= limit {
            continue;
        }
        for &v in &adj[u] {
            match mate[v] {
                None => limit = limit.min(layer[u] + 1),
                Some(w) if layer[w] == UNREACHED => {
                    layer[w] = layer[u] + 1;
                    queue.push_back(w);
                }
                Some(_) => {}
            }
        }
    }

    (limit != UNREACHED).then_some(limit)
}

/// Flips the matching along the path of search frames; frame `(u, i)` reached its successor
/// through `adj[u][i - 1]`
fn flip_along(adj: &[Vec<usize>], frames: &[(usize, usize)], mate: &mut [Option<usize>]) {
    for &(u, i) in frames {
        let v = adj[u][i - 1];
        mate[u] = Some(v);
        mate[v] = Some(u);
    }
}

/// DFS along the BFS layers; nodes that cannot reach a free right node are retired
fn augment_along_layers(
    adj: &[Vec<usize>],
    root: usize,
    limit: usize,
    mate: &mut [Option<usize>],
    layer: &mut [usize],
) -> bool {
    let mut frames = vec![(root, 0)];
    while let Some(&(u, i)) = frames.last() {
        let Some(&v) = adj[u].get(i) else {
            layer[u] = UNREACHED;
            frames.pop();
            continue;
        };
        if let Some(frame) = frames.last_mut() {
            frame.1 += 1;
        }
        match mate[v] {
            None if layer[u] + 1 == limit => {
                flip_along(adj, &frames, mate);
                return true;
            }
            Some(w) if layer[w] == layer[u] + 1 => frames.push((w, 0)),
            _ => {}
        }
    }
    false
}

fn augmenting_paths(adj: &[Vec<usize>], left: &[usize], mate: &mut [Option<usize>]) {
    for &u in left {
        let mut visited = IndexBitSet::new(adj.len() as NodeIndex);
        if try_kuhn(adj, u, mate, &mut visited) {
            trace!(u, "augmented");
        }
    }
}

fn try_kuhn(
    adj: &[Vec<usize>],
    root: usize,
    mate: &mut [Option<usize>],
    visited: &mut IndexBitSet,
) -> bool {
    let mut frames = vec![(root, 0)];
    while let Some(&(u, i)) = frames.last() {
        let Some(&v) = adj[u].get(i) else {
            frames.pop();
            continue;
        };
        if let Some(frame) = frames.last_mut() {
            frame.1 += 1;
        }
        if visited.set_bit(v as NodeIndex) {
            continue;
        }
        match mate[v] {
            None => {
                flip_along(adj, &frames, mate);
                return true;
            }
            Some(w) => frames.push((w, 0)),
        }
    }
    false
}

/// Order in which [`GreedyMatching`] considers edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GreedyOrder {
    /// Edges `(u, v)` with `u < v` in lexicographic order
    #[default]
    Unordered,
    /// Edges in non-decreasing weight order, ties broken by endpoints
    MinWeight,
}

/// Greedy maximal matching: scans edges and matches both endpoints if both are free.
///
/// The result is maximal and thus contains at least half as many edges as a maximum matching.
/// With [`GreedyOrder::MinWeight`] it yields a light but not necessarily minimum-weight matching.
pub struct GreedyMatching<'a, G> {
    graph: &'a G,
    order: GreedyOrder,
}

impl<'a, G> GreedyMatching<'a, G>
where
    G: AdjacencyList + AdjacencyTest,
{
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            order: GreedyOrder::default(),
        }
    }

    pub fn order(mut self, order: GreedyOrder) -> Self {
        self.order = order;
        self
    }

    /// Fails with [`GraphError::DirectedMisuse`] for directed graphs
    pub fn run(&self) -> Result<Matching<G::Node, G::Weight>> {
        self.graph.require_undirected()?;
        debug!(
            n = self.graph.number_of_nodes(),
            m = self.graph.number_of_edges(),
            order = ?self.order,
            "greedy matching"
        );

        let mut matched = BTreeSet::new();
        let mut pairs = Vec::new();
        let mut consider = |e: EdgeOf<G>| {
            if !matched.contains(&e.source) && !matched.contains(&e.target) {
                matched.insert(e.source.clone());
                matched.insert(e.target.clone());
                pairs.push((e.source, e.target));
            }
        };

        match self.order {
            GreedyOrder::Unordered => self.graph.edges().for_each(&mut consider),
            GreedyOrder::MinWeight => {
                let mut heap: BinaryHeap<_> = self.graph.edges().map(Reverse).collect();
                while let Some(Reverse(e)) = heap.pop() {
                    consider(e);
                }
            }
        }

        Ok(Matching::from_pairs(self.graph, pairs))
    }
}

/// Matchings directly on graphs
pub trait MatchingExt: AdjacencyList + AdjacencyTest + Sized {
    /// Greedy maximal matching of an undirected graph
    fn maximal_matching(&self) -> Result<Matching<Self::Node, Self::Weight>> {
        GreedyMatching::new(self).run()
    }

    /// Maximum matching of an undirected bipartite graph by Hopcroft–Karp
    fn maximum_bipartite_matching(&self) -> Result<Matching<Self::Node, Self::Weight>> {
        MaximumBipartiteMatching::new(self).run()
    }
}

impl<G> MatchingExt for G where G: AdjacencyList + AdjacencyTest + Sized {}
