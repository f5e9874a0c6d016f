/*!
# Shortest Paths

Single-source algorithms return a [`ShortestPaths`] (distance and parent per reached node),
all-pairs algorithms return a [`DistanceMatrix`]. Unreachable nodes have no distance.

| Algorithm                | Weights                | Negative cycles          |
|--------------------------|------------------------|--------------------------|
| [`Dijkstra`]             | non-negative           | -                        |
| [`BellmanFord`]          | arbitrary              | [`GraphError::NegativeCycle`] |
| [`DagShortestPaths`]     | arbitrary (DAG only)   | impossible               |
| [`FloydWarshall`]        | arbitrary              | [`GraphError::NegativeCycle`] |
| [`Johnson`]              | arbitrary              | [`GraphError::NegativeCycle`] |
| [`MinPlusAllPairs`]      | arbitrary              | [`GraphError::NegativeCycle`] |

The index-space kernels in this module are shared: Johnson runs the Bellman–Ford kernel from a
virtual source and then the Dijkstra kernel on reweighted edges.
*/

use std::{
    cmp::Reverse,
    collections::{BTreeMap, BinaryHeap},
};

use num::Zero;
use tracing::trace;

use super::*;

mod bellman_ford;
mod dag;
mod dijkstra;
mod floyd_warshall;
mod johnson;
mod minplus;

pub use bellman_ford::*;
pub use dag::*;
pub use dijkstra::*;
pub use floyd_warshall::*;
pub use johnson::*;
pub use minplus::*;

/// Result of a single-source shortest path computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortestPaths<N, W> {
    pub source: N,
    /// Length of a shortest path from the source to every reached node
    pub distance: BTreeMap<N, W>,
    /// Predecessor on a shortest path; the source maps to `None`
    pub parent: BTreeMap<N, Option<N>>,
}

impl<N: NodeId, W: Weight> ShortestPaths<N, W> {
    /// Returns a shortest path from the source to `target`.
    /// Fails with [`GraphError::NoPathToTarget`] if `target` is unreachable.
    pub fn path(&self, target: &N) -> Result<Vec<N>> {
        reconstruct_path(&self.parent, target)
    }

    /// Returns the distance to `target` or `None` if it is unreachable
    pub fn distance_to(&self, target: &N) -> Option<W> {
        self.distance.get(target).copied()
    }

    /// Translates index-space distances and parents into node space
    fn from_indexed(
        indexer: &Indexer<N>,
        source: N,
        distance: Vec<Option<W>>,
        parent: Vec<Option<usize>>,
    ) -> Self {
        let mut out = Self {
            source,
            distance: BTreeMap::new(),
            parent: BTreeMap::new(),
        };
        for (i, (d, p)) in distance.into_iter().zip(parent).enumerate() {
            if let Some(d) = d {
                let u = indexer.node(i).clone();
                out.parent.insert(u.clone(), p.map(|p| indexer.node(p).clone()));
                out.distance.insert(u, d);
            }
        }
        out
    }
}

/// Result of an all-pairs shortest path computation
#[derive(Clone, Debug)]
pub struct DistanceMatrix<N, W> {
    indexer: Indexer<N>,
    distance: Vec<Vec<Option<W>>>,
    /// `parent[i][j]` is the predecessor of `j` on a shortest path from `i`
    parent: Vec<Vec<Option<usize>>>,
}

impl<N: NodeId, W: Weight> DistanceMatrix<N, W> {
    /// Nodes in the order of the rows
    pub fn nodes(&self) -> &[N] {
        self.indexer.nodes()
    }

    /// Returns the length of a shortest path from `u` to `v` or `None` if `v` is unreachable
    pub fn distance(&self, u: &N, v: &N) -> Option<W> {
        let i = self.indexer.index_of(u)?;
        let j = self.indexer.index_of(v)?;
        self.distance[i][j]
    }

    /// Returns the distances from `u` to all nodes reachable from `u`
    pub fn distances_from(&self, u: &N) -> BTreeMap<N, W> {
        let Some(i) = self.indexer.index_of(u) else {
            return BTreeMap::new();
        };
        self.distance[i]
            .iter()
            .enumerate()
            .filter_map(|(j, d)| Some((self.indexer.node(j).clone(), (*d)?)))
            .collect()
    }

    /// Returns a shortest path from `u` to `v`.
    /// Fails with [`GraphError::NoPathToTarget`] if `v` is unreachable from `u`.
    pub fn path(&self, u: &N, v: &N) -> Result<Vec<N>> {
        let (Some(i), Some(j)) = (self.indexer.index_of(u), self.indexer.index_of(v)) else {
            return Err(GraphError::no_path_to(v));
        };
        ensure!(self.distance[i][j].is_some(), GraphError::no_path_to(v));

        let mut path = vec![j];
        let mut current = j;
        while current != i {
            let Some(p) = self.parent[i][current] else {
                return Err(GraphError::no_path_to(v));
            };
            path.push(p);
            current = p;
            ensure!(
                path.len() <= self.indexer.len(),
                GraphError::invalid_argument("parent matrix contains a cycle")
            );
        }
        path.reverse();
        Ok(self.indexer.nodes_of(&path))
    }

    fn from_indexed(indexer: Indexer<N>, distance: Vec<Vec<Option<W>>>, parent: Vec<Vec<Option<usize>>>) -> Result<Self> {
        ensure!(
            (0..distance.len()).all(|i| distance[i][i].is_none_or(|d| d >= W::zero())),
            GraphError::NegativeCycle
        );
        Ok(Self {
            indexer,
            distance,
            parent,
        })
    }
}

/// Two matrices are equal if they agree on the node order and on every distance
impl<N: NodeId, W: Weight> PartialEq for DistanceMatrix<N, W> {
    fn eq(&self, other: &Self) -> bool {
        self.nodes() == other.nodes() && self.distance == other.distance
    }
}

/// Fails with [`GraphError::NegativeWeight`] on the first edge of negative weight
pub(crate) fn check_non_negative<G: AdjacencyList>(graph: &G) -> Result<()> {
    match graph.edges().find(|e| e.weight < G::Weight::zero()) {
        Some(e) => Err(GraphError::negative_weight(&e.source, &e.target)),
        None => Ok(()),
    }
}

/// Initial all-pairs matrices: zero on the diagonal and the edge weights elsewhere
fn edge_matrices<W: Weight>(adj: &[Vec<(usize, W)>]) -> (Vec<Vec<Option<W>>>, Vec<Vec<Option<usize>>>) {
    let n = adj.len();
    let mut distance = vec![vec![None; n]; n];
    let mut parent = vec![vec![None; n]; n];
    for (i, nbs) in adj.iter().enumerate() {
        distance[i][i] = Some(W::zero());
        for &(j, w) in nbs {
            if j != i {
                distance[i][j] = Some(w);
                parent[i][j] = Some(i);
            }
        }
    }
    (distance, parent)
}

/// Heap-based Dijkstra in index space.
///
/// Entries of settled nodes are stale and skipped on pop; ties are broken by the smaller index.
/// Returns the index and target of the first negative edge that gets relaxed as error.
fn dijkstra_indexed<W: Weight>(
    adj: &[Vec<(usize, W)>],
    source: usize,
) -> std::result::Result<(Vec<Option<W>>, Vec<Option<usize>>), (usize, usize)> {
    let n = adj.len();
    let mut distance = vec![None; n];
    let mut parent = vec![None; n];
    let mut settled = vec![false; n];
    distance[source] = Some(W::zero());

    let mut heap = BinaryHeap::from([Reverse((W::zero(), source))]);
    while let Some(Reverse((d, u))) = heap.pop() {
        if settled[u] {
            continue;
        }
        settled[u] = true;

        for &(v, w) in &adj[u] {
            if w < W::zero() {
                return Err((u, v));
            }
            let candidate = d + w;
            if !settled[v] && distance[v].is_none_or(|dv| candidate < dv) {
                distance[v] = Some(candidate);
                parent[v] = Some(u);
                heap.push(Reverse((candidate, v)));
            }
        }
    }
    Ok((distance, parent))
}

/// Bellman–Ford relaxation rounds in index space starting from the given tentative distances.
///
/// Runs at most `n - 1` rounds (stopping early once nothing changes) and one detection round.
fn bellman_ford_indexed<W: Weight>(
    adj: &[Vec<(usize, W)>],
    mut distance: Vec<Option<W>>,
) -> Result<(Vec<Option<W>>, Vec<Option<usize>>)> {
    let n = adj.len();
    let mut parent = vec![None; n];

    let relax_all = |distance: &mut Vec<Option<W>>, parent: &mut Vec<Option<usize>>| {
        let mut changed = false;
        for (u, nbs) in adj.iter().enumerate() {
            let Some(du) = distance[u] else {
                continue;
            };
            for &(v, w) in nbs {
                let candidate = du + w;
                if distance[v].is_none_or(|dv| candidate < dv) {
                    distance[v] = Some(candidate);
                    parent[v] = Some(u);
                    changed = true;
                }
            }
        }
        changed
    };

    for round in 1..n.max(1) {
        let changed = relax_all(&mut distance, &mut parent);
        trace!(round, changed, "bellman-ford round");
        if !changed {
            return Ok((distance, parent));
        }
    }
    ensure!(!relax_all(&mut distance, &mut parent), GraphError::NegativeCycle);
    Ok((distance, parent))
}

/// Shortest path queries directly on graphs
pub trait ShortestPathsExt: AdjacencyList + Sized {
    /// Shortest paths by Dijkstra's algorithm (non-negative weights)
    fn dijkstra(&self, source: &Self::Node) -> Result<ShortestPaths<Self::Node, Self::Weight>> {
        Dijkstra::new(self).run(source)
    }

    /// Shortest paths by the Bellman–Ford algorithm
    fn bellman_ford(&self, source: &Self::Node) -> Result<ShortestPaths<Self::Node, Self::Weight>> {
        BellmanFord::new(self).run(source)
    }

    /// All-pairs shortest paths by the Floyd–Warshall algorithm
    fn all_pairs_shortest_paths(&self) -> Result<DistanceMatrix<Self::Node, Self::Weight>> {
        FloydWarshall::new(self).run()
    }

    /// Returns a shortest path by Dijkstra's algorithm or `None` if `target` is unreachable
    fn shortest_path(&self, source: &Self::Node, target: &Self::Node) -> Result<Option<Vec<Self::Node>>> {
        let paths = self.dijkstra(source)?;
        Ok(paths.path(target).ok())
    }
}

impl<G> ShortestPathsExt for G where G: AdjacencyList + Sized {}

/// Index of `source` or [`GraphError::NodeNotFound`]
fn index_of_source<N: NodeId>(indexer: &Indexer<N>, source: &N) -> Result<usize> {
    indexer
        .index_of(source)
        .ok_or_else(|| GraphError::node_not_found(source))
}
