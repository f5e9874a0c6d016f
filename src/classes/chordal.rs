/*!
# Chordal Graphs

A graph is *chordal* if every cycle of length at least four has a chord. Equivalently it admits
a **perfect elimination ordering** (PEO): an ordering of the nodes in which the later neighbors
of every node form a clique.

- [`ChordalOrderings`] computes candidate orderings of undirected graphs by maximum cardinality
  search and lexicographic BFS (both are PEOs exactly if the graph is chordal), minimum degree
  orderings, and verifies PEOs in linear time.
- [`PeoSearch`] returns a verified [`PerfectEliminationOrder`] or fails with
  [`GraphError::NotChordal`]. Given the order, maximum cliques, all maximal cliques, maximum
  independent sets, optimal colorings and tree decompositions are computed in (near) linear time.

```
use graphtheory::{prelude::*, classes::chordal::*};

// two triangles sharing the edge {1, 2}
let g: AdjMap<Node> = AdjMap::from_edges(false, [(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)]).unwrap();
let peo = PeoSearch::new(&g).run().unwrap();

assert!(g.is_peo(&peo.order));
assert_eq!(peo.maximum_clique().len(), 3);
assert_eq!(peo.maximal_cliques().len(), 2);
```
*/

use std::collections::BTreeSet;

use itertools::Itertools;
use tracing::{debug, trace};

use super::{treedec::*, *};

/// Index of every node in `order`
fn positions(order: &[usize]) -> Vec<usize> {
    let mut position = vec![0; order.len()];
    for (i, &u) in order.iter().enumerate() {
        position[u] = i;
    }
    position
}

/// Maximum cardinality search: visits a node with the most visited neighbors next.
/// Returns the reversed visit order.
pub(crate) fn mcs_order(adj: &[Vec<usize>]) -> Vec<usize> {
    let mut queue = BucketQueue::from_keys((0..adj.len()).map(|u| (u, 0)));
    let mut order = Vec::with_capacity(adj.len());
    while let Some((u, visited_neighbors)) = queue.pop_max() {
        trace!(u, visited_neighbors, "mcs visit");
        for v in &adj[u] {
            queue.increment(v);
        }
        order.push(u);
    }
    order.reverse();
    order
}

/// Lexicographic BFS: visits the node with the lexicographically largest label next, where labels
/// collect the (decreasing) visit numbers of visited neighbors. Returns the reversed visit order.
fn lex_bfs_order(adj: &[Vec<usize>]) -> Vec<usize> {
    let n = adj.len();
    let mut label: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);

    for step in 0..n {
        let Some(u) = (0..n)
            .filter(|&u| !visited[u])
            .max_by(|&a, &b| label[a].cmp(&label[b]).then(b.cmp(&a)))
        else {
            break;
        };
        visited[u] = true;
        for &v in &adj[u] {
            if !visited[v] {
                label[v].push(n - step);
            }
        }
        order.push(u);
    }
    order.reverse();
    order
}

/// Repeatedly removes a node of minimum remaining degree
fn minimum_degree_order(adj: &[Vec<usize>]) -> Vec<usize> {
    let mut queue = BucketQueue::from_keys(adj.iter().map(Vec::len).enumerate());
    let mut order = Vec::with_capacity(adj.len());
    while let Some((u, _)) = queue.pop_min() {
        for v in &adj[u] {
            queue.decrement(v);
        }
        order.push(u);
    }
    order
}

/// Later neighbors of every node, indexed by position in `order` and sorted by position
fn later_neighbors(adj: &[Vec<usize>], order: &[usize]) -> Vec<Vec<usize>> {
    let position = positions(order);
    order
        .iter()
        .enumerate()
        .map(|(i, &u)| {
            adj[u]
                .iter()
                .map(|&v| position[v])
                .filter(|&j| j > i)
                .sorted()
                .collect()
        })
        .collect()
}

/// Linear-time PEO test: the later neighbors of `v` except the first one `p` must be
/// neighbors of `p`; sorted adjacency lists answer the membership queries.
pub(crate) fn is_peo_indexed(adj: &[Vec<usize>], order: &[usize]) -> bool {
    let n = adj.len();
    if order.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    if order.iter().any(|&u| u >= n || std::mem::replace(&mut seen[u], true)) {
        return false;
    }

    let later = later_neighbors(adj, order);
    later.iter().all(|nbs| {
        let Some((&parent, rest)) = nbs.split_first() else {
            return true;
        };
        let p = order[parent];
        rest.iter()
            .all(|&j| adj[p].binary_search(&order[j]).is_ok())
    })
}

/// Adds fill edges such that `order` becomes a PEO; returns the added edges
pub(crate) fn eliminate(adj: &mut [Vec<usize>], order: &[usize]) -> Vec<(usize, usize)> {
    let position = positions(order);
    let mut sets: Vec<BTreeSet<usize>> = adj.iter().map(|nbs| nbs.iter().copied().collect()).collect();
    let mut fill = Vec::new();

    for &u in order {
        let later = sets[u]
            .iter()
            .copied()
            .filter(|&v| position[v] > position[u])
            .collect_vec();
        for (a, b) in later.iter().copied().tuple_combinations() {
            if sets[a].insert(b) {
                sets[b].insert(a);
                fill.push((a.min(b), a.max(b)));
            }
        }
    }

    for (nbs, set) in adj.iter_mut().zip(sets) {
        *nbs = set.into_iter().collect();
    }
    fill
}

/// Elimination orderings directly on graphs
pub trait ChordalOrderings: AdjacencyList + Sized {
    /// Reversed maximum cardinality search order; a PEO if and only if the graph is chordal.
    /// Fails with [`GraphError::DirectedMisuse`] for directed graphs.
    fn mcs_order(&self) -> Result<Vec<Self::Node>> {
        self.require_undirected()?;
        let indexer = Indexer::new(self);
        Ok(indexer.nodes_of(&mcs_order(&indexer.adjacency(self))))
    }

    /// Reversed lexicographic BFS order; a PEO if and only if the graph is chordal.
    /// Fails with [`GraphError::DirectedMisuse`] for directed graphs.
    fn lex_bfs_order(&self) -> Result<Vec<Self::Node>> {
        self.require_undirected()?;
        let indexer = Indexer::new(self);
        Ok(indexer.nodes_of(&lex_bfs_order(&indexer.adjacency(self))))
    }

    /// Order of repeatedly removing a node of minimum remaining degree (degeneracy order).
    /// Fails with [`GraphError::DirectedMisuse`] for directed graphs.
    fn minimum_degree_order(&self) -> Result<Vec<Self::Node>> {
        self.require_undirected()?;
        let indexer = Indexer::new(self);
        Ok(indexer.nodes_of(&minimum_degree_order(&indexer.adjacency(self))))
    }

    /// Returns *true* if `order` is a permutation of the nodes in which the later neighbors of
    /// every node form a clique
    fn is_peo(&self, order: &[Self::Node]) -> bool {
        let indexer = Indexer::new(self);
        let Some(order) = order
            .iter()
            .map(|u| indexer.index_of(u))
            .collect::<Option<Vec<_>>>()
        else {
            return false;
        };
        is_peo_indexed(&indexer.adjacency(self), &order)
    }

    /// Returns *true* if the graph is undirected and chordal
    fn is_chordal(&self) -> bool {
        PeoSearch::new(self).run().is_ok()
    }
}

impl<G> ChordalOrderings for G where G: AdjacencyList + Sized {}

/// Search used by [`PeoSearch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeoStrategy {
    /// Maximum cardinality search in `O(n + m)`
    #[default]
    MaximumCardinality,
    /// Lexicographic BFS with explicit labels in `O(n^2)`
    LexBfs,
}

/// Computes and verifies a perfect elimination ordering of an undirected graph
pub struct PeoSearch<'a, G> {
    graph: &'a G,
    strategy: PeoStrategy,
}

impl<'a, G> PeoSearch<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            strategy: PeoStrategy::default(),
        }
    }

    pub fn strategy(mut self, strategy: PeoStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Fails with [`GraphError::DirectedMisuse`] for directed graphs and with
    /// [`GraphError::NotChordal`] if the computed order is not perfect
    pub fn run(&self) -> Result<PerfectEliminationOrder<G::Node>> {
        self.graph.require_undirected()?;
        debug!(
            n = self.graph.number_of_nodes(),
            m = self.graph.number_of_edges(),
            strategy = ?self.strategy,
            "perfect elimination order"
        );

        let indexer = Indexer::new(self.graph);
        let adj = indexer.adjacency(self.graph);
        let order = match self.strategy {
            PeoStrategy::MaximumCardinality => mcs_order(&adj),
            PeoStrategy::LexBfs => lex_bfs_order(&adj),
        };
        ensure!(is_peo_indexed(&adj, &order), GraphError::NotChordal);

        Ok(PerfectEliminationOrder {
            later: later_neighbors(&adj, &order),
            order: indexer.nodes_of(&order),
        })
    }
}

/// A verified perfect elimination ordering together with the later neighborhoods
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerfectEliminationOrder<N> {
    pub order: Vec<N>,
    /// Positions of the later neighbors of the node at every position
    later: Vec<Vec<usize>>,
}

impl<N: NodeId> PerfectEliminationOrder<N> {
    /// Clique formed by the node at position `i` and its later neighbors
    fn clique_at(&self, i: usize) -> BTreeSet<N> {
        std::iter::once(i)
            .chain(self.later[i].iter().copied())
            .map(|j| self.order[j].clone())
            .collect()
    }

    /// A clique of maximum size; empty for the empty graph
    pub fn maximum_clique(&self) -> BTreeSet<N> {
        (0..self.order.len())
            .rev()
            .max_by_key(|&i| self.later[i].len())
            .map(|i| self.clique_at(i))
            .unwrap_or_default()
    }

    /// All maximal cliques in elimination order.
    ///
    /// The clique of `v` and its later neighbors is not maximal exactly if it is contained in the
    /// clique of some earlier `u` whose first later neighbor is `v`.
    pub fn maximal_cliques(&self) -> Vec<BTreeSet<N>> {
        let n = self.order.len();
        let mut maximal = vec![true; n];
        for i in 0..n {
            if let Some(&p) = self.later[i].first() {
                if self.later[i].len() == self.later[p].len() + 1 {
                    maximal[p] = false;
                }
            }
        }
        (0..n)
            .filter(|&i| maximal[i])
            .map(|i| self.clique_at(i))
            .collect()
    }

    /// Maximum independent set: scans the order and takes every node none of whose earlier
    /// neighbors was taken
    pub fn maximum_independent_set(&self) -> IndependentSet<N> {
        let mut blocked = vec![false; self.order.len()];
        let mut set = BTreeSet::new();
        for (i, u) in self.order.iter().enumerate() {
            if blocked[i] {
                continue;
            }
            for &j in &self.later[i] {
                blocked[j] = true;
            }
            set.insert(u.clone());
        }
        IndependentSet::new(set)
    }

    /// Optimal coloring: greedy in reverse elimination order uses as many colors as the
    /// maximum clique has nodes
    pub fn coloring(&self) -> Coloring<N> {
        let n = self.order.len();
        let mut color = vec![0; n];
        let mut saturation = Saturation::new(n);
        for i in (0..n).rev() {
            color[i] = saturation.least_free(self.later[i].iter().map(|&j| color[j]));
        }

        let colors = color.iter().max().map_or(0, |&c| c + 1);
        Coloring {
            color: self.order.iter().cloned().zip(color).collect(),
            colors,
        }
    }

    /// Tree decomposition whose bags are the maximal cliques, joined along a maximum-weight
    /// spanning tree of the clique intersection graph; its width is the clique number minus one
    pub fn tree_decomposition(&self) -> Result<TreeDecomposition<N>> {
        let cliques = self.maximal_cliques();
        let mut intersections: AdjMap<Bag<N>> = AdjMap::undirected();
        intersections.add_nodes(cliques.iter().cloned());
        for (a, b) in cliques.iter().tuple_combinations() {
            let shared = a.intersection(b).count() as i64;
            if shared > 0 {
                intersections.add_edge((a.clone(), b.clone(), -shared))?;
            }
        }

        let forest = Kruskal::new(&intersections).run()?;
        let mut tree: AdjMap<Bag<N>> = AdjMap::undirected();
        tree.add_nodes(cliques);
        for e in forest.mst {
            tree.add_edge((e.source, e.target))?;
        }

        // bags of different components share no node and may be joined arbitrarily
        let roots = tree
            .connected_components()?
            .components()
            .into_iter()
            .filter_map(|component| component.into_iter().next())
            .collect_vec();
        for (a, b) in roots.into_iter().tuple_windows() {
            tree.add_edge((a, b))?;
        }

        trace!(bags = tree.number_of_nodes(), "clique tree");
        Ok(TreeDecomposition::new(tree))
    }
}

/// Size of a maximum clique of a chordal graph.
/// Fails with [`GraphError::NotChordal`] for other graphs.
pub fn clique_number<G>(graph: &G) -> Result<usize>
where
    G: AdjacencyList,
{
    Ok(PeoSearch::new(graph).run()?.maximum_clique().len())
}
