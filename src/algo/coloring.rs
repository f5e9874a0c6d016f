/*!
# Node Coloring

A *proper coloring* assigns colors `0, 1, 2, ...` to the nodes of an undirected graph such
that adjacent nodes receive distinct colors. The sequential strategies share one greedy step:
a node receives the least color not used by its already colored neighbors (its *saturation*).

| Strategy | Node order / method |
|---|---|
| [`ColoringStrategy::Unordered`] | node iteration order |
| [`ColoringStrategy::Random`] | seeded shuffle |
| [`ColoringStrategy::LargestFirst`] | nonincreasing degree |
| [`ColoringStrategy::SmallestLast`] | reverse of a minimum-degree peeling (degeneracy) order |
| [`ColoringStrategy::Saturation`] | DSATUR: largest saturation first, ties by degree |
| [`ColoringStrategy::RecursiveLargestFirst`] | one color per greedily grown independent set |
| [`ColoringStrategy::GreedyIndependentSets`] | one color per minimum-degree maximal independent set |
| [`ColoringStrategy::Backtracking`] | depth-first search with a fixed palette |
| [`ColoringStrategy::Exact`] | backtracking with palettes of increasing size |
*/

use std::{
    cmp::Reverse,
    collections::{BTreeMap, BTreeSet},
};

use itertools::Itertools;
use rand::{SeedableRng, seq::SliceRandom};
use rand_pcg::Pcg64Mcg;
use tracing::{debug, trace};

use super::*;
use crate::gens::DEFAULT_SEED;

/// A proper node coloring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coloring<N> {
    pub color: BTreeMap<N, usize>,
    /// Number of distinct colors, i.e. one more than the largest color
    pub colors: usize,
}

impl<N: NodeId> Coloring<N> {
    /// Nodes grouped by color
    pub fn color_classes(&self) -> Vec<BTreeSet<N>> {
        let mut classes = vec![BTreeSet::new(); self.colors];
        for (u, &c) in &self.color {
            classes[c].insert(u.clone());
        }
        classes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColoringStrategy {
    #[default]
    Unordered,
    Random,
    LargestFirst,
    SmallestLast,
    Saturation,
    RecursiveLargestFirst,
    GreedyIndependentSets,
    /// Fails with [`GraphError::PaletteExhausted`] if no coloring with `palette` colors exists
    Backtracking {
        palette: usize,
    },
    Exact,
}

/// Reusable buffer of the colors around a node; unmarked after every query
pub(crate) struct Saturation {
    marked: Vec<bool>,
    touched: Vec<usize>,
}

impl Saturation {
    /// Buffer able to answer queries with up to `max_colors` distinct colors
    pub(crate) fn new(max_colors: usize) -> Self {
        Self {
            marked: vec![false; max_colors + 1],
            touched: Vec::new(),
        }
    }

    /// Least color not contained in `colors`
    pub(crate) fn least_free(&mut self, colors: impl IntoIterator<Item = usize>) -> usize {
        for c in colors {
            if c >= self.marked.len() {
                self.marked.resize(c + 1, false);
            }
            if !self.marked[c] {
                self.marked[c] = true;
                self.touched.push(c);
            }
        }

        let free = self
            .marked
            .iter()
            .position(|&m| !m)
            .unwrap_or(self.marked.len());

        for c in self.touched.drain(..) {
            self.marked[c] = false;
        }
        free
    }
}

/// Node coloring of an undirected graph
pub struct NodeColoring<'a, G> {
    graph: &'a G,
    strategy: ColoringStrategy,
    seed: u64,
}

impl<'a, G> NodeColoring<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            strategy: ColoringStrategy::default(),
            seed: DEFAULT_SEED,
        }
    }

    pub fn strategy(mut self, strategy: ColoringStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Seed of [`ColoringStrategy::Random`]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Fails with [`GraphError::DirectedMisuse`] for directed graphs
    pub fn run(&self) -> Result<Coloring<G::Node>> {
        self.run_with::<BucketQueue<usize>>()
    }

    /// As [`NodeColoring::run`] with an explicit degree queue for [`ColoringStrategy::SmallestLast`]
    pub fn run_with<Q: DegreeQueue<usize>>(&self) -> Result<Coloring<G::Node>> {
        self.graph.require_undirected()?;
        debug!(
            n = self.graph.number_of_nodes(),
            m = self.graph.number_of_edges(),
            strategy = ?self.strategy,
            "node coloring"
        );

        let indexer = Indexer::new(self.graph);
        let adj = indexer.adjacency(self.graph);
        let n = adj.len();
        let by_degree = || {
            (0..n)
                .sorted_by_key(|&u| Reverse(adj[u].len()))
                .collect_vec()
        };

        let color = match self.strategy {
            ColoringStrategy::Unordered => sequential(&adj, 0..n),
            ColoringStrategy::Random => {
                let mut order = (0..n).collect_vec();
                order.shuffle(&mut Pcg64Mcg::seed_from_u64(self.seed));
                sequential(&adj, order)
            }
            ColoringStrategy::LargestFirst => sequential(&adj, by_degree()),
            ColoringStrategy::SmallestLast => sequential(&adj, smallest_last_order::<Q>(&adj)),
            ColoringStrategy::Saturation => saturation_largest_first(&adj),
            ColoringStrategy::RecursiveLargestFirst => recursive_largest_first(&adj),
            ColoringStrategy::GreedyIndependentSets => greedy_independent_sets(&adj),
            ColoringStrategy::Backtracking { palette } => {
                backtracking(&adj, &by_degree(), palette)
                    .ok_or(GraphError::PaletteExhausted { palette })?
            }
            ColoringStrategy::Exact => {
                let order = by_degree();
                let lower = usize::from(n > 0);
                (lower..=n)
                    .find_map(|palette| {
                        trace!(palette, "trying palette");
                        backtracking(&adj, &order, palette)
                    })
                    .unwrap_or_default()
            }
        };

        let colors = color.iter().max().map_or(0, |&c| c + 1);
        let color = color
            .into_iter()
            .enumerate()
            .map(|(u, c)| (indexer.node(u).clone(), c))
            .collect();
        Ok(Coloring { color, colors })
    }
}

/// Colors nodes in the given order with the least free color
fn sequential(adj: &[Vec<usize>], order: impl IntoIterator<Item = usize>) -> Vec<usize> {
    let mut color: Vec<Option<usize>> = vec![None; adj.len()];
    let mut saturation = Saturation::new(adj.len());
    for u in order {
        color[u] = Some(saturation.least_free(adj[u].iter().filter_map(|&v| color[v])));
    }
    color.into_iter().map(Option::unwrap_or_default).collect()
}

/// Nodes in reverse order of repeatedly deleting a node of minimum remaining degree
fn smallest_last_order<Q: DegreeQueue<usize>>(adj: &[Vec<usize>]) -> Vec<usize> {
    let mut queue = Q::from_keys(adj.iter().map(Vec::len).enumerate());
    let mut order = Vec::with_capacity(adj.len());
    while let Some((u, _)) = queue.pop_min() {
        for v in &adj[u] {
            queue.decrement(v);
        }
        order.push(u);
    }
    order.reverse();
    order
}

fn saturation_largest_first(adj: &[Vec<usize>]) -> Vec<usize> {
    let n = adj.len();
    let mut color: Vec<Option<usize>> = vec![None; n];
    let mut neighbor_colors = vec![BTreeSet::new(); n];
    let mut saturation = Saturation::new(n);

    for _ in 0..n {
        let Some(u) = (0..n)
            .filter(|&u| color[u].is_none())
            .max_by_key(|&u| (neighbor_colors[u].len(), adj[u].len(), Reverse(u)))
        else {
            break;
        };
        let c = saturation.least_free(neighbor_colors[u].iter().copied());
        color[u] = Some(c);
        for &v in &adj[u] {
            neighbor_colors[v].insert(c);
        }
    }
    color.into_iter().map(Option::unwrap_or_default).collect()
}

fn degree_within(adj: &[Vec<usize>], u: usize, set: &BTreeSet<usize>) -> usize {
    adj[u].iter().filter(|v| set.contains(v)).count()
}

fn recursive_largest_first(adj: &[Vec<usize>]) -> Vec<usize> {
    let mut color = vec![0; adj.len()];
    let mut uncolored: BTreeSet<usize> = (0..adj.len()).collect();
    let mut current = 0;

    while !uncolored.is_empty() {
        let mut candidates = uncolored.clone();
        let mut excluded = BTreeSet::new();
        let mut next = candidates
            .iter()
            .copied()
            .max_by_key(|&u| (degree_within(adj, u, &uncolored), Reverse(u)));

        while let Some(u) = next {
            color[u] = current;
            uncolored.remove(&u);
            candidates.remove(&u);
            for v in &adj[u] {
                if candidates.remove(v) {
                    excluded.insert(*v);
                }
            }
            next = candidates.iter().copied().max_by_key(|&v| {
                (
                    degree_within(adj, v, &excluded),
                    Reverse(degree_within(adj, v, &candidates)),
                    Reverse(v),
                )
            });
        }

        trace!(color = current, left = uncolored.len(), "color class closed");
        current += 1;
    }
    color
}

fn greedy_independent_sets(adj: &[Vec<usize>]) -> Vec<usize> {
    let mut color = vec![0; adj.len()];
    let mut uncolored: BTreeSet<usize> = (0..adj.len()).collect();
    let mut current = 0;

    while !uncolored.is_empty() {
        let mut available = uncolored.clone();
        while let Some(u) = available
            .iter()
            .copied()
            .min_by_key(|&u| degree_within(adj, u, &available))
        {
            color[u] = current;
            uncolored.remove(&u);
            available.remove(&u);
            for v in &adj[u] {
                available.remove(v);
            }
        }
        current += 1;
    }
    color
}

/// Proper coloring with at most `palette` colors, assigned along `order`.
///
/// Frame `i` of the search stack holds the next color to try for `order[i]` and the number of
/// colors used by `order[..i]`.
fn backtracking(adj: &[Vec<usize>], order: &[usize], palette: usize) -> Option<Vec<usize>> {
    let mut color = vec![None; adj.len()];
    let mut frames = vec![(0usize, 0usize)];

    loop {
        let depth = frames.len() - 1;
        let Some(&u) = order.get(depth) else {
            return Some(color.into_iter().map(Option::unwrap_or_default).collect());
        };
        let frame = frames.last_mut()?;
        let (first, used) = *frame;
        // colors beyond `used` are interchangeable, so only the first one is tried
        let next = (first..palette.min(used + 1))
            .find(|&c| adj[u].iter().all(|&v| color[v] != Some(c)));

        match next {
            Some(c) => {
                frame.0 = c + 1;
                color[u] = Some(c);
                frames.push((0, used.max(c + 1)));
            }
            None => {
                color[u] = None;
                frames.pop();
                if frames.is_empty() {
                    return None;
                }
            }
        }
    }
}

/// Colorings directly on graphs
pub trait Colorable: AdjacencyList + Sized {
    /// Returns *true* if `color` assigns a color to every node and adjacent nodes differ
    fn is_proper_coloring(&self, color: &BTreeMap<Self::Node, usize>) -> bool {
        self.vertices().all(|u| color.contains_key(&u))
            && self
                .edges()
                .all(|e| color.get(&e.source) != color.get(&e.target))
    }

    /// Sequential coloring in node order
    fn greedy_coloring(&self) -> Result<Coloring<Self::Node>> {
        NodeColoring::new(self).run()
    }

    /// Smallest number of colors of a proper coloring; exponential in the worst case
    fn chromatic_number(&self) -> Result<usize> {
        Ok(NodeColoring::new(self)
            .strategy(ColoringStrategy::Exact)
            .run()?
            .colors)
    }
}

impl<G> Colorable for G where G: AdjacencyList + Sized {}
