/*!
# Graph Generators

[`GraphFactory`] builds canonical topologies (complete graphs, cycles, lattices, ladders),
random graphs (trees, sparse graphs with an exact number of edges, connected graphs, `G(n,p)`)
and integer-capacity flow networks. All generated graphs use integer labels `0..n`.

The factory is configured builder-style before generating:

```rust
use graphtheory::{prelude::*, gens::*};

let mut factory = GraphFactory::with_seed(7).weights(1..=9);
let g: AdjMap<Node> = factory.cycle(5).unwrap();

assert_eq!(g.number_of_edges(), 5);
assert!(g.edges().all(|e| (1..=9).contains(&e.weight)));
```

Randomised constructors draw from the factory's random number generator; two factories with the
same seed generate identical graphs. Without an explicit seed, [`DEFAULT_SEED`] is used.

In addition, [`GeneratorSubstructures`] adds paths, cycles and cliques to existing graphs.
*/

use std::ops::RangeInclusive;

use num::NumCast;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use tracing::debug;

use crate::{edge::*, error::*, node::*, ops::*};

mod flow;
mod lattice;
mod random;
mod substructures;

pub use substructures::*;

/// Seed used by [`GraphFactory::new`] and every randomised strategy without an explicit seed
pub const DEFAULT_SEED: u64 = 0x5EED_0F_6AA9;

/// Configurable generator for integer-labelled graphs
#[derive(Debug, Clone)]
pub struct GraphFactory<R = Pcg64Mcg> {
    rng: R,
    directed: bool,
    weights: Option<RangeInclusive<i64>>,
}

impl GraphFactory<Pcg64Mcg> {
    /// Creates a factory for undirected unit-weight graphs seeded with [`DEFAULT_SEED`]
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Creates a factory for undirected unit-weight graphs with an explicit seed
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(Pcg64Mcg::seed_from_u64(seed))
    }
}

impl Default for GraphFactory<Pcg64Mcg> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> GraphFactory<R> {
    /// Creates a factory drawing from a given random number generator
    pub fn from_rng(rng: R) -> Self {
        Self {
            rng,
            directed: false,
            weights: None,
        }
    }

    /// Sets whether generated graphs are directed
    pub fn directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    /// Draws edge weights uniformly from `range` instead of using unit weights
    pub fn weights(mut self, range: RangeInclusive<i64>) -> Self {
        self.weights = Some(range);
        self
    }

    /// Returns the random number generator of the factory
    pub fn rng(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Draws the weight of the next edge.
    /// Values not representable by `W` fall back to one.
    fn next_weight<W: Weight>(&mut self) -> W {
        match &self.weights {
            Some(range) if !range.is_empty() => {
                let w = self.rng.random_range(range.clone());
                <W as NumCast>::from(w).unwrap_or_else(W::one)
            }
            _ => W::one(),
        }
    }

    fn next_edge<W: Weight>(&mut self, u: Node, v: Node) -> Edge<Node, W> {
        Edge::new(u, v, self.next_weight())
    }

    /// Creates a graph with nodes `0..n` and no edges
    fn empty<G>(&self, n: usize) -> G
    where
        G: GraphEditing<Node = Node>,
    {
        let mut graph = G::with_capacity(n, self.directed);
        graph.add_nodes(0..n as Node);
        graph
    }

    /// Number of distinct edges a simple graph on `n` nodes can hold
    fn max_edges(&self, n: usize) -> usize {
        let pairs = n * n.saturating_sub(1);
        if self.directed { pairs } else { pairs / 2 }
    }

    /// Complete graph `K_n`; directed graphs contain both orientations of every pair
    pub fn complete<G>(&mut self, n: usize) -> Result<G>
    where
        G: GraphEditing<Node = Node>,
    {
        debug!(n, directed = self.directed, "generating complete graph");
        let mut graph: G = self.empty(n);
        for u in 0..n as Node {
            for v in 0..n as Node {
                if u < v || (self.directed && u != v) {
                    graph.add_edge(self.next_edge::<G::Weight>(u, v))?;
                }
            }
        }
        Ok(graph)
    }

    /// Cycle `C_n` with edges `(i, i + 1 mod n)`.
    /// Fails for `n < 3` (undirected) or `n < 2` (directed).
    pub fn cycle<G>(&mut self, n: usize) -> Result<G>
    where
        G: GraphEditing<Node = Node>,
    {
        let min = if self.directed { 2 } else { 3 };
        ensure!(
            n >= min,
            GraphError::invalid_argument(format!("a cycle needs at least {min} nodes"))
        );
        debug!(n, directed = self.directed, "generating cycle");

        let mut graph = self.empty::<G>(n);
        graph.connect_cycle_weighted(0..n as Node, |_, _| self.next_weight())?;
        Ok(graph)
    }
}
