/*!
`graphtheory` is a graph data structure & algorithms library built for studying classic
graph algorithms on small to medium sized graphs:
- nodes are arbitrary ordered values (integers, strings, points, bags of other nodes),
- edges carry an integer weight (default `1`),
- graphs are either directed or undirected, decided at construction time.

# Representation

Nodes are any type implementing [`NodeId`](crate::node::NodeId), i.e. `Clone + Eq + Hash + Ord + Debug`.
Generators and representation constructors use integer labels [`Node`](crate::node::Node) `= u32`.
For **edges**, we use a struct `Edge { source, target, weight }` that is ordered by weight first.

### Directed vs Undirected

- In an **undirected** graph, the edge `(u, v)` is registered at both endpoints; iterating all edges
  reports it once as `(min, max)`.
- In a **directed** graph, the edge has orientation, so `(u, v)` and `(v, u)` are distinct.

Both kinds are *simple*: loops and parallel edges are rejected on insertion.

### Available Representations

See the [`repr`] module:

- [`AdjMap`](crate::repr::AdjMap): sparse ordered adjacency maps, the default choice
- [`AdjMatrix`](crate::repr::AdjMatrix): dense matrix of optional weights

# Design

All algorithms are provided as configurable structs that one can alter using setters before
calling `run` on them. Each `run` either succeeds with an output struct or fails with a single
[`GraphError`](crate::error::GraphError) without partial results.
The most commonly used functionality is additionally implemented via extension traits on the
graph itself, making it usable without configuring the algorithm beforehand.

Every algorithm is deterministic: graphs iterate nodes and neighborhoods in a fixed order and
priority queues break ties by the total order on nodes and edges.

# Usage

There are *5* core submodules you probably want to interact with:
- [`prelude`] includes definitions for nodes, edges, errors, basic graph operations, and both representations,
- [`algo`] includes traversals, connectivity, shortest paths, spanning trees, flows, matchings,
  Euler/Hamilton cycles, colorings and covering heuristics,
- [`classes`] includes specialised solvers for chordal, interval, permutation and circle graphs
  as well as tree decompositions,
- [`gens`] includes a seeded factory for canonical and random graphs,
- [`utils`] includes the disjoint-set forest and priority containers shared by the algorithms.

In most use-cases, `use graphtheory::{prelude::*, algo::*};` suffices for your needs.
*/

pub mod algo;
pub mod classes;
pub mod edge;
pub mod error;
pub mod gens;
pub mod node;
pub mod ops;
pub mod repr;
pub(crate) mod testing;
pub mod utils;

/// `graphtheory::prelude` includes definitions for nodes, edges and errors, all basic graph operation traits as well as both representations.
pub mod prelude {
    pub use super::{edge::*, error::*, node::*, ops::*, repr::*};
}
