/*!
# Substructure Generators

This module provides utility methods to add common motifs to an already existing graph:

- **Paths**
- **Cycles**
- **Cliques**

Missing nodes are inserted, edges that already exist are rejected like any other parallel edge.

# Example

```rust
use graphtheory::{prelude::*, gens::*};

let mut g: AdjMap<Node> = AdjMap::directed();
g.connect_path([0, 1, 2]).unwrap();
g.connect_cycle([2, 3, 4]).unwrap();

assert_eq!(
    g.edges().map(|e| (e.source, e.target)).collect::<Vec<_>>(),
    vec![(0, 1), (1, 2), (2, 3), (3, 4), (4, 2)]
);
```
*/

use itertools::Itertools;
use num::One;

use super::*;

/// Trait for creating additional **substructures** (paths, cycles, cliques)
/// inside an already existing graph.
pub trait GeneratorSubstructures: GraphEditing {
    /// Connects the given nodes in order with a path of unit-weight edges.
    fn connect_path<P>(&mut self, nodes_on_path: P) -> Result<()>
    where
        P: IntoIterator<Item = Self::Node>,
    {
        self.connect_path_weighted(nodes_on_path, |_, _| Self::Weight::one())
    }

    /// Connects the given nodes in order with a path; the weight of edge `(u, v)` is `weight(u, v)`.
    fn connect_path_weighted<P, F>(&mut self, nodes_on_path: P, mut weight: F) -> Result<()>
    where
        P: IntoIterator<Item = Self::Node>,
        F: FnMut(&Self::Node, &Self::Node) -> Self::Weight,
    {
        for (u, v) in nodes_on_path.into_iter().tuple_windows() {
            let w = weight(&u, &v);
            self.add_edge(Edge::new(u, v, w))?;
        }
        Ok(())
    }

    /// Connects the given nodes with a cycle of unit-weight edges.
    /// The last node is connected back to the first.
    fn connect_cycle<C>(&mut self, nodes_in_cycle: C) -> Result<()>
    where
        C: IntoIterator<Item = Self::Node>,
    {
        self.connect_cycle_weighted(nodes_in_cycle, |_, _| Self::Weight::one())
    }

    /// Connects the given nodes with a cycle; the weight of edge `(u, v)` is `weight(u, v)`.
    fn connect_cycle_weighted<C, F>(&mut self, nodes_in_cycle: C, mut weight: F) -> Result<()>
    where
        C: IntoIterator<Item = Self::Node>,
        F: FnMut(&Self::Node, &Self::Node) -> Self::Weight,
    {
        let nodes = nodes_in_cycle.into_iter().collect_vec();
        let (Some(first), Some(last)) = (nodes.first(), nodes.last()) else {
            return Ok(());
        };
        let closing = (last.clone(), first.clone());

        self.connect_path_weighted(nodes.iter().cloned(), &mut weight)?;
        let w = weight(&closing.0, &closing.1);
        self.add_edge(Edge::new(closing.0, closing.1, w))
    }

    /// Connects all given nodes into a clique of unit-weight edges.
    /// Directed graphs receive both orientations of every pair.
    fn connect_clique(&mut self, nodes: &[Self::Node]) -> Result<()> {
        for (i, u) in nodes.iter().enumerate() {
            for (j, v) in nodes.iter().enumerate() {
                if i < j || (self.is_directed() && i != j) {
                    self.add_edge(Edge::unit(u.clone(), v.clone()))?;
                }
            }
        }
        Ok(())
    }
}

impl<G> GeneratorSubstructures for G where G: GraphEditing {}
