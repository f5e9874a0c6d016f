/*!
# Graph Representations

Two storage backends with identical external contracts:

- [`AdjMap`] - sparse ordered adjacency maps (node → neighbor → weight), suited for `m ≪ n²`.
  Nodes and neighborhoods are iterated in the order of the node type, which makes every
  algorithm on top of it deterministic.
- [`AdjMatrix`] - dense `n × n` matrix of optional weights over slots; suited for small,
  dense graphs. Iteration follows slot order (insertion order, with slots of deleted nodes reused).

Both implement all traits of [`ops`](crate::ops) and can be converted into each other
with [`GraphEditing::from_graph`](crate::ops::GraphEditing::from_graph).
*/

use crate::{edge::*, error::*, node::*, ops::*, testing::test_graph_ops};

mod adj_map;
mod adj_matrix;

pub use adj_map::*;
pub use adj_matrix::*;

/// Checks the shape constraints of a simple graph before an edge is inserted
pub(crate) fn check_insertable<G>(graph: &G, edge: &EdgeOf<G>) -> Result<()>
where
    G: AdjacencyTest,
{
    ensure!(!edge.is_loop(), GraphError::loop_rejected(&edge.source));
    ensure!(
        !graph.has_edge(&edge.source, &edge.target),
        GraphError::parallel_rejected(&edge.source, &edge.target)
    );
    Ok(())
}

test_graph_ops!(
    test_adj_map,
    AdjMap<u32, i64>,
    (GraphNew, GraphEditing, AdjacencyList, GraphTranspose, GraphEquality)
);
test_graph_ops!(
    test_adj_matrix,
    AdjMatrix<u32, i64>,
    (GraphNew, GraphEditing, AdjacencyList, GraphTranspose, GraphEquality)
);
