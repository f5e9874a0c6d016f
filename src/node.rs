/*!
# Node Representation

Nodes are opaque values: anything that is `Clone + Eq + Hash + Ord + Debug` can be
used as a node (integers, strings, points, or bags of other nodes in a tree decomposition).
The total order is what makes every algorithm in this crate deterministic: graphs
iterate their nodes and neighborhoods in a fixed order, priority queues break ties by it.

Integer-labelled graphs (built by the [`gens`](crate::gens) factory and by the
representation constructors in [`classes`](crate::classes)) use [`Node`].
*/

use std::{fmt::Debug, hash::Hash};

use stream_bitset::bitset::BitSetImpl;

/// Anything that can be stored as a node of a graph
pub trait NodeId: Clone + Eq + Hash + Ord + Debug {}

impl<T> NodeId for T where T: Clone + Eq + Hash + Ord + Debug {}

/// Integer node labels used by generators and representation constructors
pub type Node = u32;

/// Node-Value that is considered invalid
pub const INVALID_NODE: Node = Node::MAX;

/// There can be at most `2^32 - 1` integer labelled nodes in a graph
pub type NumNodes = Node;

/// Dense index of a node in an [`Indexer`](crate::utils::Indexer)
pub type NodeIndex = u32;

/// BitSet over dense node indices
pub type IndexBitSet = BitSetImpl<NodeIndex>;
