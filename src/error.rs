//! Error types shared by every graph operation and algorithm.
//!
//! Errors are grouped by kind rather than by call site:
//! - shape errors (directedness mismatch, loops, parallel edges) are raised on insertion,
//! - pre-condition errors (cycles, negative weights, missing Eulerian structure, ...)
//!   are raised before or at the point of detection,
//! - budget errors carry the exhausted budget for diagnosis.
//!
//! Node values are rendered with their `Debug` representation so that the error type
//! does not depend on the node type of the graph that produced it.

use std::fmt::Debug;

use thiserror::Error;

/// Errors raised by graph containers and algorithms
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A directed graph was passed where an undirected one is required
    #[error("operation requires an undirected graph")]
    DirectedMisuse,

    /// An undirected graph was passed where a directed one is required
    #[error("operation requires a directed graph")]
    UndirectedMisuse,

    #[error("loops are not allowed: {node}")]
    LoopRejected { node: String },

    #[error("parallel edges are not allowed: ({from}, {target})")]
    ParallelRejected { from: String, target: String },

    #[error("graph is not a directed acyclic graph")]
    NotDag,

    #[error("cycle detected")]
    CycleDetected,

    #[error("graph is not bipartite")]
    NotBipartite,

    #[error("graph is not Eulerian")]
    NotEulerian,

    #[error("negative edge weight on ({from}, {target})")]
    NegativeWeight { from: String, target: String },

    #[error("negative cycle detected")]
    NegativeCycle,

    #[error("no proper coloring with {palette} colors")]
    PaletteExhausted { palette: usize },

    /// Raised internally by augmenting-path searches; terminates flow computations
    #[error("no augmenting path")]
    NoAugmentingPath,

    #[error("no path to target {target}")]
    NoPathToTarget { target: String },

    #[error("node {node} not found")]
    NodeNotFound { node: String },

    #[error("graph is not chordal")]
    NotChordal,

    #[error("invalid representation: {reason}")]
    InvalidRepresentation { reason: String },

    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },
}

/// Shorthand for results of graph operations
pub type Result<T> = std::result::Result<T, GraphError>;

impl GraphError {
    pub fn loop_rejected<N: Debug>(node: &N) -> Self {
        Self::LoopRejected {
            node: format!("{node:?}"),
        }
    }

    pub fn parallel_rejected<N: Debug>(source: &N, target: &N) -> Self {
        Self::ParallelRejected {
            from: format!("{source:?}"),
            target: format!("{target:?}"),
        }
    }

    pub fn negative_weight<N: Debug>(source: &N, target: &N) -> Self {
        Self::NegativeWeight {
            from: format!("{source:?}"),
            target: format!("{target:?}"),
        }
    }

    pub fn no_path_to<N: Debug>(target: &N) -> Self {
        Self::NoPathToTarget {
            target: format!("{target:?}"),
        }
    }

    pub fn node_not_found<N: Debug>(node: &N) -> Self {
        Self::NodeNotFound {
            node: format!("{node:?}"),
        }
    }

    pub fn invalid_representation(reason: impl Into<String>) -> Self {
        Self::InvalidRepresentation {
            reason: reason.into(),
        }
    }

    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}

/// Returns early with `Err($err)` unless the condition holds
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
}

pub(crate) use ensure;

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn edge_errors_render_both_endpoints() {
        let err = GraphError::parallel_rejected(&1u32, &2u32);
        assert_eq!(err.to_string(), "parallel edges are not allowed: (1, 2)");
        assert!(err.source().is_none());

        let err = GraphError::negative_weight(&'a', &'b');
        assert_eq!(err.to_string(), "negative edge weight on ('a', 'b')");
        assert!(err.source().is_none());
    }
}
