/*!
# Edges and Weights

An [`Edge`] is a value (it has no identity): two edges with the same
`(source, target, weight)` triple are interchangeable.
Whether an edge is directed is decided by the graph storing it.

Edges are ordered by weight first, then by source and target. This is the order
used by every priority queue and weight-sorted iteration in the crate, and the
reason minimum spanning trees and greedy matchings are reproducible.
*/

use std::{
    cmp::Ordering,
    fmt::{Debug, Display},
    hash::Hash,
    iter::Sum,
};

use num::{PrimInt, Signed};

use crate::node::NodeId;

/// Numeric edge weights.
///
/// Weights must be totally ordered so that edges are; every signed primitive
/// integer qualifies.
pub trait Weight: PrimInt + Signed + Hash + Debug + Display + Sum {}

impl<W> Weight for W where W: PrimInt + Signed + Hash + Debug + Display + Sum {}

/// A weighted edge from `source` to `target`
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Edge<N, W = i64> {
    pub source: N,
    pub target: N,
    pub weight: W,
}

impl<N, W> Edge<N, W> {
    /// Creates a new edge
    pub fn new(source: N, target: N, weight: W) -> Self {
        Self {
            source,
            target,
            weight,
        }
    }
}

impl<N: NodeId, W: Weight> Edge<N, W> {
    /// Creates an edge of weight one
    pub fn unit(source: N, target: N) -> Self {
        Self::new(source, target, W::one())
    }

    /// Returns the edge `(target, source, weight)`
    pub fn inverted(&self) -> Self {
        Self::new(self.target.clone(), self.source.clone(), self.weight)
    }

    /// Normalizes the edge such that the smaller endpoint comes first
    pub fn normalized(&self) -> Self {
        if self.is_normalized() {
            self.clone()
        } else {
            self.inverted()
        }
    }

    /// Returns *true* if the smaller endpoint comes first
    pub fn is_normalized(&self) -> bool {
        self.source <= self.target
    }

    /// Returns *true* if both endpoints are equal
    pub fn is_loop(&self) -> bool {
        self.source == self.target
    }

    /// Returns both endpoints as a tuple
    pub fn endpoints(&self) -> (N, N) {
        (self.source.clone(), self.target.clone())
    }

    /// Returns the endpoint opposite to `u`, or `None` if `u` is not an endpoint
    pub fn other(&self, u: &N) -> Option<&N> {
        if &self.source == u {
            Some(&self.target)
        } else if &self.target == u {
            Some(&self.source)
        } else {
            None
        }
    }
}

impl<N: Ord, W: Ord> PartialOrd for Edge<N, W> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N: Ord, W: Ord> Ord for Edge<N, W> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .cmp(&other.weight)
            .then_with(|| self.source.cmp(&other.source))
            .then_with(|| self.target.cmp(&other.target))
    }
}

impl<N: Debug, W: Debug> Display for Edge<N, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?},{:?},{:?})", self.source, self.target, self.weight)
    }
}

impl<N: Debug, W: Debug> Debug for Edge<N, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as Display>::fmt(self, f)
    }
}

impl<N: NodeId, W: Weight> From<(N, N)> for Edge<N, W> {
    fn from(value: (N, N)) -> Self {
        Edge::unit(value.0, value.1)
    }
}

impl<N: NodeId, W: Weight> From<(N, N, W)> for Edge<N, W> {
    fn from(value: (N, N, W)) -> Self {
        Edge::new(value.0, value.1, value.2)
    }
}

impl<N: NodeId, W: Weight> From<&Edge<N, W>> for Edge<N, W> {
    fn from(value: &Edge<N, W>) -> Self {
        value.clone()
    }
}

/// Sum of weights over a collection of edges
pub fn total_weight<'a, N, W, I>(edges: I) -> W
where
    N: 'a,
    W: Weight + 'a,
    I: IntoIterator<Item = &'a Edge<N, W>>,
{
    edges.into_iter().map(|e| e.weight).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_weight_then_endpoints() {
        let mut edges: Vec<Edge<char>> = vec![
            Edge::new('b', 'c', 2),
            Edge::new('a', 'z', 3),
            Edge::new('a', 'c', 2),
            Edge::new('z', 'a', 1),
        ];
        edges.sort();
        assert_eq!(
            edges,
            vec![
                Edge::new('z', 'a', 1),
                Edge::new('a', 'c', 2),
                Edge::new('b', 'c', 2),
                Edge::new('a', 'z', 3),
            ]
        );
    }

    #[test]
    fn inversion_and_normalization() {
        let e: Edge<u32> = Edge::new(4, 1, 7);
        assert_eq!(e.inverted(), Edge::new(1, 4, 7));
        assert_eq!(e.normalized(), Edge::new(1, 4, 7));
        assert!(!e.is_normalized());
        assert_eq!(e.other(&4), Some(&1));
        assert_eq!(e.other(&3), None);
        assert!(Edge::<u32>::unit(2, 2).is_loop());
    }

    #[test]
    fn equality_includes_weight() {
        assert_ne!(Edge::<u32>::new(0, 1, 1), Edge::new(0, 1, 2));
        assert_eq!(Edge::<u32>::from((0, 1)), Edge::new(0, 1, 1));
        assert_eq!(total_weight(&[Edge::<u32>::new(0, 1, 2), Edge::new(1, 2, 5)]), 7);
    }
}
