/*!
# Utilities

Provides helper structures shared by the algorithms:
- [`DisjointSet`]: union-find with path compression and union by rank,
- [`Indexer`]: a bijection between the nodes of a graph and `0..n` for index-based algorithms,
- [`DegreeQueue`] with the implementations [`BucketQueue`] and [`OrderedQueue`]: priority
  containers over small integer keys (usually degrees) used by peeling and greedy strategies.

You probably do not need to interact with this module directly.
*/

use num::{One, Zero};

pub mod buckets;
pub mod disjoint_set;
pub mod indexer;

pub use buckets::{BucketQueue, DegreeQueue, OrderedQueue};
pub use disjoint_set::DisjointSet;
pub use indexer::Indexer;

/// Range check for probabilities of random generators
pub trait Probability {
    /// Returns *true* if the value lies in `[0, 1]`
    fn is_probability(&self) -> bool;
}

impl<P> Probability for P
where
    P: Zero + One + PartialOrd,
{
    fn is_probability(&self) -> bool {
        Self::zero().le(self) && Self::one().ge(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probabilities() {
        assert!(0.0_f64.is_probability());
        assert!(0.5_f64.is_probability());
        assert!(1_u8.is_probability());
        assert!(!1.5_f64.is_probability());
        assert!(!(-0.1_f64).is_probability());
        assert!(!f64::NAN.is_probability());
    }
}
