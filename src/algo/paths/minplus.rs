use tracing::{debug, trace};

use super::*;

/// Growth of the path-length bound per (min,+) product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MinPlusStrategy {
    /// Extends every path by one edge per product: `n` products in `O(n^4)`
    #[default]
    Slow,
    /// Squares the distance matrix, doubling the bound per product: `O(n^3 log n)`
    Squaring,
}

/// All-pairs shortest paths by repeated (min,+) matrix products.
///
/// The products run until walks of up to `n` edges are covered, so a negative cycle shows up as a
/// negative diagonal entry ([`GraphError::NegativeCycle`]).
pub struct MinPlusAllPairs<'a, G> {
    graph: &'a G,
    strategy: MinPlusStrategy,
}

type Matrices<W> = (Vec<Vec<Option<W>>>, Vec<Vec<Option<usize>>>);

impl<'a, G> MinPlusAllPairs<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            strategy: MinPlusStrategy::default(),
        }
    }

    pub fn strategy(mut self, strategy: MinPlusStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn run(&self) -> Result<DistanceMatrix<G::Node, G::Weight>> {
        debug!(
            n = self.graph.number_of_nodes(),
            strategy = ?self.strategy,
            "min-plus all pairs"
        );
        let indexer = Indexer::new(self.graph);
        let weights = edge_matrices(&indexer.weighted_adjacency(self.graph));
        let n = indexer.len();

        let mut current = weights.clone();
        let mut covered = 1;
        while covered < n {
            current = match self.strategy {
                MinPlusStrategy::Slow => {
                    covered += 1;
                    min_plus_product(&current, &weights)
                }
                MinPlusStrategy::Squaring => {
                    covered *= 2;
                    min_plus_product(&current, &current)
                }
            };
            trace!(covered, "min-plus product");
        }

        let (distance, parent) = current;
        DistanceMatrix::from_indexed(indexer, distance, parent)
    }
}

/// `C[i][j] = min_k A[i][k] + B[k][j]`; the parent of `j` is taken from `B` unless `k = j`
fn min_plus_product<W: Weight>(a: &Matrices<W>, b: &Matrices<W>) -> Matrices<W> {
    let (da, pa) = a;
    let (db, pb) = b;
    let n = da.len();
    let mut distance = da.clone();
    let mut parent = pa.clone();

    for i in 0..n {
        for k in 0..n {
            let Some(dik) = da[i][k] else {
                continue;
            };
            for j in 0..n {
                let Some(dkj) = db[k][j] else {
                    continue;
                };
                let candidate = dik + dkj;
                if distance[i][j].is_none_or(|dij| candidate < dij) {
                    distance[i][j] = Some(candidate);
                    parent[i][j] = if k == j { pa[i][j] } else { pb[k][j] };
                }
            }
        }
    }
    (distance, parent)
}
