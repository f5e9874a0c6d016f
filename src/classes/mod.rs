/*!
# Graph Classes

Specialised solvers for restricted graph classes on which otherwise NP-hard problems become
polynomial, often linear:

- [`chordal`]: perfect elimination orderings (maximum cardinality search, lexicographic BFS),
  maximum and maximal cliques, independent sets, optimal colorings and tree decompositions,
- [`interval`]: interval graphs given by a double permutation of their endpoints,
- [`permutation`]: inversion graphs of permutations and their chordal completion,
- [`circle`]: intersection graphs of chords given by a double permutation,
- [`forest`]: exact covers, independent and dominating sets on forests and a planar tree layout,
- [`treedec`]: tree decompositions and their validation.

Representations are labelled by `0..n` and build graphs with [`Node`](crate::node::Node) labels.
*/

pub mod chordal;
pub mod circle;
pub mod forest;
pub mod interval;
pub mod permutation;
pub mod treedec;

use crate::{algo::*, prelude::*, utils::*};

/// First and second position of every label of a double permutation of `0..n`.
/// Fails with [`GraphError::InvalidRepresentation`] unless every label appears exactly twice.
fn double_permutation_endpoints(sequence: &[Node]) -> Result<Vec<(usize, usize)>> {
    ensure!(
        sequence.len() % 2 == 0,
        GraphError::invalid_representation(format!(
            "double permutation has odd length {}",
            sequence.len()
        ))
    );

    let n = sequence.len() / 2;
    let mut first = vec![None; n];
    let mut endpoints = vec![None; n];
    for (i, &label) in sequence.iter().enumerate() {
        let u = label as usize;
        ensure!(
            u < n,
            GraphError::invalid_representation(format!("label {label} is not below {n}"))
        );
        match (first[u], endpoints[u]) {
            (None, _) => first[u] = Some(i),
            (Some(s), None) => endpoints[u] = Some((s, i)),
            (Some(_), Some(_)) => {
                return Err(GraphError::invalid_representation(format!(
                    "label {label} appears more than twice"
                )));
            }
        }
    }

    // with `2n` positions and no label above two occurrences every label appears exactly twice
    Ok(endpoints.into_iter().flatten().collect())
}
