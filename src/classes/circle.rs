/*!
# Circle Graphs

A circle graph is the intersection graph of chords of a circle. Reading the chord endpoints
around the circle yields a *double permutation* in which every label of `0..n` appears twice;
two chords cross exactly if their endpoints interleave.

If some arc of the circle meets every chord exactly once, cutting the circle there turns the
chord diagram into a permutation diagram: [`CircleRepresentation::to_permutation`] returns the
permutation together with the relabelling of the chords.
*/

use std::collections::BTreeSet;

use itertools::Itertools;
use tracing::{debug, trace};

use super::*;

/// Validated chord diagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircleRepresentation {
    sequence: Vec<Node>,
    /// Both positions of every chord in increasing order
    endpoints: Vec<(usize, usize)>,
}

/// Permutation equivalent of a chord diagram; chord `label` is node `index_of_label[label]` of
/// the permutation graph of `perm`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CirclePermutation {
    pub perm: Vec<Node>,
    pub index_of_label: Vec<Node>,
    pub label_of_index: Vec<Node>,
}

impl CircleRepresentation {
    /// Fails with [`GraphError::InvalidRepresentation`] unless `sequence` contains every label of
    /// `0..sequence.len() / 2` exactly twice
    pub fn new(sequence: Vec<Node>) -> Result<Self> {
        let endpoints = double_permutation_endpoints(&sequence)?;
        Ok(Self {
            sequence,
            endpoints,
        })
    }

    pub fn sequence(&self) -> &[Node] {
        &self.sequence
    }

    pub fn number_of_chords(&self) -> usize {
        self.endpoints.len()
    }

    /// Returns *true* if exactly one endpoint of chord `v` lies strictly between the endpoints of
    /// chord `u`
    pub fn are_adjacent(&self, u: Node, v: Node) -> bool {
        match (
            self.endpoints.get(u as usize),
            self.endpoints.get(v as usize),
        ) {
            (Some(&(s, e)), Some(&(a, b))) => {
                let inside = |x: usize| s < x && x < e;
                inside(a) != inside(b)
            }
            _ => false,
        }
    }

    /// Builds the crossing graph by a sweep: when chord `u` ends, it crosses every open chord
    /// started after `u`
    pub fn to_graph<G>(&self) -> Result<G>
    where
        G: GraphEditing<Node = Node>,
    {
        let n = self.number_of_chords();
        let mut graph = G::with_capacity(n, false);
        graph.add_nodes(0..n as Node);

        let mut open: BTreeSet<(usize, Node)> = BTreeSet::new();
        for (i, &u) in self.sequence.iter().enumerate() {
            let (start, end) = self.endpoints[u as usize];
            if i == start {
                open.insert((start, u));
                continue;
            }
            debug_assert_eq!(i, end);
            open.remove(&(start, u));
            for &(_, v) in open.range((start, 0)..) {
                graph.add_edge((u, v))?;
            }
        }
        Ok(graph)
    }

    /// Start of an arc of length `n` meeting every chord exactly once, scanning the circle from
    /// position `0`
    fn permutation_window(&self) -> Option<usize> {
        let n = self.number_of_chords();
        if n == 0 {
            return Some(0);
        }

        let len = self.sequence.len();
        let at = |i: usize| self.sequence[i % len] as usize;
        let mut count = vec![0usize; n];
        let mut repeated = 0;
        for i in 0..n {
            count[at(i)] += 1;
            if count[at(i)] == 2 {
                repeated += 1;
            }
        }

        for start in 0..len {
            if repeated == 0 {
                return Some(start);
            }
            let (leaving, entering) = (at(start), at(start + n));
            if count[leaving] == 2 {
                repeated -= 1;
            }
            count[leaving] -= 1;
            count[entering] += 1;
            if count[entering] == 2 {
                repeated += 1;
            }
        }
        None
    }

    /// Returns *true* if some arc of the circle meets every chord exactly once
    pub fn is_perm_graph(&self) -> bool {
        self.permutation_window().is_some()
    }

    /// Permutation whose inversion graph is isomorphic to the crossing graph.
    ///
    /// The chords are indexed in the order they are met on the arc of [`Self::is_perm_graph`];
    /// the permutation lists their indices along the complementary arc backwards.
    /// Returns `None` if no such arc exists.
    pub fn to_permutation(&self) -> Option<CirclePermutation> {
        let start = self.permutation_window()?;
        let n = self.number_of_chords();
        let len = self.sequence.len();
        debug!(n, start, "circle to permutation");

        let label_of_index = (start..start + n)
            .map(|i| self.sequence[i % len])
            .collect_vec();
        let mut index_of_label = vec![0; n];
        for (index, &label) in label_of_index.iter().enumerate() {
            index_of_label[label as usize] = index as Node;
        }

        let perm = (start + n..start + 2 * n)
            .rev()
            .map(|i| index_of_label[self.sequence[i % len] as usize])
            .collect_vec();
        trace!(?perm, "permutation found");

        Some(CirclePermutation {
            perm,
            index_of_label,
            label_of_index,
        })
    }
}

/// Builds the circle graph of a chord diagram.
/// Fails with [`GraphError::InvalidRepresentation`] for malformed sequences.
pub fn make_abstract_circle_graph<G>(sequence: &[Node]) -> Result<G>
where
    G: GraphEditing<Node = Node>,
{
    CircleRepresentation::new(sequence.to_vec())?.to_graph()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::{
        classes::permutation::PermutationRepresentation,
        gens::*,
        testing::{random_double_permutation, random_permutation},
    };

    #[test]
    fn five_cycle_of_chords() {
        // consecutive chords cross around the circle
        let sequence = vec![0, 4, 1, 0, 2, 1, 3, 2, 4, 3];
        let repr = CircleRepresentation::new(sequence.clone()).unwrap();
        let g: AdjMap<Node> = make_abstract_circle_graph(&sequence).unwrap();

        let mut cycle: AdjMap<Node> = AdjMap::undirected();
        cycle.connect_cycle(0..5).unwrap();
        assert!(g.is_equal_to(&cycle));
        assert!(repr.are_adjacent(0, 1));
        assert!(!repr.are_adjacent(0, 2));
        assert!(!repr.is_perm_graph());
        assert_eq!(repr.to_permutation(), None);
    }

    #[test]
    fn crossing_graph_matches_the_interleaving_rule() {
        let rng = &mut Pcg64Mcg::seed_from_u64(109);
        for n in [1, 4, 9, 16] {
            let repr = CircleRepresentation::new(random_double_permutation(rng, n)).unwrap();
            let g: AdjMap<Node> = repr.to_graph().unwrap();
            assert_eq!(g.number_of_nodes(), n);
            for (u, v) in (0..n as Node).tuple_combinations() {
                assert_eq!(g.has_edge(&u, &v), repr.are_adjacent(u, v));
                assert_eq!(repr.are_adjacent(u, v), repr.are_adjacent(v, u));
            }
        }
    }

    #[test]
    fn permutation_diagrams() {
        let rng = &mut Pcg64Mcg::seed_from_u64(113);
        for n in [2, 5, 8] {
            for shift in [0, 3, 7] {
                let mut sequence = random_permutation(rng, n);
                sequence.extend(random_permutation(rng, n));
                sequence.rotate_left(shift % (2 * n));

                let repr = CircleRepresentation::new(sequence).unwrap();
                assert!(repr.is_perm_graph());
                let embedding = repr.to_permutation().unwrap();
                let perm = PermutationRepresentation::new(embedding.perm.clone()).unwrap();

                for (u, v) in (0..n as Node).tuple_combinations() {
                    let (a, b) = (
                        embedding.index_of_label[u as usize],
                        embedding.index_of_label[v as usize],
                    );
                    assert_eq!(embedding.label_of_index[a as usize], u);
                    assert_eq!(repr.are_adjacent(u, v), perm.are_adjacent(a, b));
                }
            }
        }

        let parallel = CircleRepresentation::new(vec![0, 0, 1, 1, 2, 2]).unwrap();
        assert!(!parallel.is_perm_graph());
    }
}
