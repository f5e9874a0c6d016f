/*!
# Permutation Graphs

The permutation graph of a permutation `perm` of `0..n` has an edge between `u < v` exactly if
`v` precedes `u` in `perm`, i.e. if the pair is an inversion.

Independent sets are increasing subsequences and cliques are decreasing subsequences, both found
by patience sorting in `O(n log n)`. [`PermutationRepresentation::chordal_completion`] destroys all
induced 4-cycles by greedily chosen chords and returns a chordal supergraph with a perfect
elimination ordering.

```
use graphtheory::{prelude::*, classes::permutation::*};

let repr = PermutationRepresentation::new(vec![3, 4, 5, 0, 1, 2]).unwrap();
let g: AdjMap<Node> = repr.to_graph().unwrap();
assert_eq!(g.number_of_edges(), 9);
assert_eq!(repr.maximum_independent_set().cardinality, 3);
assert_eq!(repr.induced_four_cycles().len(), 9);
```
*/

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use tracing::{debug, trace};

use super::{
    chordal::{eliminate, mcs_order},
    *,
};

/// Validated permutation of `0..n`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermutationRepresentation {
    perm: Vec<Node>,
    /// `position[v]` is the index of `v` in `perm`
    position: Vec<usize>,
}

/// Chordal supergraph of a permutation graph
#[derive(Debug, Clone)]
pub struct ChordalCompletion<G> {
    pub graph: G,
    /// Chords chosen to destroy the induced 4-cycles, as `(u, v)` with `u < v`
    pub chords: Vec<(Node, Node)>,
    /// Further edges needed to make `peo` perfect
    pub fill: Vec<(Node, Node)>,
    pub peo: Vec<Node>,
}

impl PermutationRepresentation {
    /// Fails with [`GraphError::InvalidRepresentation`] unless `perm` is a permutation of `0..n`
    pub fn new(perm: Vec<Node>) -> Result<Self> {
        let n = perm.len();
        let mut position = vec![usize::MAX; n];
        for (i, &v) in perm.iter().enumerate() {
            let slot = position.get_mut(v as usize).ok_or_else(|| {
                GraphError::invalid_representation(format!("value {v} is not below {n}"))
            })?;
            ensure!(
                *slot == usize::MAX,
                GraphError::invalid_representation(format!("value {v} appears twice"))
            );
            *slot = i;
        }
        Ok(Self { perm, position })
    }

    pub fn permutation(&self) -> &[Node] {
        &self.perm
    }

    pub fn len(&self) -> usize {
        self.perm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.perm.is_empty()
    }

    /// Index of `v` in the permutation
    pub fn position_of(&self, v: Node) -> Option<usize> {
        self.position.get(v as usize).copied()
    }

    /// Returns *true* if `u` and `v` form an inversion
    pub fn are_adjacent(&self, u: Node, v: Node) -> bool {
        match (self.position_of(u), self.position_of(v)) {
            (Some(pu), Some(pv)) => (u < v && pv < pu) || (v < u && pu < pv),
            _ => false,
        }
    }

    /// Builds the inversion graph in `O(n^2)`
    pub fn to_graph<G>(&self) -> Result<G>
    where
        G: GraphEditing<Node = Node>,
    {
        let mut graph = G::with_capacity(self.len(), false);
        graph.add_nodes(0..self.len() as Node);
        for (a, b) in self.perm.iter().tuple_combinations() {
            if a > b {
                graph.add_edge((*b, *a))?;
            }
        }
        Ok(graph)
    }

    /// Longest subsequence of the permutation that is strictly increasing under `key`
    fn longest_subsequence(&self, key: impl Fn(Node) -> Node) -> Vec<Node> {
        // tails[l]: index of the smallest possible last element of a subsequence of length l + 1
        let mut tails: Vec<usize> = Vec::new();
        let mut predecessor = vec![None; self.len()];
        for (i, &v) in self.perm.iter().enumerate() {
            let l = tails.partition_point(|&t| key(self.perm[t]) < key(v));
            predecessor[i] = l.checked_sub(1).map(|p| tails[p]);
            if l == tails.len() {
                tails.push(i);
            } else {
                tails[l] = i;
            }
        }

        let mut subsequence = Vec::with_capacity(tails.len());
        let mut cursor = tails.last().copied();
        while let Some(i) = cursor {
            subsequence.push(self.perm[i]);
            cursor = predecessor[i];
        }
        subsequence.reverse();
        subsequence
    }

    /// Maximum independent set: a longest increasing subsequence
    pub fn maximum_independent_set(&self) -> IndependentSet<Node> {
        IndependentSet::new(self.longest_subsequence(|v| v).into_iter().collect())
    }

    /// Maximum clique: a longest decreasing subsequence
    pub fn maximum_clique(&self) -> BTreeSet<Node> {
        let top = self.len() as Node;
        self.longest_subsequence(|v| top - v).into_iter().collect()
    }

    /// Induced 4-cycles `(a, b, c, d)` with `c < d < a < b` placed in the order `a, b, c, d`;
    /// their missing chords are `{a, b}` and `{c, d}`
    pub fn induced_four_cycles(&self) -> Vec<(Node, Node, Node, Node)> {
        let p = &self.perm;
        let n = p.len();
        let mut cycles = Vec::new();
        for i in 0..n {
            for j in i + 1..n {
                if p[i] > p[j] {
                    continue;
                }
                for k in j + 1..n {
                    if p[k] > p[i] {
                        continue;
                    }
                    for r in k + 1..n {
                        if p[k] < p[r] && p[r] < p[i] {
                            cycles.push((p[i], p[j], p[k], p[r]));
                        }
                    }
                }
            }
        }
        cycles
    }

    /// Chordal supergraph of the permutation graph.
    ///
    /// Chords covering the induced 4-cycles are chosen greedily, most covered cycles first and
    /// ties to the smallest chord. Chords may create new long holes, so the result is completed by
    /// the elimination game along a maximum cardinality search order, which is returned as PEO.
    pub fn chordal_completion<G>(&self) -> Result<ChordalCompletion<G>>
    where
        G: GraphEditing<Node = Node>,
    {
        let mut graph: G = self.to_graph()?;
        let mut cycles = self.induced_four_cycles();
        debug!(n = self.len(), cycles = cycles.len(), "chordal completion");

        let chords_of = |&(a, b, c, d): &(Node, Node, Node, Node)| [(a, b), (c, d)];
        let mut chords = Vec::new();
        while !cycles.is_empty() {
            let mut covered: BTreeMap<(Node, Node), usize> = BTreeMap::new();
            for cycle in &cycles {
                for chord in chords_of(cycle) {
                    *covered.entry(chord).or_default() += 1;
                }
            }
            // `max_by_key` keeps the last maximum; iterating backwards keeps the smallest chord
            let Some((chord, count)) = covered.into_iter().rev().max_by_key(|&(_, c)| c) else {
                break;
            };
            trace!(?chord, count, "chord added");
            graph.add_edge(chord)?;
            chords.push(chord);
            cycles.retain(|cycle| !chords_of(cycle).contains(&chord));
        }

        let indexer = Indexer::new(&graph);
        let mut adj = indexer.adjacency(&graph);
        let order = mcs_order(&adj);
        let mut fill = Vec::new();
        for (a, b) in eliminate(&mut adj, &order) {
            let (u, v) = (*indexer.node(a), *indexer.node(b));
            graph.add_edge((u, v))?;
            fill.push((u.min(v), u.max(v)));
        }

        Ok(ChordalCompletion {
            peo: indexer.nodes_of(&order),
            graph,
            chords,
            fill,
        })
    }
}

/// Builds the permutation graph of `perm`.
/// Fails with [`GraphError::InvalidRepresentation`] if `perm` is no permutation of `0..n`.
pub fn make_abstract_perm_graph<G>(perm: &[Node]) -> Result<G>
where
    G: GraphEditing<Node = Node>,
{
    PermutationRepresentation::new(perm.to_vec())?.to_graph()
}
