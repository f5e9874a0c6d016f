/*!
# Tree Decompositions

A tree decomposition of a graph `G` is a tree whose nodes are *bags* (sets of nodes of `G`) with
1. every node of `G` in some bag,
2. both endpoints of every edge of `G` in a common bag,
3. the bags containing any fixed node of `G` inducing a connected subtree.

The width of a decomposition is the size of its largest bag minus one.
*/

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::*;

/// Node of a tree decomposition
pub type Bag<N> = BTreeSet<N>;

/// A tree of bags
#[derive(Debug, Clone, PartialEq)]
pub struct TreeDecomposition<N: NodeId> {
    pub tree: AdjMap<Bag<N>>,
}

impl<N: NodeId> TreeDecomposition<N> {
    pub fn new(tree: AdjMap<Bag<N>>) -> Self {
        Self { tree }
    }

    /// Decomposition with a single bag containing every node of `graph`
    pub fn trivial<G>(graph: &G) -> Self
    where
        G: GraphNodeOrder<Node = N>,
    {
        let mut tree = AdjMap::undirected();
        tree.add_node(graph.vertices().collect());
        Self { tree }
    }

    pub fn bags(&self) -> impl Iterator<Item = Bag<N>> + '_ {
        self.tree.vertices()
    }

    pub fn number_of_bags(&self) -> usize {
        self.tree.number_of_nodes()
    }

    /// Size of the largest bag minus one; `0` for an empty decomposition
    pub fn width(&self) -> usize {
        self.bags()
            .map(|b| b.len())
            .max()
            .unwrap_or(0)
            .saturating_sub(1)
    }

    /// Checks the tree shape and the three decomposition properties with respect to `graph`.
    /// Fails with [`GraphError::InvalidRepresentation`] naming the first violation.
    pub fn validate<G>(&self, graph: &G) -> Result<()>
    where
        G: AdjacencyList<Node = N>,
    {
        debug!(
            bags = self.number_of_bags(),
            width = self.width(),
            "validating tree decomposition"
        );
        ensure!(
            !self.tree.is_directed()
                && self.tree.number_of_edges() + 1 == self.number_of_bags().max(1)
                && self.tree.is_connected()?,
            GraphError::invalid_representation("bags do not form a tree")
        );

        let mut holders: BTreeMap<N, Vec<Bag<N>>> = BTreeMap::new();
        for bag in self.bags() {
            for u in &bag {
                holders.entry(u.clone()).or_default().push(bag.clone());
            }
        }

        for u in graph.vertices() {
            ensure!(
                holders.contains_key(&u),
                GraphError::invalid_representation(format!("node {u:?} is in no bag"))
            );
        }

        for e in graph.edges() {
            let covered = holders
                .get(&e.source)
                .is_some_and(|bags| bags.iter().any(|b| b.contains(&e.target)));
            ensure!(
                covered,
                GraphError::invalid_representation(format!(
                    "edge ({:?}, {:?}) is in no bag",
                    e.source, e.target
                ))
            );
        }

        for (u, bags) in holders {
            ensure!(
                self.is_subtree(&bags),
                GraphError::invalid_representation(format!(
                    "bags containing {u:?} are not connected"
                ))
            );
        }

        Ok(())
    }

    /// Returns *true* if the given bags induce a connected subgraph of the tree
    fn is_subtree(&self, bags: &[Bag<N>]) -> bool {
        let Some(first) = bags.first() else {
            return true;
        };
        let members: BTreeSet<&Bag<N>> = bags.iter().collect();
        let mut visited = BTreeSet::from([first.clone()]);
        let mut stack = vec![first.clone()];
        while let Some(b) = stack.pop() {
            for c in self.tree.neighbors_of(&b) {
                if members.contains(&c) && visited.insert(c.clone()) {
                    stack.push(c);
                }
            }
        }
        visited.len() == members.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gens::*;

    fn bag(nodes: &[Node]) -> Bag<Node> {
        nodes.iter().copied().collect()
    }

    #[test]
    fn path_decomposition_of_a_cycle() {
        let mut g: AdjMap<Node> = AdjMap::undirected();
        g.connect_cycle(0..5).unwrap();

        let tree = AdjMap::from_edges(
            false,
            [
                (bag(&[0, 1, 4]), bag(&[1, 3, 4])),
                (bag(&[1, 3, 4]), bag(&[1, 2, 3])),
            ],
        )
        .unwrap();
        let td = TreeDecomposition::new(tree);
        assert_eq!(td.width(), 2);
        assert_eq!(td.validate(&g), Ok(()));
        assert_eq!(TreeDecomposition::trivial(&g).validate(&g), Ok(()));
        assert_eq!(TreeDecomposition::trivial(&g).width(), 4);
    }

    #[test]
    fn violations_are_reported() {
        let mut g: AdjMap<Node> = AdjMap::undirected();
        g.connect_path(0..4).unwrap();

        let missing_edge = AdjMap::from_edges(false, [(bag(&[0, 1]), bag(&[2, 3]))]).unwrap();
        assert!(matches!(
            TreeDecomposition::new(missing_edge).validate(&g),
            Err(GraphError::InvalidRepresentation { .. })
        ));

        let broken_subtree = AdjMap::from_edges(
            false,
            [
                (bag(&[0, 1]), bag(&[1, 2])),
                (bag(&[1, 2]), bag(&[2, 3])),
                (bag(&[2, 3]), bag(&[0, 3])),
            ],
        )
        .unwrap();
        assert_eq!(
            TreeDecomposition::new(broken_subtree).validate(&g),
            Err(GraphError::invalid_representation(
                "bags containing 0 are not connected"
            ))
        );

        let mut forest: AdjMap<Bag<Node>> = AdjMap::undirected();
        forest.add_nodes([bag(&[0, 1, 2]), bag(&[2, 3])]);
        assert_eq!(
            TreeDecomposition::new(forest).validate(&g),
            Err(GraphError::invalid_representation("bags do not form a tree"))
        );
    }
}
