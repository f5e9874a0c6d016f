use fxhash::FxHashMap;
use itertools::Itertools;
use tracing::debug;

use super::*;

/// Cycle detection by depth-first search tracking grey/black nodes.
///
/// In a directed graph every edge to a grey node closes a cycle.
/// In an undirected graph the edge back to the DFS parent is ignored (there are no parallel edges).
pub struct CycleDetection<'a, G> {
    graph: &'a G,
}

impl<'a, G> CycleDetection<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self { graph }
    }

    /// Fails with [`GraphError::CycleDetected`] if the graph contains a cycle
    pub fn run(&self) -> Result<()> {
        match self.find_cycle() {
            Some(_) => Err(GraphError::CycleDetected),
            None => Ok(()),
        }
    }

    /// Returns the nodes of some cycle in traversal order (the closing edge leads from the
    /// last node back to the first), or `None` if the graph is acyclic
    pub fn find_cycle(&self) -> Option<Vec<G::Node>> {
        debug!(
            n = self.graph.number_of_nodes(),
            directed = self.graph.is_directed(),
            "cycle detection"
        );
        let directed = self.graph.is_directed();
        let mut color = FxHashMap::default();

        for root in self.graph.vertices() {
            if color.contains_key(&root) {
                continue;
            }
            color.insert(root.clone(), DfsColor::Grey);
            let nbs = self.graph.neighbors_of(&root).collect_vec().into_iter();
            let mut stack = vec![(root, None, nbs)];

            while let Some((u, parent, nbs)) = stack.last_mut() {
                let Some(v) = nbs.next() else {
                    color.insert(u.clone(), DfsColor::Black);
                    stack.pop();
                    continue;
                };

                match color.get(&v).copied() {
                    None => {
                        let u = u.clone();
                        color.insert(v.clone(), DfsColor::Grey);
                        let nbs = self.graph.neighbors_of(&v).collect_vec().into_iter();
                        stack.push((v, Some(u), nbs));
                    }
                    Some(DfsColor::Grey) if directed || parent.as_ref() != Some(&v) => {
                        let pos = stack.iter().position(|(w, _, _)| *w == v)?;
                        return Some(stack[pos..].iter().map(|(w, _, _)| w.clone()).collect());
                    }
                    _ => {}
                }
            }
        }
        None
    }
}

/// Acyclicity queries directly on graphs
pub trait Acyclicity: AdjacencyList + Sized {
    /// Returns *true* if the graph has no (directed) cycle
    fn is_acyclic(&self) -> bool {
        CycleDetection::new(self).run().is_ok()
    }

    /// Returns the nodes of some cycle or `None` if there is none
    fn find_cycle(&self) -> Option<Vec<Self::Node>> {
        CycleDetection::new(self).find_cycle()
    }
}

impl<G> Acyclicity for G where G: AdjacencyList + Sized {}
