use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    ops::ControlFlow,
};

use fxhash::{FxHashMap, FxHashSet};
use tracing::debug;

use super::*;

/// A topological order of a directed acyclic graph:
/// for every edge `(u, v)`, `u` precedes `v` in `sorted_nodes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologicalOrder<N> {
    pub sorted_nodes: Vec<N>,
}

impl<N: NodeId> TopologicalOrder<N> {
    /// Returns the position of every node in the order
    pub fn ranking(&self) -> BTreeMap<N, usize> {
        self.sorted_nodes
            .iter()
            .enumerate()
            .map(|(i, u)| (u.clone(), i))
            .collect()
    }
}

/// Stops a depth-first search at the first edge into a node that is still open
struct BackEdgeDetector<N> {
    open: FxHashSet<N>,
    found: bool,
}

impl<N: NodeId> Visitor<N> for BackEdgeDetector<N> {
    fn on_enter(&mut self, u: &N, _parent: Option<&N>) -> ControlFlow<()> {
        self.open.insert(u.clone());
        ControlFlow::Continue(())
    }

    fn on_exit(&mut self, u: &N) -> ControlFlow<()> {
        self.open.remove(u);
        ControlFlow::Continue(())
    }

    fn on_edge(&mut self, _u: &N, v: &N) -> ControlFlow<()> {
        if self.open.contains(v) {
            self.found = true;
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }
}

/// Topological sort by depth-first search: the reversed postorder.
/// Fails with [`GraphError::NotDag`] on the first back edge.
pub struct TopologicalSort<'a, G> {
    graph: &'a G,
}

impl<'a, G> TopologicalSort<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self { graph }
    }

    pub fn run(&self) -> Result<TopologicalOrder<G::Node>> {
        self.graph.require_directed()?;
        debug!(n = self.graph.number_of_nodes(), "topological sort (DFS)");

        let mut detector = BackEdgeDetector {
            open: FxHashSet::default(),
            found: false,
        };
        let dfs = Dfs::new(self.graph).run_iterative_with(None, &mut detector)?;
        ensure!(!detector.found, GraphError::NotDag);

        let mut sorted_nodes = dfs.postorder;
        sorted_nodes.reverse();
        Ok(TopologicalOrder { sorted_nodes })
    }
}

/// Container holding the nodes whose in-degree dropped to zero in Kahn's algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Frontier {
    /// First in, first out
    #[default]
    Queue,
    /// Last in, first out
    Stack,
    /// Smallest node first; yields the lexicographically smallest order
    Set,
}

/// Kahn's algorithm: repeatedly removes a node of in-degree zero.
/// Fails with [`GraphError::NotDag`] if nodes remain unprocessed.
pub struct KahnTopologicalSort<'a, G> {
    graph: &'a G,
    frontier: Frontier,
}

impl<'a, G> KahnTopologicalSort<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            frontier: Frontier::default(),
        }
    }

    /// Sets the container of zero in-degree nodes
    pub fn frontier(mut self, frontier: Frontier) -> Self {
        self.frontier = frontier;
        self
    }

    pub fn run(&self) -> Result<TopologicalOrder<G::Node>> {
        self.graph.require_directed()?;
        debug!(
            n = self.graph.number_of_nodes(),
            frontier = ?self.frontier,
            "topological sort (Kahn)"
        );

        match self.frontier {
            Frontier::Queue => self.sort_with::<VecDeque<G::Node>>(),
            Frontier::Stack => self.sort_with::<Vec<G::Node>>(),
            Frontier::Set => self.sort_with::<BTreeSet<G::Node>>(),
        }
    }

    fn sort_with<S>(&self) -> Result<TopologicalOrder<G::Node>>
    where
        S: NodeSequencer<G::Node>,
    {
        let mut in_degs: FxHashMap<G::Node, usize> = self
            .graph
            .vertices()
            .map(|u| {
                let d = self.graph.in_degree_of(&u);
                (u, d)
            })
            .collect();

        let mut frontier = S::default();
        for u in self.graph.vertices() {
            if in_degs.get(&u) == Some(&0) {
                frontier.push(u);
            }
        }

        let mut sorted_nodes = Vec::with_capacity(in_degs.len());
        while let Some(u) = frontier.pop() {
            for v in self.graph.neighbors_of(&u) {
                if let Some(d) = in_degs.get_mut(&v) {
                    *d -= 1;
                    if *d == 0 {
                        frontier.push(v);
                    }
                }
            }
            sorted_nodes.push(u);
        }

        ensure!(sorted_nodes.len() == in_degs.len(), GraphError::NotDag);
        Ok(TopologicalOrder { sorted_nodes })
    }
}

/// Topological ordering directly on graphs
pub trait TopologicalOrdering: AdjacencyList + Sized {
    /// Topological order by depth-first search
    fn topological_sort(&self) -> Result<Vec<Self::Node>> {
        Ok(TopologicalSort::new(self).run()?.sorted_nodes)
    }

    /// Returns *true* if the graph is directed and acyclic
    fn is_dag(&self) -> bool {
        TopologicalSort::new(self).run().is_ok()
    }
}

impl<G> TopologicalOrdering for G where G: AdjacencyList + Sized {}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;
    use crate::gens::GraphFactory;

    const FRONTIERS: [Frontier; 3] = [Frontier::Queue, Frontier::Stack, Frontier::Set];

    fn assert_topological<G: AdjacencyList>(g: &G, order: &TopologicalOrder<G::Node>) {
        assert_eq!(order.sorted_nodes.len(), g.number_of_nodes());
        let rank = order.ranking();
        for e in g.edges() {
            assert!(rank[&e.source] < rank[&e.target]);
        }
    }

    #[test]
    fn small_dag() {
        let g: AdjMap<Node> =
            AdjMap::from_edges(true, [(2, 0), (1, 0), (0, 3), (0, 4), (0, 5), (3, 6)]).unwrap();

        let dfs = TopologicalSort::new(&g).run().unwrap();
        assert_eq!(dfs.sorted_nodes, vec![2, 1, 0, 5, 4, 3, 6]);

        let expected = [
            vec![1, 2, 0, 3, 4, 5, 6],
            vec![2, 1, 0, 5, 4, 3, 6],
            vec![1, 2, 0, 3, 4, 5, 6],
        ];
        for (frontier, expected) in FRONTIERS.into_iter().zip(expected) {
            let kahn = KahnTopologicalSort::new(&g).frontier(frontier).run().unwrap();
            assert_eq!(kahn.sorted_nodes, expected);
            assert_topological(&g, &kahn);
        }
    }

    #[test]
    fn random_dags() {
        let mut factory = GraphFactory::with_seed(17).directed(true);
        for _ in 0..20 {
            let random: AdjMap<Node> = factory.sparse(25, 60).unwrap();
            let dag: AdjMap<Node> = AdjMap::from_nodes_and_edges(
                true,
                random.vertices(),
                random
                    .edges()
                    .map(|e| e.normalized())
                    .unique_by(|e| e.endpoints()),
            )
            .unwrap();

            assert!(dag.is_dag());
            assert_topological(&dag, &TopologicalSort::new(&dag).run().unwrap());
            for frontier in FRONTIERS {
                let order = KahnTopologicalSort::new(&dag).frontier(frontier).run().unwrap();
                assert_topological(&dag, &order);
            }
        }
    }

    #[test]
    fn cycles_are_rejected() {
        let g: AdjMap<Node> =
            AdjMap::from_edges(true, [(0, 1), (1, 2), (2, 3), (3, 1), (4, 0)]).unwrap();

        assert_eq!(TopologicalSort::new(&g).run(), Err(GraphError::NotDag));
        for frontier in FRONTIERS {
            assert_eq!(
                KahnTopologicalSort::new(&g).frontier(frontier).run(),
                Err(GraphError::NotDag)
            );
        }
        assert!(!g.is_dag());

        let undirected: AdjMap<Node> = AdjMap::from_edges(false, [(0, 1)]).unwrap();
        assert_eq!(
            undirected.topological_sort(),
            Err(GraphError::UndirectedMisuse)
        );
    }
}
