use std::{
    collections::{BTreeMap, BTreeSet},
    iter::FusedIterator,
};

use itertools::Itertools;
use tracing::debug;

use super::*;

/// Assignment of nodes to numbered components `0..n`.
/// Components are numbered in the order they are discovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Components<N> {
    /// Component index of every node
    pub cc: BTreeMap<N, usize>,
    /// Number of components
    pub n_cc: usize,
}

impl<N: NodeId> Components<N> {
    /// Returns the nodes of every component, each sorted, indexed by component
    pub fn components(&self) -> Vec<Vec<N>> {
        group_by_index(&self.cc, self.n_cc)
    }

    /// Returns the component index of `u`
    pub fn component_of(&self, u: &N) -> Option<usize> {
        self.cc.get(u).copied()
    }

    /// Returns *true* if both nodes lie in the same component
    pub fn same_component(&self, u: &N, v: &N) -> bool {
        matches!((self.cc.get(u), self.cc.get(v)), (Some(a), Some(b)) if a == b)
    }
}

/// Strongly connected components of a directed graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrongComponents<N> {
    /// Component index of every node
    pub scc: BTreeMap<N, usize>,
    /// Number of strongly connected components
    pub n_scc: usize,
}

impl<N: NodeId> StrongComponents<N> {
    /// Returns the nodes of every component, each sorted, indexed by component
    pub fn components(&self) -> Vec<Vec<N>> {
        group_by_index(&self.scc, self.n_scc)
    }

    /// Returns *true* if both nodes are mutually reachable
    pub fn same_component(&self, u: &N, v: &N) -> bool {
        matches!((self.scc.get(u), self.scc.get(v)), (Some(a), Some(b)) if a == b)
    }
}

fn group_by_index<N: NodeId>(index: &BTreeMap<N, usize>, n: usize) -> Vec<Vec<N>> {
    let mut groups = vec![Vec::new(); n];
    for (u, &i) in index {
        groups[i].push(u.clone());
    }
    groups
}

/// Iterator emitting the nodes of one connected component at a time (in BFS order).
/// Components are started at the smallest unvisited node in iteration order of the graph.
pub struct ComponentIter<'a, G>
where
    G: AdjacencyList,
{
    graph: &'a G,
    excluded: BTreeSet<G::Node>,
    bfs: Option<BfsSearch<'a, G>>,
}

impl<'a, G> ComponentIter<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            excluded: BTreeSet::new(),
            bfs: None,
        }
    }

    /// Treats the given nodes as if they were deleted from the graph.
    /// Has no effect once the iteration started.
    pub fn exclude_nodes<I>(mut self, exclude: I) -> Self
    where
        I: IntoIterator<Item = G::Node>,
    {
        self.excluded.extend(exclude);
        self
    }
}

impl<G> Iterator for ComponentIter<'_, G>
where
    G: AdjacencyList,
{
    type Item = Vec<G::Node>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bfs.is_none() {
            let start = self
                .graph
                .vertices()
                .find(|u| !self.excluded.contains(u))?;
            self.bfs = Some(
                self.graph
                    .bfs(&start)
                    .with_nodes_excluded(self.excluded.iter().cloned()),
            );
        }

        let bfs = self.bfs.as_mut()?;
        loop {
            let cc = bfs.by_ref().map(|(_, u)| u).collect_vec();
            if !cc.is_empty() {
                return Some(cc);
            }

            if !bfs.try_restart_at_unvisited() {
                return None;
            }
        }
    }
}

impl<G> FusedIterator for ComponentIter<'_, G> where G: AdjacencyList {}

/// Connected components of an undirected graph
pub struct ConnectedComponents<'a, G> {
    graph: &'a G,
}

impl<'a, G> ConnectedComponents<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self { graph }
    }

    /// Fails with [`GraphError::DirectedMisuse`] for directed graphs
    pub fn run(&self) -> Result<Components<G::Node>> {
        self.graph.require_undirected()?;
        debug!(n = self.graph.number_of_nodes(), "connected components");

        let mut cc = BTreeMap::new();
        let mut n_cc = 0;
        for (i, component) in ComponentIter::new(self.graph).enumerate() {
            cc.extend(component.into_iter().map(|u| (u, i)));
            n_cc = i + 1;
        }
        Ok(Components { cc, n_cc })
    }
}

/// Components of a directed graph when ignoring edge orientation.
/// Undirected graphs are accepted and yield their connected components.
pub struct WeaklyConnectedComponents<'a, G> {
    graph: &'a G,
}

impl<'a, G> WeaklyConnectedComponents<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self { graph }
    }

    pub fn run(&self) -> Components<G::Node> {
        debug!(n = self.graph.number_of_nodes(), "weakly connected components");

        let mut cc = BTreeMap::new();
        let mut n_cc = 0;
        for root in self.graph.vertices() {
            if cc.contains_key(&root) {
                continue;
            }
            cc.insert(root.clone(), n_cc);
            let mut stack = vec![root];
            while let Some(u) = stack.pop() {
                for v in self
                    .graph
                    .neighbors_of(&u)
                    .chain(self.graph.in_neighbors_of(&u))
                {
                    if !cc.contains_key(&v) {
                        cc.insert(v.clone(), n_cc);
                        stack.push(v);
                    }
                }
            }
            n_cc += 1;
        }
        Components { cc, n_cc }
    }
}

/// Kosaraju's algorithm for strongly connected components:
/// a depth-first search on the graph records finishing times, a second search
/// on the transposed graph (following in-edges) in decreasing finishing time
/// collects one component per outer call.
///
/// Components are numbered in topological order of the condensation.
pub struct StronglyConnectedComponents<'a, G> {
    graph: &'a G,
}

impl<'a, G> StronglyConnectedComponents<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self { graph }
    }

    /// Fails with [`GraphError::UndirectedMisuse`] for undirected graphs
    pub fn run(&self) -> Result<StrongComponents<G::Node>> {
        self.graph.require_directed()?;
        debug!(
            n = self.graph.number_of_nodes(),
            "strongly connected components"
        );

        let finished = Dfs::new(self.graph).run_iterative(None)?.postorder;

        let mut scc = BTreeMap::new();
        let mut n_scc = 0;
        for root in finished.into_iter().rev() {
            if scc.contains_key(&root) {
                continue;
            }
            scc.insert(root.clone(), n_scc);
            let mut stack = vec![root];
            while let Some(u) = stack.pop() {
                for v in self.graph.in_neighbors_of(&u) {
                    if !scc.contains_key(&v) {
                        scc.insert(v.clone(), n_scc);
                        stack.push(v);
                    }
                }
            }
            n_scc += 1;
        }
        Ok(StrongComponents { scc, n_scc })
    }
}

/// Connectivity queries directly on graphs
pub trait Connectivity: AdjacencyList + Sized {
    /// Connected components of an undirected graph
    fn connected_components(&self) -> Result<Components<Self::Node>> {
        ConnectedComponents::new(self).run()
    }

    /// Lazily emits the connected components of an undirected graph
    fn component_iter(&self) -> ComponentIter<'_, Self> {
        ComponentIter::new(self)
    }

    /// Returns *true* if the undirected graph has at most one component.
    /// Graphs without nodes are connected.
    fn is_connected(&self) -> Result<bool> {
        Ok(self.connected_components()?.n_cc <= 1)
    }

    /// Strongly connected components of a directed graph
    fn strongly_connected_components(&self) -> Result<StrongComponents<Self::Node>> {
        StronglyConnectedComponents::new(self).run()
    }

    /// Returns *true* if every node of the directed graph reaches every other node
    fn is_strongly_connected(&self) -> Result<bool> {
        Ok(self.strongly_connected_components()?.n_scc <= 1)
    }

    /// Components when ignoring edge orientation
    fn weakly_connected_components(&self) -> Components<Self::Node> {
        WeaklyConnectedComponents::new(self).run()
    }

    /// Returns *true* if the graph is connected when ignoring edge orientation
    fn is_weakly_connected(&self) -> bool {
        self.weakly_connected_components().n_cc <= 1
    }
}

impl<G> Connectivity for G where G: AdjacencyList + Sized {}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::gens::GraphFactory;

    #[test]
    fn connected_components() {
        let mut g: AdjMap<Node> =
            AdjMap::from_edges(false, [(0, 1), (1, 2), (3, 4), (5, 6), (6, 7)]).unwrap();
        g.add_node(8);

        let components = g.connected_components().unwrap();
        assert_eq!(components.n_cc, 4);
        assert_eq!(
            components.components(),
            vec![vec![0, 1, 2], vec![3, 4], vec![5, 6, 7], vec![8]]
        );
        assert!(components.same_component(&5, &7));
        assert!(!components.same_component(&2, &3));
        assert_eq!(components.component_of(&8), Some(3));
        assert!(!g.is_connected().unwrap());

        assert_eq!(
            g.component_iter().map(|c| c.len()).collect_vec(),
            vec![3, 2, 3, 1]
        );
        assert_eq!(
            g.component_iter()
                .exclude_nodes([0, 6])
                .map(|c| c.into_iter().sorted().collect_vec())
                .collect_vec(),
            vec![vec![1, 2], vec![3, 4], vec![5], vec![7], vec![8]]
        );

        let directed: AdjMap<Node> = AdjMap::from_edges(true, [(0, 1)]).unwrap();
        assert_eq!(directed.is_connected(), Err(GraphError::DirectedMisuse));
        assert!(AdjMap::<Node>::undirected().is_connected().unwrap());
    }

    #[test]
    fn strongly_connected_components() {
        // CLRS figure 22.9 without the loop at h
        let g: AdjMap<char> = AdjMap::from_edges(
            true,
            [
                ('a', 'b'),
                ('b', 'c'),
                ('b', 'e'),
                ('b', 'f'),
                ('c', 'd'),
                ('c', 'g'),
                ('d', 'c'),
                ('d', 'h'),
                ('e', 'a'),
                ('e', 'f'),
                ('f', 'g'),
                ('g', 'f'),
                ('g', 'h'),
            ],
        )
        .unwrap();

        let scc = g.strongly_connected_components().unwrap();
        assert_eq!(scc.n_scc, 4);
        let mut components = scc.components();
        components.sort();
        assert_eq!(
            components,
            vec![
                vec!['a', 'b', 'e'],
                vec!['c', 'd'],
                vec!['f', 'g'],
                vec!['h']
            ]
        );
        // topological order of the condensation
        assert!(scc.scc[&'a'] < scc.scc[&'c']);
        assert!(scc.scc[&'c'] < scc.scc[&'h']);
        assert!(scc.scc[&'f'] < scc.scc[&'h']);
        assert!(!g.is_strongly_connected().unwrap());

        let undirected: AdjMap<Node> = AdjMap::from_edges(false, [(0, 1)]).unwrap();
        assert_eq!(
            undirected.strongly_connected_components(),
            Err(GraphError::UndirectedMisuse)
        );
    }

    #[test]
    fn scc_is_mutual_reachability() {
        let mut rng = Pcg64Mcg::seed_from_u64(3);
        for _ in 0..10 {
            let g: AdjMap<Node> = GraphFactory::from_rng(&mut rng)
                .directed(true)
                .sparse(20, 35)
                .unwrap();
            let scc = g.strongly_connected_components().unwrap();
            let reach: BTreeMap<Node, BfsOutput<Node>> = g
                .vertices()
                .map(|u| (u, Bfs::new(&g).run(Some(&u)).unwrap()))
                .collect();

            for u in g.vertices() {
                for v in g.vertices() {
                    let mutual = reach[&u].visited(&v) && reach[&v].visited(&u);
                    assert_eq!(scc.same_component(&u, &v), mutual);
                }
            }
        }
    }

    #[test]
    fn weakly_connected_components() {
        let g: AdjMap<Node> =
            AdjMap::from_edges(true, [(0, 1), (2, 1), (3, 4), (5, 4), (5, 6)]).unwrap();
        let wcc = g.weakly_connected_components();
        assert_eq!(wcc.n_cc, 2);
        assert_eq!(wcc.components(), vec![vec![0, 1, 2], vec![3, 4, 5, 6]]);
        assert!(!g.is_weakly_connected());

        let cycle: AdjMap<Node> = GraphFactory::new().directed(true).cycle(6).unwrap();
        assert!(cycle.is_weakly_connected());
        assert!(cycle.is_strongly_connected().unwrap());
    }
}
