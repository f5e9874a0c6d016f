/*!
# Eulerian Cycles

A graph is Eulerian if it is (strongly) connected and every node has an even degree
(undirected) or equal in- and out-degree (directed). Three classical constructions are provided:
- [`EulerStrategy::Hierholzer`]: walk until stuck, then splice in detours while backtracking,
- [`EulerStrategy::DfsOnCopy`]: the same construction written as a DFS over burnt edges,
- [`EulerStrategy::Fleury`]: never burn a bridge of the remaining graph unless forced.

All strategies remove edges from a private working copy of the graph and always take the
smallest remaining neighbor, so the resulting tour is deterministic.
*/

use std::collections::{BTreeSet, VecDeque};

use fxhash::FxHashMap;
use itertools::Itertools;
use tracing::{debug, trace};

use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EulerStrategy {
    #[default]
    Hierholzer,
    DfsOnCopy,
    Fleury,
}

/// A closed walk using every edge exactly once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EulerianTour<N, W> {
    /// Nodes of the walk; first and last node are the source, the length is `m + 1`
    pub eulerian_cycle: Vec<N>,
    /// The same walk as a sequence of edges
    pub eulerian_edges: Vec<Edge<N, W>>,
}

/// Checks whether the graph admits an Eulerian cycle; fails with [`GraphError::NotEulerian`] otherwise
pub fn check_eulerian<G>(graph: &G) -> Result<()>
where
    G: AdjacencyList,
{
    let degrees_balanced = if graph.is_directed() {
        ensure!(graph.is_strongly_connected()?, GraphError::NotEulerian);
        graph
            .vertices()
            .all(|u| graph.in_degree_of(&u) == graph.out_degree_of(&u))
    } else {
        ensure!(graph.is_connected()?, GraphError::NotEulerian);
        graph.vertices().all(|u| graph.out_degree_of(&u) % 2 == 0)
    };
    ensure!(degrees_balanced, GraphError::NotEulerian);
    Ok(())
}

/// Computes an Eulerian cycle starting (and ending) at a given source
pub struct EulerianCycle<'a, G> {
    graph: &'a G,
    strategy: EulerStrategy,
}

/// Remaining edges of the working copy in index space
struct WorkingCopy {
    directed: bool,
    adj: Vec<BTreeSet<usize>>,
}

impl WorkingCopy {
    fn smallest_neighbor(&self, u: usize) -> Option<usize> {
        self.adj[u].first().copied()
    }

    fn remove_edge(&mut self, u: usize, v: usize) {
        self.adj[u].remove(&v);
        if !self.directed {
            self.adj[v].remove(&u);
        }
    }

    fn restore_edge(&mut self, u: usize, v: usize) {
        self.adj[u].insert(v);
        if !self.directed {
            self.adj[v].insert(u);
        }
    }

    fn reaches(&self, s: usize, t: usize) -> bool {
        let mut visited = vec![false; self.adj.len()];
        visited[s] = true;
        let mut queue = VecDeque::from([s]);
        while let Some(u) = queue.pop_front() {
            if u == t {
                return true;
            }
            for &v in &self.adj[u] {
                if !visited[v] {
                    visited[v] = true;
                    queue.push_back(v);
                }
            }
        }
        false
    }

    /// The edge `(u, v)` is a bridge of the working copy iff `v` is unreachable from `u` without it
    fn is_bridge(&mut self, u: usize, v: usize) -> bool {
        self.remove_edge(u, v);
        let bridge = !self.reaches(u, v);
        self.restore_edge(u, v);
        bridge
    }
}

impl<'a, G> EulerianCycle<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            strategy: EulerStrategy::default(),
        }
    }

    pub fn strategy(mut self, strategy: EulerStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Fails with [`GraphError::NodeNotFound`] for an unknown source and with
    /// [`GraphError::NotEulerian`] if the graph is not Eulerian or the source has no out-edge
    pub fn run(&self, source: &G::Node) -> Result<EulerianTour<G::Node, G::Weight>> {
        debug!(
            n = self.graph.number_of_nodes(),
            m = self.graph.number_of_edges(),
            strategy = ?self.strategy,
            "eulerian cycle"
        );
        ensure!(
            self.graph.has_node(source),
            GraphError::node_not_found(source)
        );
        ensure!(
            self.graph.out_degree_of(source) > 0,
            GraphError::NotEulerian
        );
        check_eulerian(self.graph)?;

        let indexer = Indexer::new(self.graph);
        let weighted = indexer.weighted_adjacency(self.graph);
        let mut copy = WorkingCopy {
            directed: self.graph.is_directed(),
            adj: weighted
                .iter()
                .map(|nbs| nbs.iter().map(|&(v, _)| v).collect())
                .collect(),
        };
        let s = indexer
            .index_of(source)
            .ok_or_else(|| GraphError::node_not_found(source))?;

        let walk = match self.strategy {
            EulerStrategy::Hierholzer => hierholzer(&mut copy, s),
            EulerStrategy::DfsOnCopy => {
                let mut walk = Vec::new();
                dfs_on_copy(&mut copy, s, &mut walk);
                walk.reverse();
                walk
            }
            EulerStrategy::Fleury => fleury(&mut copy, s),
        };

        let weights: FxHashMap<(usize, usize), G::Weight> = weighted
            .into_iter()
            .enumerate()
            .flat_map(|(u, nbs)| nbs.into_iter().map(move |(v, w)| ((u, v), w)))
            .collect();
        let eulerian_edges = walk
            .iter()
            .tuple_windows()
            .filter_map(|(&u, &v)| {
                let w = *weights.get(&(u, v))?;
                Some(Edge::new(indexer.node(u).clone(), indexer.node(v).clone(), w))
            })
            .collect_vec();
        let eulerian_cycle = indexer.nodes_of(&walk);

        Ok(EulerianTour {
            eulerian_cycle,
            eulerian_edges,
        })
    }
}

fn hierholzer(copy: &mut WorkingCopy, s: usize) -> Vec<usize> {
    let mut stack = vec![s];
    let mut walk = Vec::new();
    while let Some(&u) = stack.last() {
        match copy.smallest_neighbor(u) {
            Some(v) => {
                copy.remove_edge(u, v);
                stack.push(v);
            }
            None => {
                trace!(u, "closing detour");
                walk.push(u);
                stack.pop();
            }
        }
    }
    walk.reverse();
    walk
}

/// Appends the nodes in reversed tour order.
///
/// Each frame is a node whose remaining edges are still being followed; a node is appended
/// once all its edges are burnt.
fn dfs_on_copy(copy: &mut WorkingCopy, s: usize, walk: &mut Vec<usize>) {
    let mut frames = vec![s];
    while let Some(&u) = frames.last() {
        if let Some(v) = copy.smallest_neighbor(u) {
            copy.remove_edge(u, v);
            frames.push(v);
        } else {
            frames.pop();
            walk.push(u);
        }
    }
}

fn fleury(copy: &mut WorkingCopy, s: usize) -> Vec<usize> {
    let mut walk = vec![s];
    let mut u = s;
    loop {
        let candidates = copy.adj[u].iter().copied().collect_vec();
        let Some(&fallback) = candidates.first() else {
            break;
        };
        let v = if candidates.len() == 1 {
            fallback
        } else {
            candidates
                .iter()
                .copied()
                .find(|&v| !copy.is_bridge(u, v))
                .unwrap_or(fallback)
        };
        copy.remove_edge(u, v);
        walk.push(v);
        u = v;
    }
    walk
}

/// Eulerian cycles directly on graphs
pub trait Eulerian: AdjacencyList + Sized {
    /// Returns *true* if the graph admits an Eulerian cycle
    fn is_eulerian(&self) -> bool {
        check_eulerian(self).is_ok()
    }

    /// Nodes of an Eulerian cycle starting at `source` (by Hierholzer's algorithm)
    fn eulerian_cycle(&self, source: &Self::Node) -> Result<Vec<Self::Node>> {
        Ok(EulerianCycle::new(self).run(source)?.eulerian_cycle)
    }
}

impl<G> Eulerian for G where G: AdjacencyList + Sized {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gens::*;

    const STRATEGIES: [EulerStrategy; 3] = [
        EulerStrategy::Hierholzer,
        EulerStrategy::DfsOnCopy,
        EulerStrategy::Fleury,
    ];

    fn assert_tour<G: AdjacencyList + AdjacencyTest>(g: &G, tour: &EulerianTour<G::Node, G::Weight>) {
        assert_eq!(tour.eulerian_cycle.len(), g.number_of_edges() + 1);
        assert_eq!(tour.eulerian_cycle.first(), tour.eulerian_cycle.last());
        assert_eq!(tour.eulerian_edges.len(), g.number_of_edges());

        let used = tour
            .eulerian_edges
            .iter()
            .map(|e| {
                assert_eq!(g.weight(&e.source, &e.target), Some(e.weight));
                if g.is_directed() {
                    e.endpoints()
                } else {
                    e.normalized().endpoints()
                }
            })
            .collect::<BTreeSet<_>>();
        assert_eq!(used.len(), g.number_of_edges());
    }

    #[test]
    fn undirected_example() {
        let mut g: AdjMap<Node> = AdjMap::from_edges(
            false,
            [(0, 1), (0, 3), (1, 4), (3, 4), (4, 2), (4, 5), (2, 5)],
        )
        .unwrap();

        for strategy in STRATEGIES {
            let tour = EulerianCycle::new(&g).strategy(strategy).run(&0).unwrap();
            assert_eq!(tour.eulerian_cycle, vec![0, 1, 4, 2, 5, 4, 3, 0]);
            assert_tour(&g, &tour);
        }

        g.add_edge((1, 2)).unwrap();
        assert!(!g.is_eulerian());
        for strategy in STRATEGIES {
            assert_eq!(
                EulerianCycle::new(&g).strategy(strategy).run(&0),
                Err(GraphError::NotEulerian)
            );
        }
    }

    #[test]
    fn directed_and_lattices() {
        let g: AdjMap<Node> =
            AdjMap::from_edges(true, [(0, 1, 3), (1, 2, 1), (2, 0, 2), (2, 3, 5), (3, 2, 4)])
                .unwrap();
        for strategy in STRATEGIES {
            let tour = EulerianCycle::new(&g).strategy(strategy).run(&2).unwrap();
            assert_tour(&g, &tour);
        }

        let torus: AdjMap<Node> = GraphFactory::with_seed(3)
            .weights(1..=9)
            .toroidal_grid(5)
            .unwrap();
        assert!(torus.is_eulerian());
        for strategy in STRATEGIES {
            let tour = EulerianCycle::new(&torus).strategy(strategy).run(&7).unwrap();
            assert_tour(&torus, &tour);
        }
    }

    #[test]
    fn rejected_inputs() {
        let mut g: AdjMap<Node> = GraphFactory::new().cycle(5).unwrap();
        assert_eq!(
            g.eulerian_cycle(&9),
            Err(GraphError::NodeNotFound {
                node: "9".to_string()
            })
        );

        g.add_node(9);
        assert_eq!(g.eulerian_cycle(&9), Err(GraphError::NotEulerian));
        assert_eq!(g.eulerian_cycle(&0), Err(GraphError::NotEulerian));

        let directed_path: AdjMap<Node> = AdjMap::from_edges(true, [(0, 1), (1, 2)]).unwrap();
        assert!(!directed_path.is_eulerian());
    }

    #[test]
    fn long_cycles() {
        let n = 100_000;
        let g: AdjMap<Node> = GraphFactory::new().cycle(n).unwrap();
        for strategy in [EulerStrategy::Hierholzer, EulerStrategy::DfsOnCopy] {
            let tour = EulerianCycle::new(&g).strategy(strategy).run(&0).unwrap();
            assert_eq!(tour.eulerian_cycle.len(), n + 1);
            assert_eq!(tour.eulerian_cycle[..3], [0, 1, 2]);
            assert_eq!(tour.eulerian_cycle.last(), Some(&0));
        }
    }
}
