/*!
# Maximum Flow

This module computes **maximum (s, t)-flows** and the corresponding **minimum cuts** by
augmenting paths in a residual network.

## Core concepts
- Every edge `(u, v)` with capacity `c` contributes a residual edge `u → v` with capacity `c`
  and a reverse residual edge `v → u` with capacity `0` (undirected edges contribute capacity `c`
  in both directions).
- Flow is stored separately and kept skew-symmetric: augmenting `u → v` by `Δ` adds `Δ` to
  `flow(u, v)` and subtracts `Δ` from `flow(v, u)`.
- The residual capacity of `u → v` is `capacity(u, v) - flow(u, v)`.

## Implementations
- [`FordFulkerson`] searches augmenting paths by depth-first search.
- [`EdmondsKarp`] searches shortest augmenting paths by breadth-first search in `O(n m^2)`.

Both return a [`MaxFlow`] with the flow value, the flow on every edge and a minimum cut.
*/

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use fxhash::FxHashMap;
use itertools::Itertools;
use num::Zero;
use tracing::{debug, trace};

use super::*;

/// Search used to find augmenting paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AugmentingSearch {
    #[default]
    Bfs,
    Dfs,
}

/// Residual network of an (s, t)-flow problem in index space
#[derive(Debug, Clone)]
pub struct ResidualNetwork<N, W> {
    indexer: Indexer<N>,
    s: usize,
    t: usize,
    capacity: Vec<BTreeMap<usize, W>>,
    flow: FxHashMap<(usize, usize), W>,
}

impl<N: NodeId, W: Weight> ResidualNetwork<N, W> {
    /// Builds the residual network of `graph` with edge weights as capacities.
    ///
    /// Fails with [`GraphError::NodeNotFound`] for unknown terminals, with
    /// [`GraphError::InvalidArgument`] if `s == t` and with [`GraphError::NegativeWeight`]
    /// for negative capacities.
    pub fn new<G>(graph: &G, s: &N, t: &N) -> Result<Self>
    where
        G: AdjacencyList<Node = N, Weight = W>,
    {
        let indexer = Indexer::new(graph);
        let si = indexer
            .index_of(s)
            .ok_or_else(|| GraphError::node_not_found(s))?;
        let ti = indexer
            .index_of(t)
            .ok_or_else(|| GraphError::node_not_found(t))?;
        ensure!(
            si != ti,
            GraphError::invalid_argument("source and sink must differ")
        );

        let mut capacity = vec![BTreeMap::new(); indexer.len()];
        for (u, nbs) in indexer.weighted_adjacency(graph).into_iter().enumerate() {
            for (v, c) in nbs {
                ensure!(
                    c >= W::zero(),
                    GraphError::negative_weight(indexer.node(u), indexer.node(v))
                );
                capacity[u].insert(v, c);
                capacity[v].entry(u).or_insert_with(W::zero);
            }
        }

        Ok(Self {
            indexer,
            s: si,
            t: ti,
            capacity,
            flow: FxHashMap::default(),
        })
    }

    fn flow_on(&self, u: usize, v: usize) -> W {
        self.flow.get(&(u, v)).copied().unwrap_or_else(W::zero)
    }

    /// Remaining admissible flow along `u → v`
    fn residual(&self, u: usize, v: usize) -> W {
        let c = self.capacity[u].get(&v).copied().unwrap_or_else(W::zero);
        c - self.flow_on(u, v)
    }

    /// Residual neighbors of `u` in increasing index order
    fn residual_neighbors(&self, u: usize) -> impl Iterator<Item = usize> + '_ {
        self.capacity[u]
            .keys()
            .copied()
            .filter(move |&v| self.residual(u, v) > W::zero())
    }

    /// Returns an s-t path of positive residual capacity.
    /// Fails with [`GraphError::NoAugmentingPath`] if the sink is unreachable.
    fn augmenting_path(&self, search: AugmentingSearch) -> Result<Vec<usize>> {
        let n = self.capacity.len();
        let mut predecessor = vec![None; n];
        let mut visited = vec![false; n];
        visited[self.s] = true;

        match search {
            AugmentingSearch::Bfs => {
                let mut queue = VecDeque::from([self.s]);
                while let Some(u) = queue.pop_front() {
                    if u == self.t {
                        break;
                    }
                    for v in self.residual_neighbors(u) {
                        if !visited[v] {
                            visited[v] = true;
                            predecessor[v] = Some(u);
                            queue.push_back(v);
                        }
                    }
                }
            }
            AugmentingSearch::Dfs => {
                let mut stack = vec![(self.s, self.residual_neighbors(self.s).collect_vec())];
                while let Some((u, nbs)) = stack.last_mut() {
                    if *u == self.t {
                        break;
                    }
                    let u = *u;
                    match nbs.iter().position(|&v| !visited[v]) {
                        Some(pos) => {
                            let v = nbs[pos];
                            nbs.drain(..=pos);
                            visited[v] = true;
                            predecessor[v] = Some(u);
                            stack.push((v, self.residual_neighbors(v).collect_vec()));
                        }
                        None => {
                            stack.pop();
                        }
                    }
                }
            }
        }

        ensure!(visited[self.t], GraphError::NoAugmentingPath);
        let mut path = vec![self.t];
        let mut v = self.t;
        while let Some(u) = predecessor[v] {
            path.push(u);
            v = u;
        }
        path.reverse();
        Ok(path)
    }

    /// Pushes the bottleneck capacity along `path` and returns it
    fn augment(&mut self, path: &[usize]) -> W {
        let Some(bottleneck) = path
            .iter()
            .tuple_windows()
            .map(|(&u, &v)| self.residual(u, v))
            .min()
        else {
            return W::zero();
        };

        for (&u, &v) in path.iter().tuple_windows() {
            let forward = self.flow_on(u, v) + bottleneck;
            let backward = self.flow_on(v, u) - bottleneck;
            self.flow.insert((u, v), forward);
            self.flow.insert((v, u), backward);
        }
        bottleneck
    }

    /// Nodes reachable from the source in the residual network
    fn source_side(&self) -> BTreeSet<usize> {
        let mut visited = BTreeSet::from([self.s]);
        let mut stack = vec![self.s];
        while let Some(u) = stack.pop() {
            for v in self.residual_neighbors(u) {
                if visited.insert(v) {
                    stack.push(v);
                }
            }
        }
        visited
    }
}

/// A maximum flow and a minimum cut
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxFlow<N, W> {
    /// Value of the flow
    pub max_flow: W,
    /// Positive flow along edges `(u, v)` of the input graph
    pub flow: BTreeMap<(N, N), W>,
    /// Source side of a minimum cut: the nodes reachable from the source in the final residual network
    pub min_cut: BTreeSet<N>,
    /// Edges leaving the source side; their capacities sum up to `max_flow`
    pub cut_edges: Vec<(N, N)>,
    /// Number of augmenting paths used
    pub augmentations: usize,
}

impl<N: NodeId, W: Weight> MaxFlow<N, W> {
    /// Returns the flow along `(u, v)` (zero if there is none)
    pub fn flow_on(&self, u: &N, v: &N) -> W {
        self.flow
            .get(&(u.clone(), v.clone()))
            .copied()
            .unwrap_or_else(W::zero)
    }
}

fn max_flow<G>(
    graph: &G,
    s: &G::Node,
    t: &G::Node,
    search: AugmentingSearch,
) -> Result<MaxFlow<G::Node, G::Weight>>
where
    G: AdjacencyList,
{
    debug!(
        n = graph.number_of_nodes(),
        m = graph.number_of_edges(),
        ?search,
        "maximum flow"
    );
    let mut network = ResidualNetwork::new(graph, s, t)?;

    let mut value = G::Weight::zero();
    let mut augmentations = 0;
    loop {
        let path = match network.augmenting_path(search) {
            Ok(path) => path,
            Err(GraphError::NoAugmentingPath) => break,
            Err(e) => return Err(e),
        };
        let delta = network.augment(&path);
        trace!(hops = path.len() - 1, ?delta, "augmenting path");
        value = value + delta;
        augmentations += 1;
    }

    let node = |i: usize| network.indexer.node(i).clone();
    let flow = network
        .flow
        .iter()
        .filter(|&(_, f)| *f > G::Weight::zero())
        .map(|(&(u, v), &f)| ((node(u), node(v)), f))
        .collect();

    let side = network.source_side();
    let mut cut_edges = Vec::new();
    for &u in &side {
        for (&v, &c) in &network.capacity[u] {
            if !side.contains(&v) && c > G::Weight::zero() {
                cut_edges.push((node(u), node(v)));
            }
        }
    }
    let min_cut = side.iter().map(|&u| node(u)).collect();

    Ok(MaxFlow {
        max_flow: value,
        flow,
        min_cut,
        cut_edges,
        augmentations,
    })
}

/// Ford–Fulkerson: augments along paths found by depth-first search (smallest neighbor first).
/// Terminates for integer capacities.
pub struct FordFulkerson<'a, G> {
    graph: &'a G,
}

impl<'a, G> FordFulkerson<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self { graph }
    }

    pub fn run(&self, s: &G::Node, t: &G::Node) -> Result<MaxFlow<G::Node, G::Weight>> {
        max_flow(self.graph, s, t, AugmentingSearch::Dfs)
    }
}

/// Edmonds–Karp: augments along shortest paths found by breadth-first search
pub struct EdmondsKarp<'a, G> {
    graph: &'a G,
}

impl<'a, G> EdmondsKarp<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self { graph }
    }

    pub fn run(&self, s: &G::Node, t: &G::Node) -> Result<MaxFlow<G::Node, G::Weight>> {
        max_flow(self.graph, s, t, AugmentingSearch::Bfs)
    }
}

/// Maximum flows directly on graphs
pub trait MaximumFlow: AdjacencyList + Sized {
    /// Value of a maximum flow from `s` to `t` by the Edmonds–Karp algorithm
    fn max_flow_value(&self, s: &Self::Node, t: &Self::Node) -> Result<Self::Weight> {
        Ok(EdmondsKarp::new(self).run(s, t)?.max_flow)
    }
}

impl<G> MaximumFlow for G where G: AdjacencyList + Sized {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gens::GraphFactory;

    fn assert_valid_flow<G: AdjacencyList + AdjacencyTest>(
        g: &G,
        s: &G::Node,
        t: &G::Node,
        result: &MaxFlow<G::Node, G::Weight>,
    ) {
        let mut balance: BTreeMap<G::Node, G::Weight> = BTreeMap::new();
        for ((u, v), &f) in &result.flow {
            let capacity = g.weight(u, v).unwrap_or_else(G::Weight::zero);
            assert!(f <= capacity);
            let out = balance.entry(u.clone()).or_insert_with(G::Weight::zero);
            *out = *out - f;
            let into = balance.entry(v.clone()).or_insert_with(G::Weight::zero);
            *into = *into + f;
        }
        for (u, b) in balance {
            if u == *s {
                assert_eq!(b, G::Weight::zero() - result.max_flow);
            } else if u == *t {
                assert_eq!(b, result.max_flow);
            } else {
                assert!(b.is_zero());
            }
        }

        assert!(result.min_cut.contains(s));
        assert!(!result.min_cut.contains(t));
        let cut_capacity = result
            .cut_edges
            .iter()
            .map(|(u, v)| g.weight(u, v).unwrap_or_else(G::Weight::zero))
            .fold(G::Weight::zero(), |a, b| a + b);
        assert_eq!(cut_capacity, result.max_flow);
    }

    #[test]
    fn small_network() {
        let g: AdjMap<Node> = AdjMap::from_edges(
            true,
            [(0, 1, 10), (0, 2, 10), (1, 2, 1), (1, 3, 10), (2, 3, 10)],
        )
        .unwrap();

        let ff = FordFulkerson::new(&g).run(&0, &3).unwrap();
        let ek = EdmondsKarp::new(&g).run(&0, &3).unwrap();
        assert_eq!(ff.max_flow, 20);
        assert_eq!(ek.max_flow, 20);
        assert_eq!(ek.augmentations, 2);
        assert_eq!(ek.min_cut, BTreeSet::from([0]));
        assert_eq!(ek.flow_on(&1, &3), 10);
        assert_eq!(ek.flow_on(&3, &1), 0);
        assert_valid_flow(&g, &0, &3, &ff);
        assert_valid_flow(&g, &0, &3, &ek);
    }

    #[test]
    fn antiparallel_and_undirected_edges() {
        let g: AdjMap<Node> =
            AdjMap::from_edges(true, [(0, 1, 4), (1, 0, 3), (1, 2, 2), (0, 2, 1)]).unwrap();
        assert_eq!(g.max_flow_value(&0, &2), Ok(3));

        let g: AdjMap<Node> =
            AdjMap::from_edges(false, [(0, 1, 4), (1, 2, 2), (2, 3, 5), (0, 2, 3), (1, 3, 1)])
                .unwrap();
        let result = FordFulkerson::new(&g).run(&0, &3).unwrap();
        assert_eq!(result.max_flow, 6);
        assert_valid_flow(&g, &0, &3, &result);
    }

    #[test]
    fn invalid_inputs() {
        let g: AdjMap<Node> = AdjMap::from_edges(true, [(0, 1, 4), (1, 2, -1)]).unwrap();
        assert_eq!(
            EdmondsKarp::new(&g).run(&0, &2),
            Err(GraphError::NegativeWeight {
                from: "1".to_string(),
                target: "2".to_string()
            })
        );
        assert!(matches!(
            EdmondsKarp::new(&g).run(&0, &0),
            Err(GraphError::InvalidArgument { .. })
        ));
        assert!(matches!(
            EdmondsKarp::new(&g).run(&0, &9),
            Err(GraphError::NodeNotFound { .. })
        ));

        let g: AdjMap<Node> = AdjMap::from_edges(true, [(0, 1, 4), (2, 1, 3)]).unwrap();
        let result = FordFulkerson::new(&g).run(&0, &2).unwrap();
        assert_eq!(result.max_flow, 0);
        assert!(result.flow.is_empty());
        assert!(result.cut_edges.is_empty());
    }

    #[test]
    fn algorithms_agree() {
        let mut factory = GraphFactory::with_seed(47).weights(1..=30);
        for _ in 0..10 {
            let g: AdjMap<Node> = factory.flow_network(14, 6, 4).unwrap();
            let ff = FordFulkerson::new(&g).run(&0, &13).unwrap();
            let ek = EdmondsKarp::new(&g).run(&0, &13).unwrap();
            assert_eq!(ff.max_flow, ek.max_flow);
            assert!(ek.max_flow > 0);
            assert_valid_flow(&g, &0, &13, &ff);
            assert_valid_flow(&g, &0, &13, &ek);
        }
    }
}
