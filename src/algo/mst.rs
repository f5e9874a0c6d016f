/*!
# Minimum Spanning Trees

Kruskal, Prim and Borůvka on undirected weighted graphs. Edges are compared by
`(weight, source, target)` of their normalized form, a strict total order, so the minimum
spanning forest is unique and all three algorithms return the same edges.
Disconnected graphs yield a minimum spanning forest.

[`KClustering`] stops Kruskal's algorithm once `k` components are left.
*/

use std::{
    cmp::Reverse,
    collections::{BTreeMap, BTreeSet, BinaryHeap},
};

use itertools::Itertools;
use tracing::{debug, trace};

use super::*;

/// A minimum spanning forest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanningForest<N, W> {
    /// Normalized edges sorted by weight, then endpoints
    pub mst: Vec<Edge<N, W>>,
    pub total_weight: W,
}

impl<N: NodeId, W: Weight> SpanningForest<N, W> {
    fn from_edges(mut mst: Vec<Edge<N, W>>) -> Self {
        mst.sort();
        let total_weight = total_weight(&mst);
        Self { mst, total_weight }
    }

    /// Builds the forest as a graph on the given nodes
    pub fn to_graph<G>(&self, nodes: impl IntoIterator<Item = N>) -> Result<G>
    where
        G: GraphEditing<Node = N, Weight = W>,
    {
        G::from_nodes_and_edges(false, nodes, self.mst.iter())
    }
}

/// Kruskal's algorithm: scans the edges in increasing order and keeps those joining two
/// components of a [`DisjointSet`]
pub struct Kruskal<'a, G> {
    graph: &'a G,
}

impl<'a, G> Kruskal<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self { graph }
    }

    pub fn run(&self) -> Result<SpanningForest<G::Node, G::Weight>> {
        self.graph.require_undirected()?;
        debug!(
            n = self.graph.number_of_nodes(),
            m = self.graph.number_of_edges(),
            "kruskal"
        );

        let mut components = DisjointSet::from_elements(self.graph.vertices());
        let target = self.graph.number_of_nodes().saturating_sub(1);
        let mut mst = Vec::with_capacity(target);
        for e in self.graph.sorted_edges() {
            if mst.len() == target {
                break;
            }
            if components.union(&e.source, &e.target) {
                trace!(?e, "tree edge");
                mst.push(e);
            }
        }
        Ok(SpanningForest::from_edges(mst))
    }
}

/// Result of a k-clustering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clustering<N, W> {
    /// Clusters, each sorted, ordered by their smallest node
    pub clusters: Vec<Vec<N>>,
    /// Cluster index of every node
    pub label: BTreeMap<N, usize>,
    /// Smallest weight of an edge between two different clusters (`None` if there is none)
    pub spacing: Option<W>,
}

/// Single-linkage clustering: Kruskal's algorithm halted once `k` components remain
pub struct KClustering<'a, G> {
    graph: &'a G,
    k: usize,
}

impl<'a, G> KClustering<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G, k: usize) -> Self {
        Self { graph, k }
    }

    /// Fails with [`GraphError::InvalidArgument`] unless `1 <= k <= n`.
    /// If the graph has more than `k` components, every component is a cluster.
    pub fn run(&self) -> Result<Clustering<G::Node, G::Weight>> {
        self.graph.require_undirected()?;
        ensure!(
            self.k >= 1 && self.k <= self.graph.number_of_nodes(),
            GraphError::invalid_argument(format!(
                "cannot split {} nodes into {} clusters",
                self.graph.number_of_nodes(),
                self.k
            ))
        );
        debug!(n = self.graph.number_of_nodes(), k = self.k, "k-clustering");

        let mut components = DisjointSet::from_elements(self.graph.vertices());
        let mut spacing = None;
        for e in self.graph.sorted_edges() {
            if components.same_set(&e.source, &e.target) {
                continue;
            }
            if components.number_of_sets() == self.k {
                spacing = Some(e.weight);
                break;
            }
            components.union(&e.source, &e.target);
        }

        let clusters = components.sets();
        let label = clusters
            .iter()
            .enumerate()
            .flat_map(|(i, c)| c.iter().map(move |u| (u.clone(), i)))
            .collect();
        Ok(Clustering {
            clusters,
            label,
            spacing,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimVariant {
    /// Heap of crossing edges; stale edges are skipped when popped
    #[default]
    Lazy,
    /// Heap of candidate nodes keyed by their lightest known connecting edge
    Keyed,
}

/// Prim's algorithm: grows a tree from a root by repeatedly adding the lightest crossing edge.
/// Every component not containing the root is grown from its smallest node.
pub struct Prim<'a, G> {
    graph: &'a G,
    variant: PrimVariant,
}

impl<'a, G> Prim<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            variant: PrimVariant::default(),
        }
    }

    pub fn variant(mut self, variant: PrimVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Grows the first tree from `root` (or the first node if `None`)
    pub fn run(&self, root: Option<&G::Node>) -> Result<SpanningForest<G::Node, G::Weight>> {
        self.graph.require_undirected()?;
        if let Some(r) = root {
            ensure!(self.graph.has_node(r), GraphError::node_not_found(r));
        }
        debug!(
            n = self.graph.number_of_nodes(),
            m = self.graph.number_of_edges(),
            variant = ?self.variant,
            "prim"
        );

        let roots = root
            .cloned()
            .into_iter()
            .chain(self.graph.vertices())
            .collect_vec();
        let mut in_tree = BTreeSet::new();
        let mut mst = Vec::new();
        for r in roots {
            if in_tree.contains(&r) {
                continue;
            }
            match self.variant {
                PrimVariant::Lazy => self.grow_lazy(r, &mut in_tree, &mut mst),
                PrimVariant::Keyed => self.grow_keyed(r, &mut in_tree, &mut mst),
            }
        }
        Ok(SpanningForest::from_edges(mst))
    }

    fn grow_lazy(
        &self,
        root: G::Node,
        in_tree: &mut BTreeSet<G::Node>,
        mst: &mut Vec<EdgeOf<G>>,
    ) {
        let mut heap = BinaryHeap::new();
        self.push_crossing(root, in_tree, &mut heap);
        while let Some(Reverse((e, v))) = heap.pop() {
            if in_tree.contains(&v) {
                continue;
            }
            mst.push(e);
            self.push_crossing(v, in_tree, &mut heap);
        }
    }

    /// Adds `u` to the tree and pushes its edges leaving the tree
    fn push_crossing(
        &self,
        u: G::Node,
        in_tree: &mut BTreeSet<G::Node>,
        heap: &mut BinaryHeap<Reverse<(EdgeOf<G>, G::Node)>>,
    ) {
        for e in self.graph.out_edges_of(&u) {
            if !in_tree.contains(&e.target) {
                heap.push(Reverse((e.normalized(), e.target)));
            }
        }
        in_tree.insert(u);
    }

    fn grow_keyed(
        &self,
        root: G::Node,
        in_tree: &mut BTreeSet<G::Node>,
        mst: &mut Vec<EdgeOf<G>>,
    ) {
        let mut best: BTreeMap<G::Node, EdgeOf<G>> = BTreeMap::new();
        let mut heap = BinaryHeap::new();
        let mut current = Some(root);

        while let Some(u) = current.take() {
            in_tree.insert(u.clone());
            for e in self.graph.out_edges_of(&u) {
                if in_tree.contains(&e.target) {
                    continue;
                }
                let key = e.normalized();
                if best.get(&e.target).is_none_or(|b| key < *b) {
                    best.insert(e.target.clone(), key.clone());
                    heap.push(Reverse((key, e.target)));
                }
            }

            while let Some(Reverse((key, v))) = heap.pop() {
                // entries whose key was improved later are stale
                if in_tree.contains(&v) || best.get(&v) != Some(&key) {
                    continue;
                }
                mst.push(key);
                current = Some(v);
                break;
            }
        }
    }
}

/// Borůvka's algorithm: in every round each component selects its lightest outgoing edge and
/// all selected edges are contracted
pub struct Boruvka<'a, G> {
    graph: &'a G,
}

impl<'a, G> Boruvka<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self { graph }
    }

    pub fn run(&self) -> Result<SpanningForest<G::Node, G::Weight>> {
        self.graph.require_undirected()?;
        debug!(
            n = self.graph.number_of_nodes(),
            m = self.graph.number_of_edges(),
            "boruvka"
        );

        let edges = self.graph.edges().collect_vec();
        let mut components = DisjointSet::from_elements(self.graph.vertices());
        let mut mst = Vec::new();

        for round in 1.. {
            let mut cheapest: BTreeMap<G::Node, EdgeOf<G>> = BTreeMap::new();
            for e in &edges {
                let (Some(cu), Some(cv)) = (components.find(&e.source), components.find(&e.target))
                else {
                    continue;
                };
                if cu == cv {
                    continue;
                }
                for c in [cu, cv] {
                    if cheapest.get(&c).is_none_or(|best| e < best) {
                        cheapest.insert(c, e.clone());
                    }
                }
            }
            trace!(round, selected = cheapest.len(), "boruvka round");
            if cheapest.is_empty() {
                break;
            }

            for e in cheapest.into_values() {
                if components.union(&e.source, &e.target) {
                    mst.push(e);
                }
            }
        }
        Ok(SpanningForest::from_edges(mst))
    }
}

/// Minimum spanning forests directly on graphs
pub trait MinimumSpanningTree: AdjacencyList + Sized {
    /// Edges of a minimum spanning forest by Kruskal's algorithm
    fn minimum_spanning_tree(&self) -> Result<Vec<EdgeOf<Self>>> {
        Ok(Kruskal::new(self).run()?.mst)
    }

    /// Weight of a minimum spanning forest
    fn minimum_spanning_weight(&self) -> Result<Self::Weight> {
        Ok(Kruskal::new(self).run()?.total_weight)
    }
}

impl<G> MinimumSpanningTree for G where G: AdjacencyList + Sized {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gens::GraphFactory;

    fn example() -> AdjMap<char> {
        AdjMap::from_edges(
            false,
            [
                ('A', 'B', 7),
                ('B', 'C', 11),
                ('A', 'D', 4),
                ('D', 'B', 9),
                ('E', 'B', 10),
                ('C', 'E', 5),
                ('D', 'E', 15),
                ('D', 'F', 6),
                ('F', 'E', 12),
                ('F', 'G', 13),
                ('E', 'G', 8),
            ],
        )
        .unwrap()
    }

    #[test]
    fn kruskal_example() {
        let g = example();
        let forest = Kruskal::new(&g).run().unwrap();

        assert_eq!(forest.total_weight, 40);
        assert_eq!(
            forest.mst,
            vec![
                Edge::new('A', 'D', 4),
                Edge::new('C', 'E', 5),
                Edge::new('D', 'F', 6),
                Edge::new('A', 'B', 7),
                Edge::new('E', 'G', 8),
                Edge::new('B', 'E', 10),
            ]
        );

        let tree: AdjMap<char> = forest.to_graph(g.vertices()).unwrap();
        assert!(tree.is_connected().unwrap());
        assert!(tree.is_acyclic());
    }

    #[test]
    fn algorithms_agree() {
        let g = example();
        let kruskal = Kruskal::new(&g).run().unwrap();
        assert_eq!(Boruvka::new(&g).run().unwrap(), kruskal);
        for variant in [PrimVariant::Lazy, PrimVariant::Keyed] {
            assert_eq!(Prim::new(&g).variant(variant).run(Some(&'G')).unwrap(), kruskal);
        }

        let mut factory = GraphFactory::with_seed(43).weights(1..=5);
        for _ in 0..10 {
            let g: AdjMap<Node> = factory.sparse(40, 70).unwrap();
            let kruskal = Kruskal::new(&g).run().unwrap();
            let components = g.connected_components().unwrap().n_cc;
            assert_eq!(kruskal.mst.len(), g.number_of_nodes() - components);

            assert_eq!(Boruvka::new(&g).run().unwrap(), kruskal);
            assert_eq!(Prim::new(&g).run(None).unwrap(), kruskal);
            assert_eq!(
                Prim::new(&g).variant(PrimVariant::Keyed).run(Some(&17)).unwrap(),
                kruskal
            );
        }
    }

    #[test]
    fn directed_graphs_are_rejected() {
        let g: AdjMap<Node> = AdjMap::from_edges(true, [(0, 1)]).unwrap();
        assert_eq!(Kruskal::new(&g).run(), Err(GraphError::DirectedMisuse));
        assert_eq!(Prim::new(&g).run(None), Err(GraphError::DirectedMisuse));
        assert_eq!(Boruvka::new(&g).run(), Err(GraphError::DirectedMisuse));
    }

    #[test]
    fn k_clustering() {
        let g = example();
        let two = KClustering::new(&g, 2).run().unwrap();
        assert_eq!(
            two.clusters,
            vec![vec!['A', 'B', 'D', 'F'], vec!['C', 'E', 'G']]
        );
        assert_eq!(two.spacing, Some(10));
        assert_eq!(two.label[&'G'], 1);
        assert_eq!(two.label[&'F'], 0);

        let seven = KClustering::new(&g, 7).run().unwrap();
        assert_eq!(seven.clusters.len(), 7);
        assert_eq!(seven.spacing, Some(4));

        let one = KClustering::new(&g, 1).run().unwrap();
        assert_eq!(one.clusters.len(), 1);
        assert_eq!(one.spacing, None);

        assert!(KClustering::new(&g, 0).run().is_err());
        assert!(KClustering::new(&g, 8).run().is_err());
    }
}
