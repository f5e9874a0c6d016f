/*!
Graph traversal engines and traversal-derived utilities.

This module provides:
- [`Bfs`] and [`Dfs`]: eager engines that record the search forest (parents), BFS depths or
  DFS enter/exit timestamps, and report every discovery to a [`Visitor`].
- [`TraversalSearch`]: lazy BFS/DFS iterators yielding `(predecessor, node)` pairs,
  with stop-at nodes, excluded nodes and restarts.
- The [`Traversal`] trait that exposes the lazy iterators directly as methods on graphs.

Without a source, the engines restart at every unvisited node (in iteration order of the graph),
so the whole forest is covered. Hooks return [`ControlFlow`]: returning `Break` halts the search,
the partial maps stay intact and the output is flagged as `stopped`.
*/

use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    ops::ControlFlow,
};

use fxhash::{FxHashMap, FxHashSet};
use itertools::Itertools;
use tracing::debug;

use super::*;

/// Callbacks invoked by the traversal engines.
///
/// Every method has a no-op default, so implementors only override what they need.
pub trait Visitor<N> {
    /// Called once per node when it is first discovered (enqueued in BFS, entered in DFS)
    fn on_enter(&mut self, _u: &N, _parent: Option<&N>) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    /// Called once per node when all of its out-edges have been examined
    fn on_exit(&mut self, _u: &N) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    /// Called for every examined edge `(u, v)`, including edges to visited nodes
    fn on_edge(&mut self, _u: &N, _v: &N) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

impl<N> Visitor<N> for () {}

type EnterHook<'a, N> = Box<dyn FnMut(&N, Option<&N>) -> ControlFlow<()> + 'a>;
type ExitHook<'a, N> = Box<dyn FnMut(&N) -> ControlFlow<()> + 'a>;

/// A [`Visitor`] assembled from closures
///
/// ```
/// use std::ops::ControlFlow;
/// use graphtheory::{prelude::*, algo::*};
///
/// let g: AdjMap<Node> = AdjMap::from_edges(false, [(0, 1), (1, 2), (2, 3)]).unwrap();
///
/// let mut seen = Vec::new();
/// let mut hooks = Hooks::new().on_enter(|u: &Node, _| {
///     seen.push(*u);
///     if *u == 2 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
/// });
/// let bfs = Bfs::new(&g).run_with(Some(&0), &mut hooks).unwrap();
/// drop(hooks);
///
/// assert!(bfs.stopped);
/// assert_eq!(seen, vec![0, 1, 2]);
/// ```
pub struct Hooks<'a, N> {
    enter: Option<EnterHook<'a, N>>,
    exit: Option<ExitHook<'a, N>>,
}

impl<N> Default for Hooks<'_, N> {
    fn default() -> Self {
        Self {
            enter: None,
            exit: None,
        }
    }
}

impl<'a, N> Hooks<'a, N> {
    /// Creates a set of hooks that do nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pre-visit hook
    pub fn on_enter<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&N, Option<&N>) -> ControlFlow<()> + 'a,
    {
        self.enter = Some(Box::new(hook));
        self
    }

    /// Sets the post-visit hook
    pub fn on_exit<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&N) -> ControlFlow<()> + 'a,
    {
        self.exit = Some(Box::new(hook));
        self
    }
}

impl<N> Visitor<N> for Hooks<'_, N> {
    fn on_enter(&mut self, u: &N, parent: Option<&N>) -> ControlFlow<()> {
        match self.enter.as_mut() {
            Some(hook) => hook(u, parent),
            None => ControlFlow::Continue(()),
        }
    }

    fn on_exit(&mut self, u: &N) -> ControlFlow<()> {
        match self.exit.as_mut() {
            Some(hook) => hook(u),
            None => ControlFlow::Continue(()),
        }
    }
}

/// Walks a parent map up from `target` and returns the path from its root to `target`.
/// Fails with [`GraphError::NoPathToTarget`] if `target` was not reached.
pub fn reconstruct_path<N: NodeId>(parent: &BTreeMap<N, Option<N>>, target: &N) -> Result<Vec<N>> {
    let mut path = Vec::new();
    let mut current = Some(target.clone());
    while let Some(u) = current {
        let Some(p) = parent.get(&u) else {
            return Err(GraphError::no_path_to(target));
        };
        current = p.clone();
        path.push(u);
        ensure!(
            path.len() <= parent.len(),
            GraphError::invalid_argument("parent map contains a cycle")
        );
    }
    path.reverse();
    Ok(path)
}

/// Fails with [`GraphError::NodeNotFound`] if a given source is not part of the graph
fn check_source<G: GraphNodeOrder>(graph: &G, source: Option<&G::Node>) -> Result<()> {
    if let Some(s) = source {
        ensure!(graph.has_node(s), GraphError::node_not_found(s));
    }
    Ok(())
}

/// Roots of the search forest: the source or every node of the graph
fn roots_of<G: GraphNodeOrder>(graph: &G, source: Option<&G::Node>) -> Vec<G::Node> {
    match source {
        Some(s) => vec![s.clone()],
        None => graph.vertices().collect(),
    }
}

/// Result of a breadth-first search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BfsOutput<N> {
    /// Parent in the search forest; roots map to `None`
    pub parent: BTreeMap<N, Option<N>>,
    /// Hop distance to the root of the search tree
    pub distance: BTreeMap<N, usize>,
    /// Nodes in the order they were dequeued
    pub order: Vec<N>,
    /// *true* if a hook requested early termination
    pub stopped: bool,
}

impl<N> Default for BfsOutput<N> {
    fn default() -> Self {
        Self {
            parent: BTreeMap::new(),
            distance: BTreeMap::new(),
            order: Vec::new(),
            stopped: false,
        }
    }
}

impl<N: NodeId> BfsOutput<N> {
    /// Returns a shortest-hop path from the root of `target`'s search tree to `target`
    pub fn path(&self, target: &N) -> Result<Vec<N>> {
        reconstruct_path(&self.parent, target)
    }

    /// Returns *true* if `u` was discovered
    pub fn visited(&self, u: &N) -> bool {
        self.parent.contains_key(u)
    }
}

/// Breadth-first search following out-edges
pub struct Bfs<'a, G> {
    graph: &'a G,
}

impl<'a, G> Bfs<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self { graph }
    }

    /// Searches from `source` (or the whole forest if `None`)
    pub fn run(&self, source: Option<&G::Node>) -> Result<BfsOutput<G::Node>> {
        self.run_with(source, &mut ())
    }

    /// Searches from `source` (or the whole forest if `None`) reporting to `visitor`
    pub fn run_with<V>(
        &self,
        source: Option<&G::Node>,
        visitor: &mut V,
    ) -> Result<BfsOutput<G::Node>>
    where
        V: Visitor<G::Node>,
    {
        check_source(self.graph, source)?;
        debug!(n = self.graph.number_of_nodes(), "breadth-first search");

        let mut out = BfsOutput::default();
        for root in roots_of(self.graph, source) {
            if out.visited(&root) {
                continue;
            }
            if self.search_from(root, &mut out, visitor).is_break() {
                out.stopped = true;
                break;
            }
        }
        Ok(out)
    }

    fn search_from<V>(
        &self,
        root: G::Node,
        out: &mut BfsOutput<G::Node>,
        visitor: &mut V,
    ) -> ControlFlow<()>
    where
        V: Visitor<G::Node>,
    {
        out.parent.insert(root.clone(), None);
        out.distance.insert(root.clone(), 0);
        visitor.on_enter(&root, None)?;

        let mut queue = VecDeque::from([root]);
        while let Some(u) = queue.pop_front() {
            out.order.push(u.clone());
            let depth = out.distance[&u];
            for v in self.graph.neighbors_of(&u) {
                visitor.on_edge(&u, &v)?;
                if out.visited(&v) {
                    continue;
                }
                out.parent.insert(v.clone(), Some(u.clone()));
                out.distance.insert(v.clone(), depth + 1);
                visitor.on_enter(&v, Some(&u))?;
                queue.push_back(v);
            }
            visitor.on_exit(&u)?;
        }
        ControlFlow::Continue(())
    }
}

/// Node colors of a depth-first search; unvisited nodes are white (absent)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DfsColor {
    /// Entered, but not all out-edges examined
    Grey,
    /// Finished
    Black,
}

/// Result of a depth-first search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfsOutput<N> {
    /// Parent in the search forest; roots map to `None`
    pub parent: BTreeMap<N, Option<N>>,
    /// Time at which a node turned grey
    pub enter: BTreeMap<N, usize>,
    /// Time at which a node turned black
    pub exit: BTreeMap<N, usize>,
    pub preorder: Vec<N>,
    pub postorder: Vec<N>,
    /// *true* if a hook requested early termination
    pub stopped: bool,
}

impl<N> Default for DfsOutput<N> {
    fn default() -> Self {
        Self {
            parent: BTreeMap::new(),
            enter: BTreeMap::new(),
            exit: BTreeMap::new(),
            preorder: Vec::new(),
            postorder: Vec::new(),
            stopped: false,
        }
    }
}

impl<N: NodeId> DfsOutput<N> {
    /// Returns the tree path from the root of `target`'s search tree to `target`
    pub fn path(&self, target: &N) -> Result<Vec<N>> {
        reconstruct_path(&self.parent, target)
    }

    /// Returns the color of `u`, or `None` if it was never entered
    pub fn color(&self, u: &N) -> Option<DfsColor> {
        if self.exit.contains_key(u) {
            Some(DfsColor::Black)
        } else if self.enter.contains_key(u) {
            Some(DfsColor::Grey)
        } else {
            None
        }
    }
}

/// Bookkeeping shared by the iterative and the recursive search
struct DfsRun<'v, N, V> {
    out: DfsOutput<N>,
    colors: FxHashMap<N, DfsColor>,
    time: usize,
    visitor: &'v mut V,
}

impl<'v, N: NodeId, V: Visitor<N>> DfsRun<'v, N, V> {
    fn new(visitor: &'v mut V) -> Self {
        Self {
            out: DfsOutput::default(),
            colors: FxHashMap::default(),
            time: 0,
            visitor,
        }
    }

    fn is_white(&self, u: &N) -> bool {
        !self.colors.contains_key(u)
    }

    fn enter(&mut self, u: &N, parent: Option<&N>) -> ControlFlow<()> {
        self.colors.insert(u.clone(), DfsColor::Grey);
        self.out.parent.insert(u.clone(), parent.cloned());
        self.out.enter.insert(u.clone(), self.time);
        self.out.preorder.push(u.clone());
        self.time += 1;
        self.visitor.on_enter(u, parent)
    }

    fn exit(&mut self, u: &N) -> ControlFlow<()> {
        self.colors.insert(u.clone(), DfsColor::Black);
        self.out.exit.insert(u.clone(), self.time);
        self.out.postorder.push(u.clone());
        self.time += 1;
        self.visitor.on_exit(u)
    }
}

/// Depth-first search following out-edges.
///
/// Available as an explicit-stack search ([`Dfs::run_iterative`]), a recursive search with
/// identical outputs ([`Dfs::run_recursive`]) and a minimal recursive search recording parents
/// only ([`Dfs::run_parents`]). Neighbors are explored in iteration order of the graph.
pub struct Dfs<'a, G> {
    graph: &'a G,
}

impl<'a, G> Dfs<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self { graph }
    }

    /// Explicit-stack search from `source` (or the whole forest if `None`)
    pub fn run_iterative(&self, source: Option<&G::Node>) -> Result<DfsOutput<G::Node>> {
        self.run_iterative_with(source, &mut ())
    }

    /// Explicit-stack search reporting to `visitor`
    pub fn run_iterative_with<V>(
        &self,
        source: Option<&G::Node>,
        visitor: &mut V,
    ) -> Result<DfsOutput<G::Node>>
    where
        V: Visitor<G::Node>,
    {
        check_source(self.graph, source)?;
        debug!(n = self.graph.number_of_nodes(), "iterative depth-first search");

        let mut run = DfsRun::new(visitor);
        for root in roots_of(self.graph, source) {
            if run.is_white(&root) && self.iterative_from(root, &mut run).is_break() {
                run.out.stopped = true;
                break;
            }
        }
        Ok(run.out)
    }

    fn iterative_from<V>(&self, root: G::Node, run: &mut DfsRun<G::Node, V>) -> ControlFlow<()>
    where
        V: Visitor<G::Node>,
    {
        run.enter(&root, None)?;
        let nbs = self.graph.neighbors_of(&root).collect_vec().into_iter();
        let mut stack = vec![(root, nbs)];

        while let Some((u, nbs)) = stack.last_mut() {
            let u = u.clone();
            match nbs.next() {
                Some(v) => {
                    run.visitor.on_edge(&u, &v)?;
                    if run.is_white(&v) {
                        run.enter(&v, Some(&u))?;
                        let nbs = self.graph.neighbors_of(&v).collect_vec().into_iter();
                        stack.push((v, nbs));
                    }
                }
                None => {
                    stack.pop();
                    run.exit(&u)?;
                }
            }
        }
        ControlFlow::Continue(())
    }

    /// Recursive formulation of [`Dfs::run_iterative`] with identical outputs.
    ///
    /// Every call frame lives on an explicit stack, so paths of length `O(n)` cannot exhaust
    /// the call stack.
    pub fn run_recursive(&self, source: Option<&G::Node>) -> Result<DfsOutput<G::Node>> {
        self.run_recursive_with(source, &mut ())
    }

    /// Recursive search reporting to `visitor`
    pub fn run_recursive_with<V>(
        &self,
        source: Option<&G::Node>,
        visitor: &mut V,
    ) -> Result<DfsOutput<G::Node>>
    where
        V: Visitor<G::Node>,
    {
        check_source(self.graph, source)?;
        debug!(n = self.graph.number_of_nodes(), "recursive depth-first search");

        let mut run = DfsRun::new(visitor);
        for root in roots_of(self.graph, source) {
            if run.is_white(&root) && self.iterative_from(root, &mut run).is_break() {
                run.out.stopped = true;
                break;
            }
        }
        Ok(run.out)
    }

    /// Minimal search that only records the search forest
    pub fn run_parents(&self, source: Option<&G::Node>) -> Result<BTreeMap<G::Node, Option<G::Node>>> {
        check_source(self.graph, source)?;

        let mut parent = BTreeMap::new();
        for root in roots_of(self.graph, source) {
            if !parent.contains_key(&root) {
                parent.insert(root.clone(), None);
                self.parents_from(root, &mut parent);
            }
        }
        Ok(parent)
    }

    fn parents_from(&self, root: G::Node, parent: &mut BTreeMap<G::Node, Option<G::Node>>) {
        let nbs = self.graph.neighbors_of(&root).collect_vec().into_iter();
        let mut stack = vec![(root, nbs)];

        while let Some((u, nbs)) = stack.last_mut() {
            let Some(v) = nbs.next() else {
                stack.pop();
                continue;
            };
            if !parent.contains_key(&v) {
                parent.insert(v.clone(), Some(u.clone()));
                let nbs = self.graph.neighbors_of(&v).collect_vec().into_iter();
                stack.push((v, nbs));
            }
        }
    }
}

/// Abstraction for the traversal frontier data structure.
///
/// A `NodeSequencer` is responsible for storing the "to be visited"
/// nodes during a traversal. Different implementations determine
/// the traversal order:
///
/// - [`VecDeque`] -> queue semantics -> **BFS**
/// - [`Vec`] -> stack semantics -> **DFS**
/// - [`BTreeSet`] -> smallest item first
pub trait NodeSequencer<T>: Default {
    /// Creates a new sequencer initialized with a single item.
    fn init(item: T) -> Self {
        let mut sequencer = Self::default();
        sequencer.push(item);
        sequencer
    }

    /// Pushes an item into the frontier.
    fn push(&mut self, item: T);

    /// Removes and returns the next item from the frontier.
    fn pop(&mut self) -> Option<T>;

    /// Returns a clone of the next item without removing it.
    fn peek(&self) -> Option<T>;

    /// Returns the number of items currently in the frontier.
    fn cardinality(&self) -> usize;
}

impl<T: Clone> NodeSequencer<T> for VecDeque<T> {
    fn push(&mut self, item: T) {
        self.push_back(item)
    }
    fn pop(&mut self) -> Option<T> {
        self.pop_front()
    }
    fn peek(&self) -> Option<T> {
        self.front().cloned()
    }
    fn cardinality(&self) -> usize {
        self.len()
    }
}

impl<T: Clone> NodeSequencer<T> for Vec<T> {
    fn push(&mut self, item: T) {
        Vec::push(self, item)
    }
    fn pop(&mut self) -> Option<T> {
        Vec::pop(self)
    }
    fn peek(&self) -> Option<T> {
        self.last().cloned()
    }
    fn cardinality(&self) -> usize {
        self.len()
    }
}

impl<T: Clone + Ord> NodeSequencer<T> for BTreeSet<T> {
    fn push(&mut self, item: T) {
        self.insert(item);
    }
    fn pop(&mut self) -> Option<T> {
        self.pop_first()
    }
    fn peek(&self) -> Option<T> {
        self.first().cloned()
    }
    fn cardinality(&self) -> usize {
        self.len()
    }
}

/// Item of a lazy traversal: the node and the node it was discovered from
pub type PredecessorOfNode<N> = (Option<N>, N);

/// Generic lazy traversal iterator supporting BFS and DFS variants.
///
/// Maintains an explicit frontier (queue or stack) of nodes to visit and a set of discovered nodes.
/// Nodes are marked as discovered when pushed, so the stack variant yields a *DFS-like* order
/// (every node once, children of a node in reverse neighbor order); use [`Dfs`] for timestamps.
pub struct TraversalSearch<'a, G, S>
where
    G: AdjacencyList,
    S: NodeSequencer<PredecessorOfNode<G::Node>>,
{
    graph: &'a G,
    visited: FxHashSet<G::Node>,
    sequencer: S,
    stop_at: Option<G::Node>,
}

/// A lazy **breadth-first search** iterator using a queue (`VecDeque`).
pub type BfsSearch<'a, G> = TraversalSearch<'a, G, VecDeque<PredecessorOfNode<NodeOf<G>>>>;

/// A lazy **depth-first search** iterator using a stack (`Vec`).
pub type DfsSearch<'a, G> = TraversalSearch<'a, G, Vec<PredecessorOfNode<NodeOf<G>>>>;

impl<G, S> Iterator for TraversalSearch<'_, G, S>
where
    G: AdjacencyList,
    S: NodeSequencer<PredecessorOfNode<G::Node>>,
{
    type Item = PredecessorOfNode<G::Node>;

    fn next(&mut self) -> Option<Self::Item> {
        let popped = self.sequencer.pop()?;
        let u = &popped.1;

        if self.stop_at.as_ref() == Some(u) {
            while self.sequencer.pop().is_some() {} // drop all
        } else {
            for v in self.graph.neighbors_of(u) {
                if self.visited.insert(v.clone()) {
                    self.sequencer.push((Some(u.clone()), v));
                }
            }
        }

        Some(popped)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (
            self.sequencer.cardinality(),
            Some(self.graph.len().saturating_sub(self.visited.len()) + self.sequencer.cardinality()),
        )
    }
}

impl<'a, G, S> TraversalSearch<'a, G, S>
where
    G: AdjacencyList,
    S: NodeSequencer<PredecessorOfNode<G::Node>>,
{
    /// Creates a new traversal iterator starting from `start`.
    pub fn new(graph: &'a G, start: G::Node) -> Self {
        let mut visited = FxHashSet::default();
        visited.insert(start.clone());
        Self {
            graph,
            visited,
            sequencer: S::init((None, start)),
            stop_at: None,
        }
    }

    /// Returns *true* if `u` was discovered so far
    pub fn did_visit_node(&self, u: &G::Node) -> bool {
        self.visited.contains(u)
    }

    /// Tries to restart the search at a yet unvisited node (in iteration order of the graph)
    /// and returns true iff successful. Requires that search came to a hold earlier,
    /// i.e. self.next() returned None
    pub fn try_restart_at_unvisited(&mut self) -> bool {
        assert_eq!(self.sequencer.cardinality(), 0);
        let node = self.graph.vertices().find(|u| !self.visited.contains(u));
        match node {
            None => false,
            Some(x) => {
                self.visited.insert(x.clone());
                self.sequencer.push((None, x));
                true
            }
        }
    }

    /// Sets a stopper node. If this node is reached, the iterator returns it and afterwards only None.
    pub fn set_stop_at(&mut self, stopper: G::Node) {
        self.stop_at = Some(stopper);
    }

    /// Sets a stopper node. If this node is reached, the iterator returns it and afterwards only None.
    pub fn stop_at(mut self, stopper: G::Node) -> Self {
        self.set_stop_at(stopper);
        self
    }

    /// Excludes a node from the search. It will be treated as if it was already visited,
    /// i.e. no edges to or from that node will be taken.
    ///
    /// # Warning
    /// Calling this method has no effect if the node is already on the stack. It is therefore highly
    /// recommended to call this method directly after the constructor.
    pub fn exclude_node(&mut self, u: G::Node) {
        self.visited.insert(u);
    }

    /// Builder variant of [`TraversalSearch::exclude_node`]
    pub fn with_node_excluded(mut self, u: G::Node) -> Self {
        self.exclude_node(u);
        self
    }

    /// Exclude multiple nodes from traversal
    pub fn exclude_nodes(&mut self, us: impl IntoIterator<Item = G::Node>) {
        for u in us {
            self.exclude_node(u);
        }
    }

    /// Builder variant of [`TraversalSearch::exclude_nodes`]
    pub fn with_nodes_excluded(mut self, us: impl IntoIterator<Item = G::Node>) -> Self {
        self.exclude_nodes(us);
        self
    }

    /// Consumes the traversal search and returns true iff the requested node can be visited, i.e.
    /// if there exists a directed path of at least one edge from the start node to `u`
    /// (or `u` is the start node of a search that reaches it again).
    ///
    /// # Warning
    /// It is undefined behavior to call the method on a partially executed iterator.
    pub fn is_node_reachable(mut self, u: &G::Node) -> bool {
        assert_eq!(self.sequencer.cardinality(), 1);
        self.visited.remove(u);
        self.next();
        self.any(|(_, v)| &v == u)
    }

    /// Consumes the iterator and returns the implied search tree as parent map
    pub fn parent_map(self) -> BTreeMap<G::Node, Option<G::Node>> {
        self.map(|(p, u)| (u, p)).collect()
    }

    /// Consumes the iterator and returns the depth of every visited node in the search tree
    pub fn depths(self) -> BTreeMap<G::Node, usize> {
        let mut depths = BTreeMap::new();
        for (p, u) in self {
            let depth = p.and_then(|p| depths.get(&p).map(|d| d + 1)).unwrap_or(0);
            depths.insert(u, depth);
        }
        depths
    }

    /// Consumes the iterator and returns the position at which every visited node was yielded
    pub fn ranking(self) -> BTreeMap<G::Node, usize> {
        self.enumerate().map(|(rank, (_, u))| (u, rank)).collect()
    }
}

/// Provides lazy traversal iterators directly on graphs
pub trait Traversal: AdjacencyList + Sized {
    /// Returns an iterator that traverses nodes reachable from `start`
    /// in **breadth-first search (BFS) order** along with their predecessors.
    ///
    /// # Examples
    /// ```
    /// use graphtheory::{prelude::*, algo::*};
    ///
    /// let g: AdjMap<Node> = AdjMap::from_edges(false, [(0, 1), (1, 2)]).unwrap();
    ///
    /// let order: Vec<_> = g.bfs(&0).map(|(_, u)| u).collect();
    /// assert_eq!(order, vec![0, 1, 2]);
    /// ```
    fn bfs(&self, start: &Self::Node) -> BfsSearch<'_, Self> {
        BfsSearch::new(self, start.clone())
    }

    /// Returns an iterator that traverses nodes reachable from `start`
    /// in a **depth-first-like order** along with their predecessors.
    fn dfs(&self, start: &Self::Node) -> DfsSearch<'_, Self> {
        DfsSearch::new(self, start.clone())
    }

    /// Returns `true` if node `u` lies on a directed cycle
    fn is_node_on_cycle(&self, u: &Self::Node) -> bool {
        self.bfs(u).is_node_reachable(u)
    }

    /// Returns `true` if node `u` lies on a directed cycle **after
    /// removing the given set of nodes** from the graph.
    fn is_node_on_cycle_after_deleting<I>(&self, u: &Self::Node, deleted: I) -> bool
    where
        I: IntoIterator<Item = Self::Node>,
    {
        self.bfs(u)
            .with_nodes_excluded(deleted)
            .is_node_reachable(u)
    }

    /// Computes a path with the fewest edges from `start` to `end` (both included),
    /// or `None` if `end` is not reachable.
    fn shortest_hop_path(&self, start: &Self::Node, end: &Self::Node) -> Option<Vec<Self::Node>> {
        let parents = self.bfs(start).stop_at(end.clone()).parent_map();
        reconstruct_path(&parents, end).ok()
    }
}

impl<G> Traversal for G where G: AdjacencyList + Sized {}

#[cfg(test)]
pub mod tests {
    use super::*;

    //  / 2 --- \
    // 1         4 - 3
    //  \ 0 - 5 /
    fn diamond() -> AdjMap<Node> {
        AdjMap::from_edges(false, [(1, 2), (1, 0), (4, 3), (0, 5), (2, 4), (5, 4)]).unwrap()
    }

    #[test]
    fn bfs_distances_and_parents() {
        let g = diamond();
        let bfs = Bfs::new(&g).run(Some(&1)).unwrap();

        assert_eq!(bfs.order, vec![1, 0, 2, 5, 4, 3]);
        assert_eq!(
            bfs.distance,
            BTreeMap::from([(0, 1), (1, 0), (2, 1), (3, 3), (4, 2), (5, 2)])
        );
        assert_eq!(bfs.parent[&4], Some(2));
        assert_eq!(bfs.path(&3).unwrap(), vec![1, 2, 4, 3]);
        assert!(!bfs.stopped);
    }

    #[test]
    fn bfs_covers_forest() {
        let mut g = diamond();
        g.add_edge((7, 8)).unwrap();

        let bfs = Bfs::new(&g).run(None).unwrap();
        assert_eq!(bfs.order.len(), 8);
        assert_eq!(bfs.parent[&7], None);
        assert_eq!(bfs.distance[&8], 1);
        assert_eq!(bfs.path(&8).unwrap(), vec![7, 8]);

        let bfs = Bfs::new(&g).run(Some(&0)).unwrap();
        assert_eq!(bfs.path(&8), Err(GraphError::no_path_to(&8u32)));
        assert_eq!(
            Bfs::new(&g).run(Some(&42)).unwrap_err(),
            GraphError::node_not_found(&42u32)
        );
    }

    #[test]
    fn bfs_hooks_fire_once() {
        let g = diamond();
        let mut entered = Vec::new();
        let mut exited = Vec::new();
        let mut hooks = Hooks::new()
            .on_enter(|u: &Node, _| {
                entered.push(*u);
                ControlFlow::Continue(())
            })
            .on_exit(|u: &Node| {
                exited.push(*u);
                ControlFlow::Continue(())
            });
        Bfs::new(&g).run_with(None, &mut hooks).unwrap();
        drop(hooks);

        assert_eq!(entered.iter().copied().sorted().collect_vec(), (0..6).collect_vec());
        assert_eq!(exited.len(), 6);
        assert_eq!(entered[0], 0);
    }

    #[test]
    fn dfs_variants_agree() {
        let g = diamond();
        let iterative = Dfs::new(&g).run_iterative(Some(&1)).unwrap();
        let recursive = Dfs::new(&g).run_recursive(Some(&1)).unwrap();

        assert_eq!(iterative, recursive);
        assert_eq!(iterative.preorder, vec![1, 0, 5, 4, 2, 3]);
        assert_eq!(iterative.postorder, vec![2, 3, 4, 5, 0, 1]);
        assert_eq!(iterative.path(&2).unwrap(), vec![1, 0, 5, 4, 2]);

        let parents = Dfs::new(&g).run_parents(Some(&1)).unwrap();
        assert_eq!(parents, iterative.parent);
    }

    #[test]
    fn dfs_parenthesis_property() {
        let mut rng = rand_pcg::Pcg64Mcg::new(0x1234);
        for directed in [false, true] {
            let g: AdjMap<Node> = crate::gens::GraphFactory::from_rng(&mut rng)
                .directed(directed)
                .sparse(30, 60)
                .unwrap();
            let dfs = Dfs::new(&g).run_iterative(None).unwrap();

            assert_eq!(dfs.preorder.len(), 30);
            assert_eq!(dfs.postorder.len(), 30);
            assert_eq!(dfs, Dfs::new(&g).run_recursive(None).unwrap());

            for (u, v) in g.vertices().collect_vec().into_iter().tuple_combinations() {
                let (du, fu) = (dfs.enter[&u], dfs.exit[&u]);
                let (dv, fv) = (dfs.enter[&v], dfs.exit[&v]);
                let disjoint = fu < dv || fv < du;
                let nested = (du < dv && fv < fu) || (dv < du && fu < fv);
                assert!(disjoint ^ nested);
            }
            for u in g.vertices() {
                assert_eq!(dfs.color(&u), Some(DfsColor::Black));
            }
        }
    }

    #[test]
    fn dfs_stops_on_request() {
        let g = diamond();
        let mut hooks = Hooks::new().on_enter(|u: &Node, _| {
            if *u == 5 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        let dfs = Dfs::new(&g).run_iterative_with(Some(&1), &mut hooks).unwrap();

        assert!(dfs.stopped);
        assert_eq!(dfs.preorder, vec![1, 0, 5]);
        assert!(dfs.postorder.is_empty());
        assert_eq!(dfs.color(&0), Some(DfsColor::Grey));
        assert_eq!(dfs.color(&4), None);
    }

    #[test]
    fn lazy_bfs_with_predecessor() {
        let g = diamond();

        let mut edges = g.bfs(&1).collect_vec();
        edges.sort();
        assert_eq!(
            edges,
            vec![
                (None, 1),
                (Some(0), 5),
                (Some(1), 0),
                (Some(1), 2),
                (Some(2), 4),
                (Some(4), 3)
            ]
        );

        assert_eq!(
            g.bfs(&1).depths(),
            BTreeMap::from([(0, 1), (1, 0), (2, 1), (3, 3), (4, 2), (5, 2)])
        );
        assert_eq!(g.bfs(&1).ranking()[&3], 5);
    }

    #[test]
    fn test_stopper() {
        let g: AdjMap<Node> = AdjMap::from_edges(false, [(0, 1), (1, 2), (2, 3)]).unwrap();
        assert_eq!(g.bfs(&0).map(|(_, u)| u).collect_vec(), vec![0, 1, 2, 3]);
        assert_eq!(g.bfs(&0).stop_at(1).map(|(_, u)| u).collect_vec(), vec![0, 1]);
        assert_eq!(g.shortest_hop_path(&0, &3), Some(vec![0, 1, 2, 3]));
        assert_eq!(g.dfs(&3).map(|(_, u)| u).collect_vec(), vec![3, 2, 1, 0]);
    }

    #[test]
    fn restart_and_exclusion() {
        let g: AdjMap<Node> = AdjMap::from_edges(true, [(0, 1), (1, 2), (2, 1), (3, 4)]).unwrap();

        let mut search = g.bfs(&0);
        assert_eq!(search.by_ref().count(), 3);
        assert!(search.try_restart_at_unvisited());
        assert_eq!(search.by_ref().map(|(_, u)| u).collect_vec(), vec![3, 4]);
        assert!(!search.try_restart_at_unvisited());

        assert!(!g.is_node_on_cycle(&0));
        assert!(g.is_node_on_cycle(&1));
        assert!(!g.is_node_on_cycle_after_deleting(&1, [2]));
        assert!(g.is_node_on_cycle_after_deleting(&1, [0]));
        assert_eq!(g.shortest_hop_path(&2, &0), None);
    }

    #[test]
    fn dfs_variants_on_long_paths() {
        use crate::gens::GeneratorSubstructures;

        let n: Node = 100_000;
        let mut g: AdjMap<Node> = AdjMap::undirected();
        g.connect_path(0..n).unwrap();

        let dfs = Dfs::new(&g).run_recursive(Some(&0)).unwrap();
        assert_eq!(dfs.preorder, (0..n).collect_vec());
        assert_eq!(dfs.postorder, (0..n).rev().collect_vec());
        assert_eq!(dfs.exit[&0], 2 * n as usize - 1);

        let parents = Dfs::new(&g).run_parents(Some(&0)).unwrap();
        assert_eq!(parents.len(), n as usize);
        assert_eq!(parents[&0], None);
        assert_eq!(parents[&(n - 1)], Some(n - 2));
        assert_eq!(parents, dfs.parent);
    }
}
