/*!
# Forests

Covering problems that are NP-hard in general are solved exactly on forests by dynamic
programming over the subtrees (Borie's method): every node keeps one optimal solution of its
subtree per *state* of the node itself, and a parent composes the states of its children.

| problem                     | states                                                     |
|-----------------------------|------------------------------------------------------------|
| minimum node cover          | node taken / not taken                                     |
| maximum independent set     | node taken / not taken                                     |
| minimum dominating set      | node taken / dominated by a child / not dominated yet      |

Additionally [`ForestSolver::layout`] places a forest in the plane for drawing.
*/

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use super::*;

type Set<N> = BTreeSet<N>;

/// Forest rooted at the smallest node of every component
struct RootedForest<N> {
    /// Children of every node in traversal order
    children: BTreeMap<N, Vec<N>>,
    roots: Vec<N>,
    postorder: Vec<N>,
    preorder: Vec<N>,
}

/// Union of `first` with `rest` where the smaller operands are moved into the larger
fn union<N: NodeId>(mut first: Set<N>, rest: impl IntoIterator<Item = Set<N>>) -> Set<N> {
    for mut other in rest {
        if other.len() > first.len() {
            std::mem::swap(&mut first, &mut other);
        }
        first.append(&mut other);
    }
    first
}

/// The smaller of both sets, preferring `a` on ties
fn smaller<'s, N>(a: &'s Set<N>, b: &'s Set<N>) -> &'s Set<N> {
    if b.len() < a.len() { b } else { a }
}

/// Solutions of a subtree for the three domination states of its root
#[derive(Debug, Clone)]
struct Domination<N> {
    taken: Set<N>,
    dominated: Option<Set<N>>,
    undominated: Option<Set<N>>,
}

/// Planar drawing of a forest: leaves on consecutive integer `x`, inner nodes centered above
/// their children, `y` is the depth
#[derive(Debug, Clone, PartialEq)]
pub struct TreeLayout<N> {
    pub position: BTreeMap<N, (f64, f64)>,
    pub width: f64,
    pub height: f64,
}

/// Exact solvers on undirected acyclic graphs
pub struct ForestSolver<'a, G> {
    graph: &'a G,
}

impl<'a, G> ForestSolver<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self { graph }
    }

    /// Fails with [`GraphError::DirectedMisuse`] for directed graphs and with
    /// [`GraphError::CycleDetected`] if the graph contains a cycle
    fn rooted(&self) -> Result<RootedForest<G::Node>> {
        self.graph.require_undirected()?;
        CycleDetection::new(self.graph).run()?;

        let dfs = Dfs::new(self.graph).run_iterative(None)?;
        let mut children: BTreeMap<G::Node, Vec<G::Node>> = BTreeMap::new();
        let mut roots = Vec::new();
        for u in &dfs.preorder {
            children.entry(u.clone()).or_default();
            match dfs.parent.get(u) {
                Some(Some(p)) => children.entry(p.clone()).or_default().push(u.clone()),
                _ => roots.push(u.clone()),
            }
        }
        Ok(RootedForest {
            children,
            roots,
            postorder: dfs.postorder,
            preorder: dfs.preorder,
        })
    }

    /// Minimum node cover
    pub fn minimum_node_cover(&self) -> Result<NodeCover<G::Node>> {
        let forest = self.rooted()?;
        debug!(n = forest.postorder.len(), "node cover on a forest");

        let mut taken: BTreeMap<G::Node, Set<G::Node>> = BTreeMap::new();
        let mut skipped: BTreeMap<G::Node, Set<G::Node>> = BTreeMap::new();
        for u in &forest.postorder {
            let mut with_u = Set::from([u.clone()]);
            let mut without_u = Set::new();
            for c in &forest.children[u] {
                let (Some(t), Some(s)) = (taken.remove(c), skipped.remove(c)) else {
                    continue;
                };
                with_u = union(with_u, [smaller(&t, &s).clone()]);
                without_u = union(without_u, [t]);
            }
            taken.insert(u.clone(), with_u);
            skipped.insert(u.clone(), without_u);
        }

        let cover = forest.roots.iter().filter_map(|r| {
            let (t, s) = (taken.get(r)?, skipped.get(r)?);
            Some(smaller(t, s).clone())
        });
        Ok(NodeCover::new(union(Set::new(), cover)))
    }

    /// Maximum independent set
    pub fn maximum_independent_set(&self) -> Result<IndependentSet<G::Node>> {
        let forest = self.rooted()?;
        debug!(n = forest.postorder.len(), "independent set on a forest");

        let mut taken: BTreeMap<G::Node, Set<G::Node>> = BTreeMap::new();
        let mut skipped: BTreeMap<G::Node, Set<G::Node>> = BTreeMap::new();
        for u in &forest.postorder {
            let mut with_u = Set::from([u.clone()]);
            let mut without_u = Set::new();
            for c in &forest.children[u] {
                let (Some(t), Some(s)) = (taken.remove(c), skipped.remove(c)) else {
                    continue;
                };
                with_u = union(with_u, [s.clone()]);
                without_u = union(without_u, [if s.len() > t.len() { s } else { t }]);
            }
            taken.insert(u.clone(), with_u);
            skipped.insert(u.clone(), without_u);
        }

        let set = forest.roots.iter().filter_map(|r| {
            let (t, s) = (taken.remove(r)?, skipped.remove(r)?);
            Some(if s.len() > t.len() { s } else { t })
        });
        Ok(IndependentSet::new(union(Set::new(), set.collect::<Vec<_>>())))
    }

    /// Minimum dominating set
    pub fn minimum_dominating_set(&self) -> Result<DominatingSet<G::Node>> {
        let forest = self.rooted()?;
        debug!(n = forest.postorder.len(), "dominating set on a forest");

        let mut states: BTreeMap<G::Node, Domination<G::Node>> = BTreeMap::new();
        for u in &forest.postorder {
            let subtrees = forest.children[u]
                .iter()
                .filter_map(|c| states.remove(c))
                .collect::<Vec<_>>();
            let state = dominate(u.clone(), subtrees);
            trace!(
                ?u,
                taken = state.taken.len(),
                dominated = ?state.dominated.as_ref().map(Set::len),
                "subtree solved"
            );
            states.insert(u.clone(), state);
        }

        let set = forest.roots.iter().filter_map(|r| {
            let state = states.remove(r)?;
            Some(match state.dominated {
                Some(d) if d.len() < state.taken.len() => d,
                _ => state.taken,
            })
        });
        Ok(DominatingSet::new(union(Set::new(), set.collect::<Vec<_>>())))
    }

    /// Positions of all nodes; components are placed side by side
    pub fn layout(&self) -> Result<TreeLayout<G::Node>> {
        let forest = self.rooted()?;

        let mut depth: BTreeMap<G::Node, usize> = BTreeMap::new();
        for r in &forest.roots {
            depth.insert(r.clone(), 0);
        }
        for u in &forest.preorder {
            let d = depth.get(u).copied().unwrap_or(0);
            for c in &forest.children[u] {
                depth.insert(c.clone(), d + 1);
            }
        }

        let mut x: BTreeMap<G::Node, f64> = BTreeMap::new();
        let mut next_leaf = 0.0;
        for u in &forest.postorder {
            let children = &forest.children[u];
            let position = if children.is_empty() {
                next_leaf += 1.0;
                next_leaf - 1.0
            } else {
                children.iter().filter_map(|c| x.get(c)).sum::<f64>() / children.len() as f64
            };
            x.insert(u.clone(), position);
        }

        let position: BTreeMap<_, _> = x
            .into_iter()
            .map(|(u, px)| {
                let y = depth.get(&u).copied().unwrap_or(0) as f64;
                (u, (px, y))
            })
            .collect();
        let height = position.values().map(|&(_, y)| y).fold(0.0, f64::max);
        Ok(TreeLayout {
            position,
            width: (next_leaf - 1.0_f64).max(0.0),
            height,
        })
    }
}

/// Composes the domination states of `u` from those of its children
fn dominate<N: NodeId>(u: N, subtrees: Vec<Domination<N>>) -> Domination<N> {
    // `u` taken: children may be in any state, undominated ones are dominated by `u`
    let mut taken = Set::from([u]);
    // `u` not taken and no child taken: every child is dominated from below
    let mut undominated = Some(Set::new());
    // `u` not taken but some child taken
    let mut dominated = Some(Set::new());
    let mut any_child_taken = false;
    let mut cheapest_switch: Option<(usize, usize)> = None;

    let mut best_below = Vec::with_capacity(subtrees.len());
    for (i, sub) in subtrees.iter().enumerate() {
        let mut best = &sub.taken;
        for set in [&sub.dominated, &sub.undominated].into_iter().flatten() {
            best = smaller(best, set);
        }
        taken = union(taken, [best.clone()]);

        undominated = match (undominated, &sub.dominated) {
            (Some(acc), Some(d)) => Some(union(acc, [d.clone()])),
            _ => None,
        };

        let (child, switch) = match &sub.dominated {
            Some(d) if d.len() < sub.taken.len() => (d, sub.taken.len() - d.len()),
            _ => {
                any_child_taken = true;
                (&sub.taken, 0)
            }
        };
        if cheapest_switch.is_none_or(|(_, cost)| switch < cost) {
            cheapest_switch = Some((i, switch));
        }
        best_below.push(child);
    }

    match cheapest_switch {
        None => dominated = None,
        Some((i, _)) => {
            let mut acc = Set::new();
            for (j, child) in best_below.into_iter().enumerate() {
                let choice = if !any_child_taken && i == j {
                    &subtrees[j].taken
                } else {
                    child
                };
                acc = union(acc, [choice.clone()]);
            }
            if let Some(d) = dominated.as_mut() {
                *d = acc;
            }
        }
    }

    Domination {
        taken,
        dominated,
        undominated,
    }
}

/// Exact solvers directly on forests
pub trait ForestSolvers: AdjacencyList + Sized {
    fn forest_node_cover(&self) -> Result<NodeCover<Self::Node>> {
        ForestSolver::new(self).minimum_node_cover()
    }

    fn forest_independent_set(&self) -> Result<IndependentSet<Self::Node>> {
        ForestSolver::new(self).maximum_independent_set()
    }

    fn forest_dominating_set(&self) -> Result<DominatingSet<Self::Node>> {
        ForestSolver::new(self).minimum_dominating_set()
    }
}

impl<G> ForestSolvers for G where G: AdjacencyList + Sized {}
