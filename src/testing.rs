/// Every graph representation should pass the same contract tests
macro_rules! test_graph_ops {
    ($env:ident, $graph:ty, ($($trait:ident),*)) => {
        #[cfg(test)]
        mod $env {
            use crate::{edge::*, node::*, ops::*, repr::*, testing::test_graph_ops};
            use rand::{Rng, SeedableRng};
            use rand_pcg::Pcg64Mcg;
            use itertools::Itertools;
            use std::collections::{BTreeMap, BTreeSet};

            type G = $graph;

            /// Creates a list of at most `m_ub` random weighted edges without loops or parallels
            fn random_edges<R: Rng>(rng: &mut R, n: Node, m_ub: usize, directed: bool) -> Vec<Edge<Node>> {
                let mut seen = BTreeSet::new();
                (0..m_ub)
                    .filter_map(|_| {
                        let u = rng.random_range(0..n);
                        let v = rng.random_range(0..n);
                        let e = Edge::new(u, v, rng.random_range(1..10));
                        let key = if directed { (u, v) } else { (u.min(v), u.max(v)) };
                        (u != v && seen.insert(key)).then_some(e)
                    })
                    .collect_vec()
            }

            /// Adjacency reference: node -> neighbor -> weight
            fn reference(n: Node, edges: &[Edge<Node>], directed: bool) -> BTreeMap<Node, BTreeMap<Node, i64>> {
                let mut adj: BTreeMap<Node, BTreeMap<Node, i64>> = (0..n).map(|u| (u, BTreeMap::new())).collect();
                for e in edges {
                    adj.entry(e.source).or_default().insert(e.target, e.weight);
                    if !directed {
                        adj.entry(e.target).or_default().insert(e.source, e.weight);
                    }
                }
                adj
            }

            $(
                test_graph_ops!(@test $trait);
            )*
        }
    };
    (@test GraphNew) => {
        #[test]
        fn graph_new() {
            for directed in [false, true] {
                let graph = G::new(directed);
                assert_eq!(graph.number_of_edges(), 0);
                assert_eq!(graph.number_of_nodes(), 0);
                assert_eq!(graph.is_directed(), directed);
            }

            assert!(G::directed().require_directed().is_ok());
            assert!(G::undirected().require_directed().is_err());
            assert!(G::directed().require_undirected().is_err());
        }
    };
    (@test AdjacencyList) => {
        #[test]
        fn test_adjacency_list() {
            let rng = &mut Pcg64Mcg::seed_from_u64(3);

            for directed in [false, true] {
                for n in [10 as Node, 20, 50] {
                    for m_ub in [n * 2, n * 5] {
                        let edges = random_edges(rng, n, m_ub as usize, directed);
                        let adj = reference(n, &edges, directed);
                        let graph = G::from_nodes_and_edges(directed, 0..n, edges.iter()).unwrap();

                        assert_eq!(graph.number_of_nodes(), n as usize);
                        assert_eq!(graph.number_of_edges(), edges.len());
                        assert_eq!(graph.edges().count(), edges.len());

                        let sorted = graph.sorted_edges();
                        assert!(sorted.windows(2).all(|w| w[0] <= w[1]));

                        for u in 0..n {
                            let nbs = graph.neighbors_of(&u).sorted().collect_vec();
                            assert_eq!(nbs, adj[&u].keys().copied().collect_vec());
                            assert_eq!(graph.out_degree_of(&u), adj[&u].len());

                            for e in graph.out_edges_of(&u) {
                                assert_eq!(e.source, u);
                                assert_eq!(adj[&u][&e.target], e.weight);
                            }

                            let in_nbs = graph.in_neighbors_of(&u).sorted().collect_vec();
                            let expected = (0..n).filter(|v| adj[v].contains_key(&u)).collect_vec();
                            assert_eq!(in_nbs, expected);
                            assert_eq!(graph.in_degree_of(&u), expected.len());

                            if directed {
                                assert!(graph.degree_of(&u).is_err());
                            } else {
                                assert_eq!(graph.degree_of(&u), Ok(adj[&u].len()));
                            }
                        }
                    }
                }
            }
        }
    };
    (@test GraphEditing) => {
        #[test]
        fn test_graph_editing() {
            let rng = &mut Pcg64Mcg::seed_from_u64(4);

            for directed in [false, true] {
                for n in [10 as Node, 20, 50] {
                    let edges = random_edges(rng, n, 3 * n as usize, directed);
                    let mut graph = G::from_edges(directed, edges.iter()).unwrap();
                    let mut m = graph.number_of_edges();
                    assert_eq!(m, edges.len());

                    for e in &edges {
                        assert!(graph.add_edge(e).is_err());
                        assert!(graph.add_edge((e.source, e.source)).is_err());
                    }

                    for e in edges.iter().step_by(2) {
                        assert_eq!(graph.remove_edge(&e.source, &e.target), Some(e.weight));
                        assert_eq!(graph.remove_edge(&e.source, &e.target), None);
                        m -= 1;
                        assert_eq!(graph.number_of_edges(), m);
                        if !directed {
                            assert!(!graph.has_edge(&e.target, &e.source));
                        }
                    }

                    let nodes = graph.vertices().collect_vec();
                    for u in nodes {
                        let incident = graph.out_degree_of(&u)
                            + if directed { graph.in_degree_of(&u) } else { 0 };
                        assert!(graph.remove_node(&u));
                        m -= incident;
                        assert_eq!(graph.number_of_edges(), m);
                        assert!(graph.vertices().all(|v| !graph.has_edge(&v, &u)));
                    }

                    assert!(graph.is_empty());
                    assert!(graph.is_edgeless());
                }
            }
        }
    };
    (@test GraphTranspose) => {
        #[test]
        fn test_transpose() {
            let rng = &mut Pcg64Mcg::seed_from_u64(5);

            for directed in [false, true] {
                let edges = random_edges(rng, 20, 60, directed);
                let graph = G::from_nodes_and_edges(directed, 0..20, edges.iter()).unwrap();
                let transposed = graph.transpose().unwrap();

                assert_eq!(transposed.number_of_edges(), graph.number_of_edges());
                for e in graph.edges() {
                    assert_eq!(transposed.weight(&e.target, &e.source), Some(e.weight));
                }
                assert!(transposed.transpose().unwrap().is_equal_to(&graph));
                assert_eq!(transposed.is_equal_to(&graph), !directed || edges.is_empty());
            }
        }
    };
    (@test GraphEquality) => {
        #[test]
        fn test_equality() {
            let rng = &mut Pcg64Mcg::seed_from_u64(6);

            for directed in [false, true] {
                let edges = random_edges(rng, 15, 40, directed);
                let graph = G::from_nodes_and_edges(directed, 0..15, edges.iter()).unwrap();

                let copy = graph.clone();
                assert!(copy.is_equal_to(&graph));

                let sparse: AdjMap<Node> = AdjMap::from_graph(&graph).unwrap();
                assert!(sparse.is_equal_to(&graph));
                assert!(graph.is_equal_to(&sparse));

                let mut other = graph.clone();
                other.add_node(100);
                assert!(!other.is_equal_to(&graph));

                let flipped = G::from_graph(&sparse).unwrap();
                assert!(flipped.is_equal_to(&graph));
            }
        }
    };
}

pub(crate) use test_graph_ops;

/// Uniformly shuffled permutation of `0..n`
#[cfg(test)]
pub(crate) fn random_permutation<R: rand::Rng>(rng: &mut R, n: usize) -> Vec<crate::node::Node> {
    use rand::seq::SliceRandom;
    let mut perm: Vec<_> = (0..n as crate::node::Node).collect();
    perm.shuffle(rng);
    perm
}

/// Uniformly shuffled sequence containing every label of `0..n` twice
#[cfg(test)]
pub(crate) fn random_double_permutation<R: rand::Rng>(
    rng: &mut R,
    n: usize,
) -> Vec<crate::node::Node> {
    use rand::seq::SliceRandom;
    let mut sequence: Vec<_> = (0..n as crate::node::Node).flat_map(|u| [u, u]).collect();
    sequence.shuffle(rng);
    sequence
}
