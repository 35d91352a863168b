use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{Graph, NodeId};

/// Seeded RNG, or one seeded from entropy when `seed` is `None`
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Build a random graph with one outgoing edge per node.
///
/// Node `i` is joined to a uniformly chosen node other than itself, so the
/// result has exactly `node_count` edges whenever `node_count >= 2`. The same
/// pair may be drawn from both sides; such parallel edges are kept.
pub fn random_graph<R: Rng>(node_count: usize, rng: &mut R) -> Graph {
    if node_count < 2 {
        return Graph::link(node_count, &[]);
    }

    let pairs: Vec<(NodeId, NodeId)> = (0..node_count)
        .map(|i| {
            // Resample until the endpoint differs
            let target = loop {
                let candidate = rng.gen_range(0..node_count);
                if candidate != i {
                    break candidate;
                }
            };
            (i, target)
        })
        .collect();

    Graph::link(node_count, &pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    #[test]
    fn test_tiny_graphs_have_no_edges() {
        let mut rng = seeded_rng(Some(1));
        for n in 0..2 {
            let g = random_graph(n, &mut rng);
            assert_eq!(g.num_nodes(), n);
            assert_eq!(g.num_edges(), 0);
        }
    }

    #[test]
    fn test_same_seed_same_graph() {
        let a = random_graph(30, &mut seeded_rng(Some(42)));
        let b = random_graph(30, &mut seeded_rng(Some(42)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_two_nodes_are_joined_twice() {
        let g = random_graph(2, &mut seeded_rng(Some(7)));
        let pairs: Vec<_> = g.edges().iter().map(|e| (e.start, e.end)).collect();
        assert_eq!(pairs, vec![(0, 1), (1, 0)]);
        assert!(g.edges().iter().all(|e| e.rank == 4));
    }

    quickcheck! {
        fn prop_degree_and_rank_invariants(n: u8, seed: u64) -> bool {
            let n = (n % 60) as usize + 2;
            let g = random_graph(n, &mut seeded_rng(Some(seed)));

            let one_edge_per_node = g.num_edges() == n
                && g.edges().iter().enumerate().all(|(i, e)| e.id == i && e.start == i);
            let no_self_loops = g.edges().iter().all(|e| e.start != e.end);
            let degrees_match = g.nodes().iter().all(|node| {
                let incident = g
                    .edges()
                    .iter()
                    .filter(|e| e.start == node.id || e.end == node.id)
                    .count();
                node.degree == incident && node.edges.len() == incident
            });
            let ranks_match = g.edges().iter().all(|e| {
                e.rank == g.nodes()[e.start].degree + g.nodes()[e.end].degree
            });

            one_edge_per_node && no_self_loops && degrees_match && ranks_match
        }
    }
}
