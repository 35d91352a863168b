use std::cmp::Reverse;

use crate::Graph;

/// Structural signature of a pattern graph.
///
/// Built once before matching starts and only ever read afterwards, so
/// workers share it through a plain reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternProfile {
    node_count: usize,
    edge_count: usize,
    sorted_ranks: Vec<usize>,
    sorted_degrees: Vec<usize>,
}

impl PatternProfile {
    pub fn from_graph(pattern: &Graph) -> Self {
        let sorted_ranks = sorted_descending(pattern.edges().iter().map(|e| e.rank));
        let sorted_degrees = sorted_descending(pattern.nodes().iter().map(|n| n.degree));

        PatternProfile {
            node_count: pattern.num_nodes(),
            edge_count: pattern.num_edges(),
            sorted_ranks,
            sorted_degrees,
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Pattern edge ranks, non-increasing
    pub fn sorted_ranks(&self) -> &[usize] {
        &self.sorted_ranks
    }

    /// Pattern node degrees, non-increasing
    pub fn sorted_degrees(&self) -> &[usize] {
        &self.sorted_degrees
    }

    /// A pattern without edges touches no nodes, so no candidate can match it.
    pub fn is_matchable(&self) -> bool {
        self.edge_count > 0
    }

    /// Domination test against candidate ranks and degrees, both sorted
    /// non-increasing.
    pub fn admits(&self, ranks: &[usize], degrees: &[usize]) -> bool {
        dominates(ranks, &self.sorted_ranks) && dominates(degrees, &self.sorted_degrees)
    }
}

/// `true` if every value of `candidate` is at least the value of `floor` at
/// the same position. Stops at the first violation.
pub fn dominates(candidate: &[usize], floor: &[usize]) -> bool {
    candidate.len() >= floor.len() && candidate.iter().zip(floor).all(|(c, f)| c >= f)
}

/// Stable sort into non-increasing order
pub fn sorted_descending(values: impl IntoIterator<Item = usize>) -> Vec<usize> {
    let mut values: Vec<usize> = values.into_iter().collect();
    values.sort_by_key(|&v| Reverse(v));
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_path_profile() {
        let path = Graph::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
        let profile = PatternProfile::from_graph(&path);

        assert_eq!(profile.node_count(), 3);
        assert_eq!(profile.edge_count(), 2);
        assert_eq!(profile.sorted_ranks(), &[3, 3]);
        assert_eq!(profile.sorted_degrees(), &[2, 1, 1]);
        assert!(profile.is_matchable());
    }

    #[test]
    fn test_empty_pattern_is_unmatchable() {
        let single = Graph::from_edges(1, &[]).unwrap();
        let profile = PatternProfile::from_graph(&single);
        assert_eq!(profile.sorted_degrees(), &[0]);
        assert!(!profile.is_matchable());
    }

    #[rstest]
    #[case(&[4, 3], &[3, 3], true)]
    #[case(&[3, 3], &[3, 3], true)]
    #[case(&[4, 2], &[3, 3], false)]
    #[case(&[2, 9], &[3, 3], false)]
    #[case(&[9], &[3, 3], false)]
    #[case(&[], &[], true)]
    fn test_dominates(
        #[case] candidate: &[usize],
        #[case] floor: &[usize],
        #[case] expected: bool,
    ) {
        assert_eq!(dominates(candidate, floor), expected);
    }

    #[test]
    fn test_sorted_descending() {
        assert_eq!(sorted_descending([1, 4, 2, 4, 0]), vec![4, 4, 2, 1, 0]);
    }
}
