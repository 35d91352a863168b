use std::iter::FusedIterator;

/// Calculate number of combinations C(n, k), saturating at `usize::MAX`
pub fn num_combinations(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }

    let k = k.min(n - k);
    let mut result = 1u128;

    for i in 0..k {
        // Exact: C(n, i) * (n - i) == C(n, i + 1) * (i + 1). C(n, i) grows
        // up to i = n / 2, so once past usize::MAX the answer is too
        result = result * (n - i) as u128 / (i + 1) as u128;
        if result > usize::MAX as u128 {
            return usize::MAX;
        }
    }

    result as usize
}

/// Lazily enumerates the `k`-element combinations of a pool in lexicographic
/// order of pool positions.
///
/// Every yielded combination is a freshly allocated `Vec`, so items can be
/// handed to other threads while the iterator keeps advancing.
#[derive(Debug, Clone)]
pub struct Combinations<T> {
    pool: Vec<T>,
    indices: Vec<usize>,
    started: bool,
    done: bool,
}

impl<T: Clone> Combinations<T> {
    pub fn new(pool: Vec<T>, k: usize) -> Self {
        let done = k > pool.len();
        Combinations {
            pool,
            indices: (0..k).collect(),
            started: false,
            done,
        }
    }

    pub fn k(&self) -> usize {
        self.indices.len()
    }

    /// Move to the next index set. Returns `false` once the last one was seen.
    fn advance(&mut self) -> bool {
        let n = self.pool.len();
        let k = self.indices.len();

        // Rightmost index that has not reached its final position
        let Some(i) = (0..k).rev().find(|&i| self.indices[i] != i + n - k) else {
            return false;
        };

        self.indices[i] += 1;
        for j in i + 1..k {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        true
    }

    fn current(&self) -> Vec<T> {
        self.indices.iter().map(|&i| self.pool[i].clone()).collect()
    }
}

impl<T: Clone> Iterator for Combinations<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if !self.started {
            self.started = true;
        } else if !self.advance() {
            self.done = true;
            return None;
        }

        Some(self.current())
    }
}

impl<T: Clone> FusedIterator for Combinations<T> {}

/// Enumerate every `k`-combination of `pool`.
pub fn combinations<T: Clone>(pool: Vec<T>, k: usize) -> Combinations<T> {
    Combinations::new(pool, k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use quickcheck::quickcheck;
    use rstest::rstest;

    #[rstest]
    #[case(5, 2, 10)]
    #[case(4, 4, 1)]
    #[case(3, 0, 1)]
    #[case(0, 0, 1)]
    #[case(2, 3, 0)]
    #[case(50, 3, 19600)]
    fn test_num_combinations(#[case] n: usize, #[case] k: usize, #[case] expected: usize) {
        assert_eq!(num_combinations(n, k), expected);
        assert_eq!(combinations((0..n).collect(), k).count(), expected);
    }

    #[test]
    fn test_num_combinations_saturates() {
        assert_eq!(num_combinations(1000, 500), usize::MAX);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_num_combinations_near_usize_max() {
        // Intermediate products exceed 64 bits, the result does not
        assert_eq!(num_combinations(67, 33), 14226520737620288370);
        assert_eq!(num_combinations(67, 34), 14226520737620288370);
        assert_eq!(num_combinations(68, 34), usize::MAX);
    }

    #[test]
    fn test_lexicographic_order() {
        let all: Vec<Vec<usize>> = combinations(vec![0, 1, 2, 3], 2).collect();
        assert_eq!(
            all,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3],
            ]
        );
    }

    #[test]
    fn test_maps_positions_through_pool() {
        let all: Vec<Vec<char>> = combinations(vec!['a', 'b', 'c'], 2).collect();
        assert_eq!(all, vec![vec!['a', 'b'], vec!['a', 'c'], vec!['b', 'c']]);
    }

    #[test]
    fn test_oversized_k_is_empty() {
        assert_eq!(combinations(vec![0, 1], 3).next(), None);
    }

    #[test]
    fn test_fused_after_exhaustion() {
        let mut it = combinations(vec![7], 1);
        assert_eq!(it.next(), Some(vec![7]));
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
    }

    quickcheck! {
        fn prop_agrees_with_itertools(n: u8, k: u8) -> bool {
            let n = (n % 10) as usize;
            let k = (k % 6) as usize;
            let ours: Vec<Vec<usize>> = combinations((0..n).collect(), k).collect();
            let reference: Vec<Vec<usize>> = (0..n).combinations(k).collect();
            ours == reference
        }

        fn prop_strictly_increasing_and_sorted(n: u8, k: u8) -> bool {
            let n = (n % 10) as usize;
            let k = (k % 6) as usize;
            let all: Vec<Vec<usize>> = combinations((0..n).collect(), k).collect();
            all.len() == num_combinations(n, k)
                && all.iter().all(|c| c.len() == k && c.windows(2).all(|w| w[0] < w[1]))
                && all.iter().all(|c| c.iter().all(|&i| i < n))
                && all.windows(2).all(|w| w[0] < w[1])
        }
    }
}
