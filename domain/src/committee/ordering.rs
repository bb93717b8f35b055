//! Seeded tie-break ordering.
//!
//! The seed permutes the committee's registration order exactly once, when
//! the committee is formed. After that the ordering is a fixed lookup table:
//! the same seed and committee size always produce the same tie-break
//! priorities, and nothing about a turn's timing can change them.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Tie-break priority of each registered source (lower rank wins ties)
///
/// # Example
///
/// ```
/// use probe_domain::committee::TieBreakOrder;
///
/// let a = TieBreakOrder::from_seed(4, 42);
/// let b = TieBreakOrder::from_seed(4, 42);
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieBreakOrder {
    /// `ranks[source_index]` is that source's position in the permuted order
    ranks: Vec<usize>,
}

impl TieBreakOrder {
    /// Permute `0..size` with a generator seeded by `seed`
    pub fn from_seed(size: usize, seed: u64) -> Self {
        let mut order: Vec<usize> = (0..size).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        order.shuffle(&mut rng);
        Self::from_order(&order)
    }

    /// Registration order unchanged: source 0 wins every tie it is part of
    pub fn identity(size: usize) -> Self {
        Self {
            ranks: (0..size).collect(),
        }
    }

    /// Build from an explicit permutation (`order[k]` is the k-th preferred source)
    pub fn from_order(order: &[usize]) -> Self {
        let mut ranks = vec![0; order.len()];
        for (position, &source_index) in order.iter().enumerate() {
            ranks[source_index] = position;
        }
        Self { ranks }
    }

    /// Rank of a source; unknown indices sort last
    pub fn rank(&self, source_index: usize) -> usize {
        self.ranks.get(source_index).copied().unwrap_or(usize::MAX)
    }

    /// Source indices from most to least preferred
    pub fn preferred_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.ranks.len()).collect();
        order.sort_by_key(|&i| self.ranks[i]);
        order
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_order_is_permutation() {
        let order = TieBreakOrder::from_seed(5, 7);
        let mut preferred = order.preferred_order();
        preferred.sort_unstable();
        assert_eq!(preferred, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_seeded_order_is_reproducible() {
        for seed in [0, 1, 42, u64::MAX] {
            assert_eq!(
                TieBreakOrder::from_seed(6, seed),
                TieBreakOrder::from_seed(6, seed)
            );
        }
    }

    #[test]
    fn test_from_order_ranks() {
        let order = TieBreakOrder::from_order(&[2, 0, 1]);
        assert_eq!(order.rank(2), 0);
        assert_eq!(order.rank(0), 1);
        assert_eq!(order.rank(1), 2);
        assert_eq!(order.rank(9), usize::MAX);
        assert_eq!(order.preferred_order(), vec![2, 0, 1]);
    }

    #[test]
    fn test_identity() {
        let order = TieBreakOrder::identity(3);
        assert_eq!(order.preferred_order(), vec![0, 1, 2]);
        assert!(TieBreakOrder::identity(0).is_empty());
    }
}
