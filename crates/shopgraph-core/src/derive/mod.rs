//! Pure derivation of the computed relationship types.
//!
//! Each function takes base edges as `(from, to)` pairs and returns the derived
//! edges. Keys are generic so the same code runs over SKUs in a dataset and
//! over node ids read back from a store.

pub mod co_purchase;
pub mod similarity;

use std::collections::BTreeSet;

pub use co_purchase::co_purchase_weights;
pub use similarity::category_similarity;

/// HAS_HISTORY mirrors PLACED: one edge per distinct (customer, purchase).
pub fn history_pairs<K>(placed: &[(K, K)]) -> BTreeSet<(K, K)>
where
    K: Ord + Clone,
{
    placed.iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_mirrors_and_dedupes() {
        let placed = vec![("c1", "o1"), ("c1", "o2"), ("c1", "o1")];
        let history = history_pairs(&placed);
        assert_eq!(history.len(), 2);
        assert!(history.contains(&("c1", "o2")));
    }
}
