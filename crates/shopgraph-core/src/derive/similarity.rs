//! Category similarity (SIMILAR).

use std::collections::{BTreeMap, BTreeSet};

/// Every ordered pair of distinct products sharing at least one category.
///
/// `memberships` holds `(product, category)` edges. Pairs that share several
/// categories appear once.
pub fn category_similarity<K>(memberships: &[(K, K)]) -> BTreeSet<(K, K)>
where
    K: Ord + Clone,
{
    let mut members: BTreeMap<&K, BTreeSet<&K>> = BTreeMap::new();
    for (product, category) in memberships {
        members.entry(category).or_default().insert(product);
    }

    let mut pairs = BTreeSet::new();
    for products in members.values() {
        for a in products {
            for b in products {
                if a != b {
                    pairs.insert(((*a).clone(), (*b).clone()));
                }
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_category_links_both_ways() {
        let m = vec![("a", "x"), ("b", "x"), ("c", "y")];
        let pairs = category_similarity(&m);
        assert_eq!(pairs.len(), 2);
        assert!(pairs.contains(&("a", "b")));
        assert!(pairs.contains(&("b", "a")));
    }

    #[test]
    fn test_multiple_shared_categories_counted_once() {
        let m = vec![("a", "x"), ("b", "x"), ("a", "y"), ("b", "y")];
        assert_eq!(category_similarity(&m).len(), 2);
    }

    #[test]
    fn test_lone_product_has_no_similar() {
        let m = vec![("a", "x")];
        assert!(category_similarity(&m).is_empty());
    }
}
