//! Co-purchase weighting (BOUGHT_WITH).

use std::collections::{BTreeMap, BTreeSet};

/// Count, for every ordered pair of distinct products, the purchases that
/// contain both.
///
/// `includes` holds `(purchase, product)` edges. A product listed twice in one
/// purchase counts once; single-product purchases contribute nothing.
pub fn co_purchase_weights<K>(includes: &[(K, K)]) -> BTreeMap<(K, K), i64>
where
    K: Ord + Clone,
{
    let mut baskets: BTreeMap<&K, BTreeSet<&K>> = BTreeMap::new();
    for (purchase, product) in includes {
        baskets.entry(purchase).or_default().insert(product);
    }

    let mut weights: BTreeMap<(K, K), i64> = BTreeMap::new();
    for products in baskets.values() {
        for a in products {
            for b in products {
                if a == b {
                    continue;
                }
                *weights.entry(((*a).clone(), (*b).clone())).or_insert(0) += 1;
            }
        }
    }
    weights
}
