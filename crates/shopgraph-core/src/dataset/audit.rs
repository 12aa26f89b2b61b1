//! Checks for expectations the graph does not enforce.

use std::collections::HashSet;
use std::fmt;

use super::Dataset;

/// Something in a dataset that looks wrong but is still loadable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetWarning {
    RatingOutOfRange { sku: String, rating: i64 },
    TotalMismatch { purchase: String, recorded: i64, computed: i64 },
    UnknownProduct { context: String, sku: String },
    UnknownCustomer { purchase: String, customer: String },
    UnknownCategory { sku: String, category: String },
    EmptyPurchase { purchase: String },
    /// Line items sum past what an `i64` total can hold.
    TotalOverflow { purchase: String },
}

impl fmt::Display for DatasetWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RatingOutOfRange { sku, rating } => {
                write!(f, "review of {} has rating {} outside 1..=5", sku, rating)
            }
            Self::TotalMismatch { purchase, recorded, computed } => write!(
                f,
                "purchase {} total {} does not match line items ({})",
                purchase, recorded, computed
            ),
            Self::UnknownProduct { context, sku } => {
                write!(f, "{} references unknown product {}", context, sku)
            }
            Self::UnknownCustomer { purchase, customer } => {
                write!(f, "purchase {} references unknown customer {}", purchase, customer)
            }
            Self::UnknownCategory { sku, category } => {
                write!(f, "product {} references unknown category {}", sku, category)
            }
            Self::EmptyPurchase { purchase } => write!(f, "purchase {} has no line items", purchase),
            Self::TotalOverflow { purchase } => {
                write!(f, "purchase {} line items overflow the total", purchase)
            }
        }
    }
}

pub(super) fn audit(ds: &Dataset) -> Vec<DatasetWarning> {
    let mut warnings = Vec::new();
    let skus: HashSet<&str> = ds.products.iter().map(|p| p.sku.as_str()).collect();
    let categories: HashSet<&str> = ds.categories.iter().map(|c| c.name.as_str()).collect();
    let customers: HashSet<&str> = ds.customers.iter().map(|c| c.id.as_str()).collect();

    for m in &ds.memberships {
        if !skus.contains(m.sku.as_str()) {
            warnings.push(DatasetWarning::UnknownProduct {
                context: format!("category {}", m.category),
                sku: m.sku.clone(),
            });
        }
        if !categories.contains(m.category.as_str()) {
            warnings.push(DatasetWarning::UnknownCategory {
                sku: m.sku.clone(),
                category: m.category.clone(),
            });
        }
    }

    for r in &ds.reviews {
        if !r.rating_in_range() {
            warnings.push(DatasetWarning::RatingOutOfRange {
                sku: r.sku.clone(),
                rating: r.rating,
            });
        }
        if !skus.contains(r.sku.as_str()) {
            warnings.push(DatasetWarning::UnknownProduct {
                context: "review".to_string(),
                sku: r.sku.clone(),
            });
        }
    }

    for p in &ds.purchases {
        if !customers.contains(p.customer_id.as_str()) {
            warnings.push(DatasetWarning::UnknownCustomer {
                purchase: p.id.clone(),
                customer: p.customer_id.clone(),
            });
        }
        if p.lines.is_empty() {
            warnings.push(DatasetWarning::EmptyPurchase { purchase: p.id.clone() });
            continue;
        }

        let mut computed = Some(0i64);
        let mut priced = true;
        for line in &p.lines {
            match ds.product(&line.sku) {
                Some(product) => {
                    computed = computed
                        .and_then(|sum| sum.checked_add(product.price.checked_mul(line.quantity)?));
                }
                None => {
                    priced = false;
                    warnings.push(DatasetWarning::UnknownProduct {
                        context: format!("purchase {}", p.id),
                        sku: line.sku.clone(),
                    });
                }
            }
        }
        if !priced {
            continue;
        }
        match computed {
            None => warnings.push(DatasetWarning::TotalOverflow { purchase: p.id.clone() }),
            Some(computed) if computed != p.total => {
                warnings.push(DatasetWarning::TotalMismatch {
                    purchase: p.id.clone(),
                    recorded: p.total,
                    computed,
                });
            }
            Some(_) => {}
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_bad_rating_and_total() {
        let mut ds = Dataset::sample();
        ds.reviews[0].rating = 9;
        ds.purchases[1].total += 1;

        let warnings = ds.audit();
        assert!(warnings
            .iter()
            .any(|w| matches!(w, DatasetWarning::RatingOutOfRange { rating: 9, .. })));
        assert!(warnings.iter().any(|w| matches!(
            w,
            DatasetWarning::TotalMismatch { purchase, .. } if purchase == "ORD-002"
        )));
    }

    #[test]
    fn test_flags_unknown_sku_in_purchase() {
        let mut ds = Dataset::sample();
        ds.purchases[0].lines[0].sku = "NOPE-404".to_string();
        let warnings = ds.audit();
        assert!(warnings.iter().any(|w| matches!(
            w,
            DatasetWarning::UnknownProduct { sku, .. } if sku == "NOPE-404"
        )));
        // An unpriceable purchase is not also reported as a total mismatch.
        assert!(!warnings
            .iter()
            .any(|w| matches!(w, DatasetWarning::TotalMismatch { .. })));
    }

    #[test]
    fn test_huge_line_total_reported_not_panicking() {
        let mut ds = Dataset::sample();
        // MSE-WL-02 appears with quantity 2 in ORD-003.
        ds.products[1].price = i64::MAX / 2 + 1;

        let warnings = ds.audit();
        assert!(warnings.iter().any(|w| matches!(
            w,
            DatasetWarning::TotalOverflow { purchase } if purchase == "ORD-003"
        )));
        // ORD-002 holds one mouse, so it still sums and mismatches.
        assert!(warnings.iter().any(|w| matches!(
            w,
            DatasetWarning::TotalMismatch { purchase, .. } if purchase == "ORD-002"
        )));
    }
}
