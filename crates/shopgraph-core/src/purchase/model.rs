//! Purchase domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ShopGraphError, ShopGraphResult};
use crate::schema::{PropValue, Properties};

/// A purchase placed by one customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: String,
    pub customer_id: String,
    pub date: NaiveDate,
    /// Expected to equal the sum of quantity x unit price; not enforced.
    pub total: i64,
    pub lines: Vec<PurchaseLine>,
}

/// One product line of a purchase (INCLUDES).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseLine {
    pub sku: String,
    pub quantity: i64,
}

impl PurchaseLine {
    pub fn new(sku: impl Into<String>, quantity: i64) -> Self {
        Self {
            sku: sku.into(),
            quantity,
        }
    }
}

impl Purchase {
    /// Reject line items the graph must never hold.
    pub fn validate(&self) -> ShopGraphResult<()> {
        if self.id.trim().is_empty() {
            return Err(ShopGraphError::validation("purchase id is empty"));
        }
        for (i, line) in self.lines.iter().enumerate() {
            if self.lines[..i].iter().any(|earlier| earlier.sku == line.sku) {
                return Err(ShopGraphError::validation(format!(
                    "purchase {} lists product {} on more than one line",
                    self.id, line.sku
                )));
            }
            if line.quantity < 1 {
                return Err(ShopGraphError::validation(format!(
                    "purchase {} line {} has quantity {} (must be >= 1)",
                    self.id, line.sku, line.quantity
                )));
            }
        }
        Ok(())
    }

    pub fn properties(&self) -> Properties {
        Properties::from([
            ("id".to_string(), PropValue::from(self.id.as_str())),
            ("date".to_string(), PropValue::from(self.date.format("%Y-%m-%d").to_string())),
            ("total".to_string(), PropValue::Int(self.total)),
        ])
    }

    /// Distinct SKUs in this purchase, in first-seen order.
    pub fn distinct_skus(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            if !seen.contains(&line.sku.as_str()) {
                seen.push(line.sku.as_str());
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn purchase(lines: Vec<PurchaseLine>) -> Purchase {
        Purchase {
            id: "ORD-X".to_string(),
            customer_id: "CUST-X".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            total: 0,
            lines,
        }
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let p = purchase(vec![PurchaseLine::new("A", 0)]);
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_repeated_sku_rejected() {
        let p = purchase(vec![PurchaseLine::new("A", 1), PurchaseLine::new("A", 4)]);
        let err = p.validate().unwrap_err();
        assert!(matches!(err, ShopGraphError::ValidationError(ref msg) if msg.contains("A")));
    }

    #[test]
    fn test_distinct_skus_dedupes() {
        let p = purchase(vec![
            PurchaseLine::new("A", 1),
            PurchaseLine::new("B", 2),
            PurchaseLine::new("A", 1),
        ]);
        assert_eq!(p.distinct_skus(), vec!["A", "B"]);
    }

    #[test]
    fn test_date_property_is_iso() {
        let p = purchase(vec![]);
        assert_eq!(p.properties()["date"], PropValue::from("2024-01-02"));
    }
}
