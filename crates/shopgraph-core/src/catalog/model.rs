//! Catalog domain models.

use serde::{Deserialize, Serialize};

use crate::error::{ShopGraphError, ShopGraphResult};
use crate::schema::{PropValue, Properties};

/// A product identified by its SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub sku: String,
    pub name: String,
    pub description: String,
    /// Price in whole currency units.
    pub price: i64,
    pub stock: i64,
}

impl Product {
    /// Reject values the graph must never hold.
    pub fn validate(&self) -> ShopGraphResult<()> {
        if self.sku.trim().is_empty() {
            return Err(ShopGraphError::validation("product SKU is empty"));
        }
        if self.stock < 0 {
            return Err(ShopGraphError::validation(format!(
                "product {} has negative stock {}",
                self.sku, self.stock
            )));
        }
        if self.price < 0 {
            return Err(ShopGraphError::validation(format!(
                "product {} has negative price {}",
                self.sku, self.price
            )));
        }
        Ok(())
    }

    /// Node properties, key included.
    pub fn properties(&self) -> Properties {
        Properties::from([
            ("sku".to_string(), PropValue::from(self.sku.as_str())),
            ("name".to_string(), PropValue::from(self.name.as_str())),
            ("description".to_string(), PropValue::from(self.description.as_str())),
            ("price".to_string(), PropValue::Int(self.price)),
            ("stock".to_string(), PropValue::Int(self.stock)),
        ])
    }
}

/// A product category identified by its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn properties(&self) -> Properties {
        Properties::from([("name".to_string(), PropValue::from(self.name.as_str()))])
    }
}

/// Membership of a product in a category (BELONGS_TO).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCategory {
    pub sku: String,
    pub category: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyboard() -> Product {
        Product {
            sku: "KB-RGB-001".to_string(),
            name: "Keyboard".to_string(),
            description: "Mechanical".to_string(),
            price: 120,
            stock: 3,
        }
    }

    #[test]
    fn test_validate_accepts_zero_stock() {
        let mut p = keyboard();
        p.stock = 0;
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_stock() {
        let mut p = keyboard();
        p.stock = -1;
        assert!(matches!(p.validate(), Err(ShopGraphError::ValidationError(_))));
    }

    #[test]
    fn test_properties_include_key() {
        let props = keyboard().properties();
        assert_eq!(props["sku"], PropValue::from("KB-RGB-001"));
        assert_eq!(props["price"], PropValue::Int(120));
    }
}
