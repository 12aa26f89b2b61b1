//! The seed dataset: every entity and base relationship loaded into the graph.

pub mod audit;
pub mod sample;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::catalog::{Category, Product, ProductCategory};
use crate::customer::Customer;
use crate::error::ShopGraphResult;
use crate::purchase::Purchase;
use crate::review::Review;

pub use audit::DatasetWarning;

/// A complete set of base data for one load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub memberships: Vec<ProductCategory>,
    pub reviews: Vec<Review>,
    pub customers: Vec<Customer>,
    pub purchases: Vec<Purchase>,
}

impl Dataset {
    /// The fixed dataset shipped with the loader.
    pub fn sample() -> Self {
        sample::build()
    }

    /// Read a dataset from a JSON document on disk.
    pub fn from_json_file(path: &Path) -> ShopGraphResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> ShopGraphResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> ShopGraphResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Look up a product by SKU.
    pub fn product(&self, sku: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.sku == sku)
    }

    /// Report unenforced expectations the data does not meet.
    pub fn audit(&self) -> Vec<DatasetWarning> {
        audit::audit(self)
    }

    /// Number of base entities (nodes) in the dataset.
    pub fn node_count(&self) -> usize {
        self.categories.len()
            + self.products.len()
            + self.reviews.len()
            + self.customers.len()
            + self.purchases.len()
    }
}
