//! Review domain model.

use serde::{Deserialize, Serialize};

use crate::schema::{PropValue, Properties};

/// A free-text review of one product. Reviews carry no unique key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub sku: String,
    pub text: String,
    /// Expected range 1..=5; not enforced.
    pub rating: i64,
}

impl Review {
    pub fn properties(&self) -> Properties {
        Properties::from([
            ("text".to_string(), PropValue::from(self.text.as_str())),
            ("rating".to_string(), PropValue::Int(self.rating)),
        ])
    }

    pub fn rating_in_range(&self) -> bool {
        (1..=5).contains(&self.rating)
    }
}
