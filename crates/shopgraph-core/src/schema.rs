//! Graph vocabulary: node labels, relationship types and uniqueness constraints.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Node labels used in the shop graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    Product,
    Category,
    Customer,
    Purchase,
    Review,
}

impl Label {
    /// The graph label for this node type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Product => "Product",
            Label::Category => "Category",
            Label::Customer => "Customer",
            Label::Purchase => "Purchase",
            Label::Review => "Review",
        }
    }

    /// Property holding the unique key, if the label has one.
    pub fn key_property(&self) -> Option<&'static str> {
        match self {
            Label::Product => Some("sku"),
            Label::Category => Some("name"),
            Label::Customer => Some("id"),
            Label::Purchase => Some("id"),
            Label::Review => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relationship types, base and derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RelType {
    BelongsTo,
    Reviews,
    Placed,
    Includes,
    HasHistory,
    BoughtWith,
    Similar,
}

impl RelType {
    pub const ALL: [RelType; 7] = [
        RelType::BelongsTo,
        RelType::Reviews,
        RelType::Placed,
        RelType::Includes,
        RelType::HasHistory,
        RelType::BoughtWith,
        RelType::Similar,
    ];

    /// The graph relationship type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RelType::BelongsTo => "BELONGS_TO",
            RelType::Reviews => "REVIEWS",
            RelType::Placed => "PLACED",
            RelType::Includes => "INCLUDES",
            RelType::HasHistory => "HAS_HISTORY",
            RelType::BoughtWith => "BOUGHT_WITH",
            RelType::Similar => "SIMILAR",
        }
    }

    /// Source and target labels.
    pub fn endpoints(&self) -> (Label, Label) {
        match self {
            RelType::BelongsTo => (Label::Product, Label::Category),
            RelType::Reviews => (Label::Review, Label::Product),
            RelType::Placed | RelType::HasHistory => (Label::Customer, Label::Purchase),
            RelType::Includes => (Label::Purchase, Label::Product),
            RelType::BoughtWith | RelType::Similar => (Label::Product, Label::Product),
        }
    }

    /// The single property carried by edges of this type, if any.
    pub fn property(&self) -> Option<&'static str> {
        match self {
            RelType::Includes => Some(QUANTITY_PROPERTY),
            RelType::BoughtWith => Some(WEIGHT_PROPERTY),
            RelType::Similar => Some(SIMILAR_REASON_PROPERTY),
            _ => None,
        }
    }

    /// Whether edges of this type are computed from base data.
    pub fn is_derived(&self) -> bool {
        matches!(self, RelType::HasHistory | RelType::BoughtWith | RelType::Similar)
    }
}

impl fmt::Display for RelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A uniqueness constraint on one property of a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniqueConstraint {
    pub name: &'static str,
    pub label: Label,
    pub property: &'static str,
}

/// Constraints declared before any data is written.
pub const UNIQUE_CONSTRAINTS: &[UniqueConstraint] = &[
    UniqueConstraint { name: "product_sku", label: Label::Product, property: "sku" },
    UniqueConstraint { name: "category_name", label: Label::Category, property: "name" },
    UniqueConstraint { name: "customer_id", label: Label::Customer, property: "id" },
    UniqueConstraint { name: "purchase_id", label: Label::Purchase, property: "id" },
];

/// A scalar property value stored on a node or edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Int(i64),
    Str(String),
}

impl PropValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropValue::Int(v) => Some(*v),
            PropValue::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(v) => Some(v),
            PropValue::Int(_) => None,
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Int(v) => write!(f, "{}", v),
            PropValue::Str(v) => f.write_str(v),
        }
    }
}

impl From<i64> for PropValue {
    fn from(v: i64) -> Self {
        PropValue::Int(v)
    }
}

impl From<&str> for PropValue {
    fn from(v: &str) -> Self {
        PropValue::Str(v.to_string())
    }
}

impl From<String> for PropValue {
    fn from(v: String) -> Self {
        PropValue::Str(v)
    }
}

/// Property map, ordered so rendered statements are stable.
pub type Properties = BTreeMap<String, PropValue>;

/// Reason recorded on every SIMILAR edge.
pub const SIMILAR_REASON: &str = "category";

pub const SIMILAR_REASON_PROPERTY: &str = "reason";

/// Weight property on BOUGHT_WITH edges.
pub const WEIGHT_PROPERTY: &str = "weight";

/// Quantity property on INCLUDES edges.
pub const QUANTITY_PROPERTY: &str = "quantity";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_keyed_label_has_a_constraint() {
        for label in [Label::Product, Label::Category, Label::Customer, Label::Purchase] {
            let prop = label.key_property().unwrap();
            assert!(UNIQUE_CONSTRAINTS
                .iter()
                .any(|c| c.label == label && c.property == prop));
        }
        assert!(Label::Review.key_property().is_none());
    }

    #[test]
    fn test_derived_rel_types() {
        assert!(RelType::BoughtWith.is_derived());
        assert!(RelType::Similar.is_derived());
        assert!(RelType::HasHistory.is_derived());
        assert!(!RelType::Placed.is_derived());
        assert_eq!(RelType::BoughtWith.to_string(), "BOUGHT_WITH");
    }

    #[test]
    fn test_history_shares_placed_endpoints() {
        assert_eq!(RelType::HasHistory.endpoints(), RelType::Placed.endpoints());
        assert_eq!(RelType::Includes.property(), Some("quantity"));
        assert_eq!(RelType::Placed.property(), None);
    }
}
