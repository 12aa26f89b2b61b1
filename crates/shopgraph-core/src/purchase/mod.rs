//! Purchases (orders) and their line items.

pub mod model;

pub use model::{Purchase, PurchaseLine};
