//! Product catalog: products, categories and category membership.

pub mod model;

pub use model::{Category, Product, ProductCategory};
