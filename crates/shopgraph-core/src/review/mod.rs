//! Product reviews.

pub mod model;

pub use model::Review;
