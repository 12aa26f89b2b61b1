//! ShopGraph Core Library
//!
//! Domain models, the seed dataset and the pure relationship derivation
//! logic for the ShopGraph e-commerce graph.

pub mod catalog;
pub mod config;
pub mod customer;
pub mod dataset;
pub mod derive;
pub mod error;
pub mod purchase;
pub mod review;
pub mod schema;

pub use config::{EndpointPolicy, ShopGraphConfig, WeightMode};
pub use dataset::Dataset;
pub use error::{ShopGraphError, ShopGraphResult};
pub use schema::{Label, PropValue, Properties, RelType, UniqueConstraint};
