//! # ShopGraph Graph
//!
//! Graph store integration for ShopGraph.
//!
//! Provides the [`GraphStore`] seam with an in-process and a Neo4j
//! implementation, the dataset loader, derivation of the computed
//! relationships, and Cypher script rendering and execution.

pub mod client;
pub mod cypher;
pub mod derive;
pub mod loader;
pub mod memory;
pub mod schema;
pub mod script;
pub mod store;

pub use client::GraphClient;
pub use derive::{derive_relationships, DeriveReport};
pub use loader::{load_dataset, LoadReport};
pub use memory::MemoryGraph;
pub use script::{run_script, split_statements, CypherExecutor, ScriptReport};
pub use store::{EdgeRecord, GraphCounts, GraphStore, MergeOutcome, NodeRef, NodeSpec};
