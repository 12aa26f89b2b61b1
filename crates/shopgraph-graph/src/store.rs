//! The graph store seam.
//!
//! Every load and derivation step receives an explicit store handle. Two
//! implementations exist: [`MemoryGraph`](crate::MemoryGraph) for in-process
//! runs and tests, and [`GraphClient`](crate::GraphClient) for Neo4j.

use async_trait::async_trait;
use std::fmt;

use shopgraph_core::schema::{Label, Properties, RelType, UniqueConstraint};
use shopgraph_core::ShopGraphResult;

/// Store-assigned node identity.
pub type NodeId = i64;

/// Handle to a node that exists in a store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef {
    pub id: NodeId,
    pub label: Label,
    /// Unique key value; `None` for labels without a key.
    pub key: Option<String>,
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{}:{}", self.label, key),
            None => write!(f, "{}#{}", self.label, self.id),
        }
    }
}

/// A node to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSpec {
    pub label: Label,
    pub properties: Properties,
}

impl NodeSpec {
    pub fn new(label: Label, properties: Properties) -> Self {
        Self { label, properties }
    }

    /// Value of the label's key property, if the label has one and it is set.
    pub fn key(&self) -> Option<String> {
        let prop = self.label.key_property()?;
        self.properties.get(prop).map(|v| v.to_string())
    }
}

/// An edge read back from a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeRecord {
    pub from: NodeRef,
    pub rel: RelType,
    pub to: NodeRef,
    pub properties: Properties,
}

/// Whether a merge created a new edge or matched an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Created,
    Matched,
}

/// Node and relationship counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphCounts {
    pub nodes: usize,
    pub relationships: usize,
}

/// Operations the loader and deriver need from a graph store.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Declare a uniqueness constraint. Declaring it again is a no-op.
    async fn ensure_constraint(&self, constraint: &UniqueConstraint) -> ShopGraphResult<()>;

    /// Create a node, failing with `DuplicateKey` when a declared uniqueness
    /// constraint would be violated.
    async fn create_node(&self, spec: &NodeSpec) -> ShopGraphResult<NodeRef>;

    /// Find a node by label and unique key.
    async fn find_node(&self, label: Label, key: &str) -> ShopGraphResult<Option<NodeRef>>;

    /// Create the edge if absent, setting `on_create` only when created.
    async fn merge_edge(
        &self,
        from: &NodeRef,
        rel: RelType,
        to: &NodeRef,
        on_create: &Properties,
    ) -> ShopGraphResult<MergeOutcome>;

    /// Create the edge with `property = amount`, or add `amount` to the
    /// existing value. Returns the resulting value.
    async fn merge_weighted_edge(
        &self,
        from: &NodeRef,
        rel: RelType,
        to: &NodeRef,
        property: &str,
        amount: i64,
    ) -> ShopGraphResult<i64>;

    /// All edges of one relationship type.
    async fn edges(&self, rel: RelType) -> ShopGraphResult<Vec<EdgeRecord>>;

    /// Remove all edges of one relationship type, returning how many went.
    async fn delete_edges(&self, rel: RelType) -> ShopGraphResult<usize>;

    async fn counts(&self) -> ShopGraphResult<GraphCounts>;

    /// Remove every node and edge. Constraints stay declared.
    async fn clear(&self) -> ShopGraphResult<()>;
}
