//! In-process graph store.
//!
//! Holds nodes and edges behind a shared lock and applies the same rules a
//! graph database would: uniqueness constraints are checked on every node
//! write, and edges are keyed by (from, type, to) so merges never duplicate.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use shopgraph_core::schema::{Label, PropValue, Properties, RelType, UniqueConstraint};
use shopgraph_core::{ShopGraphError, ShopGraphResult};

use crate::store::{EdgeRecord, GraphCounts, GraphStore, MergeOutcome, NodeId, NodeRef, NodeSpec};

#[derive(Debug, Clone)]
struct StoredNode {
    label: Label,
    properties: Properties,
}

impl StoredNode {
    fn key(&self) -> Option<String> {
        let prop = self.label.key_property()?;
        self.properties.get(prop).map(|v| v.to_string())
    }
}

type EdgeKey = (NodeId, RelType, NodeId);

#[derive(Debug, Default)]
struct Inner {
    next_id: NodeId,
    nodes: BTreeMap<NodeId, StoredNode>,
    constraints: BTreeSet<(Label, String)>,
    edges: BTreeMap<EdgeKey, Properties>,
}

impl Inner {
    fn node_ref(&self, id: NodeId) -> ShopGraphResult<NodeRef> {
        let node = self
            .nodes
            .get(&id)
            .ok_or_else(|| ShopGraphError::store(format!("unknown node id {}", id)))?;
        Ok(NodeRef {
            id,
            label: node.label,
            key: node.key(),
        })
    }

    fn find(&self, label: Label, property: &str, value: &PropValue) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, n)| n.label == label && n.properties.get(property) == Some(value))
            .map(|(id, _)| *id)
    }

    fn check_endpoints(&self, from: &NodeRef, to: &NodeRef) -> ShopGraphResult<()> {
        for node in [from, to] {
            if !self.nodes.contains_key(&node.id) {
                return Err(ShopGraphError::store(format!("node {} is not in this graph", node)));
            }
        }
        Ok(())
    }
}

/// Shared in-memory graph. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryGraph {
    /// Create an empty graph with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Properties of the (from, rel, to) edge, if it exists.
    pub async fn edge(&self, from: &NodeRef, rel: RelType, to: &NodeRef) -> Option<Properties> {
        let inner = self.inner.read().await;
        inner.edges.get(&(from.id, rel, to.id)).cloned()
    }

    /// Properties of a node, if it exists.
    pub async fn node_properties(&self, node: &NodeRef) -> Option<Properties> {
        let inner = self.inner.read().await;
        inner.nodes.get(&node.id).map(|n| n.properties.clone())
    }

    /// Number of nodes carrying `label`.
    pub async fn count_label(&self, label: Label) -> usize {
        let inner = self.inner.read().await;
        inner.nodes.values().filter(|n| n.label == label).count()
    }
}

#[async_trait]
impl GraphStore for MemoryGraph {
    async fn ensure_constraint(&self, constraint: &UniqueConstraint) -> ShopGraphResult<()> {
        let mut inner = self.inner.write().await;
        let entry = (constraint.label, constraint.property.to_string());
        if inner.constraints.contains(&entry) {
            return Ok(());
        }

        // Existing data must already satisfy the constraint.
        let mut seen = BTreeSet::new();
        for node in inner.nodes.values().filter(|n| n.label == constraint.label) {
            if let Some(value) = node.properties.get(constraint.property) {
                if !seen.insert(value.to_string()) {
                    return Err(ShopGraphError::store(format!(
                        "cannot create constraint {}: duplicate {}.{} = '{}'",
                        constraint.name, constraint.label, constraint.property, value
                    )));
                }
            }
        }

        inner.constraints.insert(entry);
        debug!(constraint = constraint.name, "Constraint declared");
        Ok(())
    }

    async fn create_node(&self, spec: &NodeSpec) -> ShopGraphResult<NodeRef> {
        let mut inner = self.inner.write().await;

        let constrained: Vec<String> = inner
            .constraints
            .iter()
            .filter(|(label, _)| *label == spec.label)
            .map(|(_, prop)| prop.clone())
            .collect();
        for prop in constrained {
            if let Some(value) = spec.properties.get(&prop) {
                if inner.find(spec.label, &prop, value).is_some() {
                    return Err(ShopGraphError::DuplicateKey {
                        label: spec.label.to_string(),
                        key: value.to_string(),
                    });
                }
            }
        }

        inner.next_id += 1;
        let id = inner.next_id;
        inner.nodes.insert(
            id,
            StoredNode {
                label: spec.label,
                properties: spec.properties.clone(),
            },
        );
        Ok(NodeRef {
            id,
            label: spec.label,
            key: spec.key(),
        })
    }

    async fn find_node(&self, label: Label, key: &str) -> ShopGraphResult<Option<NodeRef>> {
        let Some(prop) = label.key_property() else {
            return Ok(None);
        };
        let inner = self.inner.read().await;
        match inner.find(label, prop, &PropValue::from(key)) {
            Some(id) => inner.node_ref(id).map(Some),
            None => Ok(None),
        }
    }

    async fn merge_edge(
        &self,
        from: &NodeRef,
        rel: RelType,
        to: &NodeRef,
        on_create: &Properties,
    ) -> ShopGraphResult<MergeOutcome> {
        let mut inner = self.inner.write().await;
        inner.check_endpoints(from, to)?;

        let key = (from.id, rel, to.id);
        if inner.edges.contains_key(&key) {
            return Ok(MergeOutcome::Matched);
        }
        inner.edges.insert(key, on_create.clone());
        Ok(MergeOutcome::Created)
    }

    async fn merge_weighted_edge(
        &self,
        from: &NodeRef,
        rel: RelType,
        to: &NodeRef,
        property: &str,
        amount: i64,
    ) -> ShopGraphResult<i64> {
        let mut inner = self.inner.write().await;
        inner.check_endpoints(from, to)?;

        let props = inner.edges.entry((from.id, rel, to.id)).or_default();
        let current = props.get(property).and_then(PropValue::as_int).unwrap_or(0);
        let value = current + amount;
        props.insert(property.to_string(), PropValue::Int(value));
        Ok(value)
    }

    async fn edges(&self, rel: RelType) -> ShopGraphResult<Vec<EdgeRecord>> {
        let inner = self.inner.read().await;
        inner
            .edges
            .iter()
            .filter(|((_, r, _), _)| *r == rel)
            .map(|((from, _, to), props)| {
                Ok(EdgeRecord {
                    from: inner.node_ref(*from)?,
                    rel,
                    to: inner.node_ref(*to)?,
                    properties: props.clone(),
                })
            })
            .collect()
    }

    async fn delete_edges(&self, rel: RelType) -> ShopGraphResult<usize> {
        let mut inner = self.inner.write().await;
        let before = inner.edges.len();
        inner.edges.retain(|(_, r, _), _| *r != rel);
        Ok(before - inner.edges.len())
    }

    async fn counts(&self) -> ShopGraphResult<GraphCounts> {
        let inner = self.inner.read().await;
        Ok(GraphCounts {
            nodes: inner.nodes.len(),
            relationships: inner.edges.len(),
        })
    }

    async fn clear(&self) -> ShopGraphResult<()> {
        let mut inner = self.inner.write().await;
        inner.nodes.clear();
        inner.edges.clear();
        Ok(())
    }
}
