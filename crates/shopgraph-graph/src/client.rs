//! Neo4j connection client.
//!
//! [`GraphClient`] implements [`GraphStore`] by translating each operation
//! into a parameterized Cypher statement, and [`CypherExecutor`] for raw
//! script execution.

use anyhow::{Context, Result};
use async_trait::async_trait;
use neo4rs::{ConfigBuilder, Graph, Query, Row};

use shopgraph_core::config::Neo4jConfig;
use shopgraph_core::schema::{Label, PropValue, Properties, RelType, UniqueConstraint};
use shopgraph_core::{ShopGraphError, ShopGraphResult};

use crate::cypher;
use crate::script::CypherExecutor;
use crate::store::{EdgeRecord, GraphCounts, GraphStore, MergeOutcome, NodeId, NodeRef, NodeSpec};

/// Client for Neo4j graph operations.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Create a new GraphClient from config.
    ///
    /// neo4rs creates its pool lazily, so a `RETURN 1` ping runs immediately
    /// to surface an unreachable server here rather than on the first write.
    pub async fn connect(config: &Neo4jConfig) -> Result<Self> {
        let neo4j_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db(config.database.as_str())
            .max_connections(4)
            .fetch_size(200)
            .build()
            .context("Failed to build Neo4j config")?;

        let graph = Graph::connect(neo4j_config)
            .await
            .context("Failed to create Neo4j connection pool")?;

        graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .context("Neo4j is not responding to queries")?;

        Ok(Self { graph })
    }

    /// Execute a Cypher query that returns no results.
    pub async fn execute(&self, query: Query) -> Result<()> {
        self.graph.run(query).await.context("Neo4j query execution failed")?;
        Ok(())
    }

    async fn store_query(&self, query: Query) -> ShopGraphResult<Vec<Row>> {
        let mut result = self.graph.execute(query).await.map_err(map_neo4j_error)?;
        let mut rows = Vec::new();
        while let Some(row) = result.next().await.map_err(map_neo4j_error)? {
            rows.push(row);
        }
        Ok(rows)
    }
}

/// Uniqueness violations become `DuplicateKey`; everything else is a store error.
fn map_neo4j_error(err: neo4rs::Error) -> ShopGraphError {
    let msg = err.to_string();
    if msg.contains("ConstraintValidationFailed") || msg.contains("already exists with label") {
        ShopGraphError::DuplicateKey {
            label: extract_quoted(&msg, "label `").unwrap_or_else(|| "node".to_string()),
            key: extract_quoted(&msg, "= '").unwrap_or(msg),
        }
    } else {
        ShopGraphError::store(msg)
    }
}

/// Text between `prefix` and the next closing quote or backtick.
fn extract_quoted(msg: &str, prefix: &str) -> Option<String> {
    let start = msg.find(prefix)? + prefix.len();
    let rest = &msg[start..];
    let end = rest.find(['\'', '`'])?;
    Some(rest[..end].to_string())
}

fn get_field<'a, T: serde::Deserialize<'a>>(row: &'a Row, field: &str) -> ShopGraphResult<T> {
    row.get(field)
        .map_err(|e| ShopGraphError::store(format!("Failed to get field '{}': {:?}", field, e)))
}

fn bind(query: Query, name: &str, value: &PropValue) -> Query {
    match value {
        PropValue::Int(v) => query.param(name, *v),
        PropValue::Str(s) => query.param(name, s.as_str()),
    }
}

fn key_expr(var: &str, label: Label) -> String {
    match label.key_property() {
        Some(prop) => format!("{}.{}", var, prop),
        None => "null".to_string(),
    }
}

#[async_trait]
impl GraphStore for GraphClient {
    async fn ensure_constraint(&self, constraint: &UniqueConstraint) -> ShopGraphResult<()> {
        let query = Query::new(cypher::constraint_statement(constraint));
        self.graph.run(query).await.map_err(map_neo4j_error)
    }

    async fn create_node(&self, spec: &NodeSpec) -> ShopGraphResult<NodeRef> {
        let fields: Vec<String> = spec
            .properties
            .keys()
            .map(|k| format!("{}: $p_{}", k, k))
            .collect();
        let mut query = Query::new(format!(
            "CREATE (n:{} {{{}}}) RETURN id(n) AS id",
            spec.label,
            fields.join(", ")
        ));
        for (k, v) in &spec.properties {
            query = bind(query, &format!("p_{}", k), v);
        }

        let rows = self.store_query(query).await?;
        let row = rows
            .first()
            .ok_or_else(|| ShopGraphError::store(format!("CREATE {} returned no id", spec.label)))?;
        Ok(NodeRef {
            id: get_field(row, "id")?,
            label: spec.label,
            key: spec.key(),
        })
    }

    async fn find_node(&self, label: Label, key: &str) -> ShopGraphResult<Option<NodeRef>> {
        let Some(prop) = label.key_property() else {
            return Ok(None);
        };
        let query = Query::new(format!(
            "MATCH (n:{} {{{}: $key}}) RETURN id(n) AS id LIMIT 1",
            label, prop
        ))
        .param("key", key);

        let rows = self.store_query(query).await?;
        match rows.first() {
            Some(row) => Ok(Some(NodeRef {
                id: get_field(row, "id")?,
                label,
                key: Some(key.to_string()),
            })),
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
        let mut text = format!(
            "MATCH (a) WHERE id(a) = $from
             MATCH (b) WHERE id(b) = $to
             OPTIONAL MATCH (a)-[existing:{rel}]->(b)
             WITH a, b, count(existing) AS before
             MERGE (a)-[r:{rel}]->(b)"
        );
        if !on_create.is_empty() {
            let sets: Vec<String> = on_create
                .keys()
                .map(|k| format!("r.{} = $p_{}", k, k))
                .collect();
            text.push_str(&format!("\n ON CREATE SET {}", sets.join(", ")));
        }
        text.push_str("\n RETURN before");

        let mut query = Query::new(text).param("from", from.id).param("to", to.id);
        for (k, v) in on_create {
            query = bind(query, &format!("p_{}", k), v);
        }

        let rows = self.store_query(query).await?;
        let row = rows.first().ok_or_else(|| {
            ShopGraphError::store(format!("{} endpoints not found: {} -> {}", rel, from, to))
        })?;
        let before: i64 = get_field(row, "before")?;
        Ok(if before == 0 {
            MergeOutcome::Created
        } else {
            MergeOutcome::Matched
        })
    }

    async fn merge_weighted_edge(
        &self,
        from: &NodeRef,
        rel: RelType,
        to: &NodeRef,
        property: &str,
        amount: i64,
    ) -> ShopGraphResult<i64> {
        let query = Query::new(format!(
            "MATCH (a) WHERE id(a) = $from
             MATCH (b) WHERE id(b) = $to
             MERGE (a)-[r:{rel}]->(b)
             ON CREATE SET r.{property} = $amount
             ON MATCH SET r.{property} = coalesce(r.{property}, 0) + $amount
             RETURN r.{property} AS value"
        ))
        .param("from", from.id)
        .param("to", to.id)
        .param("amount", amount);

        let rows = self.store_query(query).await?;
        let row = rows.first().ok_or_else(|| {
            ShopGraphError::store(format!("{} endpoints not found: {} -> {}", rel, from, to))
        })?;
        get_field(row, "value")
    }

    async fn edges(&self, rel: RelType) -> ShopGraphResult<Vec<EdgeRecord>> {
        let (from_label, to_label) = rel.endpoints();
        let prop_expr = match rel.property() {
            Some(p) => format!("r.{}", p),
            None => "null".to_string(),
        };
        let query = Query::new(format!(
            "MATCH (a:{from_label})-[r:{rel}]->(b:{to_label})
             RETURN id(a) AS from_id, {} AS from_key,
                    id(b) AS to_id, {} AS to_key,
                    {} AS prop
             ORDER BY from_id, to_id",
            key_expr("a", from_label),
            key_expr("b", to_label),
            prop_expr
        ));

        let rows = self.store_query(query).await?;
        let mut edges = Vec::with_capacity(rows.len());
        for row in &rows {
            let from_id: NodeId = get_field(row, "from_id")?;
            let to_id: NodeId = get_field(row, "to_id")?;

            let mut properties = Properties::new();
            if let Some(name) = rel.property() {
                if let Ok(Some(v)) = row.get::<Option<i64>>("prop") {
                    properties.insert(name.to_string(), PropValue::Int(v));
                } else if let Ok(Some(v)) = row.get::<Option<String>>("prop") {
                    properties.insert(name.to_string(), PropValue::Str(v));
                }
            }

            edges.push(EdgeRecord {
                from: NodeRef {
                    id: from_id,
                    label: from_label,
                    key: row.get::<Option<String>>("from_key").ok().flatten(),
                },
                rel,
                to: NodeRef {
                    id: to_id,
                    label: to_label,
                    key: row.get::<Option<String>>("to_key").ok().flatten(),
                },
                properties,
            });
        }
        Ok(edges)
    }

    async fn delete_edges(&self, rel: RelType) -> ShopGraphResult<usize> {
        let query = Query::new(format!(
            "MATCH ()-[r:{rel}]->() DELETE r RETURN count(*) AS deleted"
        ));
        let rows = self.store_query(query).await?;
        let deleted: i64 = match rows.first() {
            Some(row) => get_field(row, "deleted")?,
            None => 0,
        };
        Ok(deleted as usize)
    }

    async fn counts(&self) -> ShopGraphResult<GraphCounts> {
        let nodes = self
            .store_query(Query::new("MATCH (n) RETURN count(n) AS count".to_string()))
            .await?;
        let rels = self
            .store_query(Query::new("MATCH ()-[r]->() RETURN count(r) AS count".to_string()))
            .await?;

        let node_count: i64 = match nodes.first() {
            Some(row) => get_field(row, "count")?,
            None => 0,
        };
        let rel_count: i64 = match rels.first() {
            Some(row) => get_field(row, "count")?,
            None => 0,
        };

        Ok(GraphCounts {
            nodes: node_count as usize,
            relationships: rel_count as usize,
        })
    }

    async fn clear(&self) -> ShopGraphResult<()> {
        self.graph
            .run(Query::new("MATCH (n) DETACH DELETE n".to_string()))
            .await
            .map_err(map_neo4j_error)
    }
}

#[async_trait]
impl CypherExecutor for GraphClient {
    async fn run_statement(&self, statement: &str) -> Result<()> {
        self.execute(Query::new(statement.to_string())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_quoted() {
        let msg = "Node(12) already exists with label `Product` and property `sku` = 'KB-RGB-001'";
        assert_eq!(extract_quoted(msg, "label `").as_deref(), Some("Product"));
        assert_eq!(extract_quoted(msg, "= '").as_deref(), Some("KB-RGB-001"));
        assert_eq!(extract_quoted(msg, "missing"), None);
    }

    #[test]
    fn test_key_expr() {
        assert_eq!(key_expr("a", Label::Product), "a.sku");
        assert_eq!(key_expr("a", Label::Review), "null");
    }
}
