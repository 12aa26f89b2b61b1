//! Dataset loading.
//!
//! Writes base data strictly in order: constraints, product and category
//! nodes, BELONGS_TO, reviews, customers, purchases with PLACED, then
//! INCLUDES. Any error aborts the load; a partially loaded graph must be
//! cleared before retrying.

use std::collections::HashMap;
use tracing::{debug, info, warn};

use shopgraph_core::config::LoadConfig;
use shopgraph_core::schema::{Label, PropValue, Properties, RelType, QUANTITY_PROPERTY};
use shopgraph_core::{Dataset, EndpointPolicy, ShopGraphError, ShopGraphResult};

use crate::schema::initialize_schema;
use crate::store::{GraphStore, MergeOutcome, NodeRef, NodeSpec};

/// Result of a load.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub nodes_created: usize,
    pub relationships_created: usize,
    pub relationships_matched: usize,
    /// Edges not created because an endpoint was missing (skip policy only).
    pub skipped: Vec<String>,
}

impl LoadReport {
    fn record(&mut self, outcome: MergeOutcome) {
        match outcome {
            MergeOutcome::Created => self.relationships_created += 1,
            MergeOutcome::Matched => self.relationships_matched += 1,
        }
    }
}

/// Load `dataset` into `store`.
pub async fn load_dataset<S>(
    store: &S,
    dataset: &Dataset,
    config: &LoadConfig,
) -> ShopGraphResult<LoadReport>
where
    S: GraphStore + ?Sized,
{
    validate(dataset).map_err(|e| e.in_step("validate"))?;

    let mut loader = Loader {
        store,
        policy: config.missing_endpoints,
        handles: HashMap::new(),
        report: LoadReport::default(),
    };

    info!(policy = %config.missing_endpoints, "Starting dataset load");

    initialize_schema(store).await.map_err(|e| e.in_step("constraints"))?;
    loader.products_and_categories(dataset).await.map_err(|e| e.in_step("nodes"))?;
    loader.memberships(dataset).await.map_err(|e| e.in_step("categories"))?;
    loader.reviews(dataset).await.map_err(|e| e.in_step("reviews"))?;
    loader.customers(dataset).await.map_err(|e| e.in_step("customers"))?;
    loader.purchases(dataset).await.map_err(|e| e.in_step("purchases"))?;
    loader.purchase_lines(dataset).await.map_err(|e| e.in_step("purchase lines"))?;

    let report = loader.report;
    info!(
        nodes_created = report.nodes_created,
        relationships_created = report.relationships_created,
        relationships_matched = report.relationships_matched,
        skipped = report.skipped.len(),
        "Dataset load complete"
    );
    Ok(report)
}

/// Reject values that must never reach the graph, before anything is written.
fn validate(dataset: &Dataset) -> ShopGraphResult<()> {
    for product in &dataset.products {
        product.validate()?;
    }
    for purchase in &dataset.purchases {
        purchase.validate()?;
    }
    Ok(())
}

struct Loader<'a, S: GraphStore + ?Sized> {
    store: &'a S,
    policy: EndpointPolicy,
    /// Handles of nodes created or found during this load, by (label, key).
    handles: HashMap<(Label, String), NodeRef>,
    report: LoadReport,
}

impl<S: GraphStore + ?Sized> Loader<'_, S> {
    async fn create(&mut self, label: Label, properties: Properties) -> ShopGraphResult<NodeRef> {
        let node = self.store.create_node(&NodeSpec::new(label, properties)).await?;
        self.report.nodes_created += 1;
        if let Some(key) = &node.key {
            self.handles.insert((label, key.clone()), node.clone());
        }
        debug!(node = %node, "Created node");
        Ok(node)
    }

    /// Find-or-fail: resolve a keyed node, using the handle cache first.
    async fn resolve(&mut self, label: Label, key: &str) -> ShopGraphResult<Option<NodeRef>> {
        if let Some(node) = self.handles.get(&(label, key.to_string())) {
            return Ok(Some(node.clone()));
        }
        let found = self.store.find_node(label, key).await?;
        if let Some(node) = &found {
            self.handles.insert((label, key.to_string()), node.clone());
        }
        Ok(found)
    }

    /// Apply the endpoint policy to a missing endpoint.
    fn missing(&mut self, rel: RelType, from: String, to: String) -> ShopGraphResult<()> {
        match self.policy {
            EndpointPolicy::Reject => Err(ShopGraphError::MissingEndpoint {
                rel: rel.to_string(),
                from,
                to,
            }),
            EndpointPolicy::Skip => {
                warn!(%rel, %from, %to, "Endpoint not found, edge skipped");
                self.report.skipped.push(format!("({})-[:{}]->({})", from, rel, to));
                Ok(())
            }
        }
    }

    /// Merge a base edge between two keyed nodes.
    async fn link(
        &mut self,
        rel: RelType,
        from_key: &str,
        to_key: &str,
        on_create: Properties,
    ) -> ShopGraphResult<()> {
        let (from_label, to_label) = rel.endpoints();
        let from = self.resolve(from_label, from_key).await?;
        let to = self.resolve(to_label, to_key).await?;

        match (from, to) {
            (Some(from), Some(to)) => {
                let outcome = self.store.merge_edge(&from, rel, &to, &on_create).await?;
                self.report.record(outcome);
                Ok(())
            }
            _ => self.missing(
                rel,
                format!("{}:{}", from_label, from_key),
                format!("{}:{}", to_label, to_key),
            ),
        }
    }

    async fn products_and_categories(&mut self, dataset: &Dataset) -> ShopGraphResult<()> {
        for product in &dataset.products {
            self.create(Label::Product, product.properties()).await?;
        }
        for category in &dataset.categories {
            self.create(Label::Category, category.properties()).await?;
        }
        info!(
            products = dataset.products.len(),
            categories = dataset.categories.len(),
            "Products and categories created"
        );
        Ok(())
    }

    async fn memberships(&mut self, dataset: &Dataset) -> ShopGraphResult<()> {
        for m in &dataset.memberships {
            self.link(RelType::BelongsTo, &m.sku, &m.category, Properties::new())
                .await?;
        }
        info!(memberships = dataset.memberships.len(), "Category memberships merged");
        Ok(())
    }

    async fn reviews(&mut self, dataset: &Dataset) -> ShopGraphResult<()> {
        for review in &dataset.reviews {
            // A review is only written when its product exists.
            let Some(product) = self.resolve(Label::Product, &review.sku).await? else {
                self.missing(
                    RelType::Reviews,
                    Label::Review.to_string(),
                    format!("{}:{}", Label::Product, review.sku),
                )?;
                continue;
            };
            let node = self.create(Label::Review, review.properties()).await?;
            let outcome = self
                .store
                .merge_edge(&node, RelType::Reviews, &product, &Properties::new())
                .await?;
            self.report.record(outcome);
        }
        info!(reviews = dataset.reviews.len(), "Reviews created");
        Ok(())
    }

    async fn customers(&mut self, dataset: &Dataset) -> ShopGraphResult<()> {
        for customer in &dataset.customers {
            self.create(Label::Customer, customer.properties()).await?;
        }
        info!(customers = dataset.customers.len(), "Customers created");
        Ok(())
    }

    async fn purchases(&mut self, dataset: &Dataset) -> ShopGraphResult<()> {
        for purchase in &dataset.purchases {
            self.create(Label::Purchase, purchase.properties()).await?;
            self.link(RelType::Placed, &purchase.customer_id, &purchase.id, Properties::new())
                .await?;
        }
        info!(purchases = dataset.purchases.len(), "Purchases created");
        Ok(())
    }

    async fn purchase_lines(&mut self, dataset: &Dataset) -> ShopGraphResult<()> {
        let mut lines = 0usize;
        for purchase in &dataset.purchases {
            for line in &purchase.lines {
                let props = Properties::from([(
                    QUANTITY_PROPERTY.to_string(),
                    PropValue::Int(line.quantity),
                )]);
                self.link(RelType::Includes, &purchase.id, &line.sku, props).await?;
                lines += 1;
            }
        }
        info!(lines, "Purchase lines merged");
        Ok(())
    }
}
