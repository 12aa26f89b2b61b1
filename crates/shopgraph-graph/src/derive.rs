//! Derivation of HAS_HISTORY, BOUGHT_WITH and SIMILAR from base edges.
//!
//! Each step reads the current base edges back from the store, computes the
//! derived edges with [`shopgraph_core::derive`], and merges them. SIMILAR and
//! HAS_HISTORY merges are idempotent. BOUGHT_WITH weights add onto existing
//! edges unless [`WeightMode::Reset`] drops them first.

use tracing::info;

use shopgraph_core::config::DeriveConfig;
use shopgraph_core::derive::{category_similarity, co_purchase_weights, history_pairs};
use shopgraph_core::schema::{
    PropValue, Properties, RelType, SIMILAR_REASON, SIMILAR_REASON_PROPERTY, WEIGHT_PROPERTY,
};
use shopgraph_core::{ShopGraphResult, WeightMode};

use crate::store::{GraphStore, MergeOutcome, NodeRef};

/// Result of a derivation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeriveReport {
    pub history_created: usize,
    pub history_matched: usize,
    /// BOUGHT_WITH edges removed before recomputation (reset mode).
    pub bought_with_removed: usize,
    /// Ordered product pairs whose weight was merged.
    pub bought_with_pairs: usize,
    pub similar_created: usize,
    pub similar_matched: usize,
}

/// Run all three derivations in order.
pub async fn derive_relationships<S>(store: &S, config: &DeriveConfig) -> ShopGraphResult<DeriveReport>
where
    S: GraphStore + ?Sized,
{
    info!(weight_mode = %config.weight_mode, "Deriving relationships");

    let mut report = DeriveReport::default();
    derive_history(store, &mut report).await?;
    derive_bought_with(store, config.weight_mode, &mut report).await?;
    derive_similar(store, &mut report).await?;

    info!(
        history = report.history_created + report.history_matched,
        bought_with = report.bought_with_pairs,
        similar = report.similar_created + report.similar_matched,
        "Derivation complete"
    );
    Ok(report)
}

async fn endpoint_pairs<S>(store: &S, rel: RelType) -> ShopGraphResult<Vec<(NodeRef, NodeRef)>>
where
    S: GraphStore + ?Sized,
{
    Ok(store
        .edges(rel)
        .await?
        .into_iter()
        .map(|e| (e.from, e.to))
        .collect())
}

/// Mirror every PLACED edge as HAS_HISTORY.
pub async fn derive_history<S>(store: &S, report: &mut DeriveReport) -> ShopGraphResult<()>
where
    S: GraphStore + ?Sized,
{
    let placed = endpoint_pairs(store, RelType::Placed).await?;
    for (customer, purchase) in history_pairs(&placed) {
        match store
            .merge_edge(&customer, RelType::HasHistory, &purchase, &Properties::new())
            .await?
        {
            MergeOutcome::Created => report.history_created += 1,
            MergeOutcome::Matched => report.history_matched += 1,
        }
    }
    Ok(())
}

/// Merge co-purchase weights onto BOUGHT_WITH edges.
pub async fn derive_bought_with<S>(
    store: &S,
    mode: WeightMode,
    report: &mut DeriveReport,
) -> ShopGraphResult<()>
where
    S: GraphStore + ?Sized,
{
    if mode == WeightMode::Reset {
        report.bought_with_removed = store.delete_edges(RelType::BoughtWith).await?;
    }

    let includes = endpoint_pairs(store, RelType::Includes).await?;
    let weights = co_purchase_weights(&includes);
    for ((a, b), weight) in &weights {
        store
            .merge_weighted_edge(a, RelType::BoughtWith, b, WEIGHT_PROPERTY, *weight)
            .await?;
    }
    report.bought_with_pairs = weights.len();
    Ok(())
}

/// Link every ordered pair of products sharing a category.
pub async fn derive_similar<S>(store: &S, report: &mut DeriveReport) -> ShopGraphResult<()>
where
    S: GraphStore + ?Sized,
{
    let memberships = endpoint_pairs(store, RelType::BelongsTo).await?;
    let on_create = Properties::from([(
        SIMILAR_REASON_PROPERTY.to_string(),
        PropValue::from(SIMILAR_REASON),
    )]);
    for (a, b) in category_similarity(&memberships) {
        match store.merge_edge(&a, RelType::Similar, &b, &on_create).await? {
            MergeOutcome::Created => report.similar_created += 1,
            MergeOutcome::Matched => report.similar_matched += 1,
        }
    }
    Ok(())
}
