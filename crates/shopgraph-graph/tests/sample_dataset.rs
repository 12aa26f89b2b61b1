//! End-to-end load and derivation over the in-process store.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use shopgraph_core::config::{DeriveConfig, LoadConfig};
use shopgraph_core::purchase::{Purchase, PurchaseLine};
use shopgraph_core::schema::{Label, PropValue, Properties, RelType};
use shopgraph_core::{Dataset, EndpointPolicy, ShopGraphError, WeightMode};
use shopgraph_graph::{
    derive_relationships, load_dataset, EdgeRecord, GraphStore, MemoryGraph, NodeSpec,
};

async fn seeded(mode: WeightMode) -> MemoryGraph {
    let graph = MemoryGraph::new();
    load_dataset(&graph, &Dataset::sample(), &LoadConfig::default())
        .await
        .unwrap();
    derive_relationships(&graph, &DeriveConfig { weight_mode: mode })
        .await
        .unwrap();
    graph
}

fn keyed(edges: &[EdgeRecord]) -> BTreeSet<(String, String)> {
    edges
        .iter()
        .map(|e| (e.from.key.clone().unwrap(), e.to.key.clone().unwrap()))
        .collect()
}

fn weight(edge: &EdgeRecord) -> i64 {
    edge.properties["weight"].as_int().unwrap()
}

#[tokio::test]
async fn test_sample_load_counts() {
    let graph = MemoryGraph::new();
    let report = load_dataset(&graph, &Dataset::sample(), &LoadConfig::default())
        .await
        .unwrap();

    // 8 products, 5 categories, 5 reviews, 3 customers, 4 purchases
    assert_eq!(report.nodes_created, 25);
    // 8 BELONGS_TO, 5 REVIEWS, 4 PLACED, 9 INCLUDES
    assert_eq!(report.relationships_created, 26);
    assert_eq!(report.relationships_matched, 0);
    assert!(report.skipped.is_empty());

    derive_relationships(&graph, &DeriveConfig::default()).await.unwrap();
    let counts = graph.counts().await.unwrap();
    assert_eq!(counts.nodes, 25);
    // + 4 HAS_HISTORY, 12 BOUGHT_WITH, 8 SIMILAR
    assert_eq!(counts.relationships, 50);
}

#[tokio::test]
async fn test_duplicate_keys_rejected_for_every_keyed_label() {
    let graph = seeded(WeightMode::Accumulate).await;

    let dupes = [
        (Label::Product, "sku", "KB-RGB-001"),
        (Label::Category, "name", "Peripherals"),
        (Label::Customer, "id", "CUST-001"),
        (Label::Purchase, "id", "ORD-002"),
    ];
    for (label, prop, key) in dupes {
        let spec = NodeSpec::new(
            label,
            Properties::from([(prop.to_string(), PropValue::from(key))]),
        );
        let err = graph.create_node(&spec).await.unwrap_err();
        assert!(
            matches!(&err, ShopGraphError::DuplicateKey { key: k, .. } if k == key),
            "{} {}: {:?}",
            label,
            key,
            err
        );
    }
    assert_eq!(graph.counts().await.unwrap().nodes, 25);
}

#[tokio::test]
async fn test_duplicate_in_dataset_aborts_load() {
    let mut ds = Dataset::sample();
    let copy = ds.customers[0].clone();
    ds.customers.push(copy);

    let graph = MemoryGraph::new();
    let err = load_dataset(&graph, &ds, &LoadConfig::default())
        .await
        .unwrap_err();
    assert!(err.is_duplicate_key());
    assert!(matches!(err, ShopGraphError::LoadStep { step: "customers", .. }));
    // Nothing after the failing step was written.
    assert_eq!(graph.count_label(Label::Purchase).await, 0);
}

#[tokio::test]
async fn test_similar_links_shared_categories_both_ways() {
    let graph = seeded(WeightMode::Accumulate).await;
    let similar = graph.edges(RelType::Similar).await.unwrap();

    assert_eq!(similar.len(), 8);
    for edge in &similar {
        assert_ne!(edge.from, edge.to);
        assert_eq!(edge.properties["reason"], PropValue::from("category"));
    }

    let pairs = keyed(&similar);
    for (a, b) in &pairs {
        assert!(pairs.contains(&(b.clone(), a.clone())), "{} -> {} not mirrored", a, b);
    }
    assert!(pairs.contains(&("KB-RGB-001".to_string(), "CAM-HD-1080".to_string())));
    assert!(pairs.contains(&("SPK-USB-03".to_string(), "HS-BT-07".to_string())));
    assert!(!pairs.iter().any(|(a, _)| a == "MON-27-IPS"));
}

#[tokio::test]
async fn test_bought_with_weight_one_per_sample_pair() {
    let graph = seeded(WeightMode::Accumulate).await;
    let bought = graph.edges(RelType::BoughtWith).await.unwrap();

    assert_eq!(bought.len(), 12);
    assert!(bought.iter().all(|e| weight(e) == 1));
    assert!(bought.iter().all(|e| e.from != e.to));

    let pairs = keyed(&bought);
    for purchase in &Dataset::sample().purchases {
        let skus = purchase.distinct_skus();
        for a in &skus {
            for b in &skus {
                if a != b {
                    assert!(pairs.contains(&(a.to_string(), b.to_string())));
                }
            }
        }
    }
}

#[tokio::test]
async fn test_wireless_mouse_partners() {
    let graph = seeded(WeightMode::Accumulate).await;
    let partners: BTreeSet<String> = graph
        .edges(RelType::BoughtWith)
        .await
        .unwrap()
        .into_iter()
        .filter(|e| e.from.key.as_deref() == Some("MSE-WL-02"))
        .filter_map(|e| e.to.key)
        .collect();

    assert_eq!(
        partners,
        BTreeSet::from(["KB-RGB-001".to_string(), "MON-27-IPS".to_string()])
    );
}

#[tokio::test]
async fn test_accumulate_rerun_doubles_weights() {
    let graph = seeded(WeightMode::Accumulate).await;
    let report = derive_relationships(&graph, &DeriveConfig::default())
        .await
        .unwrap();

    let bought = graph.edges(RelType::BoughtWith).await.unwrap();
    assert_eq!(bought.len(), 12);
    assert!(bought.iter().all(|e| weight(e) == 2));

    // The merges that are idempotent did not grow.
    assert_eq!(report.similar_created, 0);
    assert_eq!(report.similar_matched, 8);
    assert_eq!(report.history_created, 0);
    assert_eq!(graph.counts().await.unwrap().relationships, 50);
}

#[tokio::test]
async fn test_reset_rerun_is_idempotent() {
    let graph = seeded(WeightMode::Reset).await;
    let config = DeriveConfig {
        weight_mode: WeightMode::Reset,
    };
    let report = derive_relationships(&graph, &config).await.unwrap();

    assert_eq!(report.bought_with_removed, 12);
    let bought = graph.edges(RelType::BoughtWith).await.unwrap();
    assert_eq!(bought.len(), 12);
    assert!(bought.iter().all(|e| weight(e) == 1));
}

#[tokio::test]
async fn test_history_mirrors_placed() {
    let graph = seeded(WeightMode::Accumulate).await;
    derive_relationships(&graph, &DeriveConfig::default())
        .await
        .unwrap();

    let placed = graph.edges(RelType::Placed).await.unwrap();
    let history = graph.edges(RelType::HasHistory).await.unwrap();
    assert_eq!(placed.len(), 4);
    assert_eq!(history.len(), placed.len());
    assert_eq!(keyed(&placed), keyed(&history));
}

#[tokio::test]
async fn test_single_product_purchase_adds_no_bought_with() {
    let mut ds = Dataset::sample();
    ds.purchases = vec![Purchase {
        id: "ORD-100".to_string(),
        customer_id: "CUST-002".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        total: 360,
        lines: vec![PurchaseLine::new("KB-RGB-001", 3)],
    }];

    let graph = MemoryGraph::new();
    load_dataset(&graph, &ds, &LoadConfig::default()).await.unwrap();
    let report = derive_relationships(&graph, &DeriveConfig::default())
        .await
        .unwrap();

    assert_eq!(report.bought_with_pairs, 0);
    assert!(graph.edges(RelType::BoughtWith).await.unwrap().is_empty());
    let includes = graph.edges(RelType::Includes).await.unwrap();
    assert_eq!(includes[0].properties["quantity"], PropValue::Int(3));
}

#[tokio::test]
async fn test_missing_endpoint_rejected_by_default() {
    let mut ds = Dataset::sample();
    ds.purchases[0].lines.push(PurchaseLine::new("TYPO-000", 1));

    let graph = MemoryGraph::new();
    let err = load_dataset(&graph, &ds, &LoadConfig::default())
        .await
        .unwrap_err();
    match err {
        ShopGraphError::LoadStep { step, source } => {
            assert_eq!(step, "purchase lines");
            assert!(matches!(*source, ShopGraphError::MissingEndpoint { ref rel, .. } if rel == "INCLUDES"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_endpoint_skipped_when_configured() {
    let mut ds = Dataset::sample();
    ds.reviews[0].sku = "TYPO-000".to_string();
    ds.memberships[0].category = "Nowhere".to_string();

    let graph = MemoryGraph::new();
    let config = LoadConfig {
        missing_endpoints: EndpointPolicy::Skip,
    };
    let report = load_dataset(&graph, &ds, &config).await.unwrap();

    assert_eq!(report.skipped.len(), 2);
    // The orphan review is not written at all.
    assert_eq!(graph.count_label(Label::Review).await, 4);
    assert_eq!(graph.edges(RelType::BelongsTo).await.unwrap().len(), 7);
}

#[tokio::test]
async fn test_invalid_quantity_rejected_before_writes() {
    let mut ds = Dataset::sample();
    ds.purchases[2].lines[0].quantity = 0;

    let graph = MemoryGraph::new();
    let err = load_dataset(&graph, &ds, &LoadConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ShopGraphError::LoadStep { step: "validate", .. }));
    assert_eq!(graph.counts().await.unwrap().nodes, 0);
}

#[tokio::test]
async fn test_repeated_sku_in_purchase_rejected_before_writes() {
    let mut ds = Dataset::sample();
    ds.purchases[1].lines.push(PurchaseLine::new("MSE-WL-02", 4));

    let graph = MemoryGraph::new();
    let err = load_dataset(&graph, &ds, &LoadConfig::default())
        .await
        .unwrap_err();
    match err {
        ShopGraphError::LoadStep { step, source } => {
            assert_eq!(step, "validate");
            assert!(matches!(*source, ShopGraphError::ValidationError(ref msg) if msg.contains("MSE-WL-02")));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(graph.counts().await.unwrap().nodes, 0);
}

#[tokio::test]
async fn test_clear_allows_fresh_reload() {
    let graph = seeded(WeightMode::Accumulate).await;
    assert!(load_dataset(&graph, &Dataset::sample(), &LoadConfig::default())
        .await
        .unwrap_err()
        .is_duplicate_key());

    graph.clear().await.unwrap();
    load_dataset(&graph, &Dataset::sample(), &LoadConfig::default())
        .await
        .unwrap();
    derive_relationships(&graph, &DeriveConfig::default())
        .await
        .unwrap();
    assert_eq!(graph.counts().await.unwrap().relationships, 50);
}
