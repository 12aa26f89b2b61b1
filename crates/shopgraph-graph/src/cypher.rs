//! Cypher rendering.
//!
//! Builds the statements used against Neo4j and renders a whole load,
//! derivations included, as a standalone `;`-separated script.

use shopgraph_core::schema::{
    Label, PropValue, Properties, RelType, UniqueConstraint, QUANTITY_PROPERTY, SIMILAR_REASON,
    UNIQUE_CONSTRAINTS,
};
use shopgraph_core::{Dataset, WeightMode};

/// HAS_HISTORY mirrors every PLACED edge.
pub const DERIVE_HISTORY: &str = "MATCH (c:Customer)-[:PLACED]->(o:Purchase)\n\
MERGE (c)-[:HAS_HISTORY]->(o)";

/// One increment per purchase per ordered pair of distinct products.
pub const DERIVE_BOUGHT_WITH: &str = "MATCH (p1:Product)<-[:INCLUDES]-(o:Purchase)-[:INCLUDES]->(p2:Product)\n\
WHERE p1 <> p2\n\
MERGE (p1)-[r:BOUGHT_WITH]->(p2)\n\
ON CREATE SET r.weight = 1\n\
ON MATCH SET r.weight = r.weight + 1";

/// Drops co-purchase edges so the next derivation starts from zero.
pub const RESET_BOUGHT_WITH: &str = "MATCH ()-[r:BOUGHT_WITH]->()\nDELETE r";

/// Quote a string as a Cypher literal.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Render a property value as a Cypher literal.
pub fn literal(value: &PropValue) -> String {
    match value {
        PropValue::Int(v) => v.to_string(),
        PropValue::Str(s) => quote(s),
    }
}

/// Render a property map literal, e.g. `{name: 'Audio'}`.
pub fn map_literal(props: &Properties) -> String {
    let fields: Vec<String> = props
        .iter()
        .map(|(k, v)| format!("{}: {}", k, literal(v)))
        .collect();
    format!("{{{}}}", fields.join(", "))
}

pub fn constraint_statement(c: &UniqueConstraint) -> String {
    format!(
        "CREATE CONSTRAINT {} IF NOT EXISTS FOR (n:{}) REQUIRE n.{} IS UNIQUE",
        c.name, c.label, c.property
    )
}

/// SIMILAR between every ordered pair of products sharing a category.
pub fn derive_similar_statement() -> String {
    format!(
        "MATCH (p1:Product)-[:BELONGS_TO]->(:Category)<-[:BELONGS_TO]-(p2:Product)\n\
         WHERE p1 <> p2\n\
         MERGE (p1)-[r:SIMILAR]->(p2)\n\
         ON CREATE SET r.reason = {}",
        quote(SIMILAR_REASON)
    )
}

fn create_node(label: Label, props: &Properties) -> String {
    format!("CREATE (:{} {})", label, map_literal(props))
}

fn key_pattern(var: &str, label: Label, key: &str) -> String {
    match label.key_property() {
        Some(prop) => format!("({}:{} {{{}: {}}})", var, label, prop, quote(key)),
        None => format!("({}:{})", var, label),
    }
}

fn merge_edge(rel: RelType, from_key: &str, to_key: &str, on_create: &Properties) -> String {
    let (from_label, to_label) = rel.endpoints();
    let mut stmt = format!(
        "MATCH {}, {}\nMERGE (a)-[r:{}]->(b)",
        key_pattern("a", from_label, from_key),
        key_pattern("b", to_label, to_key),
        rel
    );
    if !on_create.is_empty() {
        let sets: Vec<String> = on_create
            .iter()
            .map(|(k, v)| format!("r.{} = {}", k, literal(v)))
            .collect();
        stmt.push_str(&format!("\nON CREATE SET {}", sets.join(", ")));
    }
    stmt
}

/// Every statement of a full load, in execution order.
pub fn load_statements(dataset: &Dataset, weight_mode: WeightMode) -> Vec<String> {
    let mut stmts: Vec<String> = UNIQUE_CONSTRAINTS.iter().map(constraint_statement).collect();

    for p in &dataset.products {
        stmts.push(create_node(Label::Product, &p.properties()));
    }
    for c in &dataset.categories {
        stmts.push(create_node(Label::Category, &c.properties()));
    }
    for m in &dataset.memberships {
        stmts.push(merge_edge(RelType::BelongsTo, &m.sku, &m.category, &Properties::new()));
    }
    for r in &dataset.reviews {
        stmts.push(format!(
            "MATCH {}\nCREATE (:Review {})-[:REVIEWS]->(p)",
            key_pattern("p", Label::Product, &r.sku),
            map_literal(&r.properties())
        ));
    }
    for c in &dataset.customers {
        stmts.push(create_node(Label::Customer, &c.properties()));
    }
    for p in &dataset.purchases {
        stmts.push(create_node(Label::Purchase, &p.properties()));
        stmts.push(merge_edge(RelType::Placed, &p.customer_id, &p.id, &Properties::new()));
    }
    for p in &dataset.purchases {
        for line in &p.lines {
            let props = Properties::from([(
                QUANTITY_PROPERTY.to_string(),
                PropValue::Int(line.quantity),
            )]);
            stmts.push(merge_edge(RelType::Includes, &p.id, &line.sku, &props));
        }
    }

    stmts.push(DERIVE_HISTORY.to_string());
    if weight_mode == WeightMode::Reset {
        stmts.push(RESET_BOUGHT_WITH.to_string());
    }
    stmts.push(DERIVE_BOUGHT_WITH.to_string());
    stmts.push(derive_similar_statement());
    stmts
}

/// Render a full load as a script.
pub fn render_script(dataset: &Dataset, weight_mode: WeightMode) -> String {
    let mut out = String::new();
    out.push_str("// ShopGraph seed script\n");
    out.push_str(&format!("// weight mode: {}\n\n", weight_mode));
    for stmt in load_statements(dataset, weight_mode) {
        out.push_str(&stmt);
        out.push_str(";\n\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::split_statements;

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("27\" IPS"), "'27\" IPS'");
        assert_eq!(quote("it's"), "'it\\'s'");
        assert_eq!(quote("a\\b"), "'a\\\\b'");
    }

    #[test]
    fn test_constraint_statement() {
        assert_eq!(
            constraint_statement(&UNIQUE_CONSTRAINTS[0]),
            "CREATE CONSTRAINT product_sku IF NOT EXISTS FOR (n:Product) REQUIRE n.sku IS UNIQUE"
        );
    }

    #[test]
    fn test_includes_sets_quantity_on_create() {
        let props = Properties::from([("quantity".to_string(), PropValue::Int(2))]);
        let stmt = merge_edge(RelType::Includes, "ORD-003", "MSE-WL-02", &props);
        assert!(stmt.contains("(a:Purchase {id: 'ORD-003'})"));
        assert!(stmt.contains("(b:Product {sku: 'MSE-WL-02'})"));
        assert!(stmt.ends_with("ON CREATE SET r.quantity = 2"));
    }

    #[test]
    fn test_script_order_and_split() {
        let ds = Dataset::sample();
        let stmts = load_statements(&ds, WeightMode::Accumulate);
        assert!(stmts[0].starts_with("CREATE CONSTRAINT"));
        assert_eq!(stmts.last(), Some(&derive_similar_statement()));
        assert!(!stmts.iter().any(|s| s == RESET_BOUGHT_WITH));

        let script = render_script(&ds, WeightMode::Accumulate);
        assert_eq!(split_statements(&script), stmts);
    }

    #[test]
    fn test_reset_mode_clears_before_derivation() {
        let stmts = load_statements(&Dataset::sample(), WeightMode::Reset);
        let reset = stmts.iter().position(|s| s == RESET_BOUGHT_WITH).unwrap();
        let derive = stmts.iter().position(|s| s == DERIVE_BOUGHT_WITH).unwrap();
        assert_eq!(reset + 1, derive);
    }
}
