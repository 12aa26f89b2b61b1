//! Schema initialization (uniqueness constraints).

use tracing::info;

use shopgraph_core::schema::UNIQUE_CONSTRAINTS;
use shopgraph_core::ShopGraphResult;

use crate::store::GraphStore;

/// Declare every uniqueness constraint before data is written.
///
/// Safe to run multiple times.
pub async fn initialize_schema<S>(store: &S) -> ShopGraphResult<()>
where
    S: GraphStore + ?Sized,
{
    info!("Initializing graph schema...");

    for constraint in UNIQUE_CONSTRAINTS {
        store.ensure_constraint(constraint).await?;
    }

    info!("Graph schema initialized ({} constraints)", UNIQUE_CONSTRAINTS.len());
    Ok(())
}
