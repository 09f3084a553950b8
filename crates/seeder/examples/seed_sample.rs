//! Example: Seed a small grid into an in-memory store and print what was created.
//!
//! This needs no database and shows the exact call sequence the seeder issues:
//! - 3 databases with 2 collections each
//! - one `name` index and one document per collection
//!
//! Run with:
//! ```
//! cargo run --example seed_sample
//! ```

use seeder::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let store = MemoryStore::new();
    let summary = Seeder::new(&store).run(3, 2).await?;

    tracing::info!("Sample seeded in {}ms", summary.elapsed_ms);

    for call in store.calls() {
        tracing::info!("  {:<18} {}", call.operation, call.namespace());
    }

    for database in store.database_names() {
        for collection in store.collection_names(&database) {
            tracing::info!(
                "  {}/{}: {:?}",
                database,
                collection,
                store.documents(&database, &collection)
            );
        }
    }

    Ok(())
}
