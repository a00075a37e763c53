use std::sync::Arc;

use matome::{Matome, ServiceName, Subscription};
use matome_mock::{MemoryStore, MockFetcher};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "matome=debug".into()),
        )
        .init();

    // 1. Wire up the collaborators (a canned fetcher and an in-memory store,
    //    so this runs without any upstream services).
    let fetcher = Arc::new(MockFetcher::canned());
    let store = Arc::new(MemoryStore::new());

    // 2. Build the engine.
    let matome = Matome::builder()
        .with_fetcher(fetcher.clone())
        .with_store(store)
        .pool_size(5)
        .build()?;

    // 3. Describe what this user is subscribed to.
    let subs = vec![
        Subscription::new(ServiceName::Ken2).with_keys(["1000001"]),
        Subscription::new(ServiceName::Surname).with_param("q", "sato"),
        Subscription::new(ServiceName::Perfectsec).with_token("demo-token"),
    ];

    // 4. First aggregation hits the fetcher and populates the cache.
    let items = matome.aggregate(&subs).await?;
    for item in &items {
        println!("{}: {}", item.service, item.data);
    }
    println!("fetch calls after first pass: {}", fetcher.calls());

    // 5. Second aggregation serves cacheable legs from the store.
    let _ = matome.aggregate(&subs).await?;
    println!("fetch calls after second pass: {}", fetcher.calls());

    Ok(())
}
