use std::sync::Arc;
use std::time::Duration;

use matome::{Matome, ServiceName, Subscription};
use matome_http::HttpFetcher;
use matome_redis::RedisStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "matome=debug".into()),
        )
        .init();

    let redis_url =
        std::env::var("MATOME_REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());

    // Real collaborators: an HTTP connector and a shared Redis keyspace.
    let fetcher = Arc::new(HttpFetcher::new_default()?);
    let store = Arc::new(RedisStore::connect(&redis_url).await?);

    let matome = Arc::new(
        Matome::builder()
            .with_fetcher(fetcher)
            .with_store(store)
            .pool_size(5)
            .leg_timeout(Duration::from_secs(5))
            .build()?,
    );

    // Keep tenki entries inside their freshness window while we run.
    let refresher = Arc::clone(&matome);
    tokio::spawn(async move {
        refresher.run_refresher(Duration::from_secs(1)).await;
    });

    let subs = vec![
        Subscription::new(ServiceName::Ken2).with_keys(["1000001"]),
        Subscription::new(ServiceName::Tenki).with_token("1000001"),
    ];

    let items = matome.aggregate(&subs).await?;
    for item in &items {
        println!("{}: {}", item.service, item.data);
    }

    Ok(())
}
