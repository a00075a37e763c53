use std::sync::Arc;

use matome_core::{CacheStore, ServiceFetcher, ServiceName, Subscription, resolve};
use matome_middleware::{CachingFetcher, FreshnessPolicy};
use matome_mock::{MemoryStore, MockFetcher};

fn caching(
    fetcher: Arc<MockFetcher>,
    store: Arc<MemoryStore>,
) -> CachingFetcher {
    CachingFetcher::new(fetcher, store, FreshnessPolicy::default())
}

#[tokio::test]
async fn second_read_is_served_from_cache() {
    let fetcher = Arc::new(MockFetcher::canned());
    let store = Arc::new(MemoryStore::new());
    let caching = caching(fetcher.clone(), store.clone());

    let sub = Subscription::new(ServiceName::Ken2).with_keys(["1000001"]);
    let descriptor = resolve(&sub);

    let first = caching.fetch(ServiceName::Ken2, &descriptor).await.unwrap();
    let second = caching.fetch(ServiceName::Ken2, &descriptor).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(fetcher.calls(), 1, "second call should be cached");
}

#[tokio::test]
async fn fetched_payload_is_written_back_raw() {
    let fetcher = Arc::new(MockFetcher::canned());
    let store = Arc::new(MemoryStore::new());
    let caching = caching(fetcher.clone(), store.clone());

    let sub = Subscription::new(ServiceName::Surname).with_param("q", "sato");
    let payload = caching
        .fetch(ServiceName::Surname, &resolve(&sub))
        .await
        .unwrap();

    let stored = store.get("surname:sato").await.unwrap().expect("cached");
    let decoded: serde_json::Value = serde_json::from_slice(&stored).unwrap();
    assert_eq!(decoded, payload);
}

#[tokio::test]
async fn distinct_discriminators_get_distinct_keys() {
    let fetcher = Arc::new(MockFetcher::canned());
    let store = Arc::new(MemoryStore::new());
    let caching = caching(fetcher.clone(), store.clone());

    for q in ["sato", "suzuki"] {
        let sub = Subscription::new(ServiceName::Surname).with_param("q", q);
        caching
            .fetch(ServiceName::Surname, &resolve(&sub))
            .await
            .unwrap();
    }

    assert_eq!(fetcher.calls(), 2);
    assert_eq!(
        store.scan("surname:").await.unwrap(),
        vec!["surname:sato".to_string(), "surname:suzuki".to_string()]
    );
}

#[tokio::test]
async fn perfectsec_is_never_cached() {
    let fetcher = Arc::new(MockFetcher::canned());
    let store = Arc::new(MemoryStore::new());
    let caching = caching(fetcher.clone(), store.clone());

    let sub = Subscription::new(ServiceName::Perfectsec).with_token("secret");
    let descriptor = resolve(&sub);

    caching
        .fetch(ServiceName::Perfectsec, &descriptor)
        .await
        .unwrap();
    caching
        .fetch(ServiceName::Perfectsec, &descriptor)
        .await
        .unwrap();

    assert_eq!(fetcher.calls(), 2, "uncacheable service hits upstream each time");
    assert!(store.is_empty().await);
}
