use std::sync::Arc;

use matome::{Matome, MatomeError, ServiceName, SubscriptionUpdate, subscriptions_key};
use matome_mock::{MemoryStore, MockFetcher};

fn engine(store: Arc<MemoryStore>) -> Matome {
    Matome::builder()
        .with_fetcher(Arc::new(MockFetcher::canned()))
        .with_store(store)
        .build()
        .unwrap()
}

#[tokio::test]
async fn first_modification_creates_the_set() {
    let matome = engine(Arc::new(MemoryStore::new()));

    let set = matome
        .modify_subscription(
            7,
            ServiceName::Ken2,
            SubscriptionUpdate {
                keys: Some(vec!["1000001".into()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(set.len(), 1);
    assert_eq!(
        set.get(ServiceName::Ken2).unwrap().keys,
        vec!["1000001".to_string()]
    );

    let stored = matome.fetch_subscriptions(7).await.unwrap();
    assert_eq!(stored, set);
}

#[tokio::test]
async fn modifications_accumulate_per_field() {
    let matome = engine(Arc::new(MemoryStore::new()));

    matome
        .modify_subscription(
            7,
            ServiceName::Tenki,
            SubscriptionUpdate {
                token: Some("1000001".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let set = matome
        .modify_subscription(
            7,
            ServiceName::Tenki,
            SubscriptionUpdate {
                param: Some(("lang".into(), "ja".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let sub = set.get(ServiceName::Tenki).unwrap();
    assert_eq!(sub.token.as_deref(), Some("1000001"));
    assert_eq!(sub.params.get("lang").map(String::as_str), Some("ja"));
    assert_eq!(set.len(), 1, "same service stays one entry");
}

#[tokio::test]
async fn missing_set_is_not_found() {
    let matome = engine(Arc::new(MemoryStore::new()));
    let err = matome.fetch_subscriptions(42).await.unwrap_err();
    assert!(matches!(err, MatomeError::NotFound { .. }), "{err:?}");

    let err = matome.aggregate_for_user(42).await.unwrap_err();
    assert!(matches!(err, MatomeError::NotFound { .. }), "{err:?}");
}

#[tokio::test]
async fn corrupt_bytes_surface_as_decode_error() {
    let store = Arc::new(MemoryStore::new());
    store.seed(&subscriptions_key(7), b"not json at all").await;
    let matome = engine(store);

    let err = matome.fetch_subscriptions(7).await.unwrap_err();
    assert!(matches!(err, MatomeError::CacheDecode { .. }), "{err:?}");
}

#[tokio::test]
async fn unknown_service_name_surfaces_distinctly() {
    let store = Arc::new(MemoryStore::new());
    store
        .seed(&subscriptions_key(7), br#"[{"service":"kenban"}]"#)
        .await;
    let matome = engine(store);

    let err = matome.fetch_subscriptions(7).await.unwrap_err();
    assert!(
        matches!(err, MatomeError::UnknownService { ref name } if name == "kenban"),
        "{err:?}"
    );
}

#[tokio::test]
async fn legacy_ken_entries_still_decode() {
    let store = Arc::new(MemoryStore::new());
    store
        .seed(
            &subscriptions_key(7),
            br#"[{"service":"ken","keys":["1000001"]}]"#,
        )
        .await;
    let matome = engine(store);

    let set = matome.fetch_subscriptions(7).await.unwrap();
    let sub = set.get(ServiceName::Ken2).expect("decoded as ken2");
    assert_eq!(sub.keys, vec!["1000001".to_string()]);
}

#[tokio::test]
async fn modify_then_aggregate_for_user() {
    let store = Arc::new(MemoryStore::new());
    let matome = engine(store);

    matome
        .modify_subscription(
            7,
            ServiceName::Surname,
            SubscriptionUpdate {
                param: Some(("q".into(), "sato".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    matome
        .modify_subscription(
            7,
            ServiceName::Givenname,
            SubscriptionUpdate {
                param: Some(("q".into(), "taro".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let items = matome.aggregate_for_user(7).await.unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().any(|i| i.service == ServiceName::Surname));
    assert!(items.iter().any(|i| i.service == ServiceName::Givenname));
}
