use matome_core::{
    CacheStore, MatomeError, RequestDescriptor, ServiceFetcher, ServiceName, User, UserStore,
};
use matome_mock::{MemoryStore, MemoryUserStore, MockFetcher};

fn descriptor() -> RequestDescriptor {
    RequestDescriptor {
        uri: "http://example.invalid/".to_string(),
        query: Default::default(),
        headers: Default::default(),
    }
}

#[tokio::test]
async fn unconfigured_service_fails_loudly() {
    let fetcher = MockFetcher::new();
    let err = fetcher
        .fetch(ServiceName::Ken2, &descriptor())
        .await
        .unwrap_err();
    assert!(matches!(err, MatomeError::Upstream { .. }), "{err:?}");
    assert_eq!(fetcher.calls(), 1, "failed fetches still count");
}

#[tokio::test]
async fn memory_store_scan_is_prefix_scoped_and_sorted() {
    let store = MemoryStore::new();
    store.seed("tenki:2", b"b").await;
    store.seed("tenki:1", b"a").await;
    store.seed("ken2:1", b"c").await;

    let keys = store.scan("tenki:").await.unwrap();
    assert_eq!(keys, vec!["tenki:1".to_string(), "tenki:2".to_string()]);

    store.flush().await.unwrap();
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn user_store_authenticates_by_email_and_password() {
    let users = MemoryUserStore::new();
    users.add_user(
        User {
            id: 1,
            email: "isucon1@isucon.net".to_string(),
            grade: "premium".to_string(),
        },
        "isucon1",
    );

    let found = users
        .authenticate("isucon1@isucon.net", "isucon1")
        .await
        .unwrap()
        .expect("matching credentials");
    assert_eq!(found.id, 1);
    assert_eq!(found.grade, "premium");

    let wrong = users
        .authenticate("isucon1@isucon.net", "nope")
        .await
        .unwrap();
    assert!(wrong.is_none());

    let by_id = users.get(1).await.unwrap().expect("registered id");
    assert_eq!(by_id.email, "isucon1@isucon.net");
    assert!(users.get(2).await.unwrap().is_none());
}
