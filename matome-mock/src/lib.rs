//! matome-mock
//!
//! CI-safe fakes for the matome collaborator seams: a programmable
//! [`MockFetcher`] with call counting, an in-memory [`MemoryStore`] cache
//! backend, and a [`MemoryUserStore`]. All are deterministic and make no
//! network calls.
#![warn(missing_docs)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use matome_core::{
    CacheStore, MatomeError, RequestDescriptor, ServiceFetcher, ServiceName, User, UserStore,
};

pub mod fixtures;

/// Programmable fetcher double.
///
/// Configure per-service responses (or failures) up front, then assert on
/// call counts and recorded descriptors afterwards. Unconfigured services
/// fail with an upstream error so tests notice unexpected traffic.
#[derive(Default)]
pub struct MockFetcher {
    responses: Mutex<HashMap<ServiceName, Result<Value, String>>>,
    delays: Mutex<HashMap<ServiceName, Duration>>,
    requests: Mutex<Vec<(ServiceName, RequestDescriptor)>>,
    calls: AtomicUsize,
}

impl MockFetcher {
    /// Empty mock; every fetch fails until responses are configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock preloaded with the canned fixture payload for every service.
    #[must_use]
    pub fn canned() -> Self {
        let mock = Self::new();
        for svc in ServiceName::ALL {
            mock.respond_with(svc, fixtures::payload(svc));
        }
        mock
    }

    /// Configure the payload returned for a service.
    pub fn respond_with(&self, service: ServiceName, payload: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(service, Ok(payload));
    }

    /// Configure a forced upstream failure for a service.
    pub fn fail_with(&self, service: ServiceName, msg: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(service, Err(msg.into()));
    }

    /// Delay every fetch for a service, for timeout tests.
    pub fn delay_for(&self, service: ServiceName, delay: Duration) {
        self.delays.lock().unwrap().insert(service, delay);
    }

    /// Total number of fetch calls across all services.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of fetch calls for one service.
    #[must_use]
    pub fn calls_for(&self, service: ServiceName) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| *s == service)
            .count()
    }

    /// Every `(service, descriptor)` pair seen, in call order.
    #[must_use]
    pub fn requests(&self) -> Vec<(ServiceName, RequestDescriptor)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ServiceFetcher for MockFetcher {
    fn name(&self) -> &'static str {
        "matome-mock"
    }

    async fn fetch(
        &self,
        service: ServiceName,
        descriptor: &RequestDescriptor,
    ) -> Result<Value, MatomeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((service, descriptor.clone()));

        let delay = self.delays.lock().unwrap().get(&service).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.responses.lock().unwrap().get(&service) {
            Some(Ok(payload)) => Ok(payload.clone()),
            Some(Err(msg)) => Err(MatomeError::upstream(service, msg.clone())),
            None => Err(MatomeError::upstream(
                service,
                "no mock response configured",
            )),
        }
    }
}

/// In-memory flat keyspace implementing [`CacheStore`].
#[derive(Default)]
pub struct MemoryStore {
    entries: tokio::sync::Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a key, bypassing the trait (useful for arranging test state).
    pub async fn seed(&self, key: &str, value: &[u8]) {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_vec());
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// True when nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, MatomeError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), MatomeError> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn scan(&self, prefix: &str) -> Result<Vec<String>, MatomeError> {
        let mut keys: Vec<String> = self
            .entries
            .lock()
            .await
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn flush(&self) -> Result<(), MatomeError> {
        self.entries.lock().await.clear();
        Ok(())
    }
}

/// In-memory [`UserStore`] with plaintext credentials, for tests only.
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<(String, User)>>,
}

impl MemoryUserStore {
    /// Empty user store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user with a plaintext password.
    pub fn add_user(&self, user: User, password: impl Into<String>) {
        self.users.lock().unwrap().push((password.into(), user));
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, MatomeError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|(pw, u)| u.email == email && pw == password)
            .map(|(_, u)| u.clone()))
    }

    async fn get(&self, user_id: i64) -> Result<Option<User>, MatomeError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|(_, u)| u.id == user_id)
            .map(|(_, u)| u.clone()))
    }
}
