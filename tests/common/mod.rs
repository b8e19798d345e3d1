#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use transaction_service::adapters::InMemoryTransactionStore;
use transaction_service::config::Config;
use transaction_service::domain::{Transaction, TransactionUpdate};
use transaction_service::ports::{InsertOutcome, RepositoryResult, TransactionStore};
use transaction_service::services::{ConfirmationBackend, ConfirmationError};
use transaction_service::{create_app, startup, AppState};

pub const TEST_DELAY: Duration = Duration::from_millis(50);

/// In-memory store that counts inserts and pauses inside them to widen races.
#[derive(Clone, Default)]
pub struct CountingStore {
    pub inner: InMemoryTransactionStore,
    pub insert_attempts: Arc<AtomicUsize>,
    pub inserted: Arc<AtomicUsize>,
}

impl CountingStore {
    pub fn attempts(&self) -> usize {
        self.insert_attempts.load(Ordering::SeqCst)
    }

    pub fn inserted(&self) -> usize {
        self.inserted.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransactionStore for CountingStore {
    async fn get_by_id(&self, id: &str) -> RepositoryResult<Option<Transaction>> {
        self.inner.get_by_id(id).await
    }

    async fn insert_if_absent(&self, tx: &Transaction) -> RepositoryResult<InsertOutcome> {
        self.insert_attempts.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        let outcome = self.inner.insert_if_absent(tx).await?;
        if outcome == InsertOutcome::Inserted {
            self.inserted.fetch_add(1, Ordering::SeqCst);
        }
        Ok(outcome)
    }

    async fn update(&self, id: &str, update: &TransactionUpdate) -> RepositoryResult<()> {
        self.inner.update(id, update).await
    }
}

/// Fixed-delay confirmation that records every call.
#[derive(Clone)]
pub struct CountingBackend {
    pub delay: Duration,
    pub calls: Arc<AtomicUsize>,
}

impl CountingBackend {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfirmationBackend for CountingBackend {
    async fn confirm(&self, _tx: &Transaction) -> Result<(), ConfirmationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: CountingStore,
    pub backend: CountingBackend,
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(CountingStore::default(), TEST_DELAY)
}

pub fn spawn_app_with(store: CountingStore, delay: Duration) -> TestApp {
    let backend = CountingBackend::new(delay);
    let services = startup::build_services(
        &Config::default(),
        Arc::new(store.clone()),
        Arc::new(backend.clone()),
    );
    services.dispatcher.spawn();

    TestApp {
        router: create_app(services.state.clone()),
        state: services.state,
        store,
        backend,
    }
}

pub async fn post_json(router: &Router, uri: &str, body: String) -> (StatusCode, String) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Polls the query endpoint until the record reports PROCESSED.
pub async fn wait_until_processed(router: &Router, id: &str) -> Value {
    for _ in 0..100 {
        let (status, json) = get(router, &format!("/transactions/{}", id)).await;
        if status == StatusCode::OK && json["status"] == "PROCESSED" {
            return json;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("transaction {} was not processed in time", id);
}
