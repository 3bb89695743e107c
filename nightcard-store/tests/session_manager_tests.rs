//! Session manager scenarios: spending, exhaustion, reset, overlap and
//! failure handling.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use nightcard_core::{ComfortProvider, ComfortRequest, STORAGE_KEY, SessionState};
use nightcard_fetch::{FetchContext, MemoryKeychain};
use nightcard_providers::fallback::REQUEST_FAILED;
use nightcard_providers::{ApiKeySource, GeminiComfortProvider, GeminiConfig, StaticComfortProvider};
use nightcard_store::{
    KeyValueStore, MemoryKeyValueStore, ResetApproval, ResetOutcome, SessionManager, SessionStore,
    SpendOutcome, StoreError,
};
use tokio::sync::Notify;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

fn memory_manager(provider: Arc<dyn ComfortProvider>) -> (SessionManager, Arc<MemoryKeyValueStore>) {
    let kv = Arc::new(MemoryKeyValueStore::new());
    let store = SessionStore::new(kv.clone());
    let manager = SessionManager::with_state(SessionState::default(), store, provider);
    (manager, kv)
}

fn saved_state(kv: &MemoryKeyValueStore) -> SessionState {
    let raw = kv.peek(STORAGE_KEY).expect("state should be saved");
    SessionState::from_json(&raw).unwrap()
}

/// Counts calls and holds each one until released.
struct GatedProvider {
    calls: AtomicUsize,
    started: Notify,
    release: Notify,
}

impl GatedProvider {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            started: Notify::new(),
            release: Notify::new(),
        }
    }
}

#[async_trait]
impl ComfortProvider for GatedProvider {
    fn name(&self) -> &str {
        "gated"
    }

    async fn fetch_message(&self, _request: &ComfortRequest) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started.notify_one();
        self.release.notified().await;
        "晚安".to_string()
    }
}

/// A backend whose writes always fail.
struct BrokenStore;

#[async_trait]
impl KeyValueStore for BrokenStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Io(std::io::Error::other("disk unplugged")))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("disk unplugged")))
    }

    async fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("disk unplugged")))
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_spend_until_exhausted_then_reset() {
    let (manager, kv) = memory_manager(Arc::new(StaticComfortProvider::new("晚安")));
    let request = ComfortRequest::default();

    let first = manager.spend(&request).await;
    let record = first.record().expect("first spend succeeds").clone();
    assert_eq!(record.comfort_message.as_deref(), Some("晚安"));
    assert_eq!(manager.remaining_cards().await, 2);
    assert_eq!(manager.history().await, vec![record]);

    assert!(matches!(manager.spend(&request).await, SpendOutcome::Spent(_)));
    assert!(matches!(manager.spend(&request).await, SpendOutcome::Spent(_)));
    assert_eq!(manager.remaining_cards().await, 0);
    assert_eq!(manager.history().await.len(), 3);

    let before = manager.snapshot().await;
    assert_eq!(manager.spend(&request).await, SpendOutcome::Exhausted);
    assert_eq!(manager.snapshot().await, before);
    assert_eq!(saved_state(&kv), before);

    assert_eq!(manager.reset(ResetApproval::Confirmed).await, ResetOutcome::Reset);
    assert_eq!(manager.snapshot().await, SessionState::default());
    assert_eq!(saved_state(&kv), SessionState::default());
}

#[tokio::test]
async fn test_record_ids_are_unique_and_ordered() {
    let (manager, _kv) = memory_manager(Arc::new(StaticComfortProvider::new("晚安")));
    for _ in 0..3 {
        manager.spend(&ComfortRequest::default()).await;
    }

    let history = manager.history().await;
    assert_ne!(history[0].id, history[1].id);
    assert_ne!(history[1].id, history[2].id);
    assert!(history.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[tokio::test]
async fn test_reset_is_idempotent() {
    let (manager, _kv) = memory_manager(Arc::new(StaticComfortProvider::new("晚安")));
    manager.spend(&ComfortRequest::default()).await;

    manager.reset(ResetApproval::Confirmed).await;
    let once = manager.snapshot().await;
    manager.reset(ResetApproval::Confirmed).await;
    assert_eq!(manager.snapshot().await, once);
}

#[tokio::test]
async fn test_declined_reset_changes_nothing() {
    let (manager, kv) = memory_manager(Arc::new(StaticComfortProvider::new("晚安")));
    manager.spend(&ComfortRequest::default()).await;
    let before = manager.snapshot().await;

    assert_eq!(manager.reset(ResetApproval::Declined).await, ResetOutcome::Declined);
    assert_eq!(manager.snapshot().await, before);
    assert_eq!(saved_state(&kv), before);
}

#[tokio::test]
async fn test_empty_message_is_stored_as_absent() {
    let (manager, kv) = memory_manager(Arc::new(StaticComfortProvider::new("   ")));
    let outcome = manager.spend(&ComfortRequest::default()).await;

    assert_eq!(outcome.record().unwrap().comfort_message, None);
    let raw = kv.peek(STORAGE_KEY).unwrap();
    assert!(!raw.contains("comfortMessage"));
}

// ============================================================================
// Overlapping Transitions
// ============================================================================

#[tokio::test]
async fn test_overlapping_spend_and_reset_are_rejected() {
    let provider = Arc::new(GatedProvider::new());
    let (manager, _kv) = memory_manager(provider.clone());
    let manager = Arc::new(manager);

    let first = tokio::spawn({
        let manager = manager.clone();
        async move { manager.spend(&ComfortRequest::default()).await }
    });

    provider.started.notified().await;
    assert!(manager.is_in_flight());

    assert_eq!(manager.spend(&ComfortRequest::default()).await, SpendOutcome::Busy);
    assert_eq!(manager.reset(ResetApproval::Confirmed).await, ResetOutcome::Busy);
    assert_eq!(manager.remaining_cards().await, 3);

    provider.release.notify_one();
    let outcome = first.await.unwrap();

    assert!(matches!(outcome, SpendOutcome::Spent(_)));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    assert_eq!(manager.remaining_cards().await, 2);
    assert_eq!(manager.history().await.len(), 1);
    assert!(!manager.is_in_flight());
}

#[tokio::test]
async fn test_dropped_spend_releases_guard() {
    let provider = Arc::new(GatedProvider::new());
    let (manager, _kv) = memory_manager(provider.clone());
    let manager = Arc::new(manager);

    let task = tokio::spawn({
        let manager = manager.clone();
        async move { manager.spend(&ComfortRequest::default()).await }
    });
    provider.started.notified().await;
    task.abort();
    let _ = task.await;

    assert!(!manager.is_in_flight());
    assert_eq!(manager.remaining_cards().await, 3);
    assert_eq!(manager.reset(ResetApproval::Confirmed).await, ResetOutcome::Reset);
}

// ============================================================================
// Failure Handling
// ============================================================================

#[tokio::test]
async fn test_failing_generation_still_spends_one_card() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = FetchContext::builder()
        .keychain(Arc::new(MemoryKeychain::new()))
        .build()
        .unwrap();
    let config = GeminiConfig {
        api_base: server.uri(),
        ..GeminiConfig::default()
    };
    let provider = GeminiComfortProvider::with_credentials(config, &ctx, ApiKeySource::explicit("k"));
    let (manager, _kv) = memory_manager(Arc::new(provider));

    let outcome = manager.spend(&ComfortRequest::default()).await;

    assert_eq!(outcome.record().unwrap().message(), REQUEST_FAILED);
    assert_eq!(manager.remaining_cards().await, 2);
    assert_eq!(manager.history().await.len(), 1);
}

#[tokio::test]
async fn test_broken_storage_does_not_block_transitions() {
    let store = SessionStore::new(Arc::new(BrokenStore));
    let manager = SessionManager::load(store, Arc::new(StaticComfortProvider::new("晚安"))).await;
    assert_eq!(manager.snapshot().await, SessionState::default());

    assert!(matches!(manager.spend(&ComfortRequest::default()).await, SpendOutcome::Spent(_)));
    assert_eq!(manager.remaining_cards().await, 2);
    assert_eq!(manager.reset(ResetApproval::Confirmed).await, ResetOutcome::Reset);
    assert_eq!(manager.remaining_cards().await, 3);
}

#[tokio::test]
async fn test_load_resumes_saved_session() {
    let kv = Arc::new(MemoryKeyValueStore::new());
    {
        let store = SessionStore::new(kv.clone());
        let manager = SessionManager::load(store, Arc::new(StaticComfortProvider::new("晚安"))).await;
        manager.spend(&ComfortRequest::default()).await;
    }

    let store = SessionStore::new(kv);
    let manager = SessionManager::load(store, Arc::new(StaticComfortProvider::new("晚安"))).await;
    assert_eq!(manager.remaining_cards().await, 2);
    assert_eq!(manager.history().await[0].message(), "晚安");
}

#[tokio::test]
async fn test_corrupt_storage_starts_fresh() {
    let kv = Arc::new(MemoryKeyValueStore::with_entry(STORAGE_KEY, "][garbage"));
    let manager = SessionManager::load(
        SessionStore::new(kv),
        Arc::new(StaticComfortProvider::new("晚安")),
    )
    .await;
    assert_eq!(manager.snapshot().await, SessionState::default());
}
