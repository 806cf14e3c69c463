// ═══════════════════════════════════════════════════════════════════
// Integration Tests — sign-in to sign-out flows, persistence across
// session restarts, multi-user isolation, scheduled refresh loop
// ═══════════════════════════════════════════════════════════════════

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crypto_tracker_core::errors::CoreError;
use crypto_tracker_core::feed::traits::MarketDataProvider;
use crypto_tracker_core::models::alert::AlertCondition;
use crypto_tracker_core::models::instrument::Instrument;
use crypto_tracker_core::notify::NullSink;
use crypto_tracker_core::services::auth_service::AuthService;
use crypto_tracker_core::storage::file_store::FileStore;
use crypto_tracker_core::storage::kv::KeyValueStore;
use crypto_tracker_core::{spawn_refresh_loop, TrackerSession};

fn instrument(id: &str, symbol: &str, name: &str, price: f64) -> Instrument {
    Instrument::new(id, symbol, name, price)
}

/// Provider that always serves the same market table and counts fetches.
struct FixedProvider {
    instruments: Vec<Instrument>,
    fetches: Arc<Mutex<usize>>,
}

impl FixedProvider {
    fn new(instruments: Vec<Instrument>) -> (Self, Arc<Mutex<usize>>) {
        let fetches = Arc::new(Mutex::new(0));
        (
            Self {
                instruments,
                fetches: fetches.clone(),
            },
            fetches,
        )
    }
}

#[async_trait]
impl MarketDataProvider for FixedProvider {
    fn name(&self) -> &str {
        "Fixed"
    }

    async fn fetch_markets(&self) -> Result<Vec<Instrument>, CoreError> {
        *self.fetches.lock().unwrap() += 1;
        Ok(self.instruments.clone())
    }
}

fn markets() -> Vec<Instrument> {
    vec![
        instrument("bitcoin", "btc", "Bitcoin", 50000.0),
        instrument("ethereum", "eth", "Ethereum", 2500.0),
    ]
}

fn start_session(user_id: &str, store: Arc<dyn KeyValueStore>) -> TrackerSession {
    let (provider, _) = FixedProvider::new(markets());
    TrackerSession::start(user_id, store, Arc::new(NullSink), Arc::new(provider)).unwrap()
}

#[tokio::test]
async fn state_survives_session_restart() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());

    let alert_id;
    {
        let mut session = start_session("u1", store.clone());
        session.refresh().await.unwrap();
        session.buy("bitcoin", 0.1, 45000.0).unwrap();
        session.add_to_watchlist("ethereum").unwrap();
        alert_id = session
            .create_alert("ethereum", 3000.0, AlertCondition::Above)
            .unwrap();
    }

    // Same user, fresh session: everything loads back.
    let session = start_session("u1", store);
    assert_eq!(session.positions().len(), 1);
    assert_eq!(session.positions()[0].id, "bitcoin");
    assert_eq!(session.positions()[0].average_price, 45000.0);
    assert!(session.watchlist_contains("ethereum"));
    assert_eq!(session.alerts().len(), 1);
    assert_eq!(session.alerts()[0].id, alert_id);
    assert!(session.alerts()[0].is_active);
}

#[tokio::test]
async fn users_do_not_see_each_other() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());

    {
        let mut alice = start_session("alice", store.clone());
        alice.refresh().await.unwrap();
        alice.buy("bitcoin", 1.0, 40000.0).unwrap();
        alice.add_to_watchlist("bitcoin").unwrap();
    }

    let bob = start_session("bob", store.clone());
    assert!(bob.positions().is_empty());
    assert!(!bob.watchlist_contains("bitcoin"));

    let alice = start_session("alice", store);
    assert_eq!(alice.positions().len(), 1);
}

#[tokio::test]
async fn triggered_alert_state_persists() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());

    {
        let mut session = start_session("u1", store.clone());
        session.refresh().await.unwrap();
        // Target below the fixed BTC price: triggers on the next refresh.
        session
            .create_alert("bitcoin", 49000.0, AlertCondition::Above)
            .unwrap();
        session.refresh().await.unwrap();
        assert!(!session.alerts()[0].is_active);
    }

    // Restart: the alert is still inactive, so it cannot fire again.
    let mut session = start_session("u1", store);
    assert!(!session.alerts()[0].is_active);
    session.refresh().await.unwrap();
    assert!(!session.alerts()[0].is_active);
}

#[tokio::test]
async fn auth_flow_to_session() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());

    let auth = AuthService::new(store.clone());
    let user = auth.sign_up("alice@example.com", "secret1", "Alice").unwrap();

    {
        let mut session = start_session(&user.id, store.clone());
        session.refresh().await.unwrap();
        session.add_to_watchlist("bitcoin").unwrap();
        session.buy("bitcoin", 0.5, 40000.0).unwrap();
    }

    auth.sign_out().unwrap();
    assert!(auth.current_user().unwrap().is_none());

    // Watchlist and portfolio were cleared at sign-out.
    let session = start_session(&user.id, store);
    assert!(session.positions().is_empty());
    assert!(!session.watchlist_contains("bitcoin"));
}

#[tokio::test(flavor = "multi_thread")]
async fn refresh_loop_ticks_and_shuts_down() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());

    let (provider, fetches) = FixedProvider::new(markets());
    let session = TrackerSession::start("u1", store, Arc::new(NullSink), Arc::new(provider)).unwrap();
    let session = Arc::new(tokio::sync::Mutex::new(session));

    let handle = spawn_refresh_loop(session.clone(), Duration::from_millis(10));
    tokio::time::sleep(Duration::from_millis(100)).await;
    handle.shutdown().await;

    let ticks = *fetches.lock().unwrap();
    assert!(ticks >= 2, "expected at least 2 refreshes, got {ticks}");

    // Loop stopped: no more fetches after shutdown.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(*fetches.lock().unwrap(), ticks);

    // The session saw the refreshed snapshot.
    let session = session.lock().await;
    assert_eq!(session.snapshot().len(), 2);
    assert!(session.feed_error().is_none());
}

/// Provider whose fetch takes long enough to overlap with user actions.
struct SlowProvider {
    instruments: Vec<Instrument>,
    delay: Duration,
}

#[async_trait]
impl MarketDataProvider for SlowProvider {
    fn name(&self) -> &str {
        "Slow"
    }

    async fn fetch_markets(&self) -> Result<Vec<Instrument>, CoreError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.instruments.clone())
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn mutations_proceed_while_fetch_is_in_flight() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());

    let provider = SlowProvider {
        instruments: markets(),
        delay: Duration::from_millis(500),
    };
    let session =
        TrackerSession::start("u1", store, Arc::new(NullSink), Arc::new(provider)).unwrap();
    let session = Arc::new(tokio::sync::Mutex::new(session));

    // First tick fires immediately, so a fetch is in flight shortly after.
    let handle = spawn_refresh_loop(session.clone(), Duration::from_secs(3600));
    tokio::time::sleep(Duration::from_millis(100)).await;

    // The session lock must be free during the fetch: a watchlist add
    // completes well before the provider's 500ms delay elapses.
    let started = std::time::Instant::now();
    {
        let mut session = session.lock().await;
        assert!(session.add_to_watchlist("bitcoin").unwrap());
    }
    let waited = started.elapsed();
    assert!(
        waited < Duration::from_millis(250),
        "watchlist add waited {waited:?} behind the in-flight fetch"
    );

    handle.shutdown().await;

    let session = session.lock().await;
    assert!(session.watchlist_contains("bitcoin"));
    assert_eq!(session.snapshot().len(), 2);
}
