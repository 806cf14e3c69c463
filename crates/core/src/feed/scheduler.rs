use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::TrackerSession;

/// Controls a running refresh loop. Call [`RefreshHandle::shutdown`] on
/// session teardown; dropping the handle also stops the loop at the next
/// tick boundary, but without waiting for it to exit.
pub struct RefreshHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Signal the loop to stop and wait for it to exit. An in-flight
    /// refresh is allowed to complete; its result lands in the session
    /// before the loop exits.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}

/// Drive the session's market refresh on a fixed period.
///
/// The first tick fires immediately (refresh on startup), then every
/// `interval`. The network fetch runs without the session lock held, so
/// watchlist, portfolio, and alert mutations proceed while a fetch is in
/// flight; the session is locked only briefly to apply the result. A
/// failed refresh only logs — the feed keeps its previous snapshot and
/// the next tick retries; there is no backoff.
pub fn spawn_refresh_loop(
    session: Arc<Mutex<TrackerSession>>,
    interval: Duration,
) -> RefreshHandle {
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        let provider = session.lock().await.market_provider();
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown_rx.changed() => {
                    debug!("refresh loop shutting down");
                    break;
                }
            }

            // Shutdown is only observed between ticks: a fetch in flight
            // runs to completion and its result is applied normally.
            let fetched = provider.fetch_markets().await;
            {
                let mut session = session.lock().await;
                if let Err(e) = session.apply_refresh(fetched) {
                    warn!(error = %e, "scheduled refresh failed; retrying on next tick");
                }
            }

            if *shutdown_rx.borrow() {
                break;
            }
        }
    });

    RefreshHandle {
        shutdown: shutdown_tx,
        task,
    }
}
