use crate::application::ports::connectivity::ConnectivitySignal;
use crate::application::ports::offline_store::OfflineStore;
use crate::domain::entities::offline::{ConnectivityChange, ConnectivityState};
use crate::shared::error::AppError;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

const OFFLINE: u8 = 1;
const ONLINE: u8 = 2;

const TRANSITION_CHANNEL_CAPACITY: usize = 16;

type TransitionCallback = Arc<dyn Fn(ConnectivityChange) + Send + Sync>;

#[derive(Default)]
struct SubscriberRegistry {
    next_id: AtomicU64,
    callbacks: Mutex<Vec<(u64, TransitionCallback)>>,
}

impl SubscriberRegistry {
    fn add(&self, callback: TransitionCallback) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut callbacks) = self.callbacks.lock() {
            callbacks.push((id, callback));
        }
        id
    }

    fn remove(&self, id: u64) {
        if let Ok(mut callbacks) = self.callbacks.lock() {
            callbacks.retain(|(existing, _)| *existing != id);
        }
    }

    fn snapshot(&self) -> Vec<TransitionCallback> {
        self.callbacks
            .lock()
            .map(|callbacks| callbacks.iter().map(|(_, cb)| Arc::clone(cb)).collect())
            .unwrap_or_default()
    }

    fn len(&self) -> usize {
        self.callbacks.lock().map(|c| c.len()).unwrap_or(0)
    }
}

/// Handle returned by [`ConnectivityMonitor::subscribe`]. Dropping it unsubscribes.
pub struct ConnectivitySubscription {
    id: u64,
    registry: Weak<SubscriberRegistry>,
}

impl ConnectivitySubscription {
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for ConnectivitySubscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}

/// Read-through view of reachability and outstanding work for the UI and the sync driver.
///
/// Platform events arrive through [`observe`](Self::observe), [`refresh`](Self::refresh)
/// or the poller. All of them pass through a single atomic swap of the last seen
/// state, so each real transition is reported exactly once. The state the monitor
/// is created with is never reported.
pub struct ConnectivityMonitor {
    signal: Arc<dyn ConnectivitySignal>,
    store: Arc<dyn OfflineStore>,
    last_seen: AtomicU8,
    subscribers: Arc<SubscriberRegistry>,
    transitions_tx: broadcast::Sender<ConnectivityChange>,
}

impl ConnectivityMonitor {
    /// Creates a monitor whose baseline is `initially_online`.
    pub fn new(
        signal: Arc<dyn ConnectivitySignal>,
        store: Arc<dyn OfflineStore>,
        initially_online: bool,
    ) -> Self {
        let (transitions_tx, _) = broadcast::channel(TRANSITION_CHANNEL_CAPACITY);
        Self {
            signal,
            store,
            last_seen: AtomicU8::new(state_code(initially_online)),
            subscribers: Arc::new(SubscriberRegistry::default()),
            transitions_tx,
        }
    }

    /// Creates a monitor whose baseline is the signal's current reading.
    pub async fn start(signal: Arc<dyn ConnectivitySignal>, store: Arc<dyn OfflineStore>) -> Self {
        let initially_online = signal.is_online().await;
        Self::new(signal, store, initially_online)
    }

    pub async fn currently_online(&self) -> bool {
        self.signal.is_online().await
    }

    /// Feeds a platform online/offline event. Returns the transition it caused, if any.
    pub fn observe(&self, online: bool) -> Option<ConnectivityChange> {
        let next = state_code(online);
        let previous = self.last_seen.swap(next, Ordering::SeqCst);
        if previous == next {
            return None;
        }

        let change = ConnectivityChange::from_online(online);
        tracing::info!(
            target: "offline::connectivity",
            online,
            subscribers = self.subscribers.len(),
            "connectivity changed"
        );

        for callback in self.subscribers.snapshot() {
            callback(change);
        }
        // no async listeners is fine
        let _ = self.transitions_tx.send(change);

        Some(change)
    }

    /// Reads the signal and feeds the result to [`observe`](Self::observe).
    pub async fn refresh(&self) -> Option<ConnectivityChange> {
        let online = self.signal.is_online().await;
        self.observe(online)
    }

    /// Registers `callback` for future transitions; the current state is never replayed.
    pub fn subscribe<F>(&self, callback: F) -> ConnectivitySubscription
    where
        F: Fn(ConnectivityChange) + Send + Sync + 'static,
    {
        let id = self.subscribers.add(Arc::new(callback));
        ConnectivitySubscription {
            id,
            registry: Arc::downgrade(&self.subscribers),
        }
    }

    pub fn transitions(&self) -> broadcast::Receiver<ConnectivityChange> {
        self.transitions_tx.subscribe()
    }

    pub async fn pending_count(&self) -> Result<u64, AppError> {
        self.store.count_unsynced().await
    }

    /// Pushed pending counts from the store, an alternative to polling [`pending_count`](Self::pending_count).
    pub fn pending_count_updates(&self) -> broadcast::Receiver<u64> {
        self.store.subscribe_pending_count()
    }

    pub async fn state(&self) -> Result<ConnectivityState, AppError> {
        Ok(ConnectivityState {
            is_online: self.currently_online().await,
            pending_count: self.pending_count().await?,
        })
    }

    /// Re-reads the signal every `interval` so missed platform events still surface.
    pub fn spawn_poller(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let monitor = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                monitor.refresh().await;
            }
        })
    }
}

fn state_code(online: bool) -> u8 {
    if online {
        ONLINE
    } else {
        OFFLINE
    }
}
