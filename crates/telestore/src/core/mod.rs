/*!
Observable store facade - composes the flat store and the broadcaster.

# Module Structure

- `mod.rs` - `ObservableStore`, construction, reads/writes, change feed
- `store.rs` - `FlatStore`: latest value per key on its own serial context
- `broadcaster.rs` - `Broadcaster`: observer registry + fan-out on its own context
- `subscriptions.rs` - add/remove observers

# Ordering

Every facade operation is first enqueued on the flat store's context, and
whatever it forwards to the broadcaster is enqueued from there. The store
context is therefore the single sequencer: `set` pairs each new value with
exactly the value it replaced, and an `add` followed by a `set` or a `remove`
from the same thread always takes effect in that order.
*/

mod broadcaster;
mod store;
mod subscriptions;

use crate::dispatch::Delivery;
use crate::types::{Change, Key, KeyedValue, StoreResult};
use async_broadcast::{InactiveReceiver, Sender};
use broadcaster::Broadcaster;
use std::sync::OnceLock;
use store::FlatStore;

const DEFAULT_LABEL: &str = "telestore";
const DEFAULT_CHANGE_FEED_CAPACITY: usize = 1024;

/// Observable keyed store.
///
/// Clone is cheap (Arc bumps) - share freely across threads. The worker
/// threads stop once the last clone is dropped.
pub struct ObservableStore {
  store: FlatStore,
  broadcaster: Broadcaster,
  changes_tx: Sender<Change>,
  changes_keepalive: InactiveReceiver<Change>,
}

impl Clone for ObservableStore {
  fn clone(&self) -> Self {
    Self {
      store: self.store.clone(),
      broadcaster: self.broadcaster.clone(),
      changes_tx: self.changes_tx.clone(),
      changes_keepalive: self.changes_keepalive.clone(),
    }
  }
}

impl std::fmt::Debug for ObservableStore {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ObservableStore").finish_non_exhaustive()
  }
}

/// Builder for configuring an [`ObservableStore`].
///
/// # Example
///
/// ```ignore
/// let store = ObservableStore::builder()
///     .label("gcs")
///     .delivery(Delivery::serial("gcs.ui")?)
///     .change_feed_capacity(256)
///     .build()?;
/// ```
#[derive(Debug, Clone)]
#[must_use = "Builder does nothing until .build() is called"]
pub struct ObservableStoreBuilder {
  label: &'static str,
  delivery: Delivery,
  change_feed_capacity: usize,
}

impl Default for ObservableStoreBuilder {
  fn default() -> Self {
    Self {
      label: DEFAULT_LABEL,
      delivery: Delivery::default(),
      change_feed_capacity: DEFAULT_CHANGE_FEED_CAPACITY,
    }
  }
}

impl ObservableStoreBuilder {
  /// Prefix for worker thread names (`<label>.store`, `<label>.broadcast`).
  /// Default: `telestore`.
  pub fn label(mut self, label: &'static str) -> Self {
    self.label = label;
    self
  }

  /// Context observer callbacks run on. Default: [`Delivery::Main`].
  pub fn delivery(mut self, delivery: Delivery) -> Self {
    self.delivery = delivery;
    self
  }

  /// Buffered changes per [`ObservableStore::subscribe`] receiver before the
  /// oldest are dropped. Default: 1024.
  pub fn change_feed_capacity(mut self, capacity: usize) -> Self {
    self.change_feed_capacity = capacity.max(1);
    self
  }

  /// Start the store's worker threads.
  #[must_use = "ObservableStore must be stored to keep its contexts alive"]
  pub fn build(self) -> StoreResult<ObservableStore> {
    ObservableStore::create(self)
  }
}

impl ObservableStore {
  /// Create a store with default options.
  ///
  /// For custom configuration, use [`ObservableStore::builder()`].
  pub fn new() -> StoreResult<Self> {
    Self::builder().build()
  }

  /// Start configuring a store; see [`ObservableStoreBuilder`].
  pub fn builder() -> ObservableStoreBuilder {
    ObservableStoreBuilder::default()
  }

  /// Process-wide store, created on first use with default options.
  #[allow(clippy::expect_used)] // No worker threads at startup means no store at all
  pub fn shared() -> &'static Self {
    static SHARED: OnceLock<ObservableStore> = OnceLock::new();
    SHARED.get_or_init(|| Self::new().expect("Failed to start shared telestore"))
  }

  fn create(config: ObservableStoreBuilder) -> StoreResult<Self> {
    let (mut tx, rx) = async_broadcast::broadcast(config.change_feed_capacity);
    tx.set_overflow(true); // Drop oldest changes when a subscriber falls behind

    let store = FlatStore::new(format!("{}.store", config.label))?;
    let broadcaster = Broadcaster::new(format!("{}.broadcast", config.label), config.delivery)?;

    log::debug!("Started store '{}'", config.label);

    Ok(Self {
      store,
      broadcaster,
      changes_tx: tx,
      changes_keepalive: rx.deactivate(),
    })
  }

  /// Publish `value` under `key` (`None` clears it). Returns immediately.
  ///
  /// Observers of `key` receive `Change { new: value, prior }`, where `prior`
  /// is exactly the value this write replaced.
  pub fn set(&self, value: impl Into<Option<KeyedValue>>, key: impl Into<Key>) {
    let key = key.into();
    let value = value.into();
    let broadcaster = self.broadcaster.clone();
    let changes_tx = self.changes_tx.clone();

    self.store.swap(value.clone(), key, move |prior| {
      let change = Change::new(key, value, prior);
      emit(&changes_tx, change.clone());
      broadcaster.broadcast(change);
    });
  }

  /// Latest value for `key`, or `None` if it was never set or was cleared.
  ///
  /// Blocks until every write enqueued before this call has been applied.
  pub fn available_value(&self, key: impl Into<Key>) -> Option<KeyedValue> {
    let key = key.into();
    match self.store.available_value(key) {
      Ok(value) => value,
      Err(e) => {
        log::error!("Reading {key} failed: {e}");
        None
      }
    }
  }

  /// Non-blocking read; `completion` runs on the store's own context, so it
  /// must not block on this store.
  pub fn value_async(
    &self,
    key: impl Into<Key>,
    completion: impl FnOnce(Option<KeyedValue>) + Send + 'static,
  ) {
    self.store.async_value(key.into(), completion);
  }

  /// Snapshot of every populated key and its value, sorted by key.
  pub fn entries(&self) -> Vec<(Key, KeyedValue)> {
    self.store.entries().unwrap_or_else(|e| {
      log::error!("Reading entries failed: {e}");
      Vec::new()
    })
  }

  /// Every populated key, sorted.
  pub fn keys(&self) -> Vec<Key> {
    self.entries().into_iter().map(|(key, _)| key).collect()
  }

  /// Subscribe to every change made through [`ObservableStore::set`].
  pub fn subscribe(&self) -> async_broadcast::Receiver<Change> {
    self.changes_keepalive.activate_cloned()
  }

  /// Block until every operation issued before this call has been applied and
  /// every resulting observer callback has run.
  pub fn flush(&self) -> StoreResult<()> {
    self.store.barrier()?;
    self.broadcaster.flush()
  }
}

fn emit(changes_tx: &Sender<Change>, change: Change) {
  if let Err(e) = changes_tx.try_broadcast(change) {
    if e.is_full() {
      log::error!("Change feed overflow - changes are being dropped");
    }
  }
}
