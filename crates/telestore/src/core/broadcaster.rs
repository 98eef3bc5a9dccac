/*!
Broadcaster - observer registry and fan-out.

The registry (`Key -> [ObserverRecord]`) is owned by the broadcaster's own
serial context; add/remove/broadcast are jobs on it and are totally ordered.
A broadcast snapshots the records for its key on that context, then hands one
task per observer to the [`Delivery`] context.

Observers are held weakly. A record whose observer has been dropped is skipped
and pruned the next time its key is broadcast.

Re-registering the same observer for the same key replaces the earlier
callback in place (last registration wins).
*/

use crate::dispatch::{Delivery, SerialContext};
use crate::types::{Change, Key, KeyedValue, ObserverId, StoreResult};
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

type Callback = Arc<dyn Fn(&(dyn Any + Send + Sync), &Change) + Send + Sync>;

/// One registration: who is observing, and what to call.
#[derive(Clone)]
pub(crate) struct ObserverRecord {
  id: ObserverId,
  observer: Weak<dyn Any + Send + Sync>,
  callback: Callback,
}

impl std::fmt::Debug for ObserverRecord {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ObserverRecord")
      .field("id", &self.id)
      .field("alive", &self.is_alive())
      .finish_non_exhaustive()
  }
}

impl ObserverRecord {
  pub(crate) fn new<O, F>(observer: &Arc<O>, update: F) -> Self
  where
    O: Send + Sync + 'static,
    F: Fn(&O, &Change) + Send + Sync + 'static,
  {
    let weak: Weak<O> = Arc::downgrade(observer);
    Self {
      id: ObserverId::of(observer),
      observer: weak,
      callback: Arc::new(move |observer: &(dyn Any + Send + Sync), change: &Change| {
        if let Some(observer) = observer.downcast_ref::<O>() {
          update(observer, change);
        }
      }),
    }
  }

  pub(crate) const fn id(&self) -> ObserverId {
    self.id
  }

  fn is_alive(&self) -> bool {
    self.observer.strong_count() > 0
  }

  /// Invoke the callback if the observer still exists.
  fn deliver(&self, change: &Change) {
    if let Some(observer) = self.observer.upgrade() {
      (self.callback)(observer.as_ref(), change);
    }
  }
}

/// State owned by the broadcaster context.
pub(crate) struct Registry {
  observers: HashMap<Key, Vec<ObserverRecord>>,
  delivery: Delivery,
}

impl Registry {
  pub(crate) fn new(delivery: Delivery) -> Self {
    Self {
      observers: HashMap::new(),
      delivery,
    }
  }

  /// Insert or replace. Returns `true` if an existing registration was replaced.
  fn insert(&mut self, key: Key, record: ObserverRecord) -> bool {
    let records = self.observers.entry(key).or_default();
    if let Some(existing) = records.iter_mut().find(|r| r.id == record.id) {
      *existing = record;
      true
    } else {
      records.push(record);
      false
    }
  }

  fn remove(&mut self, key: Key, id: ObserverId) -> bool {
    let Some(records) = self.observers.get_mut(&key) else {
      return false;
    };
    let before = records.len();
    records.retain(|r| r.id != id);
    let removed = records.len() != before;
    if records.is_empty() {
      self.observers.remove(&key);
    }
    removed
  }

  /// Remove `id` under every key. Returns how many registrations went away.
  fn remove_all_instances_of(&mut self, id: ObserverId) -> usize {
    let mut removed = 0;
    self.observers.retain(|_, records| {
      let before = records.len();
      records.retain(|r| r.id != id);
      removed += before - records.len();
      !records.is_empty()
    });
    removed
  }

  fn clear(&mut self) {
    self.observers.clear();
  }

  /// Live records for `key`, pruning any whose observer is gone.
  fn live_records(&mut self, key: Key) -> Vec<ObserverRecord> {
    let Some(records) = self.observers.get_mut(&key) else {
      return Vec::new();
    };

    let before = records.len();
    records.retain(ObserverRecord::is_alive);
    if records.len() != before {
      log::debug!(
        "Pruned {} dropped observer(s) from {key}",
        before - records.len()
      );
    }

    let live = records.clone();
    if records.is_empty() {
      self.observers.remove(&key);
    }
    live
  }

  fn count(&self, key: Key) -> usize {
    self
      .observers
      .get(&key)
      .map_or(0, |records| records.iter().filter(|r| r.is_alive()).count())
  }

  fn deliver(&self, record: ObserverRecord, change: Change) {
    self.delivery.dispatch(Box::new(move || record.deliver(&change)));
  }
}

#[derive(Clone, Debug)]
pub(crate) struct Broadcaster {
  context: SerialContext<Registry>,
  delivery: Delivery,
}

impl Broadcaster {
  pub(crate) fn new(label: String, delivery: Delivery) -> StoreResult<Self> {
    Ok(Self {
      context: SerialContext::new(label, Registry::new(delivery.clone()))?,
      delivery,
    })
  }

  pub(crate) fn add(&self, record: ObserverRecord, key: Key) {
    self.context.exec(move |registry| {
      let id = record.id();
      if registry.insert(key, record) {
        log::debug!("Replaced {id} on {key}");
      } else {
        log::debug!("Added {id} on {key}");
      }
    });
  }

  /// Register, then deliver `current` (if any) to this observer alone.
  ///
  /// Both happen in one job, so the replay is dispatched before any broadcast
  /// that follows the registration.
  pub(crate) fn add_with_replay(
    &self,
    record: ObserverRecord,
    key: Key,
    current: Option<KeyedValue>,
  ) {
    self.context.exec(move |registry| {
      log::debug!("Added {} on {key} (replay: {})", record.id(), current.is_some());
      registry.insert(key, record.clone());
      if let Some(value) = current {
        registry.deliver(record, Change::new(key, Some(value), None));
      }
    });
  }

  pub(crate) fn remove(&self, id: ObserverId, key: Key) {
    self.context.exec(move |registry| {
      if registry.remove(key, id) {
        log::debug!("Removed {id} from {key}");
      }
    });
  }

  pub(crate) fn remove_all_instances_of(&self, id: ObserverId) {
    self.context.exec(move |registry| {
      let removed = registry.remove_all_instances_of(id);
      log::debug!("Removed {id} from {removed} key(s)");
    });
  }

  pub(crate) fn remove_all_observers(&self) {
    self.context.exec(|registry| {
      registry.clear();
      log::debug!("Removed all observers");
    });
  }

  /// Notify every observer of `change.key`.
  pub(crate) fn broadcast(&self, change: Change) {
    self.context.exec(move |registry| {
      let records = registry.live_records(change.key);
      log::trace!("Broadcasting {} to {} observer(s)", change.key, records.len());
      for record in records {
        registry.deliver(record, change.clone());
      }
    });
  }

  pub(crate) fn observer_count(&self, key: Key) -> StoreResult<usize> {
    self.context.sync(move |registry| registry.count(key))
  }

  /// Wait for queued registry jobs, then for the deliveries they dispatched.
  pub(crate) fn flush(&self) -> StoreResult<()> {
    self.context.barrier()?;
    self.delivery.flush()
  }
}
