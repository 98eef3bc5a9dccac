/*!
Observer registration for `ObservableStore`.

Every call is sequenced through the flat store context before it reaches the
broadcaster, so registrations interleave with `set` exactly in call order.
*/

use super::broadcaster::ObserverRecord;
use super::ObservableStore;
use crate::types::{Change, Key, ObserverId, StoreResult};
use std::sync::Arc;

impl ObservableStore {
  /// Call `update` on the delivery context whenever `key` changes.
  ///
  /// The store holds `observer` weakly: once the last `Arc` is dropped the
  /// callback stops firing and the registration is pruned. Registering the
  /// same observer for the same key again replaces the earlier callback.
  ///
  /// With `broadcast_available_value`, the observer first receives the
  /// current value (as a change with no prior) if the key holds one; if it
  /// doesn't, nothing is replayed.
  pub fn add<O, F>(
    &self,
    observer: &Arc<O>,
    key: impl Into<Key>,
    broadcast_available_value: bool,
    update: F,
  ) where
    O: Send + Sync + 'static,
    F: Fn(&O, &Change) + Send + Sync + 'static,
  {
    let key = key.into();
    let record = ObserverRecord::new(observer, update);
    let broadcaster = self.broadcaster.clone();

    if broadcast_available_value {
      self.store.async_value(key, move |current| {
        broadcaster.add_with_replay(record, key, current);
      });
    } else {
      self.store.sequence(move || broadcaster.add(record, key));
    }
  }

  /// Stop delivering `key` to `observer`. No-op if it isn't registered.
  pub fn remove<O: ?Sized>(&self, observer: &Arc<O>, key: impl Into<Key>) {
    let id = ObserverId::of(observer);
    let key = key.into();
    let broadcaster = self.broadcaster.clone();
    self.store.sequence(move || broadcaster.remove(id, key));
  }

  /// Remove `observer` from every key it is registered under.
  pub fn remove_all_instances_of<O: ?Sized>(&self, observer: &Arc<O>) {
    let id = ObserverId::of(observer);
    let broadcaster = self.broadcaster.clone();
    self
      .store
      .sequence(move || broadcaster.remove_all_instances_of(id));
  }

  /// Drop every registration.
  pub fn remove_all_observers(&self) {
    let broadcaster = self.broadcaster.clone();
    self.store.sequence(move || broadcaster.remove_all_observers());
  }

  /// Live observers registered for `key`, after every earlier operation.
  pub fn observer_count(&self, key: impl Into<Key>) -> StoreResult<usize> {
    self.store.barrier()?;
    self.broadcaster.observer_count(key.into())
  }

  /// Is anyone observing `key`?
  pub fn is_observed(&self, key: impl Into<Key>) -> bool {
    self.observer_count(key).is_ok_and(|count| count > 0)
  }
}
