/*!
Flat store - the latest value of every key.

The map lives inside a [`SerialContext`]; every read and write is a job on
that context, so operations are totally ordered by enqueue time and a read
always observes every write enqueued before it.
*/

use crate::dispatch::SerialContext;
use crate::types::{Key, KeyedValue, StoreResult};
use std::collections::HashMap;

pub(crate) type Slots = HashMap<Key, KeyedValue>;

#[derive(Clone, Debug)]
pub(crate) struct FlatStore {
  context: SerialContext<Slots>,
}

impl FlatStore {
  pub(crate) fn new(label: String) -> StoreResult<Self> {
    Ok(Self {
      context: SerialContext::new(label, Slots::new())?,
    })
  }

  /// Enqueue a write. `None` clears the slot.
  ///
  /// The facade writes through [`FlatStore::swap`] so it can report the prior.
  #[cfg_attr(not(test), allow(dead_code))]
  pub(crate) fn update(&self, value: Option<KeyedValue>, key: Key) {
    self.context.exec(move |slots| {
      apply(slots, key, value);
    });
  }

  /// Blocking read of the latest value.
  pub(crate) fn available_value(&self, key: Key) -> StoreResult<Option<KeyedValue>> {
    self.context.sync(move |slots| slots.get(&key).cloned())
  }

  /// Read the latest value and hand it to `completion` on the store context.
  pub(crate) fn async_value(
    &self,
    key: Key,
    completion: impl FnOnce(Option<KeyedValue>) + Send + 'static,
  ) {
    self.context.exec(move |slots| completion(slots.get(&key).cloned()));
  }

  /// Write `value` and run `then` with the value it replaced, all in one job.
  ///
  /// Anything `then` enqueues elsewhere is enqueued in the same order as the
  /// writes themselves.
  pub(crate) fn swap(
    &self,
    value: Option<KeyedValue>,
    key: Key,
    then: impl FnOnce(Option<KeyedValue>) + Send + 'static,
  ) {
    self.context.exec(move |slots| {
      let prior = apply(slots, key, value);
      then(prior);
    });
  }

  /// Run `job` after every operation enqueued so far.
  pub(crate) fn sequence(&self, job: impl FnOnce() + Send + 'static) {
    self.context.exec(move |_| job());
  }

  pub(crate) fn entries(&self) -> StoreResult<Vec<(Key, KeyedValue)>> {
    self.context.sync(|slots| {
      let mut entries: Vec<_> = slots.iter().map(|(k, v)| (*k, v.clone())).collect();
      entries.sort_by_key(|(key, _)| *key);
      entries
    })
  }

  pub(crate) fn barrier(&self) -> StoreResult<()> {
    self.context.barrier()
  }
}

/// Write or clear one slot, returning what was there before.
fn apply(slots: &mut Slots, key: Key, value: Option<KeyedValue>) -> Option<KeyedValue> {
  match value {
    Some(value) => slots.insert(key, value),
    None => slots.remove(&key),
  }
}
