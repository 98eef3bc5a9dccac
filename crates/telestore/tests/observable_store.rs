//! Facade behavior: reads, writes, observer delivery and removal.

use parking_lot::Mutex;
use std::sync::Arc;
use telestore::{
  AircraftParameter, CameraParameter, Change, Delivery, Key, KeyedValue, ObservableStore,
  Parameter,
};

const EXPOSURE: Key = Key::new(Parameter::ExposureMode, 0);
const ALTITUDE: Key = Key::new(Parameter::Altitude, 0);

/// Stand-in for a widget: records every change it is handed.
#[derive(Default)]
struct Widget {
  changes: Mutex<Vec<Change>>,
}

impl Widget {
  fn observe(store: &ObservableStore, widget: &Arc<Self>, key: Key, replay: bool) {
    store.add(widget, key, replay, |widget: &Self, change| {
      widget.changes.lock().push(change.clone());
    });
  }

  fn take(&self) -> Vec<Change> {
    std::mem::take(&mut *self.changes.lock())
  }
}

fn store() -> ObservableStore {
  ObservableStore::builder()
    .label("test")
    .delivery(Delivery::serial("test.ui").unwrap())
    .build()
    .unwrap()
}

fn unsigned(n: u64) -> Option<KeyedValue> {
  Some(KeyedValue::Unsigned(n))
}

#[test]
fn read_your_write() {
  let store = store();
  store.set(KeyedValue::from(2_u64), EXPOSURE);
  assert_eq!(store.available_value(EXPOSURE), unsigned(2));
}

#[test]
fn never_set_is_none() {
  let store = store();
  assert_eq!(store.available_value(ALTITUDE), None);
}

#[test]
fn clear_reads_none() {
  let store = store();
  store.set(KeyedValue::from(1200_i64), ALTITUDE);
  store.set(None, ALTITUDE);
  assert_eq!(store.available_value(ALTITUDE), None);
  assert!(store.keys().is_empty());
}

#[test]
fn observer_receives_value_and_prior() {
  let store = store();
  let widget = Arc::new(Widget::default());
  store.set(KeyedValue::from(1_u64), EXPOSURE);
  Widget::observe(&store, &widget, EXPOSURE, false);

  let before = store.available_value(EXPOSURE);
  store.set(KeyedValue::from(3_u64), EXPOSURE);
  store.flush().unwrap();

  assert_eq!(
    widget.take(),
    vec![Change::new(EXPOSURE, unsigned(3), before)]
  );
}

#[test]
fn clearing_is_broadcast() {
  let store = store();
  let widget = Arc::new(Widget::default());
  Widget::observe(&store, &widget, EXPOSURE, false);
  store.set(KeyedValue::from(1_u64), EXPOSURE);
  store.set(None, EXPOSURE);
  store.flush().unwrap();

  let changes = widget.take();
  assert_eq!(changes.len(), 2);
  assert!(changes[1].is_clear());
  assert_eq!(changes[1].prior, unsigned(1));
}

#[test]
fn removal_stops_delivery() {
  let store = store();
  let widget = Arc::new(Widget::default());
  Widget::observe(&store, &widget, EXPOSURE, false);
  store.set(KeyedValue::from(1_u64), EXPOSURE);
  store.remove(&widget, EXPOSURE);
  store.set(KeyedValue::from(2_u64), EXPOSURE);
  store.flush().unwrap();

  assert_eq!(
    widget.take(),
    vec![Change::new(EXPOSURE, unsigned(1), None)]
  );
  assert!(!store.is_observed(EXPOSURE));
}

#[test]
fn bulk_removal_covers_every_key() {
  let store = store();
  let widget = Arc::new(Widget::default());
  Widget::observe(&store, &widget, EXPOSURE, false);
  Widget::observe(&store, &widget, ALTITUDE, false);
  store.remove_all_instances_of(&widget);

  store.set(KeyedValue::from(2_u64), EXPOSURE);
  store.set(KeyedValue::from(500_i64), ALTITUDE);
  store.flush().unwrap();

  assert!(widget.take().is_empty());
}

#[test]
fn remove_all_observers_silences_everyone() {
  let store = store();
  let a = Arc::new(Widget::default());
  let b = Arc::new(Widget::default());
  Widget::observe(&store, &a, EXPOSURE, false);
  Widget::observe(&store, &b, ALTITUDE, false);
  store.remove_all_observers();

  store.set(KeyedValue::from(2_u64), EXPOSURE);
  store.set(KeyedValue::from(10_i64), ALTITUDE);
  store.flush().unwrap();

  assert!(a.take().is_empty());
  assert!(b.take().is_empty());
}

#[test]
fn equal_keys_are_interchangeable() {
  let store = store();
  store.set(KeyedValue::from(true), Key::at(CameraParameter::IsRecording, 0));
  assert_eq!(
    store.available_value(Key::new(Parameter::IsRecording, 0)),
    unsigned(1)
  );
  assert_eq!(
    store.available_value(telestore::VideoParameter::IsRecording),
    unsigned(1)
  );
}

#[test]
fn replay_flag_without_value_then_first_set() {
  let store = store();
  let widget = Arc::new(Widget::default());
  Widget::observe(&store, &widget, EXPOSURE, true);
  store.flush().unwrap();
  assert!(widget.take().is_empty(), "nothing to replay yet");

  store.set(KeyedValue::from(2_u64), EXPOSURE);
  store.flush().unwrap();
  assert_eq!(
    widget.take(),
    vec![Change::new(EXPOSURE, unsigned(2), None)]
  );
}

#[test]
fn replay_flag_with_value_delivers_it_once() {
  let store = store();
  let widget = Arc::new(Widget::default());
  store.set(KeyedValue::from(4_u64), EXPOSURE);
  Widget::observe(&store, &widget, EXPOSURE, true);
  store.set(KeyedValue::from(5_u64), EXPOSURE);
  store.flush().unwrap();

  assert_eq!(
    widget.take(),
    vec![
      Change::new(EXPOSURE, unsigned(4), None),
      Change::new(EXPOSURE, unsigned(5), unsigned(4)),
    ]
  );
}

#[test]
fn reregistration_replaces_callback() {
  let store = store();
  let widget = Arc::new(Widget::default());
  let first = Arc::new(Mutex::new(0_u32));
  let counter = Arc::clone(&first);
  store.add(&widget, EXPOSURE, false, move |_: &Widget, _| {
    *counter.lock() += 1;
  });
  Widget::observe(&store, &widget, EXPOSURE, false);

  store.set(KeyedValue::from(1_u64), EXPOSURE);
  store.flush().unwrap();

  assert_eq!(*first.lock(), 0, "replaced callback must not fire");
  assert_eq!(widget.take().len(), 1);
  assert_eq!(store.observer_count(EXPOSURE).unwrap(), 1);
}

#[test]
fn dropped_observer_receives_nothing() {
  let store = store();
  let seen = Arc::new(Mutex::new(0_u32));
  let widget = Arc::new(Widget::default());
  let counter = Arc::clone(&seen);
  store.add(&widget, EXPOSURE, false, move |_: &Widget, _| {
    *counter.lock() += 1;
  });
  drop(widget);

  store.set(KeyedValue::from(1_u64), EXPOSURE);
  store.flush().unwrap();

  assert_eq!(*seen.lock(), 0);
  assert_eq!(store.observer_count(EXPOSURE).unwrap(), 0);
}

#[test]
fn rapid_sets_keep_order_and_causal_priors() {
  let store = store();
  let widget = Arc::new(Widget::default());
  Widget::observe(&store, &widget, ALTITUDE, false);

  for n in 0..200_i64 {
    store.set(KeyedValue::from(n), ALTITUDE);
  }
  store.flush().unwrap();

  let changes = widget.take();
  assert_eq!(changes.len(), 200);
  for (n, change) in (0_i64..).zip(&changes) {
    assert_eq!(change.new, Some(KeyedValue::Signed(n)));
    let expected_prior = (n > 0).then(|| KeyedValue::Signed(n - 1));
    assert_eq!(change.prior, expected_prior);
  }
}

#[test]
fn concurrent_producers_pair_every_prior() {
  let store = store();
  let widget = Arc::new(Widget::default());
  Widget::observe(&store, &widget, ALTITUDE, false);

  let producers: Vec<_> = (0..4_i64)
    .map(|p| {
      let store = store.clone();
      std::thread::spawn(move || {
        for n in 0..50 {
          store.set(KeyedValue::from(p * 1000 + n), ALTITUDE);
        }
      })
    })
    .collect();
  for producer in producers {
    producer.join().unwrap();
  }
  store.flush().unwrap();

  // Each change's prior must be the previous change's new value.
  let changes = widget.take();
  assert_eq!(changes.len(), 200);
  let mut last = None;
  for change in &changes {
    assert_eq!(change.prior, last);
    last = change.new.clone();
  }
  assert_eq!(store.available_value(ALTITUDE), last);
}

#[test]
fn object_payloads_flow_through() {
  #[derive(Debug, PartialEq)]
  struct Location {
    latitude: f64,
    longitude: f64,
  }

  let store = store();
  let home = Key::from(AircraftParameter::HomeLocation);
  store.set(
    KeyedValue::object(Location {
      latitude: 59.33,
      longitude: 18.06,
    }),
    home,
  );
  let value = store.available_value(home).unwrap();
  let location = value.downcast_ref::<Location>().unwrap();
  assert_eq!(
    location,
    &Location {
      latitude: 59.33,
      longitude: 18.06
    }
  );
}

#[test]
fn change_feed_sees_every_set() {
  let store = store();
  let mut feed = store.subscribe();
  store.set(KeyedValue::from(1_u64), EXPOSURE);
  store.set(None, EXPOSURE);
  store.flush().unwrap();

  let first = feed.try_recv().unwrap();
  assert_eq!(first, Change::new(EXPOSURE, unsigned(1), None));
  let second = feed.try_recv().unwrap();
  assert!(second.is_clear());
  assert!(feed.try_recv().is_err());
}

#[test]
fn full_change_feed_drops_oldest() {
  let store = ObservableStore::builder()
    .label("test.feed")
    .delivery(Delivery::Inline)
    .change_feed_capacity(1)
    .build()
    .unwrap();
  let mut feed = store.subscribe();
  store.set(KeyedValue::from(1_u64), EXPOSURE);
  store.set(KeyedValue::from(2_u64), EXPOSURE);
  store.flush().unwrap();

  assert!(matches!(
    feed.try_recv(),
    Err(async_broadcast::TryRecvError::Overflowed(1))
  ));
  assert_eq!(
    feed.try_recv().unwrap(),
    Change::new(EXPOSURE, unsigned(2), unsigned(1))
  );
  assert!(feed.try_recv().is_err());
}

#[test]
fn value_async_runs_after_earlier_writes() {
  let store = store();
  let (tx, rx) = std::sync::mpsc::channel();
  store.set(KeyedValue::from(9_u64), EXPOSURE);
  store.value_async(EXPOSURE, move |value| tx.send(value).unwrap());
  assert_eq!(
    rx.recv_timeout(std::time::Duration::from_secs(1)).unwrap(),
    unsigned(9)
  );
}

#[test]
fn inline_delivery_runs_on_broadcast_context() {
  let store = ObservableStore::builder()
    .label("inline")
    .delivery(Delivery::Inline)
    .build()
    .unwrap();
  let widget = Arc::new(Widget::default());
  let thread_name = Arc::new(Mutex::new(None));
  let name = Arc::clone(&thread_name);
  store.add(&widget, EXPOSURE, false, move |_: &Widget, _| {
    *name.lock() = std::thread::current().name().map(str::to_owned);
  });

  store.set(KeyedValue::from(1_u64), EXPOSURE);
  store.flush().unwrap();

  assert_eq!(thread_name.lock().as_deref(), Some("inline.broadcast"));
}

#[test]
fn pool_delivery_reaches_all_observers() {
  let store = ObservableStore::builder()
    .label("pool")
    .delivery(Delivery::pool(2).unwrap())
    .build()
    .unwrap();
  let widgets: Vec<_> = (0..8).map(|_| Arc::new(Widget::default())).collect();
  for widget in &widgets {
    Widget::observe(&store, widget, EXPOSURE, false);
  }

  store.set(KeyedValue::from(2_u64), EXPOSURE);
  store.flush().unwrap();

  for widget in &widgets {
    assert_eq!(widget.take().len(), 1);
  }
}

#[test]
fn default_store_delivers_on_main_context() {
  let store = ObservableStore::new().unwrap();
  let widget = Arc::new(Widget::default());
  Widget::observe(&store, &widget, EXPOSURE, false);
  store.set(KeyedValue::from(1_u64), EXPOSURE);
  store.flush().unwrap();
  assert_eq!(widget.take().len(), 1);
}

#[test]
fn shared_store_is_a_singleton() {
  let a = ObservableStore::shared();
  let b = ObservableStore::shared();
  let key = Key::new(Parameter::UnitSystem, 7);
  a.set(KeyedValue::from(1_u64), key);
  assert_eq!(b.available_value(key), unsigned(1));
}
