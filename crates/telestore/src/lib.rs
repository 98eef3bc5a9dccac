/*!
Telestore - observable keyed store for ground-control telemetry.

Producers (the product-communication layer, or any caller) publish values
under a [`Key`]; consumers read the latest snapshot or register observers that
are called back on a delivery context whenever a key changes.

```ignore
use std::sync::Arc;
use telestore::{AircraftParameter, Key, KeyedValue, ObservableStore};

let store = ObservableStore::new()?;
let altitude = Key::from(AircraftParameter::Altitude);

// Observers are held weakly; keep the Arc alive for as long as updates matter.
let label = Arc::new(AltitudeLabel::default());
store.add(&label, altitude, true, |label, change| {
    label.render(change.new.as_ref());
});

store.set(KeyedValue::from(120_i64), altitude);
assert_eq!(store.available_value(altitude), Some(KeyedValue::Signed(120)));

// Or consume every change asynchronously
let mut changes = store.subscribe();
while let Ok(change) = changes.recv().await {
    // forward change
}
```
*/

mod core;
mod dispatch;

pub mod param;

mod types;
pub use types::*;

pub use crate::core::{ObservableStore, ObservableStoreBuilder};
pub use crate::dispatch::{Delivery, DeliveryPool, SerialContext};
pub use crate::param::{AircraftParameter, CameraParameter, Parameter, VideoParameter};
