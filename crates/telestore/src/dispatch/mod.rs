/*!
Execution contexts.

- `serial.rs` - [`SerialContext`]: a worker thread that owns some state and
  runs submitted jobs strictly in submission order
- `delivery.rs` - [`Delivery`]: where observer callbacks are run
*/

mod delivery;
mod serial;

pub use delivery::{Delivery, DeliveryPool};
pub use serial::SerialContext;

pub(crate) use delivery::Task;
