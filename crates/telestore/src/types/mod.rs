/*! Core types for the keyed store. */

mod change;
mod error;
mod ids;
mod key;
mod value;

pub use change::Change;
pub use error::{StoreError, StoreResult};
pub use ids::ObserverId;
pub use key::Key;
pub use value::{KeyedValue, ValueKind};
