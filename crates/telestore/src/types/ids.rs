/*! Observer identity. */

use derive_more::Display;
use std::sync::Arc;

/// Reference identity of an observing object.
///
/// Two registrations share an identity iff they were made with the same
/// `Arc` allocation. The registry keeps a weak reference to that allocation,
/// so an identity cannot be reused by a new object while it is still registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("observer@{_0:#x}")]
pub struct ObserverId(usize);

impl ObserverId {
  /// Identity of the object behind `observer`.
  pub fn of<O: ?Sized>(observer: &Arc<O>) -> Self {
    Self(Arc::as_ptr(observer).cast::<()>() as usize)
  }
}
