/*! Change notifications. */

use super::{Key, KeyedValue};

/// One update of a key, as delivered to observers and the change feed.
///
/// `prior` is the value the store held immediately before this update was
/// applied; both sides are `None` when the slot was empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
  /// Key that was updated.
  pub key: Key,
  /// Value after the update. `None` means the slot was cleared.
  pub new: Option<KeyedValue>,
  /// Value the update replaced.
  pub prior: Option<KeyedValue>,
}

impl Change {
  /// Bundle an update.
  pub const fn new(key: Key, new: Option<KeyedValue>, prior: Option<KeyedValue>) -> Self {
    Self { key, new, prior }
  }

  /// Did this update clear the slot?
  pub const fn is_clear(&self) -> bool {
    self.new.is_none()
  }

  /// Was the slot empty before this update?
  pub const fn is_first(&self) -> bool {
    self.prior.is_none()
  }
}
