/*!
Keyed values.

A [`KeyedValue`] is the payload stored at a [`super::Key`]: an opaque shared
object, an unsigned integer, or a signed integer. Values are immutable and
replaced wholesale on update.
*/

use super::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use ts_rs::TS;

/// Payload kind of a [`KeyedValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ValueKind {
  /// Opaque shared object (location, attitude, warning message, ...).
  Object,
  /// Unsigned integer (flags, enumerated settings, counts).
  Unsigned,
  /// Signed integer (altitude, velocities, exposure offset).
  Signed,
}

impl fmt::Display for ValueKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Object => "object",
      Self::Unsigned => "unsigned",
      Self::Signed => "signed",
    })
  }
}

/// Value stored at a key.
///
/// Objects compare by identity (same allocation), integers by value.
#[derive(Clone)]
pub enum KeyedValue {
  /// Shared object. Extract with [`KeyedValue::downcast_ref`].
  Object(Arc<dyn Any + Send + Sync>),
  Unsigned(u64),
  Signed(i64),
}

impl KeyedValue {
  /// Wrap any shareable value as an object payload.
  pub fn object<T: Any + Send + Sync>(value: T) -> Self {
    Self::Object(Arc::new(value))
  }

  pub const fn kind(&self) -> ValueKind {
    match self {
      Self::Object(_) => ValueKind::Object,
      Self::Unsigned(_) => ValueKind::Unsigned,
      Self::Signed(_) => ValueKind::Signed,
    }
  }

  pub const fn as_unsigned(&self) -> Option<u64> {
    match self {
      Self::Unsigned(n) => Some(*n),
      Self::Object(_) | Self::Signed(_) => None,
    }
  }

  pub const fn as_signed(&self) -> Option<i64> {
    match self {
      Self::Signed(n) => Some(*n),
      Self::Object(_) | Self::Unsigned(_) => None,
    }
  }

  /// Flag view of an unsigned payload: any non-zero value is `true`.
  pub const fn as_flag(&self) -> Option<bool> {
    match self {
      Self::Unsigned(n) => Some(*n != 0),
      Self::Object(_) | Self::Signed(_) => None,
    }
  }

  pub const fn as_object(&self) -> Option<&Arc<dyn Any + Send + Sync>> {
    match self {
      Self::Object(object) => Some(object),
      Self::Unsigned(_) | Self::Signed(_) => None,
    }
  }

  /// Borrow the object payload as `T`, if this is an object of that type.
  ///
  /// # Example
  ///
  /// ```
  /// use telestore::KeyedValue;
  ///
  /// let warning = KeyedValue::object(String::from("Low battery"));
  /// assert_eq!(warning.downcast_ref::<String>().map(String::as_str), Some("Low battery"));
  /// assert_eq!(warning.downcast_ref::<u32>(), None);
  /// ```
  pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
    self.as_object()?.downcast_ref::<T>()
  }

  pub const fn is_object(&self) -> bool {
    matches!(self, Self::Object(_))
  }

  pub const fn is_unsigned(&self) -> bool {
    matches!(self, Self::Unsigned(_))
  }

  pub const fn is_signed(&self) -> bool {
    matches!(self, Self::Signed(_))
  }
}

impl fmt::Debug for KeyedValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Object(object) => f
        .debug_tuple("Object")
        .field(&Arc::as_ptr(object).cast::<()>())
        .finish(),
      Self::Unsigned(n) => f.debug_tuple("Unsigned").field(n).finish(),
      Self::Signed(n) => f.debug_tuple("Signed").field(n).finish(),
    }
  }
}

impl PartialEq for KeyedValue {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
      (Self::Unsigned(a), Self::Unsigned(b)) => a == b,
      (Self::Signed(a), Self::Signed(b)) => a == b,
      (Self::Object(_) | Self::Unsigned(_) | Self::Signed(_), _) => false,
    }
  }
}

impl From<u64> for KeyedValue {
  fn from(n: u64) -> Self {
    Self::Unsigned(n)
  }
}

impl From<u32> for KeyedValue {
  fn from(n: u32) -> Self {
    Self::Unsigned(u64::from(n))
  }
}

impl From<u8> for KeyedValue {
  fn from(n: u8) -> Self {
    Self::Unsigned(u64::from(n))
  }
}

impl From<bool> for KeyedValue {
  fn from(flag: bool) -> Self {
    Self::Unsigned(u64::from(flag))
  }
}

impl From<i64> for KeyedValue {
  fn from(n: i64) -> Self {
    Self::Signed(n)
  }
}

impl From<i32> for KeyedValue {
  fn from(n: i32) -> Self {
    Self::Signed(i64::from(n))
  }
}

impl From<Arc<dyn Any + Send + Sync>> for KeyedValue {
  fn from(object: Arc<dyn Any + Send + Sync>) -> Self {
    Self::Object(object)
  }
}

impl TryFrom<&KeyedValue> for u64 {
  type Error = StoreError;

  fn try_from(value: &KeyedValue) -> StoreResult<Self> {
    value.as_unsigned().ok_or(StoreError::TypeMismatch {
      expected: ValueKind::Unsigned,
      got: value.kind(),
    })
  }
}

impl TryFrom<&KeyedValue> for i64 {
  type Error = StoreError;

  fn try_from(value: &KeyedValue) -> StoreResult<Self> {
    value.as_signed().ok_or(StoreError::TypeMismatch {
      expected: ValueKind::Signed,
      got: value.kind(),
    })
  }
}

impl TryFrom<&KeyedValue> for bool {
  type Error = StoreError;

  fn try_from(value: &KeyedValue) -> StoreResult<Self> {
    value.as_flag().ok_or(StoreError::TypeMismatch {
      expected: ValueKind::Unsigned,
      got: value.kind(),
    })
  }
}
