/*! Store keys. */

use crate::param::{AircraftParameter, CameraParameter, Parameter, VideoParameter};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Address of one observable value slot: a parameter tag plus an index
/// (camera slot, battery slot, ...).
///
/// Equality and hashing are structural, so two keys built from the same pair
/// are interchangeable everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Key {
  parameter: Parameter,
  index: u32,
}

impl Key {
  /// Create a key for `parameter` at `index`.
  pub const fn new(parameter: Parameter, index: u32) -> Self {
    Self { parameter, index }
  }

  /// Create a key from any domain parameter at `index`.
  ///
  /// # Example
  ///
  /// ```
  /// use telestore::{CameraParameter, Key, Parameter};
  ///
  /// let key = Key::at(CameraParameter::ExposureMode, 1);
  /// assert_eq!(key, Key::new(Parameter::ExposureMode, 1));
  /// ```
  pub fn at(parameter: impl Into<Parameter>, index: u32) -> Self {
    Self::new(parameter.into(), index)
  }

  pub const fn parameter(&self) -> Parameter {
    self.parameter
  }

  pub const fn index(&self) -> u32 {
    self.index
  }
}

impl fmt::Display for Key {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}[{}]", self.parameter, self.index)
  }
}

impl From<Parameter> for Key {
  fn from(parameter: Parameter) -> Self {
    Self::new(parameter, 0)
  }
}

impl From<CameraParameter> for Key {
  fn from(parameter: CameraParameter) -> Self {
    Self::at(parameter, 0)
  }
}

impl From<VideoParameter> for Key {
  fn from(parameter: VideoParameter) -> Self {
    Self::at(parameter, 0)
  }
}

impl From<AircraftParameter> for Key {
  fn from(parameter: AircraftParameter) -> Self {
    Self::at(parameter, 0)
  }
}

impl From<(Parameter, u32)> for Key {
  fn from((parameter, index): (Parameter, u32)) -> Self {
    Self::new(parameter, index)
  }
}
