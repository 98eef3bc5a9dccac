/*!
Parameter tags.

Every value slot in the store is addressed by a [`Parameter`] plus an index.
Producer code usually speaks in terms of a small per-domain enumeration
([`CameraParameter`], [`VideoParameter`], [`AircraftParameter`]); those convert
into the single flat tag space defined here, and back out again where the tag
belongs to that domain.

Anything that has no flat counterpart maps to [`Parameter::Unknown`].
*/

#![allow(missing_docs)]

mod aircraft;
mod camera;
mod video;

pub use aircraft::AircraftParameter;
pub use camera::CameraParameter;
pub use video::VideoParameter;

use crate::types::{StoreError, ValueKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

/// Flat tag identifying what a stored value represents.
///
/// The serde name (snake_case) is stable and doubles as the wire name used by
/// bridges; see [`Parameter::name`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS, Default,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Parameter {
  // === Camera ===
  /// Shutter status flag: a photo is being taken.
  IsShootingPhoto,
  /// Recording flag, shared by the camera and video domains.
  IsRecording,
  ExposureMode,
  Iso,
  ShutterSpeed,
  Aperture,
  ExposureCompensation,
  WhiteBalance,
  PhotoFileFormat,
  StorageLocation,

  // === Video ===
  VideoResolution,
  VideoFrameRate,
  VideoFileFormat,
  VideoStandard,
  /// Seconds recorded in the current clip.
  RecordingTime,

  // === Aircraft / flight controller ===
  /// Height above the takeoff point, in centimeters.
  Altitude,
  /// Ground speed, in centimeters per second.
  HorizontalVelocity,
  /// Climb rate (positive up), in centimeters per second.
  VerticalVelocity,
  Attitude,
  Location,
  HomeLocation,
  BatteryPercent,
  SatelliteCount,
  GpsSignalLevel,
  FlightMode,
  TravelMode,
  /// Beginner mode flag (limited range, altitude and speed).
  NoviceMode,
  UnitSystem,
  /// Current aircraft warning message.
  WarningMessage,

  /// Tag didn't map to anything known.
  #[default]
  Unknown,
}

impl Parameter {
  /// Every tag, in declaration order.
  pub const ALL: [Self; 30] = [
    Self::IsShootingPhoto,
    Self::IsRecording,
    Self::ExposureMode,
    Self::Iso,
    Self::ShutterSpeed,
    Self::Aperture,
    Self::ExposureCompensation,
    Self::WhiteBalance,
    Self::PhotoFileFormat,
    Self::StorageLocation,
    Self::VideoResolution,
    Self::VideoFrameRate,
    Self::VideoFileFormat,
    Self::VideoStandard,
    Self::RecordingTime,
    Self::Altitude,
    Self::HorizontalVelocity,
    Self::VerticalVelocity,
    Self::Attitude,
    Self::Location,
    Self::HomeLocation,
    Self::BatteryPercent,
    Self::SatelliteCount,
    Self::GpsSignalLevel,
    Self::FlightMode,
    Self::TravelMode,
    Self::NoviceMode,
    Self::UnitSystem,
    Self::WarningMessage,
    Self::Unknown,
  ];

  /// Stable snake_case name, identical to the serde representation.
  pub const fn name(&self) -> &'static str {
    match self {
      Self::IsShootingPhoto => "is_shooting_photo",
      Self::IsRecording => "is_recording",
      Self::ExposureMode => "exposure_mode",
      Self::Iso => "iso",
      Self::ShutterSpeed => "shutter_speed",
      Self::Aperture => "aperture",
      Self::ExposureCompensation => "exposure_compensation",
      Self::WhiteBalance => "white_balance",
      Self::PhotoFileFormat => "photo_file_format",
      Self::StorageLocation => "storage_location",
      Self::VideoResolution => "video_resolution",
      Self::VideoFrameRate => "video_frame_rate",
      Self::VideoFileFormat => "video_file_format",
      Self::VideoStandard => "video_standard",
      Self::RecordingTime => "recording_time",
      Self::Altitude => "altitude",
      Self::HorizontalVelocity => "horizontal_velocity",
      Self::VerticalVelocity => "vertical_velocity",
      Self::Attitude => "attitude",
      Self::Location => "location",
      Self::HomeLocation => "home_location",
      Self::BatteryPercent => "battery_percent",
      Self::SatelliteCount => "satellite_count",
      Self::GpsSignalLevel => "gps_signal_level",
      Self::FlightMode => "flight_mode",
      Self::TravelMode => "travel_mode",
      Self::NoviceMode => "novice_mode",
      Self::UnitSystem => "unit_system",
      Self::WarningMessage => "warning_message",
      Self::Unknown => "unknown",
    }
  }

  /// Payload kind producers publish for this tag.
  ///
  /// The store itself never enforces this; bridges use it to reject
  /// obviously wrong writes.
  ///
  /// # Example
  ///
  /// ```
  /// use telestore::{Parameter, ValueKind};
  ///
  /// assert_eq!(Parameter::ExposureMode.value_kind(), Some(ValueKind::Unsigned));
  /// assert_eq!(Parameter::Altitude.value_kind(), Some(ValueKind::Signed));
  /// assert_eq!(Parameter::Location.value_kind(), Some(ValueKind::Object));
  /// assert_eq!(Parameter::Unknown.value_kind(), None);
  /// ```
  pub const fn value_kind(&self) -> Option<ValueKind> {
    match self {
      Self::ExposureCompensation
      | Self::Altitude
      | Self::HorizontalVelocity
      | Self::VerticalVelocity => Some(ValueKind::Signed),
      Self::Attitude | Self::Location | Self::HomeLocation | Self::WarningMessage => {
        Some(ValueKind::Object)
      }
      Self::IsShootingPhoto
      | Self::IsRecording
      | Self::ExposureMode
      | Self::Iso
      | Self::ShutterSpeed
      | Self::Aperture
      | Self::WhiteBalance
      | Self::PhotoFileFormat
      | Self::StorageLocation
      | Self::VideoResolution
      | Self::VideoFrameRate
      | Self::VideoFileFormat
      | Self::VideoStandard
      | Self::RecordingTime
      | Self::BatteryPercent
      | Self::SatelliteCount
      | Self::GpsSignalLevel
      | Self::FlightMode
      | Self::TravelMode
      | Self::NoviceMode
      | Self::UnitSystem => Some(ValueKind::Unsigned),
      Self::Unknown => None,
    }
  }

  /// Is this a boolean flag (published as unsigned 0/1)?
  pub const fn is_flag(&self) -> bool {
    matches!(
      self,
      Self::IsShootingPhoto | Self::IsRecording | Self::NoviceMode
    )
  }

  pub const fn is_unknown(&self) -> bool {
    matches!(self, Self::Unknown)
  }
}

impl fmt::Display for Parameter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for Parameter {
  type Err = StoreError;

  /// Parse a wire name. Unrecognized names are an error rather than
  /// [`Parameter::Unknown`], so typos don't silently alias one slot.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .iter()
      .copied()
      .find(|p| p.name() == s)
      .ok_or_else(|| StoreError::UnknownParameter(s.to_owned()))
  }
}
