/*! Camera-domain parameters. */

use super::Parameter;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Parameters published by a camera component.
///
/// Converts losslessly into [`Parameter`]. Converting back yields
/// [`CameraParameter::Unknown`] for tags outside the camera domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, Default)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CameraParameter {
  /// Shutter status: a photo is being taken.
  IsShootingPhoto,
  /// Video recording in progress.
  IsRecording,
  /// Program / shutter priority / aperture priority / manual.
  ExposureMode,
  Iso,
  ShutterSpeed,
  Aperture,
  /// Exposure value offset, in thirds of a stop.
  ExposureCompensation,
  WhiteBalance,
  PhotoFileFormat,
  /// Internal storage vs. SD card.
  StorageLocation,
  #[default]
  Unknown,
}

impl From<CameraParameter> for Parameter {
  fn from(parameter: CameraParameter) -> Self {
    match parameter {
      CameraParameter::IsShootingPhoto => Self::IsShootingPhoto,
      CameraParameter::IsRecording => Self::IsRecording,
      CameraParameter::ExposureMode => Self::ExposureMode,
      CameraParameter::Iso => Self::Iso,
      CameraParameter::ShutterSpeed => Self::ShutterSpeed,
      CameraParameter::Aperture => Self::Aperture,
      CameraParameter::ExposureCompensation => Self::ExposureCompensation,
      CameraParameter::WhiteBalance => Self::WhiteBalance,
      CameraParameter::PhotoFileFormat => Self::PhotoFileFormat,
      CameraParameter::StorageLocation => Self::StorageLocation,
      CameraParameter::Unknown => Self::Unknown,
    }
  }
}

impl From<Parameter> for CameraParameter {
  fn from(parameter: Parameter) -> Self {
    match parameter {
      Parameter::IsShootingPhoto => Self::IsShootingPhoto,
      Parameter::IsRecording => Self::IsRecording,
      Parameter::ExposureMode => Self::ExposureMode,
      Parameter::Iso => Self::Iso,
      Parameter::ShutterSpeed => Self::ShutterSpeed,
      Parameter::Aperture => Self::Aperture,
      Parameter::ExposureCompensation => Self::ExposureCompensation,
      Parameter::WhiteBalance => Self::WhiteBalance,
      Parameter::PhotoFileFormat => Self::PhotoFileFormat,
      Parameter::StorageLocation => Self::StorageLocation,
      Parameter::VideoResolution
      | Parameter::VideoFrameRate
      | Parameter::VideoFileFormat
      | Parameter::VideoStandard
      | Parameter::RecordingTime
      | Parameter::Altitude
      | Parameter::HorizontalVelocity
      | Parameter::VerticalVelocity
      | Parameter::Attitude
      | Parameter::Location
      | Parameter::HomeLocation
      | Parameter::BatteryPercent
      | Parameter::SatelliteCount
      | Parameter::GpsSignalLevel
      | Parameter::FlightMode
      | Parameter::TravelMode
      | Parameter::NoviceMode
      | Parameter::UnitSystem
      | Parameter::WarningMessage
      | Parameter::Unknown => Self::Unknown,
    }
  }
}
