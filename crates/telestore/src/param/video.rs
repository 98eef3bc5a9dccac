/*! Video-domain parameters. */

use super::Parameter;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Parameters describing the video pipeline of a camera.
///
/// `IsRecording` is shared with [`super::CameraParameter`]; both map to the
/// same flat tag and therefore observe the same store slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, Default)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum VideoParameter {
  IsRecording,
  Resolution,
  FrameRate,
  FileFormat,
  /// NTSC / PAL.
  Standard,
  /// Seconds recorded in the current clip.
  RecordingTime,
  #[default]
  Unknown,
}

impl From<VideoParameter> for Parameter {
  fn from(parameter: VideoParameter) -> Self {
    match parameter {
      VideoParameter::IsRecording => Self::IsRecording,
      VideoParameter::Resolution => Self::VideoResolution,
      VideoParameter::FrameRate => Self::VideoFrameRate,
      VideoParameter::FileFormat => Self::VideoFileFormat,
      VideoParameter::Standard => Self::VideoStandard,
      VideoParameter::RecordingTime => Self::RecordingTime,
      VideoParameter::Unknown => Self::Unknown,
    }
  }
}

impl From<Parameter> for VideoParameter {
  fn from(parameter: Parameter) -> Self {
    match parameter {
      Parameter::IsRecording => Self::IsRecording,
      Parameter::VideoResolution => Self::Resolution,
      Parameter::VideoFrameRate => Self::FrameRate,
      Parameter::VideoFileFormat => Self::FileFormat,
      Parameter::VideoStandard => Self::Standard,
      Parameter::RecordingTime => Self::RecordingTime,
      Parameter::IsShootingPhoto
      | Parameter::ExposureMode
      | Parameter::Iso
      | Parameter::ShutterSpeed
      | Parameter::Aperture
      | Parameter::ExposureCompensation
      | Parameter::WhiteBalance
      | Parameter::PhotoFileFormat
      | Parameter::StorageLocation
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
