/*! Aircraft-domain parameters (flight controller, battery, GPS, settings). */

use super::Parameter;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Telemetry and settings published by the aircraft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, Default)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AircraftParameter {
  Altitude,
  HorizontalVelocity,
  VerticalVelocity,
  /// Pitch / roll / yaw.
  Attitude,
  Location,
  HomeLocation,
  BatteryPercent,
  SatelliteCount,
  GpsSignalLevel,
  FlightMode,
  /// Normal / sport / tripod.
  TravelMode,
  /// Beginner mode.
  NoviceMode,
  /// Metric / imperial display preference.
  UnitSystem,
  WarningMessage,
  #[default]
  Unknown,
}

impl From<AircraftParameter> for Parameter {
  fn from(parameter: AircraftParameter) -> Self {
    match parameter {
      AircraftParameter::Altitude => Self::Altitude,
      AircraftParameter::HorizontalVelocity => Self::HorizontalVelocity,
      AircraftParameter::VerticalVelocity => Self::VerticalVelocity,
      AircraftParameter::Attitude => Self::Attitude,
      AircraftParameter::Location => Self::Location,
      AircraftParameter::HomeLocation => Self::HomeLocation,
      AircraftParameter::BatteryPercent => Self::BatteryPercent,
      AircraftParameter::SatelliteCount => Self::SatelliteCount,
      AircraftParameter::GpsSignalLevel => Self::GpsSignalLevel,
      AircraftParameter::FlightMode => Self::FlightMode,
      AircraftParameter::TravelMode => Self::TravelMode,
      AircraftParameter::NoviceMode => Self::NoviceMode,
      AircraftParameter::UnitSystem => Self::UnitSystem,
      AircraftParameter::WarningMessage => Self::WarningMessage,
      AircraftParameter::Unknown => Self::Unknown,
    }
  }
}

impl From<Parameter> for AircraftParameter {
  fn from(parameter: Parameter) -> Self {
    match parameter {
      Parameter::Altitude => Self::Altitude,
      Parameter::HorizontalVelocity => Self::HorizontalVelocity,
      Parameter::VerticalVelocity => Self::VerticalVelocity,
      Parameter::Attitude => Self::Attitude,
      Parameter::Location => Self::Location,
      Parameter::HomeLocation => Self::HomeLocation,
      Parameter::BatteryPercent => Self::BatteryPercent,
      Parameter::SatelliteCount => Self::SatelliteCount,
      Parameter::GpsSignalLevel => Self::GpsSignalLevel,
      Parameter::FlightMode => Self::FlightMode,
      Parameter::TravelMode => Self::TravelMode,
      Parameter::NoviceMode => Self::NoviceMode,
      Parameter::UnitSystem => Self::UnitSystem,
      Parameter::WarningMessage => Self::WarningMessage,
      Parameter::IsShootingPhoto
      | Parameter::IsRecording
      | Parameter::ExposureMode
      | Parameter::Iso
      | Parameter::ShutterSpeed
      | Parameter::Aperture
      | Parameter::ExposureCompensation
      | Parameter::WhiteBalance
      | Parameter::PhotoFileFormat
      | Parameter::StorageLocation
      | Parameter::VideoResolution
      | Parameter::VideoFrameRate
      | Parameter::VideoFileFormat
      | Parameter::VideoStandard
      | Parameter::RecordingTime
      | Parameter::Unknown => Self::Unknown,
    }
  }
}
