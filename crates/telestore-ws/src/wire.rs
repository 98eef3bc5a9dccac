/*!
Wire representations of store values and events.

Objects only cross the wire when their payload is JSON-shaped: a
`serde_json::Value` or a `String`. Any other object is sent as
`{"type": "object", "value": null}`.
*/

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use telestore::{Change, Key, KeyedValue, ValueKind};
use ts_rs::TS;

/// A [`KeyedValue`] on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
#[ts(export)]
pub enum WireValue {
  Unsigned(u64),
  Signed(i64),
  /// JSON view of an object payload; `None` if it has none.
  Object(Option<JsonValue>),
}

impl WireValue {
  pub const fn kind(&self) -> ValueKind {
    match self {
      Self::Unsigned(_) => ValueKind::Unsigned,
      Self::Signed(_) => ValueKind::Signed,
      Self::Object(_) => ValueKind::Object,
    }
  }
}

impl From<&KeyedValue> for WireValue {
  fn from(value: &KeyedValue) -> Self {
    match value {
      KeyedValue::Unsigned(n) => Self::Unsigned(*n),
      KeyedValue::Signed(n) => Self::Signed(*n),
      KeyedValue::Object(_) => Self::Object(object_json(value)),
    }
  }
}

impl From<WireValue> for KeyedValue {
  /// JSON strings become `String` objects so local consumers can downcast
  /// them the same way as values published in-process.
  fn from(value: WireValue) -> Self {
    match value {
      WireValue::Unsigned(n) => Self::Unsigned(n),
      WireValue::Signed(n) => Self::Signed(n),
      WireValue::Object(Some(JsonValue::String(s))) => Self::object(s),
      WireValue::Object(json) => Self::object(json.unwrap_or(JsonValue::Null)),
    }
  }
}

fn object_json(value: &KeyedValue) -> Option<JsonValue> {
  if let Some(json) = value.downcast_ref::<JsonValue>() {
    return Some(json.clone());
  }
  value
    .downcast_ref::<String>()
    .map(|s| JsonValue::String(s.clone()))
}

/// One populated key in the initial sync.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct WireEntry {
  pub key: Key,
  pub value: WireValue,
}

impl From<&(Key, KeyedValue)> for WireEntry {
  fn from((key, value): &(Key, KeyedValue)) -> Self {
    Self {
      key: *key,
      value: value.into(),
    }
  }
}

/// A [`Change`] on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct WireChange {
  pub key: Key,
  pub new: Option<WireValue>,
  pub prior: Option<WireValue>,
}

impl From<&Change> for WireChange {
  fn from(change: &Change) -> Self {
    Self {
      key: change.key,
      new: change.new.as_ref().map(WireValue::from),
      prior: change.prior.as_ref().map(WireValue::from),
    }
  }
}

/// Events pushed to every connected client.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(tag = "event", content = "data")]
#[ts(export)]
pub enum ServerEvent {
  /// Every populated key, sent once on connection.
  #[serde(rename = "sync:init")]
  SyncInit(Vec<WireEntry>),

  #[serde(rename = "key:changed")]
  KeyChanged(WireChange),
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use telestore::Parameter;

  #[test]
  fn numbers_encode_with_type_tag() {
    let json = serde_json::to_value(WireValue::from(&KeyedValue::Unsigned(2))).unwrap();
    assert_eq!(json, json!({ "type": "unsigned", "value": 2 }));

    let json = serde_json::to_value(WireValue::from(&KeyedValue::Signed(-15))).unwrap();
    assert_eq!(json, json!({ "type": "signed", "value": -15 }));
  }

  #[test]
  fn string_objects_cross_the_wire() {
    let warning = KeyedValue::object(String::from("Strong wind"));
    assert_eq!(
      WireValue::from(&warning),
      WireValue::Object(Some(json!("Strong wind")))
    );

    let back = KeyedValue::from(WireValue::Object(Some(json!("Strong wind"))));
    assert_eq!(
      back.downcast_ref::<String>().map(String::as_str),
      Some("Strong wind")
    );
  }

  #[test]
  fn opaque_objects_encode_as_null() {
    let opaque = KeyedValue::object(vec![1_u8, 2, 3]);
    assert_eq!(WireValue::from(&opaque), WireValue::Object(None));
  }

  #[test]
  fn json_objects_keep_their_shape() {
    let location = json!({ "latitude": 59.33, "longitude": 18.06 });
    let value = KeyedValue::from(WireValue::Object(Some(location.clone())));
    assert_eq!(WireValue::from(&value), WireValue::Object(Some(location)));
  }

  #[test]
  fn change_event_shape() {
    let key = Key::new(Parameter::ExposureMode, 0);
    let change = Change::new(key, Some(KeyedValue::Unsigned(2)), None);
    let event = ServerEvent::KeyChanged(WireChange::from(&change));
    assert_eq!(
      serde_json::to_value(event).unwrap(),
      json!({
        "event": "key:changed",
        "data": {
          "key": { "parameter": "exposure_mode", "index": 0 },
          "new": { "type": "unsigned", "value": 2 },
          "prior": null
        }
      })
    );
  }

  #[test]
  fn wire_value_parses_from_client_json() {
    let value: WireValue = serde_json::from_value(json!({ "type": "signed", "value": 120 })).unwrap();
    assert_eq!(value, WireValue::Signed(120));
    assert_eq!(value.kind(), ValueKind::Signed);
  }
}
