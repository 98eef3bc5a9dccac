/*!
RPC request/response types and dispatch.
*/

#![allow(missing_docs)]

use crate::wire::{WireEntry, WireValue};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use telestore::{Key, KeyedValue, ObservableStore, Parameter, StoreError};
use ts_rs::TS;

/// RPC request.
#[derive(Debug, Deserialize, TS)]
#[serde(tag = "method", content = "args", rename_all = "snake_case")]
#[ts(export)]
pub enum RpcRequest {
  /// Latest value of a key.
  Get {
    parameter: Parameter,
    #[serde(default)]
    index: u32,
  },
  /// Publish a value. `null` clears the key.
  Set {
    parameter: Parameter,
    #[serde(default)]
    index: u32,
    #[serde(default)]
    value: Option<WireValue>,
  },
  /// Every populated key.
  Keys,
  /// Every populated key with its value.
  Entries,
}

/// RPC response.
#[derive(Debug, Serialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum RpcResponse {
  /// Optional value.
  Value(Option<WireValue>),
  /// List of keys.
  Keys(Vec<Key>),
  /// List of key/value pairs.
  Entries(Vec<WireEntry>),
  /// No data.
  Null,
}

pub fn dispatch_json(store: &ObservableStore, method: &str, args: &JsonValue) -> JsonValue {
  let request_value = json!({ "method": method, "args": args });

  match serde_json::from_value::<RpcRequest>(request_value) {
    Ok(request) => match dispatch(store, request) {
      Ok(response) => json!({ "result": response }),
      Err(e) => {
        log::warn!("[rpc] {method} failed: {e}");
        json!({ "error": e })
      }
    },
    Err(e) => {
      log::warn!("[rpc] Invalid request for {method}: {e}");
      json!({ "error": format!("Invalid request: {}", e) })
    }
  }
}

pub fn dispatch(store: &ObservableStore, request: RpcRequest) -> Result<RpcResponse, String> {
  match request {
    RpcRequest::Get { parameter, index } => {
      let value = store.available_value(Key::new(parameter, index));
      Ok(RpcResponse::Value(value.as_ref().map(WireValue::from)))
    }

    RpcRequest::Set {
      parameter,
      index,
      value,
    } => {
      check_writable(parameter, value.as_ref()).map_err(|e| e.to_string())?;
      store.set(value.map(KeyedValue::from), Key::new(parameter, index));
      Ok(RpcResponse::Null)
    }

    RpcRequest::Keys => Ok(RpcResponse::Keys(store.keys())),

    RpcRequest::Entries => {
      let entries = store.entries().iter().map(WireEntry::from).collect();
      Ok(RpcResponse::Entries(entries))
    }
  }
}

/// Reject writes the store would accept but no consumer could interpret.
fn check_writable(parameter: Parameter, value: Option<&WireValue>) -> Result<(), StoreError> {
  let Some(expected) = parameter.value_kind() else {
    return Err(StoreError::UnknownParameter(parameter.to_string()));
  };
  match value {
    Some(value) if value.kind() != expected => Err(StoreError::TypeMismatch {
      expected,
      got: value.kind(),
    }),
    _ => Ok(()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use telestore::Delivery;

  fn store() -> ObservableStore {
    ObservableStore::builder()
      .label("rpc")
      .delivery(Delivery::Inline)
      .build()
      .unwrap()
  }

  #[test]
  fn set_then_get() {
    let store = store();
    let response = dispatch_json(
      &store,
      "set",
      &json!({ "parameter": "exposure_mode", "value": { "type": "unsigned", "value": 2 } }),
    );
    assert_eq!(response, json!({ "result": null }));

    let response = dispatch_json(&store, "get", &json!({ "parameter": "exposure_mode" }));
    assert_eq!(
      response,
      json!({ "result": { "type": "unsigned", "value": 2 } })
    );
  }

  #[test]
  fn get_missing_is_null() {
    let store = store();
    let response = dispatch_json(&store, "get", &json!({ "parameter": "altitude", "index": 3 }));
    assert_eq!(response, json!({ "result": null }));
  }

  #[test]
  fn set_null_clears() {
    let store = store();
    let altitude = Key::new(Parameter::Altitude, 0);
    store.set(KeyedValue::Signed(300), altitude);
    dispatch_json(&store, "set", &json!({ "parameter": "altitude", "value": null }));
    assert_eq!(store.available_value(altitude), None);
  }

  #[test]
  fn wrong_kind_is_rejected() {
    let store = store();
    let response = dispatch_json(
      &store,
      "set",
      &json!({ "parameter": "altitude", "value": { "type": "unsigned", "value": 2 } }),
    );
    assert_eq!(
      response,
      json!({ "error": "Type mismatch: expected signed, got unsigned" })
    );
    assert!(store.keys().is_empty());
  }

  #[test]
  fn unknown_parameter_cannot_be_written() {
    let store = store();
    let result = dispatch(
      &store,
      RpcRequest::Set {
        parameter: Parameter::Unknown,
        index: 0,
        value: Some(WireValue::Unsigned(1)),
      },
    );
    assert_eq!(result.unwrap_err(), "Unknown parameter: unknown");
  }

  #[test]
  fn keys_and_entries_list_populated_slots() {
    let store = store();
    store.set(KeyedValue::Unsigned(1), Key::new(Parameter::Iso, 1));
    store.set(KeyedValue::Unsigned(2), Key::new(Parameter::Iso, 0));

    let keys = dispatch_json(&store, "keys", &JsonValue::Null);
    assert_eq!(
      keys,
      json!({ "result": [
        { "parameter": "iso", "index": 0 },
        { "parameter": "iso", "index": 1 }
      ] })
    );

    let entries = dispatch_json(&store, "entries", &JsonValue::Null);
    assert_eq!(
      entries["result"][0]["value"],
      json!({ "type": "unsigned", "value": 2 })
    );
  }

  #[test]
  fn unknown_method_is_invalid_request() {
    let store = store();
    let response = dispatch_json(&store, "arm_motors", &JsonValue::Null);
    let error = response["error"].as_str().unwrap();
    assert!(error.starts_with("Invalid request"));
  }
}
