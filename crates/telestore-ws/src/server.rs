/*!
WebSocket server implementation.
*/

use crate::wire::{ServerEvent, WireChange, WireEntry};
use axum::{
  extract::{
    ws::{Message, WebSocket, WebSocketUpgrade},
    State,
  },
  response::Response,
  routing::get,
  Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use telestore::ObservableStore;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};

/// Default WebSocket server port.
pub const DEFAULT_WS_PORT: u16 = 3031;
const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Handler for app-specific RPC methods.
pub type CustomRpcHandler = Arc<dyn Fn(&str, &Value) -> Option<Value> + Send + Sync>;

/// Shared state of the bridge: the store it exposes plus the fan-out
/// channel of serialized `key:changed` events.
#[derive(Clone)]
pub struct BridgeState {
  store: ObservableStore,
  json_sender: Arc<broadcast::Sender<String>>,
  custom_handler: Option<CustomRpcHandler>,
  port: u16,
}

impl std::fmt::Debug for BridgeState {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("BridgeState")
      .field("port", &self.port)
      .finish_non_exhaustive()
  }
}

impl BridgeState {
  /// Create with default port.
  pub fn new(store: ObservableStore) -> Self {
    Self::with_port(store, DEFAULT_WS_PORT)
  }

  /// Create with custom port.
  pub fn with_port(store: ObservableStore, port: u16) -> Self {
    let (json_tx, _) = broadcast::channel::<String>(DEFAULT_CHANNEL_CAPACITY);
    Self {
      store,
      json_sender: Arc::new(json_tx),
      custom_handler: None,
      port,
    }
  }

  /// Add a custom RPC handler, consulted before the built-in methods.
  #[must_use]
  pub fn with_custom_handler(mut self, handler: CustomRpcHandler) -> Self {
    self.custom_handler = Some(handler);
    self
  }

  /// Port the server binds on localhost.
  pub const fn port(&self) -> u16 {
    self.port
  }
}

/// Start the WebSocket server and serve until it fails.
///
/// Every change published through the store is pushed to all connected
/// clients as a `key:changed` event.
pub async fn start_server(state: BridgeState) -> std::io::Result<()> {
  let port = state.port;
  let sender = state.json_sender.clone();
  let mut rx = state.store.subscribe();
  tokio::spawn(async move {
    while let Ok(change) = rx.recv().await {
      let event = ServerEvent::KeyChanged(WireChange::from(&change));
      match serde_json::to_string(&event) {
        // No receivers just means no client is connected.
        Ok(json) => drop(sender.send(json)),
        Err(e) => log::warn!("[ws] Failed to serialize change to {}: {e}", change.key),
      }
    }
    log::debug!("[ws] Change feed closed");
  });

  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods(Any)
    .allow_headers(Any);

  let app = Router::new()
    .route("/ws", get(websocket_handler))
    .layer(cors)
    .with_state(state);

  let addr = format!("127.0.0.1:{port}");
  let listener = tokio::net::TcpListener::bind(&addr)
    .await
    .inspect_err(|e| log::error!("Failed to bind WebSocket server to {addr}: {e}"))?;

  log::info!("WebSocket server: ws://{addr}/ws");

  axum::serve(listener, app).await
}

async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<BridgeState>) -> Response {
  ws.on_upgrade(|socket| handle_websocket(socket, state))
}

async fn handle_websocket(mut socket: WebSocket, state: BridgeState) {
  // Subscribe before snapshotting so no change falls between the two.
  let mut rx = state.json_sender.subscribe();
  let store = state.store.clone();
  let init_result = tokio::task::spawn_blocking(move || store.entries()).await;

  let Ok(entries) = init_result else {
    return;
  };

  let event = ServerEvent::SyncInit(entries.iter().map(WireEntry::from).collect());
  if let Ok(msg) = serde_json::to_string(&event) {
    if socket.send(Message::Text(msg)).await.is_err() {
      return;
    }
  }

  loop {
    tokio::select! {
        msg = socket.recv() => {
            match msg {
                Some(Ok(Message::Text(text))) => {
                    let response = handle_request_async(&text, &state).await;
                    while let Ok(event_json) = rx.try_recv() {
                        drop(socket.send(Message::Text(event_json)).await);
                    }
                    drop(socket.send(Message::Text(response)).await);
                }
                Some(Ok(Message::Close(_))) => {
                    log::info!("[client] closed connection");
                    break;
                }
                Some(Err(e)) => {
                    log::warn!("WebSocket error: {e}");
                    break;
                }
                None => {
                    log::info!("[client] disconnected");
                    break;
                }
                _ => {}
            }
        }

        broadcast = rx.recv() => {
            match broadcast {
                Ok(event_json) => {
                    if socket.send(Message::Text(event_json)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    log::warn!("[ws] Client lagged, dropped {n} changes - client needs resync");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
  }
}

async fn handle_request_async(request: &str, state: &BridgeState) -> String {
  let parsed: Result<Value, _> = serde_json::from_str(request);

  let req = match parsed {
    Ok(v) => v,
    Err(e) => return json!({ "error": format!("Invalid JSON: {}", e) }).to_string(),
  };

  let id = req.get("id").cloned().unwrap_or(Value::Null);
  let method = req
    .get("method")
    .and_then(Value::as_str)
    .unwrap_or("")
    .to_string();
  let args = req.get("args").cloned().unwrap_or(Value::Null);

  if let Some(ref handler) = state.custom_handler {
    if let Some(mut response) = handler(&method, &args) {
      if let Some(obj) = response.as_object_mut() {
        obj.insert("id".to_string(), id);
      }
      return response.to_string();
    }
  }

  // `set` and `get` block on the store's serial context.
  let store = state.store.clone();
  let dispatch_result =
    tokio::task::spawn_blocking(move || crate::rpc::dispatch_json(&store, &method, &args)).await;

  let mut response = dispatch_result.unwrap_or_else(|_| json!({ "error": "RPC task panicked" }));
  if let Some(obj) = response.as_object_mut() {
    obj.insert("id".to_string(), id);
  }
  response.to_string()
}
