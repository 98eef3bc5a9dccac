/*!
Standalone bridge: serves the process-wide store over WebSocket.

`TELESTORE_PORT` overrides the listening port; `RUST_LOG` the log filter
(default `info`).
*/

use telestore::ObservableStore;
use telestore_ws::{start_server, BridgeState, DEFAULT_WS_PORT};

fn port_from_env() -> u16 {
  match std::env::var("TELESTORE_PORT") {
    Ok(raw) => raw.parse().unwrap_or_else(|e| {
      log::warn!("Ignoring TELESTORE_PORT={raw:?} ({e}), using {DEFAULT_WS_PORT}");
      DEFAULT_WS_PORT
    }),
    Err(_) => DEFAULT_WS_PORT,
  }
}

#[tokio::main]
async fn main() {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

  let state = BridgeState::with_port(ObservableStore::shared().clone(), port_from_env());
  if let Err(e) = start_server(state).await {
    log::error!("WebSocket server failed: {e}");
    std::process::exit(1);
  }
}
