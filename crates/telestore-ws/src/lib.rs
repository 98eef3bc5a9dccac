/*! Telestore JSON-RPC over WebSocket. */

mod rpc;
mod server;
mod wire;

pub use rpc::{dispatch, dispatch_json, RpcRequest, RpcResponse};
pub use server::{start_server, BridgeState, CustomRpcHandler, DEFAULT_WS_PORT};
pub use wire::{ServerEvent, WireChange, WireEntry, WireValue};
