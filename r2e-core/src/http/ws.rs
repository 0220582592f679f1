//! WebSocket re-exports.
//!
//! Gated behind the `ws` feature flag.

pub use r2e_http::ws::{CloseFrame, Error, Message, WebSocket, WebSocketUpgrade};

/// Marker trait for compile-time verification in the `#[ws]` macro.
pub trait IsWebSocket: Send + 'static {}

impl IsWebSocket for WebSocket {}
