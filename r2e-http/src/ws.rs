//! WebSocket re-exports from Axum, gated behind the `ws` feature flag.

pub use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
pub use axum::Error;
