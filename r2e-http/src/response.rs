//! Response types, re-exported from Axum.

pub use axum::response::{Html, IntoResponse, Redirect, Response};
pub use axum::response::sse::Event as SseEvent;
pub use axum::response::sse::KeepAlive as SseKeepAlive;
pub use axum::response::Sse;
