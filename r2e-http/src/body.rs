//! Request/response body type, re-exported from Axum.

pub use axum::body::Body;
