//! Extractor types, re-exported from Axum.

pub use axum::extract::{
    ConnectInfo, DefaultBodyLimit, FromRef, FromRequest, FromRequestParts, MatchedPath,
    OriginalUri, Path, Query, RawPathParams, Request, State,
};
pub use axum::Form;

#[cfg(feature = "multipart")]
pub use axum::extract::Multipart;
