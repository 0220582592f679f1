//! HTTP abstraction layer for R2E — sole owner of the `axum` dependency.
//!
//! `r2e-core` and every other R2E crate reach Axum exclusively through this
//! crate's re-exports (`r2e_http::axum`, or the flattened items below). That
//! keeps the Axum version pin in one place and gives the rest of the
//! workspace a seam to swap the transport collaborator without touching
//! dispatch, DI, or config code.

pub use axum;
pub use bytes;
pub use http;
#[cfg(feature = "proxy")]
pub use hyper;

pub mod body;
pub mod extract;
pub mod header;
pub mod middleware;
pub mod response;
pub mod routing;
#[cfg(feature = "ws")]
pub mod ws;

pub use axum::{serve, Extension, Json, Router};
pub use axum::http::Uri;
pub use bytes::Bytes;
pub use self::body::Body;
pub use self::extract::{
    ConnectInfo, DefaultBodyLimit, Form, FromRef, FromRequest, FromRequestParts, MatchedPath,
    OriginalUri, Path, Query, RawPathParams, Request, State,
};
pub use self::header::{
    HeaderMap, HeaderName, HeaderValue, Method, StatusCode,
    ACCEPT, AUTHORIZATION, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE, COOKIE, HOST, LOCATION,
    ORIGIN, REFERER, SET_COOKIE, USER_AGENT,
};
pub use self::response::{Html, IntoResponse, Redirect, Response, Sse, SseEvent, SseKeepAlive};
