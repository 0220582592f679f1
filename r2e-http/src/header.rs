//! Header and status-line types, re-exported from Axum's `http` re-export.

pub use axum::http::header::{
    HeaderName, HeaderValue,
    // Common header constants
    ACCEPT, AUTHORIZATION, CACHE_CONTROL, CONNECTION, CONTENT_LENGTH, CONTENT_TYPE, COOKIE, HOST,
    LOCATION, ORIGIN, REFERER, SET_COOKIE, USER_AGENT,
};
pub use axum::http::request::Parts;
pub use axum::http::{HeaderMap, Method, Request as HttpRequest, StatusCode};
