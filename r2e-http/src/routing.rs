//! Router and route-builder types, re-exported from Axum.

pub use axum::routing::{
    any, delete, get, head, method_routing, options, patch, post, put, trace, MethodRouter, Route,
};
