//! Ambient tower/tower-http layers and the global `tracing` subscriber.
//!
//! These are the cross-cutting concerns every R2E application wants by
//! default: structured logging, permissive-by-default CORS for local
//! development, and panic-to-500 conversion. Controllers and the dispatch
//! core never reach for these directly; they are wired in by
//! [`crate::plugins`].

use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Install the global `tracing` subscriber, reading filter directives from
/// `RUST_LOG` (default: `info`).
///
/// Idempotent: a second call is a no-op (the underlying `set_global_default`
/// error is swallowed) so tests and plugin chains can call it freely.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

/// A permissive CORS layer (any origin, method, header) suitable for local
/// development. Production deployments should build their own `CorsLayer`
/// and install it via `Cors::custom`.
pub fn default_cors() -> CorsLayer {
    CorsLayer::permissive()
}

/// The default request/response trace layer, logging at `DEBUG`.
pub fn default_trace() -> TraceLayer<tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
}

/// A layer converting panics inside handlers into a `500` JSON response
/// instead of tearing down the connection.
pub fn catch_panic_layer() -> CatchPanicLayer {
    CatchPanicLayer::new()
}
