//! Per-request correlation ID, attached as an Axum extension and echoed back
//! as a response header so clients and logs can be joined on the same value.

use crate::http::extract::Request;
use crate::http::header::{HeaderName, HeaderValue};
use crate::http::middleware::Next;
use crate::http::response::Response;

use crate::builder::AppBuilder;
use crate::plugin::Plugin;

const HEADER: &str = "x-request-id";

/// A unique identifier for one request, available as an Axum extension
/// (`Extension<RequestId>`) inside handlers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(pub String);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Plugin installing request-id generation/propagation.
///
/// If the inbound request already carries an `X-Request-Id` header, it is
/// reused (useful behind a reverse proxy that stamps its own id); otherwise a
/// fresh UUIDv4 is generated. The id is inserted as a request extension and
/// echoed back on the response.
pub struct RequestIdPlugin;

impl Plugin for RequestIdPlugin {
    fn install<T: Clone + Send + Sync + 'static>(self, app: AppBuilder<T>) -> AppBuilder<T> {
        app.with_layer_fn(|router| router.layer(crate::http::middleware::from_fn(request_id_middleware)))
    }
}

async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let header_name = HeaderName::from_static(HEADER);
    let id = req
        .headers()
        .get(&header_name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(header_name, value);
    }
    response
}
