//! The per-request lifecycle state machine (C6).
//!
//! ```text
//! CREATED -> PREPARED -> DISPATCHING -> FINALIZING_HEADERS
//!                 |(error)                  |
//!            ERROR_FINALIZING -> FINALIZING_BODY -> DONE
//! ```
//!
//! [`handle_request`] drives a [`Context`] through every transition,
//! delegating the actual path match and action chain walk to the
//! [`Dispatcher`](crate::dispatch::orchestrator::Dispatcher) (C5). This
//! module owns only what's specific to the lifecycle: the
//! before/after hooks, the skip-dispatch escape hatch (used by e.g. a
//! static-file plugin), and response finalization.

use crate::context::Context;
use crate::dispatch::orchestrator::Dispatcher;
use crate::http::response::{IntoResponse, Response};
use crate::http::StatusCode;

/// Hook surface a transport collaborator or plugin can implement to
/// observe/intervene in the lifecycle (§6 "hook registration surface").
///
/// All hooks are no-ops by default — see [`NoopHooks`].
pub trait RequestHooks<T>: Send + Sync {
    /// Runs before `prepare_action`. Setting `ctx` up to skip dispatch
    /// entirely (e.g. a static-file plugin that already wrote the body) is
    /// done by returning `true`; `prepare_action`/`dispatch` are then never
    /// invoked for this request.
    fn before_prepare_action(&self, _state: &T, _ctx: &mut Context) -> bool {
        false
    }

    fn after_prepare_action(&self, _state: &T, _ctx: &mut Context) {}

    fn before_dispatch(&self, _state: &T, _ctx: &mut Context) {}

    fn after_dispatch(&self, _state: &T, _ctx: &mut Context) {}
}

/// The default hook set: every phase runs unconditionally.
pub struct NoopHooks;

impl<T> RequestHooks<T> for NoopHooks {}

/// Drive one request through the full lifecycle and return the context with
/// every `response_*` field populated, ready for [`context_to_response`].
pub async fn handle_request<T>(
    dispatcher: &Dispatcher<T>,
    state: T,
    mut ctx: Context,
    hooks: &dyn RequestHooks<T>,
) -> Context
where
    T: Clone + Send + Sync + 'static,
{
    // CREATED -> PREPARED
    let skip = hooks.before_prepare_action(&state, &mut ctx);
    if !skip {
        if dispatcher.prepare_action(&mut ctx).is_err() {
            // Property P7: exact literal 404 body, independent of whatever
            // `IntoResponse` impl `prepare_action`'s `Response` return type
            // uses internally.
            ctx.response_status = Some(404);
            ctx.response_body = Some(crate::action::unknown_resource_body(&ctx.raw_path).into_bytes());
            return finalize(ctx);
        }
        hooks.after_prepare_action(&state, &mut ctx);

        // PREPARED -> DISPATCHING
        hooks.before_dispatch(&state, &mut ctx);
        ctx = dispatcher.dispatch(state.clone(), ctx).await;
        hooks.after_dispatch(&state, &mut ctx);
    }

    finalize(ctx)
}

/// DISPATCHING -> FINALIZING_HEADERS -> FINALIZING_BODY -> DONE.
fn finalize(mut ctx: Context) -> Context {
    // DISPATCHING -> FINALIZING_HEADERS: errors accumulated on the chain are
    // rendered before headers are computed (mirrors the source's
    // `finalize()`: `if (error()) finalizeError();` runs first).
    if ctx.has_errors() && ctx.response_body.is_none() {
        finalize_error(&mut ctx);
    }

    finalize_headers(&mut ctx);

    // FINALIZING_HEADERS -> FINALIZING_BODY
    if ctx.method.eq_ignore_ascii_case("HEAD") {
        ctx.response_body = None;
    } else if matches!(ctx.response_status, Some(204)) {
        ctx.response_body = None;
    }
    // 3xx without an explicit body stays empty: finalize_headers already
    // synthesized the "Moved" page whenever a redirect had no body set.

    ctx
}

/// Standardized 500 page for an unrecovered action failure (§7), only when
/// the response body is still empty — an action that already wrote a body
/// before failing keeps its own output.
fn finalize_error(ctx: &mut Context) {
    if ctx.response_body.is_some() {
        return;
    }
    if ctx.response_status.is_none() {
        ctx.response_status = Some(500);
    }
    let messages: Vec<&str> = ctx.errors.iter().map(|e| e.message.as_str()).collect();
    ctx.response_body = Some(messages.join("\n").into_bytes());
}

/// Location header / Moved page synthesis, Content-Length, and Set-Cookie
/// emission (§4.6 FINALIZING_HEADERS), mirroring `Cutelyst::finalizeHeaders`.
fn finalize_headers(ctx: &mut Context) {
    if let Some(location) = ctx.response_location.clone() {
        ctx.response_headers.push(("Location".to_string(), location.clone()));
        if ctx.response_body.is_none() {
            let body = format!(
                "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\" \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\">\n\
<html xmlns=\"http://www.w3.org/1999/xhtml\">\n  <head>\n    <title>Moved</title>\n  </head>\n  <body>\n     <p>This item has moved <a href=\"{location}\">here</a>.</p>\n  </body>\n</html>\n"
            );
            ctx.response_headers
                .push(("Content-Type".to_string(), "text/html; charset=utf-8".to_string()));
            ctx.response_body = Some(body.into_bytes());
        }
    }

    if let Some(body) = &ctx.response_body {
        ctx.response_headers
            .push(("Content-Length".to_string(), body.len().to_string()));
    }

    for cookie in &ctx.response_cookies {
        ctx.response_headers.push(("Set-Cookie".to_string(), cookie.clone()));
    }

    if ctx.response_status.is_none() {
        ctx.response_status = Some(200);
    }
}

/// Build the initial `CREATED` [`Context`] from an inbound Axum request.
/// Per §1/§6 non-goals, the body is never read here — the dispatch core
/// consumes only method, path, and headers.
pub fn request_to_context(req: &crate::http::Request) -> Context {
    Context::new(
        req.method().as_str(),
        req.uri().path(),
        req.uri().clone(),
        req.headers().clone(),
    )
}

/// Mount the dispatch core onto `router` as its fallback service: any
/// request that doesn't match an axum-native route declared via
/// `Controller::routes()` (§4.1 design notes — controllers may populate
/// `actions()`, `routes()`, or both) is handed to [`handle_request`]
/// instead, using [`NoopHooks`].
///
/// This is the seam between the Cutelyst-style dynamic dispatch core and
/// the teacher's axum-native router: an application that only wants
/// `#[routes]`-declared handlers never calls this; one that wants
/// Path/Chained/Index/Default dispatch mounts it once at startup.
pub fn mount_dispatch_core<T>(
    router: crate::http::Router<T>,
    dispatcher: std::sync::Arc<Dispatcher<T>>,
) -> crate::http::Router<T>
where
    T: Clone + Send + Sync + 'static,
{
    router.fallback(move |state: crate::http::State<T>, req: crate::http::Request| {
        let dispatcher = dispatcher.clone();
        async move {
            let crate::http::State(state) = state;
            let ctx = request_to_context(&req);
            let ctx = handle_request(&*dispatcher, state, ctx, &NoopHooks).await;
            context_to_response(ctx)
        }
    })
}

/// Convert a finalized [`Context`] into the transport collaborator's
/// response type. The one place that knows how to turn `response_*` fields
/// into an `axum::response::Response`.
pub fn context_to_response(ctx: Context) -> Response {
    let status = StatusCode::from_u16(ctx.response_status.unwrap_or(200)).unwrap_or(StatusCode::OK);
    let body = ctx.response_body.unwrap_or_default();
    let mut response = (status, body).into_response();

    let headers = response.headers_mut();
    for (key, value) in &ctx.response_headers {
        if let (Ok(name), Ok(val)) = (
            crate::http::HeaderName::try_from(key.as_str()),
            crate::http::HeaderValue::from_str(value),
        ) {
            headers.append(name, val);
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HeaderMap, Uri};

    fn ctx(method: &str, path: &str) -> Context {
        Context::new(method, path, path.parse::<Uri>().unwrap(), HeaderMap::new())
    }

    #[test]
    fn head_request_clears_body_but_keeps_content_length() {
        let mut c = ctx("HEAD", "/x");
        c.write_body("hello");
        let c = finalize(c);
        assert_eq!(c.response_body, None);
        assert!(c
            .response_headers
            .iter()
            .any(|(k, v)| k == "Content-Length" && v == "5"));
    }

    #[test]
    fn status_204_has_no_body() {
        let mut c = ctx("GET", "/x");
        c.set_status(204);
        c.write_body("ignored");
        let c = finalize(c);
        assert_eq!(c.response_body, None);
    }

    #[test]
    fn redirect_without_body_gets_moved_page() {
        let mut c = ctx("GET", "/x");
        c.redirect("http://example.com/new");
        let c = finalize(c);
        assert_eq!(c.response_status, Some(302));
        assert!(c
            .response_headers
            .iter()
            .any(|(k, v)| k == "Location" && v == "http://example.com/new"));
        assert!(c.response_body.is_some());
    }

    #[test]
    fn uncaught_error_with_no_body_yields_500() {
        let mut c = ctx("GET", "/x");
        c.push_error("boom");
        let c = finalize(c);
        assert_eq!(c.response_status, Some(500));
        assert_eq!(c.response_body.as_deref(), Some("boom".as_bytes()));
    }

    #[test]
    fn action_written_body_survives_error() {
        let mut c = ctx("GET", "/x");
        c.write_body("partial");
        c.push_error("boom");
        let c = finalize(c);
        assert_eq!(c.response_body.as_deref(), Some("partial".as_bytes()));
    }

    #[test]
    fn cookies_emitted_in_push_order() {
        let mut c = ctx("GET", "/x");
        c.add_cookie("a=1");
        c.add_cookie("b=2");
        let c = finalize(c);
        let cookies: Vec<&str> = c
            .response_headers
            .iter()
            .filter(|(k, _)| k == "Set-Cookie")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(cookies, vec!["a=1", "b=2"]);
    }
}
