//! End-to-end coverage of the request lifecycle (C6) layered on top of the
//! dispatcher orchestrator (C5): the concrete scenarios from the dispatch
//! core's testable-properties seed list, driven through
//! `r2e_core::handle_request` exactly as an Axum fallback would.

use std::sync::Arc;

use r2e_core::action::{ActionDef, ActionFn, ArgCount, AttributeMap};
use r2e_core::context::Context;
use r2e_core::{ActionRegistry, Dispatcher, DispatchTypeSet, NoopHooks};

fn echo_path_and_args() -> ActionFn<()> {
    Arc::new(|_state, mut ctx| {
        Box::pin(async move {
            let body = format!("path {} args {}", ctx.raw_path, ctx.args.join("/"));
            ctx.write_body(body);
            (ctx, true)
        })
    })
}

fn echo_raw_path() -> ActionFn<()> {
    Arc::new(|_state, mut ctx| {
        Box::pin(async move {
            let body = ctx.raw_path.clone();
            ctx.write_body(body);
            (ctx, true)
        })
    })
}

fn noop() -> ActionFn<()> {
    Arc::new(|_state, ctx| Box::pin(async move { (ctx, true) }))
}

fn build_dispatcher() -> Dispatcher<()> {
    let mut global_attrs = AttributeMap::new();
    global_attrs.insert("Global", "global");

    let mut many_attrs = AttributeMap::new();
    many_attrs.insert("Path", "test/controller/many");

    let mut chain_root = AttributeMap::new();
    chain_root.insert("Chained", "/");
    chain_root.insert("PathPart", "chain");

    let mut chain_mid = AttributeMap::new();
    chain_mid.insert("Chained", "chain/root");
    chain_mid.insert("PathPart", "midle");
    chain_mid.insert("CaptureArgs", "2");

    let mut chain_end = AttributeMap::new();
    chain_end.insert("Chained", "chain/midle");
    chain_end.insert("PathPart", "end");

    let defs = vec![
        (
            "test/controller".to_string(),
            ActionDef {
                name: "one".into(),
                attributes: global_attrs,
                args: Some(ArgCount::Fixed(0)),
                capture_args: None,
                valid: true,
                handler: echo_path_and_args(),
            },
        ),
        (
            "test/controller".to_string(),
            ActionDef {
                name: "many".into(),
                attributes: many_attrs,
                args: Some(ArgCount::Variadic),
                capture_args: None,
                valid: true,
                handler: echo_path_and_args(),
            },
        ),
        (
            "chain".to_string(),
            ActionDef {
                name: "root".into(),
                attributes: chain_root,
                args: None,
                capture_args: Some(0),
                valid: true,
                handler: noop(),
            },
        ),
        (
            "chain".to_string(),
            ActionDef {
                name: "midle".into(),
                attributes: chain_mid,
                args: None,
                capture_args: Some(2),
                valid: true,
                handler: noop(),
            },
        ),
        (
            "chain/midle".to_string(),
            ActionDef {
                name: "end".into(),
                attributes: chain_end,
                args: Some(ArgCount::Variadic),
                capture_args: None,
                valid: true,
                handler: echo_raw_path(),
            },
        ),
    ];

    let registry = ActionRegistry::build(defs);
    Dispatcher::new(registry, DispatchTypeSet::standard())
}

fn get_ctx(path: &str) -> Context {
    use r2e_core::http::{HeaderMap, Uri};
    Context::new("GET", path, path.parse::<Uri>().unwrap(), HeaderMap::new())
}

#[tokio::test]
async fn seed_1_global_action_matches() {
    let dispatcher = build_dispatcher();
    let ctx = get_ctx("/global");
    let ctx = r2e_core::handle_request(&dispatcher, (), ctx, &NoopHooks).await;
    assert_eq!(ctx.response_status, Some(200));
    assert_eq!(ctx.response_body.as_deref(), Some("path /global args ".as_bytes()));
}

#[tokio::test]
async fn seed_2_variadic_path_action_matches() {
    let dispatcher = build_dispatcher();
    let ctx = get_ctx("/test/controller/many/1/2/3");
    let ctx = r2e_core::handle_request(&dispatcher, (), ctx, &NoopHooks).await;
    assert_eq!(ctx.response_status, Some(200));
    assert_eq!(
        ctx.response_body.as_deref(),
        Some("path /test/controller/many/1/2/3 args 1/2/3".as_bytes())
    );
}

#[tokio::test]
async fn seed_3_unknown_path_is_404_with_literal_body() {
    let dispatcher = build_dispatcher();
    let ctx = get_ctx("/test/unknown");
    let ctx = r2e_core::handle_request(&dispatcher, (), ctx, &NoopHooks).await;
    assert_eq!(ctx.response_status, Some(404));
    assert_eq!(
        ctx.response_body.as_deref(),
        Some("Unknown resource 'test/unknown'.".as_bytes())
    );
}

#[tokio::test]
async fn seed_4_chained_dispatch_with_captures_and_variadic_endpoint() {
    let dispatcher = build_dispatcher();
    let ctx = get_ctx("/chain/midle/TWO/ONE/end/1/2/3/4/5");
    let ctx = r2e_core::handle_request(&dispatcher, (), ctx, &NoopHooks).await;
    assert_eq!(ctx.response_status, Some(200));
    assert_eq!(
        ctx.response_body.as_deref(),
        Some("/chain/midle/TWO/ONE/end/1/2/3/4/5".as_bytes())
    );
}

#[tokio::test]
async fn seed_6_forward_cycle_past_recursion_limit_yields_500() {
    std::env::set_var("RECURSION", "10");
    let dispatcher = build_dispatcher();
    let ctx = get_ctx("/global");

    let mut ctx = ctx;
    for _ in 0..11 {
        ctx = dispatcher.forward((), ctx, "test/controller/one").await;
    }

    assert!(ctx.has_errors());
    assert!(ctx.errors.last().unwrap().message.contains("recursion limit"));
    std::env::remove_var("RECURSION");
}

#[tokio::test]
async fn before_prepare_action_hook_can_skip_dispatch() {
    struct SkipAndServe;
    impl r2e_core::RequestHooks<()> for SkipAndServe {
        fn before_prepare_action(&self, _state: &(), ctx: &mut Context) -> bool {
            ctx.write_body("served by a static-file plugin");
            true
        }
    }

    let dispatcher = build_dispatcher();
    let ctx = get_ctx("/anything/at/all");
    let ctx = r2e_core::handle_request(&dispatcher, (), ctx, &SkipAndServe).await;
    assert_eq!(ctx.response_status, Some(200));
    assert_eq!(
        ctx.response_body.as_deref(),
        Some("served by a static-file plugin".as_bytes())
    );
}
