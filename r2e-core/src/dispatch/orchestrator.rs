//! The dispatcher orchestrator (C5): `prepare_action`, `dispatch`, `forward`.
//!
//! Owns the frozen [`ActionRegistry`] and [`DispatchTypeSet`] for one
//! application and drives every request through them.

use crate::action::{ActionFn, ActionRegistry};
use crate::context::Context;
use crate::dispatch::{percent_decode_segment, split_path, DispatchTypeSet};
use crate::http::response::Response;

pub const DEFAULT_RECURSION_LIMIT: usize = 10;

/// Every namespace prefix from the root (`""`) down to `namespace` itself,
/// inclusive, used to resolve `Begin`/`Auto`/`End` at each enclosing level.
fn namespace_chain(namespace: &str) -> Vec<String> {
    let mut chain = vec![String::new()];
    if namespace.is_empty() {
        return chain;
    }
    let mut acc = String::new();
    for (i, part) in namespace.split('/').enumerate() {
        if i > 0 {
            acc.push('/');
        }
        acc.push_str(part);
        chain.push(acc.clone());
    }
    chain
}

fn special_private_name(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        format!("/{name}")
    } else {
        format!("{namespace}/{name}")
    }
}

fn recursion_limit() -> usize {
    std::env::var("RECURSION")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_RECURSION_LIMIT)
}

/// Drives one application's request lifecycle through the frozen action
/// table. Built once at startup; read-only and shareable across requests.
pub struct Dispatcher<T> {
    registry: ActionRegistry<T>,
    dispatch_types: DispatchTypeSet<T>,
}

impl<T> Dispatcher<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(registry: ActionRegistry<T>, mut dispatch_types: DispatchTypeSet<T>) -> Self {
        dispatch_types.freeze(&registry);
        Self {
            registry,
            dispatch_types,
        }
    }

    pub fn registry(&self) -> &ActionRegistry<T> {
        &self.registry
    }

    /// Resolve the request path to an action chain (§4.5). On success,
    /// populates `ctx.action_chain`/`ctx.match_string`/`ctx.args`. On
    /// failure, returns the literal 404 response (Property P7).
    pub fn prepare_action(&self, ctx: &mut Context) -> Result<(), Response> {
        let raw_segments = split_path(&ctx.raw_path);
        let segments: Vec<String> = raw_segments.iter().map(|s| percent_decode_segment(s)).collect();

        match self.dispatch_types.try_match(&self.registry, &segments) {
            Some(result) => {
                ctx.match_string = Some(result.match_string);
                ctx.action_chain = result.chain;
                ctx.args = result.args;
                Ok(())
            }
            None => Err(crate::action::unknown_resource_response(&ctx.raw_path)),
        }
    }

    async fn invoke(&self, state: T, ctx: Context, handler: ActionFn<T>) -> (Context, bool) {
        handler(state, ctx).await
    }

    fn find_special(&self, namespace: &str, name: &str) -> Option<&crate::action::Action<T>> {
        self.registry.get(&special_private_name(namespace, name))
    }

    /// Run the full per-request lifecycle against an already-prepared
    /// context: `Begin` (outermost first), `Auto` (outermost first, stopping
    /// at the first `false`), the matched action chain in order, then `End`
    /// (innermost first). Detaching at any point skips everything but `End`.
    pub async fn dispatch(&self, state: T, mut ctx: Context) -> Context {
        let endpoint_namespace = ctx
            .action_chain
            .last()
            .and_then(|link| self.registry.get(&link.private_name))
            .map(|action| action.namespace.clone())
            .unwrap_or_default();
        let ns_chain = namespace_chain(&endpoint_namespace);

        for ns in &ns_chain {
            if let Some(begin) = self.find_special(ns, "Begin") {
                let handler = begin.handler.clone();
                let (new_ctx, cont) = self.invoke(state.clone(), ctx, handler).await;
                ctx = new_ctx;
                ctx.set_state(cont);
                if ctx.detached {
                    return ctx;
                }
            }
        }

        let mut auto_continue = true;
        for ns in &ns_chain {
            if let Some(auto) = self.find_special(ns, "Auto") {
                let handler = auto.handler.clone();
                let (new_ctx, cont) = self.invoke(state.clone(), ctx, handler).await;
                ctx = new_ctx;
                ctx.set_state(cont);
                if ctx.detached {
                    return ctx;
                }
                if !cont {
                    auto_continue = false;
                    break;
                }
            }
        }

        if auto_continue {
            let links = ctx.action_chain.clone();
            for link in links {
                let Some(action) = self.registry.get(&link.private_name) else {
                    continue;
                };
                ctx.captures = link.captures.clone();
                let handler = action.handler.clone();
                let (new_ctx, cont) = self.invoke(state.clone(), ctx, handler).await;
                ctx = new_ctx;
                ctx.set_state(cont);
                if ctx.detached || !cont {
                    break;
                }
            }
        }

        if !ctx.detached {
            for ns in ns_chain.iter().rev() {
                if let Some(end) = self.find_special(ns, "End") {
                    let handler = end.handler.clone();
                    let (new_ctx, _) = self.invoke(state.clone(), ctx, handler).await;
                    ctx = new_ctx;
                    if ctx.detached {
                        break;
                    }
                }
            }
        }

        ctx
    }

    /// Synchronously invoke another action by private name (`command2action`
    /// + direct call), guarding against runaway forward cycles with the
    /// `RECURSION` environment variable (default 10).
    ///
    /// `ctx.forward_stack` tracks nesting depth, not cumulative forwards: the
    /// private name pushed before invoking the target is popped again once
    /// that invocation returns, so sibling forwards within one request don't
    /// accumulate toward the recursion limit — only genuine forward cycles do.
    pub async fn forward(&self, state: T, mut ctx: Context, private_name: &str) -> Context {
        let limit = recursion_limit();
        if ctx.forward_stack.len() >= limit {
            tracing::warn!(
                private_name,
                limit,
                "forward recursion limit exceeded, aborting request"
            );
            ctx.push_error(format!(
                "forward cycle exceeded recursion limit of {limit} (forwarding to '{private_name}')"
            ));
            return ctx;
        }
        ctx.forward_stack.push(private_name.to_string());

        let mut ctx = match self.registry.command2action(private_name) {
            Some(action) => {
                let handler = action.handler.clone();
                let (new_ctx, cont) = self.invoke(state, ctx, handler).await;
                let mut ctx = new_ctx;
                ctx.set_state(cont);
                ctx
            }
            None => {
                tracing::debug!(private_name, "forward target not found");
                ctx.push_error(format!("forward target '{private_name}' not found"));
                ctx
            }
        };
        ctx.forward_stack.pop();
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_chain_lists_every_prefix() {
        assert_eq!(
            namespace_chain("test/controller"),
            vec!["".to_string(), "test".to_string(), "test/controller".to_string()]
        );
    }

    #[test]
    fn namespace_chain_for_root_is_just_root() {
        assert_eq!(namespace_chain(""), vec!["".to_string()]);
    }

    #[test]
    fn special_private_name_prefixes_root_with_slash() {
        assert_eq!(special_private_name("", "Begin"), "/Begin");
        assert_eq!(special_private_name("test", "Auto"), "test/Auto");
    }

    #[test]
    fn recursion_limit_defaults_to_ten() {
        std::env::remove_var("RECURSION");
        assert_eq!(recursion_limit(), DEFAULT_RECURSION_LIMIT);
    }
}
