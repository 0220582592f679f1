//! Default dispatcher (C4b): walks the request path upward, prefix by
//! prefix, looking for a `default` action registered under that namespace. A
//! top-level `default` (registered at the root namespace) is the fallback of
//! last resort. Low precedence, longer prefixes preferred.

use std::collections::HashMap;

use crate::action::{Action, ActionRegistry};
use crate::context::{ChainLink, DispatchResult};
use crate::dispatch::DispatchType;

#[derive(Default)]
pub struct DefaultDispatcher {
    by_namespace: HashMap<String, String>,
}

impl DefaultDispatcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T> DispatchType<T> for DefaultDispatcher {
    fn freeze(&mut self, registry: &ActionRegistry<T>) {
        self.by_namespace.clear();
        for action in registry.iter() {
            if action.is_private() || !action.valid {
                continue;
            }
            if action.name == "default" {
                self.by_namespace
                    .insert(action.namespace.clone(), action.private_name.clone());
            }
        }
    }

    fn try_match(&self, _registry: &ActionRegistry<T>, segments: &[String]) -> Option<DispatchResult> {
        for len in (0..=segments.len()).rev() {
            let prefix = segments[..len].join("/");
            if let Some(private_name) = self.by_namespace.get(&prefix) {
                return Some(DispatchResult {
                    chain: vec![ChainLink {
                        private_name: private_name.clone(),
                        captures: Vec::new(),
                    }],
                    match_string: prefix,
                    args: segments[len..].to_vec(),
                });
            }
        }
        None
    }

    fn is_low_precedence(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "Default"
    }

    fn claims(&self, action: &Action<T>) -> bool {
        self.by_namespace.get(&action.namespace).map(String::as_str) == Some(action.private_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionDef, ArgCount, AttributeMap};
    use std::sync::Arc;

    fn noop() -> crate::action::ActionFn<()> {
        Arc::new(|_s, ctx| Box::pin(async move { (ctx, true) }))
    }

    fn registry_with_two_defaults() -> ActionRegistry<()> {
        ActionRegistry::build(vec![
            (
                "".to_string(),
                ActionDef {
                    name: "default".into(),
                    attributes: AttributeMap::new(),
                    args: Some(ArgCount::Variadic),
                    capture_args: None,
                    valid: true,
                    handler: noop(),
                },
            ),
            (
                "test".to_string(),
                ActionDef {
                    name: "default".into(),
                    attributes: AttributeMap::new(),
                    args: Some(ArgCount::Variadic),
                    capture_args: None,
                    valid: true,
                    handler: noop(),
                },
            ),
        ])
    }

    #[test]
    fn prefers_longer_namespace_prefix() {
        let registry = registry_with_two_defaults();
        let mut dispatcher = DefaultDispatcher::new();
        DispatchType::<()>::freeze(&mut dispatcher, &registry);

        let segments = crate::dispatch::split_path("/test/nowhere");
        let result = DispatchType::<()>::try_match(&dispatcher, &registry, &segments).unwrap();
        assert_eq!(result.chain[0].private_name, "test/default");
    }

    #[test]
    fn falls_back_to_top_level_default() {
        let registry = registry_with_two_defaults();
        let mut dispatcher = DefaultDispatcher::new();
        DispatchType::<()>::freeze(&mut dispatcher, &registry);

        let segments = crate::dispatch::split_path("/unrelated/path");
        let result = DispatchType::<()>::try_match(&dispatcher, &registry, &segments).unwrap();
        assert_eq!(result.chain[0].private_name, "/default");
    }
}
