//! Index dispatcher (C4a): matches `<namespace>/index` only when the request
//! path is exactly the namespace, with no trailing segments. Low precedence —
//! tried only once Path and Chained have both failed.

use std::collections::HashMap;

use crate::action::{Action, ActionRegistry};
use crate::context::{ChainLink, DispatchResult};
use crate::dispatch::DispatchType;

#[derive(Default)]
pub struct IndexDispatcher {
    by_namespace: HashMap<String, String>,
}

impl IndexDispatcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T> DispatchType<T> for IndexDispatcher {
    fn freeze(&mut self, registry: &ActionRegistry<T>) {
        self.by_namespace.clear();
        for action in registry.iter() {
            if action.is_private() || !action.valid {
                continue;
            }
            if action.name == "index" {
                self.by_namespace
                    .insert(action.namespace.clone(), action.private_name.clone());
            }
        }
    }

    fn try_match(&self, _registry: &ActionRegistry<T>, segments: &[String]) -> Option<DispatchResult> {
        let namespace = segments.join("/");
        let private_name = self.by_namespace.get(&namespace)?;

        Some(DispatchResult {
            chain: vec![ChainLink {
                private_name: private_name.clone(),
                captures: Vec::new(),
            }],
            match_string: namespace,
            args: Vec::new(),
        })
    }

    fn is_low_precedence(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "Index"
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

    #[test]
    fn matches_only_when_args_would_be_empty() {
        let defs = vec![(
            "test/controller".to_string(),
            ActionDef {
                name: "index".into(),
                attributes: AttributeMap::new(),
                args: Some(ArgCount::Fixed(0)),
                capture_args: None,
                valid: true,
                handler: noop(),
            },
        )];
        let registry = ActionRegistry::build(defs);
        let mut dispatcher = IndexDispatcher::new();
        DispatchType::<()>::freeze(&mut dispatcher, &registry);

        let exact = crate::dispatch::split_path("/test/controller");
        assert!(DispatchType::<()>::try_match(&dispatcher, &registry, &exact).is_some());

        let with_residual = crate::dispatch::split_path("/test/controller/extra");
        assert!(DispatchType::<()>::try_match(&dispatcher, &registry, &with_residual).is_none());
    }
}
