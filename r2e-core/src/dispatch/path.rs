//! Path dispatcher (C2): fixed-path matching with fixed or variadic arity.

use std::collections::HashMap;

use crate::action::{Action, ActionRegistry, ArgCount};
use crate::context::{ChainLink, DispatchResult};
use crate::dispatch::DispatchType;

struct Entry {
    private_name: String,
    key_len: usize,
    args: ArgCount,
    order: usize,
}

/// Matches actions carrying a `Path` attribute: a multimap from the
/// path-string's segment count down to the candidate actions registered at
/// that exact key, keyed by the joined path string for O(1) prefix checks.
#[derive(Default)]
pub struct PathDispatcher {
    by_key: HashMap<String, Vec<Entry>>,
    by_private_name: HashMap<String, (String, ArgCount)>,
}

impl PathDispatcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T> DispatchType<T> for PathDispatcher {
    fn freeze(&mut self, registry: &ActionRegistry<T>) {
        self.by_key.clear();
        self.by_private_name.clear();
        for (order, action) in registry.iter().enumerate() {
            if action.is_private() || !action.valid {
                continue;
            }
            let Some(path) = action.path_attr() else {
                continue;
            };
            let Some(args) = action.args else {
                continue;
            };
            let key = path.trim_start_matches('/').to_string();
            let key_len = if key.is_empty() { 0 } else { key.split('/').count() };
            self.by_private_name
                .insert(action.private_name.clone(), (path.to_string(), args));
            self.by_key.entry(key).or_default().push(Entry {
                private_name: action.private_name.clone(),
                key_len,
                args,
                order,
            });
        }
    }

    fn try_match(&self, _registry: &ActionRegistry<T>, segments: &[String]) -> Option<DispatchResult> {
        let mut best: Option<(&Entry, usize)> = None;

        for (key, entries) in self.by_key.iter() {
            if segments.len() < entries.first().map(|e| e.key_len).unwrap_or(0) {
                continue;
            }
            let prefix: Vec<&str> = segments.iter().take(entries.first().map(|e| e.key_len).unwrap_or(0)).map(String::as_str).collect();
            if prefix.join("/") != *key {
                continue;
            }
            let residual = segments.len() - entries.first().map(|e| e.key_len).unwrap_or(0);

            for entry in entries {
                if !entry.args.accepts(residual) {
                    continue;
                }
                let is_better = match &best {
                    None => true,
                    Some((current, _)) => {
                        // (i) fixed preferred over variadic
                        let entry_fixed = matches!(entry.args, ArgCount::Fixed(_));
                        let current_fixed = matches!(current.args, ArgCount::Fixed(_));
                        if entry_fixed != current_fixed {
                            entry_fixed
                        } else if entry.key_len != current.key_len {
                            // (ii) longer path prefix preferred
                            entry.key_len > current.key_len
                        } else {
                            // (iii) stable insertion order
                            entry.order < current.order
                        }
                    }
                };
                if is_better {
                    best = Some((entry, residual));
                }
            }
        }

        best.map(|(entry, residual)| DispatchResult {
            chain: vec![ChainLink {
                private_name: entry.private_name.clone(),
                captures: Vec::new(),
            }],
            match_string: segments[..segments.len() - residual].join("/"),
            args: segments[segments.len() - residual..].to_vec(),
        })
    }

    fn is_low_precedence(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "Path"
    }

    fn claims(&self, action: &Action<T>) -> bool {
        self.by_private_name.contains_key(&action.private_name)
    }

    fn uri_for(
        &self,
        _registry: &ActionRegistry<T>,
        private_name: &str,
        _captures: &[String],
        args: &[String],
    ) -> Option<String> {
        let (path, arity) = self.by_private_name.get(private_name)?;
        if !arity.accepts(args.len()) {
            return None;
        }
        let base = path.trim_start_matches('/');
        if args.is_empty() {
            Some(base.to_string())
        } else {
            Some(format!("{base}/{}", args.join("/")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionDef, AttributeMap};
    use std::sync::Arc;

    fn noop() -> crate::action::ActionFn<()> {
        Arc::new(|_s, ctx| Box::pin(async move { (ctx, true) }))
    }

    fn registry_with(path: &str, args: ArgCount) -> ActionRegistry<()> {
        let mut attrs = AttributeMap::new();
        attrs.insert("Path", path);
        ActionRegistry::build(vec![(
            "test/controller".to_string(),
            ActionDef {
                name: "one".into(),
                attributes: attrs,
                args: Some(args),
                capture_args: None,
                valid: true,
                handler: noop(),
            },
        )])
    }

    #[test]
    fn fixed_arity_matches_exact_residual() {
        let registry = registry_with("test/controller/one", ArgCount::Fixed(1));
        let mut dispatcher = PathDispatcher::new();
        DispatchType::<()>::freeze(&mut dispatcher, &registry);

        let segments = crate::dispatch::split_path("/test/controller/one/1");
        let result = DispatchType::<()>::try_match(&dispatcher, &registry, &segments).unwrap();
        assert_eq!(result.args, vec!["1"]);
        assert_eq!(result.chain[0].private_name, "test/controller/one");
    }

    #[test]
    fn trailing_slash_produces_no_match_for_fixed_arity() {
        let registry = registry_with("test/controller/one", ArgCount::Fixed(1));
        let mut dispatcher = PathDispatcher::new();
        DispatchType::<()>::freeze(&mut dispatcher, &registry);

        // "/test/controller/one/1/" has a trailing empty segment (2 residual).
        let segments = crate::dispatch::split_path("/test/controller/one/1/");
        assert!(DispatchType::<()>::try_match(&dispatcher, &registry, &segments).is_none());
    }

    #[test]
    fn variadic_matches_any_residual() {
        let registry = registry_with("test/controller/many", ArgCount::Variadic);
        let mut dispatcher = PathDispatcher::new();
        DispatchType::<()>::freeze(&mut dispatcher, &registry);

        let segments = crate::dispatch::split_path("/test/controller/many/1/2/3");
        let result = DispatchType::<()>::try_match(&dispatcher, &registry, &segments).unwrap();
        assert_eq!(result.args, vec!["1", "2", "3"]);
    }
}
