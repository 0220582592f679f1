//! The [`Action`] registry (C1 in the design ledger): an immutable table of
//! every dispatchable handler, built once at startup and frozen for the
//! process lifetime.

use std::collections::HashMap;
use std::sync::Arc;

use crate::context::Context;
use crate::http::response::Response;

/// Number of trailing path segments an action consumes.
///
/// `Fixed(n)` requires exactly `n` residual segments; `Variadic` accepts any
/// count (including zero), and is only tried after all `Fixed` candidates at
/// the same match point have failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgCount {
    Fixed(usize),
    Variadic,
}

impl ArgCount {
    pub fn accepts(&self, n: usize) -> bool {
        match self {
            ArgCount::Fixed(expected) => *expected == n,
            ArgCount::Variadic => true,
        }
    }
}

/// An ordered, insertion-preserving, repeatable-valued multimap of action
/// attributes (`Path`, `Args`, `CaptureArgs`, `Chained`, `PathPart`,
/// `ActionClass`, `Does`, `Private`, `Global`, `Local`, and any
/// application-defined keys such as `RequiresRole`).
#[derive(Debug, Clone, Default)]
pub struct AttributeMap {
    entries: Vec<(String, String)>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key/value pair. Existing values for the same key are kept —
    /// attributes are repeatable.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Set a key to a single value, replacing any previous values.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.entries.retain(|(k, _)| k != &key);
        self.entries.push((key, value.into()));
    }

    /// First value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All values for `key`, in insertion order.
    pub fn get_all(&self, key: &str) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }
}

/// The handler itself: an async function taking the shared application
/// state and the live [`Context`], returning the context back (captures and
/// args threaded into it by the orchestrator) and whether the chain should
/// "continue" (the Cutelyst boolean action-state).
pub type ActionFn<T> =
    Arc<dyn Fn(T, Context) -> futures_core::future::BoxFuture<'static, (Context, bool)> + Send + Sync>;

/// An immutable handler descriptor, constructed once during registration and
/// never mutated thereafter.
#[derive(Clone)]
pub struct Action<T> {
    /// Absolute, namespace-qualified path, unique within the registry
    /// (e.g. `test/controller/one`).
    pub private_name: String,
    /// The owning controller's namespace (e.g. `test/controller`).
    pub namespace: String,
    /// The method identifier as declared on the controller (e.g. `one`).
    pub name: String,
    pub attributes: AttributeMap,
    pub args: Option<ArgCount>,
    pub capture_args: Option<usize>,
    /// False if the first parameter was not a context — such actions are
    /// registered (for diagnostics) but never dispatched.
    pub valid: bool,
    pub handler: ActionFn<T>,
}

impl<T> Action<T> {
    pub fn is_private(&self) -> bool {
        self.attributes.has("Private")
    }

    pub fn path_attr(&self) -> Option<&str> {
        self.attributes.get("Path")
    }

    pub fn chained_parent(&self) -> Option<&str> {
        self.attributes.get("Chained")
    }

    pub fn path_part(&self) -> Option<&str> {
        self.attributes.get("PathPart")
    }

    pub fn action_class(&self) -> Option<&str> {
        self.attributes.get("ActionClass")
    }
}

impl<T> std::fmt::Debug for Action<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Action")
            .field("private_name", &self.private_name)
            .field("namespace", &self.namespace)
            .field("name", &self.name)
            .field("args", &self.args)
            .field("capture_args", &self.capture_args)
            .field("valid", &self.valid)
            .finish()
    }
}

/// Builder input for one action, collected during controller registration
/// before the attribute-parsing rules in §4.1 are applied.
pub struct ActionDef<T> {
    pub name: String,
    pub attributes: AttributeMap,
    pub args: Option<ArgCount>,
    pub capture_args: Option<usize>,
    pub valid: bool,
    pub handler: ActionFn<T>,
}

/// Immutable, insertion-ordered mapping (private name → Action), built once
/// at setup and read-only afterward. Concurrent readers need no locking.
pub struct ActionRegistry<T> {
    order: Vec<String>,
    by_name: HashMap<String, Action<T>>,
}

impl<T> ActionRegistry<T> {
    /// Build the registry by applying the §4.1 registration procedure to
    /// every `(namespace, ActionDef)` pair collected from registered
    /// controllers.
    pub fn build(defs: Vec<(String, ActionDef<T>)>) -> Self {
        let mut order = Vec::with_capacity(defs.len());
        let mut by_name = HashMap::with_capacity(defs.len());

        for (namespace, def) in defs {
            let mut attributes = def.attributes;

            // Marker-parameter effects (§4.1 step 2). These are additive:
            // macro-generated code already set `Global`/`Local`/`Path` as
            // appropriate, this just fills in the derived `Path` attribute
            // when not already present.
            if attributes.has("Global") && !attributes.has("Path") {
                let name = attributes.get("Global").unwrap_or("").to_string();
                let path = if name.starts_with('/') {
                    name
                } else {
                    format!("/{name}")
                };
                attributes.set("Path", path);
            } else if attributes.has("Local") && !attributes.has("Path") {
                attributes.set("Path", def.name.clone());
            } else if attributes.has("Path") && attributes.get("Path") == Some("") {
                attributes.set("Path", namespace.clone());
            }

            if let Some(ArgCount::Fixed(n)) = def.args {
                if !attributes.has("Args") {
                    attributes.insert("Args", n.to_string());
                }
            } else if let Some(ArgCount::Variadic) = def.args {
                if !attributes.has("Args") {
                    attributes.insert("Args", "");
                }
            }
            if let Some(n) = def.capture_args {
                if !attributes.has("CaptureArgs") {
                    attributes.insert("CaptureArgs", n.to_string());
                }
            }

            let private_name = format!("{namespace}/{}", def.name);

            if !def.valid {
                tracing::warn!(
                    private_name = %private_name,
                    "action's first parameter is not a context, skipped at registration and never reachable"
                );
            }

            let action = Action {
                private_name: private_name.clone(),
                namespace: namespace.clone(),
                name: def.name,
                attributes,
                args: def.args,
                capture_args: def.capture_args,
                valid: def.valid,
                handler: def.handler,
            };

            order.push(private_name.clone());
            by_name.insert(private_name, action);
        }

        Self { order, by_name }
    }

    pub fn get(&self, private_name: &str) -> Option<&Action<T>> {
        self.by_name.get(private_name)
    }

    /// Direct lookup used by `forward()` (§4.5 `command2Action`).
    pub fn command2action(&self, private_name: &str) -> Option<&Action<T>> {
        self.get(private_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action<T>> {
        self.order.iter().filter_map(move |name| self.by_name.get(name))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Standard 404 body, byte-for-byte per §7 / Property P7.
pub fn unknown_resource_body(path: &str) -> String {
    format!("Unknown resource '{path}'.")
}

pub fn unknown_resource_response(path: &str) -> Response {
    use crate::http::response::IntoResponse;
    use crate::http::StatusCode;
    (StatusCode::NOT_FOUND, unknown_resource_body(path)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_handler() -> ActionFn<()> {
        Arc::new(|_state, ctx| Box::pin(async move { (ctx, true) }))
    }

    #[test]
    fn attribute_map_preserves_insertion_order_and_repeats() {
        let mut attrs = AttributeMap::new();
        attrs.insert("Does", "ACL");
        attrs.insert("Does", "Cache");
        let vals: Vec<_> = attrs.get_all("Does").collect();
        assert_eq!(vals, vec!["ACL", "Cache"]);
    }

    #[test]
    fn global_marker_sets_absolute_path() {
        let defs = vec![(
            "test/controller".to_string(),
            ActionDef {
                name: "one".into(),
                attributes: {
                    let mut a = AttributeMap::new();
                    a.insert("Global", "global");
                    a
                },
                args: Some(ArgCount::Fixed(0)),
                capture_args: None,
                valid: true,
                handler: noop_handler(),
            },
        )];
        let registry = ActionRegistry::build(defs);
        let action = registry.get("test/controller/one").unwrap();
        assert_eq!(action.path_attr(), Some("/global"));
    }

    #[test]
    fn local_marker_derives_path_from_method_name() {
        let defs = vec![(
            "test/controller".to_string(),
            ActionDef {
                name: "one".into(),
                attributes: {
                    let mut a = AttributeMap::new();
                    a.insert("Local", "");
                    a
                },
                args: Some(ArgCount::Variadic),
                capture_args: None,
                valid: true,
                handler: noop_handler(),
            },
        )];
        let registry = ActionRegistry::build(defs);
        let action = registry.get("test/controller/one").unwrap();
        assert_eq!(action.path_attr(), Some("one"));
        assert_eq!(action.attributes.get("Args"), Some(""));
    }

    #[test]
    fn unknown_resource_body_matches_literal() {
        assert_eq!(
            unknown_resource_body("test/unknown"),
            "Unknown resource 'test/unknown'."
        );
    }
}
