//! Controller namespace derivation (Property P1) and the [`Controller`]
//! trait that groups a struct's actions for registration into the
//! [`ActionRegistry`](crate::action::ActionRegistry).

use crate::action::ActionDef;

/// Derive a controller's namespace from its Rust type name by the rule in
/// §3 / Property P1: split on case boundaries inserting `/`, treat
/// consecutive uppercase runs as a single lowercase segment, and preserve
/// underscores (they are not case boundaries).
///
/// `::`-qualified names (as produced by `module_path!()`-style identifiers)
/// are split into further segments first.
///
/// ```
/// # use r2e_core::controller::derive_namespace;
/// assert_eq!(derive_namespace("ApiV1Users"), "api/v1/users");
/// assert_eq!(derive_namespace("Use_Some_Underscores"), "use_some_underscores");
/// assert_eq!(derive_namespace("UppercaseREST"), "uppercase/rest");
/// assert_eq!(derive_namespace("ApiV1::NamespacedController"), "api/v1/namespaced/controller");
/// ```
pub fn derive_namespace(class_name: &str) -> String {
    class_name
        .split("::")
        .map(derive_segment)
        .collect::<Vec<_>>()
        .join("/")
}

fn derive_segment(segment: &str) -> String {
    let chars: Vec<char> = segment.chars().collect();
    let mut out = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '_' {
            out.push('_');
            i += 1;
            continue;
        }

        if !out.is_empty() && !out.ends_with('/') && !out.ends_with('_') && c.is_uppercase() {
            out.push('/');
        }

        if c.is_uppercase() {
            // Consume the full uppercase run as one coalesced lowercase
            // segment: `UppercaseREST` -> `uppercase`, `rest`, not
            // `uppercase`, `r`, `e`, `s`, `t`.
            let start = i;
            while i < chars.len() && chars[i].is_uppercase() {
                i += 1;
            }
            // If the run is immediately followed by a lowercase letter and
            // is more than one char, the last uppercase char belongs to the
            // next word (standard "acronym + word" boundary, e.g.
            // `ApiV1Users`: `V1` + `Users`... but digits are not uppercase,
            // so this only matters for multi-letter runs like `RESTApi`).
            if i - start > 1 && i < chars.len() && chars[i].is_lowercase() {
                i -= 1;
                out.push_str(
                    &chars[start..i]
                        .iter()
                        .collect::<String>()
                        .to_lowercase(),
                );
                out.push('/');
            } else {
                out.push_str(
                    &chars[start..i]
                        .iter()
                        .collect::<String>()
                        .to_lowercase(),
                );
            }
            continue;
        }

        out.push(c);
        i += 1;
    }

    out
}

/// Groups related actions under one namespace. Implemented by
/// `#[derive(Controller)]` + `#[routes]` generated code (see `r2e-macros`);
/// hand-written implementations are equally valid.
///
/// `routes()` is the teacher's original axum-native registration surface
/// (the `#[routes]` macro emits it for every controller, producing a typed,
/// zero-reflection `axum::Router` fragment). `actions()` is the dispatch
/// core's own registration surface (§4.1 / C1): the explicit-builder-API
/// alternative to reflection described in the design notes, populated by
/// hand-written `Controller` implementations that want Cutelyst-style
/// dynamic dispatch (Path/Chained/Index/Default) instead of, or alongside,
/// direct axum routing. A controller is free to implement one, the other,
/// or both; both default to contributing nothing.
pub trait Controller<T>: Send + Sync + 'static {
    /// Explicit namespace override, or `None` to fall back to
    /// [`derive_namespace`] applied to the Rust type name.
    fn namespace() -> Option<String> {
        None
    }

    /// The effective namespace: the explicit override if present, else
    /// derived from [`std::any::type_name`].
    fn resolved_namespace() -> String {
        Self::namespace().unwrap_or_else(|| derive_namespace(short_type_name::<Self>()))
    }

    /// All actions this controller contributes to the dispatch core's
    /// [`ActionRegistry`](crate::action::ActionRegistry), including the
    /// special lifecycle actions `Begin`/`Auto`/`End` if overridden. Empty
    /// by default — axum-routed controllers generated by `#[routes]` don't
    /// populate this unless they also hand-register actions.
    fn actions() -> Vec<ActionDef<T>> {
        Vec::new()
    }

    /// The axum route fragment this controller contributes, generated by
    /// the `#[routes]` macro. Controllers that only use the dispatch core
    /// (via `actions()`) can leave this at its default (no routes).
    fn routes() -> crate::http::Router<T> {
        crate::http::Router::new()
    }

    /// Push this controller's OpenAPI/introspection metadata into the
    /// shared registry. No-op by default.
    fn register_meta(_registry: &mut crate::meta::MetaRegistry) {}

    /// Wrap `router` with any pre-auth guard middleware this controller's
    /// routes declared. Identity by default.
    fn apply_pre_auth_guards(router: crate::http::Router<T>, _state: &T) -> crate::http::Router<T> {
        router
    }

    /// Start any event consumers this controller declared via `#[consumer]`.
    /// No-op by default.
    fn register_consumers(_state: T) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send>> {
        Box::pin(async {})
    }

    /// Boxed `#[scheduled]` task definitions, type-erased so the core
    /// doesn't need to depend on the scheduler crate. Empty by default.
    fn scheduled_tasks_boxed(_state: &T) -> Vec<Box<dyn std::any::Any + Send>> {
        Vec::new()
    }

    /// Validate any `#[config]`/`#[config_section]` keys this controller
    /// declared against the loaded configuration. No errors by default.
    fn validate_config(_config: &crate::config::R2eConfig) -> Vec<crate::config::MissingKeyError> {
        Vec::new()
    }
}

fn short_type_name<C: ?Sized>() -> &'static str {
    let full = std::any::type_name::<C>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Constructs `Self` purely from application state `T`, used for
/// controllers with no injected identity (the common case).
pub trait StatefulConstruct<T>: Sized {
    fn construct(state: &T) -> Self;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_camel_case() {
        assert_eq!(derive_namespace("ApiV1Users"), "api/v1/users");
    }

    #[test]
    fn underscores_preserved() {
        assert_eq!(derive_namespace("Use_Some_Underscores"), "use_some_underscores");
    }

    #[test]
    fn consecutive_uppercase_coalesced() {
        assert_eq!(derive_namespace("UppercaseREST"), "uppercase/rest");
    }

    #[test]
    fn double_colon_namespacing() {
        assert_eq!(
            derive_namespace("ApiV1::NamespacedController"),
            "api/v1/namespaced/controller"
        );
    }

    #[test]
    fn single_word() {
        assert_eq!(derive_namespace("Root"), "root");
    }
}
