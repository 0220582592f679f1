//! URI inversion (C7): turn a private action name (or a literal path) plus
//! captures/args/query back into a canonical absolute URL.
//!
//! Mirrors the forward dispatch pipeline's ownership rules: a dispatcher
//! that matched an action at freeze time is also the one asked to reverse
//! it (`DispatchType::uri_for`). A `/`-prefixed argument that isn't a known
//! private action name is passed through literally, trailing slash and all.

use crate::action::ActionRegistry;
use crate::dispatch::DispatchTypeSet;

/// Everything `uri_for` needs beyond the action/dispatcher tables.
#[derive(Debug, Default, Clone)]
pub struct UriForRequest {
    /// Either a `/`-prefixed literal path or a private action name.
    pub path_or_action_id: String,
    /// Captures threaded through a `Chained` action's hops, in hop order.
    pub captures: Vec<String>,
    /// Trailing endpoint args.
    pub args: Vec<String>,
    /// Query parameters, encoded and sorted by key before emission.
    pub query: Vec<(String, String)>,
    /// Host (and optional port) to build the absolute URL against.
    pub host: String,
}

/// Failure modes for [`uri_for`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UriForError {
    /// `path_or_action_id` named a known action, but the supplied
    /// captures/args didn't cover every slot in its chain.
    CapturesMismatch,
}

impl std::fmt::Display for UriForError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UriForError::CapturesMismatch => write!(f, "captures do not match the action's chain"),
        }
    }
}

impl std::error::Error for UriForError {}

/// Percent-encode one path segment per RFC 3986 (unreserved set kept
/// literal, everything else escaped, multibyte UTF-8 encoded byte-wise).
fn encode_segment(segment: &str) -> String {
    percent_encoding::utf8_percent_encode(segment, percent_encoding::NON_ALPHANUMERIC)
        .to_string()
        // percent_encoding over NON_ALPHANUMERIC escapes '/', '-', '_', '.',
        // '~' too; undo that for the handful of path-safe characters.
        .replace("%2D", "-")
        .replace("%5F", "_")
        .replace("%2E", ".")
        .replace("%7E", "~")
}

fn encode_path(raw_path: &str) -> String {
    raw_path
        .split('/')
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}

fn encode_query(query: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = query.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    sorted
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                percent_encoding::utf8_percent_encode(k, percent_encoding::NON_ALPHANUMERIC),
                percent_encoding::utf8_percent_encode(v, percent_encoding::NON_ALPHANUMERIC),
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Reverse `request` into a canonical absolute URL.
///
/// - Literal paths (`/`-prefixed, not a known action) pass through as-is,
///   including any trailing slash (Property P4's round-trip invariant).
/// - Known private action names are resolved through whichever dispatcher
///   owns them (`DispatchTypeSet::uri_for`).
pub fn uri_for<T>(
    request: &UriForRequest,
    registry: &ActionRegistry<T>,
    dispatchers: &DispatchTypeSet<T>,
) -> Result<String, UriForError> {
    let base = format!("http://{}", request.host);

    let is_literal_path = request.path_or_action_id.starts_with('/')
        && registry
            .get(request.path_or_action_id.trim_start_matches('/'))
            .is_none();

    let path = if is_literal_path {
        let raw = request.path_or_action_id.trim_start_matches('/');
        let trailing_slash = request.path_or_action_id.ends_with('/') && raw.len() > 1;
        let mut encoded = encode_path(raw);
        if trailing_slash && !encoded.ends_with('/') {
            encoded.push('/');
        }
        encoded
    } else {
        let private_name = request.path_or_action_id.trim_start_matches('/');
        let resolved = dispatchers
            .uri_for(registry, private_name, &request.captures, &request.args)
            .ok_or(UriForError::CapturesMismatch)?;
        encode_path(&resolved)
    };

    let mut url = format!("{base}/{path}");
    if !request.query.is_empty() {
        url.push('?');
        url.push_str(&encode_query(&request.query));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionDef, ArgCount, AttributeMap};
    use std::sync::Arc;

    fn noop() -> crate::action::ActionFn<()> {
        Arc::new(|_s, ctx| Box::pin(async move { (ctx, true) }))
    }

    /// Property P3's three-level chain, with the endpoint registered under
    /// `test/controller` so its private name matches the `uriForAction`
    /// scenario (`/test/controller/midleEnd`).
    fn chain_registry() -> ActionRegistry<()> {
        let mut root_attrs = AttributeMap::new();
        root_attrs.insert("Chained", "/");
        root_attrs.insert("PathPart", "chain");

        let mut midpoint_attrs = AttributeMap::new();
        midpoint_attrs.insert("Chained", "chain/root");
        midpoint_attrs.insert("PathPart", "midle");
        midpoint_attrs.insert("CaptureArgs", "2");

        let mut endpoint_attrs = AttributeMap::new();
        endpoint_attrs.insert("Chained", "chain/midle");
        endpoint_attrs.insert("PathPart", "end");

        ActionRegistry::build(vec![
            (
                "chain".to_string(),
                ActionDef {
                    name: "root".into(),
                    attributes: root_attrs,
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
                    attributes: midpoint_attrs,
                    args: None,
                    capture_args: Some(2),
                    valid: true,
                    handler: noop(),
                },
            ),
            (
                "test/controller".to_string(),
                ActionDef {
                    name: "midleEnd".into(),
                    attributes: endpoint_attrs,
                    args: Some(ArgCount::Variadic),
                    capture_args: None,
                    valid: true,
                    handler: noop(),
                },
            ),
        ])
    }

    fn frozen_dispatchers(registry: &ActionRegistry<()>) -> DispatchTypeSet<()> {
        let mut dispatchers = DispatchTypeSet::standard();
        dispatchers.freeze(registry);
        dispatchers
    }

    #[test]
    fn reverses_chained_action_with_captures_and_args() {
        let registry = chain_registry();
        let dispatchers = frozen_dispatchers(&registry);

        let request = UriForRequest {
            path_or_action_id: "/test/controller/midleEnd".to_string(),
            captures: vec!["1".to_string(), "2".to_string()],
            args: Vec::new(),
            query: Vec::new(),
            host: "127.0.0.1".to_string(),
        };

        let url = uri_for(&request, &registry, &dispatchers).unwrap();
        assert_eq!(url, "http://127.0.0.1/chain/midle/1/2/end");
    }

    #[test]
    fn fails_on_captures_mismatch() {
        let registry = chain_registry();
        let dispatchers = frozen_dispatchers(&registry);

        let request = UriForRequest {
            path_or_action_id: "/test/controller/midleEnd".to_string(),
            captures: vec!["1".to_string()],
            args: Vec::new(),
            query: Vec::new(),
            host: "127.0.0.1".to_string(),
        };

        assert_eq!(
            uri_for(&request, &registry, &dispatchers),
            Err(UriForError::CapturesMismatch)
        );
    }

    #[test]
    fn literal_path_passes_through_with_trailing_slash() {
        let registry: ActionRegistry<()> = ActionRegistry::build(Vec::new());
        let dispatchers = frozen_dispatchers(&registry);

        let request = UriForRequest {
            path_or_action_id: "/root/".to_string(),
            captures: Vec::new(),
            args: Vec::new(),
            query: Vec::new(),
            host: "127.0.0.1".to_string(),
        };

        let url = uri_for(&request, &registry, &dispatchers).unwrap();
        assert_eq!(url, "http://127.0.0.1/root/");
    }

    #[test]
    fn literal_plain_path_round_trips() {
        let registry: ActionRegistry<()> = ActionRegistry::build(Vec::new());
        let dispatchers = frozen_dispatchers(&registry);

        let request = UriForRequest {
            path_or_action_id: "/root".to_string(),
            captures: Vec::new(),
            args: Vec::new(),
            query: Vec::new(),
            host: "127.0.0.1".to_string(),
        };

        let url = uri_for(&request, &registry, &dispatchers).unwrap();
        assert_eq!(url, "http://127.0.0.1/root");
    }

    #[test]
    fn query_params_sorted_and_encoded() {
        let registry: ActionRegistry<()> = ActionRegistry::build(Vec::new());
        let dispatchers = frozen_dispatchers(&registry);

        let request = UriForRequest {
            path_or_action_id: "/search".to_string(),
            captures: Vec::new(),
            args: Vec::new(),
            query: vec![
                ("z".to_string(), "last".to_string()),
                ("a".to_string(), "héllo world".to_string()),
            ],
            host: "127.0.0.1".to_string(),
        };

        let url = uri_for(&request, &registry, &dispatchers).unwrap();
        assert_eq!(
            url,
            "http://127.0.0.1/search?a=h%C3%A9llo%20world&z=last"
        );
    }
}
