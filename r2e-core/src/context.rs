//! The per-request [`Context`] (C6) and its typed [`Stash`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::http::{HeaderMap, Uri};

/// A tagged value stored in the [`Stash`].
///
/// Modeled as a closed sum rather than `Box<dyn Any>` so that plugins can
/// introspect stash contents (for logging, templating, etc.) without
/// depending on concrete Rust types — only the `Opaque` variant escapes into
/// a downcast.
#[derive(Clone)]
pub enum StashValue {
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Bytes(Vec<u8>),
    String(String),
    List(Vec<StashValue>),
    Map(HashMap<String, StashValue>),
    Opaque(Arc<dyn std::any::Any + Send + Sync>),
}

/// Error returned when a stash value doesn't match the requested accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StashTypeError {
    pub key: String,
    pub expected: &'static str,
}

impl std::fmt::Display for StashTypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stash key '{}' is not a {}", self.key, self.expected)
    }
}

impl std::error::Error for StashTypeError {}

/// Per-request string-keyed heterogeneous map, shared across the action
/// chain. Cleared on context destruction; never escapes the request
/// (invariant iii in §3).
#[derive(Clone, Default)]
pub struct Stash {
    values: HashMap<String, StashValue>,
}

impl Stash {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: StashValue) {
        self.values.insert(key.into(), value);
    }

    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.set(key, StashValue::String(value.into()));
    }

    pub fn set_opaque<T: std::any::Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.set(key, StashValue::Opaque(Arc::new(value)));
    }

    pub fn get(&self, key: &str) -> Option<&StashValue> {
        self.values.get(key)
    }

    pub fn get_string(&self, key: &str) -> Result<&str, StashTypeError> {
        match self.values.get(key) {
            Some(StashValue::String(s)) => Ok(s.as_str()),
            _ => Err(StashTypeError {
                key: key.to_string(),
                expected: "string",
            }),
        }
    }

    pub fn get_integer(&self, key: &str) -> Result<i64, StashTypeError> {
        match self.values.get(key) {
            Some(StashValue::Integer(v)) => Ok(*v),
            _ => Err(StashTypeError {
                key: key.to_string(),
                expected: "integer",
            }),
        }
    }

    pub fn get_opaque<T: 'static>(&self, key: &str) -> Result<&T, StashTypeError> {
        match self.values.get(key) {
            Some(StashValue::Opaque(v)) => v.downcast_ref::<T>().ok_or(StashTypeError {
                key: key.to_string(),
                expected: std::any::type_name::<T>(),
            }),
            _ => Err(StashTypeError {
                key: key.to_string(),
                expected: "opaque",
            }),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<StashValue> {
        self.values.remove(key)
    }
}

/// One resolved chain link to invoke, with the captures/args consumed for it.
#[derive(Clone)]
pub struct ChainLink {
    pub private_name: String,
    pub captures: Vec<String>,
}

/// An error recorded on the context during action dispatch (§7).
#[derive(Debug, Clone)]
pub struct DispatchError {
    pub message: String,
}

/// The mutable per-request object, exclusively owned by the lifecycle driver
/// for one request's duration (§3 `Context`).
pub struct Context {
    pub method: String,
    pub raw_path: String,
    pub headers: HeaderMap,
    pub uri: Uri,

    /// The match string recorded by whichever dispatcher matched.
    pub match_string: Option<String>,
    /// The chain of actions to invoke, in order (length 1 for Path/Index/Default).
    pub action_chain: Vec<ChainLink>,
    /// Index of the currently executing link within `action_chain`.
    pub current_link: usize,

    pub args: Vec<String>,
    pub captures: Vec<String>,

    pub stash: Stash,
    pub errors: Vec<DispatchError>,
    pub detached: bool,
    /// The boolean "continue" state of the last invoked action (§4.5, `setState`).
    pub state: bool,

    /// Per-request forward/detach invocation stack (for diagnostics and
    /// recursion accounting).
    pub forward_stack: Vec<String>,

    pub response_status: Option<u16>,
    pub response_body: Option<Vec<u8>>,
    pub response_headers: Vec<(String, String)>,
    /// Set by `redirect()`; finalize_headers (§4.6) turns this into a
    /// `Location` header and, if the body is still empty, a standard
    /// "Moved" HTML page.
    pub response_location: Option<String>,
    /// `Set-Cookie` values, emitted in push order (§5 header ordering
    /// guarantee for multi-value headers).
    pub response_cookies: Vec<String>,
}

impl Context {
    pub fn new(method: impl Into<String>, raw_path: impl Into<String>, uri: Uri, headers: HeaderMap) -> Self {
        Self {
            method: method.into(),
            raw_path: raw_path.into(),
            headers,
            uri,
            match_string: None,
            action_chain: Vec::new(),
            current_link: 0,
            args: Vec::new(),
            captures: Vec::new(),
            stash: Stash::new(),
            errors: Vec::new(),
            detached: false,
            state: true,
            forward_stack: Vec::new(),
            response_status: None,
            response_body: None,
            response_headers: Vec::new(),
            response_location: None,
            response_cookies: Vec::new(),
        }
    }

    pub fn detach(&mut self) {
        self.detached = true;
    }

    pub fn set_status(&mut self, status: u16) {
        self.response_status = Some(status);
    }

    pub fn write_body(&mut self, body: impl Into<Vec<u8>>) {
        self.response_body = Some(body.into());
    }

    pub fn set_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.response_headers.push((key.into(), value.into()));
    }

    pub fn add_cookie(&mut self, set_cookie_value: impl Into<String>) {
        self.response_cookies.push(set_cookie_value.into());
    }

    /// Sets `Location` and the redirect status (302 by default), mirroring
    /// the source's `CutelystResponse::redirect`.
    pub fn redirect(&mut self, url: impl Into<String>) {
        self.redirect_with_status(url, 302);
    }

    pub fn redirect_with_status(&mut self, url: impl Into<String>, status: u16) {
        self.response_location = Some(url.into());
        self.response_status = Some(status);
    }

    pub fn set_state(&mut self, state: bool) {
        self.state = state;
    }

    pub fn push_error(&mut self, message: impl Into<String>) {
        self.errors.push(DispatchError {
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn current_action_name(&self) -> Option<&str> {
        self.action_chain
            .get(self.current_link)
            .map(|link| link.private_name.as_str())
    }
}

/// Resolved match, handed from the dispatchers (C2-C4) to the orchestrator (C5).
pub struct DispatchResult {
    pub chain: Vec<ChainLink>,
    pub match_string: String,
    pub args: Vec<String>,
}
