pub use r2e_http::response::{Html, IntoResponse, Redirect, Response, Sse, SseEvent, SseKeepAlive};
