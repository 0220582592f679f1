pub use r2e_http::middleware::{from_fn, from_fn_with_state, Next};
