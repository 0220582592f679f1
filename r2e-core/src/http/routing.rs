pub use r2e_http::routing::{
    any, delete, get, head, method_routing, options, patch, post, put, trace, MethodRouter, Route,
};
