pub use r2e_http::Body;
