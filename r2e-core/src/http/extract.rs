pub use r2e_http::extract::{
    ConnectInfo, DefaultBodyLimit, FromRef, FromRequest, FromRequestParts, MatchedPath,
    OriginalUri, Path, Query, RawPathParams, Request, State,
};
pub use r2e_http::extract::Form;

#[cfg(feature = "multipart")]
pub use r2e_http::extract::Multipart;
