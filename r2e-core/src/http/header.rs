pub use r2e_http::header::{
    HeaderName, HeaderValue, Parts,
    // Common header constants
    ACCEPT, AUTHORIZATION, CACHE_CONTROL, CONNECTION, CONTENT_LENGTH, CONTENT_TYPE, COOKIE, HOST,
    LOCATION, ORIGIN, REFERER, SET_COOKIE, USER_AGENT,
};
pub use r2e_http::header::{HeaderMap, HttpRequest, Method, StatusCode};
