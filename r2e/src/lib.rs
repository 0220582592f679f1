//! R2E — a Quarkus-like ergonomic layer over Axum, built around a
//! request dispatch core: declarative controllers, chained/path/index/
//! default matching, and an action-chain lifecycle driver.
//!
//! This facade crate re-exports the R2E sub-crates through a single
//! dependency with feature flags. Import everything you need with:
//!
//! ```ignore
//! use r2e::prelude::*;
//! ```
//!
//! # Feature flags
//!
//! | Feature      | Default | Crate                     |
//! |--------------|---------|---------------------------|
//! | `utils`      | **yes** | `r2e-utils`               |
//! | `validation` | no      | `r2e-core/validation`     |
//! | `ws`         | no      | `r2e-core/ws`             |
//! | `multipart`  | no      | `r2e-core/multipart`      |
//! | `full`       | no      | All of the above          |

// Re-export sub-crates as public modules so they're accessible as
// `r2e::r2e_core`, `r2e::r2e_http`, etc.
//
// The proc macros use `proc-macro-crate` to detect whether the user depends
// on `r2e` (facade) or individual crates, and generate the correct paths.
pub extern crate r2e_core;
pub extern crate r2e_http;
pub extern crate r2e_macros;

// Re-export everything from r2e-core at the top level for convenience.
pub use r2e_core::*;

#[cfg(feature = "utils")]
pub use r2e_utils;

/// Convenience type aliases re-exported from `r2e-core`.
pub mod types {
    pub use r2e_core::types::*;
}

/// Unified prelude — import everything with `use r2e::prelude::*`.
///
/// Includes the core prelude plus types from the enabled feature crates.
pub mod prelude {
    pub use r2e_core::prelude::*;
    pub use crate::types::*;

    #[cfg(feature = "utils")]
    pub use r2e_utils::prelude::*;
}
