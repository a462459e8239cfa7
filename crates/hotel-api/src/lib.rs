//! # Hotel API
//!
//! HTTP surface: claims middleware, tenant extractors, handlers, and the
//! mapping from tenant/domain failures to HTTP responses.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
