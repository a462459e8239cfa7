//! HTTP middleware

pub mod claims;

pub use claims::{resolve_claims, RequestContext};
