//! Service layer
//!
//! Business logic invoked by route handlers, kept free of HTTP types.

pub mod lookup_service;

pub use lookup_service::{QueryHandler, ResponseOptions};
