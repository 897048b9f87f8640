//! Shared application state for Axum routers.

use std::sync::Arc;
use std::time::Instant;

use crate::services::QueryHandler;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<QueryHandler>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(handler: QueryHandler) -> Self {
        Self {
            handler: Arc::new(handler),
            start_time: Instant::now(),
        }
    }
}

crate::impl_from_ref!(Arc<QueryHandler>, handler);
crate::impl_from_ref!(Instant, start_time);
