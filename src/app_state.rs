//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::CarService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Car service for all business logic.
    pub car_service: Arc<dyn CarService>,
}

impl AppState {
    /// Wraps a car service for handler injection.
    #[must_use]
    pub fn new(car_service: Arc<dyn CarService>) -> Self {
        Self { car_service }
    }
}
