//! Service layer: business logic orchestration.
//!
//! [`CarService`] is the capability the HTTP handlers call; [`CarCatalog`]
//! implements it over any [`crate::persistence::CarRepository`].

pub mod car_service;

pub use car_service::{CarCatalog, CarService};
