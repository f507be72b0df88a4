//! # car-service
//!
//! REST API for car records backed by PostgreSQL, with pagination,
//! filtering, input validation, and soft deletion.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)          parse path/query/body, map errors to status codes
//!     │
//!     ├── CarService (service/)         validation, uniqueness, existence checks
//!     │
//!     ├── CarRepository (persistence/)  one parameterized statement per access pattern
//!     │
//!     └── PostgreSQL  (or the in-memory repository)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod server;
pub mod service;
pub mod telemetry;
