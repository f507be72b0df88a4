//! Data Transfer Objects for REST request/response serialization.
//!
//! DTOs are the wire shape; conversions to and from the domain types live
//! next to them.

pub mod car_dto;

pub use car_dto::*;
