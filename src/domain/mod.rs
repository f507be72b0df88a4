//! Domain layer: the car record, its identifier, validation rules, and
//! page normalization.
//!
//! Nothing in this module touches storage or HTTP; the service layer
//! combines these types with a [`crate::persistence::CarRepository`].

pub mod car;
pub mod car_id;
pub mod pagination;
pub mod validation;

pub use car::{Car, CarDraft, MAX_MANUFACTURING_VALUE};
pub use car_id::CarId;
pub use pagination::PageRequest;
pub use validation::ValidationError;
