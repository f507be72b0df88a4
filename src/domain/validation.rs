//! Field-level validation failures for car input.

/// A car field or identifier that violates a business rule.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Identifiers must be strictly positive.
    #[error("invalid car ID: {0}")]
    InvalidId(i64),

    /// The name field was empty.
    #[error("car name is required")]
    EmptyName,

    /// The brand field was empty.
    #[error("car brand is required")]
    EmptyBrand,

    /// The manufacturing value was zero, negative, or not a number.
    #[error("manufacturing value must be greater than 0")]
    ValueNotPositive,

    /// The manufacturing value reached the 15,000,000 ceiling.
    #[error("manufacturing value must be less than 15,000,000")]
    ValueTooLarge,

    /// A price-range bound was negative or the range was inverted.
    #[error("invalid price range: {min} to {max}")]
    InvalidPriceRange {
        /// Lower bound as supplied.
        min: f64,
        /// Upper bound as supplied.
        max: f64,
    },
}
