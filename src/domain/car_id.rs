//! Type-safe car identifier.
//!
//! [`CarId`] is a newtype wrapper around the `BIGSERIAL` primary key of the
//! `cars` table so that car identifiers cannot be confused with page
//! numbers, counts, or other integers flowing through the service.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ValidationError;

/// Unique identifier for a car record.
///
/// Assigned by the storage engine on insert and immutable thereafter.
/// Valid identifiers are strictly positive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
    sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct CarId(i64);

impl CarId {
    /// Wraps a raw identifier without checking its sign.
    ///
    /// Used by storage backends, which only ever hand out positive ids.
    #[must_use]
    pub const fn from_raw(id: i64) -> Self {
        Self(id)
    }

    /// Returns the inner integer.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for CarId {
    type Error = ValidationError;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        if id <= 0 {
            return Err(ValidationError::InvalidId(id));
        }
        Ok(Self(id))
    }
}

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<CarId> for i64 {
    fn from(id: CarId) -> Self {
        id.0
    }
}
