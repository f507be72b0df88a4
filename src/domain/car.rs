//! Car record and the business-field draft shared by create and update.

use chrono::{DateTime, Utc};

use super::{CarId, ValidationError};

/// Exclusive upper bound for a car's manufacturing value.
pub const MAX_MANUFACTURING_VALUE: f64 = 15_000_000.0;

/// A row of the `cars` table.
///
/// A record is *live* while `deleted_at` is `None`. Storage backends only
/// ever hand out live records; `deleted_at` is carried so that a row maps
/// onto this type column for column.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Car {
    /// Storage-assigned primary key.
    pub id: CarId,
    /// Model name, unique among live records.
    pub name: String,
    /// Manufacturer.
    pub brand: String,
    /// Manufacturing value, strictly between 0 and 15,000,000.
    pub manufacturing_value: f64,
    /// Free-form description.
    pub description: Option<String>,
    /// Insert timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Car {
    /// Returns `true` if the record has not been soft-deleted.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// Replaces every business field with the values from `draft`.
    ///
    /// A missing description in the draft clears the stored one; updates
    /// are full replacements, never patches.
    pub fn apply(&mut self, draft: CarDraft) {
        self.name = draft.name;
        self.brand = draft.brand;
        self.manufacturing_value = draft.manufacturing_value;
        self.description = draft.description;
    }
}

/// Business fields of a car, as supplied by a client.
#[derive(Debug, Clone, PartialEq)]
pub struct CarDraft {
    /// Model name.
    pub name: String,
    /// Manufacturer.
    pub brand: String,
    /// Manufacturing value.
    pub manufacturing_value: f64,
    /// Optional description.
    pub description: Option<String>,
}

impl CarDraft {
    /// Checks the field rules that apply to both create and update.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found, checking name, brand,
    /// then value.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.brand.is_empty() {
            return Err(ValidationError::EmptyBrand);
        }
        // NaN fails both comparisons, so it is rejected here too.
        if !(self.manufacturing_value > 0.0) {
            return Err(ValidationError::ValueNotPositive);
        }
        if !(self.manufacturing_value < MAX_MANUFACTURING_VALUE) {
            return Err(ValidationError::ValueTooLarge);
        }
        Ok(())
    }
}
