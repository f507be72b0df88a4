//! Car DTOs: request body, response body, and query parameters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Car, CarDraft, CarId};

/// Request body for `POST /cars` and `PUT /cars/{id}`.
///
/// Updates are full replacements: omitting `description` clears it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CarRequest {
    /// Model name, unique among live cars.
    #[schema(example = "Model S")]
    pub name: String,
    /// Manufacturer.
    #[schema(example = "Tesla")]
    pub brand: String,
    /// Manufacturing value, strictly between 0 and 15,000,000.
    #[schema(example = 79990.0)]
    pub manufacturing_value: f64,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

impl From<CarRequest> for CarDraft {
    fn from(req: CarRequest) -> Self {
        Self {
            name: req.name,
            brand: req.brand,
            manufacturing_value: req.manufacturing_value,
            description: req.description,
        }
    }
}

/// A car as returned by every successful car endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CarResponse {
    /// Storage-assigned identifier.
    pub id: CarId,
    /// Model name.
    pub name: String,
    /// Manufacturer.
    pub brand: String,
    /// Manufacturing value.
    pub manufacturing_value: f64,
    /// Description, omitted when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Creation timestamp (RFC 3339).
    pub created_at: DateTime<Utc>,
    /// Last update timestamp (RFC 3339).
    pub updated_at: DateTime<Utc>,
}

impl From<Car> for CarResponse {
    fn from(car: Car) -> Self {
        Self {
            id: car.id,
            name: car.name,
            brand: car.brand,
            manufacturing_value: car.manufacturing_value,
            description: car.description,
            created_at: car.created_at,
            updated_at: car.updated_at,
        }
    }
}

/// Pagination query parameters for `GET /cars`.
///
/// Values are kept raw so that unparsable input falls back to the
/// defaults instead of failing the request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCarsParams {
    /// Page number (1-indexed). Defaults to 1.
    #[param(value_type = Option<i64>)]
    pub page: Option<String>,
    /// Items per page, 1 to 100. Defaults to 10.
    #[serde(rename = "pageSize")]
    #[param(value_type = Option<i64>)]
    pub page_size: Option<String>,
}

impl ListCarsParams {
    /// Requested page, or 1 when missing or not an integer.
    #[must_use]
    pub fn page(&self) -> i64 {
        lenient_int(self.page.as_deref(), 1)
    }

    /// Requested page size, or 10 when missing or not an integer.
    #[must_use]
    pub fn page_size(&self) -> i64 {
        lenient_int(self.page_size.as_deref(), 10)
    }
}

fn lenient_int(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

/// Query parameters for `GET /cars/price-range`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PriceRangeParams {
    /// Inclusive lower bound.
    #[serde(rename = "startPrice")]
    #[param(value_type = f64)]
    pub start_price: Option<String>,
    /// Inclusive upper bound; must not be below `startPrice`.
    #[serde(rename = "finalPrice")]
    #[param(value_type = f64)]
    pub final_price: Option<String>,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn request_without_description_deserializes() {
        let json = r#"{"name":"Model S","brand":"Tesla","manufacturing_value":79990.0}"#;
        let Ok(req) = serde_json::from_str::<CarRequest>(json) else {
            panic!("valid body");
        };
        assert_eq!(req.description, None);
        let draft = CarDraft::from(req);
        assert_eq!(draft.name, "Model S");
    }

    #[test]
    fn request_missing_value_is_rejected() {
        let json = r#"{"name":"Model S","brand":"Tesla"}"#;
        assert!(serde_json::from_str::<CarRequest>(json).is_err());
    }

    #[test]
    fn response_omits_missing_description() {
        let now = Utc::now();
        let response = CarResponse::from(Car {
            id: CarId::from_raw(5),
            name: "Civic".to_string(),
            brand: "Honda".to_string(),
            manufacturing_value: 22_000.0,
            description: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        });
        let Ok(value) = serde_json::to_value(&response) else {
            panic!("serializable");
        };
        assert_eq!(value.get("id"), Some(&serde_json::json!(5)));
        assert!(value.get("description").is_none());
        assert!(value.get("deleted_at").is_none());
    }

    #[test]
    fn unparsable_page_values_use_defaults() {
        let params = ListCarsParams {
            page: Some("abc".to_string()),
            page_size: None,
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.page_size(), 10);

        let params = ListCarsParams {
            page: Some("3".to_string()),
            page_size: Some("25".to_string()),
        };
        assert_eq!(params.page(), 3);
        assert_eq!(params.page_size(), 25);
    }
}
