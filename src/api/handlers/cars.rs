//! Car CRUD handlers: create, list, filter, get, update, delete.
//!
//! Handlers only parse transport-level input; every business rule lives
//! in [`crate::service::CarService`].

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{CarRequest, CarResponse, ListCarsParams, PriceRangeParams};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, ServiceError};

/// `POST /cars`: Create a car.
///
/// # Errors
///
/// Returns [`ServiceError`] on an invalid body, a duplicate name, or a
/// storage failure.
#[utoipa::path(
    post,
    path = "/api/v1/cars",
    tag = "Cars",
    summary = "Create a car",
    description = "Validates the payload, rejects names already used by a live car, and returns the stored record.",
    request_body = CarRequest,
    responses(
        (status = 201, description = "Car created", body = CarResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 409, description = "Name already in use", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn create_car(
    State(state): State<AppState>,
    payload: Result<Json<CarRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let Json(req) = payload.map_err(invalid_payload)?;
    let car = state.car_service.create_car(req.into()).await?;
    Ok((StatusCode::CREATED, Json(CarResponse::from(car))))
}

/// `GET /cars`: List live cars one page at a time.
///
/// # Errors
///
/// Returns [`ServiceError::Storage`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/cars",
    tag = "Cars",
    summary = "List cars",
    description = "Returns live cars ordered by id. Out-of-range page values are clamped: page < 1 becomes 1, pageSize outside 1..=100 becomes 10.",
    params(ListCarsParams),
    responses(
        (status = 200, description = "One page of cars", body = Vec<CarResponse>),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn list_cars(
    State(state): State<AppState>,
    Query(params): Query<ListCarsParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let cars = state
        .car_service
        .list_cars(params.page(), params.page_size())
        .await?;
    Ok(Json(to_responses(cars)))
}

/// `GET /cars/{id}`: Get a car by id.
///
/// # Errors
///
/// Returns [`ServiceError::InvalidRequest`] for a malformed id and
/// [`ServiceError::CarNotFound`] if no live car has it.
#[utoipa::path(
    get,
    path = "/api/v1/cars/{id}",
    tag = "Cars",
    summary = "Get a car",
    params(
        ("id" = i64, Path, description = "Car ID"),
    ),
    responses(
        (status = 200, description = "Car details", body = CarResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Car not found", body = ErrorResponse),
    )
)]
pub async fn get_car(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = parse_car_id(&raw_id)?;
    let car = state.car_service.get_car(id).await?;
    Ok(Json(CarResponse::from(car)))
}

/// `GET /cars/name/{name}`: Get a car by name.
///
/// # Errors
///
/// Returns [`ServiceError::CarNotFound`] if no live car has the name.
#[utoipa::path(
    get,
    path = "/api/v1/cars/name/{name}",
    tag = "Cars",
    summary = "Get a car by name",
    params(
        ("name" = String, Path, description = "Car name"),
    ),
    responses(
        (status = 200, description = "Car details", body = CarResponse),
        (status = 404, description = "Car not found", body = ErrorResponse),
    )
)]
pub async fn get_car_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let car = state.car_service.get_car_by_name(&name).await?;
    Ok(Json(CarResponse::from(car)))
}

/// `GET /cars/brand/{brand}`: List live cars of a brand.
///
/// # Errors
///
/// Returns [`ServiceError::Storage`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/cars/brand/{brand}",
    tag = "Cars",
    summary = "List cars by brand",
    description = "Returns an empty array when no live car has the brand.",
    params(
        ("brand" = String, Path, description = "Brand name"),
    ),
    responses(
        (status = 200, description = "Matching cars", body = Vec<CarResponse>),
        (status = 400, description = "Empty brand", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn list_cars_by_brand(
    State(state): State<AppState>,
    Path(brand): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let cars = state.car_service.list_cars_by_brand(&brand).await?;
    Ok(Json(to_responses(cars)))
}

/// `GET /cars/price-range`: List live cars within a value range.
///
/// # Errors
///
/// Returns [`ServiceError::InvalidRequest`] for missing, non-numeric,
/// negative, or inverted bounds.
#[utoipa::path(
    get,
    path = "/api/v1/cars/price-range",
    tag = "Cars",
    summary = "List cars by price range",
    description = "Both bounds are inclusive.",
    params(PriceRangeParams),
    responses(
        (status = 200, description = "Matching cars", body = Vec<CarResponse>),
        (status = 400, description = "Invalid bounds", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn list_cars_by_price_range(
    State(state): State<AppState>,
    Query(params): Query<PriceRangeParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let start = parse_price(params.start_price.as_deref(), "startPrice")?;
    let end = parse_price(params.final_price.as_deref(), "finalPrice")?;
    if end < start {
        tracing::warn!(start, end, "rejected inverted price range");
        return Err(ServiceError::InvalidRequest(
            "finalPrice must not be less than startPrice".to_string(),
        ));
    }

    let cars = state
        .car_service
        .list_cars_by_price_range(start, end)
        .await?;
    Ok(Json(to_responses(cars)))
}

/// `PUT /cars/{id}`: Replace a car's fields.
///
/// # Errors
///
/// Returns [`ServiceError`] on a malformed id or body, a missing car, a
/// name clash, or a storage failure.
#[utoipa::path(
    put,
    path = "/api/v1/cars/{id}",
    tag = "Cars",
    summary = "Update a car",
    description = "Full replacement of name, brand, manufacturing_value, and description.",
    params(
        ("id" = i64, Path, description = "Car ID"),
    ),
    request_body = CarRequest,
    responses(
        (status = 200, description = "Updated car", body = CarResponse),
        (status = 400, description = "Invalid id or payload", body = ErrorResponse),
        (status = 404, description = "Car not found", body = ErrorResponse),
        (status = 409, description = "Name already in use", body = ErrorResponse),
    )
)]
pub async fn update_car(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<CarRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = parse_car_id(&raw_id)?;
    let Json(req) = payload.map_err(invalid_payload)?;
    let car = state.car_service.update_car(id, req.into()).await?;
    Ok(Json(CarResponse::from(car)))
}

/// `DELETE /cars/{id}`: Soft-delete a car.
///
/// # Errors
///
/// Returns [`ServiceError::CarNotFound`] if no live car has the id.
#[utoipa::path(
    delete,
    path = "/api/v1/cars/{id}",
    tag = "Cars",
    summary = "Delete a car",
    description = "Marks the car deleted; it disappears from every query.",
    params(
        ("id" = i64, Path, description = "Car ID"),
    ),
    responses(
        (status = 204, description = "Car deleted"),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Car not found", body = ErrorResponse),
    )
)]
pub async fn delete_car(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let id = parse_car_id(&raw_id)?;
    state.car_service.delete_car(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Car routes, mounted under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cars", get(list_cars).post(create_car))
        .route("/cars/price-range", get(list_cars_by_price_range))
        .route("/cars/name/{name}", get(get_car_by_name))
        .route("/cars/brand/{brand}", get(list_cars_by_brand))
        .route(
            "/cars/{id}",
            get(get_car).put(update_car).delete(delete_car),
        )
}

// ── Parsing Helpers ─────────────────────────────────────────────────────

fn to_responses(cars: Vec<crate::domain::Car>) -> Vec<CarResponse> {
    cars.into_iter().map(CarResponse::from).collect()
}

fn invalid_payload(rejection: JsonRejection) -> ServiceError {
    let reason = rejection.body_text();
    tracing::warn!(%reason, "rejected request payload");
    ServiceError::InvalidRequest(format!("invalid request payload: {reason}"))
}

/// Parses a path id. Sign checks are left to the service.
fn parse_car_id(raw: &str) -> Result<i64, ServiceError> {
    raw.parse().map_err(|_| {
        tracing::warn!(raw, "rejected non-numeric car id");
        ServiceError::InvalidRequest(format!("invalid car ID: {raw}"))
    })
}

/// Parses a required, finite price bound.
fn parse_price(raw: Option<&str>, field: &'static str) -> Result<f64, ServiceError> {
    let Some(raw) = raw else {
        tracing::warn!(field, "missing price bound");
        return Err(ServiceError::InvalidRequest(format!("{field} is required")));
    };
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => {
            tracing::warn!(field, raw, "rejected price bound");
            Err(ServiceError::InvalidRequest(format!("invalid {field}: {raw}")))
        }
    }
}
