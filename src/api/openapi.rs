//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use super::handlers::{cars, system};

/// Generated OpenAPI description, served by Swagger UI when the
/// `swagger-ui` feature is on.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "Car Service API",
        description = "CRUD over car records with pagination, filtering, validation, and soft deletion."
    ),
    paths(
        cars::list_cars,
        cars::create_car,
        cars::get_car,
        cars::get_car_by_name,
        cars::list_cars_by_brand,
        cars::list_cars_by_price_range,
        cars::update_car,
        cars::delete_car,
        system::health_handler,
    ),
    tags(
        (name = "Cars", description = "Car records"),
        (name = "System", description = "Operational endpoints"),
    )
)]
pub struct ApiDoc;
