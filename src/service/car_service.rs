//! Car service: validation and orchestration over a [`CarRepository`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Car, CarDraft, CarId, PageRequest, ValidationError};
use crate::error::{CarLookup, ServiceError};
use crate::persistence::{CarRepository, RepositoryError};

/// Business operations on cars, as consumed by the HTTP handlers.
#[async_trait]
pub trait CarService: Send + Sync + std::fmt::Debug {
    /// Validates `draft`, rejects a duplicate live name, inserts, and
    /// returns the stored record.
    async fn create_car(&self, draft: CarDraft) -> Result<Car, ServiceError>;

    /// Fetches a live car by id.
    async fn get_car(&self, id: i64) -> Result<Car, ServiceError>;

    /// Fetches a live car by name.
    async fn get_car_by_name(&self, name: &str) -> Result<Car, ServiceError>;

    /// Lists live cars of a brand.
    async fn list_cars_by_brand(&self, brand: &str) -> Result<Vec<Car>, ServiceError>;

    /// Lists live cars whose value lies within `[min, max]`.
    async fn list_cars_by_price_range(&self, min: f64, max: f64)
    -> Result<Vec<Car>, ServiceError>;

    /// Lists one page of live cars; out-of-range input is clamped.
    async fn list_cars(&self, page: i64, page_size: i64) -> Result<Vec<Car>, ServiceError>;

    /// Replaces the business fields of a live car and returns the stored
    /// record.
    async fn update_car(&self, id: i64, draft: CarDraft) -> Result<Car, ServiceError>;

    /// Soft-deletes a live car.
    async fn delete_car(&self, id: i64) -> Result<(), ServiceError>;
}

/// Default [`CarService`] implementation.
///
/// Stateless coordinator: every method validates, calls the repository
/// one statement at a time, and logs the outcome. The name-uniqueness
/// lookup and the existence checks are separate statements and not
/// atomic with the write that follows; the storage layer re-checks
/// (unique index on live names, `deleted_at IS NULL` predicates) and its
/// verdict wins.
#[derive(Debug, Clone)]
pub struct CarCatalog {
    repository: Arc<dyn CarRepository>,
}

impl CarCatalog {
    /// Creates a catalog over the given repository.
    #[must_use]
    pub fn new(repository: Arc<dyn CarRepository>) -> Self {
        Self { repository }
    }

    fn car_id(id: i64) -> Result<CarId, ServiceError> {
        CarId::try_from(id).map_err(|err| {
            tracing::warn!(id, "rejected invalid car id");
            ServiceError::from(err)
        })
    }

    /// Fetches a live car, mapping a missing row to `CarNotFound`.
    async fn fetch(&self, id: CarId, operation: &'static str) -> Result<Car, ServiceError> {
        self.repository
            .get_by_id(id)
            .await
            .map_err(|err| storage_failure(err, operation, CarLookup::Id(id)))
    }
}

/// Turns a repository failure into a service error and logs it.
fn storage_failure(err: RepositoryError, operation: &'static str, lookup: CarLookup) -> ServiceError {
    match err {
        RepositoryError::NotFound => {
            tracing::warn!(operation, %lookup, "car not found");
            ServiceError::CarNotFound(lookup)
        }
        RepositoryError::Conflict(name) => {
            tracing::warn!(operation, name = %name, "duplicate car name");
            ServiceError::DuplicateName(name)
        }
        RepositoryError::Database(err) => {
            tracing::error!(operation, %lookup, error = %err, "storage failure");
            ServiceError::Storage(err.to_string())
        }
    }
}

/// Turns a failure of a listing query into a service error and logs it.
fn listing_failure(err: RepositoryError, operation: &'static str) -> ServiceError {
    tracing::error!(operation, error = %err, "storage failure");
    ServiceError::Storage(err.to_string())
}

fn validate(draft: &CarDraft, operation: &'static str) -> Result<(), ServiceError> {
    draft.validate().map_err(|err| {
        tracing::warn!(operation, name = %draft.name, reason = %err, "rejected car payload");
        ServiceError::from(err)
    })
}

#[async_trait]
impl CarService for CarCatalog {
    async fn create_car(&self, draft: CarDraft) -> Result<Car, ServiceError> {
        const OP: &str = "create_car";
        validate(&draft, OP)?;

        let existing = self.repository.get_by_name(&draft.name).await;
        match existing {
            Ok(_) => {
                tracing::warn!(operation = OP, name = %draft.name, "duplicate car name");
                return Err(ServiceError::DuplicateName(draft.name));
            }
            Err(RepositoryError::NotFound) => {}
            Err(err) => return Err(storage_failure(err, OP, CarLookup::Name(draft.name))),
        }

        let id = self
            .repository
            .create(&draft)
            .await
            .map_err(|err| storage_failure(err, OP, CarLookup::Name(draft.name.clone())))?;

        let car = self.fetch(id, OP).await?;
        tracing::info!(%id, name = %car.name, brand = %car.brand, "car created");
        Ok(car)
    }

    async fn get_car(&self, id: i64) -> Result<Car, ServiceError> {
        let id = Self::car_id(id)?;
        let car = self.fetch(id, "get_car").await?;
        tracing::info!(%id, "car fetched");
        Ok(car)
    }

    async fn get_car_by_name(&self, name: &str) -> Result<Car, ServiceError> {
        const OP: &str = "get_car_by_name";
        if name.is_empty() {
            tracing::warn!(operation = OP, "rejected empty car name");
            return Err(ServiceError::from(ValidationError::EmptyName));
        }

        let car = self
            .repository
            .get_by_name(name)
            .await
            .map_err(|err| storage_failure(err, OP, CarLookup::Name(name.to_string())))?;
        tracing::info!(id = %car.id, name, "car fetched by name");
        Ok(car)
    }

    async fn list_cars_by_brand(&self, brand: &str) -> Result<Vec<Car>, ServiceError> {
        const OP: &str = "list_cars_by_brand";
        if brand.is_empty() {
            tracing::warn!(operation = OP, "rejected empty brand");
            return Err(ServiceError::from(ValidationError::EmptyBrand));
        }

        let cars = self
            .repository
            .list_by_brand(brand)
            .await
            .map_err(|err| listing_failure(err, OP))?;
        tracing::info!(brand, count = cars.len(), "cars listed by brand");
        Ok(cars)
    }

    async fn list_cars_by_price_range(
        &self,
        min: f64,
        max: f64,
    ) -> Result<Vec<Car>, ServiceError> {
        const OP: &str = "list_cars_by_price_range";
        // Written so NaN bounds fail too.
        if !(min >= 0.0 && max >= 0.0 && min <= max) {
            tracing::warn!(operation = OP, min, max, "rejected price range");
            return Err(ServiceError::from(ValidationError::InvalidPriceRange {
                min,
                max,
            }));
        }

        let cars = self
            .repository
            .list_by_value_range(min, max)
            .await
            .map_err(|err| listing_failure(err, OP))?;
        tracing::info!(min, max, count = cars.len(), "cars listed by price range");
        Ok(cars)
    }

    async fn list_cars(&self, page: i64, page_size: i64) -> Result<Vec<Car>, ServiceError> {
        let request = PageRequest::normalized(page, page_size);
        let cars = self
            .repository
            .list_page(request)
            .await
            .map_err(|err| listing_failure(err, "list_cars"))?;
        tracing::info!(
            page = request.page(),
            page_size = request.page_size(),
            count = cars.len(),
            "cars listed"
        );
        Ok(cars)
    }

    async fn update_car(&self, id: i64, draft: CarDraft) -> Result<Car, ServiceError> {
        const OP: &str = "update_car";
        let id = Self::car_id(id)?;
        validate(&draft, OP)?;

        let mut car = self.fetch(id, OP).await?;
        car.apply(draft);

        self.repository
            .update(&car)
            .await
            .map_err(|err| storage_failure(err, OP, CarLookup::Id(id)))?;

        let updated = self.fetch(id, OP).await?;
        tracing::info!(%id, name = %updated.name, "car updated");
        Ok(updated)
    }

    async fn delete_car(&self, id: i64) -> Result<(), ServiceError> {
        const OP: &str = "delete_car";
        let id = Self::car_id(id)?;
        self.fetch(id, OP).await?;

        self.repository
            .delete(id)
            .await
            .map_err(|err| storage_failure(err, OP, CarLookup::Id(id)))?;
        tracing::info!(%id, "car deleted");
        Ok(())
    }
}
