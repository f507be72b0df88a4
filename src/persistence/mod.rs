//! Persistence layer: the `cars` table and its access patterns.
//!
//! [`CarRepository`] is the data-access capability the service layer is
//! written against. [`postgres::PostgresCarRepository`] implements it with
//! `sqlx::PgPool`; [`memory::InMemoryCarRepository`] is a substitute for
//! tests and database-less local runs.
//!
//! Every operation except `create` only sees live rows.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::domain::{Car, CarDraft, CarId, PageRequest};

pub use memory::InMemoryCarRepository;
pub use postgres::PostgresCarRepository;

/// Failure of a single storage operation.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// No live row matched.
    #[error("no matching live row")]
    NotFound,

    /// The write would give two live rows the same name.
    #[error("a live row named {0} already exists")]
    Conflict(String),

    /// Any other storage failure: connectivity, constraint, decoding.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Data-access operations on car records.
///
/// # Design Rules
///
/// - No `sqlx` types in signatures except the error source
/// - One method per access pattern, no business validation
/// - Storage assigns ids and timestamps
#[async_trait]
pub trait CarRepository: Send + Sync + std::fmt::Debug {
    /// Inserts a new row with `created_at == updated_at == now`.
    ///
    /// Returns the storage-assigned identifier.
    async fn create(&self, draft: &CarDraft) -> Result<CarId, RepositoryError>;

    /// Fetches a live car by id.
    ///
    /// Returns `Err(RepositoryError::NotFound)` if no live row matches.
    async fn get_by_id(&self, id: CarId) -> Result<Car, RepositoryError>;

    /// Fetches a live car by exact name.
    ///
    /// Returns `Err(RepositoryError::NotFound)` if no live row matches.
    async fn get_by_name(&self, name: &str) -> Result<Car, RepositoryError>;

    /// Lists live cars of a brand, ascending by id. Empty when none match.
    async fn list_by_brand(&self, brand: &str) -> Result<Vec<Car>, RepositoryError>;

    /// Lists live cars with `min <= manufacturing_value <= max`, ascending
    /// by id.
    async fn list_by_value_range(&self, min: f64, max: f64) -> Result<Vec<Car>, RepositoryError>;

    /// Lists one page of live cars, ascending by id.
    async fn list_page(&self, page: PageRequest) -> Result<Vec<Car>, RepositoryError>;

    /// Replaces the business fields of a live row and refreshes
    /// `updated_at`.
    ///
    /// Returns `Err(RepositoryError::NotFound)` if no live row has
    /// `car.id`.
    async fn update(&self, car: &Car) -> Result<(), RepositoryError>;

    /// Soft-deletes a live row by setting `deleted_at`.
    ///
    /// Returns `Err(RepositoryError::NotFound)` if no live row matches.
    async fn delete(&self, id: CarId) -> Result<(), RepositoryError>;
}
