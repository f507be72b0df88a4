//! PostgreSQL implementation of the car repository.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::{CarRepository, RepositoryError};
use crate::config::DatabaseConfig;
use crate::domain::{Car, CarDraft, CarId, PageRequest};

/// PostgreSQL-backed car repository using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresCarRepository {
    pool: PgPool,
}

impl PostgresCarRepository {
    /// Creates a repository over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized and timed per `config`.
    ///
    /// # Errors
    ///
    /// Returns the `sqlx` error if the initial connections cannot be
    /// established within the acquire timeout.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect_with(config.connect_options.clone())
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded migrations in `migrations/`.
    ///
    /// # Errors
    ///
    /// Returns a [`sqlx::migrate::MigrateError`] if a migration fails or
    /// the applied history diverges from the embedded one.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    /// Closes every pooled connection, waiting for checked-out ones.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Maps a write failure, singling out the live-name unique index.
fn map_write_error(err: sqlx::Error, name: &str) -> RepositoryError {
    if let sqlx::Error::Database(db) = &err
        && db.is_unique_violation()
    {
        return RepositoryError::Conflict(name.to_string());
    }
    RepositoryError::Database(err)
}

#[async_trait]
impl CarRepository for PostgresCarRepository {
    async fn create(&self, draft: &CarDraft) -> Result<CarId, RepositoryError> {
        let now = Utc::now();
        sqlx::query_scalar::<_, CarId>(
            "INSERT INTO cars (name, brand, manufacturing_value, description, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(&draft.name)
        .bind(&draft.brand)
        .bind(draft.manufacturing_value)
        .bind(draft.description.as_deref())
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &draft.name))
    }

    async fn get_by_id(&self, id: CarId) -> Result<Car, RepositoryError> {
        sqlx::query_as::<_, Car>(
            "SELECT id, name, brand, manufacturing_value, description, created_at, updated_at, deleted_at \
             FROM cars WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    async fn get_by_name(&self, name: &str) -> Result<Car, RepositoryError> {
        sqlx::query_as::<_, Car>(
            "SELECT id, name, brand, manufacturing_value, description, created_at, updated_at, deleted_at \
             FROM cars WHERE name = $1 AND deleted_at IS NULL",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    async fn list_by_brand(&self, brand: &str) -> Result<Vec<Car>, RepositoryError> {
        let rows = sqlx::query_as::<_, Car>(
            "SELECT id, name, brand, manufacturing_value, description, created_at, updated_at, deleted_at \
             FROM cars WHERE brand = $1 AND deleted_at IS NULL ORDER BY id",
        )
        .bind(brand)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_by_value_range(&self, min: f64, max: f64) -> Result<Vec<Car>, RepositoryError> {
        let rows = sqlx::query_as::<_, Car>(
            "SELECT id, name, brand, manufacturing_value, description, created_at, updated_at, deleted_at \
             FROM cars WHERE manufacturing_value BETWEEN $1 AND $2 AND deleted_at IS NULL ORDER BY id",
        )
        .bind(min)
        .bind(max)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_page(&self, page: PageRequest) -> Result<Vec<Car>, RepositoryError> {
        let limit = i64::from(page.page_size());
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);

        let rows = sqlx::query_as::<_, Car>(
            "SELECT id, name, brand, manufacturing_value, description, created_at, updated_at, deleted_at \
             FROM cars WHERE deleted_at IS NULL ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update(&self, car: &Car) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE cars SET name = $1, brand = $2, manufacturing_value = $3, description = $4, \
             updated_at = GREATEST($5, created_at) \
             WHERE id = $6 AND deleted_at IS NULL",
        )
        .bind(&car.name)
        .bind(&car.brand)
        .bind(car.manufacturing_value)
        .bind(car.description.as_deref())
        .bind(Utc::now())
        .bind(car.id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &car.name))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: CarId) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE cars SET deleted_at = $1 WHERE id = $2 AND deleted_at IS NULL")
                .bind(Utc::now())
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
