//! In-memory car repository.
//!
//! Keeps every row, live or soft-deleted, in a `BTreeMap` keyed by id so
//! iteration order matches the `ORDER BY id` of the SQL backend. The whole
//! table sits behind one [`tokio::sync::RwLock`]: reads run concurrently,
//! writes are serialized.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{CarRepository, RepositoryError};
use crate::domain::{Car, CarDraft, CarId, PageRequest};

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<CarId, Car>,
    last_id: i64,
}

impl Table {
    fn live(&self) -> impl Iterator<Item = &Car> {
        self.rows.values().filter(|car| car.is_live())
    }

    fn name_taken(&self, name: &str, except: Option<CarId>) -> bool {
        self.live()
            .any(|car| car.name == name && Some(car.id) != except)
    }
}

/// Car repository backed by process memory.
///
/// Mirrors the PostgreSQL schema's rules, including the unique index on
/// live names, so service behavior is identical across backends.
#[derive(Debug, Default)]
pub struct InMemoryCarRepository {
    table: RwLock<Table>,
}

impl InMemoryCarRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of rows, including soft-deleted ones.
    #[cfg(test)]
    pub(crate) async fn row_count(&self) -> usize {
        self.table.read().await.rows.len()
    }
}

#[async_trait]
impl CarRepository for InMemoryCarRepository {
    async fn create(&self, draft: &CarDraft) -> Result<CarId, RepositoryError> {
        let mut table = self.table.write().await;
        if table.name_taken(&draft.name, None) {
            return Err(RepositoryError::Conflict(draft.name.clone()));
        }

        table.last_id = table.last_id.saturating_add(1);
        let id = CarId::from_raw(table.last_id);
        let now = Utc::now();
        table.rows.insert(
            id,
            Car {
                id,
                name: draft.name.clone(),
                brand: draft.brand.clone(),
                manufacturing_value: draft.manufacturing_value,
                description: draft.description.clone(),
                created_at: now,
                updated_at: now,
                deleted_at: None,
            },
        );
        Ok(id)
    }

    async fn get_by_id(&self, id: CarId) -> Result<Car, RepositoryError> {
        let table = self.table.read().await;
        table
            .rows
            .get(&id)
            .filter(|car| car.is_live())
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn get_by_name(&self, name: &str) -> Result<Car, RepositoryError> {
        let table = self.table.read().await;
        table
            .live()
            .find(|car| car.name == name)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn list_by_brand(&self, brand: &str) -> Result<Vec<Car>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table.live().filter(|car| car.brand == brand).cloned().collect())
    }

    async fn list_by_value_range(&self, min: f64, max: f64) -> Result<Vec<Car>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table
            .live()
            .filter(|car| (min..=max).contains(&car.manufacturing_value))
            .cloned()
            .collect())
    }

    async fn list_page(&self, page: PageRequest) -> Result<Vec<Car>, RepositoryError> {
        let table = self.table.read().await;
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(page.page_size()).unwrap_or(usize::MAX);
        Ok(table.live().skip(skip).take(take).cloned().collect())
    }

    async fn update(&self, car: &Car) -> Result<(), RepositoryError> {
        let mut table = self.table.write().await;
        if table.name_taken(&car.name, Some(car.id)) {
            return Err(RepositoryError::Conflict(car.name.clone()));
        }

        let row = table
            .rows
            .get_mut(&car.id)
            .filter(|row| row.is_live())
            .ok_or(RepositoryError::NotFound)?;
        row.name.clone_from(&car.name);
        row.brand.clone_from(&car.brand);
        row.manufacturing_value = car.manufacturing_value;
        row.description.clone_from(&car.description);
        row.updated_at = Utc::now().max(row.created_at);
        Ok(())
    }

    async fn delete(&self, id: CarId) -> Result<(), RepositoryError> {
        let mut table = self.table.write().await;
        let row = table
            .rows
            .get_mut(&id)
            .filter(|row| row.is_live())
            .ok_or(RepositoryError::NotFound)?;
        row.deleted_at = Some(Utc::now());
        Ok(())
    }
}
