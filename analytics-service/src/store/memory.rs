use std::sync::Arc;

use reading_client::domain::{NewReading, OwnerId, Reading};
use tokio::sync::RwLock;

use super::{ReadingStore, StoreError};

#[derive(Default)]
struct Inner {
    next_id: i64,
    readings: Vec<Reading>,
}

/// Process-local store. Readings come back in insertion order.
#[derive(Clone, Default)]
pub struct InMemoryReadingStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryReadingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an already-built reading as-is, keeping its id. Used for seeding
    /// rows that did not come through `create` (e.g. legacy undated rows).
    pub async fn insert_raw(&self, reading: Reading) {
        let mut inner = self.inner.write().await;
        inner.next_id = inner.next_id.max(reading.id);
        inner.readings.push(reading);
    }
}

#[async_trait::async_trait]
impl ReadingStore for InMemoryReadingStore {
    async fn find_by_owner(&self, owner: &OwnerId) -> Result<Vec<Reading>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .readings
            .iter()
            .filter(|r| &r.owner_id == owner)
            .cloned()
            .collect())
    }

    async fn create(&self, owner: &OwnerId, reading: NewReading) -> Result<Reading, StoreError> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let total_cost = reading.resolved_total_cost();
        let stored = Reading {
            id: inner.next_id,
            owner_id: owner.clone(),
            date: Some(reading.date),
            appliance_name: reading.appliance_name,
            units: reading.units,
            cost_per_unit: reading.cost_per_unit,
            total_cost,
        };
        inner.readings.push(stored.clone());
        Ok(stored)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
