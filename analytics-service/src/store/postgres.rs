use reading_client::{
    db,
    domain::{NewReading, OwnerId, Reading},
};
use sqlx::postgres::PgPool;

use super::{ReadingStore, StoreError};

#[derive(Clone)]
pub struct PgReadingStore {
    pool: PgPool,
}

impl PgReadingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ReadingStore for PgReadingStore {
    async fn find_by_owner(&self, owner: &OwnerId) -> Result<Vec<Reading>, StoreError> {
        db::readings_for_owner(&self.pool, owner)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    async fn create(&self, owner: &OwnerId, reading: NewReading) -> Result<Reading, StoreError> {
        db::insert_reading(&self.pool, owner, &reading)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        db::ping(&self.pool)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    fn returns_date_ordered(&self) -> bool {
        true
    }
}
