use reading_client::domain::{NewReading, OwnerId, Reading};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryReadingStore;
pub use postgres::PgReadingStore;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence for readings. Every call is scoped to a single owner.
#[async_trait::async_trait]
pub trait ReadingStore: Send + Sync {
    async fn find_by_owner(&self, owner: &OwnerId) -> Result<Vec<Reading>, StoreError>;

    async fn create(&self, owner: &OwnerId, reading: NewReading) -> Result<Reading, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    /// Whether `find_by_owner` already returns readings ascending by date.
    fn returns_date_ordered(&self) -> bool {
        false
    }
}

/// Build the store selected by `[store] kind`.
pub async fn from_config(cfg: &crate::config::AppConfig) -> anyhow::Result<std::sync::Arc<dyn ReadingStore>> {
    use crate::config::StoreKind;
    use sqlx::postgres::PgPoolOptions;

    match cfg.store.kind {
        StoreKind::Postgres => {
            let pg = cfg.postgres()?;
            let pool = PgPoolOptions::new()
                .max_connections(pg.max_connections)
                .connect(&pg.uri)
                .await?;
            tracing::info!(max_connections = pg.max_connections, "connected to postgres reading store");
            Ok(std::sync::Arc::new(PgReadingStore::new(pool)))
        }
        StoreKind::Memory => {
            tracing::warn!("using in-memory reading store; readings are lost on restart");
            Ok(std::sync::Arc::new(InMemoryReadingStore::new()))
        }
    }
}
