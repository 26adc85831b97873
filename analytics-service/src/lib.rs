pub mod analytics;
pub mod config;
pub mod http;
pub mod import;
pub mod metrics_server;
pub mod observability;
pub mod store;
pub mod validation;

pub use analytics::{Analytics, AnalyticsError};
pub use store::{ReadingStore, StoreError};
