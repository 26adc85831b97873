//! Consumption analytics over one owner's reading history.
//!
//! Every operation performs a single scoped read against the
//! [`ReadingStore`] and then runs a pure computation over that snapshot. A
//! failed or timed-out read fails the whole call; nothing partial is returned.

use std::{sync::Arc, time::Duration};

use reading_client::domain::{OwnerId, Reading};
use serde::Serialize;

use crate::store::ReadingStore;

mod bucket;
pub mod category;
pub mod period;
pub mod sliding_window;

pub use category::{by_appliance, ApplianceSummary};
pub use period::{by_month, MonthlySummary};
pub use sliding_window::{effective_window, sliding_average};

#[derive(thiserror::Error, Debug)]
pub enum AnalyticsError {
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlidingAverage {
    /// The window size as requested, before clamping.
    pub n: i64,
    pub average_units: f64,
}

#[derive(Clone)]
pub struct Analytics {
    store: Arc<dyn ReadingStore>,
    read_timeout: Duration,
}

impl Analytics {
    pub fn new(store: Arc<dyn ReadingStore>, read_timeout: Duration) -> Self {
        Self { store, read_timeout }
    }

    /// Average units over the owner's `n` most recent readings.
    ///
    /// The response echoes `n` exactly as requested, not the clamped window.
    pub async fn sliding_average(&self, owner: &OwnerId, n: i64) -> Result<SlidingAverage, AnalyticsError> {
        metrics::counter!("analytics_requests_total", "op" => "sliding_average").increment(1);
        let readings = self.fetch_date_ordered(owner).await?;
        let average_units = sliding_average(&readings, n);

        tracing::debug!(
            owner = %owner,
            requested_n = n,
            window = effective_window(n, readings.len()),
            average_units,
            "computed sliding average"
        );

        Ok(SlidingAverage { n, average_units })
    }

    pub async fn monthly_summary(&self, owner: &OwnerId) -> Result<Vec<MonthlySummary>, AnalyticsError> {
        metrics::counter!("analytics_requests_total", "op" => "monthly_summary").increment(1);
        let readings = self.fetch(owner).await?;
        Ok(by_month(&readings))
    }

    pub async fn appliance_summary(&self, owner: &OwnerId) -> Result<Vec<ApplianceSummary>, AnalyticsError> {
        metrics::counter!("analytics_requests_total", "op" => "appliance_summary").increment(1);
        let readings = self.fetch(owner).await?;
        Ok(by_appliance(&readings))
    }

    /// The owner's readings, oldest first.
    pub async fn reading_history(&self, owner: &OwnerId) -> Result<Vec<Reading>, AnalyticsError> {
        metrics::counter!("analytics_requests_total", "op" => "reading_history").increment(1);
        self.fetch_date_ordered(owner).await
    }

    async fn fetch_date_ordered(&self, owner: &OwnerId) -> Result<Vec<Reading>, AnalyticsError> {
        let mut readings = self.fetch(owner).await?;
        if !self.store.returns_date_ordered() {
            // Stable, so same-date readings keep store order.
            readings.sort_by_key(|r| r.date);
        }
        Ok(readings)
    }

    async fn fetch(&self, owner: &OwnerId) -> Result<Vec<Reading>, AnalyticsError> {
        match tokio::time::timeout(self.read_timeout, self.store.find_by_owner(owner)).await {
            Ok(Ok(readings)) => Ok(readings),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, owner = %owner, "reading store read failed");
                metrics::counter!("analytics_store_failures_total").increment(1);
                Err(AnalyticsError::StoreUnavailable(e.to_string()))
            }
            Err(_) => {
                tracing::warn!(
                    owner = %owner,
                    timeout_ms = self.read_timeout.as_millis() as u64,
                    "reading store read timed out"
                );
                metrics::counter!("analytics_store_failures_total").increment(1);
                Err(AnalyticsError::StoreUnavailable("read timed out".to_string()))
            }
        }
    }
}
