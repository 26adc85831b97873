use std::collections::BTreeMap;

use reading_client::domain::Reading;
use serde::Serialize;

use super::bucket::Totals;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u8,
    pub total_units: f64,
    pub total_cost: f64,
}

/// Sum units and cost per calendar (year, month), oldest month first.
///
/// Months are taken from each date in its own offset. Months without readings
/// are absent from the output, and undated readings are skipped.
pub fn by_month(readings: &[Reading]) -> Vec<MonthlySummary> {
    let mut buckets: BTreeMap<(i32, u8), Totals> = BTreeMap::new();

    for reading in readings {
        let Some(date) = reading.date else {
            continue;
        };
        buckets
            .entry((date.year(), u8::from(date.month())))
            .or_default()
            .add(reading);
    }

    buckets
        .into_iter()
        .map(|((year, month), totals)| MonthlySummary {
            year,
            month,
            total_units: totals.units,
            total_cost: totals.cost,
        })
        .collect()
}
