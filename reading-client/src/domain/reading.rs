use std::fmt;

use time::OffsetDateTime;

/// Identifier of the user who owns a set of readings.
///
/// Resolved by whatever authenticates the caller; this crate only uses it to
/// scope queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, sqlx::Type)]
#[sqlx(transparent)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored meter reading.
///
/// `date` is nullable in storage so rows written before the column was
/// required can still be read back.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Reading {
    pub id: i64,
    pub owner_id: OwnerId,
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339::option"))]
    pub date: Option<OffsetDateTime>,
    pub appliance_name: String,
    pub units: f64,
    pub cost_per_unit: f64,
    pub total_cost: f64,
}

impl Reading {
    /// Consumed units, with non-numeric values (NaN, infinities) counted as zero.
    pub fn units_or_zero(&self) -> f64 {
        finite_or_zero(self.units)
    }

    pub fn total_cost_or_zero(&self) -> f64 {
        finite_or_zero(self.total_cost)
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Fields supplied when a reading is created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReading {
    pub date: OffsetDateTime,
    pub appliance_name: String,
    pub units: f64,
    pub cost_per_unit: f64,
    pub total_cost: Option<f64>,
}

impl NewReading {
    /// The cost to store: the caller's value when given, otherwise
    /// `units * cost_per_unit`. Computed once at creation.
    pub fn resolved_total_cost(&self) -> f64 {
        self.total_cost
            .unwrap_or(self.units * self.cost_per_unit)
    }
}
