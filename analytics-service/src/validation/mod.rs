use reading_client::domain::NewReading;
use serde::Deserialize;
use time::{
    format_description::well_known::Rfc3339, macros::datetime, macros::format_description, Date,
    OffsetDateTime,
};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("missing required fields")]
    MissingFields,
    #[error("invalid date '{0}'")]
    InvalidDate(String),
    #[error("date out of allowed range")]
    DateOutOfRange,
    #[error("{0} must be a non-negative number")]
    NegativeOrNonNumeric(&'static str),
    #[error("totalCost must be a number")]
    NonNumericTotalCost,
}

/// Reading fields as submitted, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingInput {
    pub date: Option<String>,
    pub appliance_name: Option<String>,
    pub units: Option<f64>,
    pub cost_per_unit: Option<f64>,
    pub total_cost: Option<f64>,
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_reading_date(raw: &str) -> Result<OffsetDateTime, ValidationError> {
    let raw = raw.trim();
    if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(ts);
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map(|d| d.midnight().assume_utc())
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

/// Pure validation of a submitted reading.
///
/// Rules:
/// - date, appliance name, units and cost per unit are all required.
/// - units and cost per unit must be finite and non-negative.
/// - a supplied total cost must be finite.
/// - date must be within a broad sanity window [2000-01-01, 2100-01-01].
pub fn validate_reading(input: ReadingInput) -> Result<NewReading, ValidationError> {
    let (Some(raw_date), Some(appliance_name), Some(units), Some(cost_per_unit)) =
        (input.date, input.appliance_name, input.units, input.cost_per_unit)
    else {
        return Err(ValidationError::MissingFields);
    };
    if raw_date.trim().is_empty() || appliance_name.is_empty() {
        return Err(ValidationError::MissingFields);
    }

    if !units.is_finite() || units < 0.0 {
        return Err(ValidationError::NegativeOrNonNumeric("units"));
    }
    if !cost_per_unit.is_finite() || cost_per_unit < 0.0 {
        return Err(ValidationError::NegativeOrNonNumeric("costPerUnit"));
    }
    if matches!(input.total_cost, Some(tc) if !tc.is_finite()) {
        return Err(ValidationError::NonNumericTotalCost);
    }

    let date = parse_reading_date(&raw_date)?;
    let min_ts = datetime!(2000-01-01 00:00:00 UTC);
    let max_ts = datetime!(2100-01-01 00:00:00 UTC);
    if date < min_ts || date > max_ts {
        return Err(ValidationError::DateOutOfRange);
    }

    Ok(NewReading {
        date,
        appliance_name,
        units,
        cost_per_unit,
        total_cost: input.total_cost,
    })
}

/// [`validate_reading`] plus the rejection counter.
pub fn validate_reading_counted(input: ReadingInput) -> Result<NewReading, ValidationError> {
    validate_reading(input).inspect_err(|_| {
        metrics::counter!("validation_reading_rejected_total").increment(1);
    })
}
