use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use reading_client::domain::Reading;
use serde::Deserialize;

use super::{owner_from_headers, ApiError, AppState};
use crate::{
    analytics::{ApplianceSummary, MonthlySummary, SlidingAverage},
    validation::{validate_reading_counted, ReadingInput},
};

#[derive(Deserialize)]
pub struct AverageParams {
    n: Option<String>,
}

pub async fn create_reading(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ReadingInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Reading>), ApiError> {
    let owner = owner_from_headers(&headers, &state.owner_header)?;
    let Json(input) = body.inspect_err(|_| {
        metrics::counter!("validation_reading_rejected_total").increment(1);
    })?;
    let new_reading = validate_reading_counted(input)?;
    let reading = state.store.create(&owner, new_reading).await?;

    metrics::counter!("readings_created_total").increment(1);
    tracing::info!(owner = %owner, reading_id = reading.id, "reading created");

    Ok((StatusCode::CREATED, Json(reading)))
}

pub async fn list_readings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Reading>>, ApiError> {
    let owner = owner_from_headers(&headers, &state.owner_header)?;
    Ok(Json(state.analytics.reading_history(&owner).await?))
}

/// `n` that is absent or not an integer falls back to the configured default.
pub async fn sliding_average(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<AverageParams>,
) -> Result<Json<SlidingAverage>, ApiError> {
    let owner = owner_from_headers(&headers, &state.owner_header)?;
    let n = params
        .n
        .as_deref()
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .unwrap_or(state.default_window);

    Ok(Json(state.analytics.sliding_average(&owner, n).await?))
}

pub async fn monthly_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<MonthlySummary>>, ApiError> {
    let owner = owner_from_headers(&headers, &state.owner_header)?;
    Ok(Json(state.analytics.monthly_summary(&owner).await?))
}

pub async fn appliance_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ApplianceSummary>>, ApiError> {
    let owner = owner_from_headers(&headers, &state.owner_header)?;
    Ok(Json(state.analytics.appliance_summary(&owner).await?))
}
