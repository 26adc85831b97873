use std::{sync::Arc, time::Duration};

use axum::{
    extract::rejection::JsonRejection,
    http::{HeaderMap, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use reading_client::domain::OwnerId;
use serde_json::json;

use crate::{
    analytics::{Analytics, AnalyticsError},
    config::AppConfig,
    store::{ReadingStore, StoreError},
    validation::ValidationError,
};

mod health;
mod readings;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ReadingStore>,
    pub analytics: Analytics,
    pub owner_header: HeaderName,
    pub default_window: i64,
}

impl AppState {
    pub fn new(store: Arc<dyn ReadingStore>, read_timeout: Duration, owner_header: HeaderName, default_window: i64) -> Self {
        Self {
            analytics: Analytics::new(store.clone(), read_timeout),
            store,
            owner_header,
            default_window,
        }
    }

    pub fn from_config(store: Arc<dyn ReadingStore>, cfg: &AppConfig) -> anyhow::Result<Self> {
        let owner_header = HeaderName::from_bytes(cfg.http.owner_header.as_bytes())
            .map_err(|e| anyhow::anyhow!("invalid http.owner_header: {e}"))?;
        Ok(Self::new(
            store,
            Duration::from_millis(cfg.store.read_timeout_ms),
            owner_header,
            cfg.analytics.default_window,
        ))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::banner))
        .route("/api", get(health::directory))
        .route("/api/health", get(health::health))
        .route("/api/readings", get(readings::list_readings).post(readings::create_reading))
        .route("/api/readings/average", get(readings::sliding_average))
        .route("/api/readings/summary/monthly", get(readings::monthly_summary))
        .route("/api/readings/summary/appliance", get(readings::appliance_summary))
        .with_state(state)
}

#[derive(Debug)]
pub enum ApiError {
    MissingOwner,
    MalformedBody(String),
    Invalid(ValidationError),
    Analytics(AnalyticsError),
    Store(StoreError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedBody(rejection.body_text())
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Invalid(e)
    }
}

impl From<AnalyticsError> for ApiError {
    fn from(e: AnalyticsError) -> Self {
        Self::Analytics(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingOwner => (StatusCode::UNAUTHORIZED, "missing owner identity".to_string()),
            Self::MalformedBody(detail) => (StatusCode::BAD_REQUEST, detail),
            Self::Invalid(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            // The facade has already logged the cause.
            Self::Analytics(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to compute analytics".to_string(),
            ),
            Self::Store(e) => {
                tracing::error!(error = %e, "reading store write failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "server error".to_string())
            }
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Owner id placed in `header` by the auth gateway in front of this service.
fn owner_from_headers(headers: &HeaderMap, header: &HeaderName) -> Result<OwnerId, ApiError> {
    headers
        .get(header)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(OwnerId::new)
        .ok_or(ApiError::MissingOwner)
}
