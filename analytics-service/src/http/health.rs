use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use super::AppState;

#[derive(Serialize)]
pub struct StoreHealth {
    pub connected: bool,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub store: StoreHealth,
    pub timestamp: String,
}

pub async fn banner() -> Json<Value> {
    Json(json!({ "message": "Electricity reading analytics API running" }))
}

pub async fn directory() -> Json<Value> {
    Json(json!({
        "message": "Electricity reading analytics API",
        "endpoints": {
            "health": "/api/health",
            "readings": "/api/readings",
            "average": "/api/readings/average",
            "monthly": "/api/readings/summary/monthly",
            "appliance": "/api/readings/summary/appliance",
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let connected = match state.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "health check could not reach reading store");
            false
        }
    };

    Json(HealthResponse {
        status: "ok".into(),
        store: StoreHealth { connected },
        timestamp: OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default(),
    })
}
