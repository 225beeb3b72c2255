use axum::{extract::State, Json};
use serde_json::Value;

use crate::database::ActivityRegistry;

pub async fn health_handler(State(registry): State<ActivityRegistry>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "activities": registry.activity_count().await,
        "enforce_capacity": registry.enforces_capacity(),
        "build": env!("MERGINGTON_BUILD_ID"),
    }))
}
