use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    connected: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.engine.is_running().await {
        "ok"
    } else {
        "stopped"
    };
    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        connected: state.engine.snapshot().connected,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "ok",
            version: "1.0.0",
            connected: false,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"version\":\"1.0.0\""));
        assert!(json.contains("\"connected\":false"));
    }
}
