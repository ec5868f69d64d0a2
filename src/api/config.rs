use crate::types::{available_symbols, ConfigUpdate, Configuration, RefreshRate};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::dashboard::ApiResponse;

/// Current configuration plus the choices a client can offer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub config: Configuration,
    pub available_symbols: Vec<&'static str>,
    pub refresh_rates: Vec<u64>,
}

impl ConfigResponse {
    fn new(config: Configuration) -> Self {
        Self {
            config,
            available_symbols: available_symbols().collect(),
            refresh_rates: RefreshRate::all().iter().map(|r| r.as_millis()).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub checked: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    pub changed: bool,
    pub config: Configuration,
}

/// GET /api/config
async fn get_config(State(state): State<AppState>) -> Json<ApiResponse<ConfigResponse>> {
    Json(ApiResponse {
        data: ConfigResponse::new(state.engine.config()),
    })
}

/// PUT /api/config
///
/// Malformed values are sanitised, not rejected.
async fn put_config(
    State(state): State<AppState>,
    Json(update): Json<ConfigUpdate>,
) -> Json<ApiResponse<ConfigResponse>> {
    let config = state.engine.apply_config(&update).await;
    Json(ApiResponse {
        data: ConfigResponse::new(config),
    })
}

/// POST /api/config/symbols/:symbol
async fn toggle_symbol(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Json(request): Json<ToggleRequest>,
) -> Json<ApiResponse<ToggleResponse>> {
    let changed = state.engine.toggle_symbol(&symbol, request.checked).await;
    Json(ApiResponse {
        data: ToggleResponse {
            changed,
            config: state.engine.config(),
        },
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/config", get(get_config).put(put_config))
        .route("/api/config/symbols/:symbol", post(toggle_symbol))
}
